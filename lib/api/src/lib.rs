//! # MouseRec API
//!
//! HTTP surface for the recommender: JSON endpoints for options,
//! recommendations and system info, plus static front-end and image serving.

pub mod rest;

pub use rest::{ApiConfig, ApiState, RestApi};
