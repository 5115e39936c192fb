//! # MouseRec Core
//!
//! Core library for the MouseRec recommender.
//!
//! This crate turns a raw product catalog into a comparable numeric space:
//!
//! - [`NormalizedCatalog`] - repaired records plus the feature matrix, built once
//! - [`FeatureSpace`] - label encoders, min-max scalers and column medians
//! - [`FeatureMatrix`] - one row per catalog item, fixed column order
//! - [`Vector`] - dense vectors with cosine similarity
//! - [`ImageResolver`] - image lookup with case-insensitive and default fallbacks
//!
//! ## Example
//!
//! ```rust
//! use mouserec_core::{NormalizedCatalog, NumericField};
//!
//! let csv = "\
//! Name,Brand,Connection,Power,Battery Life,Buttons Type,Size,Shape,Category,Price,Weight,DPI,Polling Rate,Buttons,Image
//! G Pro,Logitech,Wireless,Battery,70 hours,Mechanical,Medium,Symmetrical,Gaming,1500,63,25600,1000,5,gpro.jpg
//! Viper,Razer,Wired,,,Optical,Medium,Symmetrical,Gaming,500,69,20000,1000,8,viper.jpg
//! ";
//! let catalog = NormalizedCatalog::from_reader(csv.as_bytes(), "img").unwrap();
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.space().scaler(NumericField::Price).max(), 1500.0);
//! ```

pub mod catalog;
pub mod encoder;
pub mod error;
pub mod image;
pub mod matrix;
pub mod record;
pub mod vector;

pub use catalog::{FeatureSpace, NormalizedCatalog};
pub use encoder::{LabelEncoder, MinMaxScaler};
pub use error::{Error, Result};
pub use image::{ImageResolver, IMAGE_ROUTE};
pub use matrix::FeatureMatrix;
pub use record::{CatalogRecord, CategoricalField, NumericField, RawCatalog, DEFAULT_IMAGE, UNKNOWN};
pub use vector::Vector;
