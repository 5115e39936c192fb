//! # MouseRec Similarity
//!
//! Preference matching on top of a normalized mouse catalog.
//!
//! A request flows through four stages:
//!
//! - **Vectorize**: sparse [`UserPreferences`] become a vector in the catalog's
//!   feature space, with unset columns taking the catalog median
//! - **Score**: cosine similarity against every catalog row, in parallel
//! - **Filter**: an ordered AND of hard constraints (price, exact labels,
//!   weight band, DPI, buttons)
//! - **Rank**: stable sort by score, capped at `top_n`, rendered for display
//!
//! ## Example
//!
//! ```rust
//! use mouserec_core::NormalizedCatalog;
//! use mouserec_similarity::{RankerConfig, Recommender, UserPreferences};
//!
//! let csv = "\
//! Name,Brand,Connection,Power,Battery Life,Buttons Type,Size,Shape,Category,Price,Weight,DPI,Polling Rate,Buttons,Image
//! G Pro,Logitech,Wireless,Battery,70 hours,Mechanical,Medium,Symmetrical,Gaming,1500000,63,25600,1000,5,gpro.jpg
//! Viper,Razer,Wired,,,Optical,Medium,Symmetrical,Gaming,500000,69,20000,1000,8,viper.jpg
//! ";
//! let catalog = NormalizedCatalog::from_reader(csv.as_bytes(), "img").unwrap();
//! let recommender = Recommender::with_catalog(catalog, RankerConfig::default());
//!
//! let prefs = UserPreferences::new().with("brand", "Razer");
//! let response = recommender.get_recommendations(&prefs, 5).unwrap();
//! assert_eq!(response.recommendations[0].name, "Viper");
//! assert_eq!(response.recommendations[0].price, "Rp 500,000");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Preferences │────>│ Vectorizer  │────>│   Scores    │
//! │  (sparse)   │     │ (medians)   │     │  (cosine)   │
//! └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                │
//!                     ┌─────────────┐     ┌──────v──────┐
//!                     │  Response   │<────│  Filters +  │
//!                     │  (top_n)    │     │  stable sort│
//!                     └─────────────┘     └─────────────┘
//! ```

pub mod engine;
pub mod filter;
pub mod introspect;
pub mod preferences;
pub mod ranker;
pub mod result;
pub mod vectorizer;

#[cfg(test)]
mod testing;

pub use engine::{DatasetShape, Recommender, RecommenderConfig, SystemInfo, MODEL_NAME, NOT_INITIALIZED_MESSAGE};
pub use filter::{FieldFilter, Filter, FilterCondition, FilterPipeline, WeightBand, WeightBandScope};
pub use introspect::{CatalogOptions, ValueRange};
pub use preferences::{UserPreferences, WeightClass};
pub use ranker::{RankedRecord, Ranker, RankerConfig};
pub use result::{RecommendationItem, RecommendationResponse, Specs, NO_RESULTS_MESSAGE};
pub use vectorizer::PreferenceVectorizer;
