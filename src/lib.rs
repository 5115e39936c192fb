//! # MouseRec
//!
//! A content-based computer mouse recommender.
//!
//! The catalog is loaded once from CSV, categorical columns are label encoded,
//! numeric columns are min-max scaled, and every request is answered by cosine
//! similarity between a preference vector and each catalog row, narrowed by
//! hard filters and capped at `top_n`.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install mouserec
//! mouserec --catalog Data_Mouse.csv --image-dir img --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use mouserec::prelude::*;
//!
//! let recommender = Recommender::load(RecommenderConfig::default()).unwrap();
//! let prefs = UserPreferences::new()
//!     .with("category", "Gaming")
//!     .with("price_max", "1500000")
//!     .with("weight_pref", "light");
//!
//! for item in recommender.get_recommendations(&prefs, 5).unwrap().recommendations {
//!     println!("{}. {} ({}) {}", item.rank, item.name, item.price, item.similarity_score);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `mouserec-core` - Catalog loading, encoders, feature matrix, image resolution
//! - `mouserec-similarity` - Preferences, filters, ranking, the [`Recommender`] facade
//! - `mouserec-api` - REST API

// Re-export core types
pub use mouserec_core::{
    CatalogRecord, CategoricalField, Error, FeatureMatrix, FeatureSpace, ImageResolver, LabelEncoder,
    MinMaxScaler, NormalizedCatalog, NumericField, Result, Vector,
};

// Re-export the recommender
pub use mouserec_similarity::{
    CatalogOptions, RankerConfig, RecommendationItem, RecommendationResponse, Recommender, RecommenderConfig,
    SystemInfo, UserPreferences, WeightBandScope, WeightClass,
};

// Re-export API
pub use mouserec_api::{ApiConfig, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CatalogOptions, Error, NormalizedCatalog, RankerConfig, RecommendationItem, RecommendationResponse,
        Recommender, RecommenderConfig, Result, UserPreferences, WeightBandScope, WeightClass,
        ApiConfig, RestApi,
    };
}
