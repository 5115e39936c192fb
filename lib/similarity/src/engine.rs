//! Recommender facade
//!
//! Owns the current catalog snapshot and answers every query against it.
//! Readers clone the `Arc` and drop the lock right away, so a reload never
//! blocks or disturbs requests already in flight.

use crate::introspect::CatalogOptions;
use crate::preferences::UserPreferences;
use crate::ranker::{Ranker, RankerConfig};
use crate::result::{RecommendationItem, RecommendationResponse};
use mouserec_core::{Error, NormalizedCatalog, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

pub const MODEL_NAME: &str = "Cosine Similarity";
pub const NOT_INITIALIZED_MESSAGE: &str = "Recommendation system not initialized";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommenderConfig {
    pub catalog_path: PathBuf,
    pub image_dir: PathBuf,
    #[serde(default)]
    pub ranker: RankerConfig,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("Data_Mouse.csv"),
            image_dir: PathBuf::from("img"),
            ranker: RankerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetShape {
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub model_name: String,
    pub total_data: usize,
    pub feature_columns: Vec<String>,
    pub dataset_shape: DatasetShape,
    pub original_columns: Vec<String>,
    pub image_folder: String,
    pub image_support: bool,
}

pub struct Recommender {
    config: RecommenderConfig,
    ranker: Ranker,
    catalog: RwLock<Option<Arc<NormalizedCatalog>>>,
}

impl Recommender {
    /// Uninitialized recommender; call [`Recommender::reload`] to load the catalog
    pub fn new(config: RecommenderConfig) -> Self {
        let ranker = Ranker::new(config.ranker);
        Self {
            config,
            ranker,
            catalog: RwLock::new(None),
        }
    }

    /// Load the configured catalog, failing if it cannot be read
    pub fn load(config: RecommenderConfig) -> Result<Self> {
        let recommender = Self::new(config);
        recommender.reload()?;
        Ok(recommender)
    }

    /// Load the configured catalog. On failure the error is logged and the
    /// recommender stays uninitialized.
    pub fn open(config: RecommenderConfig) -> Self {
        let recommender = Self::new(config);
        match recommender.reload() {
            Ok(()) => info!("Mouse recommendation system initialized successfully"),
            Err(e) => error!("Error initializing recommendation system: {}", e),
        }
        recommender
    }

    /// Serve an already built catalog
    pub fn with_catalog(catalog: NormalizedCatalog, ranker: RankerConfig) -> Self {
        let config = RecommenderConfig {
            catalog_path: PathBuf::new(),
            image_dir: catalog.image_dir().to_path_buf(),
            ranker,
        };
        let recommender = Self::new(config);
        recommender.swap(catalog);
        recommender
    }

    pub fn is_initialized(&self) -> bool {
        self.catalog.read().is_some()
    }

    /// Current catalog snapshot
    pub fn snapshot(&self) -> Result<Arc<NormalizedCatalog>> {
        self.catalog.read().as_ref().cloned().ok_or(Error::NotInitialized)
    }

    /// Rebuild the catalog from disk and swap it in. The current snapshot is
    /// kept if loading fails.
    pub fn reload(&self) -> Result<()> {
        let catalog = NormalizedCatalog::load(&self.config.catalog_path, &self.config.image_dir)?;
        self.swap(catalog);
        Ok(())
    }

    /// Replace the snapshot, returning the previous one
    pub fn swap(&self, catalog: NormalizedCatalog) -> Option<Arc<NormalizedCatalog>> {
        info!("Serving catalog with {} mice", catalog.len());
        self.catalog.write().replace(Arc::new(catalog))
    }

    pub fn get_options(&self) -> Result<CatalogOptions> {
        let catalog = self.snapshot()?;
        Ok(CatalogOptions::from_catalog(&catalog))
    }

    /// Top `top_n` recommendations for `prefs`.
    ///
    /// Only a missing catalog is an error. Anything that goes wrong while
    /// ranking is logged and answered with an empty list.
    pub fn get_recommendations(&self, prefs: &UserPreferences, top_n: usize) -> Result<RecommendationResponse> {
        let catalog = self.snapshot()?;
        info!("Getting recommendations for preferences: {:?}", prefs);

        let ranked = match self.ranker.rank(&catalog, prefs, top_n) {
            Ok(ranked) => ranked,
            Err(e) => {
                error!("Error getting recommendations: {}", e);
                return Ok(RecommendationResponse::empty());
            }
        };

        let items: Vec<RecommendationItem> = ranked
            .iter()
            .enumerate()
            .filter_map(|(i, r)| RecommendationItem::from_ranked(&catalog, r, i + 1))
            .collect();
        info!("Returning {} recommendations", items.len());

        Ok(RecommendationResponse::new(items))
    }

    pub fn get_system_info(&self) -> Result<SystemInfo> {
        let catalog = self.snapshot()?;
        let original_columns = catalog.raw().headers().to_vec();
        Ok(SystemInfo {
            model_name: MODEL_NAME.to_string(),
            total_data: catalog.len(),
            feature_columns: catalog.feature_columns().to_vec(),
            dataset_shape: DatasetShape {
                rows: catalog.len(),
                columns: original_columns.len(),
            },
            original_columns,
            image_folder: catalog.image_dir().display().to_string(),
            image_support: true,
        })
    }

    /// Servable URL for an image file, checked against the image folder now
    pub fn resolve_image(&self, filename: &str) -> Result<String> {
        Ok(self.snapshot()?.image_url(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{BRAND, CATEGORY};
    use crate::result::NO_RESULTS_MESSAGE;
    use crate::testing::{sample_catalog, HEADER};
    use std::fs;

    #[test]
    fn test_uninitialized_fails_closed() {
        let recommender = Recommender::new(RecommenderConfig::default());
        assert!(!recommender.is_initialized());
        assert!(matches!(recommender.get_options(), Err(Error::NotInitialized)));
        assert!(matches!(
            recommender.get_recommendations(&UserPreferences::new(), 5),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(recommender.get_system_info(), Err(Error::NotInitialized)));
        assert!(matches!(recommender.resolve_image("x.jpg"), Err(Error::NotInitialized)));
        assert_eq!(Error::NotInitialized.to_string(), NOT_INITIALIZED_MESSAGE);
    }

    #[test]
    fn test_open_missing_catalog_stays_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        let recommender = Recommender::open(RecommenderConfig {
            catalog_path: dir.path().join("missing.csv"),
            image_dir: dir.path().to_path_buf(),
            ranker: RankerConfig::default(),
        });
        assert!(!recommender.is_initialized());

        let strict = Recommender::load(RecommenderConfig {
            catalog_path: dir.path().join("missing.csv"),
            image_dir: dir.path().to_path_buf(),
            ranker: RankerConfig::default(),
        });
        assert!(matches!(strict, Err(Error::Io(_))));
    }

    #[test]
    fn test_recommendations_ranked_contiguously() {
        let recommender = Recommender::with_catalog(sample_catalog(), RankerConfig::default());
        let response = recommender
            .get_recommendations(&UserPreferences::new().with(BRAND, "Logitech"), 3)
            .unwrap();
        assert_eq!(response.len(), 3);
        assert!(response.message.is_none());
        let ranks: Vec<usize> = response.recommendations.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(response.recommendations.iter().all(|r| r.brand == "Logitech"));
    }

    #[test]
    fn test_no_match_returns_message() {
        let recommender = Recommender::with_catalog(sample_catalog(), RankerConfig::default());
        let prefs = UserPreferences::new().with(BRAND, "Razer").with(CATEGORY, "Office");
        let response = recommender.get_recommendations(&prefs, 5).unwrap();
        assert!(response.is_empty());
        assert_eq!(response.message.as_deref(), Some(NO_RESULTS_MESSAGE));

        let response = recommender.get_recommendations(&UserPreferences::new(), 0).unwrap();
        assert!(response.is_empty());
        assert_eq!(response.message.as_deref(), Some(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn test_system_info() {
        let recommender = Recommender::with_catalog(sample_catalog(), RankerConfig::default());
        let info = recommender.get_system_info().unwrap();
        assert_eq!(info.model_name, MODEL_NAME);
        assert_eq!(info.total_data, 6);
        assert_eq!(info.feature_columns.len(), 13);
        assert_eq!(info.dataset_shape, DatasetShape { rows: 6, columns: 16 });
        assert_eq!(info.original_columns[0], "Name");
        assert!(info.image_support);
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("mice.csv");
        let row = "G Pro,Logitech,Wireless,Battery,70 hours,Mechanical,Medium,Symmetrical,Gaming,1500,63,25600,1000,5,gpro.jpg,";
        fs::write(&csv, format!("{HEADER}\n{row}\n")).unwrap();

        let recommender = Recommender::load(RecommenderConfig {
            catalog_path: csv.clone(),
            image_dir: dir.path().to_path_buf(),
            ranker: RankerConfig::default(),
        })
        .unwrap();
        let before = recommender.snapshot().unwrap();
        assert_eq!(before.len(), 1);

        fs::write(&csv, format!("{HEADER}\n{row}\n{row}\n")).unwrap();
        recommender.reload().unwrap();
        assert_eq!(recommender.snapshot().unwrap().len(), 2);
        // Earlier readers keep their snapshot
        assert_eq!(before.len(), 1);

        fs::remove_file(&csv).unwrap();
        assert!(recommender.reload().is_err());
        assert_eq!(recommender.snapshot().unwrap().len(), 2);
    }

    #[test]
    fn test_resolve_image() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Viper.PNG"), b"png").unwrap();
        let catalog = mouserec_core::NormalizedCatalog::from_reader(
            format!("{HEADER}\nViper,Razer,Wired,,,Optical,Medium,Symmetrical,Gaming,500,69,20000,1000,8,viper.png,\n").as_bytes(),
            dir.path(),
        )
        .unwrap();
        let recommender = Recommender::with_catalog(catalog, RankerConfig::default());
        assert_eq!(recommender.resolve_image("viper.png").unwrap(), "/api/images/Viper.PNG");
        assert_eq!(recommender.resolve_image("missing.jpg").unwrap(), "/api/images/default.jpg");
        assert_eq!(recommender.resolve_image("  ").unwrap(), "/api/images/default.jpg");
    }
}
