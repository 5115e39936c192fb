//! Similarity ranker
//!
//! Scores every catalog row against the user vector, narrows the candidates
//! with the filter pipeline, then keeps the best `top_n` in score order.

use crate::filter::{FilterPipeline, WeightBandScope};
use crate::preferences::UserPreferences;
use crate::vectorizer::PreferenceVectorizer;
use mouserec_core::{Error, FeatureMatrix, NormalizedCatalog, Result, Vector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankerConfig {
    pub weight_band_scope: WeightBandScope,
}

/// A catalog row index with its similarity to the user vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedRecord {
    pub index: usize,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: RankerConfig,
}

impl Ranker {
    pub fn new(config: RankerConfig) -> Self {
        Self { config }
    }

    /// Cosine similarity of `query` against every row, in row order
    pub fn score_all(matrix: &FeatureMatrix, query: &Vector) -> Result<Vec<f64>> {
        if query.dim() != matrix.n_cols() {
            return Err(Error::InvalidDimension {
                expected: matrix.n_cols(),
                actual: query.dim(),
            });
        }

        Ok((0..matrix.n_rows())
            .into_par_iter()
            .map(|i| query.cosine_similarity(matrix.row(i)))
            .collect())
    }

    /// Best `top_n` records for `prefs`, highest score first. Ties keep catalog order.
    pub fn rank(&self, catalog: &NormalizedCatalog, prefs: &UserPreferences, top_n: usize) -> Result<Vec<RankedRecord>> {
        if top_n == 0 {
            return Ok(Vec::new());
        }

        let query = PreferenceVectorizer::new(catalog.space()).vectorize(prefs);
        let scores = Self::score_all(catalog.matrix(), &query)?;

        let pipeline = FilterPipeline::from_preferences(prefs, self.config.weight_band_scope);
        let survivors = pipeline.apply(catalog.records(), (0..catalog.len()).collect());
        info!("Filtered dataset contains {} mice", survivors.len());

        let mut ranked: Vec<RankedRecord> = survivors
            .into_iter()
            .map(|index| RankedRecord {
                index,
                score: scores[index],
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(top_n);
        debug!("Top scores: {:?}", ranked.iter().map(|r| r.score).collect::<Vec<_>>());

        Ok(ranked)
    }
}
