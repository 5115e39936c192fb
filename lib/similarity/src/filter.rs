//! Declarative record filters
//!
//! Filters run in a fixed order and each one narrows the survivors of the
//! previous one. The weight band is special: its thresholds are derived from
//! a pool of weights, which by default is the set still standing when the band
//! filter runs.

use crate::preferences::{
    UserPreferences, WeightClass, BRAND, BUTTONS, CATEGORY, CONNECTION, DPI_MIN, PRICE_MAX, SHAPE, SIZE,
};
use mouserec_core::{CatalogRecord, CategoricalField, MinMaxScaler};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Order in which exact-match filters are applied
pub const EXACT_MATCH_KEYS: [(&str, CategoricalField); 5] = [
    (CATEGORY, CategoricalField::Category),
    (BRAND, CategoricalField::Brand),
    (CONNECTION, CategoricalField::Connection),
    (SIZE, CategoricalField::Size),
    (SHAPE, CategoricalField::Shape),
];

pub trait Filter {
    fn matches(&self, record: &CatalogRecord) -> bool;
}

/// Filters that can be decided from a single record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
    PriceAtMost(f64),
    Equals { field: CategoricalField, value: String },
    DpiAtLeast(f64),
    ButtonsEqual(i64),
}

impl Filter for FieldFilter {
    fn matches(&self, record: &CatalogRecord) -> bool {
        match self {
            FieldFilter::PriceAtMost(max) => record.price <= *max,
            FieldFilter::Equals { field, value } => {
                record.categorical(*field).trim().to_lowercase() == value.to_lowercase()
            }
            FieldFilter::DpiAtLeast(min) => record.dpi >= *min,
            FieldFilter::ButtonsEqual(count) => record.buttons == *count as f64,
        }
    }
}

/// Which weights the band thresholds are computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightBandScope {
    /// Records still standing when the band filter runs
    #[default]
    Filtered,
    /// The whole catalog, independent of the earlier filters
    Catalog,
}

/// A weight class bound to concrete thresholds. Both edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightBand {
    class: WeightClass,
    bounds: MinMaxScaler,
}

impl WeightBand {
    /// Bind `class` to the spread of `weights`; `None` when there are no weights
    pub fn fit(class: WeightClass, weights: &[f64]) -> Option<Self> {
        MinMaxScaler::fit(weights).map(|bounds| Self { class, bounds })
    }

    pub fn contains(&self, weight: f64) -> bool {
        match self.class {
            WeightClass::Light => weight <= self.bounds.point_at(0.4),
            WeightClass::Medium => {
                weight >= self.bounds.point_at(0.3) && weight <= self.bounds.point_at(0.7)
            }
            WeightClass::Heavy => weight >= self.bounds.point_at(0.6),
        }
    }
}

impl Filter for WeightBand {
    fn matches(&self, record: &CatalogRecord) -> bool {
        self.contains(record.weight)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    Field(FieldFilter),
    WeightBand(WeightClass),
}

/// Ordered AND of every filter the preferences activate
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPipeline {
    conditions: Vec<FilterCondition>,
    scope: WeightBandScope,
}

impl FilterPipeline {
    /// Price, exact matches, weight band, DPI, buttons; each only when its key is set
    pub fn from_preferences(prefs: &UserPreferences, scope: WeightBandScope) -> Self {
        let mut conditions = Vec::new();

        if let Some(max) = prefs.number(PRICE_MAX) {
            conditions.push(FilterCondition::Field(FieldFilter::PriceAtMost(max)));
        }
        for (key, field) in EXACT_MATCH_KEYS {
            if let Some(value) = prefs.get(key) {
                conditions.push(FilterCondition::Field(FieldFilter::Equals {
                    field,
                    value: value.to_string(),
                }));
            }
        }
        if let Some(class) = prefs.weight_class() {
            conditions.push(FilterCondition::WeightBand(class));
        }
        if let Some(min) = prefs.number(DPI_MIN) {
            conditions.push(FilterCondition::Field(FieldFilter::DpiAtLeast(min)));
        }
        if let Some(count) = prefs.integer(BUTTONS) {
            conditions.push(FilterCondition::Field(FieldFilter::ButtonsEqual(count)));
        }

        Self { conditions, scope }
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Narrow `candidates` (indices into `records`) through every condition in order
    pub fn apply(&self, records: &[CatalogRecord], candidates: Vec<usize>) -> Vec<usize> {
        let mut remaining = candidates;

        for condition in &self.conditions {
            remaining = match condition {
                FilterCondition::Field(filter) => retain(records, remaining, filter),
                FilterCondition::WeightBand(class) => {
                    let pool: Vec<f64> = match self.scope {
                        WeightBandScope::Filtered => remaining.iter().map(|&i| records[i].weight).collect(),
                        WeightBandScope::Catalog => records.iter().map(|r| r.weight).collect(),
                    };
                    match WeightBand::fit(*class, &pool) {
                        Some(band) => retain(records, remaining, &band),
                        None => remaining,
                    }
                }
            };
            debug!("Applied {:?}: {} remaining", condition, remaining.len());
        }

        remaining
    }
}

fn retain<F: Filter + ?Sized>(records: &[CatalogRecord], candidates: Vec<usize>, filter: &F) -> Vec<usize> {
    candidates
        .into_iter()
        .filter(|&i| filter.matches(&records[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::WEIGHT_PREF;
    use crate::testing::sample_catalog;

    fn run(prefs: &UserPreferences, scope: WeightBandScope) -> Vec<usize> {
        let catalog = sample_catalog();
        let all = (0..catalog.len()).collect();
        FilterPipeline::from_preferences(prefs, scope).apply(catalog.records(), all)
    }

    #[test]
    fn test_no_preferences_no_filters() {
        let pipeline = FilterPipeline::from_preferences(&UserPreferences::new(), WeightBandScope::Filtered);
        assert!(pipeline.is_empty());
        assert_eq!(run(&UserPreferences::new(), WeightBandScope::Filtered), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_fixed_order() {
        let prefs = UserPreferences::new()
            .with(BUTTONS, "5")
            .with(DPI_MIN, "1000")
            .with(WEIGHT_PREF, "light")
            .with(SHAPE, "Symmetrical")
            .with(BRAND, "Logitech")
            .with(CATEGORY, "Gaming")
            .with(PRICE_MAX, "3000000");
        let pipeline = FilterPipeline::from_preferences(&prefs, WeightBandScope::Filtered);
        let kinds: Vec<String> = pipeline
            .conditions()
            .iter()
            .map(|c| match c {
                FilterCondition::Field(FieldFilter::PriceAtMost(_)) => "price".to_string(),
                FilterCondition::Field(FieldFilter::Equals { field, .. }) => field.column().to_string(),
                FilterCondition::WeightBand(_) => "weight".to_string(),
                FilterCondition::Field(FieldFilter::DpiAtLeast(_)) => "dpi".to_string(),
                FilterCondition::Field(FieldFilter::ButtonsEqual(_)) => "buttons".to_string(),
            })
            .collect();
        assert_eq!(kinds, vec!["price", "Category", "Brand", "Shape", "weight", "dpi", "buttons"]);
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let prefs = UserPreferences::new().with(BRAND, "razer").with(SIZE, "LARGE");
        assert_eq!(run(&prefs, WeightBandScope::Filtered), vec![3]);
    }

    #[test]
    fn test_price_and_dpi_thresholds_inclusive() {
        let prefs = UserPreferences::new().with(PRICE_MAX, "900000").with(DPI_MIN, "8500");
        assert_eq!(run(&prefs, WeightBandScope::Filtered), vec![1, 2, 3]);
    }

    #[test]
    fn test_buttons_exact() {
        let prefs = UserPreferences::new().with(BUTTONS, "11");
        assert_eq!(run(&prefs, WeightBandScope::Filtered), vec![1]);
    }

    #[test]
    fn test_invalid_numeric_filter_is_skipped() {
        let prefs = UserPreferences::new().with(PRICE_MAX, "lots").with(BUTTONS, "many");
        assert_eq!(run(&prefs, WeightBandScope::Filtered).len(), 6);
    }

    #[test]
    fn test_weight_bands_cover_every_record() {
        // weights 63, 121, 61, 82, 141, 100: min 61, range 80
        let light = run(&UserPreferences::new().with(WEIGHT_PREF, "light"), WeightBandScope::Filtered);
        let medium = run(&UserPreferences::new().with(WEIGHT_PREF, "medium"), WeightBandScope::Filtered);
        let heavy = run(&UserPreferences::new().with(WEIGHT_PREF, "heavy"), WeightBandScope::Filtered);
        assert_eq!(light, vec![0, 2, 3]);
        assert_eq!(medium, vec![5]);
        assert_eq!(heavy, vec![1, 4]);

        for i in 0..6 {
            assert!(light.contains(&i) || medium.contains(&i) || heavy.contains(&i));
        }
    }

    #[test]
    fn test_weight_band_edges_inclusive() {
        let band = WeightBand::fit(WeightClass::Medium, &[0.0, 100.0]).unwrap();
        assert!(band.contains(30.0));
        assert!(band.contains(70.0));
        assert!(!band.contains(29.9));
        let light = WeightBand::fit(WeightClass::Light, &[0.0, 100.0]).unwrap();
        assert!(light.contains(40.0));
        let heavy = WeightBand::fit(WeightClass::Heavy, &[0.0, 100.0]).unwrap();
        assert!(heavy.contains(60.0));
        assert!(WeightBand::fit(WeightClass::Heavy, &[]).is_none());
    }

    #[test]
    fn test_weight_band_scope() {
        // After the Razer filter only 61 and 82 remain: heavy >= 61 + 0.6 * 21
        let prefs = UserPreferences::new().with(BRAND, "Razer").with(WEIGHT_PREF, "heavy");
        assert_eq!(run(&prefs, WeightBandScope::Filtered), vec![3]);
        // Over the whole catalog heavy starts at 109, which no Razer mouse reaches
        assert!(run(&prefs, WeightBandScope::Catalog).is_empty());
    }

    #[test]
    fn test_unrecognized_weight_pref_adds_no_band() {
        let prefs = UserPreferences::new().with(WEIGHT_PREF, "feather");
        assert!(FilterPipeline::from_preferences(&prefs, WeightBandScope::Filtered).is_empty());
        assert_eq!(run(&prefs, WeightBandScope::Filtered), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unknown_brand_removes_everything() {
        let prefs = UserPreferences::new().with(BRAND, "Corsair");
        assert!(run(&prefs, WeightBandScope::Filtered).is_empty());
    }
}
