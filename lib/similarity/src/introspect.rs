//! Catalog introspection for building preference forms

use mouserec_core::record::is_missing;
use mouserec_core::{CategoricalField, NormalizedCatalog, NumericField, RawCatalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Integer bounds of a numeric column; fractional values are truncated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogOptions {
    pub brands: Vec<String>,
    pub connections: Vec<String>,
    pub sizes: Vec<String>,
    pub shapes: Vec<String>,
    pub categories: Vec<String>,
    pub powers: Vec<String>,
    pub battery_lives: Vec<String>,
    pub button_types: Vec<String>,
    pub price_range: ValueRange,
    pub dpi_range: ValueRange,
    pub weight_range: ValueRange,
    pub buttons_range: ValueRange,
}

impl CatalogOptions {
    pub fn from_catalog(catalog: &NormalizedCatalog) -> Self {
        let raw = catalog.raw();
        let labels = |field: CategoricalField| distinct_values(raw, field.column());
        let range = |field: NumericField| {
            let scaler = catalog.space().scaler(field);
            ValueRange {
                min: scaler.min().trunc() as i64,
                max: scaler.max().trunc() as i64,
            }
        };

        Self {
            brands: labels(CategoricalField::Brand),
            connections: labels(CategoricalField::Connection),
            sizes: labels(CategoricalField::Size),
            shapes: labels(CategoricalField::Shape),
            categories: labels(CategoricalField::Category),
            powers: labels(CategoricalField::Power),
            battery_lives: labels(CategoricalField::BatteryLife),
            button_types: labels(CategoricalField::ButtonsType),
            price_range: range(NumericField::Price),
            dpi_range: range(NumericField::Dpi),
            weight_range: range(NumericField::Weight),
            buttons_range: range(NumericField::Buttons),
        }
    }
}

/// Sorted, de-duplicated, trimmed values of a raw column, without missing markers.
///
/// Missing cells are stored as `Unknown`, so offering `None` or `N/A` would
/// produce filters that never match.
pub fn distinct_values(raw: &RawCatalog, column: &str) -> Vec<String> {
    let Some(values) = raw.column(column) else {
        return Vec::new();
    };
    values
        .map(str::trim)
        .filter(|v| !is_missing(v))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
