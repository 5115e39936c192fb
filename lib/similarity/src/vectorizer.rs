//! Preference vectorizer
//!
//! Builds a user vector in the catalog's feature space. Columns the user did
//! not speak to take the catalog median, so an absent preference does not pull
//! the ranking toward the low end of any range.

use crate::preferences::{UserPreferences, BUTTONS, CATEGORICAL_KEYS, DPI_MIN, PRICE_MAX};
use mouserec_core::{FeatureSpace, NumericField, Vector};
use tracing::debug;

/// Numeric threshold preferences and the column each one targets
pub const NUMERIC_KEYS: [(&str, NumericField); 3] = [
    (PRICE_MAX, NumericField::Price),
    (DPI_MIN, NumericField::Dpi),
    (BUTTONS, NumericField::Buttons),
];

#[derive(Debug, Clone, Copy)]
pub struct PreferenceVectorizer<'a> {
    space: &'a FeatureSpace,
}

impl<'a> PreferenceVectorizer<'a> {
    pub fn new(space: &'a FeatureSpace) -> Self {
        Self { space }
    }

    /// Encode `prefs` into a vector with the same width and column order as the feature matrix
    pub fn vectorize(&self, prefs: &UserPreferences) -> Vector {
        let mut values = self.space.medians().to_vec();

        for (key, field) in CATEGORICAL_KEYS {
            let Some(label) = prefs.get(key) else { continue };
            match self.space.encoder(field).encode(label) {
                Some(code) => {
                    values[FeatureSpace::categorical_column(field)] = code as f64;
                    debug!("Encoded {}: {:?} -> {}", field.column(), label, code);
                }
                None => debug!("Unknown {} {:?}, using catalog median", field.column(), label),
            }
        }

        for (key, field) in NUMERIC_KEYS {
            if let Some(value) = prefs.number(key) {
                let scaled = self.space.scaler(field).transform_clamped(value);
                values[FeatureSpace::numeric_column(field)] = scaled;
                debug!("Normalized {}: {} -> {}", field.column(), value, scaled);
            }
        }

        if let Some(class) = prefs.weight_class() {
            let scaler = self.space.scaler(NumericField::Weight);
            let target = scaler.point_at(class.target_fraction());
            let scaled = scaler.transform_clamped(target);
            values[FeatureSpace::numeric_column(NumericField::Weight)] = scaled;
            debug!("Weight preference: {:?} -> {}", class, scaled);
        }

        debug!("User vector created with {} features", values.len());
        Vector::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{BRAND, CONNECTION, WEIGHT_PREF};
    use crate::testing::sample_catalog;
    use mouserec_core::CategoricalField;

    #[test]
    fn test_empty_preferences_give_median_vector() {
        let catalog = sample_catalog();
        let vector = PreferenceVectorizer::new(catalog.space()).vectorize(&UserPreferences::new());
        assert_eq!(vector.dim(), catalog.matrix().n_cols());
        assert_eq!(vector.as_slice(), catalog.matrix().column_medians().as_slice());
    }

    #[test]
    fn test_known_label_sets_code() {
        let catalog = sample_catalog();
        let prefs = UserPreferences::new().with(BRAND, "Razer").with(CONNECTION, "Wireless");
        let vector = PreferenceVectorizer::new(catalog.space()).vectorize(&prefs);

        let brand_col = FeatureSpace::categorical_column(CategoricalField::Brand);
        let conn_col = FeatureSpace::categorical_column(CategoricalField::Connection);
        // Logitech = 0, Razer = 1; Wired = 0, Wireless = 1
        assert_eq!(vector.as_slice()[brand_col], 1.0);
        assert_eq!(vector.as_slice()[conn_col], 1.0);
    }

    #[test]
    fn test_unknown_label_falls_back_to_median() {
        let catalog = sample_catalog();
        let prefs = UserPreferences::new().with(BRAND, "Corsair");
        let vector = PreferenceVectorizer::new(catalog.space()).vectorize(&prefs);
        let brand_col = FeatureSpace::categorical_column(CategoricalField::Brand);
        assert_eq!(vector.as_slice()[brand_col], catalog.space().medians()[brand_col]);
    }

    #[test]
    fn test_numeric_preferences_are_clamped() {
        let catalog = sample_catalog();
        let space = catalog.space();
        let vectorizer = PreferenceVectorizer::new(space);

        let high = vectorizer.vectorize(&UserPreferences::new().with(PRICE_MAX, "99999999"));
        let low = vectorizer.vectorize(&UserPreferences::new().with(DPI_MIN, "-5"));
        let price_col = FeatureSpace::numeric_column(NumericField::Price);
        let dpi_col = FeatureSpace::numeric_column(NumericField::Dpi);
        assert_eq!(high.as_slice()[price_col], 1.0);
        assert_eq!(low.as_slice()[dpi_col], 0.0);
        assert!(high.as_slice().iter().chain(low.as_slice()).all(|v| v.is_finite()));
    }

    #[test]
    fn test_unparseable_number_is_ignored() {
        let catalog = sample_catalog();
        let vectorizer = PreferenceVectorizer::new(catalog.space());
        let vector = vectorizer.vectorize(&UserPreferences::new().with(PRICE_MAX, "cheap"));
        assert_eq!(vector.as_slice(), catalog.space().medians());
    }

    #[test]
    fn test_weight_class_targets() {
        let catalog = sample_catalog();
        let vectorizer = PreferenceVectorizer::new(catalog.space());
        let weight_col = FeatureSpace::numeric_column(NumericField::Weight);

        for (class, expected) in [("light", 0.2), ("medium", 0.5), ("heavy", 0.8)] {
            let vector = vectorizer.vectorize(&UserPreferences::new().with(WEIGHT_PREF, class));
            assert!((vector.as_slice()[weight_col] - expected).abs() < 1e-9);
        }
    }
}
