//! User preferences
//!
//! A sparse, all-optional set of preference values as sent by a client.
//! Anything unusable (unknown keys, nulls, blanks, non-scalar JSON) is
//! dropped here so downstream code only sees trimmed, non-empty strings.

use mouserec_core::catalog::parse_numeric;
use mouserec_core::CategoricalField;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

pub const BRAND: &str = "brand";
pub const CONNECTION: &str = "connection";
pub const SIZE: &str = "size";
pub const SHAPE: &str = "shape";
pub const CATEGORY: &str = "category";
pub const PRICE_MAX: &str = "price_max";
pub const DPI_MIN: &str = "dpi_min";
pub const BUTTONS: &str = "buttons";
pub const WEIGHT_PREF: &str = "weight_pref";

/// Preference keys that map onto a categorical column
pub const CATEGORICAL_KEYS: [(&str, CategoricalField); 5] = [
    (BRAND, CategoricalField::Brand),
    (CONNECTION, CategoricalField::Connection),
    (SIZE, CategoricalField::Size),
    (SHAPE, CategoricalField::Shape),
    (CATEGORY, CategoricalField::Category),
];

/// Qualitative weight preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightClass {
    Light,
    Medium,
    Heavy,
}

impl WeightClass {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "light" => Some(WeightClass::Light),
            "medium" => Some(WeightClass::Medium),
            "heavy" => Some(WeightClass::Heavy),
            _ => None,
        }
    }

    /// Position of the preferred weight within the catalog's weight range
    pub fn target_fraction(self) -> f64 {
        match self {
            WeightClass::Light => 0.2,
            WeightClass::Medium => 0.5,
            WeightClass::Heavy => 0.8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, Value>", into = "BTreeMap<String, String>")]
pub struct UserPreferences {
    values: BTreeMap<String, String>,
}

impl UserPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a preference; blank values are ignored
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl AsRef<str>) -> Self {
        let value = value.as_ref().trim();
        if !value.is_empty() {
            self.values.insert(key.into(), value.to_string());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Trimmed, non-empty value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Numeric value for `key`; unparseable input is logged and treated as absent
    pub fn number(&self, key: &str) -> Option<f64> {
        let raw = self.get(key)?;
        let parsed = parse_numeric(raw);
        if parsed.is_none() {
            warn!("Invalid {} value: {:?}", key, raw);
        }
        parsed
    }

    /// Integer value for `key`; fractional input is truncated toward zero
    pub fn integer(&self, key: &str) -> Option<i64> {
        let raw = self.get(key)?;
        match raw.parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => self.number(key).map(|v| v.trunc() as i64),
        }
    }

    /// Requested weight class; unrecognized classes are logged and ignored
    pub fn weight_class(&self) -> Option<WeightClass> {
        let raw = self.get(WEIGHT_PREF)?;
        let class = WeightClass::parse(raw);
        // Anything other than light, medium or heavy leaves weight unconstrained
        // instead of falling through to a class.
        if class.is_none() {
            warn!("Unknown weight preference: {:?}", raw);
        }
        class
    }
}

impl From<HashMap<String, Value>> for UserPreferences {
    fn from(map: HashMap<String, Value>) -> Self {
        map.into_iter()
            .fold(UserPreferences::new(), |prefs, (key, value)| match value {
                Value::String(s) => prefs.with(key, s),
                Value::Number(n) => prefs.with(key, n.to_string()),
                _ => prefs,
            })
    }
}

impl From<UserPreferences> for BTreeMap<String, String> {
    fn from(prefs: UserPreferences) -> Self {
        prefs.values
    }
}
