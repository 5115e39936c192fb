//! Load-time feature encoders
//!
//! Both encoders are fitted once from the catalog and never change afterwards.
//! The same fitted values are used to encode catalog rows and user preferences,
//! which is what keeps the two comparable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bijection between the observed labels of one categorical column and integer codes.
///
/// Codes follow the sorted order of the labels, so a fixed input always
/// produces the same encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    codes: BTreeMap<String, usize>,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit an encoder from every label observed in a column
    pub fn fit<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut codes: BTreeMap<String, usize> = labels
            .into_iter()
            .map(|label| (label.to_string(), 0))
            .collect();

        let mut classes = Vec::with_capacity(codes.len());
        for (code, (label, slot)) in codes.iter_mut().enumerate() {
            *slot = code;
            classes.push(label.clone());
        }

        Self { codes, classes }
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.codes.get(label).copied()
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.codes.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Min-max bounds of one numeric column.
///
/// A degenerate column (min == max) scales every value to 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Fit from the observed values; `None` for an empty column
    pub fn fit(values: &[f64]) -> Option<Self> {
        let mut iter = values.iter().copied();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Rescale a value into the fitted range. Values outside the observed
    /// bounds land outside [0, 1].
    pub fn transform(&self, value: f64) -> f64 {
        let range = self.range();
        if range > 0.0 {
            (value - self.min) / range
        } else {
            0.0
        }
    }

    /// Rescale and clamp into [0, 1]
    pub fn transform_clamped(&self, value: f64) -> f64 {
        self.transform(value).clamp(0.0, 1.0)
    }

    /// Value located at `fraction` of the way from min to max
    pub fn point_at(&self, fraction: f64) -> f64 {
        self.min + self.range() * fraction
    }
}

/// Median of a set of values; the mean of the two middle values for an even count
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
