//! Recommendation wire types

use crate::ranker::RankedRecord;
use mouserec_core::NormalizedCatalog;
use serde::{Deserialize, Serialize};

pub const NO_RESULTS_MESSAGE: &str =
    "No recommendations found matching your criteria. Try adjusting your preferences.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specs {
    pub connection: String,
    pub dpi: String,
    pub weight: String,
    pub buttons: i64,
    pub size: String,
    pub shape: String,
    pub battery_life: String,
    pub polling_rate: String,
    pub button_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub rank: usize,
    pub name: String,
    pub brand: String,
    pub price: String,
    pub similarity_score: String,
    pub image: String,
    pub image_url: String,
    pub specs: Specs,
    pub category: String,
    pub link: Option<String>,
}

impl RecommendationItem {
    /// Render a ranked record for display. `rank` is 1-based.
    pub fn from_ranked(catalog: &NormalizedCatalog, ranked: &RankedRecord, rank: usize) -> Option<Self> {
        let record = catalog.record(ranked.index)?;
        Some(Self {
            rank,
            name: record.name.clone(),
            brand: record.brand.clone(),
            price: format_price(record.price),
            similarity_score: format!("{:.3}", ranked.score),
            image: record.image.clone(),
            image_url: catalog.image_url(&record.image),
            specs: Specs {
                connection: record.connection.clone(),
                dpi: group_thousands(record.dpi),
                weight: format!("{:.0}g", record.weight),
                buttons: record.buttons.trunc() as i64,
                size: record.size.clone(),
                shape: record.shape.clone(),
                battery_life: record.battery_life.clone(),
                polling_rate: format!("{:.0}", record.polling_rate),
                button_type: record.buttons_type.clone(),
            },
            category: record.category.clone(),
            link: record.link.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationItem>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl RecommendationResponse {
    /// Wrap items, attaching the "no results" message when there are none
    pub fn new(recommendations: Vec<RecommendationItem>) -> Self {
        let message = recommendations.is_empty().then(|| NO_RESULTS_MESSAGE.to_string());
        Self {
            recommendations,
            message,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

/// Round to a whole number and separate thousands with commas
pub fn group_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}

pub fn format_price(price: f64) -> String {
    format!("Rp {}", group_thousands(price))
}
