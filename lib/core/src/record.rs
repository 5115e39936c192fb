use serde::{Deserialize, Serialize};

/// Sentinel for categorical values that are missing from the source file
pub const UNKNOWN: &str = "Unknown";

/// Sentinel image reference used whenever no real file can be found
pub const DEFAULT_IMAGE: &str = "default.jpg";

/// Columns every catalog file must carry. `Link` is optional.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "Name",
    "Brand",
    "Connection",
    "Power",
    "Battery Life",
    "Buttons Type",
    "Size",
    "Shape",
    "Category",
    "Price",
    "Weight",
    "DPI",
    "Polling Rate",
    "Buttons",
    "Image",
];

pub const LINK_COLUMN: &str = "Link";

/// A categorical catalog column, in the order it appears in the feature matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalField {
    Brand,
    Connection,
    Power,
    BatteryLife,
    ButtonsType,
    Size,
    Shape,
    Category,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 8] = [
        CategoricalField::Brand,
        CategoricalField::Connection,
        CategoricalField::Power,
        CategoricalField::BatteryLife,
        CategoricalField::ButtonsType,
        CategoricalField::Size,
        CategoricalField::Shape,
        CategoricalField::Category,
    ];

    /// Header name in the source file
    pub fn column(self) -> &'static str {
        match self {
            CategoricalField::Brand => "Brand",
            CategoricalField::Connection => "Connection",
            CategoricalField::Power => "Power",
            CategoricalField::BatteryLife => "Battery Life",
            CategoricalField::ButtonsType => "Buttons Type",
            CategoricalField::Size => "Size",
            CategoricalField::Shape => "Shape",
            CategoricalField::Category => "Category",
        }
    }

    /// Position among the categorical columns
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name of the encoded column in the feature matrix
    pub fn feature_name(self) -> String {
        format!("{}_encoded", self.column())
    }
}

/// A numeric catalog column, in the order it appears in the feature matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    Price,
    Weight,
    Dpi,
    PollingRate,
    Buttons,
}

impl NumericField {
    pub const ALL: [NumericField; 5] = [
        NumericField::Price,
        NumericField::Weight,
        NumericField::Dpi,
        NumericField::PollingRate,
        NumericField::Buttons,
    ];

    pub fn column(self) -> &'static str {
        match self {
            NumericField::Price => "Price",
            NumericField::Weight => "Weight",
            NumericField::Dpi => "DPI",
            NumericField::PollingRate => "Polling Rate",
            NumericField::Buttons => "Buttons",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One normalized catalog row.
///
/// Numeric fields hold the values *before* min-max scaling; the scaled
/// values only live in the feature matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    pub brand: String,
    pub link: Option<String>,
    pub connection: String,
    pub power: String,
    pub battery_life: String,
    pub buttons_type: String,
    pub size: String,
    pub shape: String,
    pub category: String,
    pub price: f64,
    pub weight: f64,
    pub dpi: f64,
    pub polling_rate: f64,
    pub buttons: f64,
    pub image: String,
}

impl CatalogRecord {
    pub fn categorical(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Brand => &self.brand,
            CategoricalField::Connection => &self.connection,
            CategoricalField::Power => &self.power,
            CategoricalField::BatteryLife => &self.battery_life,
            CategoricalField::ButtonsType => &self.buttons_type,
            CategoricalField::Size => &self.size,
            CategoricalField::Shape => &self.shape,
            CategoricalField::Category => &self.category,
        }
    }

    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Price => self.price,
            NumericField::Weight => self.weight,
            NumericField::Dpi => self.dpi,
            NumericField::PollingRate => self.polling_rate,
            NumericField::Buttons => self.buttons,
        }
    }
}

/// Catalog rows as read from disk, with trimmed headers and cells.
///
/// Kept next to the normalized records because option listings are derived
/// from what the file actually says, not from the sentinel-filled values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCatalog {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawCatalog {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `row`/`col`; short rows read as empty cells
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Every value of the named column, or `None` if the column is absent
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let col = self.column_index(name)?;
        Some((0..self.rows.len()).map(move |row| self.cell(row, col)))
    }
}

/// Whether a raw cell should be treated as a missing value
pub fn is_missing(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || ["nan", "none", "null", "n/a"]
            .iter()
            .any(|marker| value.eq_ignore_ascii_case(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_matches_declared_columns() {
        let names: Vec<_> = CategoricalField::ALL.iter().map(|f| f.column()).collect();
        assert_eq!(
            names,
            vec!["Brand", "Connection", "Power", "Battery Life", "Buttons Type", "Size", "Shape", "Category"]
        );
        for (i, field) in NumericField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
        assert_eq!(CategoricalField::BatteryLife.feature_name(), "Battery Life_encoded");
    }

    #[test]
    fn test_raw_catalog_short_rows() {
        let raw = RawCatalog::new(
            vec!["Name".to_string(), "Link".to_string()],
            vec![vec!["G Pro".to_string()]],
        );
        assert_eq!(raw.cell(0, 1), "");
        let links: Vec<_> = raw.column("Link").unwrap().collect();
        assert_eq!(links, vec![""]);
        assert!(raw.column("Image").is_none());
    }

    #[test]
    fn test_missing_markers() {
        assert!(is_missing(""));
        assert!(is_missing("  "));
        assert!(is_missing("NaN"));
        assert!(is_missing("None"));
        assert!(!is_missing("Wireless"));
    }
}
