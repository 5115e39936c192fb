//! Catalog loading and normalization
//!
//! Turns the raw CSV rows into an immutable [`NormalizedCatalog`]: repaired
//! records, the feature matrix, and the [`FeatureSpace`] (encoders, scalers,
//! column medians) that every per-request vector must be built against.

use crate::encoder::{median, LabelEncoder, MinMaxScaler};
use crate::image::{image_url, repair_image_references, standardize_image_name};
use crate::matrix::FeatureMatrix;
use crate::record::{
    is_missing, CatalogRecord, CategoricalField, NumericField, RawCatalog, LINK_COLUMN,
    REQUIRED_COLUMNS, UNKNOWN,
};
use crate::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Encoders, scalers and column medians learned from one catalog.
///
/// Column layout: encoded categoricals in [`CategoricalField::ALL`] order,
/// then scaled numerics in [`NumericField::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpace {
    columns: Vec<String>,
    encoders: Vec<LabelEncoder>,
    scalers: Vec<MinMaxScaler>,
    medians: Vec<f64>,
}

impl FeatureSpace {
    #[inline]
    pub fn dim(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn encoder(&self, field: CategoricalField) -> &LabelEncoder {
        &self.encoders[field.index()]
    }

    pub fn scaler(&self, field: NumericField) -> &MinMaxScaler {
        &self.scalers[field.index()]
    }

    /// Column-wise median of the full feature matrix
    pub fn medians(&self) -> &[f64] {
        &self.medians
    }

    #[inline]
    pub fn categorical_column(field: CategoricalField) -> usize {
        field.index()
    }

    #[inline]
    pub fn numeric_column(field: NumericField) -> usize {
        CategoricalField::ALL.len() + field.index()
    }
}

/// The catalog as served: loaded once, never mutated
#[derive(Debug, Clone)]
pub struct NormalizedCatalog {
    raw: RawCatalog,
    records: Vec<CatalogRecord>,
    matrix: FeatureMatrix,
    space: FeatureSpace,
    image_dir: PathBuf,
}

impl NormalizedCatalog {
    /// Load and normalize a CSV catalog
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(csv_path: P, image_dir: Q) -> Result<Self> {
        let csv_path = csv_path.as_ref();
        info!("Loading catalog from {:?}", csv_path);
        let file = File::open(csv_path)?;
        Self::from_reader(file, image_dir)
    }

    pub fn from_reader<R: Read, Q: AsRef<Path>>(reader: R, image_dir: Q) -> Result<Self> {
        let raw = read_raw_catalog(reader)?;
        Self::from_raw(raw, image_dir.as_ref())
    }

    pub fn from_raw(raw: RawCatalog, image_dir: &Path) -> Result<Self> {
        for column in REQUIRED_COLUMNS {
            if raw.column_index(column).is_none() {
                return Err(Error::MissingColumn(column.to_string()));
            }
        }
        if raw.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        info!("Dataset loaded: {} mice", raw.len());

        let text = |name: &str| -> Vec<String> {
            raw.column(name)
                .map(|values| values.map(|v| v.trim().to_string()).collect())
                .unwrap_or_default()
        };

        let categorical: Vec<Vec<String>> = CategoricalField::ALL
            .iter()
            .map(|field| {
                text(field.column())
                    .into_iter()
                    .map(|v| if is_missing(&v) { UNKNOWN.to_string() } else { v })
                    .collect()
            })
            .collect();

        let images: Vec<String> = text("Image")
            .iter()
            .map(|v| standardize_image_name(v))
            .collect();

        let numeric: Vec<Vec<f64>> = NumericField::ALL
            .iter()
            .map(|field| coerce_numeric_column(&raw, *field))
            .collect::<Result<_>>()?;

        let encoders: Vec<LabelEncoder> = categorical
            .iter()
            .map(|values| LabelEncoder::fit(values.iter().map(String::as_str)))
            .collect();

        let scalers: Vec<MinMaxScaler> = NumericField::ALL
            .iter()
            .zip(&numeric)
            .map(|(field, values)| {
                MinMaxScaler::fit(values).ok_or_else(|| Error::EmptyColumn(field.column().to_string()))
            })
            .collect::<Result<_>>()?;

        let mut columns = Vec::with_capacity(CategoricalField::ALL.len() + NumericField::ALL.len());
        let mut values = Vec::with_capacity(columns.capacity());
        for (field, (labels, encoder)) in CategoricalField::ALL.iter().zip(categorical.iter().zip(&encoders)) {
            columns.push(field.feature_name());
            values.push(
                labels
                    .iter()
                    .map(|label| encoder.encode(label).unwrap_or_default() as f64)
                    .collect(),
            );
        }
        for (field, (raw_values, scaler)) in NumericField::ALL.iter().zip(numeric.iter().zip(&scalers)) {
            columns.push(field.column().to_string());
            values.push(raw_values.iter().map(|v| scaler.transform(*v)).collect());
        }

        let matrix = FeatureMatrix::from_columns(columns.clone(), values)?;
        let medians = matrix.column_medians();
        let space = FeatureSpace {
            columns,
            encoders,
            scalers,
            medians,
        };

        let names = text("Name");
        let links: Vec<Option<String>> = match raw.column(LINK_COLUMN) {
            Some(values) => values
                .map(|v| if is_missing(v) { None } else { Some(v.trim().to_string()) })
                .collect(),
            None => vec![None; raw.len()],
        };

        let cat = |field: CategoricalField, i: usize| categorical[field.index()][i].clone();
        let num = |field: NumericField, i: usize| numeric[field.index()][i];

        let records: Vec<CatalogRecord> = (0..raw.len())
            .map(|i| CatalogRecord {
                name: names[i].clone(),
                brand: cat(CategoricalField::Brand, i),
                link: links[i].clone(),
                connection: cat(CategoricalField::Connection, i),
                power: cat(CategoricalField::Power, i),
                battery_life: cat(CategoricalField::BatteryLife, i),
                buttons_type: cat(CategoricalField::ButtonsType, i),
                size: cat(CategoricalField::Size, i),
                shape: cat(CategoricalField::Shape, i),
                category: cat(CategoricalField::Category, i),
                price: num(NumericField::Price, i),
                weight: num(NumericField::Weight, i),
                dpi: num(NumericField::Dpi, i),
                polling_rate: num(NumericField::PollingRate, i),
                buttons: num(NumericField::Buttons, i),
                image: images[i].clone(),
            })
            .collect();

        let records = repair_image_references(records, image_dir);

        info!("Data preprocessing completed");
        info!("Feature matrix shape: ({}, {})", matrix.n_rows(), matrix.n_cols());
        debug!("Available columns: {:?}", raw.headers());

        Ok(Self {
            raw,
            records,
            matrix,
            space,
            image_dir: image_dir.to_path_buf(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn raw(&self) -> &RawCatalog {
        &self.raw
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&CatalogRecord> {
        self.records.get(index)
    }

    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    pub fn space(&self) -> &FeatureSpace {
        &self.space
    }

    pub fn feature_columns(&self) -> &[String] {
        self.space.columns()
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Servable URL for an image file, re-checked against the image folder
    pub fn image_url(&self, filename: &str) -> String {
        image_url(&self.image_dir, filename)
    }
}

/// Read CSV rows with trimmed headers and cells
pub fn read_raw_catalog<R: Read>(reader: R) -> Result<RawCatalog> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<std::result::Result<Vec<Vec<String>>, csv::Error>>()?;

    Ok(RawCatalog::new(headers, rows))
}

/// Parse a numeric cell; unparseable and non-finite values count as missing
pub fn parse_numeric(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce one numeric column and fill its gaps with the column median
fn coerce_numeric_column(raw: &RawCatalog, field: NumericField) -> Result<Vec<f64>> {
    let parsed: Vec<Option<f64>> = raw
        .column(field.column())
        .map(|values| values.map(parse_numeric).collect())
        .unwrap_or_default();

    let present: Vec<f64> = parsed.iter().flatten().copied().collect();
    let fill = median(&present).ok_or_else(|| Error::EmptyColumn(field.column().to_string()))?;

    let missing = parsed.len() - present.len();
    if missing > 0 {
        warn!(
            "{} missing or non-numeric values in {:?}, filled with median {}",
            missing,
            field.column(),
            fill
        );
    }

    Ok(parsed.into_iter().map(|v| v.unwrap_or(fill)).collect())
}
