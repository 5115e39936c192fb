use crate::encoder::median;
use crate::{Error, Result};

/// Row-major feature matrix with named columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    data: Vec<f64>,
    n_rows: usize,
}

impl FeatureMatrix {
    /// Assemble a matrix from column vectors, all of which must have the same length
    pub fn from_columns(columns: Vec<String>, values: Vec<Vec<f64>>) -> Result<Self> {
        if columns.len() != values.len() {
            return Err(Error::InvalidDimension {
                expected: columns.len(),
                actual: values.len(),
            });
        }

        let n_rows = values.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = values.iter().find(|col| col.len() != n_rows) {
            return Err(Error::InvalidDimension {
                expected: n_rows,
                actual: bad.len(),
            });
        }

        let n_cols = columns.len();
        let mut data = vec![0.0; n_rows * n_cols];
        for (j, column) in values.iter().enumerate() {
            for (i, value) in column.iter().enumerate() {
                data[i * n_cols + j] = *value;
            }
        }

        Ok(Self { columns, data, n_rows })
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let n_cols = self.n_cols();
        &self.data[i * n_cols..(i + 1) * n_cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n_cols() + j]
    }

    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.n_rows).map(|i| self.get(i, j)).collect()
    }

    /// Median of every column; 0.0 for columns of an empty matrix
    pub fn column_medians(&self) -> Vec<f64> {
        (0..self.n_cols())
            .map(|j| median(&self.column(j)).unwrap_or(0.0))
            .collect()
    }
}
