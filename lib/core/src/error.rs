use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column missing from catalog: {0}")]
    MissingColumn(String),

    #[error("Catalog contains no rows")]
    EmptyCatalog,

    #[error("Numeric column has no parseable values: {0}")]
    EmptyColumn(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Recommendation system not initialized")]
    NotInitialized,
}
