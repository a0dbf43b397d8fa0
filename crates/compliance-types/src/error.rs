//! Error types for driver-checker

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Errors raised while reading the driver CSV
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV file is empty")]
    Empty,

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Missing DriverId in row {row}")]
    MissingDriverId { row: usize },
}

/// Errors raised while writing result files
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel export error: {0}")]
    Excel(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("CSV loader error: {0}")]
    Loader(#[from] LoaderError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid reference date: {0} (expected YYYY-MM-DD)")]
    InvalidReferenceDate(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message() {
        let err: Error = LoaderError::MissingColumn("DOTExpirationDate".to_string()).into();
        assert_eq!(
            err.to_string(),
            "CSV loader error: Missing required column: DOTExpirationDate"
        );
    }

    #[test]
    fn test_missing_driver_id_message() {
        let err = LoaderError::MissingDriverId { row: 4 };
        assert_eq!(err.to_string(), "Missing DriverId in row 4");
    }
}
