//! Data error types.

use thiserror::Error;

/// Sensor data errors.
#[derive(Debug, Error)]
pub enum DataError {
    /// Underlying file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV structure
    #[error("CSV error at line {line}: {message}")]
    Csv { line: u64, message: String },

    /// Required column missing from the header
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Timestamp cell could not be parsed
    #[error("Invalid timestamp at row {row}, column '{column}': {value:?}")]
    ParseTimestamp {
        row: usize,
        column: String,
        value: String,
    },

    /// Value cell could not be parsed as a float
    #[error("Invalid value at row {row}, column '{column}': {value:?}")]
    ParseValue {
        row: usize,
        column: String,
        value: String,
    },

    /// No rows in the input
    #[error("No data rows found")]
    NoData,

    /// Loader configuration is unusable
    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_error_display() {
        let error = DataError::Csv {
            line: 12,
            message: "found record with 3 fields".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "CSV error at line 12: found record with 3 fields"
        );
    }

    #[test]
    fn test_missing_column_display() {
        let error = DataError::MissingColumn("value".to_string());
        assert_eq!(error.to_string(), "Missing column: value");
    }

    #[test]
    fn test_parse_timestamp_names_row_and_column() {
        let error = DataError::ParseTimestamp {
            row: 7,
            column: "timestamp".to_string(),
            value: "yesterday".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid timestamp at row 7, column 'timestamp': \"yesterday\""
        );
    }

    #[test]
    fn test_parse_value_names_row_and_column() {
        let error = DataError::ParseValue {
            row: 3,
            column: "value".to_string(),
            value: "n/a".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid value at row 3, column 'value': \"n/a\""
        );
    }

    #[test]
    fn test_no_data_display() {
        assert_eq!(DataError::NoData.to_string(), "No data rows found");
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let error: DataError = io.into();
        assert!(matches!(error, DataError::Io(_)));
        assert!(error.to_string().contains("missing.csv"));
    }

    #[test]
    fn test_result_type_err() {
        let result: Result<i32> = Err(DataError::NoData);
        assert!(matches!(result.unwrap_err(), DataError::NoData));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DataError>();
    }
}
