use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestamp: '{value}'")]
    InvalidTimestamp { value: String },

    #[error("Required column '{column}' not found")]
    MissingColumn { column: String },

    #[error("Column '{column}' has type {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Cannot aggregate an empty table")]
    EmptyTable,

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Synthetic data generation error: {0}")]
    Generation(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    pub fn missing_column(column: &str) -> Self {
        ProcessingError::MissingColumn {
            column: column.to_string(),
        }
    }
}
