use thiserror::Error;

/// Whole-pipeline failures. Row-level problems never surface here; they
/// are absorbed by the zero / sentinel defaults in the pipeline.
#[derive(Error, Debug)]
pub enum SlaError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Required column '{column}' not found in source")]
    MissingColumn { column: String },

    #[error("Source '{source_name}' could not be fetched: {message}")]
    Fetch { source_name: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SlaResult<T> = Result<T, SlaError>;
