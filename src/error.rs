//! Error handling for the career engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareerError {
    #[error("Insufficient input: provide at least some skills or a career goal")]
    InsufficientInput,

    #[error("Unknown user type: {0}. Supported: cbc, 8-4-4, diploma, graduate, postgraduate, professional")]
    UnknownUserType(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidProfileField { field: String, value: String },

    #[error("Occupation not found: {0}")]
    OccupationNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Ranker model error: {0}")]
    RankerModel(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl CareerError {
    /// Input errors are the only failures a recommendation request reports
    /// back to its caller.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CareerError::InsufficientInput
                | CareerError::UnknownUserType(_)
                | CareerError::InvalidProfileField { .. }
                | CareerError::OccupationNotFound(_)
                | CareerError::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CareerError>;

/// model2vec-rs reports failures through anyhow
impl From<anyhow::Error> for CareerError {
    fn from(err: anyhow::Error) -> Self {
        CareerError::Encoder(err.to_string())
    }
}
