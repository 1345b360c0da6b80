use thiserror::Error;

#[derive(Debug, Error)]
pub enum RmbsError {
    #[error("Invalid parameter: {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Degenerate rate: {0}")]
    DegenerateRate(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RmbsError {
    fn from(e: serde_json::Error) -> Self {
        RmbsError::SerializationError(e.to_string())
    }
}
