use thiserror::Error;

/// Reasons a report payload could not be turned into sections.
#[derive(Debug, Error)]
pub enum ReportParseError {
    #[error("report payload is null")]
    NullPayload,

    #[error("section {index} is not an object")]
    InvalidSection { index: usize },

    #[error("report payload nesting exceeds {limit} levels")]
    TooDeep { limit: usize },

    #[error("failed to serialize report payload: {0}")]
    Serialize(#[from] serde_json::Error),
}
