//! Failures an analysis task can end with

use thiserror::Error;

/// Why an analysis request did not produce a description
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The endpoint answered with something other than 200
    #[error("API request failed with status code: {0}")]
    Status(u16),

    /// The request body could not be serialized
    #[error("Failed to serialize request: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Connection, TLS or body transfer failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON
    #[error("Invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The response JSON did not contain the generated text
    #[error("Response is missing field `{0}`")]
    MissingField(&'static str),
}
