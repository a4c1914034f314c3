//! Error types for the Courtside question-answering service.

use thiserror::Error;

/// Main error type for Courtside operations.
#[derive(Error, Debug)]
pub enum CourtsideError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Completion error: {0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Schema(#[from] SchemaViolation),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("could not identify a player in the question; try including the player's full name")]
    NoPlayerNameFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// A structured query failed validation. The `field` names the offending
/// attribute so translation logs can pinpoint what the model got wrong.
#[derive(Error, Debug)]
#[error("invalid query field `{field}`: {message}")]
pub struct SchemaViolation {
    pub field: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Text-generation capability errors. Every variant is recoverable by the
/// translator's deterministic fallback; none reach the user directly.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("completion contained no content")]
    EmptyCompletion,

    #[error("malformed completion payload: {0}")]
    Malformed(String),
}

/// Relational store errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
}

/// Backend proxy errors (cluster / historical-comparison service).
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("backend service is not configured")]
    NotConfigured,

    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Result type alias for Courtside operations.
pub type Result<T> = std::result::Result<T, CourtsideError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CourtsideError::Config(ConfigError::MissingField("database.url".to_string()));
        assert!(err.to_string().contains("database.url"));
    }

    #[test]
    fn test_schema_violation_names_field() {
        let err = SchemaViolation::new("metric", "unknown value `points_per_minute`");
        let msg = err.to_string();
        assert!(msg.contains("metric"));
        assert!(msg.contains("points_per_minute"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CourtsideError = io_err.into();
        assert!(matches!(err, CourtsideError::Io(_)));
    }
}
