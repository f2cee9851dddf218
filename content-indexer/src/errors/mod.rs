//! Error types for the content indexer.

use thiserror::Error;

/// Errors that can occur while consuming from the queue or running the
/// orchestrator.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Kafka-related error.
    #[error("Kafka error: {0}")]
    KafkaError(String),

    /// The orchestrator was started twice.
    #[error("Orchestrator already started")]
    AlreadyStarted,

    /// A background task failed to complete.
    #[error("Task error: {0}")]
    TaskError(String),
}

impl IngestError {
    /// Create a Kafka error.
    pub fn kafka(msg: impl Into<String>) -> Self {
        Self::KafkaError(msg.into())
    }

    /// Create a task error.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::TaskError(msg.into())
    }
}

impl From<rdkafka::error::KafkaError> for IngestError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        Self::KafkaError(err.to_string())
    }
}

/// Errors raised while turning an event into a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// An identifier could not be parsed.
    #[error("Invalid identifier {value}: {reason}")]
    InvalidIdentifier { value: String, reason: String },
}

impl ProcessError {
    pub fn invalid_identifier(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from the concordance service.
#[derive(Error, Debug)]
pub enum ConceptError {
    /// The request could not be sent or the response could not be read.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The service answered with an unexpected status.
    #[error("calling Concordance API returned HTTP status {0}")]
    UnexpectedStatus(u16),

    /// The response body is not a concordance response.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ConceptError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
