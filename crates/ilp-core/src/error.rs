//! Shared error types across ILP crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientCode {
    /// Malformed request or configuration.
    BadRequest,
    /// A required transaction field is absent.
    MissingField,
    /// Monetary value is negative, non-finite or not a number.
    InvalidValue,
    /// Agent identifier has the wrong shape.
    InvalidAgentId,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::MissingField => "MISSING_FIELD",
            ClientCode::InvalidValue => "INVALID_VALUE",
            ClientCode::InvalidAgentId => "INVALID_AGENT_ID",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Schema/semantic failures for an inbound transaction record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid value_ghs: {0}")]
    InvalidValue(String),
    #[error("invalid agent_id: {0}")]
    InvalidAgentId(String),
}

impl ValidationError {
    pub fn client_code(&self) -> ClientCode {
        match self {
            ValidationError::MissingField(_) => ClientCode::MissingField,
            ValidationError::InvalidValue(_) => ClientCode::InvalidValue,
            ValidationError::InvalidAgentId(_) => ClientCode::InvalidAgentId,
        }
    }
}

/// Submission boundary error. Rejections never mutate counters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestionError {
    #[error("rejected: {0}")]
    Rejected(#[from] ValidationError),
}

impl IngestionError {
    pub fn client_code(&self) -> ClientCode {
        match self {
            IngestionError::Rejected(e) => e.client_code(),
        }
    }

    /// The validation failure behind a rejection.
    pub fn reason(&self) -> &ValidationError {
        match self {
            IngestionError::Rejected(e) => e,
        }
    }
}

/// Persistence collaborator failure. Degraded mode only; the store logs it
/// and keeps counting in memory, so it never reaches a client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("store unavailable: {0}")]
pub struct StoreUnavailable(pub String);

/// Shared result type.
pub type Result<T> = std::result::Result<T, IlpError>;

/// Unified error type used by core and the aggregator service.
#[derive(Debug, Error)]
pub enum IlpError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error(transparent)]
    Rejected(#[from] IngestionError),
    #[error("internal: {0}")]
    Internal(String),
}

impl IlpError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            IlpError::BadRequest(_) => ClientCode::BadRequest,
            IlpError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            IlpError::Rejected(e) => e.client_code(),
            IlpError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Client-facing reason text. Rejections report the validation failure alone.
    pub fn reason(&self) -> String {
        match self {
            IlpError::Rejected(e) => e.reason().to_string(),
            other => other.to_string(),
        }
    }
}
