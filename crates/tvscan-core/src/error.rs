use std::fmt::{Display, Formatter};

use thiserror::Error;

const MAX_BODY_PREVIEW: usize = 256;

/// Invalid use of the builder API. Never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("column name cannot be empty")]
    EmptyColumnName,
    #[error("operation '{operation}' on '{field}' expects {expected}")]
    OperandShape {
        field: String,
        operation: &'static str,
        expected: &'static str,
    },
    #[error("operation '{operation}' on '{field}' has a non-finite numeric operand")]
    NonFiniteOperand {
        field: String,
        operation: &'static str,
    },
    #[error("range start {start} must not exceed end {end}")]
    InvalidRange { start: u32, end: u32 },
}

/// The accumulated request cannot be encoded to, or parsed from, the wire format.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("filter cannot be serialized: {source}")]
    InvalidFilter {
        field: String,
        operation: &'static str,
        #[source]
        source: ConstructionError,
    },
    #[error("failed to encode scan request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to parse scan request: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Network failure or non-success status from the scanner endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Network {
        url: String,
        message: String,
        retryable: bool,
    },
    #[error("scanner at {url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
}

impl TransportError {
    pub(crate) fn status(url: impl Into<String>, status: u16, body: &str) -> Self {
        let body = match body.char_indices().nth(MAX_BODY_PREVIEW) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_owned(),
        };
        Self::Status {
            url: url.into(),
            status,
            body,
        }
    }

    /// Whether a caller-level retry has a chance of succeeding.
    pub const fn retryable(&self) -> bool {
        match self {
            Self::Network { retryable, .. } => *retryable,
            Self::Status { status, .. } => matches!(*status, 408 | 429 | 500..=599),
        }
    }
}

/// Response body does not match the `{totalCount, data}` shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("response is missing required field '{0}'")]
    MissingField(&'static str),
    #[error("response field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("response row {index} is invalid: {reason}")]
    InvalidRow { index: usize, reason: String },
    #[error("scanner reported an error: {message}")]
    Service { message: String },
}

/// Error classification used for exit codes and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Construction,
    Serialization,
    Transport,
    Decode,
    Cancelled,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Construction => "construction",
            Self::Serialization => "serialization",
            Self::Transport => "transport",
            Self::Decode => "decode",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error for building, sending and decoding a scan.
#[derive(Debug, Error)]
pub enum ScreenerError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("scan request to {url} was cancelled")]
    Cancelled { url: String },
}

impl ScreenerError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Construction(_) => ErrorKind::Construction,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Construction => "screener.construction",
            ErrorKind::Serialization => "screener.serialization",
            ErrorKind::Transport => "screener.transport",
            ErrorKind::Decode => "screener.decode",
            ErrorKind::Cancelled => "screener.cancelled",
        }
    }
}
