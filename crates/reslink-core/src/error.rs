//! Error types for Reslink.

use thiserror::Error;

/// Failures raised by a transport backend.
///
/// These are always surfaced to the caller and never retried by the
/// command layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("Remote fault in {method}: {message}")]
    RemoteFault { method: String, message: String },

    #[error("Call to {method} timed out after {elapsed_ms} ms")]
    Timeout { method: String, elapsed_ms: u64 },
}

impl TransportError {
    /// Build a `RemoteFault` for the given method.
    pub fn fault(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteFault {
            method: method.into(),
            message: message.into(),
        }
    }
}

/// Main error type for Reslink operations.
#[derive(Error, Debug)]
pub enum ReslinkError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Malformed input: {0}")]
    Format(String),

    #[error("Position conflict: {0}")]
    PositionConflict(String),

    #[error("Clips are not adjacent: {0}")]
    NotAdjacent(String),

    #[error("Replace conflict: {0}")]
    ReplaceConflict(String),

    #[error("Invalid marker color: {0}")]
    InvalidColor(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Media is still used on the timeline: {0}")]
    MediaInUse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReslinkError {
    /// Short stable name of the error kind, used when a backend has to
    /// flatten a domain error into a remote fault message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(TransportError::NotConnected(_)) => "NotConnected",
            Self::Transport(TransportError::RemoteFault { .. }) => "RemoteFault",
            Self::Transport(TransportError::Timeout { .. }) => "Timeout",
            Self::Format(_) => "FormatError",
            Self::PositionConflict(_) => "PositionConflict",
            Self::NotAdjacent(_) => "NotAdjacent",
            Self::ReplaceConflict(_) => "ReplaceConflict",
            Self::InvalidColor(_) => "InvalidColor",
            Self::UnsupportedMediaType(_) => "UnsupportedMediaType",
            Self::MediaInUse(_) => "MediaInUse",
            Self::NotFound(_) => "NotFound",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::Serialization(_) => "Serialization",
            Self::Io(_) => "Io",
        }
    }
}

/// Result type alias for Reslink operations.
pub type Result<T> = std::result::Result<T, ReslinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_converts() {
        let err: ReslinkError = TransportError::fault("scriptInsertClip", "boom").into();
        assert_eq!(err.kind(), "RemoteFault");
        assert!(err.to_string().contains("scriptInsertClip"));
    }

    #[test]
    fn test_domain_kind_names() {
        assert_eq!(ReslinkError::NotAdjacent("x".into()).kind(), "NotAdjacent");
        assert_eq!(ReslinkError::Format("x".into()).kind(), "FormatError");
    }
}
