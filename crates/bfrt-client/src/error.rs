//! Error types for the BfRuntime client.
//!
//! The device reports failures with gRPC canonical codes; batch writes carry
//! one status per sub-operation in the status details. Both shapes are
//! surfaced here as a single `BfrtError` enum so callers match on the
//! condition, not on transport plumbing.

use prost::Message;
use thiserror::Error;

use bfrt_proto::bfrt::ErrorDetails;

/// Status of one sub-operation inside a failed write batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubError {
    /// Index of the failing update within the batch.
    pub index: u32,
    /// gRPC canonical code of the sub-operation.
    pub code: tonic::Code,
    /// Device-provided message.
    pub message: String,
}

impl std::fmt::Display for SubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "update #{}: {:?}: {}", self.index, self.code, self.message)
    }
}

/// BfRuntime client errors.
#[derive(Error, Debug)]
pub enum BfrtError {
    /// Schema violation, malformed encoding, or illegal combination
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Get or delete of an absent entry, or unknown table/field/action
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate entry add, or duplicate bind
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Device locked, typically while a warm init is in progress
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Client was unbound because the bound program went away
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Per-request deadline expired
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// A write batch failed; one status per failing sub-operation
    #[error("Write batch failed ({}): {}", .sub_errors.len(), format_sub_errors(.sub_errors))]
    Batch {
        /// Overall canonical code reported by the device
        code: tonic::Code,
        /// Per-sub-operation statuses, in batch order
        sub_errors: Vec<SubError>,
    },

    /// Notification queue was closed by session teardown
    #[error("Notification queue closed")]
    QueueClosed,

    /// Timed out waiting for a notification or latch
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Connection establishment failed
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// Any other RPC failure
    #[error("RPC error: {0}")]
    Rpc(tonic::Status),
}

/// Result type for BfRuntime client operations.
pub type Result<T> = std::result::Result<T, BfrtError>;

fn format_sub_errors(sub_errors: &[SubError]) -> String {
    let mut out = String::new();
    for (i, e) in sub_errors.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        out.push_str(&e.to_string());
    }
    out
}

impl BfrtError {
    /// Creates an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        BfrtError::InvalidArgument(message.into())
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        BfrtError::NotFound(message.into())
    }

    /// Returns true if a bind or subscribe loop should retry on this error.
    pub fn is_retryable_bind(&self) -> bool {
        matches!(self, BfrtError::Unavailable(_))
    }

    /// Canonical code equivalent of this error, for logging and assertions.
    pub fn code(&self) -> tonic::Code {
        match self {
            BfrtError::InvalidArgument(_) => tonic::Code::InvalidArgument,
            BfrtError::NotFound(_) => tonic::Code::NotFound,
            BfrtError::AlreadyExists(_) => tonic::Code::AlreadyExists,
            BfrtError::Unavailable(_) => tonic::Code::Unavailable,
            BfrtError::Cancelled(_) => tonic::Code::Cancelled,
            BfrtError::DeadlineExceeded(_) => tonic::Code::DeadlineExceeded,
            BfrtError::Batch { code, .. } => *code,
            BfrtError::QueueClosed => tonic::Code::Cancelled,
            BfrtError::Timeout(_) => tonic::Code::DeadlineExceeded,
            BfrtError::Transport(_) => tonic::Code::Unavailable,
            BfrtError::Rpc(status) => status.code(),
        }
    }

    /// Per-sub-operation statuses of a failed batch, empty otherwise.
    pub fn sub_errors(&self) -> &[SubError] {
        match self {
            BfrtError::Batch { sub_errors, .. } => sub_errors,
            _ => &[],
        }
    }
}

impl From<tonic::Status> for BfrtError {
    fn from(status: tonic::Status) -> Self {
        // Batch sub-errors ride in the status details as an ErrorDetails
        // message; decode them when present.
        if !status.details().is_empty() {
            if let Ok(details) = ErrorDetails::decode(status.details()) {
                if !details.errors.is_empty() {
                    let sub_errors = details
                        .errors
                        .into_iter()
                        .map(|e| SubError {
                            index: e.index,
                            code: tonic::Code::from(e.canonical_code),
                            message: e.message,
                        })
                        .collect();
                    return BfrtError::Batch {
                        code: status.code(),
                        sub_errors,
                    };
                }
            }
        }
        let message = status.message().to_string();
        match status.code() {
            tonic::Code::InvalidArgument => BfrtError::InvalidArgument(message),
            tonic::Code::NotFound => BfrtError::NotFound(message),
            tonic::Code::AlreadyExists => BfrtError::AlreadyExists(message),
            tonic::Code::Unavailable => BfrtError::Unavailable(message),
            tonic::Code::Cancelled => BfrtError::Cancelled(message),
            tonic::Code::DeadlineExceeded => BfrtError::DeadlineExceeded(message),
            _ => BfrtError::Rpc(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BfrtError::invalid_argument("field width exceeded");
        assert_eq!(err.to_string(), "Invalid argument: field width exceeded");
    }

    #[test]
    fn test_status_code_mapping() {
        let status = tonic::Status::already_exists("duplicate key");
        let err = BfrtError::from(status);
        assert!(matches!(err, BfrtError::AlreadyExists(_)));
        assert_eq!(err.code(), tonic::Code::AlreadyExists);
    }

    #[test]
    fn test_batch_details_decode() {
        let details = ErrorDetails {
            errors: vec![
                bfrt_proto::bfrt::Error {
                    canonical_code: tonic::Code::AlreadyExists as i32,
                    message: "duplicate".to_string(),
                    index: 3,
                },
                bfrt_proto::bfrt::Error {
                    canonical_code: tonic::Code::InvalidArgument as i32,
                    message: "bad width".to_string(),
                    index: 7,
                },
            ],
        };
        let status = tonic::Status::with_details(
            tonic::Code::Unknown,
            "batch failed",
            details.encode_to_vec().into(),
        );

        let err = BfrtError::from(status);
        let subs = err.sub_errors();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].index, 3);
        assert_eq!(subs[0].code, tonic::Code::AlreadyExists);
        assert_eq!(subs[1].index, 7);
        assert_eq!(subs[1].code, tonic::Code::InvalidArgument);
    }

    #[test]
    fn test_retryable_bind() {
        assert!(BfrtError::Unavailable("locked".into()).is_retryable_bind());
        assert!(!BfrtError::AlreadyExists("bound".into()).is_retryable_bind());
    }
}
