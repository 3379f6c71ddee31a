//! Uniform result type for portal operations.

use std::fmt;

/// Operations that reach outside the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ConnectWallet,
    FetchRecords,
    InitializeStorage,
    SubmitRecord,
    CastVote,
}

impl Operation {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ConnectWallet => "connecting wallet",
            Self::FetchRecords => "loading GIFs",
            Self::InitializeStorage => "creating storage account",
            Self::SubmitRecord => "sending GIF",
            Self::CastVote => "sending vote",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Failed operation together with the reason reported by the lower layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    pub operation: Operation,
    pub reason: String,
}

impl OperationFailure {
    #[must_use]
    pub fn new(operation: Operation, reason: impl fmt::Display) -> Self {
        Self {
            operation,
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {}: {}", self.operation, self.reason)
    }
}

impl std::error::Error for OperationFailure {}

/// Result of a portal operation.
pub type OperationResult<T> = Result<T, OperationFailure>;
