//! Wallet error types.

use thiserror::Error;

/// Wallet error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum WalletError {
    #[error("no wallet provider available")]
    NotInstalled,

    #[error("wallet provider '{found}' is not the expected '{expected}'")]
    UnexpectedProvider { found: String, expected: String },

    #[error("wallet connection rejected: {reason}")]
    Rejected { reason: String },

    #[error("wallet is not connected")]
    NotConnected,

    #[error("wallet failed to sign: {reason}")]
    SigningFailed { reason: String },
}

impl WalletError {
    /// Creates rejected error.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Creates signing failure error.
    #[must_use]
    pub fn signing_failed(reason: impl Into<String>) -> Self {
        Self::SigningFailed {
            reason: reason.into(),
        }
    }

    /// Returns whether the wallet capability is missing entirely.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::NotInstalled)
    }
}
