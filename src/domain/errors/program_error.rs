//! Program call error types.

use thiserror::Error;

use super::WalletError;

/// Failure of a call against the portal program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ProgramError {
    #[error("wallet is not connected")]
    WalletNotConnected,

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("network error: {message}")]
    Network { message: String },

    #[error("transaction rejected: {message}")]
    TransactionRejected { message: String },

    #[error("transaction not confirmed: {signature}")]
    Unconfirmed { signature: String },

    #[error("failed to decode program data: {message}")]
    Decode { message: String },

    #[error("failed to encode request: {message}")]
    Encode { message: String },
}

impl ProgramError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates transaction rejected error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::TransactionRejected {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates encode error.
    #[must_use]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Unconfirmed { .. })
    }
}

/// Failure of a storage account read.
///
/// A missing account is kept apart from every other failure so callers can
/// tell "needs initialization" from "could not reach the program".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The storage account does not exist.
    #[error("storage account not found")]
    NotFound,

    /// Any other read failure.
    #[error(transparent)]
    Failed(#[from] ProgramError),
}

impl FetchError {
    /// Returns whether the storage account is missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
