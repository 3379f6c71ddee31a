//! Local validation errors raised before any external call.

use thiserror::Error;

/// Reasons a user action is refused locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// No wallet is connected.
    #[error("connect a wallet first")]
    NotConnected,

    /// The draft link is empty or whitespace.
    #[error("No gif link given!")]
    EmptyLink,

    /// Initialization requested while the storage account is known to exist
    /// or its state is not yet known.
    #[error("storage account does not need initialization")]
    InitializationNotNeeded,

    /// Vote index does not fit the program's index type.
    #[error("vote index {0} is out of range")]
    IndexOverflow(usize),
}
