//! Maps operation results to user-visible notices.

use crate::domain::errors::RequestError;
use crate::domain::{Notification, Operation, OperationFailure};

/// Notice for a successful operation.
#[must_use]
pub fn success(operation: Operation) -> Notification {
    let message = match operation {
        Operation::ConnectWallet => "Wallet connected",
        Operation::FetchRecords => "GIF list refreshed",
        Operation::InitializeStorage => "Storage account created",
        Operation::SubmitRecord => "GIF successfully sent to program",
        Operation::CastVote => "Vote successfully sent to program",
    };
    Notification::info("Success", message)
}

/// Notice for a failed operation, always carrying the reason.
#[must_use]
pub fn failure(failure: &OperationFailure) -> Notification {
    Notification::error("Error", format!("Error {}: {}", failure.operation, failure.reason))
}

/// Notice for an action refused before any external call.
#[must_use]
pub fn rejected(error: &RequestError) -> Notification {
    Notification::warn("Not sent", error.to_string())
}

/// Notice shown when no wallet provider is available.
#[must_use]
pub fn wallet_missing() -> Notification {
    Notification::warn(
        "Wallet",
        "Wallet not found! Point wallet.keypair_path at a Solana keypair file",
    )
}
