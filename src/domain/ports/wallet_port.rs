//! Wallet port definition.

use async_trait::async_trait;

use crate::domain::entities::{Pubkey, Signature};
use crate::domain::errors::WalletError;

/// Port for a wallet provider able to approve a connection and sign messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletPort: Send + Sync {
    /// Identifies the provider implementation.
    fn provider_name(&self) -> String;

    /// Requests approval and returns the wallet's public key.
    async fn connect(&self) -> Result<Pubkey, WalletError>;

    /// Returns the public key once connected.
    fn public_key(&self) -> Option<Pubkey>;

    /// Signs a serialized transaction message.
    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError>;
}
