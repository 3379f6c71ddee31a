//! Portal program port definitions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{GifRecord, Signature};
use crate::domain::errors::{FetchError, ProgramError};

use super::WalletPort;

/// Handle to the portal program bound to one wallet and one storage account.
#[async_trait]
pub trait GifProgramPort: Send + Sync {
    /// Creates the storage account.
    async fn initialize(&self) -> Result<Signature, ProgramError>;

    /// Appends a link attributed to the wallet.
    async fn add_gif(&self, link: &str) -> Result<Signature, ProgramError>;

    /// Casts the wallet's vote for the record at `index`.
    async fn vote_gif(&self, index: u32) -> Result<Signature, ProgramError>;

    /// Reads all records from the storage account.
    async fn fetch_records(&self) -> Result<Vec<GifRecord>, FetchError>;
}

/// Builds a fresh program handle for every call.
pub trait ProgramHandleFactory: Send + Sync {
    /// Creates handle signing with `wallet`.
    fn handle(&self, wallet: Arc<dyn WalletPort>) -> Arc<dyn GifProgramPort>;
}
