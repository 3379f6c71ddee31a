//! Wallet backed by a keypair file on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::entities::{Pubkey, Signature};
use crate::domain::errors::WalletError;
use crate::domain::ports::WalletPort;
use crate::infrastructure::solana::Keypair;

/// Provider name reported by [`KeypairFileWallet`].
pub const PROVIDER_NAME: &str = "keypair-file";

/// Keypair-file wallet adapter.
///
/// Connecting loads the file; the key stays in memory until drop.
pub struct KeypairFileWallet {
    path: PathBuf,
    keypair: RwLock<Option<Arc<Keypair>>>,
}

impl KeypairFileWallet {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keypair: RwLock::new(None),
        }
    }

    /// Returns the wallet when its keypair file exists.
    #[must_use]
    pub fn detect(path: &Path) -> Option<Arc<dyn WalletPort>> {
        if path.exists() {
            debug!(path = %path.display(), "Wallet keypair found");
            Some(Arc::new(Self::new(path)))
        } else {
            info!(path = %path.display(), "No wallet keypair present");
            None
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl WalletPort for KeypairFileWallet {
    fn provider_name(&self) -> String {
        PROVIDER_NAME.to_string()
    }

    async fn connect(&self) -> Result<Pubkey, WalletError> {
        if let Some(pubkey) = self.public_key() {
            return Ok(pubkey);
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map(Zeroizing::new)
            .map_err(|e| {
                warn!(error = %e, path = %self.path.display(), "Failed to read wallet keypair");
                if e.kind() == std::io::ErrorKind::NotFound {
                    WalletError::NotInstalled
                } else {
                    WalletError::rejected(e.to_string())
                }
            })?;

        let keypair = Keypair::from_json(&content).map_err(|e| {
            warn!(error = %e, "Wallet keypair is unusable");
            WalletError::rejected(e.to_string())
        })?;
        let pubkey = keypair.pubkey();

        *self.keypair.write() = Some(Arc::new(keypair));
        info!(%pubkey, "Wallet connected");
        Ok(pubkey)
    }

    fn public_key(&self) -> Option<Pubkey> {
        self.keypair.read().as_ref().map(|keypair| keypair.pubkey())
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        let keypair = self
            .keypair
            .read()
            .clone()
            .ok_or(WalletError::NotConnected)?;
        Ok(keypair.sign(message))
    }
}
