//! Ed25519 public key value object.

use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;

/// Length of an ed25519 public key in bytes.
pub const PUBKEY_BYTES: usize = 32;

/// Errors raised when parsing a base58 public key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePubkeyError {
    #[error("invalid base58 encoding")]
    InvalidBase58,

    #[error("expected 32 bytes, got {0}")]
    WrongLength(usize),
}

/// Account address or wallet identity on the cluster.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, BorshDeserialize,
)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

impl Pubkey {
    /// Creates key from raw bytes.
    #[must_use]
    pub const fn new_from_array(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    /// Returns a reference to the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// Returns abbreviated base58 form for narrow displays.
    #[must_use]
    pub fn short(&self) -> String {
        let full = self.to_string();
        if full.len() <= 10 {
            return full;
        }
        format!("{}..{}", &full[..4], &full[full.len() - 4..])
    }
}

impl FromStr for Pubkey {
    type Err = ParsePubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s.trim())
            .into_vec()
            .map_err(|_| ParsePubkeyError::InvalidBase58)?;

        let array: [u8; PUBKEY_BYTES] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParsePubkeyError::WrongLength(bytes.len()))?;

        Ok(Self(array))
    }
}

impl From<[u8; PUBKEY_BYTES]> for Pubkey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}
