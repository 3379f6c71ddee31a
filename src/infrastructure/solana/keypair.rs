//! Ed25519 keypair loading and signing.

use std::fmt;
use std::path::Path;

use ed25519_dalek::{Signer as _, SigningKey};
use serde_json::Value;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::entities::{Pubkey, Signature};

const KEYPAIR_BYTES: usize = 64;

/// Keypair loading errors.
#[derive(Debug, Error)]
pub enum KeypairError {
    #[error("failed to read keypair file: {0}")]
    Io(#[from] std::io::Error),

    #[error("keypair file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported keypair format: {0}")]
    Format(String),

    #[error("keypair must be 64 bytes, got {0}")]
    Length(usize),

    #[error("public half does not match secret key")]
    Mismatch,
}

/// Ed25519 keypair that can sign transaction messages.
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// Creates keypair from a 32-byte seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(seed),
        }
    }

    /// Creates keypair from 64 bytes: secret seed followed by public key.
    ///
    /// # Errors
    /// Returns error on wrong length or mismatching public half.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeypairError> {
        let bytes: &[u8; KEYPAIR_BYTES] = bytes
            .try_into()
            .map_err(|_| KeypairError::Length(bytes.len()))?;
        let signing = SigningKey::from_keypair_bytes(bytes).map_err(|_| KeypairError::Mismatch)?;
        Ok(Self { signing })
    }

    /// Parses the JSON forms written by Solana tooling.
    ///
    /// Accepts a plain byte array (`solana-keygen`) or the
    /// `{"_keypair": {"secretKey": {"0": .., ..}}}` object written when a
    /// web3.js keypair is serialized.
    ///
    /// # Errors
    /// Returns error if the document matches neither form.
    pub fn from_json(json: &str) -> Result<Self, KeypairError> {
        let value: Value = serde_json::from_str(json)?;
        let bytes = Zeroizing::new(secret_bytes(&value)?);
        Self::from_bytes(&bytes)
    }

    /// Reads keypair JSON from `path`.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn read_from_file(path: &Path) -> Result<Self, KeypairError> {
        let content = Zeroizing::new(std::fs::read_to_string(path)?);
        Self::from_json(&content)
    }

    /// Returns the public key.
    #[must_use]
    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.signing.verifying_key().to_bytes())
    }

    /// Signs `message`.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::new_from_array(self.signing.sign(message).to_bytes())
    }

    /// Returns the 64-byte keypair encoding.
    #[must_use]
    pub fn to_bytes(&self) -> Zeroizing<[u8; KEYPAIR_BYTES]> {
        Zeroizing::new(self.signing.to_keypair_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}

fn secret_bytes(value: &Value) -> Result<Vec<u8>, KeypairError> {
    match value {
        Value::Array(items) => items.iter().map(byte).collect(),
        Value::Object(map) => {
            let secret = map
                .get("_keypair")
                .and_then(|keypair| keypair.get("secretKey"))
                .ok_or_else(|| KeypairError::Format("missing _keypair.secretKey".to_string()))?;
            match secret {
                Value::Array(items) => items.iter().map(byte).collect(),
                Value::Object(indexed) => {
                    let mut entries = indexed
                        .iter()
                        .map(|(k, v)| {
                            let index = k.parse::<usize>().map_err(|_| {
                                KeypairError::Format(format!("non-numeric key '{k}'"))
                            })?;
                            Ok((index, byte(v)?))
                        })
                        .collect::<Result<Vec<_>, KeypairError>>()?;
                    entries.sort_unstable_by_key(|(index, _)| *index);
                    Ok(entries.into_iter().map(|(_, b)| b).collect())
                }
                _ => Err(KeypairError::Format(
                    "secretKey must be an array or object".to_string(),
                )),
            }
        }
        _ => Err(KeypairError::Format(
            "expected a byte array or keypair object".to_string(),
        )),
    }
}

fn byte(value: &Value) -> Result<u8, KeypairError> {
    value
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| KeypairError::Format(format!("'{value}' is not a byte")))
}
