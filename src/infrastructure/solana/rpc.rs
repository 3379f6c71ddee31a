//! Solana JSON-RPC client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use super::cluster::Commitment;
use super::dto::{
    AccountInfo, LatestBlockhash, RpcErrorObject, RpcRequest, RpcResponse, SignatureStatus,
    WithContext,
};
use super::transaction::Blockhash;
use crate::domain::entities::{Pubkey, Signature};
use crate::domain::errors::ProgramError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONFIRM_ATTEMPTS: u32 = 30;
const DEFAULT_CONFIRM_INTERVAL: Duration = Duration::from_millis(500);
const ANCHOR_MESSAGE_MARKER: &str = "Error Message: ";

/// Raw on-chain account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountData {
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

/// Builds the shared HTTP client.
///
/// # Errors
/// Returns error if HTTP client creation fails.
pub fn http_client() -> Result<Client, ProgramError> {
    Client::builder()
        .user_agent(concat!("gifportal/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ProgramError::network(format!("failed to create HTTP client: {e}")))
}

/// JSON-RPC connection to a single cluster endpoint.
#[derive(Debug)]
pub struct RpcClient {
    client: Client,
    url: String,
    commitment: Commitment,
    confirm_attempts: u32,
    confirm_interval: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>, commitment: Commitment) -> Self {
        Self {
            client,
            url: url.into(),
            commitment,
            confirm_attempts: DEFAULT_CONFIRM_ATTEMPTS,
            confirm_interval: DEFAULT_CONFIRM_INTERVAL,
            next_id: AtomicU64::new(1),
        }
    }

    /// Overrides how long `confirm_transaction` polls.
    #[must_use]
    pub const fn with_confirmation(mut self, attempts: u32, interval: Duration) -> Self {
        self.confirm_attempts = attempts;
        self.confirm_interval = interval;
        self
    }

    #[must_use]
    pub const fn commitment(&self) -> Commitment {
        self.commitment
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        debug!(method, url = %self.url, "Sending RPC request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, method, "RPC request failed");
                if e.is_timeout() {
                    RpcError::Transport("request timed out".to_string())
                } else if e.is_connect() {
                    RpcError::Transport(format!("failed to connect to {}", self.url))
                } else {
                    RpcError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Transport(format!("RPC node returned {status}")));
        }

        let body: RpcResponse<T> = response.json().await.map_err(|e| {
            warn!(error = %e, method, "Failed to parse RPC response");
            RpcError::Decode(format!("failed to parse response: {e}"))
        })?;

        match (body.result, body.error) {
            (_, Some(error)) => Err(RpcError::Rpc(error)),
            (Some(result), None) => Ok(result),
            (None, None) => Err(RpcError::Decode("empty RPC response".to_string())),
        }
    }

    /// Reads an account; `None` when it does not exist.
    ///
    /// # Errors
    /// Returns error if the node is unreachable or the payload is malformed.
    pub async fn get_account(&self, address: &Pubkey) -> Result<Option<AccountData>, ProgramError> {
        let params = json!([
            address.to_string(),
            { "encoding": "base64", "commitment": self.commitment.as_str() }
        ]);
        let response: WithContext<Option<AccountInfo>> = self
            .call("getAccountInfo", params)
            .await
            .map_err(RpcError::into_read_error)?;

        let Some(info) = response.value else {
            return Ok(None);
        };

        let (payload, encoding) = info.data;
        if encoding != "base64" {
            return Err(ProgramError::decode(format!("unexpected encoding {encoding}")));
        }
        let data = STANDARD
            .decode(payload)
            .map_err(|e| ProgramError::decode(format!("invalid account data: {e}")))?;
        let owner = info
            .owner
            .parse()
            .map_err(|e| ProgramError::decode(format!("invalid account owner: {e}")))?;

        Ok(Some(AccountData { owner, data }))
    }

    /// # Errors
    /// Returns error if the node is unreachable or the blockhash is malformed.
    pub async fn get_latest_blockhash(&self) -> Result<Blockhash, ProgramError> {
        let params = json!([{ "commitment": self.commitment.as_str() }]);
        let response: WithContext<LatestBlockhash> = self
            .call("getLatestBlockhash", params)
            .await
            .map_err(RpcError::into_read_error)?;

        response
            .value
            .blockhash
            .parse()
            .map_err(|e| ProgramError::decode(format!("invalid blockhash: {e}")))
    }

    /// Submits a signed transaction and returns its signature.
    ///
    /// # Errors
    /// Returns `TransactionRejected` when preflight fails.
    pub async fn send_transaction(&self, wire: &[u8]) -> Result<Signature, ProgramError> {
        let params = json!([
            STANDARD.encode(wire),
            {
                "encoding": "base64",
                "skipPreflight": false,
                "preflightCommitment": self.commitment.as_str(),
            }
        ]);
        let signature: String = self
            .call("sendTransaction", params)
            .await
            .map_err(RpcError::into_send_error)?;

        Signature::from_base58(&signature)
            .ok_or_else(|| ProgramError::decode(format!("invalid signature {signature}")))
    }

    /// Polls until `signature` reaches the configured commitment.
    ///
    /// # Errors
    /// Returns `Unconfirmed` once the attempts run out, or
    /// `TransactionRejected` if the transaction failed on chain.
    pub async fn confirm_transaction(&self, signature: &Signature) -> Result<(), ProgramError> {
        let encoded = signature.to_string();

        for attempt in 1..=self.confirm_attempts {
            let params = json!([[encoded], { "searchTransactionHistory": false }]);
            let response: WithContext<Vec<Option<SignatureStatus>>> = self
                .call("getSignatureStatuses", params)
                .await
                .map_err(RpcError::into_read_error)?;

            if let Some(Some(status)) = response.value.into_iter().next() {
                if let Some(err) = status.err {
                    return Err(ProgramError::rejected(err.to_string()));
                }
                let reached = status
                    .confirmation_status
                    .as_deref()
                    .and_then(Commitment::from_status)
                    .is_some_and(|level| level >= self.commitment);
                if reached {
                    debug!(signature = %encoded, attempt, "Transaction confirmed");
                    return Ok(());
                }
            }

            tokio::time::sleep(self.confirm_interval).await;
        }

        warn!(signature = %encoded, "Transaction not confirmed in time");
        Err(ProgramError::Unconfirmed { signature: encoded })
    }
}

/// Failure of a single JSON-RPC call.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),

    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(RpcErrorObject),
}

impl RpcError {
    fn into_read_error(self) -> ProgramError {
        match self {
            Self::Transport(message) => ProgramError::network(message),
            Self::Decode(message) => ProgramError::decode(message),
            Self::Rpc(error) => ProgramError::network(format!("{} ({})", error.message, error.code)),
        }
    }

    fn into_send_error(self) -> ProgramError {
        match self {
            Self::Rpc(error) => ProgramError::rejected(rejection_reason(&error)),
            other => other.into_read_error(),
        }
    }
}

/// Picks the most readable reason out of a failed preflight.
///
/// Anchor programs log `Error Message: ...`; that line wins over the generic
/// node message.
fn rejection_reason(error: &RpcErrorObject) -> String {
    error
        .logs()
        .iter()
        .find_map(|line| {
            line.find(ANCHOR_MESSAGE_MARKER)
                .map(|at| line[at + ANCHOR_MESSAGE_MARKER.len()..].trim().to_string())
        })
        .or_else(|| {
            error
                .logs()
                .into_iter()
                .find(|line| line.contains("failed:"))
                .map(|line| line.trim_start_matches("Program ").to_string())
        })
        .unwrap_or_else(|| error.message.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_with_logs(logs: &[&str]) -> RpcErrorObject {
        RpcErrorObject {
            code: -32002,
            message: "Transaction simulation failed".to_string(),
            data: Some(json!({ "logs": logs })),
        }
    }

    #[test]
    fn test_rejection_reason_prefers_anchor_message() {
        let error = error_with_logs(&[
            "Program 11111111111111111111111111111111 invoke [1]",
            "Program log: AnchorError caused by account: base_account. Error Code: AccountNotInitialized. Error Number: 3012. Error Message: The program expected this account to be already initialized.",
        ]);

        assert_eq!(
            rejection_reason(&error),
            "The program expected this account to be already initialized."
        );
    }

    #[test]
    fn test_rejection_reason_falls_back_to_failed_line() {
        let error = error_with_logs(&[
            "Program abc invoke [1]",
            "Program abc failed: custom program error: 0x0",
        ]);

        assert_eq!(rejection_reason(&error), "abc failed: custom program error: 0x0");
    }

    #[test]
    fn test_rejection_reason_without_logs() {
        let error = RpcErrorObject {
            code: -32003,
            message: "Transaction signature verification failure".to_string(),
            data: None,
        };

        assert_eq!(
            rejection_reason(&error),
            "Transaction signature verification failure"
        );
    }

    #[test]
    fn test_send_failure_maps_to_rejected() {
        let failure = RpcError::Rpc(error_with_logs(&[]));
        assert!(matches!(
            failure.into_send_error(),
            ProgramError::TransactionRejected { .. }
        ));

        let failure = RpcError::Transport("request timed out".to_string());
        assert!(failure.into_send_error().is_network_error());
    }

    #[test]
    fn test_client_creation() {
        assert!(http_client().is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_network_error() {
        let client = RpcClient::new(
            http_client().unwrap(),
            "http://127.0.0.1:9",
            Commitment::Processed,
        );

        let error = client.get_latest_blockhash().await.unwrap_err();
        assert!(error.is_network_error());
    }
}
