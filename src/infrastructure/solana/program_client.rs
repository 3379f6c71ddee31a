//! Portal program adapter over JSON-RPC.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::anchor::{GifPortalInstructions, decode_storage_account};
use super::cluster::Commitment;
use super::keypair::Keypair;
use super::rpc::RpcClient;
use super::transaction::{Blockhash, Instruction, Message, PACKET_DATA_SIZE, Transaction};
use crate::domain::entities::{GifRecord, Pubkey, Signature};
use crate::domain::errors::{FetchError, ProgramError};
use crate::domain::ports::{GifProgramPort, ProgramHandleFactory, WalletPort};

/// Everything needed to address the deployed program.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    pub rpc_url: String,
    pub commitment: Commitment,
    pub program_id: Pubkey,
    pub storage: Arc<Keypair>,
    pub confirm_attempts: u32,
    pub confirm_interval: Duration,
}

impl ProgramConfig {
    #[must_use]
    pub fn storage_address(&self) -> Pubkey {
        self.storage.pubkey()
    }
}

/// Program handle signing with one wallet.
pub struct GifProgramClient {
    rpc: RpcClient,
    wallet: Arc<dyn WalletPort>,
    instructions: GifPortalInstructions,
    program_id: Pubkey,
    storage: Arc<Keypair>,
}

impl GifProgramClient {
    #[must_use]
    pub fn new(config: &ProgramConfig, http: Client, wallet: Arc<dyn WalletPort>) -> Self {
        let rpc = RpcClient::new(http, config.rpc_url.clone(), config.commitment)
            .with_confirmation(config.confirm_attempts, config.confirm_interval);
        Self {
            rpc,
            wallet,
            instructions: GifPortalInstructions::new(config.program_id, config.storage_address()),
            program_id: config.program_id,
            storage: Arc::clone(&config.storage),
        }
    }

    fn user(&self) -> Result<Pubkey, ProgramError> {
        self.wallet
            .public_key()
            .ok_or(ProgramError::WalletNotConnected)
    }

    /// Compiles and signs `instruction`, returning the wire bytes.
    async fn build_transaction(
        &self,
        instruction: Instruction,
        blockhash: Blockhash,
        co_signer: Option<&Keypair>,
    ) -> Result<Vec<u8>, ProgramError> {
        let payer = self.user()?;
        let message = Message::compile(&[instruction], &payer, blockhash)
            .map_err(|e| ProgramError::encode(e.to_string()))?;
        let bytes = message.serialize();
        let mut transaction = Transaction::new_unsigned(message);

        if let Some(signer) = co_signer {
            transaction
                .add_signature(&signer.pubkey(), signer.sign(&bytes))
                .map_err(|e| ProgramError::encode(e.to_string()))?;
        }

        let signature = self.wallet.sign_message(&bytes).await?;
        transaction
            .add_signature(&payer, signature)
            .map_err(|e| ProgramError::encode(e.to_string()))?;

        let wire = transaction
            .serialize()
            .map_err(|e| ProgramError::encode(e.to_string()))?;
        if wire.len() > PACKET_DATA_SIZE {
            return Err(ProgramError::encode(format!(
                "transaction too large: {} > {PACKET_DATA_SIZE} bytes",
                wire.len()
            )));
        }
        Ok(wire)
    }

    async fn send(
        &self,
        instruction: Instruction,
        co_signer: Option<&Keypair>,
    ) -> Result<Signature, ProgramError> {
        let blockhash = self.rpc.get_latest_blockhash().await?;
        let wire = self.build_transaction(instruction, blockhash, co_signer).await?;

        let signature = self.rpc.send_transaction(&wire).await?;
        debug!(%signature, "Transaction submitted");

        self.rpc.confirm_transaction(&signature).await?;
        Ok(signature)
    }
}

#[async_trait]
impl GifProgramPort for GifProgramClient {
    async fn initialize(&self) -> Result<Signature, ProgramError> {
        let instruction = self.instructions.initialize(self.user()?)?;
        let signature = self.send(instruction, Some(self.storage.as_ref())).await?;
        info!(
            storage = %self.storage.pubkey(),
            "Created storage account"
        );
        Ok(signature)
    }

    async fn add_gif(&self, link: &str) -> Result<Signature, ProgramError> {
        let instruction = self.instructions.add_gif(self.user()?, link)?;
        self.send(instruction, None).await
    }

    async fn vote_gif(&self, index: u32) -> Result<Signature, ProgramError> {
        let instruction = self.instructions.vote_gif(self.user()?, index)?;
        self.send(instruction, None).await
    }

    async fn fetch_records(&self) -> Result<Vec<GifRecord>, FetchError> {
        let storage = self.storage.pubkey();
        let Some(account) = self.rpc.get_account(&storage).await? else {
            debug!(%storage, "Storage account does not exist");
            return Err(FetchError::NotFound);
        };

        if account.owner != self.program_id {
            warn!(%storage, owner = %account.owner, "Storage account has unexpected owner");
            return Err(ProgramError::decode(format!(
                "storage account owned by {}",
                account.owner
            ))
            .into());
        }

        Ok(decode_storage_account(&account.data)?)
    }
}

/// Creates a fresh [`GifProgramClient`] per call, sharing the HTTP pool.
pub struct SolanaProgramFactory {
    config: Arc<ProgramConfig>,
    http: Client,
}

impl SolanaProgramFactory {
    #[must_use]
    pub const fn new(config: Arc<ProgramConfig>, http: Client) -> Self {
        Self { config, http }
    }
}

impl ProgramHandleFactory for SolanaProgramFactory {
    fn handle(&self, wallet: Arc<dyn WalletPort>) -> Arc<dyn GifProgramPort> {
        Arc::new(GifProgramClient::new(&self.config, self.http.clone(), wallet))
    }
}
