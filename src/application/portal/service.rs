//! Executes portal commands against the wallet and the program.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{GifRecord, Pubkey};
use crate::domain::errors::{FetchError, ProgramError, WalletError};
use crate::domain::ports::{GifProgramPort, ProgramHandleFactory, WalletPort};
use crate::domain::{Operation, OperationFailure};

use super::state::{Command, FetchTicket, PortalEvent};

/// Stateless executor for external calls.
///
/// Every program call builds its own handle through the factory.
#[derive(Clone)]
pub struct PortalService {
    wallet: Option<Arc<dyn WalletPort>>,
    programs: Arc<dyn ProgramHandleFactory>,
    expected_provider: String,
}

impl PortalService {
    #[must_use]
    pub fn new(
        wallet: Option<Arc<dyn WalletPort>>,
        programs: Arc<dyn ProgramHandleFactory>,
        expected_provider: impl Into<String>,
    ) -> Self {
        Self {
            wallet,
            programs,
            expected_provider: expected_provider.into(),
        }
    }

    /// Runs one command to completion.
    pub async fn execute(&self, command: Command) -> PortalEvent {
        match command {
            Command::CheckWallet => PortalEvent::WalletChecked(self.check_wallet().await),
            Command::FetchRecords(ticket) => self.fetch_records(ticket).await,
            Command::InitializeStorage => {
                let result = match self.program() {
                    Ok(program) => program.initialize().await,
                    Err(e) => Err(e),
                };
                PortalEvent::StorageInitialized(
                    result.map_err(|e| OperationFailure::new(Operation::InitializeStorage, e)),
                )
            }
            Command::SubmitRecord(link) => {
                let result = match self.program() {
                    Ok(program) => program.add_gif(&link).await,
                    Err(e) => Err(e),
                };
                PortalEvent::RecordSubmitted {
                    link,
                    result: result.map_err(|e| OperationFailure::new(Operation::SubmitRecord, e)),
                }
            }
            Command::CastVote(index) => {
                let result = match self.program() {
                    Ok(program) => program.vote_gif(index).await,
                    Err(e) => Err(e),
                };
                PortalEvent::VoteCast {
                    index,
                    result: result.map_err(|e| OperationFailure::new(Operation::CastVote, e)),
                }
            }
        }
    }

    async fn check_wallet(&self) -> Result<Pubkey, WalletError> {
        let Some(wallet) = &self.wallet else {
            return Err(WalletError::NotInstalled);
        };

        let provider = wallet.provider_name();
        if provider != self.expected_provider {
            return Err(WalletError::UnexpectedProvider {
                found: provider,
                expected: self.expected_provider.clone(),
            });
        }

        info!(provider = %provider, "Wallet found, requesting approval");
        wallet.connect().await
    }

    async fn fetch_records(&self, ticket: FetchTicket) -> PortalEvent {
        debug!(ticket = ticket.value(), "Fetching GIF list");
        let result: Result<Vec<GifRecord>, FetchError> = match self.program() {
            Ok(program) => program.fetch_records().await,
            Err(e) => Err(FetchError::Failed(e)),
        };
        PortalEvent::RecordsFetched { ticket, result }
    }

    fn program(&self) -> Result<Arc<dyn GifProgramPort>, ProgramError> {
        let wallet = self
            .wallet
            .as_ref()
            .filter(|wallet| wallet.public_key().is_some())
            .ok_or(ProgramError::WalletNotConnected)?;
        Ok(self.programs.handle(Arc::clone(wallet)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::portal::{PortalSettings, PortalState};
    use crate::domain::ports::mocks::{FixedWallet, InMemoryGifProgram, MockWalletPort};

    fn key(byte: u8) -> Pubkey {
        Pubkey::new_from_array([byte; 32])
    }

    #[tokio::test]
    async fn test_check_without_wallet_is_not_installed() {
        let service = PortalService::new(None, Arc::new(InMemoryGifProgram::new()), "keypair-file");

        let event = service.execute(Command::CheckWallet).await;

        assert!(matches!(
            event,
            PortalEvent::WalletChecked(Err(WalletError::NotInstalled))
        ));
    }

    #[tokio::test]
    async fn test_check_rejects_unexpected_provider_without_connecting() {
        let mut wallet = MockWalletPort::new();
        wallet
            .expect_provider_name()
            .return_const("browser".to_string());
        wallet.expect_connect().never();

        let wallet: Arc<dyn WalletPort> = Arc::new(wallet);
        let service = PortalService::new(
            Some(wallet),
            Arc::new(InMemoryGifProgram::new()),
            "keypair-file",
        );

        let event = service.execute(Command::CheckWallet).await;

        assert!(matches!(
            event,
            PortalEvent::WalletChecked(Err(WalletError::UnexpectedProvider { .. }))
        ));
    }

    #[tokio::test]
    async fn test_check_requests_approval() {
        let mut wallet = MockWalletPort::new();
        wallet
            .expect_provider_name()
            .return_const("keypair-file".to_string());
        wallet.expect_connect().times(1).returning(|| Ok(key(4)));

        let wallet: Arc<dyn WalletPort> = Arc::new(wallet);
        let service = PortalService::new(
            Some(wallet),
            Arc::new(InMemoryGifProgram::new()),
            "keypair-file",
        );

        let event = service.execute(Command::CheckWallet).await;

        assert!(matches!(event, PortalEvent::WalletChecked(Ok(k)) if k == key(4)));
    }

    #[tokio::test]
    async fn test_program_calls_need_connected_wallet() {
        let program = InMemoryGifProgram::new();
        let wallet: Arc<dyn WalletPort> = Arc::new(FixedWallet::new(key(1), "keypair-file"));
        let service = PortalService::new(Some(wallet), Arc::new(program.clone()), "keypair-file");

        let event = service
            .execute(Command::SubmitRecord("http://x/a.gif".to_string()))
            .await;

        let PortalEvent::RecordSubmitted { result, .. } = event else {
            panic!("unexpected event");
        };
        assert_eq!(result.unwrap_err().operation, Operation::SubmitRecord);
        assert_eq!(program.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_missing_account_is_not_found() {
        let wallet: Arc<dyn WalletPort> = Arc::new(FixedWallet::new(key(1), "keypair-file"));
        wallet.connect().await.unwrap();
        let service = PortalService::new(
            Some(wallet),
            Arc::new(InMemoryGifProgram::new()),
            "keypair-file",
        );

        let mut state = PortalState::new(PortalSettings::new("keypair-file"));
        state.apply(service.execute(Command::CheckWallet).await);
        let command = state.fetch_record_list().unwrap();

        let PortalEvent::RecordsFetched { result, .. } = service.execute(command).await else {
            panic!("unexpected event");
        };
        assert_eq!(result, Err(FetchError::NotFound));
    }
}
