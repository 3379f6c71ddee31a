//! Portal view state and its transitions.

use tracing::{debug, info, warn};

use crate::application::services::notice;
use crate::domain::entities::{GifRecord, Pubkey, RecordList, Signature};
use crate::domain::errors::{FetchError, RequestError, WalletError};
use crate::domain::{Notification, Operation, OperationFailure, OperationResult};

use super::PortalSettings;

/// Sequence number attached to each issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    /// Returns the raw sequence number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// External call requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CheckWallet,
    FetchRecords(FetchTicket),
    InitializeStorage,
    SubmitRecord(String),
    CastVote(u32),
}

/// Completion of an external call.
#[derive(Debug, Clone)]
pub enum PortalEvent {
    WalletChecked(Result<Pubkey, WalletError>),
    RecordsFetched {
        ticket: FetchTicket,
        result: Result<Vec<GifRecord>, FetchError>,
    },
    StorageInitialized(OperationResult<Signature>),
    RecordSubmitted {
        link: String,
        result: OperationResult<Signature>,
    },
    VoteCast {
        index: u32,
        result: OperationResult<Signature>,
    },
}

/// Follow-up work produced by applying an event.
#[derive(Debug, Default)]
pub struct Transition {
    pub commands: Vec<Command>,
    pub notices: Vec<Notification>,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }

    fn notice(notice: Notification) -> Self {
        Self {
            commands: Vec::new(),
            notices: vec![notice],
        }
    }

    fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }
}

/// Which of the mutually exclusive views is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalView {
    NotConnected,
    Loading,
    NeedsInitialization,
    Unavailable,
    Ready,
}

/// UI state of the portal: wallet, draft link and cached record list.
#[derive(Debug)]
pub struct PortalState {
    settings: PortalSettings,
    wallet_address: Option<Pubkey>,
    draft: String,
    records: RecordList,
    last_ticket: u64,
}

impl PortalState {
    #[must_use]
    pub fn new(settings: PortalSettings) -> Self {
        Self {
            settings,
            wallet_address: None,
            draft: String::new(),
            records: RecordList::NotLoaded,
            last_ticket: 0,
        }
    }

    #[must_use]
    pub const fn wallet_address(&self) -> Option<&Pubkey> {
        self.wallet_address.as_ref()
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub const fn records(&self) -> &RecordList {
        &self.records
    }

    #[must_use]
    pub const fn settings(&self) -> &PortalSettings {
        &self.settings
    }

    #[must_use]
    pub fn view(&self) -> PortalView {
        if self.wallet_address.is_none() {
            return PortalView::NotConnected;
        }
        match self.records {
            RecordList::NotLoaded => PortalView::Loading,
            RecordList::Uninitialized => PortalView::NeedsInitialization,
            RecordList::Unavailable { .. } => PortalView::Unavailable,
            RecordList::Loaded(_) => PortalView::Ready,
        }
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    #[must_use]
    pub const fn check_wallet_connection(&self) -> Command {
        Command::CheckWallet
    }

    #[must_use]
    pub const fn connect_wallet(&self) -> Command {
        self.check_wallet_connection()
    }

    /// # Errors
    /// Returns [`RequestError::NotConnected`] without a wallet.
    pub fn fetch_record_list(&mut self) -> Result<Command, RequestError> {
        self.require_wallet()?;
        Ok(self.issue_fetch())
    }

    /// # Errors
    /// Returns error unless connected and the storage account is known missing.
    pub fn initialize_storage(&self) -> Result<Command, RequestError> {
        self.require_wallet()?;
        if !self.records.is_uninitialized() {
            return Err(RequestError::InitializationNotNeeded);
        }
        Ok(Command::InitializeStorage)
    }

    /// Takes the draft link; the draft is cleared whatever happens next.
    ///
    /// # Errors
    /// Returns error for a blank draft or without a wallet.
    pub fn submit_record(&mut self) -> Result<Command, RequestError> {
        let draft = std::mem::take(&mut self.draft);
        let link = draft.trim();
        if link.is_empty() {
            return Err(RequestError::EmptyLink);
        }
        self.require_wallet()?;
        Ok(Command::SubmitRecord(link.to_string()))
    }

    /// The program enforces bounds; only the index width is checked here.
    ///
    /// # Errors
    /// Returns error without a wallet or for an index wider than `u32`.
    pub fn cast_vote(&self, index: usize) -> Result<Command, RequestError> {
        self.require_wallet()?;
        let index = u32::try_from(index).map_err(|_| RequestError::IndexOverflow(index))?;
        Ok(Command::CastVote(index))
    }

    pub fn apply(&mut self, event: PortalEvent) -> Transition {
        match event {
            PortalEvent::WalletChecked(result) => self.on_wallet_checked(result),
            PortalEvent::RecordsFetched { ticket, result } => self.on_records_fetched(ticket, result),
            PortalEvent::StorageInitialized(result) => {
                self.on_mutation(Operation::InitializeStorage, result, true)
            }
            PortalEvent::RecordSubmitted { link, result } => {
                debug!(link = %link, ok = result.is_ok(), "Submission finished");
                self.on_mutation(Operation::SubmitRecord, result, true)
            }
            PortalEvent::VoteCast { index, result } => {
                debug!(index, ok = result.is_ok(), "Vote finished");
                let refresh = self.settings.refresh_after_vote;
                self.on_mutation(Operation::CastVote, result, refresh)
            }
        }
    }

    fn on_wallet_checked(&mut self, result: Result<Pubkey, WalletError>) -> Transition {
        match result {
            Ok(address) => {
                info!(address = %address, "Wallet connected");
                let changed = self.wallet_address != Some(address);
                self.wallet_address = Some(address);
                if changed {
                    Transition::none().with_command(self.issue_fetch())
                } else {
                    Transition::none()
                }
            }
            Err(WalletError::NotInstalled) => {
                warn!("No wallet provider found");
                Transition::notice(notice::wallet_missing())
            }
            Err(WalletError::UnexpectedProvider { found, expected }) => {
                info!(found = %found, expected = %expected, "Ignoring unexpected wallet provider");
                Transition::none()
            }
            Err(e) => {
                warn!(error = %e, "Wallet connection failed");
                Transition::none()
            }
        }
    }

    fn on_records_fetched(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<GifRecord>, FetchError>,
    ) -> Transition {
        if ticket.0 != self.last_ticket {
            debug!(
                ticket = ticket.0,
                latest = self.last_ticket,
                "Discarding stale fetch result"
            );
            return Transition::none();
        }

        match result {
            Ok(records) => {
                info!(count = records.len(), "Fetched GIF list");
                self.records = RecordList::Loaded(records);
                Transition::none()
            }
            Err(FetchError::NotFound) => {
                info!("Storage account not initialized");
                self.records = RecordList::Uninitialized;
                Transition::none()
            }
            Err(FetchError::Failed(e)) => {
                warn!(error = %e, "Failed to fetch GIF list");
                let failure = OperationFailure::new(Operation::FetchRecords, &e);
                self.records = RecordList::Unavailable {
                    reason: e.to_string(),
                };
                Transition::notice(notice::failure(&failure))
            }
        }
    }

    fn on_mutation(
        &mut self,
        operation: Operation,
        result: OperationResult<Signature>,
        refresh: bool,
    ) -> Transition {
        match result {
            Ok(signature) => {
                info!(operation = %operation, signature = %signature, "Operation confirmed");
                let transition = Transition::notice(notice::success(operation));
                if refresh && self.wallet_address.is_some() {
                    transition.with_command(self.issue_fetch())
                } else {
                    transition
                }
            }
            Err(failure) => {
                warn!(operation = %operation, reason = %failure.reason, "Operation failed");
                Transition::notice(notice::failure(&failure))
            }
        }
    }

    fn issue_fetch(&mut self) -> Command {
        self.last_ticket += 1;
        Command::FetchRecords(FetchTicket(self.last_ticket))
    }

    fn require_wallet(&self) -> Result<Pubkey, RequestError> {
        self.wallet_address.ok_or(RequestError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationLevel;
    use crate::domain::errors::ProgramError;
    use test_case::test_case;

    fn connected_state() -> (PortalState, FetchTicket) {
        let mut state = PortalState::new(PortalSettings::new("keypair-file"));
        let transition = state.apply(PortalEvent::WalletChecked(Ok(Pubkey::default())));
        let Some(Command::FetchRecords(ticket)) = transition.commands.first().cloned() else {
            panic!("expected fetch after connect");
        };
        (state, ticket)
    }

    fn record(link: &str, votes: u64) -> GifRecord {
        GifRecord::new(link, votes, Pubkey::default())
    }

    #[test]
    fn test_initial_view_is_not_connected() {
        let state = PortalState::new(PortalSettings::new("keypair-file"));
        assert_eq!(state.view(), PortalView::NotConnected);
        assert_eq!(state.records(), &RecordList::NotLoaded);
    }

    #[test]
    fn test_connect_issues_fetch_and_loads() {
        let (mut state, ticket) = connected_state();
        assert_eq!(state.view(), PortalView::Loading);

        state.apply(PortalEvent::RecordsFetched {
            ticket,
            result: Ok(vec![record("g1", 0)]),
        });

        assert_eq!(state.view(), PortalView::Ready);
        assert_eq!(state.records().len(), 1);
    }

    #[test]
    fn test_reconnect_same_address_does_not_refetch() {
        let (mut state, _) = connected_state();
        let transition = state.apply(PortalEvent::WalletChecked(Ok(Pubkey::default())));
        assert!(transition.commands.is_empty());
    }

    #[test]
    fn test_missing_wallet_shows_notice() {
        let mut state = PortalState::new(PortalSettings::new("keypair-file"));
        let transition = state.apply(PortalEvent::WalletChecked(Err(WalletError::NotInstalled)));

        assert_eq!(transition.notices.len(), 1);
        assert!(transition.notices[0].message.contains("Wallet not found"));
        assert!(state.wallet_address().is_none());
    }

    #[test_case(WalletError::rejected("user said no") ; "rejected")]
    #[test_case(WalletError::UnexpectedProvider { found: "x".into(), expected: "y".into() } ; "unexpected_provider")]
    fn test_other_wallet_failures_are_silent(error: WalletError) {
        let mut state = PortalState::new(PortalSettings::new("keypair-file"));
        let transition = state.apply(PortalEvent::WalletChecked(Err(error)));

        assert!(transition.notices.is_empty());
        assert!(transition.commands.is_empty());
        assert_eq!(state.view(), PortalView::NotConnected);
    }

    #[test]
    fn test_not_found_sets_uninitialized_marker() {
        let (mut state, ticket) = connected_state();
        state.apply(PortalEvent::RecordsFetched {
            ticket,
            result: Err(FetchError::NotFound),
        });

        assert_eq!(state.records(), &RecordList::Uninitialized);
        assert_eq!(state.view(), PortalView::NeedsInitialization);
    }

    #[test]
    fn test_other_read_failure_is_unavailable_not_partial() {
        let (mut state, ticket) = connected_state();
        let transition = state.apply(PortalEvent::RecordsFetched {
            ticket,
            result: Err(FetchError::Failed(ProgramError::network("timeout"))),
        });

        assert!(matches!(state.records(), RecordList::Unavailable { .. }));
        assert!(state.records().records().is_none());
        assert_eq!(transition.notices[0].level, NotificationLevel::Error);
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let (mut state, first) = connected_state();
        let Command::FetchRecords(second) = state.fetch_record_list().unwrap() else {
            panic!("expected fetch");
        };

        state.apply(PortalEvent::RecordsFetched {
            ticket: second,
            result: Ok(vec![record("new", 0)]),
        });
        state.apply(PortalEvent::RecordsFetched {
            ticket: first,
            result: Ok(vec![record("old", 0)]),
        });

        assert_eq!(state.records().records().unwrap()[0].link(), "new");
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "spaces")]
    #[test_case("\t\n" ; "tabs_and_newlines")]
    fn test_blank_submission_rejected(draft: &str) {
        let (mut state, _) = connected_state();
        state.set_draft(draft);

        assert_eq!(state.submit_record(), Err(RequestError::EmptyLink));
        assert_eq!(state.draft(), "");
        assert_eq!(state.records(), &RecordList::NotLoaded);
    }

    #[test]
    fn test_submission_clears_draft_and_trims() {
        let (mut state, _) = connected_state();
        state.set_draft("  http://x/a.gif ");

        assert_eq!(
            state.submit_record(),
            Ok(Command::SubmitRecord("http://x/a.gif".to_string()))
        );
        assert_eq!(state.draft(), "");
    }

    #[test]
    fn test_submission_requires_wallet() {
        let mut state = PortalState::new(PortalSettings::new("keypair-file"));
        state.set_draft("http://x/a.gif");
        assert_eq!(state.submit_record(), Err(RequestError::NotConnected));
        assert_eq!(state.draft(), "");
    }

    #[test]
    fn test_initialize_guarded_by_marker() {
        let (mut state, ticket) = connected_state();
        assert_eq!(
            state.initialize_storage(),
            Err(RequestError::InitializationNotNeeded)
        );

        state.apply(PortalEvent::RecordsFetched {
            ticket,
            result: Err(FetchError::NotFound),
        });
        assert_eq!(state.initialize_storage(), Ok(Command::InitializeStorage));
    }

    #[test]
    fn test_successful_mutation_refetches() {
        let (mut state, _) = connected_state();
        let transition = state.apply(PortalEvent::RecordSubmitted {
            link: "g".to_string(),
            result: Ok(Signature::default()),
        });

        assert!(matches!(
            transition.commands.as_slice(),
            [Command::FetchRecords(_)]
        ));
        assert_eq!(transition.notices[0].level, NotificationLevel::Info);
    }

    #[test]
    fn test_failed_mutation_keeps_list_and_reports_reason() {
        let (mut state, ticket) = connected_state();
        state.apply(PortalEvent::RecordsFetched {
            ticket,
            result: Ok(vec![record("g1", 3)]),
        });

        let transition = state.apply(PortalEvent::VoteCast {
            index: 7,
            result: Err(OperationFailure::new(
                Operation::CastVote,
                "index out of bounds",
            )),
        });

        assert!(transition.commands.is_empty());
        assert!(transition.notices[0].message.contains("index out of bounds"));
        assert_eq!(state.records().len(), 1);
    }

    #[test]
    fn test_vote_refresh_can_be_disabled() {
        let mut state =
            PortalState::new(PortalSettings::new("keypair-file").with_refresh_after_vote(false));
        state.apply(PortalEvent::WalletChecked(Ok(Pubkey::default())));

        let transition = state.apply(PortalEvent::VoteCast {
            index: 0,
            result: Ok(Signature::default()),
        });

        assert!(transition.commands.is_empty());
        assert_eq!(transition.notices.len(), 1);
    }

    #[test]
    fn test_vote_passes_index_through() {
        let (state, _) = connected_state();
        assert_eq!(state.cast_vote(4), Ok(Command::CastVote(4)));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_vote_index_overflow() {
        let (state, _) = connected_state();
        let index = u32::MAX as usize + 1;
        assert_eq!(
            state.cast_vote(index),
            Err(RequestError::IndexOverflow(index))
        );
    }
}
