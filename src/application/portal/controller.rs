//! Portal controller sequencing user actions and external calls.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::Notification;
use crate::domain::errors::RequestError;
use crate::domain::ports::{ProgramHandleFactory, WalletPort};

use super::service::PortalService;
use super::state::{Command, PortalEvent, PortalState};
use super::PortalSettings;

/// Owns the portal state and runs external calls as background tasks.
///
/// Calls run concurrently with no mutual exclusion; their completions come
/// back through [`next_event`](Self::next_event) and must be fed to
/// [`apply`](Self::apply) on the UI task.
pub struct PortalController {
    state: PortalState,
    service: PortalService,
    event_tx: mpsc::UnboundedSender<PortalEvent>,
    event_rx: mpsc::UnboundedReceiver<PortalEvent>,
    in_flight: usize,
}

impl PortalController {
    #[must_use]
    pub fn new(
        settings: PortalSettings,
        wallet: Option<Arc<dyn WalletPort>>,
        programs: Arc<dyn ProgramHandleFactory>,
    ) -> Self {
        let service = PortalService::new(wallet, programs, settings.expected_provider.clone());
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            state: PortalState::new(settings),
            service,
            event_tx,
            event_rx,
            in_flight: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PortalState {
        &self.state
    }

    /// Number of external calls not yet applied.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.state.set_draft(draft);
    }

    pub fn check_wallet_connection(&mut self) {
        let command = self.state.check_wallet_connection();
        self.dispatch(command);
    }

    pub fn connect_wallet(&mut self) {
        let command = self.state.connect_wallet();
        self.dispatch(command);
    }

    /// # Errors
    /// Returns error if no wallet is connected.
    pub fn fetch_record_list(&mut self) -> Result<(), RequestError> {
        let command = self.state.fetch_record_list()?;
        self.dispatch(command);
        Ok(())
    }

    /// # Errors
    /// Returns error unless the storage account is known to be missing.
    pub fn initialize_storage(&mut self) -> Result<(), RequestError> {
        let command = self.state.initialize_storage()?;
        self.dispatch(command);
        Ok(())
    }

    /// # Errors
    /// Returns error for a blank draft or without a wallet.
    pub fn submit_record(&mut self) -> Result<(), RequestError> {
        let command = self.state.submit_record()?;
        self.dispatch(command);
        Ok(())
    }

    /// # Errors
    /// Returns error without a wallet.
    pub fn cast_vote(&mut self, index: usize) -> Result<(), RequestError> {
        let command = self.state.cast_vote(index)?;
        self.dispatch(command);
        Ok(())
    }

    /// Waits for the next completed external call.
    pub async fn next_event(&mut self) -> Option<PortalEvent> {
        self.event_rx.recv().await
    }

    /// Applies a completion and starts any follow-up calls.
    pub fn apply(&mut self, event: PortalEvent) -> Vec<Notification> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let transition = self.state.apply(event);
        for command in transition.commands {
            self.dispatch(command);
        }
        transition.notices
    }

    /// Applies completions until no call is in flight.
    pub async fn settle(&mut self) -> Vec<Notification> {
        let mut notices = Vec::new();
        while self.in_flight > 0 {
            let Some(event) = self.event_rx.recv().await else {
                break;
            };
            notices.extend(self.apply(event));
        }
        notices
    }

    fn dispatch(&mut self, command: Command) {
        debug!(?command, in_flight = self.in_flight, "Dispatching portal command");
        self.in_flight += 1;

        let service = self.service.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = service.execute(command).await;
            let _ = tx.send(event);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::application::portal::PortalView;
    use crate::domain::entities::{GifRecord, Pubkey, RecordList};
    use crate::domain::errors::ProgramError;
    use crate::domain::ports::mocks::{FixedWallet, InMemoryGifProgram};
    use crate::domain::NotificationLevel;

    const PROVIDER: &str = "keypair-file";

    fn controller(program: &InMemoryGifProgram) -> PortalController {
        let wallet: Arc<dyn WalletPort> =
            Arc::new(FixedWallet::new(Pubkey::new_from_array([2; 32]), PROVIDER));
        PortalController::new(
            PortalSettings::new(PROVIDER),
            Some(wallet),
            Arc::new(program.clone()),
        )
    }

    async fn connected(program: &InMemoryGifProgram) -> PortalController {
        let mut controller = controller(program);
        controller.check_wallet_connection();
        controller.settle().await;
        controller
    }

    fn links(controller: &PortalController) -> Vec<String> {
        controller
            .state()
            .records()
            .records()
            .unwrap_or_default()
            .iter()
            .map(|r| r.link().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_connect_with_missing_account_needs_initialization() {
        let program = InMemoryGifProgram::new();
        let controller = connected(&program).await;

        assert_eq!(controller.state().view(), PortalView::NeedsInitialization);
        assert_eq!(controller.state().records(), &RecordList::Uninitialized);
    }

    #[tokio::test]
    async fn test_missing_wallet_alerts_user() {
        let program = InMemoryGifProgram::new();
        let mut controller =
            PortalController::new(PortalSettings::new(PROVIDER), None, Arc::new(program));

        controller.connect_wallet();
        let notices = controller.settle().await;

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NotificationLevel::Warn);
        assert_eq!(controller.state().view(), PortalView::NotConnected);
    }

    #[tokio::test]
    async fn test_initialize_then_fetch_yields_empty_list() {
        let program = InMemoryGifProgram::new();
        let mut controller = connected(&program).await;

        tokio_test::assert_ok!(controller.initialize_storage());
        let notices = controller.settle().await;

        assert_eq!(controller.state().records(), &RecordList::Loaded(Vec::new()));
        assert_eq!(controller.state().view(), PortalView::Ready);
        assert_eq!(notices[0].level, NotificationLevel::Info);
    }

    #[tokio::test]
    async fn test_initialize_failure_is_surfaced() {
        let program = InMemoryGifProgram::new();
        let mut controller = connected(&program).await;
        program.fail_writes(ProgramError::rejected("insufficient funds"));

        controller.initialize_storage().unwrap();
        let notices = controller.settle().await;

        assert_eq!(notices[0].level, NotificationLevel::Error);
        assert!(notices[0].message.contains("insufficient funds"));
        assert_eq!(controller.state().records(), &RecordList::Uninitialized);
    }

    #[tokio::test]
    async fn test_submit_appends_link_after_refresh() {
        let program = InMemoryGifProgram::with_records(vec![GifRecord::new(
            "g0",
            1,
            Pubkey::default(),
        )]);
        let mut controller = connected(&program).await;

        controller.set_draft("http://x/a.gif");
        controller.submit_record().unwrap();
        assert_eq!(controller.state().draft(), "");
        controller.settle().await;

        assert_eq!(links(&controller).last().map(String::as_str), Some("http://x/a.gif"));
    }

    #[tokio::test]
    async fn test_blank_submit_issues_no_call() {
        let program = InMemoryGifProgram::with_records(Vec::new());
        let mut controller = connected(&program).await;
        let calls = program.call_count();
        let before = controller.state().records().clone();

        controller.set_draft("   ");
        assert_eq!(controller.submit_record(), Err(RequestError::EmptyLink));

        assert_eq!(controller.in_flight(), 0);
        assert_eq!(program.call_count(), calls);
        assert_eq!(controller.state().records(), &before);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_prior_list() {
        let program = InMemoryGifProgram::with_records(vec![GifRecord::new(
            "g0",
            0,
            Pubkey::default(),
        )]);
        let mut controller = connected(&program).await;
        program.fail_writes(ProgramError::network("connection reset"));

        controller.set_draft("http://x/b.gif");
        controller.submit_record().unwrap();
        let notices = controller.settle().await;

        assert_eq!(links(&controller), vec!["g0".to_string()]);
        assert!(notices[0].message.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_vote_out_of_range_is_rejected_without_crash() {
        let program = InMemoryGifProgram::with_records(vec![GifRecord::new(
            "g0",
            0,
            Pubkey::default(),
        )]);
        let mut controller = connected(&program).await;

        controller.cast_vote(5).unwrap();
        let notices = controller.settle().await;

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NotificationLevel::Error);
        assert_eq!(controller.state().view(), PortalView::Ready);
        assert_eq!(links(&controller), vec!["g0".to_string()]);
    }

    #[tokio::test]
    async fn test_vote_refreshes_counts() {
        let program = InMemoryGifProgram::with_records(vec![GifRecord::new(
            "g0",
            0,
            Pubkey::default(),
        )]);
        let mut controller = connected(&program).await;

        controller.cast_vote(0).unwrap();
        controller.settle().await;

        let records = controller.state().records().records().unwrap();
        assert_eq!(records[0].votes(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_submissions_keep_both_links() {
        let program = InMemoryGifProgram::with_records(Vec::new());
        let mut controller = connected(&program).await;
        program.set_latency(Duration::from_millis(5));

        controller.set_draft("http://x/one.gif");
        controller.submit_record().unwrap();
        controller.set_draft("http://x/two.gif");
        controller.submit_record().unwrap();
        assert_eq!(controller.in_flight(), 2);

        controller.settle().await;

        let mut links = links(&controller);
        links.sort();
        assert_eq!(
            links,
            vec!["http://x/one.gif".to_string(), "http://x/two.gif".to_string()]
        );
    }

    #[tokio::test]
    async fn test_read_failure_becomes_unavailable() {
        let program = InMemoryGifProgram::with_records(Vec::new());
        program.fail_reads(ProgramError::network("dns failure"));

        let controller = connected(&program).await;

        assert!(matches!(
            controller.state().records(),
            RecordList::Unavailable { .. }
        ));
        assert_eq!(controller.state().view(), PortalView::Unavailable);
    }

    #[tokio::test]
    async fn test_fetch_requires_wallet() {
        let program = InMemoryGifProgram::new();
        let mut controller = controller(&program);

        assert_eq!(controller.fetch_record_list(), Err(RequestError::NotConnected));
        assert_eq!(controller.initialize_storage(), Err(RequestError::NotConnected));
        assert_eq!(controller.in_flight(), 0);
    }
}
