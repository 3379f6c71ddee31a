//! Main application orchestrator.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent};
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::application::services::notice;
use crate::application::{NotificationManager, PortalController};
use crate::domain::Notification;
use crate::domain::errors::RequestError;
use crate::presentation::events::{EventHandler, EventResult};
use crate::presentation::ui::{NotificationPopup, PortalAction, PortalScreen, PortalScreenState};

const TICK_RATE: Duration = Duration::from_millis(250);

pub struct App {
    controller: PortalController,
    screen: PortalScreenState,
    notifications: NotificationManager,
    network: String,
    auto_connect: bool,
    running: bool,
}

impl App {
    #[must_use]
    pub fn new(
        controller: PortalController,
        notification_duration: Duration,
        network: impl Into<String>,
        auto_connect: bool,
    ) -> Self {
        Self {
            controller,
            screen: PortalScreenState::new(),
            notifications: NotificationManager::new(notification_duration),
            network: network.into(),
            auto_connect,
            running: true,
        }
    }

    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        if self.auto_connect {
            debug!("Checking for an approved wallet");
            self.controller.check_wallet_connection();
        }

        self.run_event_loop(terminal).await?;

        info!(
            in_flight = self.controller.in_flight(),
            "Application exiting normally"
        );
        Ok(())
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut tick_interval = interval(TICK_RATE);

        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            let terminal_event = terminal_events.next();

            tokio::select! {
                Some(event) = self.controller.next_event() => {
                    let notices = self.controller.apply(event);
                    self.notifications.extend(notices);
                    terminal.draw(|frame| self.render(frame))?;
                }

                _ = tick_interval.tick() => {
                    if self.notifications.has_notifications() {
                        self.notifications.tick();
                        terminal.draw(|frame| self.render(frame))?;
                    }
                }

                Some(Ok(event)) = terminal_event => {
                    if self.handle_terminal_event(event) == EventResult::Exit {
                        self.running = false;
                    }
                    terminal.draw(|frame| self.render(frame))?;
                }
            }
        }

        Ok(())
    }

    fn handle_terminal_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key(key) if EventHandler::is_press(&key) => self.handle_key(key),
            _ => EventResult::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        let state = self.controller.state();
        let view = state.view();
        let records = state.records().len();

        match self.screen.handle_key(key, view, records) {
            PortalAction::None => EventResult::Continue,
            PortalAction::Quit => EventResult::Exit,
            action => {
                self.handle_action(action);
                EventResult::Consumed
            }
        }
    }

    fn handle_action(&mut self, action: PortalAction) {
        let result = match action {
            PortalAction::None | PortalAction::Quit => Ok(()),
            PortalAction::Connect => {
                self.controller.connect_wallet();
                Ok(())
            }
            PortalAction::Initialize => self.controller.initialize_storage(),
            PortalAction::DraftChanged => {
                self.controller.set_draft(self.screen.draft());
                Ok(())
            }
            PortalAction::Submit => {
                self.controller.set_draft(self.screen.draft());
                self.screen.clear_draft();
                self.controller.submit_record()
            }
            PortalAction::Vote(index) => self.controller.cast_vote(index),
            PortalAction::Open(index) => {
                self.open_link(index);
                Ok(())
            }
            PortalAction::Refresh => self.controller.fetch_record_list(),
        };

        if let Err(error) = result {
            self.reject(&error);
        }
    }

    fn reject(&mut self, error: &RequestError) {
        debug!(%error, "Request refused locally");
        self.notifications.push(notice::rejected(error));
    }

    fn open_link(&mut self, index: usize) {
        let Some(record) = self
            .controller
            .state()
            .records()
            .records()
            .and_then(|records| records.get(index))
        else {
            return;
        };

        if let Err(e) = opener::open(record.link()) {
            warn!(error = %e, link = record.link(), "Failed to open link");
            self.notifications
                .push(Notification::warn("Open", format!("Could not open link: {e}")));
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_stateful_widget(
            PortalScreen::new(self.controller.state(), &self.network),
            area,
            &mut self.screen,
        );

        if let Some(notification) = self.notifications.current_notification() {
            frame.render_widget(NotificationPopup::new(notification), area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

    use crate::application::PortalSettings;
    use crate::application::portal::PortalView;
    use crate::domain::entities::{GifRecord, Pubkey};
    use crate::domain::ports::WalletPort;
    use crate::domain::ports::mocks::{FixedWallet, InMemoryGifProgram};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new_with_kind(
            code,
            KeyModifiers::NONE,
            KeyEventKind::Press,
        ))
    }

    fn app(program: &InMemoryGifProgram) -> App {
        let wallet: Arc<dyn WalletPort> =
            Arc::new(FixedWallet::new(Pubkey::default(), "keypair-file"));
        let controller = PortalController::new(
            PortalSettings::new("keypair-file"),
            Some(wallet),
            Arc::new(program.clone()),
        );
        App::new(controller, Duration::from_secs(5), "testnet", true)
    }

    async fn settle(app: &mut App) {
        let notices = app.controller.settle().await;
        app.notifications.extend(notices);
    }

    #[tokio::test]
    async fn test_connect_initialize_submit_vote() {
        let program = InMemoryGifProgram::new();
        let mut app = app(&program);

        app.handle_terminal_event(key(KeyCode::Char('c')));
        settle(&mut app).await;
        assert_eq!(app.controller.state().view(), PortalView::NeedsInitialization);

        app.handle_terminal_event(key(KeyCode::Char('i')));
        settle(&mut app).await;
        assert_eq!(app.controller.state().view(), PortalView::Ready);

        for c in "http://x/a.gif".chars() {
            app.handle_terminal_event(key(KeyCode::Char(c)));
        }
        app.handle_terminal_event(key(KeyCode::Enter));
        assert!(app.screen.draft().is_empty());
        settle(&mut app).await;

        app.handle_terminal_event(key(KeyCode::Down));
        app.handle_terminal_event(key(KeyCode::Char('v')));
        settle(&mut app).await;

        let records = program.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].link(), "http://x/a.gif");
        assert_eq!(records[0].votes(), 1);
        assert_eq!(
            app.controller.state().records().records().map(<[GifRecord]>::len),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_blank_submit_shows_alert_without_call() {
        let program = InMemoryGifProgram::with_records(Vec::new());
        let mut app = app(&program);
        app.handle_terminal_event(key(KeyCode::Char('c')));
        settle(&mut app).await;
        let calls = program.call_count();
        while app.notifications.has_notifications() {
            app.notifications.dismiss();
        }

        app.handle_terminal_event(key(KeyCode::Char(' ')));
        app.handle_terminal_event(key(KeyCode::Enter));

        assert_eq!(app.controller.in_flight(), 0);
        assert_eq!(program.call_count(), calls);
        let alert = app.notifications.current_notification().unwrap();
        assert_eq!(alert.message, "No gif link given!");
    }

    #[tokio::test]
    async fn test_escape_exits() {
        let program = InMemoryGifProgram::new();
        let mut app = app(&program);

        assert_eq!(app.handle_terminal_event(key(KeyCode::Esc)), EventResult::Exit);
    }
}
