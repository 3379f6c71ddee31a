//! Portal screen: wallet prompt, initialization prompt, link input and GIF grid.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, StatefulWidget, Widget, Wrap},
};

use crate::application::portal::{PortalState, PortalView};
use crate::domain::entities::RecordList;
use crate::presentation::events::EventHandler;
use crate::presentation::widgets::{
    FocusContext, FooterBar, GifGrid, GifGridState, HeaderBar, KeyHint, TextInput,
};

const TITLE: &str = "📸 Anime Portal";
const SUBTITLE: &str = "Classic Anime GIFs Collection ✨";
const CREDIT: &str = "built on @_buildspace";
const CONNECT_LABEL: &str = "Connect to Wallet";
const INITIALIZE_LABEL: &str = "Do One-Time Initialization For GIF Program Account";

const NOT_CONNECTED_HINTS: &[KeyHint] = &[
    KeyHint::new("c", "Connect"),
    KeyHint::new("Esc", "Quit"),
];
const INITIALIZE_HINTS: &[KeyHint] = &[
    KeyHint::new("i", "Initialize"),
    KeyHint::new("Esc", "Quit"),
];
const UNAVAILABLE_HINTS: &[KeyHint] = &[KeyHint::new("r", "Retry"), KeyHint::new("Esc", "Quit")];
const LOADING_HINTS: &[KeyHint] = &[KeyHint::new("Esc", "Quit")];
const INPUT_HINTS: &[KeyHint] = &[
    KeyHint::new("Enter", "Submit"),
    KeyHint::new("Tab", "GIFs"),
    KeyHint::new("Esc", "Quit"),
];
const GRID_HINTS: &[KeyHint] = &[
    KeyHint::new("↑↓", "Select"),
    KeyHint::new("v", "Vote"),
    KeyHint::new("o", "Open"),
    KeyHint::new("r", "Refresh"),
    KeyHint::new("Tab", "Input"),
    KeyHint::new("Esc", "Quit"),
];

/// What the app should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalAction {
    None,
    Quit,
    Connect,
    Initialize,
    DraftChanged,
    Submit,
    Vote(usize),
    Open(usize),
    Refresh,
}

/// Screen-local state kept across frames.
#[derive(Debug)]
pub struct PortalScreenState {
    input: TextInput,
    grid: GifGridState,
}

impl PortalScreenState {
    #[must_use]
    pub fn new() -> Self {
        let mut input = TextInput::new(" Submit ").placeholder("Enter gif link!");
        input.set_focused(true);
        Self {
            input,
            grid: GifGridState::new(),
        }
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        self.input.value()
    }

    pub fn clear_draft(&mut self) {
        self.input.clear();
    }

    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.grid.selected()
    }

    #[must_use]
    pub fn focus(&self, view: PortalView) -> FocusContext {
        match view {
            PortalView::Ready if self.grid.is_focused() => FocusContext::Grid,
            PortalView::Ready => FocusContext::LinkInput,
            _ => FocusContext::Prompt,
        }
    }

    fn set_grid_focus(&mut self, focused: bool) {
        self.grid.set_focused(focused);
        self.input.set_focused(!focused);
    }

    /// Maps a key press to an action for the current view.
    pub fn handle_key(&mut self, key: KeyEvent, view: PortalView, records: usize) -> PortalAction {
        if EventHandler::is_quit_event(&key) {
            return PortalAction::Quit;
        }

        match view {
            PortalView::NotConnected => match key.code {
                KeyCode::Char('c') | KeyCode::Enter => PortalAction::Connect,
                _ => PortalAction::None,
            },
            PortalView::NeedsInitialization => match key.code {
                KeyCode::Char('i') | KeyCode::Enter => PortalAction::Initialize,
                _ => PortalAction::None,
            },
            PortalView::Unavailable => match key.code {
                KeyCode::Char('r') => PortalAction::Refresh,
                _ => PortalAction::None,
            },
            PortalView::Loading => PortalAction::None,
            PortalView::Ready => self.handle_ready_key(key, records),
        }
    }

    fn handle_ready_key(&mut self, key: KeyEvent, records: usize) -> PortalAction {
        if EventHandler::is_focus_switch_event(&key) {
            let to_grid = !self.grid.is_focused();
            self.set_grid_focus(to_grid);
            if to_grid {
                self.grid.clamp(records);
            }
            return PortalAction::None;
        }

        match key.code {
            KeyCode::Up => {
                self.set_grid_focus(true);
                self.grid.select_previous(records);
                return PortalAction::None;
            }
            KeyCode::Down => {
                self.set_grid_focus(true);
                self.grid.select_next(records);
                return PortalAction::None;
            }
            _ => {}
        }

        if self.grid.is_focused() {
            return match key.code {
                KeyCode::Char('v') | KeyCode::Enter => {
                    self.grid.selected().map_or(PortalAction::None, PortalAction::Vote)
                }
                KeyCode::Char('o') => {
                    self.grid.selected().map_or(PortalAction::None, PortalAction::Open)
                }
                KeyCode::Char('r') => PortalAction::Refresh,
                _ => PortalAction::None,
            };
        }

        if EventHandler::is_submit_event(&key) {
            return PortalAction::Submit;
        }

        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.input_char(c);
                PortalAction::DraftChanged
            }
            KeyCode::Backspace => {
                self.input.backspace();
                PortalAction::DraftChanged
            }
            KeyCode::Delete => {
                self.input.delete();
                PortalAction::DraftChanged
            }
            KeyCode::Left => {
                self.input.move_left();
                PortalAction::None
            }
            KeyCode::Right => {
                self.input.move_right();
                PortalAction::None
            }
            KeyCode::Home => {
                self.input.move_start();
                PortalAction::None
            }
            KeyCode::End => {
                self.input.move_end();
                PortalAction::None
            }
            _ => PortalAction::None,
        }
    }
}

impl Default for PortalScreenState {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the portal for the current [`PortalState`].
pub struct PortalScreen<'a> {
    portal: &'a PortalState,
    network: &'a str,
}

impl<'a> PortalScreen<'a> {
    #[must_use]
    pub const fn new(portal: &'a PortalState, network: &'a str) -> Self {
        Self { portal, network }
    }

    fn render_button(label: &str, hint: &str, area: Rect, buf: &mut Buffer) {
        let [_, button_area, hint_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        let width = u16::try_from(label.chars().count() + 4)
            .unwrap_or(u16::MAX)
            .min(area.width);
        let [_, button_area, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .areas(button_area);

        Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .render(button_area, buf);

        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .render(hint_area, buf);
    }

    fn render_message(lines: Vec<Line<'_>>, area: Rect, buf: &mut Buffer) {
        let [_, message_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(u16::try_from(lines.len()).unwrap_or(u16::MAX)),
            Constraint::Fill(1),
        ])
        .areas(area);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(message_area, buf);
    }

    fn render_body(&self, view: PortalView, area: Rect, buf: &mut Buffer, state: &mut PortalScreenState) {
        match view {
            PortalView::NotConnected => {
                Self::render_button(CONNECT_LABEL, "press c to connect", area, buf);
            }
            PortalView::Loading => Self::render_message(
                vec![Line::styled("Loading GIFs…", Style::default().fg(Color::Gray))],
                area,
                buf,
            ),
            PortalView::NeedsInitialization => {
                Self::render_button(INITIALIZE_LABEL, "press i to create the storage account", area, buf);
            }
            PortalView::Unavailable => {
                let reason = match self.portal.records() {
                    RecordList::Unavailable { reason } => reason.as_str(),
                    _ => "",
                };
                Self::render_message(
                    vec![
                        Line::styled(
                            "Could not load GIFs",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        Line::styled(reason, Style::default().fg(Color::Gray)),
                        Line::from(vec![
                            Span::styled("press ", Style::default().fg(Color::DarkGray)),
                            Span::styled("r", Style::default().fg(Color::Cyan)),
                            Span::styled(" to retry", Style::default().fg(Color::DarkGray)),
                        ]),
                    ],
                    area,
                    buf,
                );
            }
            PortalView::Ready => {
                let [input_area, grid_area] =
                    Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);
                (&state.input).render(input_area, buf);
                let records = self.portal.records().records().unwrap_or_default();
                GifGrid::new(records).render(grid_area, buf, &mut state.grid);
            }
        }
    }
}

impl StatefulWidget for PortalScreen<'_> {
    type State = PortalScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let view = self.portal.view();
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        HeaderBar::new(TITLE, SUBTITLE)
            .network(self.network)
            .wallet(self.portal.wallet_address())
            .render(header_area, buf);

        let body_area = body_area.inner(ratatui::layout::Margin::new(1, 1));
        self.render_body(view, body_area, buf, state);

        let focus = state.focus(view);
        let hints = match focus {
            FocusContext::LinkInput => INPUT_HINTS,
            FocusContext::Grid => GRID_HINTS,
            FocusContext::Prompt => match view {
                PortalView::NotConnected => NOT_CONNECTED_HINTS,
                PortalView::NeedsInitialization => INITIALIZE_HINTS,
                PortalView::Unavailable => UNAVAILABLE_HINTS,
                PortalView::Loading | PortalView::Ready => LOADING_HINTS,
            },
        };
        FooterBar::new(hints)
            .focus_context(focus)
            .right_info(Some(CREDIT))
            .render(footer_area, buf);
    }
}
