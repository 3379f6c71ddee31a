//! Record list rendered as vote cards.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::domain::entities::GifRecord;

const CARD_HEIGHT: u16 = 4;
const VOTE_LABEL: &str = "[ Vote ]";

/// Selection and scroll position of the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GifGridState {
    selected: Option<usize>,
    offset: usize,
    focused: bool,
}

impl GifGridState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(len - 1)));
    }

    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    /// Keeps the selection inside a list of `len` records.
    pub fn clamp(&mut self, len: usize) {
        self.selected = match (self.selected, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.min(len - 1)),
        };
        self.offset = self.offset.min(len.saturating_sub(1));
    }

    fn scroll_into_view(&mut self, visible: usize) {
        let Some(selected) = self.selected else {
            self.offset = 0;
            return;
        };
        if selected < self.offset {
            self.offset = selected;
        } else if visible > 0 && selected >= self.offset + visible {
            self.offset = selected + 1 - visible;
        }
    }
}

/// Renders one card per record: link, disabled vote count and a vote action.
pub struct GifGrid<'a> {
    records: &'a [GifRecord],
}

impl<'a> GifGrid<'a> {
    #[must_use]
    pub const fn new(records: &'a [GifRecord]) -> Self {
        Self { records }
    }

    fn render_card(record: &GifRecord, selected: bool, area: Rect, buf: &mut Buffer) {
        let border_style = if selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(
                format!(" {} ", record.submitter().short()),
                Style::default().fg(Color::Gray),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        let [link_area, action_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

        Paragraph::new(record.link())
            .style(Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED))
            .render(link_area, buf);

        let vote_style = if selected {
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        Line::from(vec![
            Span::styled(
                format!("Votes: {}", record.votes_display()),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ),
            Span::raw("  "),
            Span::styled(VOTE_LABEL, vote_style),
        ])
        .render(action_area, buf);
    }
}

impl StatefulWidget for GifGrid<'_> {
    type State = GifGridState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if self.records.is_empty() {
            Paragraph::new("No GIFs yet. Be the first to share one!")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        state.clamp(self.records.len());
        let visible = usize::from((area.height / CARD_HEIGHT).max(1));
        state.scroll_into_view(visible);

        let mut y = area.y;
        for (index, record) in self.records.iter().enumerate().skip(state.offset) {
            if y + CARD_HEIGHT > area.y + area.height {
                break;
            }
            let card = Rect::new(area.x, y, area.width, CARD_HEIGHT);
            let selected = state.focused && state.selected == Some(index);
            Self::render_card(record, selected, card, buf);
            y += CARD_HEIGHT;
        }
    }
}
