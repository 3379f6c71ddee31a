use crate::domain::entities::Pubkey;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

pub struct HeaderBarStyle {
    pub background: Style,
    pub title: Style,
    pub subtitle: Style,
    pub network: Style,
    pub wallet_connected: Style,
    pub wallet_disconnected: Style,
}

impl Default for HeaderBarStyle {
    fn default() -> Self {
        Self {
            background: Style::default(),
            title: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            subtitle: Style::default().fg(Color::Gray),
            network: Style::default().fg(Color::White).bg(Color::DarkGray),
            wallet_connected: Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
            wallet_disconnected: Style::default().fg(Color::White).bg(Color::Red),
        }
    }
}

pub struct HeaderBar<'a> {
    title: &'a str,
    subtitle: &'a str,
    network: Option<&'a str>,
    wallet: Option<&'a Pubkey>,
    style: HeaderBarStyle,
}

impl<'a> HeaderBar<'a> {
    #[must_use]
    pub fn new(title: &'a str, subtitle: &'a str) -> Self {
        Self {
            title,
            subtitle,
            network: None,
            wallet: None,
            style: HeaderBarStyle::default(),
        }
    }

    #[must_use]
    pub const fn network(mut self, network: &'a str) -> Self {
        self.network = Some(network);
        self
    }

    #[must_use]
    pub const fn wallet(mut self, wallet: Option<&'a Pubkey>) -> Self {
        self.wallet = wallet;
        self
    }

    fn build_status_spans(&self) -> (Vec<Span<'static>>, u16) {
        let mut spans = Vec::new();
        if let Some(network) = self.network {
            spans.push(Span::styled(format!(" {network} "), self.style.network));
        }
        spans.push(match self.wallet {
            Some(key) => Span::styled(format!(" ● {} ", key.short()), self.style.wallet_connected),
            None => Span::styled(" ○ NO WALLET ".to_string(), self.style.wallet_disconnected),
        });

        let width = spans.iter().map(|span| span.content.width()).sum::<usize>();
        (spans, u16::try_from(width).unwrap_or(u16::MAX))
    }
}

impl Widget for HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        for x in area.left()..area.right() {
            buf[(x, area.y)]
                .set_char(' ')
                .set_style(self.style.background);
        }

        let title = format!(" {} ", self.title);
        let subtitle = format!(" {}", self.subtitle);
        let left_width = u16::try_from(title.width() + subtitle.width()).unwrap_or(u16::MAX);
        let left_line = Line::from(vec![
            Span::styled(title, self.style.title),
            Span::styled(subtitle, self.style.subtitle),
        ]);
        let left_area = Rect::new(area.x, area.y, left_width.min(area.width), 1);
        Paragraph::new(left_line).render(left_area, buf);

        let (status_spans, status_width) = self.build_status_spans();

        if status_width < area.width.saturating_sub(left_width) {
            let right_x = area.right().saturating_sub(status_width);
            let right_area = Rect::new(right_x, area.y, status_width, 1);
            Paragraph::new(Line::from(status_spans)).render(right_area, buf);
        }
    }
}
