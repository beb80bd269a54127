//! Ratatui rendering of the day-list surface.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::collab::ListSurface;
use crate::programme::Event;

#[derive(Default)]
pub struct DayListView {
    day_title: String,
    rows: Vec<Event>,
    selected: Option<usize>,
    up_arrow: bool,
    down_arrow: bool,
}

impl DayListView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }
}

impl ListSurface for DayListView {
    fn set_day_title(&mut self, title: String) {
        self.day_title = title;
    }

    fn set_rows(&mut self, events: &[Event]) {
        self.rows = events.to_vec();
    }

    fn select_row(&mut self, index: usize) {
        self.selected = Some(index);
    }

    fn show_up_arrow(&mut self, visible: bool) {
        self.up_arrow = visible;
    }

    fn show_down_arrow(&mut self, visible: bool) {
        self.down_arrow = visible;
    }
}

pub fn render_day_list(f: &mut Frame, view: &DayListView, area: Rect) {
    let title = format!(" {} ", view.day_title);
    let block = Block::default()
        .title(Span::styled(title, Style::new().fg(Color::Cyan)))
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible = inner.height.saturating_sub(2) as usize;
    let first = view
        .selected
        .map_or(0, |s| (s / visible.max(1)) * visible.max(1));

    let mut lines = vec![arrow_line(view.up_arrow, "▲")];
    for (offset, event) in view.rows.iter().skip(first).take(visible).enumerate() {
        let index = first + offset;
        let style = if view.selected == Some(index) {
            Style::new().reversed()
        } else {
            Style::new()
        };
        let text = format!(
            "{} - {}  {}",
            format_hhmm(event.start_ms),
            format_hhmm(event.end_ms),
            event.title
        );
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines.push(arrow_line(view.down_arrow, "▼"));
    f.render_widget(Paragraph::new(lines), inner);
}

fn arrow_line(visible: bool, glyph: &str) -> Line<'static> {
    if visible {
        Line::from(Span::styled(
            format!("  {glyph}"),
            Style::new().fg(Color::Gray),
        ))
    } else {
        Line::from("")
    }
}

fn format_hhmm(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}
