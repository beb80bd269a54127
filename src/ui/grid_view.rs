//! Ratatui rendering of the grid surface.
//!
//! [`GridView`] retains whatever the engine pushed through [`GridSurface`];
//! [`render_grid`] draws that model. Cell layout is proportional to event
//! duration within the window, in character cells.

use std::collections::HashMap;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::collab::GridSurface;
use crate::programme::{ChannelRow, ServiceId};
use crate::timebase::TimeWindow;

const CHANNEL_COL_WIDTH: u16 = 10;

#[derive(Default)]
pub struct GridView {
    slot_labels: Vec<String>,
    date_title: String,
    left_arrow: bool,
    right_arrow: bool,
    dimmed: bool,
    now_x: Option<u16>,
    rows: Vec<ChannelRow>,
    selected: Option<(usize, usize)>,
    no_events: bool,
    width: u16,
    window: Option<TimeWindow>,
    channel_names: HashMap<ServiceId, String>,
}

impl GridView {
    #[must_use]
    pub fn new(width: u16) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Window bounds for proportional cell layout. Wired by the app, not
    /// part of the surface contract.
    pub fn set_window(&mut self, window: TimeWindow) {
        self.window = Some(window);
    }

    pub fn set_channel_names(&mut self, names: impl IntoIterator<Item = (ServiceId, String)>) {
        self.channel_names = names.into_iter().collect();
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width;
    }

    fn channel_name(&self, service: ServiceId) -> String {
        self.channel_names
            .get(&service)
            .cloned()
            .unwrap_or_else(|| format!("Ch {}", service.0))
    }
}

impl GridSurface for GridView {
    fn set_slot_labels(&mut self, labels: Vec<String>) {
        self.slot_labels = labels;
    }

    fn set_date_title(&mut self, title: String) {
        self.date_title = title;
    }

    fn show_left_arrow(&mut self, visible: bool) {
        self.left_arrow = visible;
    }

    fn show_right_arrow(&mut self, visible: bool) {
        self.right_arrow = visible;
    }

    fn set_dimmed(&mut self, dimmed: bool) {
        self.dimmed = dimmed;
    }

    fn grid_width(&self) -> u16 {
        self.width
    }

    fn set_now_marker_x(&mut self, x: Option<u16>) {
        self.now_x = x;
    }

    fn set_rows(&mut self, rows: &[ChannelRow]) {
        self.rows = rows.to_vec();
    }

    fn select_cell(&mut self, row: usize, item: usize) {
        self.selected = Some((row, item));
    }

    fn show_no_events(&mut self, visible: bool) {
        self.no_events = visible;
        if visible {
            self.selected = None;
        }
    }
}

pub fn render_grid(f: &mut Frame, view: &GridView, area: Rect) {
    let base = if view.dimmed {
        Style::new().dim()
    } else {
        Style::new()
    };

    let title = format!(" {} ", view.date_title);
    let block = Block::default()
        .title(Span::styled(title, Style::new().fg(Color::Cyan)))
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let track = inner.width.saturating_sub(CHANNEL_COL_WIDTH);
    let mut lines = vec![
        time_axis_line(view, track, base),
        now_marker_line(view.now_x, track),
    ];
    for (row_index, row) in view.rows.iter().enumerate() {
        lines.push(channel_line(view, row_index, row, track, base));
    }
    if view.no_events {
        lines.push(Line::from(Span::styled(
            "  No events available",
            Style::new().fg(Color::Yellow),
        )));
    }
    f.render_widget(Paragraph::new(lines).style(base), inner);
}

fn time_axis_line(view: &GridView, track: u16, base: Style) -> Line<'static> {
    let left = if view.left_arrow { "◀" } else { " " };
    let right = if view.right_arrow { "▶" } else { " " };
    let slots = view.slot_labels.len().max(1) as u16;
    let slot_width = (track / slots) as usize;

    let mut spans = vec![Span::styled(
        format!("{left:<width$}", width = CHANNEL_COL_WIDTH as usize - 1),
        base.fg(Color::Gray),
    )];
    for label in &view.slot_labels {
        spans.push(Span::styled(
            format!("{label:<slot_width$}"),
            base.fg(Color::Gray).bold(),
        ));
    }
    spans.push(Span::styled(right.to_string(), base.fg(Color::Gray)));
    Line::from(spans)
}

fn now_marker_line(now_x: Option<u16>, track: u16) -> Line<'static> {
    match now_x {
        Some(x) if x < track => {
            let pad = " ".repeat((CHANNEL_COL_WIDTH + x) as usize);
            Line::from(vec![
                Span::raw(pad),
                Span::styled("▼", Style::new().fg(Color::Red)),
            ])
        }
        _ => Line::from(""),
    }
}

fn channel_line(
    view: &GridView,
    row_index: usize,
    row: &ChannelRow,
    track: u16,
    base: Style,
) -> Line<'static> {
    let name = view.channel_name(row.service);
    let mut spans = vec![Span::styled(
        format!("{name:<width$}", width = CHANNEL_COL_WIDTH as usize),
        base.fg(Color::Magenta),
    )];
    let Some(window) = view.window else {
        return Line::from(spans);
    };
    if window.span <= 0 {
        return Line::from(spans);
    }

    let mut cursor: u16 = 0;
    for (item, event) in row.events.iter().enumerate() {
        let clipped_start = event.display_start().max(window.start);
        let clipped_end = event.end_ms.min(window.end());
        if clipped_end <= clipped_start {
            continue;
        }
        let x0 = ((clipped_start - window.start) * i64::from(track) / window.span) as u16;
        let x1 = (((clipped_end - window.start) * i64::from(track) / window.span) as u16).min(track);
        let x0 = x0.max(cursor);
        if x1 <= x0 {
            continue;
        }
        if x0 > cursor {
            spans.push(Span::raw(" ".repeat((x0 - cursor) as usize)));
        }
        let cell_width = (x1 - x0) as usize;
        let text: String = format!("▏{}", event.title)
            .chars()
            .take(cell_width)
            .collect();
        let style = if view.selected == Some((row_index, item)) {
            base.reversed()
        } else {
            base
        };
        spans.push(Span::styled(
            format!("{text:<cell_width$}"),
            style,
        ));
        cursor = x1;
    }
    Line::from(spans)
}
