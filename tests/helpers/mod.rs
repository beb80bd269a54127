#![allow(dead_code)]

//! Shared fakes for driving the engines without a terminal: capturing
//! providers, recording surfaces and a scriptable channel navigator.

use airtime::collab::{ChannelNavigator, DigitEntry, GridSurface, ListSurface};
use airtime::config::Tuning;
use airtime::fetch::{
    BoundsKind, BoundsSource, DayBatch, DayQuery, DaySource, GridBatch, GridQuery, ProgrammeSource,
};
use airtime::keys::KeyInput;
use airtime::programme::{ChannelRow, Event, ServiceId};

pub fn event(service: u32, id: u32, start_ms: i64, end_ms: i64) -> Event {
    Event {
        event_id: id,
        unique_event_id: format!("{service}-{id}"),
        service_id: ServiceId(service),
        title: format!("Programme {id}"),
        start_ms,
        end_ms,
        is_catch_up: false,
        overlap_start_ms: None,
    }
}

pub fn row(service: u32, events: Vec<Event>) -> ChannelRow {
    ChannelRow {
        service: ServiceId(service),
        events,
    }
}

/// Tuning with small round numbers, handy for exact window arithmetic.
pub fn test_tuning(slot_ms: i64, slots: i64) -> Tuning {
    Tuning {
        slot_ms,
        slots_per_window: slots,
        day_jump_ms: slot_ms * slots,
        grid_tick_ms: 60_000,
        ..Tuning::default()
    }
}

/// Grid provider that records every query; tests answer them explicitly.
#[derive(Default)]
pub struct CaptureGridSource {
    pub queries: Vec<GridQuery>,
}

impl ProgrammeSource for CaptureGridSource {
    fn request_window(&mut self, query: GridQuery) {
        self.queries.push(query);
    }
}

impl CaptureGridSource {
    pub fn batch_for(&self, index: usize, rows: Vec<ChannelRow>) -> GridBatch {
        let query = &self.queries[index];
        GridBatch {
            token: query.token,
            window_start: query.window.start,
            rows,
        }
    }
}

#[derive(Default)]
pub struct CaptureDaySource {
    pub queries: Vec<DayQuery>,
}

impl DaySource for CaptureDaySource {
    fn request_day(&mut self, query: DayQuery) {
        self.queries.push(query);
    }
}

impl CaptureDaySource {
    pub fn batch_for(&self, index: usize, events: Vec<Event>) -> DayBatch {
        let query = &self.queries[index];
        DayBatch {
            token: query.token,
            day_offset: query.day_offset,
            events,
        }
    }
}

#[derive(Default)]
pub struct CaptureBoundsSource {
    pub requests: Vec<BoundsKind>,
}

impl BoundsSource for CaptureBoundsSource {
    fn request_bounds(&mut self, kind: BoundsKind) {
        self.requests.push(kind);
    }
}

/// Records everything the grid engine pushes at its surface.
pub struct FakeGridSurface {
    pub slot_labels: Vec<String>,
    pub date_title: String,
    pub left_arrow: bool,
    pub right_arrow: bool,
    pub dimmed: bool,
    pub now_x: Option<u16>,
    pub rows: Vec<ChannelRow>,
    pub set_rows_calls: u32,
    pub selected: Option<(usize, usize)>,
    pub no_events: bool,
    pub width: u16,
}

impl Default for FakeGridSurface {
    fn default() -> Self {
        Self {
            slot_labels: Vec::new(),
            date_title: String::new(),
            left_arrow: true,
            right_arrow: true,
            dimmed: false,
            now_x: None,
            rows: Vec::new(),
            set_rows_calls: 0,
            selected: None,
            no_events: false,
            width: 100,
        }
    }
}

impl GridSurface for FakeGridSurface {
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
        self.set_rows_calls += 1;
    }

    fn select_cell(&mut self, row: usize, item: usize) {
        self.selected = Some((row, item));
    }

    fn show_no_events(&mut self, visible: bool) {
        self.no_events = visible;
    }
}

#[derive(Default)]
pub struct FakeListSurface {
    pub day_title: String,
    pub rows: Vec<Event>,
    pub set_rows_calls: u32,
    pub selected: Option<usize>,
    pub select_calls: u32,
    pub up_arrow: bool,
    pub down_arrow: bool,
}

impl ListSurface for FakeListSurface {
    fn set_day_title(&mut self, title: String) {
        self.day_title = title;
    }

    fn set_rows(&mut self, events: &[Event]) {
        self.rows = events.to_vec();
        self.set_rows_calls += 1;
    }

    fn select_row(&mut self, index: usize) {
        self.selected = Some(index);
        self.select_calls += 1;
    }

    fn show_up_arrow(&mut self, visible: bool) {
        self.up_arrow = visible;
    }

    fn show_down_arrow(&mut self, visible: bool) {
        self.down_arrow = visible;
    }
}

/// Channel-list collaborator whose visible page follows the selection, like
/// the platform controller's does.
pub struct FakeNavigator {
    pub all: Vec<ServiceId>,
    pub first_visible: usize,
    pub page_rows: usize,
    pub selected_row: usize,
    pub remember: bool,
    pub before_calls: u32,
    pub back_calls: u32,
    pub summaries: Vec<Option<String>>,
    pub catchup_past: Option<bool>,
}

impl FakeNavigator {
    pub fn new(channel_count: u32, page_rows: usize) -> Self {
        Self {
            all: (1..=channel_count).map(ServiceId).collect(),
            first_visible: 0,
            page_rows,
            selected_row: 0,
            remember: false,
            before_calls: 0,
            back_calls: 0,
            summaries: Vec::new(),
            catchup_past: None,
        }
    }
}

impl ChannelNavigator for FakeNavigator {
    fn viewable_channels(&self) -> Vec<ServiceId> {
        self.all
            .iter()
            .skip(self.first_visible)
            .take(self.page_rows)
            .copied()
            .collect()
    }

    fn select_previous_channel(&mut self) -> bool {
        if self.first_visible == 0 {
            return false;
        }
        self.first_visible -= 1;
        true
    }

    fn select_next_channel(&mut self) -> bool {
        if self.first_visible + self.page_rows >= self.all.len() {
            return false;
        }
        self.first_visible += 1;
        true
    }

    fn select_previous_page(&mut self) -> bool {
        if self.first_visible == 0 {
            return false;
        }
        self.first_visible = self.first_visible.saturating_sub(self.page_rows);
        true
    }

    fn select_next_page(&mut self) -> bool {
        if self.first_visible + self.page_rows >= self.all.len() {
            return false;
        }
        self.first_visible += self.page_rows;
        true
    }

    fn selected_index(&self) -> usize {
        self.selected_row
    }

    fn remember_event(&self) -> bool {
        self.remember
    }

    fn before_event_change(&mut self) {
        self.before_calls += 1;
    }

    fn item_selected(&mut self, _event: &Event) {}

    fn update_summary(&mut self, event: Option<&Event>) {
        self.summaries.push(event.map(|e| e.title.clone()));
    }

    fn update_back_button(&mut self) {
        self.back_calls += 1;
    }

    fn update_catchup_title(&mut self, is_past: bool) {
        self.catchup_past = Some(is_past);
    }
}

/// Digit entry that never claims anything.
pub struct NoDigits;

impl DigitEntry for NoDigits {
    fn handle(&mut self, _input: KeyInput) -> bool {
        false
    }
}

/// Digit entry that claims every key, for the short-circuit path.
pub struct GreedyDigits;

impl DigitEntry for GreedyDigits {
    fn handle(&mut self, _input: KeyInput) -> bool {
        true
    }
}
