//! Demo wiring for the binary: a deterministic synthetic programme source
//! plus in-process stand-ins for the platform collaborators (channel lineup,
//! direct number entry).
//!
//! The source answers every query from a generated schedule spanning a
//! fortnight around startup, after a short artificial latency, so the
//! dim-while-fetching and stale-discard paths are exercised for real.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::collab::{ChannelNavigator, DigitEntry};
use crate::daylist::day_span;
use crate::fetch::{
    BoundsKind, BoundsSource, BoundsUpdate, DayBatch, DayQuery, DaySource, GridBatch, GridQuery,
    ProgrammeSource,
};
use crate::keys::{Key, KeyInput};
use crate::programme::{ChannelRow, Event, ServiceId};
use crate::timebase::{self, ONE_DAY_MS};

const TITLES: &[&str] = &[
    "Morning Report",
    "Harbour Lives",
    "The Quiz Hour",
    "Night Owls",
    "Weather Now",
    "Grand Prix Review",
    "Cooking It",
    "Archive Cinema",
];

/// Responses flowing back from the provider tasks into the event loop.
#[derive(Debug)]
pub enum ProviderReply {
    Grid(GridBatch),
    Day(DayBatch),
    Bounds(BoundsUpdate),
}

/// Deterministic schedule generator behind all three provider seams.
#[derive(Clone)]
pub struct SyntheticSource {
    reply_tx: UnboundedSender<ProviderReply>,
    anchor_ms: i64,
    latency: Duration,
}

impl SyntheticSource {
    #[must_use]
    pub fn new(reply_tx: UnboundedSender<ProviderReply>, anchor_ms: i64) -> Self {
        Self {
            reply_tx,
            anchor_ms,
            latency: Duration::from_millis(120),
        }
    }

    fn earliest(&self) -> i64 {
        timebase::floor_to_span(self.anchor_ms, ONE_DAY_MS) - 7 * ONE_DAY_MS
    }

    fn latest(&self) -> i64 {
        timebase::floor_to_span(self.anchor_ms, ONE_DAY_MS) + 8 * ONE_DAY_MS
    }

    /// Events for one service overlapping `[from, to)`. Each service runs
    /// back-to-back programmes of a fixed length (30/60/90 minutes by
    /// service number), so any range can be generated independently.
    #[must_use]
    pub fn events_between(&self, service: ServiceId, from: i64, to: i64) -> Vec<Event> {
        let period = 30 * 60_000 * (1 + i64::from(service.0 % 3));
        let origin = self.earliest();
        let mut events = Vec::new();
        let mut start = (origin + (from - origin).div_euclid(period) * period).max(origin);
        while start < to && start < self.latest() {
            let end = (start + period).min(self.latest());
            let index = (start - origin) / period;
            events.push(Event {
                event_id: index as u32,
                unique_event_id: format!("{}-{}", service.0, index),
                service_id: service,
                title: TITLES[(i64::from(service.0) + index) as usize % TITLES.len()].to_string(),
                start_ms: start,
                end_ms: end,
                is_catch_up: end <= self.anchor_ms,
                overlap_start_ms: (start < from).then_some(from),
            });
            start += period;
        }
        events
    }

    fn deliver_later(&self, reply: ProviderReply) {
        let tx = self.reply_tx.clone();
        let latency = self.latency;
        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            let _ = tx.send(reply);
        });
    }
}

impl ProgrammeSource for SyntheticSource {
    fn request_window(&mut self, query: GridQuery) {
        let rows = query
            .channels
            .iter()
            .map(|&service| ChannelRow {
                service,
                events: self.events_between(service, query.window.start, query.window.end()),
            })
            .collect();
        self.deliver_later(ProviderReply::Grid(GridBatch {
            token: query.token,
            window_start: query.window.start,
            rows,
        }));
    }
}

impl DaySource for SyntheticSource {
    fn request_day(&mut self, query: DayQuery) {
        let now = chrono::Utc::now().timestamp_millis();
        let (from, to) = day_span(now, query.day_offset);
        let events = self.events_between(query.service, from, to);
        self.deliver_later(ProviderReply::Day(DayBatch {
            token: query.token,
            day_offset: query.day_offset,
            events,
        }));
    }
}

impl BoundsSource for SyntheticSource {
    fn request_bounds(&mut self, kind: BoundsKind) {
        let edge_ms = Some(match kind {
            BoundsKind::Earliest => self.earliest(),
            BoundsKind::Latest => self.latest(),
        });
        self.deliver_later(ProviderReply::Bounds(BoundsUpdate { kind, edge_ms }));
    }
}

/// In-process channel lineup standing in for the platform's channel-list
/// controller.
pub struct Lineup {
    services: Vec<(ServiceId, String)>,
    selected: usize,
    page_size: usize,
    pub last_summary: Option<String>,
    pub catchup_title_past: bool,
}

impl Lineup {
    #[must_use]
    pub fn new(services: Vec<(ServiceId, String)>, page_size: usize) -> Self {
        Self {
            services,
            selected: 0,
            page_size: page_size.max(1),
            last_summary: None,
            catchup_title_past: false,
        }
    }

    fn page_start(&self) -> usize {
        (self.selected / self.page_size) * self.page_size
    }

    #[must_use]
    pub fn selected_service(&self) -> ServiceId {
        self.services[self.selected].0
    }

    #[must_use]
    pub fn names(&self) -> Vec<(ServiceId, String)> {
        self.services.clone()
    }

    /// Jump to a channel by its number, as typed by the user.
    pub fn select_number(&mut self, number: u32) -> bool {
        match self.services.iter().position(|(id, _)| id.0 == number) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }
}

impl ChannelNavigator for Lineup {
    fn viewable_channels(&self) -> Vec<ServiceId> {
        self.services
            .iter()
            .skip(self.page_start())
            .take(self.page_size)
            .map(|(id, _)| *id)
            .collect()
    }

    fn select_previous_channel(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        true
    }

    fn select_next_channel(&mut self) -> bool {
        if self.selected + 1 >= self.services.len() {
            return false;
        }
        self.selected += 1;
        true
    }

    fn select_previous_page(&mut self) -> bool {
        if self.page_start() == 0 {
            return false;
        }
        self.selected = self.page_start() - self.page_size;
        true
    }

    fn select_next_page(&mut self) -> bool {
        let next = self.page_start() + self.page_size;
        if next >= self.services.len() {
            return false;
        }
        self.selected = next;
        true
    }

    fn selected_index(&self) -> usize {
        self.selected - self.page_start()
    }

    fn remember_event(&self) -> bool {
        false
    }

    fn before_event_change(&mut self) {
        self.last_summary = None;
    }

    fn item_selected(&mut self, event: &Event) {
        info!(title = %event.title, "item selected");
    }

    fn update_summary(&mut self, event: Option<&Event>) {
        self.last_summary = event.map(|e| e.title.clone());
    }

    fn update_back_button(&mut self) {}

    fn update_catchup_title(&mut self, is_past: bool) {
        self.catchup_title_past = is_past;
    }
}

/// Direct channel-number entry: buffers digits, commits on the third digit
/// or on Select, clears on Back.
#[derive(Default)]
pub struct DigitBuffer {
    digits: String,
    committed: Option<u32>,
}

impl DigitBuffer {
    /// The channel number committed since the last call, if any.
    pub fn take_committed(&mut self) -> Option<u32> {
        self.committed.take()
    }

    #[must_use]
    pub fn pending(&self) -> &str {
        &self.digits
    }

    fn commit(&mut self) {
        self.committed = self.digits.parse().ok();
        self.digits.clear();
    }
}

impl DigitEntry for DigitBuffer {
    fn handle(&mut self, input: KeyInput) -> bool {
        match input.key {
            Key::Digit(d) => {
                self.digits.push((b'0' + d) as char);
                if self.digits.len() >= 3 {
                    self.commit();
                }
                true
            }
            Key::Select if !self.digits.is_empty() => {
                self.commit();
                true
            }
            Key::Back if !self.digits.is_empty() => {
                self.digits.clear();
                true
            }
            _ => false,
        }
    }
}
