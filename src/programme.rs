//! Programme event model shared by the grid and the day list.

use serde::{Deserialize, Serialize};

use crate::timebase::{self, TimeWindow};

/// Identifier of a broadcast service (a channel).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ServiceId(pub u32);

/// A single programme event as delivered by the data provider.
///
/// Structural equality matters: the day list compares freshly fetched data
/// against what is already displayed to skip redundant redraws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: u32,
    pub unique_event_id: String,
    pub service_id: ServiceId,
    pub title: String,
    pub start_ms: i64,
    pub end_ms: i64,
    #[serde(default)]
    pub is_catch_up: bool,
    /// Set when the event started before the fetch window and the provider
    /// reports the clipped start separately.
    #[serde(default)]
    pub overlap_start_ms: Option<i64>,
}

impl Event {
    #[must_use]
    pub fn is_on_now(&self, now: i64) -> bool {
        timebase::is_within(now, self.start_ms, self.end_ms)
    }

    #[must_use]
    pub fn is_in_past(&self, now: i64) -> bool {
        self.end_ms <= now
    }

    #[must_use]
    pub fn in_window(&self, window: &TimeWindow) -> bool {
        window.covers_span(self.start_ms, self.end_ms)
    }

    /// Start time to lay the event out at, honoring a clipped overlap start.
    #[must_use]
    pub fn display_start(&self) -> i64 {
        self.overlap_start_ms.unwrap_or(self.start_ms)
    }
}

/// One grid row: a service and its events for the fetched window, in
/// provider order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRow {
    pub service: ServiceId,
    pub events: Vec<Event>,
}
