//! Asynchronous fetch plumbing: request tokens, query/response payloads and
//! the provider seams the engines talk through.
//!
//! Fetches are fire-and-forget; there is no cancel API. Instead every fetch
//! carries a token issued by the owning component's [`RequestLedger`], and a
//! response is applied only while its token is still current. Rapid
//! navigation during a slow fetch therefore cannot install data for a window
//! or day the user has already left.

use crate::programme::{ChannelRow, Event, ServiceId};
use crate::timebase::TimeWindow;

/// Opaque correlation token carried by a fetch and echoed by its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Issues tokens and decides whether a response is still worth applying.
///
/// Call [`RequestLedger::invalidate`] on every navigation that changes what
/// an outstanding fetch means; any response issued before that point is then
/// silently droppable.
#[derive(Debug, Default)]
pub struct RequestLedger {
    current: u64,
}

impl RequestLedger {
    #[must_use]
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.current)
    }

    pub fn invalidate(&mut self) {
        self.current = self.current.wrapping_add(1);
    }

    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.current
    }
}

/// A grid fetch: the visible channel page and the window it was issued for.
#[derive(Debug, Clone)]
pub struct GridQuery {
    pub token: RequestToken,
    pub channels: Vec<ServiceId>,
    pub window: TimeWindow,
}

/// Grid fetch result. `window_start` must be echoed from the query
/// unchanged; the engine cross-checks it against the live window on arrival.
#[derive(Debug, Clone)]
pub struct GridBatch {
    pub token: RequestToken,
    pub window_start: i64,
    pub rows: Vec<ChannelRow>,
}

/// A day-list fetch for one service and one day offset.
#[derive(Debug, Clone)]
pub struct DayQuery {
    pub token: RequestToken,
    pub service: ServiceId,
    pub day_offset: i32,
}

#[derive(Debug, Clone)]
pub struct DayBatch {
    pub token: RequestToken,
    pub day_offset: i32,
    pub events: Vec<Event>,
}

/// Which end of programme availability a bounds query asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsKind {
    Earliest,
    Latest,
}

/// A bounds answer. `None` means the provider does not know yet.
#[derive(Debug, Clone, Copy)]
pub struct BoundsUpdate {
    pub kind: BoundsKind,
    pub edge_ms: Option<i64>,
}

/// Cached earliest/latest available event times. Unknown bounds are treated
/// as unbounded, so navigation stays permissive until the provider answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityBounds {
    pub earliest_ms: Option<i64>,
    pub latest_ms: Option<i64>,
}

impl AvailabilityBounds {
    #[must_use]
    pub fn resolved(&self) -> bool {
        self.earliest_ms.is_some() && self.latest_ms.is_some()
    }

    pub fn apply(&mut self, update: BoundsUpdate) {
        match update.kind {
            BoundsKind::Earliest => self.earliest_ms = update.edge_ms,
            BoundsKind::Latest => self.latest_ms = update.edge_ms,
        }
    }
}

/// Programme-data provider for the grid. Implementations deliver the
/// matching [`GridBatch`] back into the engine whenever it is ready.
pub trait ProgrammeSource {
    fn request_window(&mut self, query: GridQuery);
}

/// Per-day data provider for the day list.
pub trait DaySource {
    fn request_day(&mut self, query: DayQuery);
}

/// Availability-bounds provider.
pub trait BoundsSource {
    fn request_bounds(&mut self, kind: BoundsKind);
}
