//! Single-channel, day-partitioned event list.
//!
//! Pages through whole days relative to "today" instead of a fixed time
//! window. Fetches are per-day and tagged; a response for a day the user has
//! already left is dropped. Refreshes that return identical data skip the
//! redraw but still re-run selection.

mod input;

use tracing::{debug, info};

use crate::collab::ListSurface;
use crate::config::Tuning;
use crate::fetch::{AvailabilityBounds, BoundsUpdate, DayBatch, DayQuery, DaySource, RequestLedger};
use crate::programme::{Event, ServiceId};
use crate::timebase::{self, ONE_DAY_MS};
use crate::timers::TimerSet;

/// Periodic refetch of the displayed day.
pub const DAY_REFRESH_TIMER: &str = "daylist-refresh";

/// Bounds of the page currently rendered, used to derive the direction of a
/// pending day move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayedWindow {
    pub day: i32,
    pub start_ms: i64,
    pub end_ms: i64,
}

pub struct DayListController {
    tuning: Tuning,
    service: Option<ServiceId>,
    day_offset: i32,
    displayed: DisplayedWindow,
    highlight_time: Option<i64>,
    target_time: Option<i64>,
    related_pending: bool,
    events: Vec<Event>,
    bounds: AvailabilityBounds,
    ledger: RequestLedger,
    row: usize,
    visible_rows: usize,
    preview: bool,
    day_title_stale: bool,
    timers: TimerSet,
    active: bool,
}

impl DayListController {
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            service: None,
            day_offset: 0,
            displayed: DisplayedWindow::default(),
            highlight_time: None,
            target_time: None,
            related_pending: false,
            events: Vec::new(),
            bounds: AvailabilityBounds::default(),
            ledger: RequestLedger::default(),
            row: 0,
            visible_rows: 8,
            preview: false,
            day_title_stale: true,
            timers: TimerSet::default(),
            active: false,
        }
    }

    /// Start a preview session for one service, anchored on today.
    pub fn initialise(&mut self, service: ServiceId, now: i64) {
        self.service = Some(service);
        self.day_offset = 0;
        self.displayed = DisplayedWindow::default();
        self.highlight_time = None;
        self.day_title_stale = true;
        self.timers
            .schedule(DAY_REFRESH_TIMER, self.tuning.day_refresh_ms, now);
        self.active = true;
    }

    pub fn passivate(&mut self) {
        self.timers.clear();
        self.ledger.invalidate();
        self.events.clear();
        self.service = None;
        self.row = 0;
        self.highlight_time = None;
        self.target_time = None;
        self.related_pending = false;
        self.active = false;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn day_offset(&self) -> i32 {
        self.day_offset
    }

    #[must_use]
    pub fn selected_event(&self) -> Option<&Event> {
        self.events.get(self.row)
    }

    /// Rows the view can show at once; drives page-granularity movement and
    /// arrow visibility.
    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows.max(1);
    }

    /// Preview (non-focused) mode suppresses the navigation arrows entirely.
    pub fn set_preview(&mut self, preview: bool) {
        self.preview = preview;
    }

    pub fn reset_to_today(&mut self) {
        self.day_offset = 0;
        self.day_title_stale = true;
    }

    pub fn on_bounds(&mut self, update: BoundsUpdate) {
        self.bounds.apply(update);
    }

    /// Step a day forward, when the next day still has available data.
    pub fn move_next_day(&mut self, now: i64) -> bool {
        self.move_day(1, now)
    }

    /// Step a day back. Past days need catch-up.
    pub fn move_previous_day(&mut self, now: i64) -> bool {
        self.move_day(-1, now)
    }

    fn move_day(&mut self, delta: i32, now: i64) -> bool {
        if !self.can_move_day(delta, now) {
            return false;
        }
        self.day_offset += delta;
        self.day_title_stale = true;
        info!(day = self.day_offset, "day list moved");
        true
    }

    /// The adjacent day is reachable when its bounds still intersect
    /// `[earliest, latest]`. Unknown bounds stay permissive.
    #[must_use]
    pub fn can_move_day(&self, delta: i32, now: i64) -> bool {
        let day = self.day_offset + delta;
        if day < 0 && !self.tuning.catchup_enabled {
            return false;
        }
        let (start, end) = day_span(now, day);
        let below_latest = self.bounds.latest_ms.is_none_or(|latest| start < latest);
        let above_earliest = self
            .bounds
            .earliest_ms
            .is_none_or(|earliest| end > earliest);
        below_latest && above_earliest
    }

    /// Issue the fetch for the current day offset.
    ///
    /// `related_time` asks the completion path to re-anchor the highlight on
    /// a remembered time; `select_time` carries that time across a day move
    /// by shifting it one day per step of travel.
    pub fn load_day_data(
        &mut self,
        related_time: bool,
        select_time: bool,
        now: i64,
        source: &mut impl DaySource,
    ) {
        let Some(service) = self.service else {
            return;
        };
        let direction = i64::from(self.day_offset - self.displayed.day);
        self.target_time = match self.highlight_time {
            Some(highlight) if select_time && direction != 0 => {
                Some(highlight + direction * ONE_DAY_MS)
            }
            other => other,
        };
        self.related_pending = related_time;
        self.ledger.invalidate();
        let token = self.ledger.issue();
        debug!(day = self.day_offset, now, "day fetch");
        source.request_day(DayQuery {
            token,
            service,
            day_offset: self.day_offset,
        });
    }

    /// Apply a day fetch, unless it is stale. Identical data skips the
    /// redraw but selection still runs, so periodic refreshes cause no
    /// flicker.
    pub fn on_day_data(&mut self, batch: DayBatch, now: i64, surface: &mut impl ListSurface) {
        if !self.ledger.is_current(batch.token) || batch.day_offset != self.day_offset {
            debug!(
                echoed = batch.day_offset,
                current = self.day_offset,
                "discarding stale day batch"
            );
            return;
        }
        if batch.events != self.events {
            self.events = batch.events;
            surface.set_rows(&self.events);
        }
        let (start_ms, end_ms) = day_span(now, self.day_offset);
        self.displayed = DisplayedWindow {
            day: self.day_offset,
            start_ms,
            end_ms,
        };
        if self.day_title_stale {
            surface.set_day_title(day_title(start_ms));
            self.day_title_stale = false;
        }
        self.apply_selection(now, surface);
        self.update_control_buttons(now, surface);
    }

    /// Drive due timers. The auto-refresh refetches the displayed day only.
    pub fn poll_timers(&mut self, now: i64, source: &mut impl DaySource) {
        for name in self.timers.poll(now) {
            if name == DAY_REFRESH_TIMER {
                self.load_day_data(true, false, now, source);
            }
        }
    }

    fn apply_selection(&mut self, now: i64, surface: &mut impl ListSurface) {
        if self.events.is_empty() {
            return;
        }
        let index = if self.related_pending {
            let target = self.target_time.unwrap_or(now);
            self.events
                .iter()
                .position(|ev| {
                    ev.start_ms >= target || (ev.start_ms <= target && target < ev.end_ms)
                })
                .unwrap_or(self.events.len() - 1)
        } else {
            self.events
                .iter()
                .position(|ev| ev.is_on_now(now))
                .unwrap_or(0)
        };
        self.related_pending = false;
        self.row = index;
        self.highlight_time = Some(self.events[index].start_ms);
        surface.select_row(index);
    }

    /// Arrow visibility: suppressed in preview, otherwise derived from the
    /// page position within the day and adjacent-day availability.
    pub fn update_control_buttons(&mut self, now: i64, surface: &mut impl ListSurface) {
        if self.preview {
            surface.show_up_arrow(false);
            surface.show_down_arrow(false);
            return;
        }
        let page = self.row / self.visible_rows;
        let pages = self.events.len().div_ceil(self.visible_rows).max(1);
        surface.show_up_arrow(page > 0 || self.can_move_day(-1, now));
        surface.show_down_arrow(page + 1 < pages || self.can_move_day(1, now));
    }
}

/// UTC bounds of the day `offset` days away from the day containing `now`.
#[must_use]
pub fn day_span(now: i64, offset: i32) -> (i64, i64) {
    let midnight = timebase::floor_to_span(now, ONE_DAY_MS);
    let start = midnight + i64::from(offset) * ONE_DAY_MS;
    (start, start + ONE_DAY_MS)
}

fn day_title(start_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(start_ms)
        .map(|dt| dt.format("%A %d %B").to_string())
        .unwrap_or_default()
}
