//! The channel x time grid engine.
//!
//! Owns an advancing, phase-aligned time window over a visible channel page,
//! fetches programme data for it and renders through [`GridSurface`]. All
//! fetches are tagged; a response that arrives for a superseded window is
//! discarded, never an error.

mod input;

use tracing::{debug, info};

use crate::collab::{ChannelNavigator, GridSurface};
use crate::config::Tuning;
use crate::fetch::{
    AvailabilityBounds, BoundsKind, BoundsSource, BoundsUpdate, GridBatch, GridQuery,
    ProgrammeSource, RequestLedger,
};
use crate::keys::RepeatGate;
use crate::programme::{ChannelRow, Event, ServiceId};
use crate::timebase::{self, TimeWindow};
use crate::timers::TimerSet;

/// Minute tick re-evaluating whether the window still covers "now".
pub const GRID_TICK_TIMER: &str = "grid-tick";
/// Adaptive earliest/latest availability refresh.
pub const BOUNDS_TIMER: &str = "grid-bounds";

/// Snapshot of the last render, used to decide on key release whether the
/// window actually moved and a deferred fetch is warranted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RenderedWindow {
    start: i64,
    lead_channel: Option<ServiceId>,
}

/// Options for a full grid draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawOptions {
    /// Skip restoring the highlighted cell after the data lands.
    pub suppress_highlight_restore: bool,
    /// Treat an event ending exactly at "now" as still selectable.
    pub focus_live: bool,
}

pub struct GridController {
    tuning: Tuning,
    origin: i64,
    offset: i64,
    window: TimeWindow,
    channels: Vec<ServiceId>,
    rows: Vec<ChannelRow>,
    bounds: AvailabilityBounds,
    ledger: RequestLedger,
    last_requested_start: Option<i64>,
    last_rendered: Option<RenderedWindow>,
    selected: Option<(usize, usize)>,
    selected_time: Option<i64>,
    dimmed: bool,
    background_update_pending: bool,
    suppress_restore_pending: bool,
    focus_live_pending: bool,
    skip_next_focus_draw: bool,
    jump_gate: RepeatGate,
    page_gate: RepeatGate,
    timers: TimerSet,
    active: bool,
}

impl GridController {
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        let jump_gate = RepeatGate::new(tuning.repeat_rate);
        let page_gate = RepeatGate::new(tuning.repeat_rate);
        let span = tuning.window_span_ms();
        Self {
            tuning,
            origin: 0,
            offset: 0,
            window: TimeWindow::new(0, span),
            channels: Vec::new(),
            rows: Vec::new(),
            bounds: AvailabilityBounds::default(),
            ledger: RequestLedger::default(),
            last_requested_start: None,
            last_rendered: None,
            selected: None,
            selected_time: None,
            dimmed: false,
            background_update_pending: false,
            suppress_restore_pending: false,
            focus_live_pending: false,
            skip_next_focus_draw: false,
            jump_gate,
            page_gate,
            timers: TimerSet::default(),
            active: false,
        }
    }

    /// Anchor the session and start the periodic timers. The window opens on
    /// "now, floored to half-hour".
    pub fn initialise(&mut self, now: i64, navigator: &impl ChannelNavigator) {
        let span = self.tuning.window_span_ms();
        self.origin = timebase::floor_to_half_hour(now);
        self.offset = timebase::phase_offset(self.origin, span);
        self.window = TimeWindow::new(self.origin, span);
        self.channels = navigator.viewable_channels();
        self.timers
            .schedule(GRID_TICK_TIMER, self.tuning.grid_tick_ms, now);
        self.timers
            .schedule(BOUNDS_TIMER, self.tuning.bounds_poll_fast_ms, now);
        self.active = true;
    }

    /// Tear down: stop timers, forget fetches and rendered state. Any
    /// response still in flight becomes stale by construction.
    pub fn passivate(&mut self) {
        self.timers.clear();
        self.ledger.invalidate();
        self.rows.clear();
        self.last_requested_start = None;
        self.last_rendered = None;
        self.selected = None;
        self.selected_time = None;
        self.dimmed = false;
        self.background_update_pending = false;
        self.focus_live_pending = false;
        self.active = false;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    #[must_use]
    pub fn channels(&self) -> &[ServiceId] {
        &self.channels
    }

    #[must_use]
    pub fn selected_event(&self) -> Option<&Event> {
        let (row, item) = self.selected?;
        self.rows.get(row)?.events.get(item)
    }

    /// Window start of the most recently issued fetch.
    #[must_use]
    pub fn last_requested_start(&self) -> Option<i64> {
        self.last_requested_start
    }

    /// Whether displayed data is known to be out of date, with fresh data
    /// not yet landed.
    #[must_use]
    pub fn is_background_update_pending(&self) -> bool {
        self.background_update_pending
    }

    /// Remember the time anchor of the user's selection. Used to re-derive
    /// the highlighted cell after every refetch, since indices are not
    /// stable across data refreshes but times are.
    pub fn remember_selection_time(&mut self, time_ms: i64) {
        self.selected_time = Some(time_ms);
    }

    /// Mark that the displayed data is known to be out of date (lineup
    /// change, recording state change). Cleared when fresh data lands.
    pub fn mark_background_update(&mut self) {
        self.background_update_pending = true;
    }

    /// Full draw: re-align the window, push the time axis, kick off a tagged
    /// fetch and dim until it lands.
    pub fn draw_grid(
        &mut self,
        now: i64,
        opts: DrawOptions,
        source: &mut impl ProgrammeSource,
        surface: &mut impl GridSurface,
    ) {
        // keep the phase even if a day jump or rollover left the start
        // off-grid
        self.window.start = timebase::realign(self.window.start, self.window.span, self.offset);
        self.push_time_axis(surface);
        self.update_arrows(surface);
        self.suppress_restore_pending = opts.suppress_highlight_restore;
        self.focus_live_pending = opts.focus_live;

        self.ledger.invalidate();
        let token = self.ledger.issue();
        let query = GridQuery {
            token,
            channels: self.channels.clone(),
            window: self.window,
        };
        self.last_requested_start = Some(self.window.start);
        self.dimmed = true;
        surface.set_dimmed(true);
        debug!(
            now,
            start = self.window.start,
            end = self.window.end(),
            "grid fetch"
        );
        source.request_window(query);
    }

    /// Apply a fetch response, unless it is stale.
    pub fn on_window_data(
        &mut self,
        batch: GridBatch,
        now: i64,
        navigator: &mut impl ChannelNavigator,
        surface: &mut impl GridSurface,
    ) {
        if !self.ledger.is_current(batch.token) || batch.window_start != self.window.start {
            debug!(
                echoed = batch.window_start,
                current = self.window.start,
                "discarding stale grid batch"
            );
            return;
        }
        self.rows = batch.rows;
        self.background_update_pending = false;
        surface.set_rows(&self.rows);
        self.dimmed = false;
        surface.set_dimmed(false);
        self.update_now_marker(now, surface);
        self.last_rendered = Some(RenderedWindow {
            start: self.window.start,
            lead_channel: self.channels.first().copied(),
        });
        if self.suppress_restore_pending {
            self.suppress_restore_pending = false;
            self.focus_live_pending = false;
        } else {
            self.restore_selection(now, navigator, surface);
        }
    }

    /// Once-per-minute re-evaluation. Advances the window once "now" has
    /// crossed past its end; otherwise only the live marker moves (no fetch).
    pub fn minute_update(
        &mut self,
        now: i64,
        source: &mut impl ProgrammeSource,
        surface: &mut impl GridSurface,
    ) {
        if now >= self.window.end() {
            self.window.start = self.window_start_covering(now);
            self.background_update_pending = true;
            self.draw_grid(now, DrawOptions::default(), source, surface);
        } else {
            self.update_now_marker(now, surface);
        }
    }

    /// Drive due timers. Call this from the application tick.
    pub fn poll_timers(
        &mut self,
        now: i64,
        source: &mut impl ProgrammeSource,
        bounds: &mut impl BoundsSource,
        surface: &mut impl GridSurface,
    ) {
        for name in self.timers.poll(now) {
            match name {
                GRID_TICK_TIMER => self.minute_update(now, source, surface),
                BOUNDS_TIMER => {
                    bounds.request_bounds(BoundsKind::Earliest);
                    bounds.request_bounds(BoundsKind::Latest);
                }
                _ => {}
            }
        }
    }

    /// Apply a bounds answer and adapt the refresh cadence: poll fast while
    /// either bound is unknown, hourly once both are known.
    pub fn on_bounds(&mut self, update: BoundsUpdate, now: i64, surface: &mut impl GridSurface) {
        let was_resolved = self.bounds.resolved();
        self.bounds.apply(update);
        if self.bounds.resolved() && !was_resolved {
            info!(
                earliest = self.bounds.earliest_ms,
                latest = self.bounds.latest_ms,
                "availability bounds resolved"
            );
        }
        let period = if self.bounds.resolved() {
            self.tuning.bounds_poll_slow_ms
        } else {
            self.tuning.bounds_poll_fast_ms
        };
        self.timers.schedule(BOUNDS_TIMER, period, now);
        self.update_arrows(surface);
    }

    /// Replace the visible channel page and re-anchor on the live event.
    pub fn focus_on_now_event(
        &mut self,
        now: i64,
        navigator: &mut impl ChannelNavigator,
        source: &mut impl ProgrammeSource,
        surface: &mut impl GridSurface,
    ) {
        self.channels = navigator.viewable_channels();
        self.window.start = self.window_start_covering(now);
        self.draw_grid(
            now,
            DrawOptions {
                suppress_highlight_restore: false,
                focus_live: true,
            },
            source,
            surface,
        );
    }

    /// Focus-change redraw hook. Suppressed once after direct channel-number
    /// entry claims a key, since that flow schedules its own draw.
    pub fn focus(
        &mut self,
        now: i64,
        navigator: &mut impl ChannelNavigator,
        source: &mut impl ProgrammeSource,
        surface: &mut impl GridSurface,
    ) {
        if self.skip_next_focus_draw {
            self.skip_next_focus_draw = false;
            return;
        }
        self.channels = navigator.viewable_channels();
        self.draw_grid(now, DrawOptions::default(), source, surface);
    }

    /// Whether the window moved since the last completed render.
    #[must_use]
    pub fn has_window_moved(&self) -> bool {
        match self.last_rendered {
            Some(rendered) => {
                rendered.start != self.window.start
                    || rendered.lead_channel != self.channels.first().copied()
            }
            None => true,
        }
    }

    /// The phase-aligned window start whose window contains `t`.
    fn window_start_covering(&self, t: i64) -> i64 {
        self.offset + timebase::floor_to_span(t - self.offset, self.window.span)
    }

    fn push_time_axis(&self, surface: &mut impl GridSurface) {
        let labels = (0..self.tuning.slots_per_window)
            .map(|slot| format_hhmm(self.window.start + slot * self.tuning.slot_ms))
            .collect();
        surface.set_slot_labels(labels);
        surface.set_date_title(format_day_title(self.window.start));
    }

    fn update_arrows(&self, surface: &mut impl GridSurface) {
        surface.show_left_arrow(!self.at_left_bound());
        surface.show_right_arrow(!self.at_right_bound());
    }

    /// Left navigation is exhausted once the window start reaches the
    /// earliest known event time. Unknown bounds stay permissive.
    #[must_use]
    pub fn at_left_bound(&self) -> bool {
        self.bounds
            .earliest_ms
            .is_some_and(|earliest| self.window.start <= earliest)
    }

    /// Right navigation is exhausted once the latest known event time no
    /// longer lies beyond the window end.
    #[must_use]
    pub fn at_right_bound(&self) -> bool {
        self.bounds
            .latest_ms
            .is_some_and(|latest| latest <= self.window.end())
    }

    fn update_now_marker(&self, now: i64, surface: &mut impl GridSurface) {
        let x = if self.window.contains(now) && self.window.span > 0 {
            let width = i64::from(surface.grid_width());
            Some(((now - self.window.start) * width / self.window.span) as u16)
        } else {
            None
        };
        surface.set_now_marker_x(x);
    }

    /// Re-derive the highlighted cell from the remembered selection time.
    /// Times survive refetches; indices do not.
    fn restore_selection(
        &mut self,
        now: i64,
        navigator: &mut impl ChannelNavigator,
        surface: &mut impl GridSurface,
    ) {
        let focus_live = std::mem::replace(&mut self.focus_live_pending, false);
        if self.rows.is_empty() {
            self.selected = None;
            surface.show_no_events(true);
            navigator.update_summary(None);
            return;
        }
        let row_index = navigator.selected_index().min(self.rows.len() - 1);
        let allow_past = self.tuning.catchup_enabled || navigator.remember_event();
        let index = self
            .rows
            .get(row_index)
            .and_then(|row| self.selection_index(row, now, allow_past, focus_live));
        match index {
            Some(item) => {
                self.selected = Some((row_index, item));
                surface.show_no_events(false);
                surface.select_cell(row_index, item);
                let event = &self.rows[row_index].events[item];
                self.selected_time = Some(event.start_ms);
                navigator.update_summary(Some(event));
                navigator.update_catchup_title(event.is_in_past(now));
            }
            None => {
                self.selected = None;
                surface.show_no_events(true);
                navigator.update_summary(None);
            }
        }
    }

    /// First selectable index is the first event still running at "now"
    /// (expired events count only in catch-up / remember-event mode, or when
    /// they end exactly at "now" while focusing the live event); from there,
    /// advance until an event's end exceeds the remembered selection time.
    fn selection_index(
        &self,
        row: &ChannelRow,
        now: i64,
        allow_past: bool,
        focus_live: bool,
    ) -> Option<usize> {
        let mut index = None;
        for (i, event) in row.events.iter().enumerate() {
            let live_edge = focus_live && event.end_ms == now && self.window.contains(now);
            if allow_past || event.end_ms > now || live_edge {
                index = Some(i);
                break;
            }
        }
        let mut i = index?;
        if let Some(target) = self.selected_time {
            while i + 1 < row.events.len() && row.events[i].end_ms <= target {
                i += 1;
            }
        }
        Some(i)
    }
}

fn format_hhmm(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

fn format_day_title(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%a %d %b").to_string())
        .unwrap_or_default()
}
