//! Exact-integer window arithmetic for the programme grid.
//!
//! Everything here works on epoch milliseconds (`i64`) so that repeated
//! flooring and re-alignment stay drift-free across day boundaries. Window
//! boundaries are always multiples of the window span away from a per-session
//! half-hour anchor, never from absolute epoch multiples.

pub const HALF_HOUR_MS: i64 = 30 * 60 * 1000;
pub const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Floor a timestamp to the previous half-hour boundary.
#[must_use]
pub fn floor_to_half_hour(t: i64) -> i64 {
    t - t.rem_euclid(HALF_HOUR_MS)
}

/// Floor a timestamp to the previous multiple of `span_ms`.
#[must_use]
pub fn floor_to_span(t: i64, span_ms: i64) -> i64 {
    t - t.rem_euclid(span_ms)
}

/// The half-hour-to-span phase of a session anchor.
///
/// Adding this back after any span-floor keeps window boundaries on the
/// session's original half-hour grid.
#[must_use]
pub fn phase_offset(grid_origin: i64, span_ms: i64) -> i64 {
    grid_origin - floor_to_span(grid_origin, span_ms)
}

/// Re-align a window start after a coarse jump (day forward/back) so it
/// lands on a valid phase-aligned boundary again. Idempotent on starts that
/// are already aligned.
#[must_use]
pub fn realign(start: i64, span_ms: i64, offset: i64) -> i64 {
    floor_to_span(start, span_ms) + offset
}

/// Half-open interval test: `start <= t < end`.
#[must_use]
pub fn is_within(t: i64, start: i64, end: i64) -> bool {
    start <= t && t < end
}

/// A fixed-duration, phase-aligned span of time rendered by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub span: i64,
}

impl TimeWindow {
    #[must_use]
    pub fn new(start: i64, span: i64) -> Self {
        Self { start, span }
    }

    #[must_use]
    pub fn end(&self) -> i64 {
        self.start + self.span
    }

    #[must_use]
    pub fn contains(&self, t: i64) -> bool {
        is_within(t, self.start, self.end())
    }

    /// True when the span `[ev_start, ev_end)` should appear in this window:
    /// its start or its end falls inside. Catches events hanging over either
    /// window edge without double-counting boundary events.
    #[must_use]
    pub fn covers_span(&self, ev_start: i64, ev_end: i64) -> bool {
        self.contains(ev_start) || self.contains(ev_end)
    }

    /// Shift by a whole number of spans (negative = back).
    #[must_use]
    pub fn shifted(&self, spans: i64) -> Self {
        Self {
            start: self.start + spans * self.span,
            span: self.span,
        }
    }
}
