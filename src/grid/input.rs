//! Grid key handling.
//!
//! Three behavioral states without explicit names: focused-idle,
//! fast-navigating (dimmed, window moves with no fetch per press) and
//! settled (key release triggers the one deferred fetch). Held repeats are
//! throttled so the number of in-flight fetches stays bounded by settles,
//! not by keystrokes.

use tracing::debug;

use super::{DrawOptions, GridController};
use crate::collab::{ChannelNavigator, DigitEntry, GridSurface};
use crate::fetch::ProgrammeSource;
use crate::keys::{Handled, Key, KeyInput};
use crate::timebase;

enum ChannelStep {
    PreviousChannel,
    NextChannel,
    PreviousPage,
    NextPage,
}

impl GridController {
    /// Main dispatch. Direct channel-number entry is consulted first and
    /// short-circuits everything when it claims the key.
    pub fn handle_key(
        &mut self,
        input: KeyInput,
        now: i64,
        navigator: &mut impl ChannelNavigator,
        digits: &mut impl DigitEntry,
        source: &mut impl ProgrammeSource,
        surface: &mut impl GridSurface,
    ) -> Handled {
        if digits.handle(input) {
            // that flow drives its own redraw; don't also redraw on the
            // focus change it causes
            self.skip_next_focus_draw = true;
            return Handled::Handled;
        }
        self.navigation_immediate(input, navigator);

        match input.key {
            Key::Left => {
                self.step_window(-1, input.repeat, surface);
                Handled::Handled
            }
            Key::Right => {
                self.step_window(1, input.repeat, surface);
                Handled::Handled
            }
            Key::Rewind => {
                self.day_jump(-1, surface);
                Handled::Handled
            }
            Key::FastForward => {
                self.day_jump(1, surface);
                Handled::Handled
            }
            Key::Up => self.step_channel(ChannelStep::PreviousChannel, navigator, surface),
            Key::Down => self.step_channel(ChannelStep::NextChannel, navigator, surface),
            Key::ChannelUp => {
                if input.repeat && !self.page_gate.fire() {
                    return Handled::Handled;
                }
                self.step_channel(ChannelStep::PreviousPage, navigator, surface)
            }
            Key::ChannelDown => {
                if input.repeat && !self.page_gate.fire() {
                    return Handled::Handled;
                }
                self.step_channel(ChannelStep::NextPage, navigator, surface)
            }
            Key::Select => {
                if let Some(event) = self.selected_event().cloned() {
                    self.selected_time = Some(event.start_ms);
                    navigator.item_selected(&event);
                }
                Handled::Handled
            }
            Key::LeftRelease
            | Key::RightRelease
            | Key::UpRelease
            | Key::DownRelease
            | Key::FastForwardRelease
            | Key::RewindRelease
            | Key::ChannelUpRelease
            | Key::ChannelDownRelease => self.settle(input.key, now, source, surface),
            Key::Back | Key::Digit(_) => Handled::NotHandled,
        }
    }

    /// Synchronous pre-dispatch notification so the surrounding UI can react
    /// before a slow fetch - skipped when the requested move cannot happen.
    fn navigation_immediate(&mut self, input: KeyInput, navigator: &mut impl ChannelNavigator) {
        let noop = match input.key {
            Key::Left | Key::Rewind => self.at_left_bound(),
            Key::Right | Key::FastForward => self.at_right_bound(),
            Key::Up | Key::Down | Key::ChannelUp | Key::ChannelDown => false,
            _ => return,
        };
        if !noop {
            navigator.before_event_change();
        }
    }

    /// Move the window by one span (held repeats use the fast-scroll span)
    /// and dim; the fetch is deferred to key release.
    fn step_window(&mut self, direction: i64, repeat: bool, surface: &mut impl GridSurface) {
        if (direction < 0 && self.at_left_bound()) || (direction > 0 && self.at_right_bound()) {
            return;
        }
        let spans = if repeat {
            self.tuning.fast_scroll_spans
        } else {
            1
        };
        self.window = self.window.shifted(direction * spans);
        self.dimmed = true;
        surface.set_dimmed(true);
        self.update_arrows(surface);
    }

    /// Multi-day jump, throttled by the repeat gate, clamped to known
    /// availability, then phase-realigned so the half-hour grid survives.
    fn day_jump(&mut self, direction: i64, surface: &mut impl GridSurface) {
        if !self.jump_gate.fire() {
            return;
        }
        if (direction < 0 && self.at_left_bound()) || (direction > 0 && self.at_right_bound()) {
            return;
        }
        let target = self.window.start + direction * self.tuning.day_jump_ms;
        self.window.start = target;
        self.clamp_window();
        self.window.start = timebase::realign(self.window.start, self.window.span, self.offset);
        debug!(start = self.window.start, "day jump");
        self.dimmed = true;
        surface.set_dimmed(true);
        self.update_arrows(surface);
    }

    fn clamp_window(&mut self) {
        if let Some(latest) = self.bounds.latest_ms {
            if self.window.end() > latest {
                self.window.start = latest - self.window.span;
            }
        }
        if let Some(earliest) = self.bounds.earliest_ms {
            if self.window.start < earliest {
                self.window.start = earliest;
            }
        }
    }

    /// Channel movement delegates to the navigator; on success the visible
    /// page is replaced and the grid dims for the deferred fetch.
    fn step_channel(
        &mut self,
        step: ChannelStep,
        navigator: &mut impl ChannelNavigator,
        surface: &mut impl GridSurface,
    ) -> Handled {
        let moved = match step {
            ChannelStep::PreviousChannel => navigator.select_previous_channel(),
            ChannelStep::NextChannel => navigator.select_next_channel(),
            ChannelStep::PreviousPage => navigator.select_previous_page(),
            ChannelStep::NextPage => navigator.select_next_page(),
        };
        if moved {
            self.channels = navigator.viewable_channels();
            self.dimmed = true;
            surface.set_dimmed(true);
        }
        Handled::Handled
    }

    /// Key release: reset the relevant gate and run the one deferred fetch,
    /// but only if the window (or lead channel) actually moved since the
    /// last render - a tap that changed nothing just restores opacity.
    fn settle(
        &mut self,
        key: Key,
        now: i64,
        source: &mut impl ProgrammeSource,
        surface: &mut impl GridSurface,
    ) -> Handled {
        match key {
            Key::FastForwardRelease | Key::RewindRelease => self.jump_gate.reset(),
            Key::ChannelUpRelease | Key::ChannelDownRelease => self.page_gate.reset(),
            _ => {}
        }
        if self.has_window_moved() {
            self.draw_grid(now, DrawOptions::default(), source, surface);
        } else if self.dimmed {
            self.dimmed = false;
            surface.set_dimmed(false);
        }
        Handled::Handled
    }
}
