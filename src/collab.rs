//! Collaborator seams the engines are driven through.
//!
//! The engines own no rendering, channel-list state or wall clock of their
//! own; everything observable goes through these traits so the surrounding
//! application (and the test harness) can stand in for the platform layer.

use crate::keys::KeyInput;
use crate::programme::{ChannelRow, Event, ServiceId};

/// Wall-clock source.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// The real clock, used by the binary.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Channel-list and selection owner. The grid delegates all channel movement
/// here; each movement reports whether it actually changed anything.
pub trait ChannelNavigator {
    /// The channel page currently visible in the grid, in lineup order.
    fn viewable_channels(&self) -> Vec<ServiceId>;
    fn select_previous_channel(&mut self) -> bool;
    fn select_next_channel(&mut self) -> bool;
    fn select_previous_page(&mut self) -> bool;
    fn select_next_page(&mut self) -> bool;
    /// Row index of the selected channel within the visible page.
    fn selected_index(&self) -> usize;
    /// Whether "remember event" mode permits selecting ended events.
    fn remember_event(&self) -> bool;
    /// Synchronous pre-navigation notification, so the surrounding UI can
    /// react (hide a synopsis, say) before a potentially slow fetch.
    fn before_event_change(&mut self);
    fn item_selected(&mut self, event: &Event);
    fn update_summary(&mut self, event: Option<&Event>);
    fn update_back_button(&mut self);
    fn update_catchup_title(&mut self, is_past: bool);
}

/// Direct channel-number entry. Consulted first on every key event; a `true`
/// return means the key was consumed and normal navigation must not run.
pub trait DigitEntry {
    fn handle(&mut self, input: KeyInput) -> bool;
}

/// Grid rendering surface. The engine pushes state changes; how they are
/// drawn is the view's business.
pub trait GridSurface {
    fn set_slot_labels(&mut self, labels: Vec<String>);
    fn set_date_title(&mut self, title: String);
    fn show_left_arrow(&mut self, visible: bool);
    fn show_right_arrow(&mut self, visible: bool);
    /// Dim while a fetch is in flight, restore once data lands.
    fn set_dimmed(&mut self, dimmed: bool);
    /// Width in cells available to the live-now marker.
    fn grid_width(&self) -> u16;
    /// Horizontal position of the live-now marker, `None` when "now" is
    /// outside the window.
    fn set_now_marker_x(&mut self, x: Option<u16>);
    fn set_rows(&mut self, rows: &[ChannelRow]);
    fn select_cell(&mut self, row: usize, item: usize);
    fn show_no_events(&mut self, visible: bool);
}

/// Day-list rendering surface.
pub trait ListSurface {
    fn set_day_title(&mut self, title: String);
    fn set_rows(&mut self, events: &[Event]);
    fn select_row(&mut self, index: usize);
    fn show_up_arrow(&mut self, visible: bool);
    fn show_down_arrow(&mut self, visible: bool);
}
