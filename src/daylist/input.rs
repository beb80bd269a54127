//! Day-list key handling.
//!
//! Up/down move the row cursor; crossing the first or last row rolls into
//! the adjacent day. Channel up/down move a page at a time and only change
//! day when the movement would cross the day boundary.

use super::DayListController;
use crate::collab::{ChannelNavigator, ListSurface};
use crate::fetch::DaySource;
use crate::keys::{Handled, Key, KeyInput};

impl DayListController {
    pub fn handle_key(
        &mut self,
        input: KeyInput,
        now: i64,
        navigator: &mut impl ChannelNavigator,
        source: &mut impl DaySource,
        surface: &mut impl ListSurface,
    ) -> Handled {
        match input.key {
            Key::Up => {
                if self.row == 0 {
                    self.try_day_move(-1, now, navigator, source);
                } else {
                    self.select_row(self.row - 1, now, surface);
                }
                Handled::Handled
            }
            Key::Down => {
                if self.row + 1 >= self.events.len() {
                    self.try_day_move(1, now, navigator, source);
                } else {
                    self.select_row(self.row + 1, now, surface);
                }
                Handled::Handled
            }
            Key::ChannelUp => {
                if self.row == 0 {
                    self.try_day_move(-1, now, navigator, source);
                } else if self.row < self.visible_rows {
                    self.select_row(0, now, surface);
                } else {
                    self.select_row(self.row - self.visible_rows, now, surface);
                }
                Handled::Handled
            }
            Key::ChannelDown => {
                let last = self.events.len().saturating_sub(1);
                if self.row >= last {
                    self.try_day_move(1, now, navigator, source);
                } else if self.row + self.visible_rows > last {
                    self.select_row(last, now, surface);
                } else {
                    self.select_row(self.row + self.visible_rows, now, surface);
                }
                Handled::Handled
            }
            Key::Left => {
                self.try_day_move(-1, now, navigator, source);
                Handled::Handled
            }
            Key::Right => {
                self.try_day_move(1, now, navigator, source);
                Handled::Handled
            }
            Key::Select => {
                if let Some(event) = self.selected_event().cloned() {
                    self.highlight_time = Some(event.start_ms);
                    navigator.item_selected(&event);
                }
                Handled::Handled
            }
            Key::UpRelease
            | Key::DownRelease
            | Key::LeftRelease
            | Key::RightRelease
            | Key::ChannelUpRelease
            | Key::ChannelDownRelease => Handled::Handled,
            _ => Handled::NotHandled,
        }
    }

    fn try_day_move(
        &mut self,
        delta: i32,
        now: i64,
        navigator: &mut impl ChannelNavigator,
        source: &mut impl DaySource,
    ) {
        let moved = if delta < 0 {
            self.move_previous_day(now)
        } else {
            self.move_next_day(now)
        };
        if moved {
            navigator.before_event_change();
            navigator.update_back_button();
            navigator.update_catchup_title(self.day_offset < 0);
            self.load_day_data(true, true, now, source);
        }
    }

    fn select_row(&mut self, index: usize, now: i64, surface: &mut impl ListSurface) {
        self.row = index;
        if let Some(event) = self.events.get(index) {
            self.highlight_time = Some(event.start_ms);
        }
        surface.select_row(index);
        self.update_control_buttons(now, surface);
    }
}
