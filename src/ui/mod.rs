pub mod daylist_view;
pub mod grid_view;
pub mod keymap;

pub use daylist_view::{DayListView, render_day_list};
pub use grid_view::{GridView, render_grid};
pub use keymap::map_key;
