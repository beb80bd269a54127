pub mod collab;
pub mod config;
pub mod daylist;
pub mod demo;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod keys;
pub mod programme;
pub mod timebase;
pub mod timers;
pub mod ui;

pub use error::{GuideError, Result};
