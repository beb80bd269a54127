use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{GuideError, Result};

fn default_slot_minutes() -> u32 {
    30
}

fn default_slots_per_window() -> u32 {
    5
}

fn default_repeat_rate() -> u32 {
    2
}

fn default_fast_scroll_spans() -> u32 {
    1
}

fn default_day_jump_days() -> u32 {
    1
}

fn default_bounds_poll_fast_secs() -> u64 {
    10
}

fn default_bounds_poll_slow_secs() -> u64 {
    3600
}

fn default_grid_tick_secs() -> u64 {
    60
}

fn default_day_refresh_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default = "default_slots_per_window")]
    pub slots_per_window: u32,
    #[serde(default = "default_repeat_rate")]
    pub repeat_rate: u32,
    #[serde(default = "default_fast_scroll_spans")]
    pub fast_scroll_spans: u32,
    #[serde(default = "default_day_jump_days")]
    pub day_jump_days: u32,
    #[serde(default = "default_bounds_poll_fast_secs")]
    pub bounds_poll_fast_secs: u64,
    #[serde(default = "default_bounds_poll_slow_secs")]
    pub bounds_poll_slow_secs: u64,
    #[serde(default = "default_grid_tick_secs")]
    pub grid_tick_secs: u64,
    #[serde(default = "default_day_refresh_secs")]
    pub day_refresh_secs: u64,
    #[serde(default)]
    pub catchup_enabled: bool,
}

/// Raw config for deserialization - all fields are Option to distinguish
/// "not set" from "set to default"
#[derive(Debug, Clone, Deserialize, Default)]
struct RawConfig {
    pub slot_minutes: Option<u32>,
    pub slots_per_window: Option<u32>,
    pub repeat_rate: Option<u32>,
    pub fast_scroll_spans: Option<u32>,
    pub day_jump_days: Option<u32>,
    pub bounds_poll_fast_secs: Option<u64>,
    pub bounds_poll_slow_secs: Option<u64>,
    pub grid_tick_secs: Option<u64>,
    pub day_refresh_secs: Option<u64>,
    pub catchup_enabled: Option<bool>,
}

impl RawConfig {
    fn into_config(self) -> Config {
        Config {
            slot_minutes: self.slot_minutes.unwrap_or_else(default_slot_minutes),
            slots_per_window: self
                .slots_per_window
                .unwrap_or_else(default_slots_per_window),
            repeat_rate: self.repeat_rate.unwrap_or_else(default_repeat_rate),
            fast_scroll_spans: self
                .fast_scroll_spans
                .unwrap_or_else(default_fast_scroll_spans),
            day_jump_days: self.day_jump_days.unwrap_or_else(default_day_jump_days),
            bounds_poll_fast_secs: self
                .bounds_poll_fast_secs
                .unwrap_or_else(default_bounds_poll_fast_secs),
            bounds_poll_slow_secs: self
                .bounds_poll_slow_secs
                .unwrap_or_else(default_bounds_poll_slow_secs),
            grid_tick_secs: self.grid_tick_secs.unwrap_or_else(default_grid_tick_secs),
            day_refresh_secs: self
                .day_refresh_secs
                .unwrap_or_else(default_day_refresh_secs),
            catchup_enabled: self.catchup_enabled.unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into_config()
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| GuideError::Io {
            path: path.clone(),
            source,
        })?;
        let raw: RawConfig = toml::from_str(&text).map_err(|e| GuideError::ConfigParse {
            path: path.clone(),
            details: e.to_string(),
        })?;
        Ok(raw.into_config().validated())
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("airtime").join("config.toml"))
    }

    /// Clamp nonsense values back to defaults rather than failing startup.
    #[must_use]
    pub fn validated(mut self) -> Self {
        if self.slot_minutes == 0 {
            self.slot_minutes = default_slot_minutes();
        }
        if self.slots_per_window == 0 {
            self.slots_per_window = default_slots_per_window();
        }
        if self.repeat_rate == 0 {
            self.repeat_rate = default_repeat_rate();
        }
        if self.day_jump_days == 0 {
            self.day_jump_days = default_day_jump_days();
        }
        self
    }

    #[must_use]
    pub fn tuning(&self) -> Tuning {
        Tuning {
            slot_ms: i64::from(self.slot_minutes) * 60_000,
            slots_per_window: i64::from(self.slots_per_window),
            repeat_rate: self.repeat_rate,
            fast_scroll_spans: i64::from(self.fast_scroll_spans.max(1)),
            day_jump_ms: i64::from(self.day_jump_days) * crate::timebase::ONE_DAY_MS,
            bounds_poll_fast_ms: (self.bounds_poll_fast_secs * 1000) as i64,
            bounds_poll_slow_ms: (self.bounds_poll_slow_secs * 1000) as i64,
            grid_tick_ms: (self.grid_tick_secs * 1000) as i64,
            day_refresh_ms: (self.day_refresh_secs * 1000) as i64,
            catchup_enabled: self.catchup_enabled,
        }
    }
}

/// Engine tunables in milliseconds, derived from [`Config`]. The engines
/// take this rather than the user-facing config so callers (and tests) can
/// use arbitrary spans directly.
#[derive(Debug, Clone)]
pub struct Tuning {
    pub slot_ms: i64,
    pub slots_per_window: i64,
    pub repeat_rate: u32,
    pub fast_scroll_spans: i64,
    pub day_jump_ms: i64,
    pub bounds_poll_fast_ms: i64,
    pub bounds_poll_slow_ms: i64,
    pub grid_tick_ms: i64,
    pub day_refresh_ms: i64,
    pub catchup_enabled: bool,
}

impl Tuning {
    #[must_use]
    pub fn window_span_ms(&self) -> i64 {
        self.slot_ms * self.slots_per_window
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Config::default().tuning()
    }
}
