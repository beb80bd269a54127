//! Named logical timers owned by each engine component.
//!
//! Scheduling a name that already exists replaces the previous entry, so
//! duplicate timers for the same purpose can never accumulate. The whole set
//! is owned by the component it serves and cleared on passivation, which is
//! what guarantees nothing keeps firing after teardown.

#[derive(Debug)]
struct TimerEntry {
    name: &'static str,
    period_ms: i64,
    next_fire: i64,
    enabled: bool,
}

#[derive(Debug, Default)]
pub struct TimerSet {
    entries: Vec<TimerEntry>,
}

impl TimerSet {
    /// Schedule (or replace) a named periodic timer, first firing one period
    /// from `now`.
    pub fn schedule(&mut self, name: &'static str, period_ms: i64, now: i64) {
        debug_assert!(period_ms > 0);
        self.cancel(name);
        self.entries.push(TimerEntry {
            name,
            period_ms,
            next_fire: now + period_ms,
            enabled: true,
        });
    }

    pub fn cancel(&mut self, name: &str) {
        self.entries.retain(|e| e.name != name);
    }

    pub fn enable(&mut self, name: &str) {
        if let Some(e) = self.entries.iter_mut().find(|e| e.name == name) {
            e.enabled = true;
        }
    }

    pub fn disable(&mut self, name: &str) {
        if let Some(e) = self.entries.iter_mut().find(|e| e.name == name) {
            e.enabled = false;
        }
    }

    /// Names of timers due at `now`, advancing each past `now` while keeping
    /// its cadence. A timer that slept through several periods fires once.
    pub fn poll(&mut self, now: i64) -> Vec<&'static str> {
        let mut fired = Vec::new();
        for e in &mut self.entries {
            if e.enabled && now >= e.next_fire {
                fired.push(e.name);
                while e.next_fire <= now {
                    e.next_fire += e.period_ms;
                }
            }
        }
        fired
    }

    /// Earliest enabled deadline, for drivers that sleep between polls.
    #[must_use]
    pub fn next_deadline(&self) -> Option<i64> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.next_fire)
            .min()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
