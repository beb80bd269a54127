//! Key model for the navigation engines.
//!
//! Key releases are distinct variants rather than a flag: the deferred
//! fetch-on-release pattern needs them dispatched through the same handler
//! table as presses.

/// A remote-control key as delivered by the input dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Select,
    Back,
    FastForward,
    Rewind,
    ChannelUp,
    ChannelDown,
    Digit(u8),
    LeftRelease,
    RightRelease,
    UpRelease,
    DownRelease,
    FastForwardRelease,
    RewindRelease,
    ChannelUpRelease,
    ChannelDownRelease,
}

impl Key {
    #[must_use]
    pub fn is_release(self) -> bool {
        matches!(
            self,
            Key::LeftRelease
                | Key::RightRelease
                | Key::UpRelease
                | Key::DownRelease
                | Key::FastForwardRelease
                | Key::RewindRelease
                | Key::ChannelUpRelease
                | Key::ChannelDownRelease
        )
    }

    /// The release variant paired with a navigational press, if it has one.
    #[must_use]
    pub fn release_counterpart(self) -> Option<Key> {
        match self {
            Key::Left => Some(Key::LeftRelease),
            Key::Right => Some(Key::RightRelease),
            Key::Up => Some(Key::UpRelease),
            Key::Down => Some(Key::DownRelease),
            Key::FastForward => Some(Key::FastForwardRelease),
            Key::Rewind => Some(Key::RewindRelease),
            Key::ChannelUp => Some(Key::ChannelUpRelease),
            Key::ChannelDown => Some(Key::ChannelDownRelease),
            _ => None,
        }
    }
}

/// A key plus the dispatcher's held-repeat flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub repeat: bool,
}

impl KeyInput {
    #[must_use]
    pub fn press(key: Key) -> Self {
        Self { key, repeat: false }
    }

    #[must_use]
    pub fn held(key: Key) -> Self {
        Self { key, repeat: true }
    }
}

/// Dispatch result, returned to the outer input dispatcher so it can decide
/// whether to offer the key to other handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Handled {
    Handled,
    NotHandled,
}

impl Handled {
    #[must_use]
    pub fn consumed(self) -> bool {
        self == Handled::Handled
    }
}

/// Modulo gate decoupling raw key-repeat rate from navigation-step rate.
///
/// `fire` reports readiness then post-increments, so the first event of a
/// run always fires and every `rate`-th event after it.
#[derive(Debug)]
pub struct RepeatGate {
    count: u32,
    rate: u32,
}

impl RepeatGate {
    #[must_use]
    pub fn new(rate: u32) -> Self {
        Self {
            count: 0,
            rate: rate.max(1),
        }
    }

    pub fn fire(&mut self) -> bool {
        let ready = self.count % self.rate == 0;
        self.count = self.count.wrapping_add(1);
        ready
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_gate_fires_every_nth_event() {
        let mut gate = RepeatGate::new(2);
        let fired: Vec<bool> = (0..5).map(|_| gate.fire()).collect();
        assert_eq!(fired, vec![true, false, true, false, true]);
        assert_eq!(fired.iter().filter(|f| **f).count(), 3);
    }

    #[test]
    fn test_repeat_gate_reset_restarts_the_run() {
        let mut gate = RepeatGate::new(3);
        assert!(gate.fire());
        assert!(!gate.fire());
        gate.reset();
        assert!(gate.fire());
    }

    #[test]
    fn test_rate_one_always_fires() {
        let mut gate = RepeatGate::new(1);
        assert!((0..4).all(|_| gate.fire()));
    }

    #[test]
    fn test_release_counterparts() {
        assert_eq!(Key::Left.release_counterpart(), Some(Key::LeftRelease));
        assert_eq!(Key::Select.release_counterpart(), None);
        assert!(Key::FastForwardRelease.is_release());
        assert!(!Key::FastForward.is_release());
    }
}
