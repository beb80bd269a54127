//! Terminal key events to remote-control keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::keys::{Key, KeyInput};

/// Map a crossterm key event onto the engine's key model. Returns `None`
/// for keys the guide does not use, and for release events of keys that
/// have no release semantics.
#[must_use]
pub fn map_key(event: &KeyEvent) -> Option<KeyInput> {
    let release = event.kind == KeyEventKind::Release;
    let repeat = event.kind == KeyEventKind::Repeat;

    let key = match event.code {
        KeyCode::Left | KeyCode::Char('h') => nav(Key::Left, Key::LeftRelease, release),
        KeyCode::Right | KeyCode::Char('l') => nav(Key::Right, Key::RightRelease, release),
        KeyCode::Up | KeyCode::Char('k') => nav(Key::Up, Key::UpRelease, release),
        KeyCode::Down | KeyCode::Char('j') => nav(Key::Down, Key::DownRelease, release),
        KeyCode::PageUp => nav(Key::ChannelUp, Key::ChannelUpRelease, release),
        KeyCode::PageDown => nav(Key::ChannelDown, Key::ChannelDownRelease, release),
        KeyCode::Char('f') => nav(Key::FastForward, Key::FastForwardRelease, release),
        KeyCode::Char('b') => nav(Key::Rewind, Key::RewindRelease, release),
        KeyCode::Enter => press_only(Key::Select, release),
        KeyCode::Esc | KeyCode::Backspace => press_only(Key::Back, release),
        KeyCode::Char(c @ '0'..='9') => press_only(Key::Digit(c as u8 - b'0'), release),
        _ => None,
    }?;
    Some(KeyInput { key, repeat })
}

fn nav(press: Key, released: Key, release: bool) -> Option<Key> {
    Some(if release { released } else { press })
}

fn press_only(press: Key, release: bool) -> Option<Key> {
    if release { None } else { Some(press) }
}
