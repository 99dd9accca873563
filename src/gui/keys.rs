//! Translation of GDK key and button events into [`KeyCode`]s.

use crate::input::KeyCode;
use gtk4::gdk;

/// GDK key names (`Control_L`, `KP_5`, `a`) are accepted by [`KeyCode`]'s parser directly.
pub fn key_code_from_name(name: &str) -> Option<KeyCode> {
    name.parse().ok()
}

pub fn key_code(key: gdk::Key) -> Option<KeyCode> {
    key.name().and_then(|name| key_code_from_name(&name))
}

/// Mouse buttons a ring can be bound to. The primary button is reserved for clicks.
pub fn button_code(button: u32) -> Option<KeyCode> {
    match button {
        2 => Some(KeyCode::MiddleMouse),
        8 => Some(KeyCode::Mouse4),
        9 => Some(KeyCode::Mouse5),
        _ => None,
    }
}
