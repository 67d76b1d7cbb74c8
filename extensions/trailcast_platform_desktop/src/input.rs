//! Conversion from winit keyboard events

use trailcast_platform::Key;
use winit::keyboard::{Key as WinitKey, NamedKey};

/// Map a winit logical key onto a platform key, if it is one we track.
pub fn convert_key(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Named(named) => convert_named_key(*named),
        WinitKey::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(' '), None) => Some(Key::Space),
                (Some(c), None) => Some(Key::char(c)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn convert_named_key(key: NamedKey) -> Option<Key> {
    Some(match key {
        NamedKey::ArrowLeft => Key::ArrowLeft,
        NamedKey::ArrowRight => Key::ArrowRight,
        NamedKey::ArrowUp => Key::ArrowUp,
        NamedKey::ArrowDown => Key::ArrowDown,
        NamedKey::Enter => Key::Enter,
        NamedKey::Escape => Key::Escape,
        NamedKey::Space => Key::Space,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        _ => return None,
    })
}
