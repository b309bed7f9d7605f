use crate::input::{ShortcutKey, ShortcutModifiers};

fn shortcut_character_from_keycode(keycode: u32) -> Option<char> {
    // Wayland/XKB keycodes are commonly evdev+8; accept both. XKB 'q' (24)
    // collides with evdev 'o', so only evdev 'q' is recognised.
    match keycode {
        24 | 32 => Some('o'),
        31 | 39 => Some('s'),
        16 => Some('q'),
        _ => None,
    }
}

pub(super) fn normalize_shortcut_key(key: gtk4::gdk::Key, keycode: u32) -> Option<ShortcutKey> {
    if key == gtk4::gdk::Key::Escape {
        return Some(ShortcutKey::Escape);
    }

    let keyval_shortcut = key
        .to_unicode()
        .filter(|character| !character.is_control())
        .map(|character| character.to_ascii_lowercase());
    match keyval_shortcut {
        Some(character) if character.is_ascii() => Some(ShortcutKey::Character(character)),
        Some(_) | None => shortcut_character_from_keycode(keycode).map(ShortcutKey::Character),
    }
}

pub(super) fn shortcut_modifiers(modifier: gtk4::gdk::ModifierType) -> ShortcutModifiers {
    ShortcutModifiers::new(
        modifier.contains(gtk4::gdk::ModifierType::CONTROL_MASK),
        modifier.contains(gtk4::gdk::ModifierType::SHIFT_MASK),
    )
}
