use egui::{Context, Event, Key, Modifiers};

use crate::recent::MAX_RECENT_FILES;
use crate::shell::Action;

const RECENT_KEYS: [Key; MAX_RECENT_FILES] = [Key::Num1, Key::Num2, Key::Num3, Key::Num4, Key::Num5];

/// Shortcut for a key press, if any.
pub fn action_for_key(key: Key, modifiers: Modifiers) -> Option<Action> {
    if modifiers.command {
        if let Some(rank) = RECENT_KEYS.iter().position(|k| *k == key) {
            return Some(Action::OpenRecent(rank));
        }
        return match key {
            Key::O => Some(Action::OpenDialog),
            Key::Q => Some(Action::Quit),
            _ => None,
        };
    }

    if modifiers.alt {
        return None;
    }

    match key {
        Key::Space => Some(Action::PlayPause),
        Key::Escape => Some(Action::ExitFullscreen),
        Key::ArrowLeft => Some(Action::SkipBackward),
        Key::ArrowRight => Some(Action::SkipForward),
        Key::ArrowUp => Some(Action::VolumeUp),
        Key::ArrowDown => Some(Action::VolumeDown),
        Key::M => Some(Action::ToggleMute),
        Key::F => Some(Action::ToggleFullscreen),
        _ => None,
    }
}

/// Label shown next to a recent-files menu entry.
pub fn recent_shortcut_text(rank: usize) -> Option<String> {
    (rank < MAX_RECENT_FILES).then(|| format!("Ctrl+{}", rank + 1))
}

/// Actions for every key pressed this frame, in order.
pub fn pressed_actions(ctx: &Context) -> Vec<Action> {
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => action_for_key(*key, *modifiers),
                _ => None,
            })
            .collect()
    })
}
