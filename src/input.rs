use winit::event::ElementState;
use winit::keyboard::{Key, NamedKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Close,
    Announce,
}

/// Maps a key event to an action. Only presses count; repeats and releases are ignored.
pub fn handle_key(key: &Key, state: ElementState, repeat: bool) -> Option<InputAction> {
    if state != ElementState::Pressed || repeat {
        return None;
    }

    match key {
        Key::Named(NamedKey::Escape) => Some(InputAction::Close),
        Key::Named(NamedKey::Space) => Some(InputAction::Announce),
        _ => None,
    }
}
