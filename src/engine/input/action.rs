// Control buttons and their default keyboard bindings

use winit::keyboard::KeyCode;

/// The three on-screen controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Jump,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Left, Button::Right, Button::Jump];

    /// Slot in per-button arrays
    pub(crate) fn index(self) -> usize {
        match self {
            Button::Left => 0,
            Button::Right => 1,
            Button::Jump => 2,
        }
    }

    /// Node name used for the control's on-screen widget
    pub fn node_name(self) -> &'static str {
        match self {
            Button::Left => "leftButton",
            Button::Right => "rightButton",
            Button::Jump => "jumpButton",
        }
    }
}

/// Where a press came from
///
/// Several sources may hold the same button at once; the button is released
/// only when all of them let go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Touch(u64),
    Mouse,
}

/// Keyboard bindings for desktop play-testing
pub fn default_keyboard_bindings() -> Vec<(KeyCode, Button)> {
    vec![
        (KeyCode::ArrowLeft, Button::Left),
        (KeyCode::KeyA, Button::Left),
        (KeyCode::ArrowRight, Button::Right),
        (KeyCode::KeyD, Button::Right),
        (KeyCode::Space, Button::Jump),
        (KeyCode::KeyW, Button::Jump),
        (KeyCode::ArrowUp, Button::Jump),
    ]
}
