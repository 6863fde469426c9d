// Input manager - routes window events onto the button latch

use super::action::{Button, InputSource};
use super::buffer::{InputBuffer, InputSnapshot};
use super::config::{ControlLayout, InputConfig};
use glam::Vec2;
use std::collections::HashMap;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, MouseButton, Touch, TouchPhase};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Turns touch, mouse and keyboard events into button presses
///
/// Touches are hit-tested against the on-screen control layout. The mouse
/// behaves like a single finger so the controls work on desktop too.
pub struct InputManager {
    config: InputConfig,
    layout: ControlLayout,
    buffer: InputBuffer,

    /// Button each active touch is currently on
    touches: HashMap<u64, Option<Button>>,
    /// Last cursor position (window coordinates, logical)
    cursor: Vec2,
    mouse_down: bool,
    mouse_button: Option<Button>,

    /// Logical surface size
    screen: Vec2,
    scale_factor: f64,
}

impl InputManager {
    /// Create an input manager for a surface of `screen` logical points
    pub fn new(screen: Vec2) -> Self {
        Self {
            config: InputConfig::default(),
            layout: ControlLayout::for_screen(screen),
            buffer: InputBuffer::new(),
            touches: HashMap::new(),
            cursor: Vec2::ZERO,
            mouse_down: false,
            mouse_button: None,
            screen,
            scale_factor: 1.0,
        }
    }

    /// Relayout controls for a new surface size
    pub fn resize(&mut self, screen: Vec2) {
        self.screen = screen;
        self.layout = ControlLayout::for_screen(screen);
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.key(code, event.state == ElementState::Pressed, event.repeat);
        }
    }

    /// Process a touch event from winit
    pub fn process_touch(&mut self, touch: &Touch) {
        let point = self.to_logical(touch.location);
        match touch.phase {
            TouchPhase::Started => self.touch_began(touch.id, point),
            TouchPhase::Moved => self.touch_moved(touch.id, point),
            TouchPhase::Ended | TouchPhase::Cancelled => self.touch_ended(touch.id),
        }
    }

    /// Track the cursor; a held mouse button slides between controls
    pub fn process_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = self.to_logical(position);
        if self.mouse_down {
            let button = self.layout.hit_test(self.scene_point(self.cursor));
            self.retarget(InputSource::Mouse, self.mouse_button, button);
            self.mouse_button = button;
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }

        match state {
            ElementState::Pressed => {
                self.mouse_down = true;
                self.mouse_button = self.layout.hit_test(self.scene_point(self.cursor));
                if let Some(button) = self.mouse_button {
                    self.buffer.press(InputSource::Mouse, button);
                }
            }
            ElementState::Released => {
                self.mouse_down = false;
                self.mouse_button = None;
                self.buffer.release_source(InputSource::Mouse);
            }
        }
    }

    /// Apply a key press or release; auto-repeat is ignored
    pub fn key(&mut self, code: KeyCode, pressed: bool, repeat: bool) {
        let Some(button) = self.config.button_for(code) else {
            return;
        };

        let source = InputSource::Keyboard(code);
        if pressed {
            if !repeat {
                self.buffer.press(source, button);
            }
        } else {
            self.buffer.release(source, button);
        }
    }

    /// A finger went down at `point` (window coordinates, logical)
    pub fn touch_began(&mut self, id: u64, point: Vec2) {
        let button = self.layout.hit_test(self.scene_point(point));
        if let Some(button) = button {
            log::trace!("Touch {} began on {:?}", id, button);
            self.buffer.press(InputSource::Touch(id), button);
        }
        self.touches.insert(id, button);
    }

    /// A finger moved; sliding onto another control switches buttons
    pub fn touch_moved(&mut self, id: u64, point: Vec2) {
        let Some(previous) = self.touches.get(&id).copied() else {
            return;
        };

        let button = self.layout.hit_test(self.scene_point(point));
        self.retarget(InputSource::Touch(id), previous, button);
        self.touches.insert(id, button);
    }

    /// A finger lifted or the touch was cancelled
    pub fn touch_ended(&mut self, id: u64) {
        if self.touches.remove(&id).is_some() {
            self.buffer.release_source(InputSource::Touch(id));
        }
    }

    /// Consume the button state for this tick
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        self.buffer.take_snapshot()
    }

    /// Check if any source holds `button`
    pub fn is_held(&self, button: Button) -> bool {
        self.buffer.is_held(button)
    }

    /// Forget every press (focus lost, scene reset)
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.touches.clear();
        self.mouse_down = false;
        self.mouse_button = None;
    }

    pub fn layout(&self) -> &ControlLayout {
        &self.layout
    }

    fn retarget(&mut self, source: InputSource, from: Option<Button>, to: Option<Button>) {
        if from == to {
            return;
        }
        if let Some(from) = from {
            self.buffer.release(source, from);
        }
        if let Some(to) = to {
            self.buffer.press(source, to);
        }
    }

    fn to_logical(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let logical = position.to_logical::<f32>(self.scale_factor);
        Vec2::new(logical.x, logical.y)
    }

    /// Window coordinates (origin top-left) to scene coordinates (origin bottom-left)
    fn scene_point(&self, window: Vec2) -> Vec2 {
        Vec2::new(window.x, self.screen.y - window.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(1000.0, 600.0);

    /// Window-space centre of a control
    fn window_center(manager: &InputManager, button: Button) -> Vec2 {
        let center = manager.layout().region(button).unwrap().center;
        Vec2::new(center.x, SCREEN.y - center.y)
    }

    #[test]
    fn test_touch_on_control() {
        let mut manager = InputManager::new(SCREEN);
        let point = window_center(&manager, Button::Right);

        manager.touch_began(7, point);
        assert!(manager.take_snapshot().right_held);

        manager.touch_ended(7);
        assert!(!manager.take_snapshot().right_held);
    }

    #[test]
    fn test_touch_outside_controls() {
        let mut manager = InputManager::new(SCREEN);
        manager.touch_began(1, Vec2::new(500.0, 100.0));

        assert_eq!(manager.take_snapshot(), InputSnapshot::default());
    }

    #[test]
    fn test_touch_slides_between_controls() {
        let mut manager = InputManager::new(SCREEN);
        let left = window_center(&manager, Button::Left);
        let right = window_center(&manager, Button::Right);

        manager.touch_began(3, left);
        manager.touch_moved(3, right);

        let snapshot = manager.take_snapshot();
        assert!(!snapshot.left_held);
        assert!(snapshot.right_held);
    }

    #[test]
    fn test_two_fingers_both_directions() {
        let mut manager = InputManager::new(SCREEN);
        let left = window_center(&manager, Button::Left);
        let right = window_center(&manager, Button::Right);

        manager.touch_began(1, left);
        manager.touch_began(2, right);

        let snapshot = manager.take_snapshot();
        assert!(snapshot.left_held && snapshot.right_held);
        assert_eq!(snapshot.direction(), None);
    }

    #[test]
    fn test_jump_touch_is_an_edge() {
        let mut manager = InputManager::new(SCREEN);
        let jump = window_center(&manager, Button::Jump);

        manager.touch_began(4, jump);
        assert!(manager.take_snapshot().jump_pressed);
        assert!(!manager.take_snapshot().jump_pressed);
        assert!(manager.is_held(Button::Jump));
    }

    #[test]
    fn test_keyboard() {
        let mut manager = InputManager::new(SCREEN);

        manager.key(KeyCode::ArrowLeft, true, false);
        manager.key(KeyCode::Space, true, false);
        let snapshot = manager.take_snapshot();
        assert!(snapshot.left_held);
        assert!(snapshot.jump_pressed);

        // Auto-repeat must not produce another jump
        manager.key(KeyCode::Space, true, true);
        assert!(!manager.take_snapshot().jump_pressed);

        manager.key(KeyCode::ArrowLeft, false, false);
        assert!(!manager.take_snapshot().left_held);
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut manager = InputManager::new(SCREEN);
        manager.key(KeyCode::KeyZ, true, false);
        assert_eq!(manager.take_snapshot(), InputSnapshot::default());
    }

    #[test]
    fn test_resize_moves_jump_control() {
        let mut manager = InputManager::new(SCREEN);
        let before = manager.layout().region(Button::Jump).unwrap().center;

        manager.resize(Vec2::new(1400.0, 600.0));
        let after = manager.layout().region(Button::Jump).unwrap().center;

        assert!(after.x > before.x);
    }

    #[test]
    fn test_reset() {
        let mut manager = InputManager::new(SCREEN);
        let left = window_center(&manager, Button::Left);
        manager.touch_began(1, left);
        manager.reset();

        assert!(!manager.is_held(Button::Left));
    }
}
