// Input configuration: keyboard bindings and on-screen control layout

use super::action::{default_keyboard_bindings, Button};
use glam::Vec2;
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Gap between controls and the screen edge (points)
const CONTROL_MARGIN: f32 = 20.0;

/// Control size as a fraction of the shorter screen side
const CONTROL_SCALE: f32 = 0.15;

/// Smallest control side (points)
const MIN_CONTROL_SIZE: f32 = 48.0;

/// Keyboard → button mapping
#[derive(Debug, Clone)]
pub struct InputConfig {
    bindings: HashMap<KeyCode, Button>,
}

impl InputConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(bindings: Vec<(KeyCode, Button)>) -> Self {
        let mut config = Self::new();
        for (key, button) in bindings {
            config.bind(key, button);
        }
        config
    }

    /// Bind a key, replacing whatever it was bound to
    pub fn bind(&mut self, key: KeyCode, button: Button) {
        self.bindings.insert(key, button);
    }

    /// Get the button bound to a key
    pub fn button_for(&self, key: KeyCode) -> Option<Button> {
        self.bindings.get(&key).copied()
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::from_bindings(default_keyboard_bindings())
    }
}

/// Screen area that presses one button (scene coordinates, origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRegion {
    pub button: Button,
    pub center: Vec2,
    pub size: Vec2,
}

impl ControlRegion {
    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.size / 2.0;
        let offset = (point - self.center).abs();
        offset.x <= half.x && offset.y <= half.y
    }
}

/// On-screen controls: left/right in the bottom-left corner, jump bottom-right
#[derive(Debug, Clone)]
pub struct ControlLayout {
    regions: Vec<ControlRegion>,
}

impl ControlLayout {
    /// Lay controls out for a surface of `screen` points
    pub fn for_screen(screen: Vec2) -> Self {
        let side = (screen.x.min(screen.y) * CONTROL_SCALE).max(MIN_CONTROL_SIZE);
        let size = Vec2::splat(side);
        let row_y = CONTROL_MARGIN + side / 2.0;

        let left_x = CONTROL_MARGIN + side / 2.0;
        let right_x = left_x + side + CONTROL_MARGIN;
        let jump_x = screen.x - CONTROL_MARGIN - side / 2.0;

        Self {
            regions: vec![
                ControlRegion {
                    button: Button::Left,
                    center: Vec2::new(left_x, row_y),
                    size,
                },
                ControlRegion {
                    button: Button::Right,
                    center: Vec2::new(right_x, row_y),
                    size,
                },
                ControlRegion {
                    button: Button::Jump,
                    center: Vec2::new(jump_x, row_y),
                    size,
                },
            ],
        }
    }

    /// Which control, if any, lies under `point`
    pub fn hit_test(&self, point: Vec2) -> Option<Button> {
        self.regions
            .iter()
            .find(|region| region.contains(point))
            .map(|region| region.button)
    }

    #[cfg(test)]
    pub fn region(&self, button: Button) -> Option<&ControlRegion> {
        self.regions.iter().find(|region| region.button == button)
    }

    pub fn regions(&self) -> &[ControlRegion] {
        &self.regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let config = InputConfig::default();
        assert_eq!(config.button_for(KeyCode::ArrowLeft), Some(Button::Left));
        assert_eq!(config.button_for(KeyCode::Space), Some(Button::Jump));
        assert_eq!(config.button_for(KeyCode::KeyZ), None);
    }

    #[test]
    fn test_rebind_key() {
        let mut config = InputConfig::default();
        config.bind(KeyCode::Space, Button::Left);

        assert_eq!(config.button_for(KeyCode::Space), Some(Button::Left));
        assert_eq!(config.button_for(KeyCode::KeyW), Some(Button::Jump));
    }

    #[test]
    fn test_from_bindings() {
        let config = InputConfig::from_bindings(vec![(KeyCode::KeyJ, Button::Jump)]);

        assert_eq!(config.button_for(KeyCode::KeyJ), Some(Button::Jump));
        assert_eq!(config.button_for(KeyCode::Space), None);
    }

    #[test]
    fn test_layout_hit_test() {
        let layout = ControlLayout::for_screen(Vec2::new(1000.0, 600.0));

        for region in layout.regions() {
            assert_eq!(layout.hit_test(region.center), Some(region.button));
        }
        assert_eq!(layout.hit_test(Vec2::new(500.0, 300.0)), None);
    }

    #[test]
    fn test_layout_corners() {
        let screen = Vec2::new(1000.0, 600.0);
        let layout = ControlLayout::for_screen(screen);

        let left = layout.region(Button::Left).unwrap();
        let right = layout.region(Button::Right).unwrap();
        let jump = layout.region(Button::Jump).unwrap();

        assert!(left.center.x < right.center.x);
        assert!(jump.center.x > screen.x / 2.0);
        assert!(left.center.y < screen.y / 2.0);
    }

    #[test]
    fn test_controls_do_not_overlap() {
        let layout = ControlLayout::for_screen(Vec2::new(320.0, 480.0));
        let left = layout.region(Button::Left).unwrap();
        let right = layout.region(Button::Right).unwrap();

        assert!(left.center.x + left.size.x / 2.0 < right.center.x - right.size.x / 2.0);
    }

    #[test]
    fn test_region_contains_edges() {
        let region = ControlRegion {
            button: Button::Jump,
            center: Vec2::new(50.0, 50.0),
            size: Vec2::splat(20.0),
        };
        assert!(region.contains(Vec2::new(60.0, 40.0)));
        assert!(!region.contains(Vec2::new(60.1, 50.0)));
    }
}
