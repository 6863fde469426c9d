// Button latch between the event dispatcher and the simulation tick
//
// Press/release events arrive whenever the windowing layer delivers them. The
// tick consumes a snapshot exactly once, so every event that landed since the
// previous tick is applied together.

use super::action::{Button, InputSource};
use std::collections::HashSet;

/// Button state as seen by one simulation tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left_held: bool,
    pub right_held: bool,
    /// Jump went from released to pressed since the last snapshot
    pub jump_pressed: bool,
}

impl InputSnapshot {
    /// Exactly one direction held
    pub fn direction(&self) -> Option<Button> {
        match (self.left_held, self.right_held) {
            (true, false) => Some(Button::Left),
            (false, true) => Some(Button::Right),
            _ => None,
        }
    }
}

/// Latest button states plus the jump press edge
#[derive(Debug, Default)]
pub struct InputBuffer {
    /// Sources currently holding each button
    holders: [HashSet<InputSource>; 3],
    /// Set on a jump press, cleared when a snapshot is taken
    jump_edge: bool,
}

impl InputBuffer {
    /// Create a new input buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press from `source`
    pub fn press(&mut self, source: InputSource, button: Button) {
        let was_held = self.is_held(button);
        self.holders[button.index()].insert(source);

        if button == Button::Jump && !was_held {
            self.jump_edge = true;
        }
    }

    /// Register a release from `source`
    pub fn release(&mut self, source: InputSource, button: Button) {
        self.holders[button.index()].remove(&source);
    }

    /// Drop everything `source` was holding (e.g. a lifted finger)
    pub fn release_source(&mut self, source: InputSource) {
        for holders in &mut self.holders {
            holders.remove(&source);
        }
    }

    /// Check if any source holds `button`
    pub fn is_held(&self, button: Button) -> bool {
        !self.holders[button.index()].is_empty()
    }

    /// Consume the state for one tick
    ///
    /// Repeated jump taps between two ticks collapse into a single edge.
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            left_held: self.is_held(Button::Left),
            right_held: self.is_held(Button::Right),
            jump_pressed: self.jump_edge,
        };
        self.jump_edge = false;
        snapshot
    }

    /// Clear all input state
    pub fn clear(&mut self) {
        for holders in &mut self.holders {
            holders.clear();
        }
        self.jump_edge = false;
    }
}
