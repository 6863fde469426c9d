// Input handling system
//
// Turns window events (touch, mouse, keyboard) into the three control buttons
// the knight understands, latched once per simulation tick.
//
// ## Architecture
//
// - `action`: Button identifiers, input sources and default key bindings
// - `config`: Keyboard bindings and the on-screen control layout
// - `buffer`: Per-tick latch of held buttons and the jump press edge
// - `manager`: Routes winit events, hit-testing touches against the layout
//
// ## Usage Example
//
// ```rust
// use engine::input::InputManager;
//
// let mut input = InputManager::new(Vec2::new(1280.0, 720.0));
//
// // In your event loop
// input.process_touch(&touch);
//
// // Once per simulation tick
// let snapshot = input.take_snapshot();
// if snapshot.jump_pressed {
//     // Jump tapped since the previous tick
// }
// ```

pub mod action;
pub mod buffer;
pub mod config;
pub mod manager;

// Re-export commonly used types
#[allow(unused_imports)]
pub use action::{Button, InputSource};
#[allow(unused_imports)]
pub use buffer::{InputBuffer, InputSnapshot};
#[allow(unused_imports)]
pub use config::{ControlLayout, ControlRegion, InputConfig};
#[allow(unused_imports)]
pub use manager::InputManager;
