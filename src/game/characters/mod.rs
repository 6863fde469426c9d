// Knight character
//
// This module contains everything the playable knight needs:
// - Tunable movement constants
// - The pure state machine
// - Animation clips, frame tables and playback
// - The controller that turns input into body and animation commands

pub mod animation;
pub mod character;
pub mod state;
pub mod stats;

// Re-export commonly used types
#[allow(unused_imports)]
pub use animation::{AnimationClip, AnimationKind, AnimationPlayer, KnightAnimations};
#[allow(unused_imports)]
pub use character::{
    AnimationCue, ControllerEvent, ControllerOutput, HorizontalCommand, KnightController,
};
#[allow(unused_imports)]
pub use state::{CharacterState, CharacterStateMachine, JumpDenied};
#[allow(unused_imports)]
pub use stats::{JumpPolicy, KnightStats};
