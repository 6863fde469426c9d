// Knight state machine
//
// Pure transition logic: no physics, no rendering. Evaluated once per tick in
// priority order: jump request, then direction (when not jumping), then landing.

use super::animation::AnimationKind;
use super::stats::{JumpPolicy, KnightStats};
use crate::engine::input::{Button, InputSnapshot};

/// Slack when comparing accumulated tick time with the jump clip length
const LANDING_EPSILON: f32 = 1e-4;

/// Represents the current state of the knight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterState {
    /// Standing still
    #[default]
    Idle,
    WalkingLeft,
    WalkingRight,
    /// Jump animation playing
    Jumping,
}

impl CharacterState {
    pub fn is_walking(&self) -> bool {
        matches!(self, Self::WalkingLeft | Self::WalkingRight)
    }

    /// Animation shown in this state
    pub fn animation_kind(&self) -> AnimationKind {
        match self {
            Self::Idle => AnimationKind::Idle,
            Self::WalkingLeft | Self::WalkingRight => AnimationKind::Walk,
            Self::Jumping => AnimationKind::Jump,
        }
    }

    /// Grounded state for the held direction; both or neither is Idle
    pub fn from_direction(input: &InputSnapshot) -> Self {
        match input.direction() {
            Some(Button::Left) => Self::WalkingLeft,
            Some(Button::Right) => Self::WalkingRight,
            _ => Self::Idle,
        }
    }
}

/// Why a jump press was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpDenied {
    AlreadyJumping,
    /// Vertical velocity above the grounded threshold
    Airborne,
    /// Standing still while jumps require movement
    Stationary,
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub previous: CharacterState,
    pub state: CharacterState,
    /// A jump started this tick
    pub jumped: bool,
    pub jump_denied: Option<JumpDenied>,
}

impl StepOutcome {
    pub fn changed(&self) -> bool {
        self.previous != self.state
    }
}

/// State machine that handles knight state transitions
#[derive(Debug)]
pub struct CharacterStateMachine {
    current_state: CharacterState,
    /// Time spent in the current state
    state_time: f32,
    /// The current jump has been seen falling
    descending: bool,
    stats: KnightStats,
}

impl Default for CharacterStateMachine {
    fn default() -> Self {
        Self::new(&KnightStats::standard())
    }
}

impl CharacterStateMachine {
    pub fn new(stats: &KnightStats) -> Self {
        Self {
            current_state: CharacterState::Idle,
            state_time: 0.0,
            descending: false,
            stats: stats.clone(),
        }
    }

    /// Get the current state
    pub fn state(&self) -> CharacterState {
        self.current_state
    }

    /// Advance one tick
    ///
    /// `jump_duration` is the length of the jump clip; the jump ends once it has
    /// played out, or earlier if the knight fell and is grounded again.
    pub fn step(
        &mut self,
        input: InputSnapshot,
        vertical_velocity: f32,
        jump_duration: f32,
        dt: f32,
    ) -> StepOutcome {
        let previous = self.current_state;
        self.state_time += dt;

        let grounded = self.stats.is_grounded(vertical_velocity);
        let mut jumped = false;
        let mut jump_denied = None;

        if input.jump_pressed {
            match self.check_jump(grounded) {
                Ok(()) => {
                    self.transition(CharacterState::Jumping);
                    self.descending = false;
                    jumped = true;
                }
                Err(reason) => jump_denied = Some(reason),
            }
        }

        if !jumped {
            if self.current_state == CharacterState::Jumping {
                if self.stats.is_falling(vertical_velocity) {
                    self.descending = true;
                }

                let played_out = self.state_time + LANDING_EPSILON >= jump_duration;
                if played_out || (self.descending && grounded) {
                    self.transition(CharacterState::from_direction(&input));
                }
            } else {
                self.transition(CharacterState::from_direction(&input));
            }
        }

        StepOutcome {
            previous,
            state: self.current_state,
            jumped,
            jump_denied,
        }
    }

    /// Back to Idle, e.g. after a respawn
    pub fn reset(&mut self) {
        self.transition(CharacterState::Idle);
        self.descending = false;
    }

    fn check_jump(&self, grounded: bool) -> Result<(), JumpDenied> {
        if self.current_state == CharacterState::Jumping {
            return Err(JumpDenied::AlreadyJumping);
        }
        if !grounded {
            return Err(JumpDenied::Airborne);
        }
        if self.stats.jump_policy == JumpPolicy::WhileMoving && !self.current_state.is_walking() {
            return Err(JumpDenied::Stationary);
        }
        Ok(())
    }

    fn transition(&mut self, new_state: CharacterState) {
        if self.current_state != new_state {
            self.current_state = new_state;
            self.state_time = 0.0;
        }
    }
}
