// Knight controller
//
// Wraps the state machine with the knight's tuning and turns each tick's
// outcome into commands for the physics body and the animation player. The
// controller never touches a body itself; `ControllerOutput::apply_to` does.

use glam::Vec2;

use crate::engine::input::{Button, InputSnapshot};
use crate::engine::physics::PhysicsBody;

use super::animation::{AnimationClip, AnimationKind, KnightAnimations};
use super::state::{CharacterState, CharacterStateMachine, JumpDenied};
use super::stats::KnightStats;

/// Below this the damped horizontal speed snaps to zero
const REST_SPEED: f32 = 0.01;

/// What to do with the horizontal velocity this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalCommand {
    /// Overwrite with this speed (points/second)
    Set(f32),
    /// Multiply the current speed by this factor
    Damp(f32),
}

impl HorizontalCommand {
    pub fn apply(self, current: f32) -> f32 {
        match self {
            Self::Set(speed) => speed,
            Self::Damp(factor) => {
                let damped = current * factor;
                if damped.abs() < REST_SPEED {
                    0.0
                } else {
                    damped
                }
            }
        }
    }
}

/// Which clip the sprite should show
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationCue {
    pub clip: AnimationClip,
    /// Mirror the sprite (facing left)
    pub flip_horizontal: bool,
    /// Start from the first frame even if the clip is already playing
    pub restart: bool,
}

/// Everything one tick asks of the outside world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerOutput {
    pub state: CharacterState,
    pub horizontal: HorizontalCommand,
    /// One-shot upward impulse, only on the tick a jump starts
    pub impulse: Option<Vec2>,
    pub animation: AnimationCue,
}

impl ControllerOutput {
    /// Write the velocity and impulse commands to a body
    pub fn apply_to<B: PhysicsBody + ?Sized>(&self, body: &mut B) {
        let mut velocity = body.velocity();
        velocity.x = self.horizontal.apply(velocity.x);
        body.set_velocity(velocity);

        if let Some(impulse) = self.impulse {
            body.apply_impulse(impulse);
        }
    }
}

/// Something worth tracing happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerEvent {
    StateChanged {
        from: CharacterState,
        to: CharacterState,
    },
    Jumped {
        impulse: Vec2,
    },
    JumpIgnored {
        state: CharacterState,
        reason: JumpDenied,
    },
}

/// Receives controller events
pub type TraceHook = Box<dyn FnMut(&ControllerEvent)>;

/// Default trace hook
pub fn log_event(event: &ControllerEvent) {
    match event {
        ControllerEvent::StateChanged { from, to } => {
            log::debug!("Knight state {:?} -> {:?}", from, to);
        }
        ControllerEvent::Jumped { impulse } => {
            log::debug!("Knight jumped with impulse {}", impulse.y);
        }
        ControllerEvent::JumpIgnored { state, reason } => {
            log::trace!("Jump ignored in {:?}: {:?}", state, reason);
        }
    }
}

/// Per-kind clip lengths, taken from the sliced sheets
#[derive(Debug, Clone, Copy)]
struct KnightClips {
    idle: AnimationClip,
    walk: AnimationClip,
    jump: AnimationClip,
}

impl KnightClips {
    fn get(&self, kind: AnimationKind) -> AnimationClip {
        match kind {
            AnimationKind::Idle => self.idle,
            AnimationKind::Walk => self.walk,
            AnimationKind::Jump => self.jump,
        }
    }
}

/// The knight's brain: input and velocity in, commands out
pub struct KnightController {
    stats: KnightStats,
    state_machine: CharacterStateMachine,
    clips: KnightClips,
    facing_left: bool,
    trace: TraceHook,
}

impl KnightController {
    pub fn new(stats: KnightStats, animations: &KnightAnimations) -> Self {
        let clips = KnightClips {
            idle: animations.clip(AnimationKind::Idle),
            walk: animations.clip(AnimationKind::Walk),
            jump: animations.clip(AnimationKind::Jump),
        };

        Self {
            state_machine: CharacterStateMachine::new(&stats),
            stats,
            clips,
            facing_left: false,
            trace: Box::new(log_event),
        }
    }

    /// Replace the trace hook
    #[allow(dead_code)]
    pub fn set_trace_hook(&mut self, hook: impl FnMut(&ControllerEvent) + 'static) {
        self.trace = Box::new(hook);
    }

    /// Run one tick
    ///
    /// `velocity` is the body's velocity before this tick's commands are
    /// applied.
    pub fn tick(&mut self, input: InputSnapshot, velocity: Vec2, dt: f32) -> ControllerOutput {
        let previous = self.state_machine.state();
        let outcome =
            self.state_machine
                .step(input, velocity.y, self.clips.jump.total_duration(), dt);

        if let Some(reason) = outcome.jump_denied {
            (self.trace)(&ControllerEvent::JumpIgnored {
                state: previous,
                reason,
            });
        }
        if outcome.changed() {
            (self.trace)(&ControllerEvent::StateChanged {
                from: outcome.previous,
                to: outcome.state,
            });
        }

        let impulse = outcome
            .jumped
            .then(|| Vec2::new(0.0, self.stats.jump_impulse));
        if let Some(impulse) = impulse {
            (self.trace)(&ControllerEvent::Jumped { impulse });
        }

        match input.direction() {
            Some(Button::Left) => self.facing_left = true,
            Some(Button::Right) => self.facing_left = false,
            _ => {}
        }

        ControllerOutput {
            state: outcome.state,
            horizontal: self.horizontal_command(outcome.state, &input),
            impulse,
            animation: AnimationCue {
                clip: self.clips.get(outcome.state.animation_kind()),
                flip_horizontal: self.facing_left,
                restart: outcome.jumped,
            },
        }
    }

    fn horizontal_command(&self, state: CharacterState, input: &InputSnapshot) -> HorizontalCommand {
        let speed = self.stats.move_speed;
        match state {
            CharacterState::WalkingLeft => HorizontalCommand::Set(-speed),
            CharacterState::WalkingRight => HorizontalCommand::Set(speed),
            // Steering in the air only while a direction is held
            CharacterState::Jumping => match input.direction() {
                Some(Button::Left) => HorizontalCommand::Set(-speed),
                Some(Button::Right) => HorizontalCommand::Set(speed),
                _ => HorizontalCommand::Set(0.0),
            },
            CharacterState::Idle if input.left_held && input.right_held => {
                HorizontalCommand::Set(0.0)
            }
            CharacterState::Idle => HorizontalCommand::Damp(self.stats.idle_damping),
        }
    }

    /// Back to Idle, facing right
    pub fn reset(&mut self) {
        self.state_machine.reset();
        self.facing_left = false;
    }

    pub fn state(&self) -> CharacterState {
        self.state_machine.state()
    }

    /// Clip for the current state
    pub fn current_clip(&self) -> AnimationClip {
        self.clips.get(self.state().animation_kind())
    }
}
