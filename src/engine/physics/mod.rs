// Physics system using rapier2d
//
// The game talks to bodies only through `PhysicsBody`; rapier stays behind
// this module.

pub mod body;
mod world;

#[allow(unused_imports)]
pub use body::{presets, BodyMut, PhysicsBody};
#[allow(unused_imports)]
pub use world::{to_meters, to_points, PhysicsWorld, DEFAULT_GRAVITY, POINTS_PER_METER};

// Re-export commonly used rapier types for convenience
#[allow(unused_imports)]
pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};
