use glam::Vec2;
use rapier2d::prelude::*;

use super::world::{to_meters, to_points};

/// What the game needs from a physics body: read/write velocity and a
/// one-shot impulse. All values are in scene points.
pub trait PhysicsBody {
    /// Current linear velocity (points per second)
    fn velocity(&self) -> Vec2;

    /// Overwrite the linear velocity
    fn set_velocity(&mut self, velocity: Vec2);

    /// Apply an instantaneous impulse
    fn apply_impulse(&mut self, impulse: Vec2);
}

/// Mutable view of a rapier body that speaks scene points
pub struct BodyMut<'w> {
    body: &'w mut RigidBody,
}

impl<'w> BodyMut<'w> {
    pub(super) fn new(body: &'w mut RigidBody) -> Self {
        Self { body }
    }

    pub fn translation(&self) -> Vec2 {
        to_points(*self.body.translation())
    }

    pub fn set_translation(&mut self, position: Vec2) {
        self.body.set_translation(to_meters(position), true);
    }
}

impl PhysicsBody for BodyMut<'_> {
    fn velocity(&self) -> Vec2 {
        to_points(*self.body.linvel())
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.body.set_linvel(to_meters(velocity), true);
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        self.body.apply_impulse(to_meters(impulse), true);
    }
}

/// Common rigid body configurations for scene objects
pub mod presets {
    use super::*;

    /// Knight body: dynamic, never rotates, never sleeps
    pub fn knight_body(position: Vec2) -> RigidBody {
        RigidBodyBuilder::dynamic()
            .translation(to_meters(position))
            .lock_rotations()
            .can_sleep(false)
            .build()
    }

    /// Knight collider: a box with no bounce and no friction
    ///
    /// Unit mass, so an impulse of `j` points changes velocity by `j` points/s.
    /// Friction combines by minimum so the controller alone sets walking speed.
    pub fn knight_collider(size: Vec2) -> Collider {
        let half = to_meters(size / 2.0);
        ColliderBuilder::cuboid(half.x, half.y)
            .restitution(0.0)
            .friction(0.0)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .mass(1.0)
            .build()
    }

    /// Static platform or obstacle body
    pub fn platform_body(position: Vec2) -> RigidBody {
        RigidBodyBuilder::fixed()
            .translation(to_meters(position))
            .build()
    }

    /// Box collider for a platform of `size` points
    pub fn platform_collider(size: Vec2) -> Collider {
        let half = to_meters(size / 2.0);
        ColliderBuilder::cuboid(half.x, half.y)
            .restitution(0.0)
            .friction(0.3)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_knight_preset() {
        let body = presets::knight_body(Vec2::new(150.0, 300.0));
        let collider = presets::knight_collider(Vec2::splat(100.0));

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert!(body.is_rotation_locked());
        assert_abs_diff_eq!(body.translation().x, 1.0);
        assert_abs_diff_eq!(body.translation().y, 2.0);
        assert_eq!(collider.restitution(), 0.0);
        assert_eq!(collider.friction_combine_rule(), CoefficientCombineRule::Min);
        assert!(!collider.is_sensor());
    }

    #[test]
    fn test_platform_preset() {
        let body = presets::platform_body(Vec2::ZERO);
        let collider = presets::platform_collider(Vec2::new(300.0, 30.0));

        assert_eq!(body.body_type(), RigidBodyType::Fixed);
        assert_eq!(collider.friction(), 0.3);
    }

    #[test]
    fn test_body_mut_speaks_points() {
        let mut body = presets::knight_body(Vec2::ZERO);
        let mut view = BodyMut::new(&mut body);

        view.set_velocity(Vec2::new(200.0, -75.0));
        let velocity = view.velocity();
        assert_abs_diff_eq!(velocity.x, 200.0, epsilon = 1e-3);
        assert_abs_diff_eq!(velocity.y, -75.0, epsilon = 1e-3);

        view.set_translation(Vec2::new(30.0, 60.0));
        assert_abs_diff_eq!(view.translation().y, 60.0, epsilon = 1e-3);
    }
}
