use glam::Vec2;
use rapier2d::prelude::*;

use super::body::{BodyMut, PhysicsBody};

/// Scene units per physics metre
pub const POINTS_PER_METER: f32 = 150.0;

/// Earth gravity, the same default a typical 2D scene graph uses
pub const DEFAULT_GRAVITY: f32 = -9.8;

/// Physics world that manages all physics simulation
///
/// Everything public is in scene points; rapier works in metres internally so
/// its tolerances stay sensible.
pub struct PhysicsWorld {
    /// Gravity vector (metres per second squared)
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(Vec2::new(0.0, DEFAULT_GRAVITY))
    }

    /// Create a new physics world with custom gravity (metres per second squared)
    pub fn with_gravity(gravity: Vec2) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: vector![gravity.x, gravity.y],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Velocity/impulse view of a body, in scene units
    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<BodyMut<'_>> {
        self.rigid_body_set.get_mut(handle).map(BodyMut::new)
    }

    /// Body velocity in points per second
    pub fn velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.get_rigid_body(handle).map(|body| to_points(*body.linvel()))
    }

    /// Body centre in scene points
    pub fn translation(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.get_rigid_body(handle)
            .map(|body| to_points(*body.translation()))
    }

    /// Teleport a body and stop it
    pub fn set_translation(&mut self, handle: RigidBodyHandle, position: Vec2) {
        if let Some(mut body) = self.body_mut(handle) {
            body.set_translation(position);
            body.set_velocity(Vec2::ZERO);
        }
    }

    /// Gravity in points per second squared
    pub fn gravity(&self) -> Vec2 {
        to_points(self.gravity)
    }

    /// Set the timestep for physics simulation
    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene points to physics metres
pub fn to_meters(points: Vec2) -> Vector<Real> {
    vector![points.x / POINTS_PER_METER, points.y / POINTS_PER_METER]
}

/// Physics metres to scene points
pub fn to_points(meters: Vector<Real>) -> Vec2 {
    Vec2::new(meters.x, meters.y) * POINTS_PER_METER
}
