use crate::math::{Mat3, Mat4, Quat, Vec3};

/// Mass given to new bodies and to bodies released with `set_fixed(id, false)`.
pub const DEFAULT_MASS: f32 = 5.0;

/// The mutable physical state of one object.
///
/// The world transform and world-space inverse inertia tensor are derived
/// from position, orientation and the local inertia. Every setter that
/// touches one of those re-derives both before returning, so the derived
/// values are never stale when read.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    /// Inverse mass (0 for infinite mass / fixed)
    pub(super) inverse_mass: f32,
    /// Local inverse inertia tensor
    pub(super) inverse_inertia_tensor: Mat3,
    /// World-space inverse inertia tensor, `R * I⁻¹ * Rᵀ`
    pub(super) inverse_inertia_tensor_world: Mat3,

    pub(super) position: Vec3,
    pub(super) orientation: Quat,
    /// Linear velocity
    pub(super) velocity: Vec3,
    /// Angular velocity (radians per second, world frame)
    pub(super) rotation: Vec3,
    /// Constant acceleration, normally gravity
    pub(super) acceleration: Vec3,

    /// Fraction of linear velocity lost per second (0-1)
    pub(super) linear_damping: f32,
    /// Fraction of angular velocity lost per second (0-1)
    pub(super) angular_damping: f32,

    pub(super) transform_matrix: Mat4,

    // Cleared by every integration step.
    pub(super) force: Vec3,
    pub(super) torque: Vec3,
}

impl Default for RigidBody {
    fn default() -> Self {
        RigidBodyDesc::default().build()
    }
}

impl RigidBody {
    /// Creates a body at the origin with the default mass.
    pub fn new() -> Self {
        Self::default()
    }

    // Mass and inertia

    /// Zero for a fixed body.
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Returns the mass, or infinity for a fixed body
    pub fn mass(&self) -> f32 {
        if self.inverse_mass > 0.0 {
            1.0 / self.inverse_mass
        } else {
            f32::INFINITY
        }
    }

    /// True when the body has infinite mass and never moves.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Sets the mass. Callers are expected to pass a positive, finite value.
    pub fn set_mass(&mut self, mass: f32) {
        self.inverse_mass = 1.0 / mass;
    }

    /// Sets the inverse mass directly; zero pins the body.
    pub fn set_inverse_mass(&mut self, inverse_mass: f32) {
        self.inverse_mass = inverse_mass;
    }

    /// Inverse inertia tensor in body-local space.
    #[inline]
    pub fn inverse_inertia_tensor(&self) -> Mat3 {
        self.inverse_inertia_tensor
    }

    /// Inverse inertia tensor rotated into world space.
    #[inline]
    pub fn inverse_inertia_tensor_world(&self) -> Mat3 {
        self.inverse_inertia_tensor_world
    }

    /// Sets the local inertia tensor. A singular tensor is logged and kept as-is.
    pub fn set_inertia_tensor(&mut self, inertia: Mat3) {
        self.set_inverse_inertia_tensor(inertia.inverse());
    }

    /// Sets the local inverse inertia and rederives the world tensor.
    pub fn set_inverse_inertia_tensor(&mut self, inverse_inertia: Mat3) {
        self.inverse_inertia_tensor = inverse_inertia;
        self.calculate_derived_data();
    }

    // Kinematic state

    /// Center of mass in world space.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the body and rebuilds its transform.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.calculate_derived_data();
    }

    /// Unit quaternion rotating body-local into world space.
    #[inline]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Sets the orientation; the quaternion is normalized first.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation.normalize();
        self.calculate_derived_data();
    }

    /// Linear velocity of the center of mass.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Sets the linear velocity.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Angular velocity in the world frame.
    #[inline]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Sets the world-frame angular velocity, in radians per second.
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    /// Constant acceleration applied every step, normally gravity.
    #[inline]
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Replaces the constant acceleration.
    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    /// Fraction of linear velocity lost per second.
    #[inline]
    pub fn linear_damping(&self) -> f32 {
        self.linear_damping
    }

    /// Fraction of angular velocity lost per second.
    #[inline]
    pub fn angular_damping(&self) -> f32 {
        self.angular_damping
    }

    /// Sets both damping factors, each clamped to `[0, 1]`.
    pub fn set_damping(&mut self, linear: f32, angular: f32) {
        self.linear_damping = linear.clamp(0.0, 1.0);
        self.angular_damping = angular.clamp(0.0, 1.0);
    }

    // Forces

    /// Force accumulated since the last step.
    #[inline]
    pub fn force(&self) -> Vec3 {
        self.force
    }

    /// Torque accumulated since the last step.
    #[inline]
    pub fn torque(&self) -> Vec3 {
        self.torque
    }

    /// Adds a force through the center of mass
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Adds a force at a world-space point, which also produces torque.
    pub fn add_force_at(&mut self, force: Vec3, point: Vec3) {
        self.force += force;
        self.torque += (point - self.position).cross(force);
    }

    /// Adds a world-space torque.
    pub fn add_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Zeroes the accumulated force and torque.
    pub fn clear_accumulators(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    // Derived data

    /// Model matrix derived from position and orientation.
    #[inline]
    pub fn transform_matrix(&self) -> &Mat4 {
        &self.transform_matrix
    }

    /// The world transform as 16 column-major floats.
    pub fn transform_cols(&self) -> [f32; 16] {
        self.transform_matrix.to_cols_array()
    }

    /// Unit world-space direction of local axis `index` (0 = X, 1 = Y, 2 = Z).
    ///
    /// Out-of-range indices are logged and yield the zero vector.
    pub fn axis(&self, index: usize) -> Vec3 {
        if index > 2 {
            log::warn!("RigidBody::axis: index {index} out of range");
            return Vec3::ZERO;
        }
        let m = &self.transform_matrix.m;
        Vec3::new(m[index], m[index + 4], m[index + 8]).normalize()
    }

    /// Converts a body-local point to world space.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.transform_matrix.transform_point(local)
    }

    /// Converts a world-space point to body-local space.
    #[inline]
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.transform_matrix
            .rotation()
            .transform_transpose(world - self.position)
    }

    /// Velocity of the material point at `point` (world space)
    pub fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        self.velocity + self.rotation.cross(point - self.position)
    }

    /// Rebuilds the transform matrix and world inertia tensor.
    pub(super) fn calculate_derived_data(&mut self) {
        let rotation = Mat3::from_quat(self.orientation);
        self.transform_matrix = Mat4::from_rotation_translation(rotation, self.position);
        self.inverse_inertia_tensor_world =
            rotation * self.inverse_inertia_tensor * rotation.transpose();
    }
}

/// Description for creating a rigid body
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBodyDesc {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub rotation: Vec3,
    pub acceleration: Vec3,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            mass: DEFAULT_MASS,
            linear_damping: 0.01,  // keeps 99% of velocity per second
            angular_damping: 0.01,
        }
    }
}

impl RigidBodyDesc {
    /// Sets the initial position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the initial orientation.
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the initial linear velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the initial angular velocity.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the mass; zero or less builds a fixed body.
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Sets the linear and angular damping factors.
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Builds the body with a unit local inertia tensor; attach a shape to
    /// derive a real one. A non-positive mass builds a fixed body with
    /// zero inverse inertia.
    pub fn build(&self) -> RigidBody {
        let (inverse_mass, inverse_inertia) = if self.mass > 0.0 {
            (1.0 / self.mass, Mat3::IDENTITY)
        } else {
            (0.0, Mat3::ZERO)
        };
        let mut body = RigidBody {
            inverse_mass,
            inverse_inertia_tensor: inverse_inertia,
            inverse_inertia_tensor_world: inverse_inertia,
            position: self.position,
            orientation: self.orientation.normalize(),
            velocity: self.velocity,
            rotation: self.rotation,
            acceleration: self.acceleration,
            linear_damping: 0.0,
            angular_damping: 0.0,
            transform_matrix: Mat4::IDENTITY,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        };
        body.set_damping(self.linear_damping, self.angular_damping);
        body.calculate_derived_data();
        body
    }
}
