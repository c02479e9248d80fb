use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collision::{
    BodyId, Collider, CollisionDetector, Contact, ContactInfo, DetectorConfig, PlaneCollider,
    NO_HIT,
};
use crate::dynamics::{RigidBody, RigidBodyDesc, DEFAULT_MASS};
use crate::error::SimulationError;
use crate::geometry::Shape;
use crate::math::{Mat3, Quat, Vec3};
use crate::solver::{CollisionResolver, SolverConfig};

/// Configuration for the simulator
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulatorConfig {
    /// Gravity magnitude, pulling along -Y
    pub gravity: f32,
    /// Mass restored when a body is released with `set_fixed(id, false)`
    pub default_mass: f32,
    /// The static ground half-space
    pub ground: PlaneCollider,
    /// Restitution and friction stamped onto contacts
    pub detector: DetectorConfig,
    pub solver: SolverConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            default_mass: DEFAULT_MASS,
            ground: PlaneCollider::default(),
            detector: DetectorConfig::default(),
            solver: SolverConfig::default(),
        }
    }
}

/// Owns every body and collider and steps them through
/// integrate, detect, report and resolve.
///
/// Bodies and colliders are keyed by a caller-chosen [`BodyId`]; an object
/// is a body plus a collider sharing one id. Failed operations are logged,
/// return an error, and leave the simulator untouched.
#[derive(Debug, Clone)]
pub struct Simulator {
    bodies: BTreeMap<BodyId, RigidBody>,
    colliders: BTreeMap<BodyId, Collider>,
    ground: PlaneCollider,
    /// Contacts of the step in progress; empty between steps
    contacts: Vec<Contact>,
    detector: CollisionDetector,
    resolver: CollisionResolver,
    gravity: f32,
    default_mass: f32,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl Simulator {
    /// Creates an empty simulator. The ground normal is renormalized,
    /// falling back to +Y when it has no length.
    pub fn new(config: SimulatorConfig) -> Self {
        let ground = match config.ground.normal.try_normalize() {
            Some(normal) => PlaneCollider::new(normal, config.ground.offset),
            None => {
                log::warn!("ground normal {:?} has no length, using +Y", config.ground.normal);
                PlaneCollider {
                    offset: config.ground.offset,
                    ..PlaneCollider::default()
                }
            }
        };
        Self {
            bodies: BTreeMap::new(),
            colliders: BTreeMap::new(),
            ground,
            contacts: Vec::new(),
            detector: CollisionDetector::new(config.detector),
            resolver: CollisionResolver::new(config.solver),
            gravity: config.gravity,
            default_mass: config.default_mass,
        }
    }

    /// Advances the simulation by `duration` seconds.
    ///
    /// `contact_info` is cleared and refilled with one record per contact
    /// point found this step. A non-positive or non-finite duration is
    /// logged and skipped.
    pub fn simulate(&mut self, duration: f32, contact_info: &mut Vec<ContactInfo>) {
        contact_info.clear();
        if !(duration > 0.0 && duration.is_finite()) {
            log::warn!("ignoring simulation step of {duration}s");
            return;
        }

        for body in self.bodies.values_mut() {
            body.integrate(duration);
        }

        self.detector.detect_collision(
            &mut self.contacts,
            &self.bodies,
            &self.colliders,
            &self.ground,
        );
        contact_info.extend(self.contacts.iter().flat_map(Contact::info));

        self.resolver
            .resolve_collision(&mut self.contacts, &mut self.bodies, duration);

        log::trace!(
            "step {duration}s: {} bodies, {} contacts",
            self.bodies.len(),
            self.contacts.len()
        );
        self.contacts.clear();
    }

    // Objects

    /// Adds a body. Its acceleration is replaced by the current gravity.
    pub fn add_rigid_body(&mut self, id: BodyId, desc: RigidBodyDesc) -> Result<(), SimulationError> {
        if self.bodies.contains_key(&id) {
            return Err(report(SimulationError::DuplicateObject(id)));
        }
        let mut body = desc.build();
        body.set_acceleration(self.gravity_acceleration());
        self.bodies.insert(id, body);
        log::debug!("added rigid body {id}");
        Ok(())
    }

    /// Attaches a collider to the body with the same id and derives the
    /// body's inertia from the shape.
    pub fn add_collider(&mut self, id: BodyId, shape: Shape) -> Result<(), SimulationError> {
        if self.colliders.contains_key(&id) {
            return Err(report(SimulationError::DuplicateObject(id)));
        }
        let Some(body) = self.bodies.get_mut(&id) else {
            return Err(report(SimulationError::MissingBody(id)));
        };
        update_inertia(body, Some(&shape));
        self.colliders.insert(id, Collider::new(id, shape));
        log::debug!("added {} collider {id}", shape.shape_type());
        Ok(())
    }

    /// Adds a body and its collider together, or neither.
    pub fn add_physics_object(
        &mut self,
        id: BodyId,
        desc: RigidBodyDesc,
        shape: Shape,
    ) -> Result<(), SimulationError> {
        if self.bodies.contains_key(&id) || self.colliders.contains_key(&id) {
            return Err(report(SimulationError::DuplicateObject(id)));
        }
        self.add_rigid_body(id, desc)?;
        self.add_collider(id, shape)
    }

    /// Removes the body and collider with this id.
    pub fn remove_physics_object(&mut self, id: BodyId) -> Result<(), SimulationError> {
        let body = self.bodies.remove(&id);
        let collider = self.colliders.remove(&id);
        if body.is_none() && collider.is_none() {
            return Err(report(SimulationError::UnknownObject(id)));
        }
        log::debug!("removed physics object {id}");
        Ok(())
    }

    /// Removes every object.
    pub fn clear(&mut self) {
        log::debug!("clearing {} physics objects", self.bodies.len());
        self.bodies.clear();
        self.colliders.clear();
        self.contacts.clear();
    }

    /// The body with this id, if any.
    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(&id)
    }

    /// Mutable access to a body, e.g. to apply forces before a step.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(&id)
    }

    /// The collider with this id, if any.
    pub fn collider(&self, id: BodyId) -> Option<&Collider> {
        self.colliders.get(&id)
    }

    /// Iterates over all bodies in id order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> + '_ {
        self.bodies.iter().map(|(&id, body)| (id, body))
    }

    /// Number of rigid bodies, with or without colliders.
    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// The model matrix of a body as 16 column-major floats.
    pub fn transform_cols(&self, id: BodyId) -> Option<[f32; 16]> {
        self.bodies.get(&id).map(RigidBody::transform_cols)
    }

    // Picking

    /// Distance along the ray to object `id`, or [`NO_HIT`] when the ray
    /// misses or the object does not exist.
    pub fn calc_distance_between_ray_and_object(
        &self,
        origin: Vec3,
        direction: Vec3,
        id: BodyId,
    ) -> f32 {
        let Some(direction) = direction.try_normalize() else {
            log::warn!("ray direction {direction:?} has no length");
            return NO_HIT;
        };
        let (Some(collider), Some(body)) = (self.colliders.get(&id), self.bodies.get(&id)) else {
            log::error!("{}", SimulationError::UnknownObject(id));
            return NO_HIT;
        };
        CollisionDetector::ray_and_collider(origin, direction, &collider.bind(body))
    }

    /// The nearest object hit by the ray, with its distance.
    pub fn pick(&self, origin: Vec3, direction: Vec3) -> Option<(BodyId, f32)> {
        let direction = direction.try_normalize()?;
        self.colliders
            .values()
            .filter_map(|collider| {
                let body = self.bodies.get(&collider.id)?;
                let distance =
                    CollisionDetector::ray_and_collider(origin, direction, &collider.bind(body));
                (distance >= 0.0).then_some((collider.id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    // Global settings

    /// Gravity magnitude along -Y.
    #[inline]
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Sets the gravity magnitude and applies it to every existing body.
    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
        let acceleration = self.gravity_acceleration();
        for body in self.bodies.values_mut() {
            body.set_acceleration(acceleration);
        }
    }

    /// The ground half-space.
    pub fn ground(&self) -> &PlaneCollider {
        &self.ground
    }

    /// Restitution and friction currently applied to new contacts.
    pub fn detector_config(&self) -> &DetectorConfig {
        &self.detector.config
    }

    /// Restitution for contacts against the ground.
    pub fn set_ground_restitution(&mut self, restitution: f32) {
        self.detector.config.ground_restitution = restitution;
    }

    /// Restitution for contacts between two objects.
    pub fn set_object_restitution(&mut self, restitution: f32) {
        self.detector.config.object_restitution = restitution;
    }

    /// Coulomb friction for every contact. Negative or non-finite values
    /// are rejected and the previous coefficient is kept.
    pub fn set_friction(&mut self, friction: f32) -> Result<(), SimulationError> {
        if !(friction >= 0.0 && friction.is_finite()) {
            return Err(report(SimulationError::InvalidFriction(friction)));
        }
        self.detector.config.friction = friction;
        Ok(())
    }

    /// Iteration count and stabilization settings of the resolver.
    pub fn solver_config(&self) -> &SolverConfig {
        self.resolver.config()
    }

    /// Replaces the resolver settings; takes effect on the next step.
    pub fn set_solver_config(&mut self, config: SolverConfig) {
        self.resolver.set_config(config);
    }

    // Per-object setters

    /// Sets the mass and rederives inertia from the collider.
    pub fn set_mass(&mut self, id: BodyId, mass: f32) -> Result<(), SimulationError> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(report(SimulationError::InvalidMass(mass)));
        }
        let shape = self.colliders.get(&id).map(|c| c.shape);
        let body = self.body_entry(id)?;
        body.set_mass(mass);
        update_inertia(body, shape.as_ref());
        Ok(())
    }

    /// Moves a body without changing its velocity.
    pub fn set_position(&mut self, id: BodyId, position: Vec3) -> Result<(), SimulationError> {
        self.body_entry(id)?.set_position(position);
        Ok(())
    }

    /// Sets the linear velocity of a body.
    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec3) -> Result<(), SimulationError> {
        self.body_entry(id)?.set_velocity(velocity);
        Ok(())
    }

    /// Sets the angular velocity of a body, in radians per second.
    pub fn set_rotation(&mut self, id: BodyId, rotation: Vec3) -> Result<(), SimulationError> {
        self.body_entry(id)?.set_rotation(rotation);
        Ok(())
    }

    /// Replaces the dimensions of an object's collider.
    ///
    /// The new shape must be the same kind as the old one.
    pub fn set_geometric_data(&mut self, id: BodyId, shape: Shape) -> Result<(), SimulationError> {
        let Some(collider) = self.colliders.get_mut(&id) else {
            return Err(report(SimulationError::UnknownObject(id)));
        };
        let (expected, found) = (collider.shape.shape_type(), shape.shape_type());
        if expected != found {
            return Err(report(SimulationError::ShapeMismatch {
                id,
                expected,
                found,
            }));
        }
        collider.shape = shape;
        if let Some(body) = self.bodies.get_mut(&id) {
            update_inertia(body, Some(&shape));
        }
        Ok(())
    }

    /// Pins a body in place, or releases it with the default mass.
    pub fn set_fixed(&mut self, id: BodyId, fixed: bool) -> Result<(), SimulationError> {
        let shape = self.colliders.get(&id).map(|c| c.shape);
        let default_mass = self.default_mass;
        let body = self.body_entry(id)?;
        if fixed {
            body.set_inverse_mass(0.0);
            body.set_inverse_inertia_tensor(Mat3::ZERO);
            body.set_velocity(Vec3::ZERO);
            body.set_rotation(Vec3::ZERO);
        } else {
            body.set_mass(default_mass);
            update_inertia(body, shape.as_ref());
        }
        Ok(())
    }

    /// Rotates a body about a world axis by `degrees`.
    pub fn rotate(&mut self, id: BodyId, axis: Vec3, degrees: f32) -> Result<(), SimulationError> {
        let body = self.body_entry(id)?;
        let Some(axis) = axis.try_normalize() else {
            log::warn!("cannot rotate {id} about a zero axis");
            return Ok(());
        };
        let delta = Quat::from_axis_angle(axis, degrees.to_radians());
        body.set_orientation(delta * body.orientation());
        Ok(())
    }

    /// Restores the identity orientation and stops any spin.
    pub fn reset_orientation(&mut self, id: BodyId) -> Result<(), SimulationError> {
        let body = self.body_entry(id)?;
        body.set_orientation(Quat::IDENTITY);
        body.set_rotation(Vec3::ZERO);
        Ok(())
    }

    fn body_entry(&mut self, id: BodyId) -> Result<&mut RigidBody, SimulationError> {
        self.bodies
            .get_mut(&id)
            .ok_or_else(|| report(SimulationError::UnknownObject(id)))
    }

    #[inline]
    fn gravity_acceleration(&self) -> Vec3 {
        Vec3::new(0.0, -self.gravity, 0.0)
    }
}

/// Derives a movable body's inertia from its shape; fixed bodies keep zero.
fn update_inertia(body: &mut RigidBody, shape: Option<&Shape>) {
    if body.is_fixed() {
        return;
    }
    match shape {
        Some(shape) => body.set_inertia_tensor(shape.inertia_tensor(body.mass())),
        None => body.set_inverse_inertia_tensor(Mat3::IDENTITY),
    }
}

fn report(error: SimulationError) -> SimulationError {
    log::error!("{error}");
    error
}
