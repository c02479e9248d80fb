use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collision::{BodyId, Contact};
use crate::constraints::{ConstraintParams, ContactConstraint, SolverBody};
use crate::dynamics::RigidBody;

/// Configuration for the contact solver
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Passes over all contacts per step
    pub iteration_limit: usize,
    /// Fraction of the remaining penetration corrected per step
    pub baumgarte: f32,
    /// Penetration left alone to keep resting contacts quiet
    pub penetration_tolerance: f32,
    /// Closing speeds below this never bounce
    pub closing_speed_tolerance: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iteration_limit: 30,
            baumgarte: 0.1,
            penetration_tolerance: 0.0005,
            closing_speed_tolerance: 0.005,
        }
    }
}

/// Sequential impulse (projected Gauss-Seidel) contact resolver.
///
/// Each step starts cold: accumulated impulses are not carried over from
/// the previous step.
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    config: SolverConfig,
}

/// A prepared constraint and the solver-body slots it couples.
struct Prepared {
    contact: usize,
    one: usize,
    two: usize,
    constraint: ContactConstraint,
}

impl CollisionResolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Current iteration and stabilization settings.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Replaces the settings used by later calls to `resolve_collision`.
    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    /// Resolves this step's contacts by adjusting body velocities.
    ///
    /// Positions are left alone; penetration is corrected through the
    /// velocity bias. Accumulated impulses are written back to `contacts`.
    pub fn resolve_collision(
        &self,
        contacts: &mut [Contact],
        bodies: &mut BTreeMap<BodyId, RigidBody>,
        duration: f32,
    ) {
        if contacts.is_empty() {
            return;
        }

        let params = ConstraintParams {
            baumgarte: self.config.baumgarte,
            penetration_tolerance: self.config.penetration_tolerance,
            closing_speed_tolerance: self.config.closing_speed_tolerance,
            dt: duration,
        };

        // Slot 0 stands in for the ground.
        let mut solver_bodies = vec![SolverBody::FIXED];
        let mut slots: BTreeMap<BodyId, usize> = BTreeMap::new();
        let mut prepared = Vec::with_capacity(contacts.len());

        for (index, contact) in contacts.iter().enumerate() {
            let Some(one) = slot(contact.body1, bodies, &mut slots, &mut solver_bodies) else {
                continue;
            };
            let two = match contact.body2 {
                Some(id) => match slot(id, bodies, &mut slots, &mut solver_bodies) {
                    Some(two) => two,
                    None => continue,
                },
                None => 0,
            };
            if one == two {
                log::error!("contact couples body {} with itself", contact.body1);
                continue;
            }

            let (body_one, body_two) = (&solver_bodies[one], &solver_bodies[two]);
            // Nothing to do when neither side can move.
            if body_one.inverse_mass + body_two.inverse_mass <= 0.0 {
                continue;
            }

            prepared.push(Prepared {
                contact: index,
                one,
                two,
                constraint: ContactConstraint::new(contact, body_one, body_two, &params),
            });
        }

        for _ in 0..self.config.iteration_limit {
            for entry in prepared.iter_mut() {
                let (one, two) = get_two_mut(&mut solver_bodies, entry.one, entry.two);
                entry.constraint.solve_normal(one, two);
                entry.constraint.solve_friction(one, two);
            }
        }

        for entry in &prepared {
            entry.constraint.store_impulses(&mut contacts[entry.contact]);
        }

        for (id, index) in slots {
            let solved = &solver_bodies[index];
            if let Some(body) = bodies.get_mut(&id) {
                if !body.is_fixed() {
                    body.set_velocity(solved.velocity);
                    body.set_rotation(solved.rotation);
                }
            }
        }

        log::trace!(
            "resolved {} of {} contacts over {} bodies",
            prepared.len(),
            contacts.len(),
            solver_bodies.len() - 1
        );
    }
}

/// Returns the solver-body slot for `id`, creating it on first use.
fn slot(
    id: BodyId,
    bodies: &BTreeMap<BodyId, RigidBody>,
    slots: &mut BTreeMap<BodyId, usize>,
    solver_bodies: &mut Vec<SolverBody>,
) -> Option<usize> {
    if let Some(&index) = slots.get(&id) {
        return Some(index);
    }
    let Some(body) = bodies.get(&id) else {
        log::error!("contact refers to unknown body {id}");
        return None;
    };
    solver_bodies.push(SolverBody::from_body(body));
    let index = solver_bodies.len() - 1;
    slots.insert(id, index);
    Some(index)
}

/// Gets mutable references to two elements at different indices
fn get_two_mut<T>(slice: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = slice.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = slice.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Collider, CollisionDetector, PlaneCollider};
    use crate::dynamics::RigidBodyDesc;
    use crate::geometry::Shape;
    use crate::math::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn one_body(desc: RigidBodyDesc) -> BTreeMap<BodyId, RigidBody> {
        BTreeMap::from([(BodyId(1), desc.build())])
    }

    #[test]
    fn test_get_two_mut() {
        let mut values = [1, 2, 3, 4];
        let (a, b) = get_two_mut(&mut values, 3, 1);
        std::mem::swap(a, b);
        assert_eq!(values, [1, 4, 3, 2]);
    }

    #[test]
    fn test_resting_box_stops_sinking() {
        let cube = Shape::cuboid(Vec3::splat(0.5));
        let mut bodies = one_body(
            RigidBodyDesc::default()
                .with_position(Vec3::new(0.0, 0.49, 0.0))
                .with_velocity(Vec3::new(0.3, -1.0, 0.0)),
        );
        let colliders = BTreeMap::from([(BodyId(1), Collider::new(BodyId(1), cube))]);
        if let Some(body) = bodies.get_mut(&BodyId(1)) {
            body.set_inertia_tensor(cube.inertia_tensor(body.mass()));
        }

        let mut contacts = Vec::new();
        CollisionDetector::default().detect_collision(
            &mut contacts,
            &bodies,
            &colliders,
            &PlaneCollider::default(),
        );
        assert_eq!(contacts.len(), 4);

        CollisionResolver::default().resolve_collision(&mut contacts, &mut bodies, DT);

        let body = &bodies[&BodyId(1)];
        for contact in &contacts {
            let speed = body.velocity_at_point(contact.point1).dot(contact.normal);
            assert!(speed >= -1e-3, "still closing at {:?}: {speed}", contact.point1);
            assert!(contact.normal_impulse_sum >= 0.0);
            let friction = (contact.tangent_impulse_sum1.powi(2)
                + contact.tangent_impulse_sum2.powi(2))
            .sqrt();
            assert!(friction <= contact.friction * contact.normal_impulse_sum * 1.5 + 1e-4);
        }
        // Friction slowed the slide.
        assert!(body.velocity().x < 0.3);
    }

    #[test]
    fn test_fixed_bodies_are_not_touched() {
        let mut bodies = BTreeMap::from([
            (BodyId(1), RigidBodyDesc::default().with_mass(0.0).with_velocity(Vec3::X).build()),
            (
                BodyId(2),
                RigidBodyDesc::default()
                    .with_mass(0.0)
                    .with_position(Vec3::new(0.5, 0.0, 0.0))
                    .build(),
            ),
        ]);
        let before = bodies.clone();
        let mut contacts = vec![
            Contact::between(BodyId(1), BodyId(2), -Vec3::X, (Vec3::ZERO, Vec3::ZERO), 0.5),
            Contact::with_ground(BodyId(1), Vec3::Y, Vec3::ZERO, 0.1),
        ];

        CollisionResolver::default().resolve_collision(&mut contacts, &mut bodies, DT);

        assert_eq!(bodies, before);
        assert!(contacts.iter().all(|c| c.normal_impulse_sum == 0.0));
    }

    #[test]
    fn test_head_on_spheres_exchange_momentum() {
        let mut bodies = BTreeMap::from([
            (BodyId(1), RigidBodyDesc::default().with_velocity(Vec3::X).build()),
            (
                BodyId(2),
                RigidBodyDesc::default()
                    .with_position(Vec3::new(1.0, 0.0, 0.0))
                    .build(),
            ),
        ]);
        // Normal from body2 toward body1.
        let mut contacts = vec![Contact::between(
            BodyId(1),
            BodyId(2),
            -Vec3::X,
            (Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.5, 0.0, 0.0)),
            0.0,
        )
        .with_coefficients(1.0, 0.0)];

        CollisionResolver::default().resolve_collision(&mut contacts, &mut bodies, DT);

        // Equal masses, perfectly elastic.
        assert!(bodies[&BodyId(1)].velocity().x.abs() < 1e-4);
        assert!((bodies[&BodyId(2)].velocity().x - 1.0).abs() < 1e-4);
        let total = bodies[&BodyId(1)].velocity() + bodies[&BodyId(2)].velocity();
        assert!((total - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_unknown_body_is_skipped() {
        let mut bodies = one_body(RigidBodyDesc::default().with_velocity(-Vec3::Y));
        let mut contacts = vec![
            Contact::with_ground(BodyId(7), Vec3::Y, Vec3::ZERO, 0.1),
            Contact::with_ground(BodyId(1), Vec3::Y, Vec3::ZERO, 0.0),
        ];

        CollisionResolver::default().resolve_collision(&mut contacts, &mut bodies, DT);

        assert_eq!(contacts[0].normal_impulse_sum, 0.0);
        assert!(contacts[1].normal_impulse_sum > 0.0);
        assert!(bodies[&BodyId(1)].velocity().y.abs() < 1e-4);
    }

    #[test]
    fn test_non_finite_velocity_does_not_spread() {
        let mut bodies = one_body(
            RigidBodyDesc::default().with_velocity(Vec3::new(0.0, f32::NAN, 0.0)),
        );
        let mut contacts = vec![Contact::with_ground(BodyId(1), Vec3::Y, Vec3::ZERO, 0.0)];

        CollisionResolver::default().resolve_collision(&mut contacts, &mut bodies, DT);

        assert_eq!(contacts[0].normal_impulse_sum, 0.0);
        assert_eq!(bodies[&BodyId(1)].rotation(), Vec3::ZERO);
    }
}
