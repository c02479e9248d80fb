use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collision::{BodyId, BoundCollider, Collider, Contact, PlaneCollider};
use crate::dynamics::RigidBody;

/// Coefficients stamped onto every contact the detector creates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Coulomb friction for every contact
    pub friction: f32,
    /// Restitution for body-body contacts
    pub object_restitution: f32,
    /// Restitution for body-ground contacts
    pub ground_restitution: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            friction: 0.6,
            object_restitution: 0.3,
            ground_restitution: 0.2,
        }
    }
}

/// Narrow-phase collision detection between spheres, boxes and the ground.
///
/// Every pairwise test appends at most its own contacts to the sink and
/// returns whether it appended anything.
#[derive(Debug, Clone, Default)]
pub struct CollisionDetector {
    pub config: DetectorConfig,
}

impl CollisionDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Tests every collider pair once, then every collider against the ground.
    pub fn detect_collision(
        &self,
        contacts: &mut Vec<Contact>,
        bodies: &BTreeMap<BodyId, RigidBody>,
        colliders: &BTreeMap<BodyId, Collider>,
        ground: &PlaneCollider,
    ) {
        let bound: Vec<BoundCollider<'_>> = colliders
            .values()
            .filter_map(|collider| match bodies.get(&collider.id) {
                Some(body) => Some(collider.bind(body)),
                None => {
                    log::error!("collider {} has no rigid body", collider.id);
                    None
                }
            })
            .collect();

        for (i, first) in bound.iter().enumerate() {
            for second in &bound[i + 1..] {
                self.collide(contacts, first, second);
            }
        }
        for collider in &bound {
            self.collide_with_plane(contacts, collider, ground);
        }
    }

    /// Dispatches a body-body test on the two shape kinds.
    ///
    /// Sphere-box pairs are always tested with the sphere as body1.
    pub fn collide(
        &self,
        contacts: &mut Vec<Contact>,
        first: &BoundCollider<'_>,
        second: &BoundCollider<'_>,
    ) -> bool {
        match (first, second) {
            (BoundCollider::Sphere(a), BoundCollider::Sphere(b)) => {
                self.sphere_and_sphere(contacts, a, b)
            }
            (BoundCollider::Sphere(s), BoundCollider::Box(b))
            | (BoundCollider::Box(b), BoundCollider::Sphere(s)) => {
                self.sphere_and_box(contacts, s, b)
            }
            (BoundCollider::Box(a), BoundCollider::Box(b)) => self.box_and_box(contacts, a, b),
        }
    }

    /// Tests one collider against the ground. Ground contacts carry no body2.
    pub fn collide_with_plane(
        &self,
        contacts: &mut Vec<Contact>,
        collider: &BoundCollider<'_>,
        plane: &PlaneCollider,
    ) -> bool {
        match collider {
            BoundCollider::Sphere(s) => self.sphere_and_plane(contacts, s, plane),
            BoundCollider::Box(b) => self.box_and_plane(contacts, b, plane),
        }
    }

    pub(crate) fn object_contact(&self, contact: Contact) -> Contact {
        contact.with_coefficients(self.config.object_restitution, self.config.friction)
    }

    pub(crate) fn ground_contact(&self, contact: Contact) -> Contact {
        contact.with_coefficients(self.config.ground_restitution, self.config.friction)
    }
}
