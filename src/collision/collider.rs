#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collision::BodyId;
use crate::dynamics::RigidBody;
use crate::geometry::{box_vertices, Shape};
use crate::math::Vec3;

/// A collider as stored by the simulator: the shape of the body with the same id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub id: BodyId,
    pub shape: Shape,
}

impl Collider {
    pub fn new(id: BodyId, shape: Shape) -> Self {
        Self { id, shape }
    }

    /// Pairs the collider with its body for a round of queries.
    pub fn bind<'a>(&self, body: &'a RigidBody) -> BoundCollider<'a> {
        match self.shape {
            Shape::Sphere { radius } => BoundCollider::Sphere(SphereCollider {
                id: self.id,
                body,
                radius,
            }),
            Shape::Box { half_extents } => BoundCollider::Box(BoxCollider {
                id: self.id,
                body,
                half_extents,
            }),
        }
    }
}

/// A collider borrowed together with the body it is attached to.
#[derive(Debug, Clone, Copy)]
pub enum BoundCollider<'a> {
    Sphere(SphereCollider<'a>),
    Box(BoxCollider<'a>),
}

impl BoundCollider<'_> {
    pub fn id(&self) -> BodyId {
        match self {
            BoundCollider::Sphere(s) => s.id,
            BoundCollider::Box(b) => b.id,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SphereCollider<'a> {
    pub id: BodyId,
    pub body: &'a RigidBody,
    pub radius: f32,
}

impl SphereCollider<'_> {
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.body.position()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BoxCollider<'a> {
    pub id: BodyId,
    pub body: &'a RigidBody,
    pub half_extents: Vec3,
}

impl BoxCollider<'_> {
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.body.position()
    }

    /// World direction of the box's local axis `index`.
    #[inline]
    pub fn axis(&self, index: usize) -> Vec3 {
        self.body.axis(index)
    }

    /// Half-extent projected onto `axis`: the box's "radius" along it.
    pub fn project_onto(&self, axis: Vec3) -> f32 {
        (0..3)
            .map(|i| (self.half_extents[i] * self.axis(i).dot(axis)).abs())
            .sum()
    }

    /// The eight corners in world space.
    pub fn world_vertices(&self) -> [Vec3; 8] {
        box_vertices(self.half_extents).map(|v| self.body.to_world(v))
    }
}

/// The static ground: the half-space `normal · p <= offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaneCollider {
    /// Unit normal pointing out of the solid side
    pub normal: Vec3,
    pub offset: f32,
}

impl Default for PlaneCollider {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            offset: 0.0,
        }
    }
}

impl PlaneCollider {
    /// A plane with `normal` normalized and `offset` measured along it.
    pub fn new(normal: Vec3, offset: f32) -> Self {
        Self {
            normal: normal.normalize(),
            offset,
        }
    }

    /// Positive above the plane, negative below.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.offset
    }
}
