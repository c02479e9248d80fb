use std::fmt;

use crate::math::Vec3;

/// Identifier shared by a rigid body and its collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

impl BodyId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for BodyId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A single contact produced by narrow-phase detection.
///
/// Lives for one simulation step only. The normal points from `body2` (or
/// the ground plane when `body2` is `None`) toward `body1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body1: BodyId,
    /// `None` for contacts against the static ground
    pub body2: Option<BodyId>,
    pub normal: Vec3,
    /// Contact point on body1 (world space)
    pub point1: Vec3,
    /// Contact point on body2 (world space); absent for ground contacts
    pub point2: Option<Vec3>,
    /// Overlap depth at creation, never negative
    pub penetration: f32,
    pub restitution: f32,
    pub friction: f32,

    // Accumulated impulses, clamped across solver iterations.
    pub normal_impulse_sum: f32,
    pub tangent_impulse_sum1: f32,
    pub tangent_impulse_sum2: f32,
}

impl Contact {
    /// Creates a contact against another body.
    pub fn between(
        body1: BodyId,
        body2: BodyId,
        normal: Vec3,
        points: (Vec3, Vec3),
        penetration: f32,
    ) -> Self {
        Self {
            body2: Some(body2),
            point2: Some(points.1),
            ..Self::with_ground(body1, normal, points.0, penetration)
        }
    }

    /// Creates a contact against the static ground.
    pub fn with_ground(body1: BodyId, normal: Vec3, point: Vec3, penetration: f32) -> Self {
        Self {
            body1,
            body2: None,
            normal,
            point1: point,
            point2: None,
            penetration: penetration.max(0.0),
            restitution: 0.0,
            friction: 0.0,
            normal_impulse_sum: 0.0,
            tangent_impulse_sum1: 0.0,
            tangent_impulse_sum2: 0.0,
        }
    }

    pub fn with_coefficients(mut self, restitution: f32, friction: f32) -> Self {
        self.restitution = restitution;
        self.friction = friction;
        self
    }

    /// One report record per contact point.
    pub fn info(&self) -> impl Iterator<Item = ContactInfo> + '_ {
        std::iter::once(self.point1)
            .chain(self.point2)
            .map(move |point| ContactInfo {
                point,
                normal: self.normal,
            })
    }
}

/// A contact point and normal handed to the caller for debug drawing.
///
/// Only valid for the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactInfo {
    pub point: Vec3,
    pub normal: Vec3,
}
