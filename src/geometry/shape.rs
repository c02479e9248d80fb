use std::fmt;

use crate::math::{Mat3, Vec3};

/// The type of collision shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Sphere,
    Box,
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeType::Sphere => f.write_str("sphere"),
            ShapeType::Box => f.write_str("box"),
        }
    }
}

/// Geometry of a body-bound collider.
///
/// Also serves as the payload when a body's dimensions are edited: the
/// variant must match the collider it replaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

impl Shape {
    #[inline]
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Creates a box shape from half-extents
    #[inline]
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box { half_extents }
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Sphere { .. } => ShapeType::Sphere,
            Shape::Box { .. } => ShapeType::Box,
        }
    }

    /// Local inertia tensor of a solid shape with the given mass.
    ///
    /// Sphere: `2/5 m r²`. Box with half-extents `h`: `m/3 (h_y² + h_z²)` and
    /// so on for the other two axes.
    pub fn inertia_tensor(&self, mass: f32) -> Mat3 {
        match *self {
            Shape::Sphere { radius } => {
                Mat3::from_diagonal(Vec3::splat(0.4 * mass * radius * radius))
            }
            Shape::Box { half_extents: h } => {
                let (x2, y2, z2) = (h.x * h.x, h.y * h.y, h.z * h.z);
                let k = mass / 3.0;
                Mat3::from_diagonal(Vec3::new(k * (y2 + z2), k * (x2 + z2), k * (x2 + y2)))
            }
        }
    }
}

/// The eight corners of a box in local space.
pub fn box_vertices(half_extents: Vec3) -> [Vec3; 8] {
    let h = half_extents;
    [
        Vec3::new(-h.x, -h.y, -h.z),
        Vec3::new(h.x, -h.y, -h.z),
        Vec3::new(-h.x, h.y, -h.z),
        Vec3::new(h.x, h.y, -h.z),
        Vec3::new(-h.x, -h.y, h.z),
        Vec3::new(h.x, -h.y, h.z),
        Vec3::new(-h.x, h.y, h.z),
        Vec3::new(h.x, h.y, h.z),
    ]
}
