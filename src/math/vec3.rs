use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 3D vector with f32 components.
///
/// Positions, velocities, forces, normals and half-extents all use this type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Zero vector (0, 0, 0)
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// All ones (1, 1, 1)
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Unit vector along X axis (1, 0, 0)
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit vector along Y axis (0, 1, 0)
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit vector along Z axis (0, 0, 1)
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a new Vec3 from components
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a Vec3 with all components set to the same value
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared magnitude; cheaper than [`Vec3::length`] for comparisons.
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a unit-length copy, or the zero vector if `self` is (nearly) zero.
    #[inline]
    pub fn normalize(self) -> Self {
        self.try_normalize().unwrap_or(Self::ZERO)
    }

    /// Normalizes in place. A (nearly) zero vector is left untouched.
    #[inline]
    pub fn normalize_mut(&mut self) {
        if let Some(n) = self.try_normalize() {
            *self = n;
        }
    }

    /// Attempts to normalize, returning None if the vector is too small
    #[inline]
    pub fn try_normalize(self) -> Option<Self> {
        let len_sq = self.length_squared();
        if len_sq > 1e-10 {
            Some(self / len_sq.sqrt())
        } else {
            None
        }
    }

    /// `self + v * scale`, the workhorse of the integrator.
    #[inline]
    pub fn add_scaled(self, v: Self, scale: f32) -> Self {
        Self::new(
            self.x + v.x * scale,
            self.y + v.y * scale,
            self.z + v.z * scale,
        )
    }

    /// Component-wise multiplication
    #[inline]
    pub fn component_mul(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Component-wise clamp to `[-bound, bound]`.
    #[inline]
    pub fn clamp_symmetric(self, bound: Self) -> Self {
        Self::new(
            self.x.clamp(-bound.x, bound.x),
            self.y.clamp(-bound.y, bound.y),
            self.z.clamp(-bound.z, bound.z),
        )
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        (other - self).length_squared()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;

    #[inline]
    fn mul(self, vec: Vec3) -> Vec3 {
        vec * self
    }
}

impl MulAssign<f32> for Vec3 {
    #[inline]
    fn mul_assign(&mut self, scalar: f32) {
        *self = *self * scalar;
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn div(self, scalar: f32) -> Self {
        self * (1.0 / scalar)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Index<usize> for Vec3 {
    type Output = f32;

    #[inline]
    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index out of bounds: {}", index),
        }
    }
}

impl From<[f32; 3]> for Vec3 {
    #[inline]
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vec3> for [f32; 3] {
    #[inline]
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    #[test]
    fn test_dot_and_cross() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!(approx_eq(a.dot(b), 32.0));

        assert!(vec3_approx_eq(Vec3::X.cross(Vec3::Y), Vec3::Z));
        assert!(vec3_approx_eq(Vec3::Y.cross(Vec3::X), -Vec3::Z));
    }

    #[test]
    fn test_normalize() {
        let n = Vec3::new(3.0, 4.0, 0.0).normalize();
        assert!(vec3_approx_eq(n, Vec3::new(0.6, 0.8, 0.0)));
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        assert_eq!(Vec3::ZERO.try_normalize(), None);
    }

    #[test]
    fn test_normalize_mut_leaves_zero_alone() {
        let mut v = Vec3::new(0.0, 0.0, 2.0);
        v.normalize_mut();
        assert!(vec3_approx_eq(v, Vec3::Z));

        let mut zero = Vec3::ZERO;
        zero.normalize_mut();
        assert_eq!(zero, Vec3::ZERO);
    }

    #[test]
    fn test_add_scaled() {
        let v = Vec3::new(1.0, 1.0, 1.0).add_scaled(Vec3::new(0.0, -9.0, 2.0), 0.5);
        assert!(vec3_approx_eq(v, Vec3::new(1.0, -3.5, 2.0)));
    }

    #[test]
    fn test_clamp_symmetric() {
        let half = Vec3::new(1.0, 2.0, 3.0);
        let clamped = Vec3::new(5.0, -5.0, 0.5).clamp_symmetric(half);
        assert!(vec3_approx_eq(clamped, Vec3::new(1.0, -2.0, 0.5)));
    }

    #[test]
    fn test_operators() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert!(vec3_approx_eq(a + b, Vec3::new(5.0, 7.0, 9.0)));
        assert!(vec3_approx_eq(b - a, Vec3::new(3.0, 3.0, 3.0)));
        assert!(vec3_approx_eq(2.0 * a, Vec3::new(2.0, 4.0, 6.0)));
        assert!(vec3_approx_eq(a / 2.0, Vec3::new(0.5, 1.0, 1.5)));
        assert_eq!(a[2], 3.0);
    }
}
