use std::ops::{Add, Mul, MulAssign};

use super::vec3::Vec3;

/// A quaternion representing an orientation in 3D space.
///
/// `w` is the scalar part. Incremental updates do not renormalize; call
/// [`Quat::normalize`] after integrating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Pure quaternion `(0, v)`.
    #[inline]
    const fn pure(v: Vec3) -> Self {
        Self::new(0.0, v.x, v.y, v.z)
    }

    /// Creates a quaternion from a rotation axis and angle (in radians)
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        let axis = axis.normalize();
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns a unit quaternion. A degenerate quaternion becomes the identity.
    pub fn normalize(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq <= 1e-10 || !len_sq.is_finite() {
            return Self::IDENTITY;
        }
        let inv_len = 1.0 / len_sq.sqrt();
        Self::new(
            self.w * inv_len,
            self.x * inv_len,
            self.y * inv_len,
            self.z * inv_len,
        )
    }

    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Rotates a vector by this (unit) quaternion.
    pub fn rotate_vec(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let uv = qv.cross(v);
        let uuv = qv.cross(uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Composes this orientation with the body-frame rotation `(0, v)`.
    pub fn rotate_by_vector(self, v: Vec3) -> Self {
        self * Self::pure(v)
    }

    /// First-order update by the world-frame angular velocity `v` over `scale`:
    /// `q + (0, v * scale) * q`.
    ///
    /// Pass `dt / 2` as `scale` to integrate an angular velocity over `dt`.
    pub fn rotate_by_scaled_vector(self, v: Vec3, scale: f32) -> Self {
        self + Self::pure(v * scale) * self
    }
}

impl Add for Quat {
    type Output = Self;

    #[inline]
    fn add(self, o: Self) -> Self {
        Self::new(self.w + o.w, self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Mul for Quat {
    type Output = Self;

    /// Hamilton product; `a * b` applies `b` first, then `a`.
    #[inline]
    fn mul(self, o: Self) -> Self {
        Self::new(
            self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
            self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
        )
    }
}

impl MulAssign for Quat {
    #[inline]
    fn mul_assign(&mut self, o: Self) {
        *self = *self * o;
    }
}
