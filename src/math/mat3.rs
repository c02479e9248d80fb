use std::ops::{Add, Mul};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::quat::Quat;
use super::vec3::Vec3;

/// A 3x3 matrix stored in row-major order.
///
/// Used for rotation matrices and inertia tensors. `m[r * 3 + c]` is the
/// element at row `r`, column `c`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mat3 {
    pub m: [f32; 9],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const ZERO: Self = Self { m: [0.0; 9] };

    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Creates a matrix from row vectors
    #[inline]
    pub const fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self {
            m: [r0.x, r0.y, r0.z, r1.x, r1.y, r1.z, r2.x, r2.y, r2.z],
        }
    }

    /// Creates a diagonal matrix
    #[inline]
    pub const fn from_diagonal(d: Vec3) -> Self {
        Self {
            m: [d.x, 0.0, 0.0, 0.0, d.y, 0.0, 0.0, 0.0, d.z],
        }
    }

    /// Rotation matrix for a unit quaternion.
    pub fn from_quat(q: Quat) -> Self {
        let (w, x, y, z) = (q.w, q.x, q.y, q.z);
        Self {
            m: [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
            ],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row * 3 + col]
    }

    #[inline]
    pub fn row(&self, index: usize) -> Vec3 {
        Vec3::new(
            self.m[index * 3],
            self.m[index * 3 + 1],
            self.m[index * 3 + 2],
        )
    }

    #[inline]
    pub fn col(&self, index: usize) -> Vec3 {
        Vec3::new(self.m[index], self.m[index + 3], self.m[index + 6])
    }

    #[inline]
    pub fn transpose(self) -> Self {
        let m = &self.m;
        Self {
            m: [m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]],
        }
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    /// Returns the inverse of the matrix, or None if the determinant is zero.
    pub fn try_inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        let m = &self.m;
        Some(Self {
            m: [
                (m[4] * m[8] - m[5] * m[7]) * inv_det,
                (m[2] * m[7] - m[1] * m[8]) * inv_det,
                (m[1] * m[5] - m[2] * m[4]) * inv_det,
                (m[5] * m[6] - m[3] * m[8]) * inv_det,
                (m[0] * m[8] - m[2] * m[6]) * inv_det,
                (m[2] * m[3] - m[0] * m[5]) * inv_det,
                (m[3] * m[7] - m[4] * m[6]) * inv_det,
                (m[1] * m[6] - m[0] * m[7]) * inv_det,
                (m[0] * m[4] - m[1] * m[3]) * inv_det,
            ],
        })
    }

    /// Returns the inverse of the matrix.
    ///
    /// A singular matrix is logged and returned unchanged.
    pub fn inverse(self) -> Self {
        self.try_inverse().unwrap_or_else(|| {
            log::warn!("Mat3::inverse: determinant is zero, returning matrix unchanged");
            self
        })
    }

    /// `self * v` for a column vector `v`.
    #[inline]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
        )
    }

    /// `selfᵀ * v`, without building the transpose.
    #[inline]
    pub fn transform_transpose(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.col(0).dot(v), self.col(1).dot(v), self.col(2).dot(v))
    }
}

impl Mul for Mat3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut m = [0.0; 9];
        for r in 0..3 {
            for c in 0..3 {
                m[r * 3 + c] = self.row(r).dot(rhs.col(c));
            }
        }
        Self { m }
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        self.transform(v)
    }
}

impl Add for Mat3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut m = self.m;
        for (a, b) in m.iter_mut().zip(rhs.m) {
            *a += b;
        }
        Self { m }
    }
}
