use std::ops::Mul;

use super::mat3::Mat3;
use super::vec3::Vec3;

/// A 4x4 affine transform stored in row-major order.
///
/// Points are column vectors, so the translation lives in the last column
/// (`m[3]`, `m[7]`, `m[11]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Builds `[R | t]` from a rotation and a translation.
    pub fn from_rotation_translation(rotation: Mat3, translation: Vec3) -> Self {
        let r = &rotation.m;
        Self {
            m: [
                r[0], r[1], r[2], translation.x, //
                r[3], r[4], r[5], translation.y, //
                r[6], r[7], r[8], translation.z, //
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row * 4 + col]
    }

    /// Upper-left 3x3 block.
    pub fn rotation(&self) -> Mat3 {
        let m = &self.m;
        Mat3 {
            m: [m[0], m[1], m[2], m[4], m[5], m[6], m[8], m[9], m[10]],
        }
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[3], self.m[7], self.m[11])
    }

    /// Transforms a point (w = 1).
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.transform_direction(p) + self.translation()
    }

    /// Transforms a direction (w = 0); translation is ignored.
    #[inline]
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0] * d.x + m[1] * d.y + m[2] * d.z,
            m[4] * d.x + m[5] * d.y + m[6] * d.z,
            m[8] * d.x + m[9] * d.y + m[10] * d.z,
        )
    }

    pub fn transpose(&self) -> Self {
        let mut m = [0.0; 16];
        for r in 0..4 {
            for c in 0..4 {
                m[c * 4 + r] = self.m[r * 4 + c];
            }
        }
        Self { m }
    }

    /// Column-major copy, ready to upload as a model matrix.
    pub fn to_cols_array(&self) -> [f32; 16] {
        self.transpose().m
    }

    /// 2x2 sub-determinants of the top and bottom row pairs.
    fn minors(&self) -> ([f32; 6], [f32; 6]) {
        let m = &self.m;
        let lower = [
            m[8] * m[13] - m[9] * m[12],
            m[8] * m[14] - m[10] * m[12],
            m[8] * m[15] - m[11] * m[12],
            m[9] * m[14] - m[10] * m[13],
            m[9] * m[15] - m[11] * m[13],
            m[10] * m[15] - m[11] * m[14],
        ];
        let upper = [
            m[0] * m[5] - m[1] * m[4],
            m[0] * m[6] - m[2] * m[4],
            m[0] * m[7] - m[3] * m[4],
            m[1] * m[6] - m[2] * m[5],
            m[1] * m[7] - m[3] * m[5],
            m[2] * m[7] - m[3] * m[6],
        ];
        (upper, lower)
    }

    pub fn determinant(&self) -> f32 {
        let (a, b) = self.minors();
        determinant_from_minors(&a, &b)
    }

    /// Returns the inverse, or None if the determinant is zero.
    pub fn try_inverse(&self) -> Option<Self> {
        let (a, b) = self.minors();
        let det = determinant_from_minors(&a, &b);
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        let m = &self.m;
        let inv = [
            m[5] * b[5] - m[6] * b[4] + m[7] * b[3],
            -m[1] * b[5] + m[2] * b[4] - m[3] * b[3],
            m[13] * a[5] - m[14] * a[4] + m[15] * a[3],
            -m[9] * a[5] + m[10] * a[4] - m[11] * a[3],
            -m[4] * b[5] + m[6] * b[2] - m[7] * b[1],
            m[0] * b[5] - m[2] * b[2] + m[3] * b[1],
            -m[12] * a[5] + m[14] * a[2] - m[15] * a[1],
            m[8] * a[5] - m[10] * a[2] + m[11] * a[1],
            m[4] * b[4] - m[5] * b[2] + m[7] * b[0],
            -m[0] * b[4] + m[1] * b[2] - m[3] * b[0],
            m[12] * a[4] - m[13] * a[2] + m[15] * a[0],
            -m[8] * a[4] + m[9] * a[2] - m[11] * a[0],
            -m[4] * b[3] + m[5] * b[1] - m[6] * b[0],
            m[0] * b[3] - m[1] * b[1] + m[2] * b[0],
            -m[12] * a[3] + m[13] * a[1] - m[14] * a[0],
            m[8] * a[3] - m[9] * a[1] + m[10] * a[0],
        ];
        Some(Self {
            m: inv.map(|v| v * inv_det),
        })
    }

    /// Returns the inverse. A singular matrix is logged and returned unchanged.
    pub fn inverse(self) -> Self {
        self.try_inverse().unwrap_or_else(|| {
            log::warn!("Mat4::inverse: determinant is zero, returning matrix unchanged");
            self
        })
    }
}

#[inline]
fn determinant_from_minors(a: &[f32; 6], b: &[f32; 6]) -> f32 {
    a[0] * b[5] - a[1] * b[4] + a[2] * b[3] + a[3] * b[2] - a[4] * b[1] + a[5] * b[0]
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut m = [0.0; 16];
        for r in 0..4 {
            for c in 0..4 {
                m[r * 4 + c] = (0..4).map(|k| self.m[r * 4 + k] * rhs.m[k * 4 + c]).sum();
            }
        }
        Self { m }
    }
}

impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    #[inline]
    fn mul(self, p: Vec3) -> Vec3 {
        self.transform_point(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Quat;

    const EPSILON: f32 = 1e-5;

    fn mat4_approx_eq(a: Mat4, b: Mat4) -> bool {
        a.m.iter().zip(b.m).all(|(x, y)| (x - y).abs() < EPSILON)
    }

    fn sample() -> Mat4 {
        let rotation = Mat3::from_quat(Quat::from_axis_angle(Vec3::new(1.0, 2.0, 3.0), 0.8));
        Mat4::from_rotation_translation(rotation, Vec3::new(4.0, -2.0, 0.5))
    }

    #[test]
    fn test_transform_point_and_direction() {
        let t = Mat4::from_rotation_translation(Mat3::IDENTITY, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t * Vec3::X, Vec3::new(2.0, 2.0, 3.0));
        assert_eq!(t.transform_direction(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_inverse_round_trips() {
        let t = sample();
        assert!((t.determinant() - 1.0).abs() < EPSILON);
        assert!(mat4_approx_eq(t * t.inverse(), Mat4::IDENTITY));

        let p = Vec3::new(0.3, 0.2, -1.0);
        let back = t.inverse().transform_point(t.transform_point(p));
        assert!((back - p).length() < EPSILON);
    }

    #[test]
    fn test_singular_inverse_returns_self() {
        let squash = Mat3::from_diagonal(Vec3::new(1.0, 1.0, 0.0));
        let flat = Mat4::from_rotation_translation(squash, Vec3::ZERO);
        assert_eq!(flat.try_inverse(), None);
        assert_eq!(flat.inverse(), flat);
    }

    #[test]
    fn test_column_major_export() {
        let t = Mat4::from_rotation_translation(Mat3::IDENTITY, Vec3::new(7.0, 8.0, 9.0));
        let cols = t.to_cols_array();
        assert_eq!(&cols[12..15], &[7.0, 8.0, 9.0]);
        assert_eq!(cols[15], 1.0);
        assert_eq!(t.rotation(), Mat3::IDENTITY);
    }
}
