//! Small vector and matrix helpers on top of `glam`.
//!
//! Positions, directions and colors all share [`Vec3A`]. Colors are linear
//! RGB in roughly [0, 1] per channel and are only clamped by the frame
//! driver when written to the pixel buffer.

use glam::{Mat4, Vec3A};
use log::warn;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// 3D position in world space.
pub type Point3 = Vec3A;

/// Tolerance used for value equality of vectors.
pub const VECTOR_EPSILON: f32 = 1e-6;

/// Determinants below this magnitude are treated as singular.
pub const SINGULAR_EPSILON: f32 = 1e-6;

/// Component-wise equality within [`VECTOR_EPSILON`].
pub fn approx_eq(a: Vec3A, b: Vec3A) -> bool {
    (a - b).abs().max_element() < VECTOR_EPSILON
}

/// Linear interpolation `a + (b - a) * t`.
pub fn lerp(a: Vec3A, b: Vec3A, t: f32) -> Vec3A {
    a + (b - a) * t
}

/// Reflect a vector off a surface using the law of reflection.
pub fn reflect(incident: Vec3A, normal: Vec3A) -> Vec3A {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Invert a transform, falling back to identity when it is singular.
pub fn safe_inverse(m: &Mat4) -> Mat4 {
    let det = m.determinant();
    if det.abs() < SINGULAR_EPSILON || !det.is_finite() {
        warn!("Matrix is singular (det = {det}), returning identity matrix");
        return Mat4::IDENTITY;
    }
    m.inverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn reflect_off_floor() {
        let r = reflect(Vec3A::new(1.0, -1.0, 0.0), Vec3A::new(0.0, 1.0, 0.0));
        assert!(approx_eq(r, Vec3A::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Vec3A::new(0.0, 2.0, -1.0);
        let b = Vec3A::new(1.0, 0.0, 1.0);
        assert!(approx_eq(lerp(a, b, 0.0), a));
        assert!(approx_eq(lerp(a, b, 1.0), b));
        assert!(approx_eq(lerp(a, b, 0.5), Vec3A::new(0.5, 1.0, 0.0)));
    }

    #[test]
    fn approx_eq_uses_tolerance() {
        let a = Vec3A::new(1.0, 2.0, 3.0);
        assert!(approx_eq(a, a + Vec3A::splat(1e-7)));
        assert!(!approx_eq(a, a + Vec3A::new(0.0, 1e-4, 0.0)));
    }

    #[test]
    fn singular_matrix_falls_back_to_identity() {
        let m = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(safe_inverse(&m), Mat4::IDENTITY);
    }

    #[test]
    fn regular_matrix_is_inverted() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let inv = safe_inverse(&m);
        let p = inv.transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert!(p.length() < 1e-6);
    }
}
