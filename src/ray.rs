//! Ray representation for 3D ray tracing.
//!
//! A ray is defined as r(t) = origin + t * direction with t >= 0, a
//! half-line used for intersection testing and picking.

use glam::Vec3A;

/// Squared direction length below which a ray is considered degenerate.
const MIN_DIRECTION_LENGTH_SQUARED: f32 = 1e-12;

/// Ray in 3D space defined by origin and unit direction.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    ///
    /// The camera position for primary rays, an offset surface point for
    /// reflected rays.
    pub origin: Vec3A,

    /// Unit direction of the ray.
    ///
    /// Always normalized by the constructors, so `t` is a world-space
    /// distance. A zero vector marks an invalid ray.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray, normalizing `direction`.
    ///
    /// A zero-length direction yields an invalid ray (see [`Ray::is_valid`]);
    /// use [`Ray::try_new`] to reject it up front.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray, returning `None` for a zero-length direction.
    pub fn try_new(origin: Vec3A, direction: Vec3A) -> Option<Self> {
        if direction.length_squared() < MIN_DIRECTION_LENGTH_SQUARED || !direction.is_finite() {
            return None;
        }
        Some(Self::new(origin, direction))
    }

    /// Ray from `start` through `end`.
    pub fn from_points(start: Vec3A, end: Vec3A) -> Option<Self> {
        Self::try_new(start, end - start)
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }

    /// Whether the direction is usable (non-zero).
    pub fn is_valid(&self) -> bool {
        self.direction.length_squared() > MIN_DIRECTION_LENGTH_SQUARED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_normalized() {
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 3.0, 4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        let p = ray.at(5.0);
        assert!((p - Vec3A::new(0.0, 3.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Ray::try_new(Vec3A::ONE, Vec3A::ZERO).is_none());
        assert!(!Ray::new(Vec3A::ONE, Vec3A::ZERO).is_valid());
        assert!(Ray::from_points(Vec3A::ONE, Vec3A::ONE).is_none());
    }

    #[test]
    fn from_points_aims_at_end() {
        let ray = Ray::from_points(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -2.0)).unwrap();
        assert!((ray.direction - Vec3A::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }
}
