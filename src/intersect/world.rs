//! World-space intersection tests.

use glam::Vec3A;

use crate::geometry::{Line, DEGENERATE_LENGTH_SQUARED};
use crate::hit::{LineHit, SegmentHit, TriangleHit, VertexHit};
use crate::ray::Ray;

/// Denominators below this magnitude mean "parallel".
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Whether `point` (assumed on the triangle's plane) lies inside the triangle.
///
/// `normal` must be the un-flipped `cross(v1 - v0, v2 - v0)` direction. Points
/// on an edge count as inside.
pub fn point_in_triangle(point: Vec3A, v0: Vec3A, v1: Vec3A, v2: Vec3A, normal: Vec3A) -> bool {
    let edges = [(v0, v1), (v1, v2), (v2, v0)];
    edges
        .iter()
        .all(|&(a, b)| (b - a).cross(point - a).dot(normal) >= 0.0)
}

/// Intersect a ray with a triangle.
///
/// Front face is the counter-clockwise side. The reported normal always
/// faces the ray origin.
pub fn intersect_triangle(ray: &Ray, v0: Vec3A, v1: Vec3A, v2: Vec3A) -> TriangleHit {
    let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

    let denom = normal.dot(ray.direction);
    if denom.abs() < PARALLEL_EPSILON {
        return TriangleHit::MISS;
    }

    let t = (v0 - ray.origin).dot(normal) / denom;
    if t < 0.0 || !t.is_finite() {
        return TriangleHit::MISS;
    }

    let point = ray.at(t);
    if !point_in_triangle(point, v0, v1, v2, normal) {
        return TriangleHit::MISS;
    }

    let mut rec = TriangleHit {
        hit: true,
        distance: t,
        point,
        normal,
        front_face: true,
    };
    rec.set_face_normal(ray.direction, normal);
    rec
}

/// Test a ray against a point within a Euclidean radius.
///
/// The ray parameter is clamped to be non-negative; `distance` is that ray
/// parameter, not the point-to-ray distance.
pub fn intersect_point(ray: &Ray, point: Vec3A, threshold: f32, index: usize) -> VertexHit {
    let t = (point - ray.origin).dot(ray.direction).max(0.0);
    let gap = (ray.at(t) - point).length();
    VertexHit {
        hit: gap <= threshold,
        distance: t,
        point,
        index,
    }
}

/// Closest approach between a ray and the segment `start..end`.
///
/// Returns `(ray_t, segment_s)` with `ray_t >= 0` and `segment_s` in [0, 1].
/// After each clamp the other parameter is re-derived, so both refer to the
/// same pair of closest points.
pub fn closest_approach(ray: &Ray, start: Vec3A, end: Vec3A) -> (f32, f32) {
    let d = ray.direction;
    let e = end - start;
    let w = ray.origin - start;

    let b = d.dot(e);
    let c = e.dot(e);
    let dw = d.dot(w);
    let ew = e.dot(w);

    if c < DEGENERATE_LENGTH_SQUARED {
        return ((-dw).max(0.0), 0.0);
    }

    // |d| == 1, so the determinant is c - b^2 >= 0.
    let den = c - b * b;
    let mut s = if den <= PARALLEL_EPSILON * c {
        // Parallel: project the ray origin onto the segment.
        ew / c
    } else {
        (ew - b * dw) / den
    };
    s = s.clamp(0.0, 1.0);

    let mut t = s * b - dw;
    if t < 0.0 {
        t = 0.0;
        s = (ew / c).clamp(0.0, 1.0);
    }
    (t, s)
}

/// Test a ray against a segment within a Euclidean radius.
///
/// Zero-length segments degrade to [`intersect_point`].
pub fn intersect_segment(ray: &Ray, start: Vec3A, end: Vec3A, threshold: f32, index: usize) -> SegmentHit {
    if (end - start).length_squared() < DEGENERATE_LENGTH_SQUARED {
        let p = intersect_point(ray, start, threshold, index);
        return SegmentHit {
            hit: p.hit,
            distance: p.distance,
            point: p.point,
            index,
            parameter: 0.0,
        };
    }

    let (t, s) = closest_approach(ray, start, end);
    let on_segment = start + (end - start) * s;
    let gap = (ray.at(t) - on_segment).length();

    SegmentHit {
        hit: gap <= threshold,
        distance: t,
        point: on_segment,
        index,
        parameter: s,
    }
}

/// Segment test for a [`Line`], scaling the threshold by its thickness.
pub fn intersect_line(ray: &Ray, line: &Line, threshold: f32, index: usize) -> LineHit {
    intersect_segment(ray, line.start, line.end, threshold * line.thickness, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    fn unit_triangle() -> (Vec3A, Vec3A, Vec3A) {
        (
            Vec3A::new(-1.0, -1.0, 0.0),
            Vec3A::new(1.0, -1.0, 0.0),
            Vec3A::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn triangle_hit_from_front() {
        let (v0, v1, v2) = unit_triangle();
        let ray = Ray::new(Vec3A::new(0.0, 0.0, 1.0), Vec3A::new(0.0, 0.0, -1.0));
        let hit = intersect_triangle(&ray, v0, v1, v2);
        assert!(hit.hit);
        assert!((hit.distance - 1.0).abs() < 1e-6);
        assert!(approx_eq(hit.point, Vec3A::ZERO));
        assert!(approx_eq(hit.normal, Vec3A::Z));
        assert!(hit.front_face);
    }

    #[test]
    fn triangle_hit_from_back_flips_normal() {
        let (v0, v1, v2) = unit_triangle();
        let ray = Ray::new(Vec3A::new(0.0, 0.0, -2.0), Vec3A::Z);
        let hit = intersect_triangle(&ray, v0, v1, v2);
        assert!(hit.hit);
        assert!(!hit.front_face);
        assert!(approx_eq(hit.normal, -Vec3A::Z));
        assert!((hit.distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn triangle_misses() {
        let (v0, v1, v2) = unit_triangle();
        let outside = Ray::new(Vec3A::new(2.0, 0.0, 1.0), Vec3A::new(0.0, 0.0, -1.0));
        assert!(!intersect_triangle(&outside, v0, v1, v2).hit);

        let parallel = Ray::new(Vec3A::new(-5.0, 0.0, 0.0), Vec3A::X);
        assert!(!intersect_triangle(&parallel, v0, v1, v2).hit);

        let behind = Ray::new(Vec3A::new(0.0, 0.0, 1.0), Vec3A::Z);
        assert!(!intersect_triangle(&behind, v0, v1, v2).hit);
    }

    #[test]
    fn degenerate_triangle_never_hits() {
        let ray = Ray::new(Vec3A::new(0.0, 0.0, 1.0), -Vec3A::Z);
        let hit = intersect_triangle(&ray, Vec3A::ZERO, Vec3A::X, Vec3A::X * 2.0);
        assert!(!hit.hit);
        assert!(!hit.distance.is_nan());
    }

    #[test]
    fn point_behind_origin_clamps_parameter() {
        let ray = Ray::new(Vec3A::ZERO, Vec3A::X);
        let hit = intersect_point(&ray, Vec3A::new(-1.0, 0.0, 0.0), 0.5, 7);
        assert!(!hit.hit);
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.index, 7);

        let near = intersect_point(&ray, Vec3A::new(3.0, 0.1, 0.0), 0.2, 0);
        assert!(near.hit);
        assert!((near.distance - 3.0).abs() < 1e-6);
    }

    #[test]
    fn segment_crossing_ray() {
        let ray = Ray::new(Vec3A::new(0.0, 0.0, 5.0), -Vec3A::Z);
        let hit = intersect_segment(&ray, Vec3A::new(-1.0, 0.0, 0.0), Vec3A::new(1.0, 0.0, 0.0), 0.01, 2);
        assert!(hit.hit);
        assert!((hit.distance - 5.0).abs() < 1e-5);
        assert!((hit.parameter - 0.5).abs() < 1e-5);
        assert!(approx_eq(hit.point, Vec3A::ZERO));
    }

    #[test]
    fn segment_clamps_to_endpoint() {
        let ray = Ray::new(Vec3A::new(3.0, 0.0, 5.0), -Vec3A::Z);
        let hit = intersect_segment(&ray, Vec3A::new(-1.0, 0.0, 0.0), Vec3A::new(1.0, 0.0, 0.0), 0.01, 0);
        assert!(!hit.hit);
        assert_eq!(hit.parameter, 1.0);
        assert!(approx_eq(hit.point, Vec3A::X));
        assert!((hit.distance - 5.0).abs() < 1e-5);
    }

    #[test]
    fn segment_behind_ray_re_derives_parameter() {
        // Segment lies behind the origin; the ray parameter clamps to 0 and the
        // segment parameter is recomputed from the origin.
        let ray = Ray::new(Vec3A::ZERO, Vec3A::Z);
        let (t, s) = closest_approach(&ray, Vec3A::new(-1.0, 0.0, -2.0), Vec3A::new(1.0, 0.0, -2.0));
        assert_eq!(t, 0.0);
        assert!((s - 0.5).abs() < 1e-6);
    }

    #[test]
    fn parallel_segment_projects_origin() {
        let ray = Ray::new(Vec3A::new(0.0, 0.5, 0.0), Vec3A::X);
        let (t, s) = closest_approach(&ray, Vec3A::new(2.0, 0.0, 0.0), Vec3A::new(4.0, 0.0, 0.0));
        assert!(s.abs() < 1e-6);
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn segment_is_symmetric_under_endpoint_swap() {
        let ray = Ray::new(Vec3A::new(0.3, -2.0, 1.0), Vec3A::new(0.1, 1.0, -0.4));
        let a = Vec3A::new(-1.0, 0.5, 0.0);
        let b = Vec3A::new(2.0, 1.0, 0.5);
        let ab = intersect_segment(&ray, a, b, 0.2, 0);
        let ba = intersect_segment(&ray, b, a, 0.2, 0);
        let gap_ab = (ray.at(ab.distance) - ab.point).length();
        let gap_ba = (ray.at(ba.distance) - ba.point).length();
        assert!((gap_ab - gap_ba).abs() < 1e-5);
        assert!((ab.parameter - (1.0 - ba.parameter)).abs() < 1e-5);
        assert_eq!(ab.hit, ba.hit);
    }

    #[test]
    fn zero_length_segment_uses_point_test() {
        let ray = Ray::new(Vec3A::new(0.0, 0.0, 5.0), -Vec3A::Z);
        let p = Vec3A::new(0.005, 0.0, 0.0);
        let hit = intersect_segment(&ray, p, p, 0.01, 4);
        assert!(hit.hit);
        assert_eq!(hit.parameter, 0.0);
        assert!((hit.distance - 5.0).abs() < 1e-5);
    }

    #[test]
    fn line_thickness_scales_threshold() {
        let ray = Ray::new(Vec3A::new(0.0, 0.05, 5.0), -Vec3A::Z);
        let thin = Line::new(-Vec3A::X, Vec3A::X, Vec3A::ONE, 1.0);
        let thick = Line::new(-Vec3A::X, Vec3A::X, Vec3A::ONE, 10.0);
        assert!(!intersect_line(&ray, &thin, 0.01, 0).hit);
        assert!(intersect_line(&ray, &thick, 0.01, 0).hit);
    }
}
