//! Screen-space intersection tests.
//!
//! The primitive and the ray direction are projected onto the camera's image
//! plane and compared there, so thresholds are in vertical NDC units and
//! points and lines keep a fixed apparent size. The reported `distance` is
//! still the 3D ray parameter of the matching world point, which lets these
//! hits depth-sort against world-space triangle hits.

use glam::{Vec2, Vec3A};

use crate::camera::{CameraFrame, NEAR_DEPTH};
use crate::geometry::{Line, DEGENERATE_LENGTH_SQUARED};
use crate::hit::{EdgeHit, LineHit, SegmentHit, VertexHit};
use crate::ray::Ray;

/// Ray parameter of the orthogonal projection of `p` onto the ray.
fn ray_parameter(ray: &Ray, p: Vec3A) -> f32 {
    (p - ray.origin).dot(ray.direction).max(0.0)
}

/// Distance from `p` to the 2D segment `a..b` and the closest parameter.
fn point_segment_2d(p: Vec2, a: Vec2, b: Vec2) -> (f32, f32) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let u = if len_sq < DEGENERATE_LENGTH_SQUARED {
        0.0
    } else {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    ((a + ab * u - p).length(), u)
}

/// Test a ray against a vertex drawn with a fixed on-screen `radius`.
pub fn intersect_vertex_screen_space(
    ray: &Ray,
    vertex: Vec3A,
    radius: f32,
    index: usize,
    frame: &CameraFrame,
) -> VertexHit {
    let (Some(ray_2d), Some(vertex_2d)) = (frame.project_direction(ray.direction), frame.project_point(vertex))
    else {
        return VertexHit { index, ..VertexHit::MISS };
    };

    VertexHit {
        hit: (ray_2d - vertex_2d).length() <= radius,
        distance: ray_parameter(ray, vertex),
        point: vertex,
        index,
    }
}

/// Test a ray against a segment drawn with a fixed on-screen `thickness`.
///
/// The segment is clipped to the near plane before projection. The closest
/// screen parameter is mapped back to the world segment with
/// perspective-correct interpolation. Zero-length segments fall back to the
/// vertex test.
pub fn intersect_segment_screen_space(
    ray: &Ray,
    start: Vec3A,
    end: Vec3A,
    thickness: f32,
    index: usize,
    frame: &CameraFrame,
) -> SegmentHit {
    if (end - start).length_squared() < DEGENERATE_LENGTH_SQUARED {
        let v = intersect_vertex_screen_space(ray, start, thickness, index, frame);
        return SegmentHit {
            hit: v.hit,
            distance: v.distance,
            point: v.point,
            index,
            parameter: 0.0,
        };
    }

    let miss = SegmentHit { index, ..SegmentHit::MISS };

    let Some(ray_2d) = frame.project_direction(ray.direction) else {
        return miss;
    };

    let mut a = frame.to_local(start);
    let mut b = frame.to_local(end);
    if a.z <= NEAR_DEPTH && b.z <= NEAR_DEPTH {
        return miss;
    }

    // Clip to the near plane, remembering where the clipped ends sit on the
    // original segment.
    let (mut s0, mut s1) = (0.0, 1.0);
    if a.z <= NEAR_DEPTH {
        let s = ((NEAR_DEPTH * 2.0 - a.z) / (b.z - a.z)).min(1.0);
        a += (b - a) * s;
        s0 = s;
    } else if b.z <= NEAR_DEPTH {
        let s = ((a.z - NEAR_DEPTH * 2.0) / (a.z - b.z)).max(0.0);
        b = a + (b - a) * s;
        s1 = s;
    }

    let (Some(a_2d), Some(b_2d)) = (frame.project_local(a), frame.project_local(b)) else {
        return miss;
    };

    let (gap, u) = point_segment_2d(ray_2d, a_2d, b_2d);

    // 1/z is linear in screen space.
    let den = b.z * (1.0 - u) + a.z * u;
    let t = if den.abs() < f32::EPSILON { u } else { u * a.z / den };
    let parameter = (s0 + (s1 - s0) * t).clamp(0.0, 1.0);
    let point = start + (end - start) * parameter;

    SegmentHit {
        hit: gap <= thickness,
        distance: ray_parameter(ray, point),
        point,
        index,
        parameter,
    }
}

/// Screen-space test for a model edge.
pub fn intersect_edge_screen_space(
    ray: &Ray,
    start: Vec3A,
    end: Vec3A,
    thickness: f32,
    index: usize,
    frame: &CameraFrame,
) -> EdgeHit {
    intersect_segment_screen_space(ray, start, end, thickness, index, frame)
}

/// Screen-space test for a reference line; `thickness` is scaled by the
/// line's own thickness.
pub fn intersect_line_screen_space(ray: &Ray, line: &Line, thickness: f32, index: usize, frame: &CameraFrame) -> LineHit {
    intersect_segment_screen_space(ray, line.start, line.end, thickness * line.thickness, index, frame)
}
