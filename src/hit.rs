//! Intersection result records.
//!
//! One record type per primitive kind, plus the tagged [`HitKind`] the
//! closest-hit resolver hands to shading and picking.

use glam::Vec3A;

use crate::math::Color;

/// Result of testing a ray against a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Whether the ray hits the triangle interior
    pub hit: bool,
    /// Ray parameter of the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3A,
    /// Unit surface normal, always facing the ray origin
    pub normal: Vec3A,
    /// True if the ray hits the counter-clockwise side
    pub front_face: bool,
}

impl TriangleHit {
    /// A miss.
    pub const MISS: TriangleHit = TriangleHit {
        hit: false,
        distance: f32::INFINITY,
        point: Vec3A::ZERO,
        normal: Vec3A::ZERO,
        front_face: false,
    };

    /// Store the geometric normal flipped against the incident direction.
    ///
    /// `front_face` records the orientation before flipping.
    pub fn set_face_normal(&mut self, direction: Vec3A, outward_normal: Vec3A) {
        self.front_face = direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Result of testing a ray against a segment (model edge or reference line).
///
/// `distance` and `point` are filled even when `hit` is false so callers can
/// still reason about depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Whether the closest approach is within the threshold
    pub hit: bool,
    /// Ray parameter of the closest point on the ray
    pub distance: f32,
    /// Closest point on the segment
    pub point: Vec3A,
    /// Index of the segment in its list
    pub index: usize,
    /// Position along the segment, 0 at start and 1 at end
    pub parameter: f32,
}

/// Edge hits and line hits share a layout.
pub type EdgeHit = SegmentHit;
/// See [`EdgeHit`].
pub type LineHit = SegmentHit;

impl SegmentHit {
    /// A miss that cannot be ordered against anything.
    pub const MISS: SegmentHit = SegmentHit {
        hit: false,
        distance: f32::INFINITY,
        point: Vec3A::ZERO,
        index: 0,
        parameter: 0.0,
    };
}

/// Result of testing a ray against a single vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexHit {
    /// Whether the vertex lies within the threshold of the ray
    pub hit: bool,
    /// Ray parameter of the point's projection onto the ray
    pub distance: f32,
    /// Vertex position
    pub point: Vec3A,
    /// Index into the vertex list
    pub index: usize,
}

impl VertexHit {
    /// A miss that cannot be ordered against anything.
    pub const MISS: VertexHit = VertexHit {
        hit: false,
        distance: f32::INFINITY,
        point: Vec3A::ZERO,
        index: 0,
    };
}

/// Primitive-specific payload of the winning hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitKind {
    /// A model vertex, drawn as a flat dot.
    Vertex {
        /// Index into the scene's vertex list
        index: usize,
        /// Display color
        color: Color,
    },
    /// A model edge, drawn as a flat line.
    Edge {
        /// Index into the scene's edge list
        index: usize,
        /// Position along the edge in [0, 1]
        parameter: f32,
        /// Display color
        color: Color,
    },
    /// A reference line such as a coordinate axis.
    Line {
        /// Index into the scene's line list
        index: usize,
        /// Position along the line in [0, 1]
        parameter: f32,
        /// Display color
        color: Color,
    },
    /// A shaded triangle.
    Triangle {
        /// Index into the scene's triangle list
        index: usize,
        /// Unit normal facing the ray origin
        normal: Vec3A,
        /// Orientation before the normal was flipped
        front_face: bool,
        /// Flat color carried by the triangle
        color: Color,
    },
}

/// Nearest accepted hit along one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit {
    /// Ray parameter of the hit
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3A,
    /// What was hit
    pub kind: HitKind,
}

impl SceneHit {
    /// Fixed display color for vertices, edges and lines; `None` for triangles.
    pub fn flat_color(&self) -> Option<Color> {
        match self.kind {
            HitKind::Vertex { color, .. }
            | HitKind::Edge { color, .. }
            | HitKind::Line { color, .. } => Some(color),
            HitKind::Triangle { .. } => None,
        }
    }

    /// Vertex index if the hit is a vertex.
    pub fn vertex_index(&self) -> Option<usize> {
        match self.kind {
            HitKind::Vertex { index, .. } => Some(index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_normal_flips_for_back_side() {
        let mut rec = TriangleHit::MISS;
        rec.set_face_normal(Vec3A::new(0.0, 0.0, 1.0), Vec3A::Z);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3A::Z);

        rec.set_face_normal(Vec3A::new(0.0, 0.0, -1.0), Vec3A::Z);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3A::Z);
    }

    #[test]
    fn only_triangles_lack_flat_color() {
        let tri = SceneHit {
            distance: 1.0,
            point: Vec3A::ZERO,
            kind: HitKind::Triangle {
                index: 0,
                normal: Vec3A::Z,
                front_face: true,
                color: Vec3A::ONE,
            },
        };
        assert!(tri.flat_color().is_none());
        assert!(tri.vertex_index().is_none());

        let vertex = SceneHit {
            kind: HitKind::Vertex { index: 3, color: Vec3A::ONE },
            ..tri
        };
        assert_eq!(vertex.flat_color(), Some(Vec3A::ONE));
        assert_eq!(vertex.vertex_index(), Some(3));
    }
}
