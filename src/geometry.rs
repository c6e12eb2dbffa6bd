//! Render-side primitives.
//!
//! These are flat, world-space copies of the model data. They are rebuilt
//! wholesale whenever the model changes.

use glam::Vec3A;

use crate::math::{approx_eq, Color, Point3};

/// Squared length below which a segment is treated as a point.
pub const DEGENERATE_LENGTH_SQUARED: f32 = 1e-12;

/// World-space triangle with a flat color.
///
/// Counter-clockwise winding seen from the front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First corner
    pub v0: Point3,
    /// Second corner
    pub v1: Point3,
    /// Third corner
    pub v2: Point3,
    /// Flat color
    pub color: Color,
}

impl Triangle {
    /// Create a new triangle.
    pub fn new(v0: Point3, v1: Point3, v2: Point3, color: Color) -> Self {
        Self { v0, v1, v2, color }
    }

    /// Unit normal of the counter-clockwise side, zero if degenerate.
    pub fn normal(&self) -> Vec3A {
        (self.v1 - self.v0).cross(self.v2 - self.v0).normalize_or_zero()
    }

    /// Average of the three corners.
    pub fn centroid(&self) -> Point3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Whether one of the corners coincides with `p`.
    pub fn has_corner(&self, p: Point3) -> bool {
        approx_eq(self.v0, p) || approx_eq(self.v1, p) || approx_eq(self.v2, p)
    }
}

/// Colored segment, used for model edges and reference axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Start point
    pub start: Point3,
    /// End point
    pub end: Point3,
    /// Display color
    pub color: Color,
    /// Multiplier applied to the configured hit threshold
    pub thickness: f32,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point3, end: Point3, color: Color, thickness: f32) -> Self {
        Self {
            start,
            end,
            color,
            thickness,
        }
    }

    /// Euclidean length.
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

/// Reference X/Y/Z axis lines drawn from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateAxes {
    /// Hidden axes produce no lines
    pub show: bool,
    /// Length of each axis
    pub length: f32,
    /// Thickness multiplier of each axis line
    pub thickness: f32,
    /// X axis color
    pub x_color: Color,
    /// Y axis color
    pub y_color: Color,
    /// Z axis color
    pub z_color: Color,
}

impl Default for CoordinateAxes {
    fn default() -> Self {
        Self {
            show: true,
            length: 2.0,
            thickness: 1.0,
            x_color: Vec3A::new(1.0, 0.0, 0.0),
            y_color: Vec3A::new(0.0, 1.0, 0.0),
            z_color: Vec3A::new(0.0, 0.0, 1.0),
        }
    }
}

impl CoordinateAxes {
    /// Origin of the axes, also drawn as a reference vertex.
    pub fn origin(&self) -> Point3 {
        Vec3A::ZERO
    }

    /// Axis lines in X, Y, Z order; empty when hidden.
    pub fn lines(&self) -> Vec<Line> {
        if !self.show {
            return Vec::new();
        }
        let origin = self.origin();
        vec![
            Line::new(origin, Vec3A::X * self.length, self.x_color, self.thickness),
            Line::new(origin, Vec3A::Y * self.length, self.y_color, self.thickness),
            Line::new(origin, Vec3A::Z * self.length, self.z_color, self.thickness),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_normal_follows_winding() {
        let t = Triangle::new(
            Vec3A::new(-1.0, -1.0, 0.0),
            Vec3A::new(1.0, -1.0, 0.0),
            Vec3A::new(0.0, 1.0, 0.0),
            Vec3A::ONE,
        );
        assert!(approx_eq(t.normal(), Vec3A::Z));
        let flipped = Triangle::new(t.v0, t.v2, t.v1, t.color);
        assert!(approx_eq(flipped.normal(), -Vec3A::Z));
        assert!(t.has_corner(Vec3A::new(0.0, 1.0, 0.0)));
        assert!(!t.has_corner(t.centroid()));
    }

    #[test]
    fn hidden_axes_have_no_lines() {
        let axes = CoordinateAxes {
            show: false,
            ..Default::default()
        };
        assert!(axes.lines().is_empty());
    }

    #[test]
    fn axes_point_along_basis() {
        let axes = CoordinateAxes {
            length: 3.0,
            ..Default::default()
        };
        let lines = axes.lines();
        assert_eq!(lines.len(), 3);
        assert!(approx_eq(lines[0].end, Vec3A::new(3.0, 0.0, 0.0)));
        assert!(approx_eq(lines[2].end, Vec3A::new(0.0, 0.0, 3.0)));
        assert!((lines[1].length() - 3.0).abs() < 1e-6);
    }
}
