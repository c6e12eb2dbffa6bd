//! Scene data.
//!
//! [`Model`] is the editable, index-based view of a mesh. [`Scene`] holds the
//! flat world-space primitive lists the renderer reads; it is rebuilt
//! wholesale from a model whenever the model changes.

use std::collections::BTreeSet;

use glam::Vec3A;
use log::{info, warn};

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::geometry::{CoordinateAxes, Line, Triangle};
use crate::hit::SceneHit;
use crate::intersect::is_vertex_visible;
use crate::math::{Color, Point3};
use crate::ray::Ray;
use crate::resolver::{closest_hit_filtered, Thresholds};

/// Color used for faces without an explicit color.
pub const DEFAULT_FACE_COLOR: Color = Vec3A::new(0.7, 0.7, 0.7);

/// Color of model edges.
pub const DEFAULT_EDGE_COLOR: Color = Vec3A::new(0.7, 0.7, 0.7);

/// Index-based polygon mesh.
///
/// Faces are counter-clockwise vertex index triples; edges are index pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Vertex positions
    pub vertices: Vec<Point3>,
    /// Triangles as vertex index triples
    pub faces: Vec<[usize; 3]>,
    /// Edges as vertex index pairs
    pub edges: Vec<[usize; 2]>,
    /// Optional per-face colors, parallel to `faces`
    pub face_colors: Vec<Color>,
}

impl Model {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) -> usize {
        self.vertices.push(Vec3A::new(x, y, z));
        self.vertices.len() - 1
    }

    /// Append a face with the default color. Invalid faces are dropped.
    pub fn add_face(&mut self, a: usize, b: usize, c: usize) -> bool {
        self.add_colored_face(a, b, c, DEFAULT_FACE_COLOR)
    }

    /// Append a face with its own color. Invalid faces are dropped.
    pub fn add_colored_face(&mut self, a: usize, b: usize, c: usize, color: Color) -> bool {
        let face = [a, b, c];
        if !self.is_face_valid(&face) {
            warn!("Invalid face indices: {a}, {b}, {c}");
            return false;
        }
        // Keep colors parallel to faces even if they were pushed directly.
        self.face_colors.resize(self.faces.len(), DEFAULT_FACE_COLOR);
        self.faces.push(face);
        self.face_colors.push(color);
        true
    }

    /// Append an edge. Invalid edges are dropped.
    pub fn add_edge(&mut self, a: usize, b: usize) -> bool {
        let edge = [a, b];
        if !self.is_edge_valid(&edge) {
            warn!("Invalid edge indices: {a}, {b}");
            return false;
        }
        self.edges.push(edge);
        true
    }

    fn is_index_valid(&self, index: usize) -> bool {
        index < self.vertices.len()
    }

    /// Indices in range and pairwise distinct.
    pub fn is_face_valid(&self, face: &[usize; 3]) -> bool {
        let [a, b, c] = *face;
        self.is_index_valid(a) && self.is_index_valid(b) && self.is_index_valid(c) && a != b && b != c && c != a
    }

    /// Indices in range and distinct.
    pub fn is_edge_valid(&self, edge: &[usize; 2]) -> bool {
        let [a, b] = *edge;
        self.is_index_valid(a) && self.is_index_valid(b) && a != b
    }

    /// Every face and edge references valid vertices.
    pub fn is_valid(&self) -> bool {
        self.faces.iter().all(|f| self.is_face_valid(f)) && self.edges.iter().all(|e| self.is_edge_valid(e))
    }

    /// Color of face `index`.
    pub fn face_color(&self, index: usize) -> Color {
        self.face_colors.get(index).copied().unwrap_or(DEFAULT_FACE_COLOR)
    }

    /// Replace the edge list with the unique undirected edges of all faces,
    /// sorted by (low, high) index.
    pub fn generate_edges_from_faces(&mut self) {
        let mut unique = BTreeSet::new();
        for face in self.faces.iter().filter(|f| self.is_face_valid(f)) {
            let [a, b, c] = *face;
            for (u, v) in [(a, b), (b, c), (c, a)] {
                unique.insert((u.min(v), u.max(v)));
            }
        }
        self.edges = unique.into_iter().map(|(u, v)| [u, v]).collect();
    }

    /// Area-independent average of adjacent face normals per vertex.
    ///
    /// Vertices without faces get +Z.
    pub fn vertex_normals(&self) -> Vec<Vec3A> {
        let mut normals = vec![Vec3A::ZERO; self.vertices.len()];
        for face in self.faces.iter().filter(|f| self.is_face_valid(f)) {
            let [a, b, c] = *face;
            let (v0, v1, v2) = (self.vertices[a], self.vertices[b], self.vertices[c]);
            let n = (v1 - v0).cross(v2 - v0).normalize_or_zero();
            for i in face {
                normals[*i] += n;
            }
        }
        normals
            .into_iter()
            .map(|n| if n.length() > 1e-3 { n.normalize() } else { Vec3A::Z })
            .collect()
    }

    /// Axis-aligned cube centred on the origin, outward-facing.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let mut m = Self::new();
        for &(x, y, z) in &[
            (-h, -h, -h),
            (h, -h, -h),
            (h, h, -h),
            (-h, h, -h),
            (-h, -h, h),
            (h, -h, h),
            (h, h, h),
            (-h, h, h),
        ] {
            m.add_vertex(x, y, z);
        }
        for &[a, b, c] in &[
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 7, 6],
            [2, 3, 7],
            [0, 4, 7],
            [0, 7, 3],
            [1, 6, 5],
            [1, 2, 6],
        ] {
            m.add_face(a, b, c);
        }
        m.generate_edges_from_faces();
        m
    }

    /// Single triangle in the XY plane.
    pub fn triangle() -> Self {
        let mut m = Self::new();
        m.add_vertex(0.0, 0.0, 0.0);
        m.add_vertex(1.0, 0.0, 0.0);
        m.add_vertex(0.5, 1.0, 0.0);
        m.add_face(0, 1, 2);
        m.generate_edges_from_faces();
        m
    }

    /// Unit square in the XY plane made of two triangles.
    pub fn quad() -> Self {
        let mut m = Self::new();
        m.add_vertex(0.0, 0.0, 0.0);
        m.add_vertex(1.0, 0.0, 0.0);
        m.add_vertex(1.0, 1.0, 0.0);
        m.add_vertex(0.0, 1.0, 0.0);
        m.add_face(0, 1, 2);
        m.add_face(0, 2, 3);
        m.generate_edges_from_faces();
        m
    }

    /// Demo scene: a ground plane, an upright pyramid and an inverted pyramid
    /// hanging above the ground.
    pub fn pyramids() -> Self {
        let ground = Vec3A::new(0.6, 0.6, 0.6);
        let upright = Vec3A::new(0.4, 0.7, 0.4);
        let inverted = Vec3A::new(0.4, 0.5, 0.8);
        let mut m = Self::new();

        // Ground plane, vertices 0..=3.
        m.add_vertex(-5.0, -5.0, -0.5);
        m.add_vertex(5.0, -5.0, -0.5);
        m.add_vertex(5.0, 5.0, -0.5);
        m.add_vertex(-5.0, 5.0, -0.5);
        m.add_colored_face(0, 1, 2, ground);
        m.add_colored_face(0, 2, 3, ground);
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
            m.add_edge(a, b);
        }

        // Upright pyramid, vertices 4..=8.
        m.add_vertex(-1.0, -1.0, 0.0);
        m.add_vertex(1.0, -1.0, 0.0);
        m.add_vertex(1.0, 1.0, 0.0);
        m.add_vertex(-1.0, 1.0, 0.0);
        m.add_vertex(0.0, 0.0, 2.0);
        for [a, b, c] in [[4, 5, 6], [4, 6, 7], [4, 8, 5], [5, 8, 6], [6, 8, 7], [7, 8, 4]] {
            m.add_colored_face(a, b, c, upright);
        }
        for (a, b) in [(4, 5), (5, 6), (6, 7), (7, 4), (4, 8), (5, 8), (6, 8), (7, 8)] {
            m.add_edge(a, b);
        }

        // Inverted pyramid, vertices 9..=13.
        m.add_vertex(-0.8, 2.0, 1.5);
        m.add_vertex(0.8, 2.0, 1.5);
        m.add_vertex(0.8, 3.6, 1.5);
        m.add_vertex(-0.8, 3.6, 1.5);
        m.add_vertex(0.0, 2.8, -0.2);
        for [a, b, c] in [[9, 10, 11], [9, 11, 12], [9, 13, 10], [10, 13, 11], [11, 13, 12], [12, 13, 9]] {
            m.add_colored_face(a, b, c, inverted);
        }
        for (a, b) in [(9, 10), (10, 11), (11, 12), (12, 9), (9, 13), (10, 13), (11, 13), (12, 13)] {
            m.add_edge(a, b);
        }
        m
    }

    /// Built-in model by name: `pyramids`, `cube`, `triangle` or `quad`.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "pyramids" => Some(Self::pyramids()),
            "cube" => Some(Self::cube(2.0)),
            "triangle" => Some(Self::triangle()),
            "quad" => Some(Self::quad()),
            _ => None,
        }
    }
}

/// Flat primitive lists read by the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Vertex positions, drawn as dots
    pub vertices: Vec<Point3>,
    /// Model edges
    pub edges: Vec<Line>,
    /// Reference lines such as coordinate axes
    pub lines: Vec<Line>,
    /// Shaded triangles
    pub triangles: Vec<Triangle>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the primitive lists for `model`.
    ///
    /// Faces and edges with invalid indices are skipped. Vertex indices match
    /// the model's.
    pub fn from_model(model: &Model, axes: &CoordinateAxes) -> Self {
        let mut scene = Self::new();
        scene.rebuild(model, axes);
        scene
    }

    /// Replace every list with fresh data from `model`.
    pub fn rebuild(&mut self, model: &Model, axes: &CoordinateAxes) {
        self.vertices = model.vertices.clone();

        self.triangles = Vec::with_capacity(model.faces.len());
        for (i, face) in model.faces.iter().enumerate() {
            if !model.is_face_valid(face) {
                warn!("Skipping face {i} with invalid indices {face:?}");
                continue;
            }
            let [a, b, c] = *face;
            self.triangles.push(Triangle::new(
                model.vertices[a],
                model.vertices[b],
                model.vertices[c],
                model.face_color(i),
            ));
        }

        self.edges = Vec::with_capacity(model.edges.len());
        for (i, edge) in model.edges.iter().enumerate() {
            if !model.is_edge_valid(edge) {
                warn!("Skipping edge {i} with invalid indices {edge:?}");
                continue;
            }
            let [a, b] = *edge;
            self.edges.push(Line::new(model.vertices[a], model.vertices[b], DEFAULT_EDGE_COLOR, 1.0));
        }

        self.lines = axes.lines();

        info!(
            "Scene rebuilt: {} vertices, {} edges, {} lines, {} triangles",
            self.vertices.len(),
            self.edges.len(),
            self.lines.len(),
            self.triangles.len()
        );
    }

    /// Nearest primitive under `ray` using selection thresholds.
    ///
    /// With `vertex_visibility_check` on, vertices hidden behind triangles
    /// are not candidates.
    pub fn pick(&self, ray: &Ray, camera: &Camera, config: &RenderConfig) -> Option<SceneHit> {
        let frame = camera.frame();
        let thresholds = Thresholds::selection(config);
        closest_hit_filtered(ray, self, &frame, config, thresholds, |_, vertex| {
            !config.vertex_visibility_check
                || is_vertex_visible(frame.origin, vertex, &self.triangles, config.visibility_tolerance)
        })
    }
}
