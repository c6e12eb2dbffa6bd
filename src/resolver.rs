//! Closest-hit resolution across primitive kinds.
//!
//! Categories are tested in a fixed order: vertices, edges, reference lines,
//! triangles. A candidate replaces the current best only when it is strictly
//! closer, so on an exact tie the earlier category wins.

use glam::Vec3A;

use crate::camera::CameraFrame;
use crate::config::RenderConfig;
use crate::hit::{HitKind, SceneHit};
use crate::interval::Interval;
use crate::intersect::{screen, world};
use crate::ray::Ray;
use crate::scene::Scene;

/// Hit tolerances for one resolver pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Vertex radius
    pub vertex: f32,
    /// Edge half-width
    pub edge: f32,
    /// Reference line half-width, before per-line thickness
    pub line: f32,
}

impl Thresholds {
    /// Apparent sizes used while rendering.
    pub fn display(config: &RenderConfig) -> Self {
        Self {
            vertex: config.vertex_display_radius,
            edge: config.edge_display_thickness,
            line: config.line_thickness,
        }
    }

    /// Pick tolerances used for selection.
    pub fn selection(config: &RenderConfig) -> Self {
        Self {
            vertex: config.vertex_selection_threshold,
            edge: config.edge_selection_threshold,
            line: config.edge_selection_threshold,
        }
    }
}

/// Running minimum over accepted candidates.
struct Closest {
    window: Interval,
    best: Option<SceneHit>,
}

impl Closest {
    fn new(ray_epsilon: f32) -> Self {
        Self {
            window: Interval::beyond(ray_epsilon),
            best: None,
        }
    }

    fn offer(&mut self, hit: bool, distance: f32, point: Vec3A, kind: impl FnOnce() -> HitKind) {
        if hit && self.window.surrounds(distance) {
            self.window.max = distance;
            self.best = Some(SceneHit {
                distance,
                point,
                kind: kind(),
            });
        }
    }
}

/// Nearest enabled primitive along `ray`, or `None` on a miss.
///
/// Rays leaving the eye use the screen-space tests so points and lines keep
/// a fixed apparent size; any other ray (e.g. a reflection) uses the
/// world-space tests with the same threshold values.
pub fn closest_hit(
    ray: &Ray,
    scene: &Scene,
    frame: &CameraFrame,
    config: &RenderConfig,
    thresholds: Thresholds,
) -> Option<SceneHit> {
    closest_hit_filtered(ray, scene, frame, config, thresholds, |_, _| true)
}

/// [`closest_hit`] with a predicate deciding which vertices are candidates.
pub fn closest_hit_filtered(
    ray: &Ray,
    scene: &Scene,
    frame: &CameraFrame,
    config: &RenderConfig,
    thresholds: Thresholds,
    vertex_filter: impl Fn(usize, Vec3A) -> bool,
) -> Option<SceneHit> {
    if !ray.is_valid() {
        return None;
    }
    let screen_space = frame.is_eye(ray.origin);
    let mut closest = Closest::new(config.ray_epsilon);

    if config.show_vertices {
        for (i, &v) in scene.vertices.iter().enumerate() {
            let hit = if screen_space {
                screen::intersect_vertex_screen_space(ray, v, thresholds.vertex, i, frame)
            } else {
                world::intersect_point(ray, v, thresholds.vertex, i)
            };
            // Only candidates that would win reach the filter.
            let wins = hit.hit && closest.window.surrounds(hit.distance);
            if wins && vertex_filter(i, v) {
                closest.offer(true, hit.distance, hit.point, || HitKind::Vertex {
                    index: i,
                    color: config.vertex_color,
                });
            }
        }
    }

    if config.show_edges {
        for (i, edge) in scene.edges.iter().enumerate() {
            let hit = if screen_space {
                screen::intersect_edge_screen_space(ray, edge.start, edge.end, thresholds.edge, i, frame)
            } else {
                world::intersect_segment(ray, edge.start, edge.end, thresholds.edge, i)
            };
            closest.offer(hit.hit, hit.distance, hit.point, || HitKind::Edge {
                index: i,
                parameter: hit.parameter,
                color: edge.color,
            });
        }
    }

    if config.show_coordinate_axes {
        for (i, line) in scene.lines.iter().enumerate() {
            let hit = if screen_space {
                screen::intersect_line_screen_space(ray, line, thresholds.line, i, frame)
            } else {
                world::intersect_line(ray, line, thresholds.line, i)
            };
            closest.offer(hit.hit, hit.distance, hit.point, || HitKind::Line {
                index: i,
                parameter: hit.parameter,
                color: line.color,
            });
        }
    }

    if config.show_faces {
        for (i, tri) in scene.triangles.iter().enumerate() {
            let hit = world::intersect_triangle(ray, tri.v0, tri.v1, tri.v2);
            closest.offer(hit.hit, hit.distance, hit.point, || HitKind::Triangle {
                index: i,
                normal: hit.normal,
                front_face: hit.front_face,
                color: tri.color,
            });
        }
    }

    closest.best
}
