//! Ray intersection library.
//!
//! Pure functions, no allocation, no logging. Each test returns a record
//! from [`crate::hit`]; a miss never yields NaN.
//!
//! - [`world`]: exact 3D tests (triangle, point, segment, line).
//! - [`screen`]: projected 2D tests for vertices and segments that keep a
//!   constant apparent size regardless of distance.
//! - [`visibility`]: occlusion test used when picking vertices.

pub mod screen;
pub mod visibility;
pub mod world;

pub use screen::{
    intersect_edge_screen_space, intersect_line_screen_space, intersect_segment_screen_space,
    intersect_vertex_screen_space,
};
pub use visibility::is_vertex_visible;
pub use world::{
    closest_approach, intersect_line, intersect_point, intersect_segment, intersect_triangle,
    point_in_triangle, PARALLEL_EPSILON,
};
