//! wiretrace software ray tracer
//!
//! Renders wireframe and polygon models: vertices and edges drawn at a fixed
//! apparent size, Lambert-lit triangles with recursive mirror reflection, and
//! an analytic sky with a sun disc. The same closest-hit resolver serves
//! rendering and picking.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod config;
pub mod geometry;
pub mod hit;
pub mod intersect;
pub mod interval;
pub mod math;
pub mod output;
pub mod ray;
pub mod renderer;
pub mod resolver;
pub mod scene;
pub mod shading;

pub use camera::{Camera, CameraFrame};
pub use config::{CameraSettings, ConfigError, ConfigFile, ReflectionConfig, RenderConfig};
pub use geometry::{CoordinateAxes, Line, Triangle};
pub use hit::{EdgeHit, HitKind, LineHit, SceneHit, SegmentHit, TriangleHit, VertexHit};
pub use math::{reflect, Color, Point3};
pub use ray::Ray;
pub use renderer::{PixelBuffer, Renderer};
pub use resolver::{closest_hit, Thresholds};
pub use scene::{Model, Scene};
pub use shading::{sky_color, FrameContext};
