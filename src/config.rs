//! Render configuration.
//!
//! [`RenderConfig`] and [`ReflectionConfig`] are long-lived plain values: the
//! application edits them between frames and the renderer copies them at the
//! start of each frame. Both can be loaded from a TOML file:
//!
//! ```toml
//! [render]
//! show_edges = true
//! vertex_display_radius = 0.02
//!
//! [reflection]
//! max_reflection_depth = 4
//! light_direction = [-1.0, 1.0, -1.0]
//!
//! [camera]
//! distance = 10.0
//! ```
//!
//! Every section and every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3A;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;
use crate::math::Color;

/// Upper bound on [`ReflectionConfig::max_reflection_depth`].
pub const MAX_REFLECTION_DEPTH: u32 = 10;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`ConfigFile`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be written back out as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A numeric value lies outside its allowed range.
    #[error("{name} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Key name
        name: &'static str,
        /// Offending value
        value: f32,
        /// Inclusive lower bound
        min: f32,
        /// Inclusive upper bound
        max: f32,
    },

    /// The light direction has zero length.
    #[error("light_direction must be non-zero")]
    ZeroLightDirection,

    /// The camera would sit on its own target.
    #[error("degenerate camera: {0}")]
    DegenerateCamera(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value, min, max })
    }
}

/// Per-frame toggles and hit thresholds.
///
/// Display thresholds control how large vertices and edges look on screen;
/// selection thresholds control pick tolerance. Both are in vertical NDC
/// units (1.0 is half the image height).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Draw and pick model vertices
    pub show_vertices: bool,
    /// Draw and pick model edges
    pub show_edges: bool,
    /// Draw and pick triangles
    pub show_faces: bool,
    /// Draw the reference axes
    pub show_coordinate_axes: bool,
    /// On-screen radius of a drawn vertex
    pub vertex_display_radius: f32,
    /// On-screen half-width of a drawn edge
    pub edge_display_thickness: f32,
    /// Pick radius for vertices
    pub vertex_selection_threshold: f32,
    /// Pick radius for edges and lines
    pub edge_selection_threshold: f32,
    /// On-screen half-width of reference lines, scaled by each line's thickness
    pub line_thickness: f32,
    /// Hits at or below this ray parameter are rejected
    pub ray_epsilon: f32,
    /// Flat color of drawn vertices
    pub vertex_color: Color,
    /// Skip occluded vertices when picking
    pub vertex_visibility_check: bool,
    /// Occluders must be this much closer than the vertex to hide it
    pub visibility_tolerance: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_vertices: true,
            show_edges: false,
            show_faces: true,
            show_coordinate_axes: true,
            vertex_display_radius: 0.015,
            edge_display_thickness: 0.01,
            vertex_selection_threshold: 0.05,
            edge_selection_threshold: 0.02,
            line_thickness: 0.01,
            ray_epsilon: 1e-4,
            vertex_color: Vec3A::ONE,
            vertex_visibility_check: true,
            visibility_tolerance: 1e-3,
        }
    }
}

impl RenderConfig {
    /// Reject negative thresholds.
    pub fn validated(self) -> Result<Self> {
        let non_negative = [
            ("vertex_display_radius", self.vertex_display_radius),
            ("edge_display_thickness", self.edge_display_thickness),
            ("vertex_selection_threshold", self.vertex_selection_threshold),
            ("edge_selection_threshold", self.edge_selection_threshold),
            ("line_thickness", self.line_thickness),
            ("ray_epsilon", self.ray_epsilon),
            ("visibility_tolerance", self.visibility_tolerance),
        ];
        for (name, value) in non_negative {
            check_range(name, value, 0.0, f32::MAX)?;
        }
        Ok(self)
    }
}

/// Shading, reflection and sky parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionConfig {
    /// Apply Lambert diffuse lighting to triangles
    pub enable_lambert_diffuse: bool,
    /// Direction light travels; the sun sits at `-light_direction`
    pub light_direction: Vec3A,
    /// Ambient term in [0, 1]
    pub ambient_strength: f32,
    /// Diffuse term in [0, 1]
    pub diffuse_strength: f32,

    /// Trace specular reflections off triangles
    pub enable_reflection: bool,
    /// Recursion bound; 0 renders only sky
    pub max_reflection_depth: u32,
    /// Offset along the normal before tracing a reflected ray
    pub reflection_epsilon: f32,

    /// Base color of front faces
    pub front_face_color: Color,
    /// Base color of back faces
    pub back_face_color: Color,
    /// Use each triangle's own color instead of `front_face_color` on front faces
    pub use_triangle_colors: bool,
    /// Share of the reflected color on front faces
    pub front_face_reflection_alpha: f32,
    /// Share of the reflected color on back faces
    pub back_face_reflection_alpha: f32,

    /// Draw a sun disc in the sky
    pub enable_sun: bool,
    /// Angular radius of the sun disc in radians
    pub sun_angular_size: f32,
    /// Sun disc color
    pub sun_color: Color,
    /// Sky color near the sun and the horizon
    pub sky_horizon_color: Color,
    /// Sky color away from the sun
    pub sky_zenith_color: Color,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            enable_lambert_diffuse: true,
            light_direction: Vec3A::new(-1.0, 1.0, -1.0).normalize(),
            ambient_strength: 0.3,
            diffuse_strength: 0.7,
            enable_reflection: true,
            max_reflection_depth: 3,
            reflection_epsilon: 1e-3,
            front_face_color: Vec3A::splat(0.7),
            back_face_color: Vec3A::new(0.5, 0.3, 0.3),
            use_triangle_colors: false,
            front_face_reflection_alpha: 0.2,
            back_face_reflection_alpha: 0.0,
            enable_sun: true,
            sun_angular_size: 0.05,
            sun_color: Vec3A::new(1.0, 0.95, 0.8),
            sky_horizon_color: Vec3A::new(0.8, 0.9, 1.0),
            sky_zenith_color: Vec3A::new(0.1, 0.1, 0.2),
        }
    }
}

impl ReflectionConfig {
    /// Check ranges and normalize `light_direction`.
    pub fn validated(mut self) -> Result<Self> {
        check_range("ambient_strength", self.ambient_strength, 0.0, 1.0)?;
        check_range("diffuse_strength", self.diffuse_strength, 0.0, 1.0)?;
        check_range("front_face_reflection_alpha", self.front_face_reflection_alpha, 0.0, 1.0)?;
        check_range("back_face_reflection_alpha", self.back_face_reflection_alpha, 0.0, 1.0)?;
        check_range("reflection_epsilon", self.reflection_epsilon, 0.0, f32::MAX)?;
        check_range(
            "max_reflection_depth",
            self.max_reflection_depth as f32,
            0.0,
            MAX_REFLECTION_DEPTH as f32,
        )?;
        check_range(
            "sun_angular_size",
            self.sun_angular_size,
            f32::MIN_POSITIVE,
            std::f32::consts::PI,
        )?;

        self.light_direction = self
            .light_direction
            .try_normalize()
            .ok_or(ConfigError::ZeroLightDirection)?;
        Ok(self)
    }

    /// Direction toward the sun.
    pub fn sun_direction(&self) -> Vec3A {
        -self.light_direction
    }
}

/// Orbit camera placement used by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Point the camera orbits and looks at
    pub target: Vec3A,
    /// Distance from the target
    pub distance: f32,
    /// Elevation above the XY plane, degrees
    pub pitch_degrees: f32,
    /// Rotation around Z, degrees (0 looks along +Y)
    pub yaw_degrees: f32,
    /// Vertical field of view, degrees
    pub fov_degrees: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            target: Vec3A::new(0.0, 0.0, 0.5),
            distance: 9.0,
            pitch_degrees: 30.0,
            yaw_degrees: 45.0,
            fov_degrees: 45.0,
        }
    }
}

impl CameraSettings {
    /// Build the camera for an image of the given aspect ratio.
    pub fn to_camera(&self, aspect_ratio: f32) -> Result<Camera> {
        if !(self.distance > 0.0 && self.distance.is_finite()) {
            return Err(ConfigError::DegenerateCamera(format!(
                "distance must be positive, got {}",
                self.distance
            )));
        }
        check_range("fov_degrees", self.fov_degrees, 1.0, 179.0)?;
        Ok(Camera::from_orbit(
            self.target,
            self.distance,
            self.pitch_degrees.to_radians(),
            self.yaw_degrees.to_radians(),
            self.fov_degrees.to_radians(),
            aspect_ratio,
        ))
    }
}

/// Top-level layout of a configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// `[render]` section
    pub render: RenderConfig,
    /// `[reflection]` section
    pub reflection: ReflectionConfig,
    /// `[camera]` section
    pub camera: CameraSettings,
}

impl ConfigFile {
    /// Parse and validate TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(input)?;
        file.validated()
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// Serialize as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate every section.
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            render: self.render.validated()?,
            reflection: self.reflection.validated()?,
            camera: self.camera,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ConfigFile::default().validated().is_ok());
        assert!(ConfigFile::default().camera.to_camera(1.5).is_ok());
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = ConfigFile::from_toml_str("").unwrap();
        assert_eq!(cfg.render, RenderConfig::default());
        assert_eq!(cfg.reflection.max_reflection_depth, 3);
    }

    #[test]
    fn partial_sections_override_only_named_keys() {
        let cfg = ConfigFile::from_toml_str(
            r#"
            [render]
            show_edges = true

            [reflection]
            max_reflection_depth = 5
            light_direction = [0.0, 0.0, -2.0]
            "#,
        )
        .unwrap();
        assert!(cfg.render.show_edges);
        assert!(cfg.render.show_vertices);
        assert_eq!(cfg.reflection.max_reflection_depth, 5);
        assert!((cfg.reflection.light_direction - Vec3A::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let too_deep = ReflectionConfig {
            max_reflection_depth: 11,
            ..Default::default()
        };
        assert!(matches!(too_deep.validated(), Err(ConfigError::OutOfRange { .. })));

        let bright = ReflectionConfig {
            ambient_strength: 1.5,
            ..Default::default()
        };
        assert!(bright.validated().is_err());

        let no_sun = ReflectionConfig {
            sun_angular_size: 0.0,
            ..Default::default()
        };
        assert!(no_sun.validated().is_err());

        let negative = RenderConfig {
            ray_epsilon: -1.0,
            ..Default::default()
        };
        assert!(negative.validated().is_err());
    }

    #[test]
    fn zero_light_direction_is_rejected() {
        let cfg = ReflectionConfig {
            light_direction: Vec3A::ZERO,
            ..Default::default()
        };
        assert!(matches!(cfg.validated(), Err(ConfigError::ZeroLightDirection)));
    }

    #[test]
    fn camera_on_target_is_rejected() {
        let settings = CameraSettings {
            distance: 0.0,
            ..Default::default()
        };
        assert!(matches!(settings.to_camera(1.0), Err(ConfigError::DegenerateCamera(_))));
    }

    #[test]
    fn printed_config_parses_back() {
        let text = ConfigFile::default().to_toml_string().unwrap();
        let parsed = ConfigFile::from_toml_str(&text).unwrap();
        assert_eq!(parsed.render, RenderConfig::default());
        assert_eq!(parsed.camera, CameraSettings::default());
    }

    #[test]
    fn unknown_toml_is_a_parse_error() {
        assert!(matches!(
            ConfigFile::from_toml_str("[render]\nshow_edges = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
