//! Recursive shading.
//!
//! Triangles get Lambert diffuse lighting and an optional mirror reflection
//! blended in by a per-orientation alpha. Vertices, edges and lines keep their
//! flat display color. Rays that escape resolve to an analytic sky with a sun
//! disc. The world is Z-up.

use glam::Vec3A;

use crate::camera::{Camera, CameraFrame};
use crate::config::{ReflectionConfig, RenderConfig};
use crate::hit::{HitKind, SceneHit};
use crate::math::{lerp, reflect, Color};
use crate::ray::Ray;
use crate::resolver::{closest_hit, Thresholds};
use crate::scene::Scene;

/// Sky color for a ray direction.
///
/// Inside the sun disc the color fades from horizon to sun with a squared
/// falloff. Elsewhere the sky blends from zenith to horizon by
/// `0.7 * sun_proximity + 0.3 * height^0.7`.
pub fn sky_color(direction: Vec3A, config: &ReflectionConfig) -> Color {
    let sun_alignment = direction.dot(config.sun_direction());

    if config.enable_sun {
        let angular_distance = sun_alignment.clamp(-1.0, 1.0).acos();
        if angular_distance < config.sun_angular_size {
            let falloff = (config.sun_angular_size - angular_distance) / config.sun_angular_size;
            return lerp(config.sky_horizon_color, config.sun_color, falloff * falloff);
        }
    }

    let sun_proximity = (sun_alignment + 1.0) * 0.5;
    let vertical = ((direction.z + 1.0) * 0.5).clamp(0.0, 1.0).powf(0.7);
    let weight = 0.7 * sun_proximity + 0.3 * vertical;
    lerp(config.sky_zenith_color, config.sky_horizon_color, weight)
}

/// Lambert term `base * ambient + base * max(0, n . -L) * diffuse`.
pub fn lambert(base: Color, normal: Vec3A, config: &ReflectionConfig) -> Color {
    let n_dot_l = normal.dot(-config.light_direction).max(0.0);
    base * config.ambient_strength + base * n_dot_l * config.diffuse_strength
}

/// `local * (1 - alpha) + reflected * alpha`.
pub fn blend(local: Color, reflected: Color, alpha: f32) -> Color {
    local * (1.0 - alpha) + reflected * alpha
}

/// Read-only state for shading one frame.
///
/// Configuration is held by value so nothing can change it mid-frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    scene: &'a Scene,
    frame: CameraFrame,
    render: RenderConfig,
    reflection: ReflectionConfig,
    thresholds: Thresholds,
}

impl<'a> FrameContext<'a> {
    /// Snapshot the configuration for a frame.
    pub fn new(scene: &'a Scene, camera: &Camera, render: RenderConfig, reflection: ReflectionConfig) -> Self {
        let thresholds = Thresholds::display(&render);
        Self {
            scene,
            frame: camera.frame(),
            render,
            reflection,
            thresholds,
        }
    }

    /// Camera basis for this frame.
    pub fn frame(&self) -> &CameraFrame {
        &self.frame
    }

    /// Sky color for `ray`.
    pub fn sky(&self, ray: &Ray) -> Color {
        sky_color(ray.direction, &self.reflection)
    }

    /// Nearest primitive along `ray` using display thresholds.
    pub fn trace(&self, ray: &Ray) -> Option<SceneHit> {
        closest_hit(ray, self.scene, &self.frame, &self.render, self.thresholds)
    }

    /// Color seen along `ray` at reflection depth `depth`.
    ///
    /// At `depth >= max_reflection_depth` this is always the sky.
    pub fn cast_ray(&self, ray: &Ray, depth: u32) -> Color {
        if depth >= self.reflection.max_reflection_depth {
            return self.sky(ray);
        }

        let Some(hit) = self.trace(ray) else {
            return self.sky(ray);
        };

        match hit.kind {
            HitKind::Vertex { color, .. } | HitKind::Edge { color, .. } | HitKind::Line { color, .. } => color,
            HitKind::Triangle {
                normal,
                front_face,
                color,
                ..
            } => self.shade_triangle(ray, &hit, normal, front_face, color, depth),
        }
    }

    fn base_color(&self, front_face: bool, triangle_color: Color) -> Color {
        match (front_face, self.reflection.use_triangle_colors) {
            (true, true) => triangle_color,
            (true, false) => self.reflection.front_face_color,
            (false, _) => self.reflection.back_face_color,
        }
    }

    fn shade_triangle(
        &self,
        ray: &Ray,
        hit: &SceneHit,
        normal: Vec3A,
        front_face: bool,
        triangle_color: Color,
        depth: u32,
    ) -> Color {
        let cfg = &self.reflection;
        let base = self.base_color(front_face, triangle_color);

        let local = if cfg.enable_lambert_diffuse {
            lambert(base, normal, cfg)
        } else {
            base
        };

        if !cfg.enable_reflection {
            return local;
        }

        let alpha = if front_face {
            cfg.front_face_reflection_alpha
        } else {
            cfg.back_face_reflection_alpha
        };
        if alpha <= 0.0 {
            return local;
        }

        let reflected_dir = reflect(ray.direction, normal);
        let reflected_ray = Ray::new(hit.point + normal * cfg.reflection_epsilon, reflected_dir);
        let reflected = self.cast_ray(&reflected_ray, depth + 1);
        blend(local, reflected, alpha)
    }
}
