//! Frame driver.
//!
//! Renders every pixel of the current resolution into an owned, row-major
//! `f32` RGB buffer. Rows are distributed over the rayon pool; each worker
//! writes only its own row, and the configuration is copied once per frame.

use image::{ImageBuffer, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::camera::{pixel_to_ndc, Camera};
use crate::config::{ReflectionConfig, RenderConfig};
use crate::math::Color;
use crate::scene::Scene;
use crate::shading::FrameContext;

/// Linear RGB pixel buffer, every channel in [0, 1] after a frame.
pub type PixelBuffer = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// Owns the pixel buffer and renders frames into it.
pub struct Renderer {
    image: PixelBuffer,
    show_progress: bool,
}

impl Renderer {
    /// Create a renderer with a black `width` x `height` buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: ImageBuffer::new(width, height),
            show_progress: false,
        }
    }

    /// Current width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Draw a progress bar while rendering.
    pub fn set_show_progress(&mut self, show: bool) {
        self.show_progress = show;
    }

    /// Reallocate the buffer if the resolution changed.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        if width == self.width() && height == self.height() {
            return;
        }
        info!("Resolution changed to {width}x{height}");
        self.image = ImageBuffer::new(width, height);
    }

    /// Fill the buffer with one color.
    pub fn clear(&mut self, color: Color) {
        let c = clamp_color(color);
        for pixel in self.image.pixels_mut() {
            *pixel = c;
        }
    }

    /// Last rendered frame.
    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    /// Take the buffer out of the renderer.
    pub fn into_image(self) -> PixelBuffer {
        self.image
    }

    /// Color of pixel (x, y), `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Color::new(p[0], p[1], p[2]))
    }

    /// Render one frame, overwriting every pixel.
    ///
    /// Both configurations are copied before any pixel is shaded.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        render: &RenderConfig,
        reflection: &ReflectionConfig,
    ) -> &PixelBuffer {
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 {
            return &self.image;
        }

        let ctx = FrameContext::new(scene, camera, *render, *reflection);
        let frame = *ctx.frame();

        let start = std::time::Instant::now();
        let pb = if self.show_progress {
            let pb = ProgressBar::new(height as u64);
            let style = ProgressStyle::default_bar()
                .template("{bar:40} {pos}/{len} rows ETA: {eta}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style);
            pb
        } else {
            ProgressBar::hidden()
        };

        let row_len = width as usize * 3;
        self.image
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
                    let (ndc_x, ndc_y) = pixel_to_ndc(x as f32, y as f32, width, height);
                    let ray = frame.ray_through_ndc(ndc_x, ndc_y);
                    let Rgb(c) = clamp_color(ctx.cast_ray(&ray, 0));
                    pixel.copy_from_slice(&c);
                }
                pb.inc(1);
            });

        pb.finish_and_clear();
        debug!(
            "Frame {width}x{height} rendered in {:.2?} on {} threads",
            start.elapsed(),
            rayon::current_num_threads()
        );
        &self.image
    }
}

fn clamp_color(c: Color) -> Rgb<f32> {
    let c = c.clamp(Color::ZERO, Color::ONE);
    Rgb([c.x, c.y, c.z])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{CoordinateAxes, Triangle};
    use crate::scene::Model;
    use crate::shading::sky_color;
    use glam::Vec3A;

    fn camera() -> Camera {
        Camera::new(Vec3A::new(0.0, 0.0, 5.0), Vec3A::ZERO, Vec3A::Y, 1.0, 1.0)
    }

    #[test]
    fn empty_scene_renders_sky() {
        let scene = Scene::new();
        let cam = camera();
        let reflection = ReflectionConfig::default();
        let mut r = Renderer::new(8, 6);
        r.render(&scene, &cam, &RenderConfig::default(), &reflection);

        let frame = cam.frame();
        let (nx, ny) = pixel_to_ndc(3.0, 2.0, 8, 6);
        let expected = sky_color(frame.ray_through_ndc(nx, ny).direction, &reflection);
        let got = r.pixel(3, 2).unwrap();
        assert!((got - expected.clamp(Color::ZERO, Color::ONE)).length() < 1e-6);
    }

    #[test]
    fn output_is_clamped() {
        let scene = Scene {
            triangles: vec![Triangle::new(
                Vec3A::new(-10.0, -10.0, 0.0),
                Vec3A::new(10.0, -10.0, 0.0),
                Vec3A::new(0.0, 10.0, 0.0),
                Vec3A::ONE,
            )],
            ..Default::default()
        };
        let reflection = ReflectionConfig {
            enable_lambert_diffuse: false,
            enable_reflection: false,
            front_face_color: Vec3A::new(3.0, -1.0, 0.5),
            ..Default::default()
        };
        let mut r = Renderer::new(4, 4);
        r.render(&scene, &camera(), &RenderConfig::default(), &reflection);
        assert_eq!(r.pixel(2, 2), Some(Vec3A::new(1.0, 0.0, 0.5)));
    }

    #[test]
    fn every_pixel_is_overwritten() {
        let scene = Scene::from_model(&Model::pyramids(), &CoordinateAxes::default());
        let cam = Camera::from_orbit(Vec3A::ZERO, 9.0, 0.5, 0.8, 0.8, 1.5);
        let mut r = Renderer::new(24, 16);
        r.clear(Vec3A::new(-1.0, 2.0, 0.5));
        r.render(&scene, &cam, &RenderConfig::default(), &ReflectionConfig::default());
        for p in r.image().pixels() {
            assert!(p.0.iter().all(|c| (0.0..=1.0).contains(c)));
        }
        assert_eq!(r.image().as_raw().len(), 24 * 16 * 3);
    }

    #[test]
    fn resolution_change_reallocates() {
        let mut r = Renderer::new(4, 4);
        r.clear(Vec3A::ONE);
        r.set_resolution(4, 4);
        assert_eq!(r.pixel(0, 0), Some(Vec3A::ONE));
        r.set_resolution(10, 2);
        assert_eq!((r.width(), r.height()), (10, 2));
        assert_eq!(r.pixel(9, 1), Some(Vec3A::ZERO));
        assert!(r.pixel(10, 0).is_none());
    }

    #[test]
    fn zero_sized_frame_is_a_no_op() {
        let mut r = Renderer::new(0, 5);
        r.render(&Scene::new(), &camera(), &RenderConfig::default(), &ReflectionConfig::default());
        assert_eq!(r.image().as_raw().len(), 0);
    }
}
