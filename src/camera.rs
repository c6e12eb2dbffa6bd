//! Camera pose and primary ray generation.
//!
//! The camera is a plain value: the view and projection matrices are
//! recomputed on every call instead of being cached behind dirty flags.

use glam::{Mat4, Vec2, Vec3, Vec3A};

use crate::math::{safe_inverse, VECTOR_EPSILON};
use crate::ray::Ray;

/// Points closer than this to the eye plane cannot be projected.
pub const NEAR_DEPTH: f32 = 1e-4;

/// Maximum pitch magnitude accepted by [`Camera::from_orbit`], avoiding the pole.
const MAX_ORBIT_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Pinhole camera described by a look-at pose.
///
/// The core never owns or persists camera state; callers build one per frame
/// (or keep one around and mutate its public fields between frames).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Point camera is looking from (camera position)
    pub lookfrom: Vec3A,
    /// Point camera is looking at (look target)
    pub lookat: Vec3A,
    /// Camera-relative "up" direction vector
    pub vup: Vec3A,
    /// Vertical field of view in radians
    pub vfov: f32,
    /// Width / height of the image plane
    pub aspect_ratio: f32,
    /// Near clipping plane, only used by the matrix path
    pub near: f32,
    /// Far clipping plane, only used by the matrix path
    pub far: f32,
}

impl Default for Camera {
    /// Z-up camera five units in front of the origin, 45 degree FOV.
    fn default() -> Self {
        Self {
            lookfrom: Vec3A::new(0.0, -5.0, 0.0),
            lookat: Vec3A::ZERO,
            vup: Vec3A::Z,
            vfov: 45.0_f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Creates a camera from a look-at pose.
    pub fn new(lookfrom: Vec3A, lookat: Vec3A, vup: Vec3A, vfov: f32, aspect_ratio: f32) -> Self {
        Self {
            lookfrom,
            lookat,
            vup,
            vfov,
            aspect_ratio,
            ..Self::default()
        }
    }

    /// Camera orbiting `target` in a Z-up world.
    ///
    /// Yaw rotates around Z (0 looks along +Y), pitch lifts the eye above the
    /// horizontal plane and is clamped just short of the poles.
    pub fn from_orbit(target: Vec3A, distance: f32, pitch: f32, yaw: f32, vfov: f32, aspect_ratio: f32) -> Self {
        let pitch = pitch.clamp(-MAX_ORBIT_PITCH, MAX_ORBIT_PITCH);
        let distance = distance.max(0.1);
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let offset = Vec3A::new(
            distance * cos_pitch * sin_yaw,
            -distance * cos_pitch * cos_yaw,
            distance * sin_pitch,
        );
        Self::new(target + offset, target, Vec3A::Z, vfov, aspect_ratio)
    }

    /// Orthonormal basis for ray generation and screen projection.
    pub fn frame(&self) -> CameraFrame {
        let forward = (self.lookat - self.lookfrom).normalize_or_zero();
        let mut right = forward.cross(self.vup).normalize_or_zero();
        if right == Vec3A::ZERO && forward != Vec3A::ZERO {
            // Looking along the up vector; any perpendicular keeps the basis usable.
            right = forward.any_orthonormal_vector();
        }
        let up = right.cross(forward);

        CameraFrame {
            origin: self.lookfrom,
            forward,
            right,
            up,
            tan_half_fov: (self.vfov * 0.5).tan(),
            aspect_ratio: self.aspect_ratio,
        }
    }

    /// Generate the primary ray through pixel (x, y) of a `width` x `height` image.
    ///
    /// Row 0 is the top of the image.
    pub fn get_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let (ndc_x, ndc_y) = pixel_to_ndc(x as f32, y as f32, width, height);
        self.frame().ray_through_ndc(ndc_x, ndc_y)
    }

    /// Right-handed view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::from(self.lookfrom), Vec3::from(self.lookat), Vec3::from(self.vup))
    }

    /// OpenGL-style perspective projection (depth in [-1, 1]).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.vfov, self.aspect_ratio, self.near, self.far)
    }

    /// Projection times view.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unproject a window coordinate into a world ray through the inverse
    /// view-projection matrix.
    ///
    /// A singular matrix degrades to identity; `None` is returned only when
    /// the unprojected near and far points coincide.
    pub fn screen_to_world_ray(&self, screen_x: f32, screen_y: f32, width: u32, height: u32) -> Option<Ray> {
        let (ndc_x, ndc_y) = pixel_to_ndc(screen_x, screen_y, width, height);
        let inv = safe_inverse(&self.view_projection_matrix());
        let near = Vec3A::from(inv.project_point3(Vec3::new(ndc_x, ndc_y, -1.0)));
        let far = Vec3A::from(inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0)));
        Ray::try_new(self.lookfrom, far - near)
    }
}

/// Map a pixel coordinate to normalized device coordinates in [-1, 1].
///
/// Smaller row indices map to larger vertical values (y up).
pub fn pixel_to_ndc(x: f32, y: f32, width: u32, height: u32) -> (f32, f32) {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    (2.0 * x / w - 1.0, 1.0 - 2.0 * y / h)
}

/// Camera basis derived from a [`Camera`] pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    /// Eye position.
    pub origin: Vec3A,
    /// Unit view direction.
    pub forward: Vec3A,
    /// Unit right vector, `forward x up`.
    pub right: Vec3A,
    /// Re-orthogonalized up vector, `right x forward`.
    pub up: Vec3A,
    /// `tan(vfov / 2)`.
    pub tan_half_fov: f32,
    /// Width / height.
    pub aspect_ratio: f32,
}

impl CameraFrame {
    /// Ray from the eye through a point given in normalized device coordinates.
    pub fn ray_through_ndc(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let direction = self.forward
            + self.right * (ndc_x * self.aspect_ratio * self.tan_half_fov)
            + self.up * (ndc_y * self.tan_half_fov);
        Ray::new(self.origin, direction)
    }

    /// Express a world point in camera space: x right, y up, z depth along forward.
    pub fn to_local(&self, p: Vec3A) -> Vec3A {
        let d = p - self.origin;
        Vec3A::new(d.dot(self.right), d.dot(self.up), d.dot(self.forward))
    }

    /// Scale that maps the tangent plane to vertical NDC units.
    fn inv_tan(&self) -> f32 {
        if self.tan_half_fov.abs() < VECTOR_EPSILON {
            1.0
        } else {
            1.0 / self.tan_half_fov
        }
    }

    /// Project a camera-space point onto the screen plane.
    ///
    /// Units are vertical NDC (1.0 is half the image height) on both axes so a
    /// radius stays circular.
    pub fn project_local(&self, local: Vec3A) -> Option<Vec2> {
        if local.z <= NEAR_DEPTH {
            return None;
        }
        let s = self.inv_tan() / local.z;
        Some(Vec2::new(local.x * s, local.y * s))
    }

    /// Project a world point onto the screen plane; `None` when behind the eye.
    pub fn project_point(&self, p: Vec3A) -> Option<Vec2> {
        self.project_local(self.to_local(p))
    }

    /// Project a direction (as if emitted from the eye) onto the screen plane.
    pub fn project_direction(&self, d: Vec3A) -> Option<Vec2> {
        let local = Vec3A::new(d.dot(self.right), d.dot(self.up), d.dot(self.forward));
        if local.z <= VECTOR_EPSILON {
            return None;
        }
        let s = self.inv_tan() / local.z;
        Some(Vec2::new(local.x * s, local.y * s))
    }

    /// Whether `p` coincides with the eye, i.e. a ray from `p` is a camera ray.
    pub fn is_eye(&self, p: Vec3A) -> bool {
        (p - self.origin).length_squared() < NEAR_DEPTH * NEAR_DEPTH
    }
}
