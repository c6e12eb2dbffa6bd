//! Occlusion test for vertex picking.

use glam::Vec3A;

use crate::geometry::Triangle;
use crate::intersect::world::intersect_triangle;
use crate::ray::Ray;

/// Whether `vertex` can be seen from `eye` past `triangles`.
///
/// A vertex is occluded when some triangle is hit closer than the vertex by
/// more than `tolerance`. Triangles that have the vertex as a corner are
/// skipped, so a vertex is never hidden by its own faces.
pub fn is_vertex_visible(eye: Vec3A, vertex: Vec3A, triangles: &[Triangle], tolerance: f32) -> bool {
    let Some(ray) = Ray::from_points(eye, vertex) else {
        return true;
    };
    let vertex_distance = (vertex - eye).length();

    !triangles
        .iter()
        .filter(|tri| !tri.has_corner(vertex))
        .any(|tri| {
            let hit = intersect_triangle(&ray, tri.v0, tri.v1, tri.v2);
            hit.hit && hit.distance < vertex_distance - tolerance
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(z: f32) -> Triangle {
        Triangle::new(
            Vec3A::new(-5.0, -5.0, z),
            Vec3A::new(5.0, -5.0, z),
            Vec3A::new(0.0, 5.0, z),
            Vec3A::ONE,
        )
    }

    #[test]
    fn vertex_behind_wall_is_hidden() {
        let eye = Vec3A::new(0.0, 0.0, 10.0);
        let vertex = Vec3A::new(0.0, 0.0, -1.0);
        assert!(!is_vertex_visible(eye, vertex, &[wall(0.0)], 1e-3));
    }

    #[test]
    fn vertex_in_front_of_wall_is_visible() {
        let eye = Vec3A::new(0.0, 0.0, 10.0);
        let vertex = Vec3A::new(0.0, 0.0, 1.0);
        assert!(is_vertex_visible(eye, vertex, &[wall(0.0)], 1e-3));
    }

    #[test]
    fn own_faces_do_not_occlude() {
        let eye = Vec3A::new(0.0, 0.0, 10.0);
        let tri = wall(0.0);
        assert!(is_vertex_visible(eye, tri.v2, &[tri], 1e-3));
    }

    #[test]
    fn vertex_on_a_face_is_within_tolerance() {
        let eye = Vec3A::new(0.0, 0.0, 10.0);
        let vertex = Vec3A::new(0.0, 0.0, 0.0);
        assert!(is_vertex_visible(eye, vertex, &[wall(0.0)], 1e-3));
    }
}
