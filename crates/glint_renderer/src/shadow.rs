//! Hard shadow tests.
//!
//! A shadow ray starts at the hit point with no offset and runs toward the
//! light. Any intersection in front of it blocks the light, even one farther
//! away than the light itself. Self-intersection is avoided by skipping the
//! shaded primitive by index.

use glint_core::Scene;
use glint_math::{DVec3, Ray};

use crate::intersect::{ray_sphere, ray_triangle, Primitive};

/// Which triangles a shadow ray from a triangle hit is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriangleShadowScan {
    /// Every triangle except the shaded one.
    #[default]
    All,
    /// Every triangle except the shaded one and the last triangle in the
    /// scene. Reproduces renders made with a loop bound one short.
    SkipLast,
}

/// Returns true when something blocks the light as seen from `point`.
///
/// `light_dir` is the unit direction toward the light. Shadow rays from a
/// sphere hit are tested against the other spheres and every triangle;
/// from a triangle hit, against the other triangles (subject to `scan`)
/// and every sphere.
pub fn is_occluded(
    scene: &Scene,
    point: DVec3,
    light_dir: DVec3,
    shaded: Primitive,
    scan: TriangleShadowScan,
) -> bool {
    let ray = Ray::new(point, light_dir);

    let triangle_count = match (shaded, scan) {
        (Primitive::Triangle(_), TriangleShadowScan::SkipLast) => {
            scene.triangles().len().saturating_sub(1)
        }
        _ => scene.triangles().len(),
    };

    let blocked_by_triangle = scene.triangles()[..triangle_count]
        .iter()
        .enumerate()
        .filter(|&(i, _)| shaded != Primitive::Triangle(i))
        .any(|(_, tri)| ray_triangle(&ray, tri).is_some());

    if blocked_by_triangle {
        return true;
    }

    scene
        .spheres()
        .iter()
        .enumerate()
        .filter(|&(i, _)| shaded != Primitive::Sphere(i))
        .any(|(_, sphere)| ray_sphere(&ray, sphere).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{Sphere, Triangle, Vertex};

    fn floor_triangle() -> Triangle {
        // Large triangle in the plane z = -4
        Triangle::new(
            Vertex::new(DVec3::new(-20.0, -20.0, -4.0), DVec3::Z),
            Vertex::new(DVec3::new(20.0, -20.0, -4.0), DVec3::Z),
            Vertex::new(DVec3::new(0.0, 20.0, -4.0), DVec3::Z),
        )
    }

    fn small_triangle(z: f64) -> Triangle {
        Triangle::new(
            Vertex::new(DVec3::new(-1.0, -1.0, z), DVec3::Z),
            Vertex::new(DVec3::new(1.0, -1.0, z), DVec3::Z),
            Vertex::new(DVec3::new(0.0, 1.0, z), DVec3::Z),
        )
    }

    #[test]
    fn test_sphere_blocks_triangle() {
        let mut scene = Scene::new();
        scene.add_triangle(floor_triangle()).unwrap();
        scene.add_sphere(Sphere::new(DVec3::new(0.0, 0.0, -2.0), 0.5)).unwrap();

        let point = DVec3::new(0.0, 0.0, -4.0);
        assert!(is_occluded(
            &scene,
            point,
            DVec3::Z,
            Primitive::Triangle(0),
            TriangleShadowScan::All
        ));

        // Light off to the side: clear
        let dir = DVec3::new(1.0, 0.0, 1.0).normalize();
        assert!(!is_occluded(
            &scene,
            point,
            dir,
            Primitive::Triangle(0),
            TriangleShadowScan::All
        ));
    }

    #[test]
    fn test_triangle_blocks_sphere() {
        let mut scene = Scene::new();
        scene.add_triangle(small_triangle(2.0)).unwrap();
        scene.add_sphere(Sphere::new(DVec3::ZERO, 1.0)).unwrap();

        let top = DVec3::new(0.0, 0.0, 1.0);
        assert!(is_occluded(
            &scene,
            top,
            DVec3::Z,
            Primitive::Sphere(0),
            TriangleShadowScan::All
        ));
    }

    #[test]
    fn test_shaded_object_is_excluded() {
        let mut scene = Scene::new();
        scene.add_sphere(Sphere::new(DVec3::ZERO, 1.0)).unwrap();

        // From the near side, the ray toward the light passes through the
        // sphere itself; only other objects count.
        let point = DVec3::new(0.0, 0.0, -1.0);
        assert!(!is_occluded(
            &scene,
            point,
            DVec3::Z,
            Primitive::Sphere(0),
            TriangleShadowScan::All
        ));
    }

    #[test]
    fn test_other_sphere_blocks() {
        let mut scene = Scene::new();
        scene.add_sphere(Sphere::new(DVec3::ZERO, 1.0)).unwrap();
        scene.add_sphere(Sphere::new(DVec3::new(0.0, 3.0, 0.0), 1.0)).unwrap();

        let point = DVec3::new(0.0, 1.0, 0.0);
        assert!(is_occluded(
            &scene,
            point,
            DVec3::Y,
            Primitive::Sphere(0),
            TriangleShadowScan::All
        ));
        assert!(!is_occluded(
            &scene,
            point,
            DVec3::X,
            Primitive::Sphere(0),
            TriangleShadowScan::All
        ));
    }

    #[test]
    fn test_blocker_beyond_light_still_blocks() {
        let mut scene = Scene::new();
        scene.add_triangle(floor_triangle()).unwrap();
        scene.add_sphere(Sphere::new(DVec3::new(0.0, 0.0, 100.0), 1.0)).unwrap();

        assert!(is_occluded(
            &scene,
            DVec3::new(0.0, 0.0, -4.0),
            DVec3::Z,
            Primitive::Triangle(0),
            TriangleShadowScan::All
        ));
    }

    #[test]
    fn test_skip_last_ignores_final_triangle() {
        let mut scene = Scene::new();
        scene.add_triangle(floor_triangle()).unwrap();
        scene.add_triangle(small_triangle(-2.0)).unwrap();

        let point = DVec3::new(0.0, 0.0, -4.0);
        assert!(is_occluded(
            &scene,
            point,
            DVec3::Z,
            Primitive::Triangle(0),
            TriangleShadowScan::All
        ));
        assert!(!is_occluded(
            &scene,
            point,
            DVec3::Z,
            Primitive::Triangle(0),
            TriangleShadowScan::SkipLast
        ));
    }

    #[test]
    fn test_skip_last_only_applies_to_triangle_hits() {
        let mut scene = Scene::new();
        scene.add_triangle(small_triangle(3.0)).unwrap();
        scene.add_sphere(Sphere::new(DVec3::ZERO, 1.0)).unwrap();

        assert!(is_occluded(
            &scene,
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::Z,
            Primitive::Sphere(0),
            TriangleShadowScan::SkipLast
        ));
    }

    #[test]
    fn test_empty_scene_never_occludes() {
        assert!(!is_occluded(
            &Scene::new(),
            DVec3::ZERO,
            DVec3::Z,
            Primitive::Sphere(0),
            TriangleShadowScan::All
        ));
    }
}
