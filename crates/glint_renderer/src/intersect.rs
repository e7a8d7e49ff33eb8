//! Ray-primitive intersection.
//!
//! Both solvers are pure functions of a ray and a primitive. They return the
//! ray parameter of the hit, or `None`. A returned parameter is always
//! strictly positive: hits behind the origin, and hits exactly at it, are
//! misses.

use glint_core::{Scene, Sphere, Triangle};
use glint_math::{Interval, Ray};

/// Below this the ray is parallel to the triangle plane, or the hit is
/// numerically at the ray origin.
pub const TRIANGLE_EPSILON: f64 = 1e-7;

/// Threshold on `c` below which the ray origin counts as inside the sphere.
const INSIDE_EPSILON: f64 = 1e-5;

/// Intersect a ray with a sphere.
///
/// Solves `a t^2 + b t + c = 0` with the cancellation-free form: one root
/// from `q = (-b +/- sqrt(disc)) / 2`, the companion from `c / q`. The sign
/// in front of the square root is chosen by whether the origin lies inside
/// the sphere. The smaller non-negative root wins.
pub fn ray_sphere(ray: &Ray, sphere: &Sphere) -> Option<f64> {
    let oc = ray.origin - sphere.center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * ray.direction.dot(oc);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sign = if c < -INSIDE_EPSILON { 1.0 } else { -1.0 };
    let q = (-b + sign * discriminant.sqrt()) / 2.0;

    let mut t0 = q / a;
    let mut t1 = c / q;
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }

    // Both roots behind the origin
    if t1 < 0.0 {
        return None;
    }

    let t = if t0 < 0.0 { t1 } else { t0 };
    Interval::POSITIVE.surrounds(t).then_some(t)
}

/// Intersect a ray with a triangle (edge vectors and determinant, with the
/// barycentric parameters checked before the distance).
pub fn ray_triangle(ray: &Ray, triangle: &Triangle) -> Option<f64> {
    let [v0, v1, v2] = triangle.positions();
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < TRIANGLE_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !Interval::UNIT.contains(u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > TRIANGLE_EPSILON).then_some(t)
}

/// Which scene object a ray hit, by index into its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangle(usize),
    Sphere(usize),
}

/// The nearest intersection along a primary ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub t: f64,
    pub primitive: Primitive,
}

/// Find the nearest hit by checking every primitive.
///
/// Triangles are scanned before spheres and a later primitive replaces the
/// current one only when strictly nearer, so ties go to the earlier one.
pub fn nearest_hit(ray: &Ray, scene: &Scene) -> Option<Hit> {
    let triangles = scene
        .triangles()
        .iter()
        .enumerate()
        .filter_map(|(i, tri)| ray_triangle(ray, tri).map(|t| (t, Primitive::Triangle(i))));

    let spheres = scene
        .spheres()
        .iter()
        .enumerate()
        .filter_map(|(i, sphere)| ray_sphere(ray, sphere).map(|t| (t, Primitive::Sphere(i))));

    let mut nearest: Option<Hit> = None;
    for (t, primitive) in triangles.chain(spheres) {
        match nearest {
            Some(hit) if hit.t <= t => {}
            _ => nearest = Some(Hit { t, primitive }),
        }
    }

    nearest
}
