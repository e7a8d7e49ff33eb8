//! Phong shading for spheres and triangles.
//!
//! Every hit gets a fresh `ShadingContext` describing the surface point. The
//! scene data it was derived from is never written to; per-light results are
//! returned as values and handed to the compositor.

use glint_core::{Color, Light, Sphere, Triangle};
use glint_math::{DVec2, DVec3, Ray};

/// Below this fraction of its true area, a triangle's xy projection is
/// treated as edge-on and a different axis plane is used for the weights.
const EDGE_ON_RATIO: f64 = 1e-6;

/// Per-pixel surface state at a hit point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingContext {
    /// Unit direction of the ray that produced the hit
    pub direction: DVec3,
    /// World-space hit point
    pub point: DVec3,
    /// Unit surface normal
    pub normal: DVec3,
    /// Unit vector from the hit point back to the ray origin
    pub view: DVec3,
}

impl ShadingContext {
    /// Shading context for a sphere hit at ray parameter `t`.
    pub fn for_sphere(ray: &Ray, t: f64, sphere: &Sphere) -> Self {
        let point = ray.at(t);
        Self {
            direction: ray.direction,
            point,
            normal: (point - sphere.center).normalize(),
            view: (ray.origin - point).normalize(),
        }
    }

    /// Shading context for a triangle hit at ray parameter `t`, together with
    /// the barycentric weights used to blend the vertex attributes.
    pub fn for_triangle(ray: &Ray, t: f64, triangle: &Triangle) -> (Self, Barycentric) {
        let point = ray.at(t);
        let weights = barycentric(point, triangle);
        let [v0, v1, v2] = &triangle.vertices;

        let context = Self {
            direction: ray.direction,
            point,
            normal: weights.blend(v0.normal, v1.normal, v2.normal).normalize(),
            view: (ray.origin - point).normalize(),
        };

        (context, weights)
    }

    /// Unit vector from the hit point toward a light.
    pub fn light_direction(&self, light: &Light) -> DVec3 {
        (light.position - self.point).normalize()
    }
}

/// Barycentric weights of a point with respect to a triangle's corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Barycentric {
    /// Weighted sum of three per-vertex values.
    pub fn blend(&self, a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
        self.alpha * a + self.beta * b + self.gamma * c
    }

    pub fn sum(&self) -> f64 {
        self.alpha + self.beta + self.gamma
    }
}

/// Barycentric weights from the areas of the three sub-triangles that the
/// point forms with each pair of corners.
///
/// Areas are measured on the xy projection. A triangle seen edge-on in xy
/// (a wall or a floor) has no usable xy area, so it is measured on whichever
/// of the yz or xz planes it faces more.
pub fn barycentric(point: DVec3, triangle: &Triangle) -> Barycentric {
    let [a, b, c] = triangle.positions();
    let n = (b - a).cross(c - a);

    let project: fn(DVec3) -> DVec2 = if n.z.abs() > EDGE_ON_RATIO * n.length() {
        |v| v.truncate()
    } else if n.x.abs() >= n.y.abs() {
        |v| DVec2::new(v.y, v.z)
    } else {
        |v| DVec2::new(v.x, v.z)
    };

    let (p, a, b, c) = (project(point), project(a), project(b), project(c));
    let areas = [
        projected_area(p, b, c),
        projected_area(a, p, c),
        projected_area(a, b, p),
    ];
    let total = areas[0] + areas[1] + areas[2];

    Barycentric {
        alpha: areas[0] / total,
        beta: areas[1] / total,
        gamma: areas[2] / total,
    }
}

/// Unsigned area of a 2D triangle.
fn projected_area(p0: DVec2, p1: DVec2, p2: DVec2) -> f64 {
    (p0.x * (p1.y - p2.y) + p1.x * (p2.y - p0.y) + p2.x * (p0.y - p1.y)).abs() / 2.0
}

/// Diffuse and specular result for a single light, before light color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightContribution {
    pub diffuse: Color,
    pub specular: Color,
}

impl LightContribution {
    /// Contribution of a light that cannot see the point.
    pub const DARK: LightContribution = LightContribution {
        diffuse: Color::ZERO,
        specular: Color::ZERO,
    };

    pub fn total(&self) -> Color {
        self.diffuse + self.specular
    }
}

/// The two clamped cosines of the Phong model.
#[derive(Debug, Clone, Copy)]
struct PhongTerms {
    /// max(0, L.N)
    diffuse: f64,
    /// max(0, R.V), not yet raised to the shininess
    specular: f64,
}

fn phong_terms(context: &ShadingContext, light_dir: DVec3) -> PhongTerms {
    let l_dot_n = light_dir.dot(context.normal).max(0.0);

    // r = 2(l.n)n - l
    let reflection = (2.0 * l_dot_n * context.normal - light_dir).normalize();
    let r_dot_v = reflection.dot(context.view).max(0.0);

    PhongTerms {
        diffuse: l_dot_n,
        specular: r_dot_v,
    }
}

/// Phong terms for one light at a sphere hit.
pub fn shade_sphere(
    context: &ShadingContext,
    sphere: &Sphere,
    light_dir: DVec3,
) -> LightContribution {
    let terms = phong_terms(context, light_dir);

    LightContribution {
        diffuse: sphere.diffuse * terms.diffuse,
        specular: sphere.specular * terms.specular.powf(sphere.shininess),
    }
}

/// Phong terms for one light at a triangle hit.
///
/// The specular term is evaluated at each corner with that corner's
/// shininess and then blended, rather than blending the shininess.
pub fn shade_triangle(
    context: &ShadingContext,
    weights: &Barycentric,
    triangle: &Triangle,
    light_dir: DVec3,
) -> LightContribution {
    let terms = phong_terms(context, light_dir);
    let [v0, v1, v2] = &triangle.vertices;

    let diffuse = weights.blend(v0.diffuse, v1.diffuse, v2.diffuse) * terms.diffuse;
    let specular = weights.blend(
        v0.specular * terms.specular.powf(v0.shininess),
        v1.specular * terms.specular.powf(v1.shininess),
        v2.specular * terms.specular.powf(v2.shininess),
    );

    LightContribution { diffuse, specular }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::Vertex;

    const EPS: f64 = 1e-9;

    fn triangle(a: DVec3, b: DVec3, c: DVec3) -> Triangle {
        let n = (b - a).cross(c - a).normalize();
        Triangle::new(Vertex::new(a, n), Vertex::new(b, n), Vertex::new(c, n))
    }

    #[test]
    fn test_barycentric_sums_to_one() {
        let tri = triangle(
            DVec3::new(-1.0, -1.0, -3.0),
            DVec3::new(2.0, -0.5, -4.0),
            DVec3::new(0.0, 1.5, -2.5),
        );
        let [a, b, c] = tri.positions();

        for (wa, wb) in [(0.2, 0.3), (0.6, 0.1), (0.05, 0.9), (1.0 / 3.0, 1.0 / 3.0)] {
            let p = wa * a + wb * b + (1.0 - wa - wb) * c;
            let w = barycentric(p, &tri);
            assert!((w.sum() - 1.0).abs() < EPS);
            assert!((w.alpha - wa).abs() < 1e-9);
            assert!((w.beta - wb).abs() < 1e-9);
        }
    }

    #[test]
    fn test_barycentric_at_corner() {
        let tri = triangle(
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(0.0, 1.0, -1.0),
        );
        let w = barycentric(DVec3::new(1.0, 0.0, -1.0), &tri);
        assert!((w.beta - 1.0).abs() < EPS);
        assert!(w.alpha.abs() < EPS);
        assert!(w.gamma.abs() < EPS);
    }

    #[test]
    fn test_barycentric_edge_on_triangle() {
        // A floor: zero area when projected onto xy
        let tri = triangle(
            DVec3::new(-1.0, -1.0, -1.0),
            DVec3::new(1.0, -1.0, -1.0),
            DVec3::new(0.0, -1.0, -3.0),
        );
        let [a, b, c] = tri.positions();
        let p = 0.5 * a + 0.25 * b + 0.25 * c;

        let w = barycentric(p, &tri);
        assert!(w.sum().is_finite());
        assert!((w.sum() - 1.0).abs() < EPS);
        assert!((w.alpha - 0.5).abs() < EPS);
    }

    #[test]
    fn test_sphere_diffuse_facing_light() {
        let sphere = Sphere::new(DVec3::ZERO, 1.0).with_material(
            Color::new(0.5, 0.25, 1.0),
            Color::ZERO,
            10.0,
        );
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
        let context = ShadingContext::for_sphere(&ray, 4.0, &sphere);
        let light = Light::new(DVec3::new(0.0, 0.0, 10.0), Color::ONE);

        assert!((context.normal - DVec3::Z).length() < EPS);
        let l = context.light_direction(&light);
        assert!((l.dot(context.normal) - 1.0).abs() < EPS);

        let c = shade_sphere(&context, &sphere, l);
        assert!((c.diffuse - sphere.diffuse).length() < EPS);
        assert_eq!(c.specular, Color::ZERO);
    }

    #[test]
    fn test_specular_peaks_on_mirror_direction() {
        let sphere = Sphere::new(DVec3::ZERO, 1.0).with_material(
            Color::ZERO,
            Color::new(1.0, 0.5, 0.25),
            50.0,
        );
        // Viewer and light both straight above the pole: R == V
        let ray = Ray::new(DVec3::new(0.0, 3.0, 0.0), DVec3::new(0.0, -1.0, 0.0));
        let context = ShadingContext::for_sphere(&ray, 2.0, &sphere);
        let l = context.light_direction(&Light::new(DVec3::new(0.0, 9.0, 0.0), Color::ONE));

        let c = shade_sphere(&context, &sphere, l);
        assert!((c.specular - sphere.specular).length() < EPS);

        // Off-mirror view falls off with the exponent
        let pole = DVec3::new(0.0, 1.0, 0.0);
        let eye = DVec3::new(1.0, 3.0, 0.0);
        let side = Ray::new(eye, (pole - eye).normalize());
        let t = (pole - eye).length();
        let context = ShadingContext::for_sphere(&side, t, &sphere);
        let c = shade_sphere(&context, &sphere, l);
        assert!(c.specular.x < sphere.specular.x);
        assert!(c.specular.x > 0.0);
    }

    #[test]
    fn test_light_behind_surface_is_clamped() {
        let sphere = Sphere::new(DVec3::ZERO, 1.0).with_material(Color::ONE, Color::ONE, 1.0);
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
        let context = ShadingContext::for_sphere(&ray, 4.0, &sphere);
        let l = context.light_direction(&Light::new(DVec3::new(0.0, 0.0, -10.0), Color::ONE));

        let c = shade_sphere(&context, &sphere, l);
        assert_eq!(c.diffuse, Color::ZERO);
        // r = -l points straight at the viewer, but l.n was clamped first
        assert!(c.specular.min_element() >= 0.0);
    }

    #[test]
    fn test_triangle_blends_vertex_materials() {
        let n = DVec3::Z;
        let tri = Triangle::new(
            Vertex::new(DVec3::new(-1.0, -1.0, -2.0), n).with_material(Color::X, Color::ZERO, 1.0),
            Vertex::new(DVec3::new(1.0, -1.0, -2.0), n).with_material(Color::Y, Color::ZERO, 1.0),
            Vertex::new(DVec3::new(0.0, 1.0, -2.0), n).with_material(Color::Z, Color::ZERO, 1.0),
        );
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let (context, weights) = ShadingContext::for_triangle(&ray, 2.0, &tri);
        let l = context.light_direction(&Light::new(DVec3::new(0.0, 0.0, 100.0), Color::ONE));

        let c = shade_triangle(&context, &weights, &tri, l);
        let cos = l.dot(DVec3::Z);
        let expected = Color::new(weights.alpha, weights.beta, weights.gamma) * cos;
        assert!((c.diffuse - expected).length() < EPS);
        assert!((weights.sum() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_triangle_normal_is_renormalized() {
        let tri = Triangle::new(
            Vertex::new(DVec3::new(-1.0, -1.0, -2.0), DVec3::new(0.0, 0.0, 3.0)),
            Vertex::new(DVec3::new(1.0, -1.0, -2.0), DVec3::new(1.0, 0.0, 1.0)),
            Vertex::new(DVec3::new(0.0, 1.0, -2.0), DVec3::new(0.0, 2.0, 2.0)),
        );
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let (context, _) = ShadingContext::for_triangle(&ray, 2.0, &tri);
        assert!((context.normal.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_dark_contribution() {
        assert_eq!(LightContribution::DARK.total(), Color::ZERO);
    }
}
