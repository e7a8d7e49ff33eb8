//! Scene types for glint.
//!
//! A `Scene` is built once (usually by the loader) and then handed to the
//! renderer by shared reference. Nothing in this module is touched while a
//! frame is being rendered.

use std::fmt;

use glint_math::DVec3;
use thiserror::Error;

/// Color type alias (RGB values typically 0-1)
pub type Color = DVec3;

/// A triangle corner: position plus the material sampled at that corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: DVec3,
    /// Shading normal (need not be unit length; shading renormalizes)
    pub normal: DVec3,
    pub diffuse: Color,
    pub specular: Color,
    /// Phong exponent
    pub shininess: f64,
}

impl Vertex {
    /// Create a vertex with a matte grey material.
    pub fn new(position: DVec3, normal: DVec3) -> Self {
        Self {
            position,
            normal,
            diffuse: Color::splat(0.5),
            specular: Color::ZERO,
            shininess: 1.0,
        }
    }

    /// Set the material at this corner.
    pub fn with_material(mut self, diffuse: Color, specular: Color, shininess: f64) -> Self {
        self.diffuse = diffuse;
        self.specular = specular;
        self.shininess = shininess;
        self
    }
}

/// A flat triangle with per-vertex normals and materials.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Corner positions in declaration order.
    pub fn positions(&self) -> [DVec3; 3] {
        [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        ]
    }
}

/// An analytic sphere with a single material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f64,
}

impl Sphere {
    /// Create a sphere with a matte grey material.
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self {
            center,
            radius,
            diffuse: Color::splat(0.5),
            specular: Color::ZERO,
            shininess: 1.0,
        }
    }

    /// Set the sphere's material.
    pub fn with_material(mut self, diffuse: Color, specular: Color, shininess: f64) -> Self {
        self.diffuse = diffuse;
        self.specular = specular;
        self.shininess = shininess;
        self
    }
}

/// A point light. `color` doubles as the per-channel intensity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: DVec3,
    pub color: Color,
}

impl Light {
    pub fn new(position: DVec3, color: Color) -> Self {
        Self { position, color }
    }
}

/// The kinds of scene object that count against a capacity limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Triangle,
    Sphere,
    Light,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Triangle => f.write_str("triangles"),
            ObjectKind::Sphere => f.write_str("spheres"),
            ObjectKind::Light => f.write_str("lights"),
        }
    }
}

/// Adding an object would exceed the scene's configured limit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("too many {kind}: the limit is {limit}")]
pub struct CapacityError {
    pub kind: ObjectKind,
    pub limit: usize,
}

/// Upper bounds on the number of objects a scene may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneLimits {
    pub max_triangles: usize,
    pub max_spheres: usize,
    pub max_lights: usize,
}

impl SceneLimits {
    /// No limits at all.
    pub const UNBOUNDED: SceneLimits = SceneLimits {
        max_triangles: usize::MAX,
        max_spheres: usize::MAX,
        max_lights: usize::MAX,
    };
}

impl Default for SceneLimits {
    fn default() -> Self {
        Self {
            max_triangles: 2000,
            max_spheres: 10,
            max_lights: 10,
        }
    }
}

/// A static scene: ambient color plus ordered triangles, spheres and lights.
///
/// Object order is significant. Shadow tests exclude the shaded object by
/// its index, and sphere shading may consult only the first light.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Added once to every shaded pixel
    pub ambient: Color,

    triangles: Vec<Triangle>,
    spheres: Vec<Sphere>,
    lights: Vec<Light>,
    limits: SceneLimits,
}

impl Scene {
    /// Create an empty scene with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene with custom limits.
    pub fn with_limits(limits: SceneLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    /// Set the ambient color.
    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    /// Add a triangle, returning its index.
    pub fn add_triangle(&mut self, triangle: Triangle) -> Result<usize, CapacityError> {
        check_capacity(self.triangles.len(), self.limits.max_triangles, ObjectKind::Triangle)?;
        self.triangles.push(triangle);
        Ok(self.triangles.len() - 1)
    }

    /// Add a sphere, returning its index.
    pub fn add_sphere(&mut self, sphere: Sphere) -> Result<usize, CapacityError> {
        check_capacity(self.spheres.len(), self.limits.max_spheres, ObjectKind::Sphere)?;
        self.spheres.push(sphere);
        Ok(self.spheres.len() - 1)
    }

    /// Add a light, returning its index.
    pub fn add_light(&mut self, light: Light) -> Result<usize, CapacityError> {
        check_capacity(self.lights.len(), self.limits.max_lights, ObjectKind::Light)?;
        self.lights.push(light);
        Ok(self.lights.len() - 1)
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn limits(&self) -> SceneLimits {
        self.limits
    }

    /// Total number of triangles, spheres and lights.
    pub fn object_count(&self) -> usize {
        self.triangles.len() + self.spheres.len() + self.lights.len()
    }
}

fn check_capacity(len: usize, limit: usize, kind: ObjectKind) -> Result<(), CapacityError> {
    if len >= limit {
        return Err(CapacityError { kind, limit });
    }
    Ok(())
}
