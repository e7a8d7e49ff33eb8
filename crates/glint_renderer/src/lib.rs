//! glint renderer - CPU Phong ray tracing
//!
//! One primary ray per pixel, nearest hit against every triangle and sphere,
//! Phong shading with hard shadows, clamped 8-bit output. Rendering is a pure
//! function of a [`Scene`](glint_core::Scene) and a [`RenderConfig`]; the
//! pixel grid is split across a rayon pool by rows or by buckets.

mod bucket;
mod camera;
mod compositor;
mod intersect;
mod renderer;
mod shading;
mod shadow;

pub use bucket::{
    generate_buckets, render_bucket, render_bucketed, render_buckets, Bucket, BucketResult,
    DEFAULT_BUCKET_SIZE,
};
pub use camera::{Camera, ImageCorners};
pub use compositor::{color_to_rgb8, Compositor};
pub use intersect::{nearest_hit, ray_sphere, ray_triangle, Hit, Primitive, TRIANGLE_EPSILON};
pub use renderer::{ray_color, render, render_pixel, ImageBuffer, RenderConfig, SphereLighting};
pub use shading::{
    barycentric, shade_sphere, shade_triangle, Barycentric, LightContribution, ShadingContext,
};
pub use shadow::{is_occluded, TriangleShadowScan};

/// Re-export the scene types and math used in the public API
pub use glint_core::{Color, Light, Scene, Sphere, Triangle, Vertex};
pub use glint_math::{DVec3, Ray};
