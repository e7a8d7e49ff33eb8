//! Whole-frame rendering.
//!
//! Ties the camera, intersection, shading, shadow and compositing stages
//! together. Rows are shaded in parallel on a rayon pool; every pixel only
//! reads the scene, so the result does not depend on how the work is split.

use std::time::Instant;

use glint_core::{Color, Light, Scene};
use glint_math::{DVec3, Ray};
use log::{info, warn};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::compositor::{color_to_rgb8, Compositor};
use crate::intersect::{nearest_hit, Hit, Primitive};
use crate::shading::{shade_sphere, shade_triangle, LightContribution, ShadingContext};
use crate::shadow::{is_occluded, TriangleShadowScan};

/// Which lights illuminate spheres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SphereLighting {
    /// Only the scene's first light. With no lights, spheres get ambient only.
    #[default]
    FirstLight,
    /// Every light, like triangles.
    AllLights,
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Vertical field of view in degrees
    pub field_of_view: f64,
    /// Ray origin; the view direction is always -z
    pub eye: DVec3,
    /// Color of pixels whose ray hits nothing
    pub background: Color,
    pub sphere_lighting: SphereLighting,
    pub triangle_shadow_scan: TriangleShadowScan,
    /// Worker threads (0 = rayon's global pool)
    pub threads: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            field_of_view: 60.0,
            eye: DVec3::ZERO,
            background: Color::ZERO,
            sphere_lighting: SphereLighting::FirstLight,
            triangle_shadow_scan: TriangleShadowScan::All,
            threads: 0,
        }
    }
}

impl RenderConfig {
    /// The camera described by this configuration.
    pub fn camera(&self) -> Camera {
        Camera::new()
            .with_resolution(self.width, self.height)
            .with_fov(self.field_of_view)
            .with_eye(self.eye)
    }
}

/// Compute the color seen by a primary ray.
pub fn ray_color(ray: &Ray, scene: &Scene, config: &RenderConfig) -> Color {
    match nearest_hit(ray, scene) {
        Some(hit) => shade_hit(ray, &hit, scene, config),
        None => config.background,
    }
}

/// Shade a hit: every contributing light is shadow tested and shaded, then
/// the compositor adds ambient and clamps.
fn shade_hit(ray: &Ray, hit: &Hit, scene: &Scene, config: &RenderConfig) -> Color {
    let mut compositor = Compositor::new();

    match hit.primitive {
        Primitive::Sphere(index) => {
            let sphere = &scene.spheres()[index];
            let context = ShadingContext::for_sphere(ray, hit.t, sphere);

            let light_count = match config.sphere_lighting {
                SphereLighting::FirstLight => 1,
                SphereLighting::AllLights => usize::MAX,
            };

            for light in scene.lights().iter().take(light_count) {
                let contribution = light_contribution(scene, &context, hit, light, config, |l| {
                    shade_sphere(&context, sphere, l)
                });
                compositor.add_light(light, &contribution);
            }
        }
        Primitive::Triangle(index) => {
            let triangle = &scene.triangles()[index];
            let (context, weights) = ShadingContext::for_triangle(ray, hit.t, triangle);

            for light in scene.lights() {
                let contribution = light_contribution(scene, &context, hit, light, config, |l| {
                    shade_triangle(&context, &weights, triangle, l)
                });
                compositor.add_light(light, &contribution);
            }
        }
    }

    compositor.finish(scene.ambient)
}

fn light_contribution(
    scene: &Scene,
    context: &ShadingContext,
    hit: &Hit,
    light: &Light,
    config: &RenderConfig,
    shade: impl FnOnce(DVec3) -> LightContribution,
) -> LightContribution {
    let light_dir = context.light_direction(light);
    if is_occluded(
        scene,
        context.point,
        light_dir,
        hit.primitive,
        config.triangle_shadow_scan,
    ) {
        LightContribution::DARK
    } else {
        shade(light_dir)
    }
}

/// Render a single pixel, with row 0 at the top of the image.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    row: u32,
    config: &RenderConfig,
) -> Color {
    let ray = camera.get_ray(x, row);
    ray_color(&ray, scene, config)
}

/// An 8-bit RGB image, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, row).
    pub fn get(&self, x: u32, row: u32) -> [u8; 3] {
        self.pixels[self.index(x, row)]
    }

    /// Set the pixel at (x, row).
    pub fn set(&mut self, x: u32, row: u32, rgb: [u8; 3]) {
        let index = self.index(x, row);
        self.pixels[index] = rgb;
    }

    /// Tightly packed RGB bytes (for encoding or display).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: u32, row: u32) -> usize {
        row as usize * self.width as usize + x as usize
    }
}

/// Run `op` on a pool with `threads` workers, or on rayon's global pool when
/// `threads` is 0.
pub(crate) fn with_thread_pool<R: Send>(threads: usize, op: impl FnOnce() -> R + Send) -> R {
    if threads == 0 {
        return op();
    }

    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(op),
        Err(err) => {
            warn!("Could not start {} render threads ({}), using the global pool", threads, err);
            op()
        }
    }
}

/// Render the entire scene to an image buffer.
///
/// Rows are distributed over the worker pool. The scene is only read.
pub fn render(scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let mut image = ImageBuffer::new(config.width, config.height);
    if image.pixels.is_empty() {
        warn!("Nothing to render at {}x{}", config.width, config.height);
        return image;
    }

    let camera = config.camera();
    let width = config.width as usize;

    info!(
        "Rendering {}x{} ({} triangles, {} spheres, {} lights)",
        config.width,
        config.height,
        scene.triangles().len(),
        scene.spheres().len(),
        scene.lights().len()
    );
    let start = Instant::now();

    with_thread_pool(config.threads, || {
        info!("Using {} render threads", rayon::current_num_threads());
        image
            .pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, pixels)| {
                for (x, pixel) in pixels.iter_mut().enumerate() {
                    let color = render_pixel(&camera, scene, x as u32, row as u32, config);
                    *pixel = color_to_rgb8(color);
                }
            });
    });

    info!("Rendered in {:?}", start.elapsed());
    image
}
