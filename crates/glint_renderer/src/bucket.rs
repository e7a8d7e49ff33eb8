//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon, center first. Each finished bucket is handed
//! to a callback so a display can show the image as it fills in.

use std::time::Instant;

use glint_core::Scene;
use log::{debug, info};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::compositor::color_to_rgb8;
use crate::renderer::{render_pixel, with_thread_pool, ImageBuffer, RenderConfig};

/// A tile of the image. `x` and `y` locate its top-left pixel, with row 0
/// at the top; edge tiles may be narrower or shorter than the bucket size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in the center-out order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets for an image, sorted center-out.
///
/// A `bucket_size` of 0 is treated as 1.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = size.min(width - x);
            let bh = size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += size;
        }
        y += size;
    }

    sort_center_out(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Stable sort by distance from the image center, so equidistant buckets
/// keep their scanline order.
fn sort_center_out(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;

    let distance = |b: &Bucket| {
        let dx = b.x as f64 + b.width as f64 / 2.0 - center_x;
        let dy = b.y as f64 + b.height as f64 / 2.0 - center_y;
        dx * dx + dy * dy
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// A finished bucket: its 8-bit pixels, row-major within the tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<[u8; 3]>,
}

/// Render a single bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(camera, scene, bucket.x + local_x, bucket.y + local_y, config);
            pixels.push(color_to_rgb8(color));
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
    }
}

impl ImageBuffer {
    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        let width = bucket.width as usize;
        if width == 0 {
            return;
        }

        for (local_y, row) in result.pixels.chunks(width).enumerate() {
            let start = (bucket.y as usize + local_y) * self.width as usize + bucket.x as usize;
            self.pixels[start..start + row.len()].copy_from_slice(row);
        }
    }
}

/// Render every bucket in parallel, calling `on_bucket` as each one
/// finishes.
///
/// Buckets are started in center-out order; with more than one worker they
/// may finish in any order.
pub fn render_buckets<F>(scene: &Scene, config: &RenderConfig, bucket_size: u32, on_bucket: F)
where
    F: Fn(BucketResult) + Sync + Send,
{
    let camera = config.camera();
    let buckets = generate_buckets(config.width, config.height, bucket_size);

    info!(
        "Rendering {}x{} in {} buckets of {}px",
        config.width,
        config.height,
        buckets.len(),
        bucket_size.max(1)
    );
    let start = Instant::now();

    with_thread_pool(config.threads, || {
        buckets.par_iter().for_each(|bucket| {
            let result = render_bucket(bucket, &camera, scene, config);
            debug!("Bucket {} done at ({}, {})", bucket.index, bucket.x, bucket.y);
            on_bucket(result);
        });
    });

    info!("Rendered in {:?}", start.elapsed());
}

/// Render the scene bucket by bucket into a single image.
///
/// The result is identical to [`render`](crate::render).
pub fn render_bucketed(scene: &Scene, config: &RenderConfig, bucket_size: u32) -> ImageBuffer {
    let camera = config.camera();
    let buckets = generate_buckets(config.width, config.height, bucket_size);

    let results: Vec<BucketResult> = with_thread_pool(config.threads, || {
        buckets
            .par_iter()
            .map(|bucket| render_bucket(bucket, &camera, scene, config))
            .collect()
    });

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }
    image
}
