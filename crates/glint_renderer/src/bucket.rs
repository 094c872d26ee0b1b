//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon. Each bucket draws from its own random
//! stream, seeded from the render seed and the bucket's grid position, so
//! the image does not depend on how rayon schedules the work.

use crate::renderer::{render_pixel, Background, ImageBuffer, RenderConfig};
use crate::{Camera, Color, Hittable, RenderResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Row-major position in the bucket grid; stable across reordering
    pub grid_index: usize,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed of this bucket's random stream.
    fn seed(&self, render_seed: u64) -> u64 {
        // SplitMix64 increment spreads neighbouring buckets apart.
        render_seed ^ (self.grid_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets near the center of the frame come first so a partially
/// rendered image shows the subject early.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            buckets.push(Bucket {
                x,
                y,
                width: bucket_size.min(width - x),
                height: bucket_size.min(height - y),
                grid_index: buckets.len(),
                index: 0,
            });
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center (stable for ties).
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let dist = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Accumulated pixel sums in row-major order
    pub pixels: Vec<Color>,
}

/// Render a single bucket with its own random stream.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    background: &dyn Background,
    config: &RenderConfig,
) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket.seed(config.seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(
                camera,
                world,
                background,
                bucket.x + local_x,
                bucket.y + local_y,
                config,
                &mut rng,
            );
            pixels.push(color);
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
    }
}

/// Render the entire scene across the rayon thread pool.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    background: &dyn Background,
    config: &RenderConfig,
) -> RenderResult<ImageBuffer> {
    config.validate()?;
    camera.ensure_initialized()?;

    let width = camera.image_width();
    let height = camera.image_height();
    let buckets = generate_buckets(width, height, config.bucket_size);
    log::info!(
        "Rendering {}x{} @ {} spp, depth {} in {} buckets on {} threads",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len(),
        rayon::current_num_threads()
    );

    let start = Instant::now();
    let done = AtomicUsize::new(0);
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, camera, world, background, config);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!(
                "Bucket {} at ({}, {}) done [{}/{}]",
                bucket.index,
                bucket.x,
                bucket.y,
                finished,
                buckets.len()
            );
            result
        })
        .collect();

    let mut image = ImageBuffer::new(width, height, config.samples_per_pixel);
    for result in results {
        let b = result.bucket;
        for (i, color) in result.pixels.into_iter().enumerate() {
            let i = i as u32;
            image.set(b.x + i % b.width, b.y + i / b.width, color);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}
