//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a bounce budget
//! - Pluggable background (sky) radiance for escaping rays
//! - Tone mapping: sample averaging, gamma 2 and 8-bit quantisation

use crate::{Camera, Color, Hittable, RenderError, RenderResult};
use glint_math::{Interval, Ray};
use image::codecs::tga::TgaEncoder;
use image::{ColorType, Rgb, RgbImage};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// Lower bound of the hit interval; keeps scattered rays from re-hitting
/// the surface they start on.
pub const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Bounce budget: a path scatters at most `max_depth + 1` times
    pub max_depth: u32,
    /// Seed for the per-bucket random streams
    pub seed: u64,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
            bucket_size: crate::DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidConfig(
                "bucket_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Radiance arriving along rays that leave the scene.
pub trait Background: Send + Sync {
    fn colour(&self, ray: &Ray) -> Color;
}

impl<F> Background for F
where
    F: Fn(&Ray) -> Color + Send + Sync,
{
    fn colour(&self, ray: &Ray) -> Color {
        self(ray)
    }
}

/// Built-in backgrounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sky {
    /// Vertical fade from white (down) to light blue (up)
    #[default]
    Gradient,
    /// Constant colour in every direction
    Flat(Color),
}

impl Background for Sky {
    fn colour(&self, ray: &Ray) -> Color {
        match self {
            Sky::Gradient => sky_gradient(ray),
            Sky::Flat(color) => *color,
        }
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Compute the radiance carried back along `ray`.
///
/// On a hit the material either absorbs (black) or scatters, in which case
/// the attenuation multiplies the radiance of the scattered ray traced with
/// one bounce less. A scatter with no budget left contributes black. Rays
/// that miss everything take the background radiance.
pub fn ray_colour(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &dyn Background,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY)) else {
        return background.colour(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => match depth.checked_sub(1) {
            Some(remaining) => {
                let incoming = ray_colour(&result.scattered, world, remaining, background, rng);
                result.attenuation * incoming
            }
            None => Color::ZERO,
        },
        None => Color::ZERO,
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Tone map an accumulated sample sum to 8-bit RGB.
///
/// `round(255 * clamp(sqrt(sum / samples), 0, 1))` per channel.
pub fn write_colour(sum: Color, samples_per_pixel: u32) -> [u8; 3] {
    let scaled = sum / samples_per_pixel.max(1) as f32;
    let intensity = Interval::new(0.0, 1.0);
    let quantize = |c: f32| (255.0 * intensity.clamp(linear_to_gamma(c))).round() as u8;
    [quantize(scaled.x), quantize(scaled.y), quantize(scaled.z)]
}

/// Trace `samples_per_pixel` camera rays through pixel (x, y) and return
/// the sum of their radiance (not yet averaged).
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    background: &dyn Background,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_colour(&ray, world, config.max_depth, background, rng);
    }

    pixel_color
}

/// Accumulated linear radiance per pixel, row-major, row 0 at the top.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Number of samples summed into every pixel
    pub samples_per_pixel: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the accumulated sum at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the accumulated sum at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Tone-mapped 8-bit pixel at (x, y).
    pub fn display_value(&self, x: u32, y: u32) -> [u8; 3] {
        write_colour(self.get(x, y), self.samples_per_pixel)
    }

    /// Convert to a tone-mapped 8-bit RGB image.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| Rgb(self.display_value(x, y)))
    }

    /// Tone map and write to `path`; the format follows the file extension
    /// (`.tga` gives an uncompressed 24-bit truecolor file).
    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let rgb = self.to_rgb_image();

        let is_tga = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tga"));
        if is_tga {
            // The TGA encoder run-length encodes unless told otherwise.
            let mut writer = BufWriter::new(File::create(path)?);
            TgaEncoder::new(&mut writer).disable_rle().encode(
                rgb.as_raw(),
                self.width,
                self.height,
                ColorType::Rgb8,
            )?;
            writer.flush()?;
        } else {
            rgb.save(path)?;
        }

        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Render the entire scene on the calling thread.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    background: &dyn Background,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> RenderResult<ImageBuffer> {
    config.validate()?;
    camera.ensure_initialized()?;

    let width = camera.image_width();
    let height = camera.image_height();
    log::info!(
        "Rendering {}x{} @ {} spp, depth {} (single-threaded)",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth
    );

    let start = Instant::now();
    let mut image = ImageBuffer::new(width, height, config.samples_per_pixel);
    for y in 0..height {
        for x in 0..width {
            let color = render_pixel(camera, world, background, x, y, config, rng);
            image.set(x, y, color);
        }
        log::trace!("Finished row {}/{}", y + 1, height);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}
