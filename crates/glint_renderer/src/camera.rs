//! Camera for ray generation.

use crate::sampling::{gen_f32, random_in_unit_disk};
use crate::{RenderError, RenderResult};
use glint_math::{Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Serializable camera description, as read from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub image_width: u32,
    pub image_height: u32,
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub defocus_angle: f32,
    pub focus_dist: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
        }
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    settings: CameraSettings,
    frame: Frame,
    /// Set by `initialize()`, cleared by every builder call
    initialized: bool,
}

/// Viewport geometry derived from [`CameraSettings`] by `initialize()`.
#[derive(Debug, Clone, Copy)]
struct Frame {
    center: Vec3,
    /// Centre of pixel (0, 0) on the focus plane
    pixel00: Vec3,
    /// Step to the next pixel to the right
    pixel_du: Vec3,
    /// Step to the next pixel down
    pixel_dv: Vec3,
    /// Lens disk axes, scaled by the lens radius
    lens_u: Vec3,
    lens_v: Vec3,
}

impl Frame {
    const UNSET: Frame = Frame {
        center: Vec3::ZERO,
        pixel00: Vec3::ZERO,
        pixel_du: Vec3::ZERO,
        pixel_dv: Vec3::ZERO,
        lens_u: Vec3::ZERO,
        lens_v: Vec3::ZERO,
    };
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::from_settings(CameraSettings::default())
    }

    pub fn from_settings(settings: CameraSettings) -> Self {
        Self {
            settings,
            frame: Frame::UNSET,
            initialized: false,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.settings.image_width = width;
        self.settings.image_height = height;
        self.initialized = false;
        self
    }

    /// Set the width and derive the height from an aspect ratio (at least 1 pixel).
    pub fn with_aspect_ratio(self, width: u32, aspect_ratio: f32) -> Self {
        let height = ((width as f32 / aspect_ratio) as u32).max(1);
        self.with_resolution(width, height)
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.settings.look_from = look_from;
        self.settings.look_at = look_at;
        self.settings.vup = vup;
        self.initialized = false;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.settings.vfov = vfov;
        self.settings.defocus_angle = defocus_angle;
        self.settings.focus_dist = focus_dist;
        self.initialized = false;
        self
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn image_width(&self) -> u32 {
        self.settings.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.settings.image_height
    }

    /// Whether `initialize()` has run since the settings last changed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Error unless the camera is ready to generate rays.
    pub(crate) fn ensure_initialized(&self) -> RenderResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(RenderError::InvalidConfig(
                "camera must be initialized before rendering".to_string(),
            ))
        }
    }

    /// Derive the viewport from the settings. Must be called after the last
    /// builder call and before generating rays.
    pub fn initialize(&mut self) -> RenderResult<()> {
        let s = &self.settings;
        if s.image_width == 0 || s.image_height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image resolution must be non-zero, got {}x{}",
                s.image_width, s.image_height
            )));
        }

        // Orthonormal basis: w points backwards, u right, v up.
        let w = (s.look_from - s.look_at).normalize_or_zero();
        let u = s.vup.cross(w).normalize_or_zero();
        if w == Vec3::ZERO || u == Vec3::ZERO {
            return Err(RenderError::InvalidConfig(
                "camera look_from, look_at and vup must span a frame".to_string(),
            ));
        }
        let v = w.cross(u);

        let height = 2.0 * (s.vfov.to_radians() / 2.0).tan() * s.focus_dist;
        let width = height * s.image_width as f32 / s.image_height as f32;

        // Rows run top to bottom, so the vertical edge points down.
        let across = width * u;
        let down = -height * v;
        let pixel_du = across / s.image_width as f32;
        let pixel_dv = down / s.image_height as f32;

        let top_left = s.look_from - s.focus_dist * w - 0.5 * (across + down);
        let lens_radius = s.focus_dist * (s.defocus_angle.to_radians() / 2.0).tan();

        self.frame = Frame {
            center: s.look_from,
            pixel00: top_left + 0.5 * (pixel_du + pixel_dv),
            pixel_du,
            pixel_dv,
            lens_u: lens_radius * u,
            lens_v: lens_radius * v,
        };
        self.initialized = true;
        Ok(())
    }

    /// Generate a jittered ray through pixel (i, j), with a random shutter time.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let f = &self.frame;
        let dx = gen_f32(rng) - 0.5;
        let dy = gen_f32(rng) - 0.5;
        let target = f.pixel00 + (i as f32 + dx) * f.pixel_du + (j as f32 + dy) * f.pixel_dv;

        let origin = if self.settings.defocus_angle > 0.0 {
            let p = random_in_unit_disk(rng);
            f.center + p.x * f.lens_u + p.y * f.lens_v
        } else {
            f.center
        };

        Ray::new(origin, target - origin, gen_f32(rng))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
