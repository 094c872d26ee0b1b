//! Glint renderer - CPU path tracing core.
//!
//! A Monte Carlo path tracer over scenes of spheres:
//!
//! - **Geometry**: `Sphere` (static or moving), `HittableList`, and a
//!   `BvhNode` hierarchy built once per scene
//! - **Materials**: `Lambertian`, `Metal`, `Dielectric`, with solid and
//!   checker textures
//! - **Integrator**: `ray_colour`, recursive with a bounce budget
//! - **Drivers**: single-threaded `render` and bucketed `render_parallel`
//!
//! # Example
//!
//! ```ignore
//! use glint_renderer::*;
//! use std::sync::Arc;
//!
//! let grey = Lambertian::new(Color::splat(0.5));
//! let center = Vec3::new(0.0, -100.5, -1.0);
//! let ground: Arc<dyn Hittable> = Arc::new(Sphere::new(center, 100.0, grey));
//! let world = BvhNode::new(&[ground])?;
//!
//! let mut camera = Camera::new().with_resolution(400, 225);
//! camera.initialize()?;
//!
//! let image = render_parallel(&camera, &world, &Sky::Gradient, &RenderConfig::default())?;
//! image.save("out.tga")?;
//! ```

mod bucket;
mod bvh;
mod camera;
mod error;
mod hittable;
mod material;
mod renderer;
pub mod sampling;
mod sphere;
mod texture;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::{BvhNode, BvhStats};
pub use camera::{Camera, CameraSettings};
pub use error::{RenderError, RenderResult};
pub use hittable::{face_normal, HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    linear_to_gamma, ray_colour, render, render_pixel, write_colour, Background, ImageBuffer,
    RenderConfig, Sky, SHADOW_ACNE_EPSILON,
};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, SolidColor, Texture};

/// Re-export math types from glint_math
pub use glint_math::{Aabb, Interval, Ray, Vec3};
