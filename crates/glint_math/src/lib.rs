//! Glint math primitives.
//!
//! Vectors come straight from glam; this crate adds the ray tracing
//! vocabulary built on top of them: rays, parameter intervals and
//! axis-aligned bounding boxes.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
