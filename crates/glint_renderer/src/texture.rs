//! Procedural textures evaluated at a hit point.

use crate::Color;
use glint_math::Vec3;

/// A colour lookup over a surface.
pub trait Texture: Send + Sync {
    /// Colour at surface coordinates `(u, v)` and world-space point `p`.
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A flat colour.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// A 3D checker pattern: alternates between two textures on a lattice of
/// `scale`-sized cells in world space.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Box<dyn Texture>,
    odd: Box<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Box<dyn Texture>, odd: Box<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    /// Checker between two solid colours.
    pub fn from_colors(scale: f32, c1: Color, c2: Color) -> Self {
        Self::new(
            scale,
            Box::new(SolidColor::new(c1)),
            Box::new(SolidColor::new(c2)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (p * self.inv_scale).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::from_rgb(0.1, 0.2, 0.3);
        assert_eq!(tex.value(0.7, 0.1, Vec3::ONE), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_checker_alternates() {
        let a = Color::new(0.2, 0.3, 0.1);
        let b = Color::new(0.9, 0.9, 0.9);
        let tex = CheckerTexture::from_colors(1.0, a, b);

        assert_eq!(tex.value(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5)), a);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), b);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.5, 1.5, 0.5)), a);
        // Negative cells keep alternating across the origin.
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(-0.5, 0.5, 0.5)), b);
    }
}
