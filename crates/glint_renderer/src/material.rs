//! Material trait for surface scattering.

use crate::hittable::HitRecord;
use crate::sampling::{
    gen_f32, near_zero, random_in_unit_sphere, random_unit_vector, reflect, refract,
};
use crate::texture::{SolidColor, Texture};
use glint_math::{Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Fraction of the incoming light carried by the scattered ray
    pub attenuation: Color,
    /// Outgoing ray, starting at the hit point
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;
}

impl<M: Material + ?Sized> Material for Box<M> {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        (**self).scatter(ray_in, rec, rng)
    }
}

impl<M: Material + ?Sized> Material for Arc<M> {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        (**self).scatter(ray_in, rec, rng)
    }
}

/// Lambertian (diffuse) material.
pub struct Lambertian {
    texture: Box<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(SolidColor::new(albedo))
    }

    /// Diffuse surface whose albedo is looked up from a texture.
    pub fn with_texture(texture: impl Texture + 'static) -> Self {
        Self {
            texture: Box::new(texture),
        }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let direction = diffuse_direction(rec.normal, random_unit_vector(rng));

        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// `normal + offset`, falling back to the normal when the two cancel out.
fn diffuse_direction(normal: Vec3, offset: Vec3) -> Vec3 {
    let direction = normal + offset;
    if near_zero(direction) {
        normal
    } else {
        direction
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal)
            + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push the ray below the surface: absorb it.
        if reflected.dot(rec.normal) < 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, reflected, ray_in.time()),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    pub fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::CheckerTexture;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Hit on the top of a surface whose outward normal is +Y.
    fn record_facing_up<'a>(ray: &Ray, material: &'a dyn Material) -> HitRecord<'a> {
        let t = 1.0;
        HitRecord::new(ray, t, Vec3::Y, (0.0, 0.0), material)
    }

    fn incoming() -> Ray {
        Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.25)
    }

    #[test]
    fn test_lambertian_always_scatters_with_albedo() {
        let albedo = Color::new(0.8, 0.3, 0.1);
        let mat = Lambertian::new(albedo);
        let ray = incoming();
        let rec = record_facing_up(&ray, &mat);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..1000 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("lambertian never absorbs");
            assert_eq!(result.attenuation, albedo);
            assert_eq!(result.scattered.origin(), rec.p);
            assert_eq!(result.scattered.time(), 0.25);
            // normal + unit vector never points below the surface
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
        }
    }

    #[test]
    fn test_lambertian_textured_albedo() {
        let a = Color::new(0.2, 0.3, 0.1);
        let b = Color::new(0.9, 0.9, 0.9);
        let mat = Lambertian::with_texture(CheckerTexture::from_colors(10.0, a, b));
        let ray = incoming();
        let rec = record_facing_up(&ray, &mat);
        let mut rng = StdRng::seed_from_u64(1);

        let result = mat.scatter(&ray, &rec, &mut rng).expect("scatters");
        // rec.p = (0, 0, 0) lies in the even cell
        assert_eq!(result.attenuation, a);
    }

    /// Generator stuck at its maximum: every `gen_f32` draw is just below 1.
    struct MaxRng;

    impl RngCore for MaxRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xFF);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_diffuse_direction_falls_back_to_normal() {
        let normal = Vec3::Y;
        // Offset cancelling the normal to within 1e-8 on every axis.
        let offset = Vec3::new(1e-9, -1.0 + 1e-9, -1e-9);
        assert_eq!(diffuse_direction(normal, offset), normal);

        let offset = Vec3::new(0.6, -0.8, 0.0);
        assert_eq!(diffuse_direction(normal, offset), normal + offset);
    }

    #[test]
    fn test_dielectric_refracts_entering_glass() {
        // 45 degree incidence from outside; the Schlick draw (about 0.04)
        // loses against a draw just below 1, so the ray refracts.
        let mat = Dielectric::new(1.5);
        let ray = incoming();
        let rec = record_facing_up(&ray, &mat);
        assert!(rec.front_face);

        let result = mat.scatter(&ray, &rec, &mut MaxRng).expect("glass never absorbs");
        let unit = ray.direction().normalize();
        let expected = refract(unit, rec.normal, 1.0 / 1.5);
        let dir = result.scattered.direction();
        assert!(dir.abs_diff_eq(expected, 1e-6));

        // Snell: sin(theta_t) = sin(theta_i) / ior, bent towards the normal.
        let sin_i = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(dir.x, sin_i / 1.5, epsilon = 1e-5);
        assert!(dir.y < 0.0);
    }

    #[test]
    fn test_dielectric_refracts_leaving_glass() {
        // Shallow exit angle, below the critical angle: uses ratio `ior`.
        let mat = Dielectric::new(1.5);
        let ray = Ray::new_simple(Vec3::new(-0.2, -1.0, 0.0), Vec3::new(0.2, 1.0, 0.0));
        let rec = record_facing_up(&ray, &mat);
        assert!(!rec.front_face);

        let result = mat.scatter(&ray, &rec, &mut MaxRng).expect("glass never absorbs");
        let unit = ray.direction().normalize();
        let dir = result.scattered.direction();
        assert!(dir.abs_diff_eq(refract(unit, rec.normal, 1.5), 1e-6));
        assert_relative_eq!(dir.x, unit.x * 1.5, epsilon = 1e-5);
        assert!(dir.y > 0.0);
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let albedo = Color::new(0.7, 0.6, 0.5);
        let mat = Metal::new(albedo, 0.0);
        let ray = incoming();
        let rec = record_facing_up(&ray, &mat);
        let mut rng = StdRng::seed_from_u64(2);

        let result = mat.scatter(&ray, &rec, &mut rng).expect("mirror reflects");
        let expected = reflect(ray.direction().normalize(), rec.normal);

        assert_eq!(result.attenuation, albedo);
        assert!(result.scattered.direction().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_metal_absorbs_below_surface() {
        // Normal deliberately on the same side as the ray: the mirrored
        // direction lands below the surface and must be absorbed.
        let mat = Metal::new(Color::ONE, 0.0);
        let ray = incoming();
        let mut rec = record_facing_up(&ray, &mat);
        rec.normal = -Vec3::Y;
        let mut rng = StdRng::seed_from_u64(3);

        assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_metal_fuzz_clamped() {
        assert_eq!(Metal::new(Color::ONE, 4.0).fuzz, 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz, 0.0);
    }

    #[test]
    fn test_dielectric_attenuation_is_white() {
        let mat = Dielectric::new(1.5);
        let ray = incoming();
        let rec = record_facing_up(&ray, &mat);
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("glass never absorbs");
            assert_eq!(result.attenuation, Color::ONE);
            assert_relative_eq!(result.scattered.direction().length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        // Leaving glass at a grazing angle: always reflects.
        let mat = Dielectric::new(1.5);
        let ray = Ray::new_simple(Vec3::new(-1.0, -0.1, 0.0), Vec3::new(1.0, 0.1, 0.0));
        let rec = record_facing_up(&ray, &mat);
        assert!(!rec.front_face);
        let mut rng = StdRng::seed_from_u64(5);

        let unit = ray.direction().normalize();
        let expected = reflect(unit, rec.normal);
        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("reflects");
            assert!(result.scattered.direction().abs_diff_eq(expected, 1e-6));
        }
    }

    #[test]
    fn test_schlick_reflectance() {
        // Head-on: r0 only
        assert_relative_eq!(Dielectric::reflectance(1.0, 1.5), 0.04, epsilon = 1e-6);
        // Grazing: total reflection
        assert_relative_eq!(Dielectric::reflectance(0.0, 1.5), 1.0, epsilon = 1e-6);
        // Index-matched: r0 = 0
        assert_relative_eq!(Dielectric::reflectance(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_boxed_material_delegates() {
        let mat: Box<dyn Material> = Box::new(Metal::new(Color::splat(0.5), 0.0));
        let ray = incoming();
        let rec = record_facing_up(&ray, &mat);
        let mut rng = StdRng::seed_from_u64(6);

        let result = mat.scatter(&ray, &rec, &mut rng).expect("reflects");
        assert_eq!(result.attenuation, Color::splat(0.5));
    }
}
