//! Sphere primitive, static or moving linearly over the shutter interval.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use glint_math::{Aabb, Interval, Ray, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
pub struct Sphere<M: Material> {
    /// Center at time 0
    center: Vec3,
    /// Displacement of the center between time 0 and time 1
    motion: Vec3,
    is_moving: bool,
    radius: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Sphere<M> {
    /// Create a new stationary sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: M) -> Self {
        let radius = clamp_radius(radius);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            motion: Vec3::ZERO,
            is_moving: false,
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere whose center moves from `center1` (time 0) to
    /// `center2` (time 1).
    pub fn moving(center1: Vec3, center2: Vec3, radius: f32, material: M) -> Self {
        let radius = clamp_radius(radius);
        let rvec = Vec3::splat(radius);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);
        let box2 = Aabb::from_points(center2 - rvec, center2 + rvec);

        Self {
            center: center1,
            motion: center2 - center1,
            is_moving: true,
            radius,
            material,
            bbox: Aabb::union(&box1, &box2),
        }
    }

    /// Center of the sphere at the given ray time.
    pub fn center_at(&self, time: f32) -> Vec3 {
        if self.is_moving {
            self.center + time * self.motion
        } else {
            self.center
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

fn clamp_radius(radius: f32) -> f32 {
    if radius < 0.0 {
        log::warn!("Sphere radius {radius} is negative, clamping to 0");
    }
    radius.max(0.0)
}

impl<M: Material> Hittable for Sphere<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let center = self.center_at(ray.time());
        let oc = ray.origin() - center;
        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.dot(oc) - self.radius * self.radius;

        // Tangent rays (discriminant == 0) count as misses.
        let discriminant = b * b - 4.0 * a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let roots = [(-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)];
        let t = roots.into_iter().find(|&root| ray_t.surrounds(root))?;

        let outward_normal = (ray.at(t) - center) / self.radius;
        Some(HitRecord::new(
            ray,
            t,
            outward_normal,
            Self::get_sphere_uv(outward_normal),
            &self.material,
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
