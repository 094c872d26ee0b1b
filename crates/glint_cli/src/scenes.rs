//! Built-in scenes, each with the camera, sky and render settings it was
//! composed for.

use crate::args::ScenePreset;
use glint_renderer::sampling::{gen_f32, random_vec3};
use glint_renderer::{
    BvhNode, Camera, CheckerTexture, Color, Dielectric, Hittable, Lambertian, Material, Metal,
    RenderConfig, RenderResult, Sky, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// A ready-to-render scene.
pub struct Scene {
    pub world: BvhNode,
    /// Camera settings; `initialize` is left to the caller so overrides can
    /// still be applied.
    pub camera: Camera,
    pub sky: Sky,
    pub render: RenderConfig,
}

const ASPECT_RATIO: f32 = 16.0 / 9.0;

/// Build a preset. `seed` drives the random placement in scenes that have any.
pub fn build(preset: ScenePreset, seed: u64) -> RenderResult<Scene> {
    let objects = match preset {
        ScenePreset::BouncingSpheres => bouncing_spheres(seed),
        ScenePreset::CheckeredSpheres => checkered_spheres(),
        ScenePreset::SimpleGrid => simple_grid(),
        ScenePreset::Mirror => vec![sphere(Vec3::ZERO, 1.0, Metal::new(Color::ONE, 0.0))],
        ScenePreset::WhiteSphere => vec![sphere(
            Vec3::ZERO,
            1.0,
            Lambertian::new(Color::new(1.0, 0.0, 0.0)),
        )],
    };
    let world = BvhNode::new(&objects)?;

    let (camera, sky, render) = match preset {
        ScenePreset::BouncingSpheres => (
            showcase_camera(600, Vec3::ZERO),
            Sky::Gradient,
            RenderConfig {
                samples_per_pixel: 50,
                ..RenderConfig::default()
            },
        ),
        ScenePreset::CheckeredSpheres => (
            showcase_camera(400, Vec3::new(0.0, 1.0, 0.0)),
            Sky::Gradient,
            RenderConfig::default(),
        ),
        ScenePreset::SimpleGrid => (
            debug_camera(Vec3::new(30.0, 20.0, 40.0), 30.0),
            Sky::Flat(Color::new(0.0, 0.0, 1.0)),
            RenderConfig::default(),
        ),
        ScenePreset::Mirror => (
            debug_camera(Vec3::new(0.0, 0.0, 5.0), 40.0),
            Sky::Gradient,
            RenderConfig::default(),
        ),
        ScenePreset::WhiteSphere => (
            debug_camera(Vec3::new(0.0, 0.0, 5.0), 40.0),
            Sky::Flat(Color::new(0.0, 0.0, 1.0)),
            RenderConfig::default(),
        ),
    };

    Ok(Scene {
        world,
        camera,
        sky,
        render,
    })
}

fn sphere<M: Material + 'static>(center: Vec3, radius: f32, material: M) -> Arc<dyn Hittable> {
    Arc::new(Sphere::new(center, radius, material))
}

fn ground_checker() -> CheckerTexture {
    CheckerTexture::from_colors(0.32, Color::new(0.2, 0.3, 0.1), Color::new(0.9, 0.9, 0.9))
}

/// Thin-lens camera at (13, 2, 3): 20 degree FOV, aperture 0.1 focused at 10.
fn showcase_camera(width: u32, look_at: Vec3) -> Camera {
    let focus_dist: f32 = 10.0;
    let lens_radius: f32 = 0.05;
    let defocus_angle = 2.0 * (lens_radius / focus_dist).atan().to_degrees();

    Camera::new()
        .with_aspect_ratio(width, ASPECT_RATIO)
        .with_position(Vec3::new(13.0, 2.0, 3.0), look_at, Vec3::Y)
        .with_lens(20.0, defocus_angle, focus_dist)
}

/// Pinhole camera looking at the origin.
fn debug_camera(look_from: Vec3, vfov: f32) -> Camera {
    Camera::new()
        .with_aspect_ratio(400, ASPECT_RATIO)
        .with_position(look_from, Vec3::ZERO, Vec3::Y)
        .with_lens(vfov, 0.0, look_from.length())
}

fn bouncing_spheres(seed: u64) -> Vec<Arc<dyn Hittable>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut objects = vec![
        sphere(
            Vec3::new(0.0, -1000.0, 0.0),
            1000.0,
            Lambertian::with_texture(ground_checker()),
        ),
        sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, Dielectric::new(1.5)),
        sphere(
            Vec3::new(-4.0, 1.0, 0.0),
            1.0,
            Lambertian::new(Color::new(0.4, 0.2, 0.1)),
        ),
        sphere(
            Vec3::new(4.0, 1.0, 0.0),
            1.0,
            Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
        ),
    ];

    for a in -11..=11 {
        for b in -11..=11 {
            let choose_mat = gen_f32(&mut rng);
            let jitter = random_vec3(&mut rng, 0.0, 1.0) * Vec3::new(0.9, 0.0, 0.9);
            let center = jitter + Vec3::new(a as f32, 0.2, b as f32);

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let object: Arc<dyn Hittable> = if choose_mat < 0.8 {
                let albedo = random_vec3(&mut rng, 0.0, 1.0) * random_vec3(&mut rng, 0.0, 1.0);
                let rise = 0.5 * gen_f32(&mut rng);
                Arc::new(Sphere::moving(
                    center,
                    center + Vec3::new(0.0, rise, 0.0),
                    0.2,
                    Lambertian::new(albedo),
                ))
            } else if choose_mat < 0.95 {
                let albedo = random_vec3(&mut rng, 0.5, 1.0);
                let fuzz = 0.5 * gen_f32(&mut rng);
                sphere(center, 0.2, Metal::new(albedo, fuzz))
            } else {
                sphere(center, 0.2, Dielectric::new(1.5))
            };
            objects.push(object);
        }
    }

    objects
}

fn checkered_spheres() -> Vec<Arc<dyn Hittable>> {
    let checker = Arc::new(Lambertian::with_texture(ground_checker()));
    vec![
        sphere(Vec3::new(0.0, -10.0, 0.0), 10.0, checker.clone()),
        sphere(Vec3::new(0.0, 10.0, 0.0), 10.0, checker),
    ]
}

fn simple_grid() -> Vec<Arc<dyn Hittable>> {
    let spacing = 3;
    let offset = -6;
    let mut objects = Vec::with_capacity(125);

    for x in 0..5 {
        for y in 0..5 {
            for z in 0..5 {
                let center = Vec3::new(
                    (x * spacing + offset) as f32,
                    (y * spacing + offset) as f32,
                    (z * spacing + offset) as f32,
                );
                let albedo = Color::new(x as f32 / 4.0, y as f32 / 4.0, z as f32 / 4.0);
                objects.push(sphere(center, 1.0, Lambertian::new(albedo)));
            }
        }
    }

    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glint_renderer::{render, Interval, Ray};

    #[test]
    fn test_every_preset_builds() {
        for preset in [
            ScenePreset::BouncingSpheres,
            ScenePreset::CheckeredSpheres,
            ScenePreset::SimpleGrid,
            ScenePreset::Mirror,
            ScenePreset::WhiteSphere,
        ] {
            let mut scene = build(preset, 0).unwrap();
            scene.camera.initialize().unwrap();
            scene.render.validate().unwrap();
        }
    }

    #[test]
    fn test_bouncing_spheres_layout() {
        let objects = bouncing_spheres(42);
        // ground + three large spheres + at most 23x23 small ones
        assert!(objects.len() > 4);
        assert!(objects.len() <= 4 + 23 * 23);

        // Small spheres stay on the grid and clear of the metal sphere's
        // footprint. Moving spheres rise in y only, so x/z of the box
        // centroid is the spawn position.
        let metal_footprint = Vec3::new(4.0, 0.2, 0.0);
        for object in &objects[4..] {
            let center = object.bounding_box().centroid();
            assert!(center.x >= -11.0 && center.x <= 12.0);
            assert!(center.z >= -11.0 && center.z <= 12.0);
            let spawn = Vec3::new(center.x, 0.2, center.z);
            assert!((spawn - metal_footprint).length() > 0.9);
        }
    }

    #[test]
    fn test_bouncing_spheres_is_seeded() {
        let centroids = |seed| -> Vec<Vec3> {
            bouncing_spheres(seed)
                .iter()
                .map(|o| o.bounding_box().centroid())
                .collect()
        };
        assert_eq!(centroids(5), centroids(5));
        assert_ne!(centroids(5), centroids(6));
    }

    #[test]
    fn test_simple_grid_positions() {
        let objects = simple_grid();
        assert_eq!(objects.len(), 125);
        let first = objects[0].bounding_box().centroid();
        let last = objects[124].bounding_box().centroid();
        assert_relative_eq!(first.x, -6.0);
        assert_relative_eq!(last.z, 6.0);
    }

    #[test]
    fn test_checkered_spheres_touch_at_origin() {
        let scene = build(ScenePreset::CheckeredSpheres, 0).unwrap();
        let down = Ray::new_simple(Vec3::new(0.0, 5.0, 30.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = scene
            .world
            .hit(&down, Interval::new(0.001, f32::INFINITY))
            .unwrap();
        assert!(rec.p.y > 0.0);
    }

    #[test]
    fn test_white_sphere_renders_blue_background() {
        let mut scene = build(ScenePreset::WhiteSphere, 0).unwrap();
        scene.camera = scene.camera.with_resolution(16, 9);
        scene.camera.initialize().unwrap();
        let config = RenderConfig {
            samples_per_pixel: 1,
            max_depth: 4,
            ..scene.render
        };
        let mut rng = StdRng::seed_from_u64(1);
        let image = render(&scene.camera, &scene.world, &scene.sky, &config, &mut rng).unwrap();
        // Corners miss the sphere.
        assert_eq!(image.display_value(0, 0), [0, 0, 255]);
    }
}
