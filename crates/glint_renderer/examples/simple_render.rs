//! Simple path tracer example.
//!
//! Renders three spheres on a checkered ground and saves a TGA file.

use glint_renderer::{
    render_parallel, BvhNode, Camera, CheckerTexture, Color, Dielectric, Hittable, Lambertian,
    Metal, RenderConfig, RenderResult, Sky, Sphere, Vec3,
};
use std::sync::Arc;

fn main() -> RenderResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start = std::time::Instant::now();
    let world = build_scene()?;
    log::info!("Scene built in {:?}", start.elapsed());

    let mut camera = Camera::new()
        .with_aspect_ratio(400, 16.0 / 9.0)
        .with_position(
            Vec3::new(-2.0, 2.0, 1.0), // look_from
            Vec3::new(0.0, 0.0, -1.0), // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(40.0, 0.0, 3.4);
    camera.initialize()?;

    let config = RenderConfig {
        samples_per_pixel: 32,
        max_depth: 10,
        ..RenderConfig::default()
    };

    let image = render_parallel(&camera, &world, &Sky::Gradient, &config)?;
    image.save("simple_render.tga")
}

fn build_scene() -> RenderResult<BvhNode> {
    let checker = CheckerTexture::from_colors(
        0.5,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    );

    let objects: Vec<Arc<dyn Hittable>> = vec![
        Arc::new(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Lambertian::with_texture(checker),
        )),
        Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.2),
            0.5,
            Lambertian::new(Color::new(0.1, 0.2, 0.5)),
        )),
        Arc::new(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, Dielectric::new(1.5))),
        Arc::new(Sphere::new(
            Vec3::new(1.0, 0.0, -1.0),
            0.5,
            Metal::new(Color::new(0.8, 0.6, 0.2), 0.1),
        )),
    ];

    BvhNode::new(&objects)
}
