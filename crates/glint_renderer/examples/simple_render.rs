//! Simple ray tracer example.
//!
//! Builds a small scene in code, renders it and saves to PPM format.
//!
//! Run with: cargo run --example simple_render -p glint_renderer

use std::fs::File;
use std::io::{self, BufWriter, Write};

use glint_renderer::{
    render, Color, DVec3, ImageBuffer, Light, RenderConfig, Scene, Sphere, Triangle, Vertex,
};

fn main() {
    env_logger::init();

    println!("glint - Simple Example");
    println!("======================");

    let scene = match build_scene() {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Failed to build scene: {}", e);
            std::process::exit(1);
        }
    };

    let config = RenderConfig {
        width: 400,
        height: 300,
        ..Default::default()
    };

    println!("Rendering {}x{}...", config.width, config.height);
    let start = std::time::Instant::now();
    let image = render(&scene, &config);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    if let Err(e) = save_ppm(&image, filename) {
        eprintln!("Failed to save image: {}", e);
        std::process::exit(1);
    }
    println!("Saved to {}", filename);
}

fn build_scene() -> Result<Scene, glint_core::CapacityError> {
    let mut scene = Scene::new().with_ambient(Color::splat(0.08));

    // Back wall, facing the camera
    let n = DVec3::Z;
    let grey = |p: DVec3| Vertex::new(p, n).with_material(Color::splat(0.6), Color::ZERO, 1.0);
    scene.add_triangle(Triangle::new(
        grey(DVec3::new(-6.0, -4.0, -10.0)),
        grey(DVec3::new(6.0, -4.0, -10.0)),
        grey(DVec3::new(6.0, 5.0, -10.0)),
    ))?;
    scene.add_triangle(Triangle::new(
        grey(DVec3::new(-6.0, -4.0, -10.0)),
        grey(DVec3::new(6.0, 5.0, -10.0)),
        grey(DVec3::new(-6.0, 5.0, -10.0)),
    ))?;

    // Three spheres
    scene.add_sphere(Sphere::new(DVec3::new(-1.6, -0.5, -6.0), 0.8).with_material(
        Color::new(0.8, 0.2, 0.2),
        Color::splat(0.8),
        30.0,
    ))?;
    scene.add_sphere(Sphere::new(DVec3::new(0.0, 0.0, -7.0), 1.0).with_material(
        Color::new(0.2, 0.7, 0.3),
        Color::splat(0.5),
        10.0,
    ))?;
    scene.add_sphere(Sphere::new(DVec3::new(1.7, -0.6, -5.5), 0.7).with_material(
        Color::new(0.2, 0.3, 0.9),
        Color::ONE,
        80.0,
    ))?;

    scene.add_light(Light::new(DVec3::new(2.0, 4.0, -1.0), Color::splat(0.9)))?;
    scene.add_light(Light::new(DVec3::new(-5.0, 1.0, 0.0), Color::splat(0.3)))?;

    Ok(scene)
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P6")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;
    writer.write_all(image.as_bytes())?;

    Ok(())
}
