//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run --example load_scene -- scenes/table.scene

use std::env;

use glint_core::load_scene;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_scene <path-to-scene-file>");
        println!("\nExamples:");
        println!("  cargo run --example load_scene -- scenes/spheres.scene");
        println!("  cargo run --example load_scene -- scenes/table.scene");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            println!("\n=== Scene ===");
            println!("Ambient: {:?}", scene.ambient);
            println!("Triangles: {}", scene.triangles().len());
            println!("Spheres: {}", scene.spheres().len());
            println!("Lights: {}", scene.lights().len());

            println!("\n--- Spheres ---");
            for (i, sphere) in scene.spheres().iter().enumerate() {
                println!(
                    "  [{}] center {:?} radius {} shininess {}",
                    i, sphere.center, sphere.radius, sphere.shininess
                );
            }

            println!("\n--- Lights ---");
            for (i, light) in scene.lights().iter().enumerate() {
                println!("  [{}] {:?} color {:?}", i, light.position, light.color);
            }
        }
        Err(e) => {
            eprintln!("Failed to load scene: {}", e);
            std::process::exit(1);
        }
    }
}
