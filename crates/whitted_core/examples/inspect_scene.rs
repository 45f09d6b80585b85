//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run --example inspect_scene -- scenes/mirror_spheres.json

use std::env;

use whitted_core::load_scene;
use whitted_math::Vec3;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_scene <path-to-scene-json>");
        println!("\nExample:");
        println!("  cargo run --example inspect_scene -- scenes/mirror_spheres.json");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    match load_scene(path) {
        Ok(data) => {
            let g = data.globals;
            println!("\n=== Scene ===");
            println!("Globals: ka={} kd={} ks={}", g.ka, g.kd, g.ks);
            println!(
                "Image: {}x{} (shadows: {}, reflections: {}, textures: {}, max depth: {})",
                data.settings.width,
                data.settings.height,
                data.settings.shadows,
                data.settings.reflections,
                data.settings.texture_mapping,
                data.settings.max_depth
            );

            let c = &data.camera;
            println!(
                "Camera at ({:.2}, {:.2}, {:.2}) looking ({:.2}, {:.2}, {:.2}), {:.1} deg",
                c.position.x,
                c.position.y,
                c.position.z,
                c.look.x,
                c.look.y,
                c.look.z,
                c.height_angle.to_degrees()
            );

            println!("\n--- Shapes ({}) ---", data.shapes.len());
            for (i, shape) in data.shapes.iter().enumerate() {
                let center = shape.object_to_world.transform_point3(Vec3::ZERO);
                print!(
                    "  [{}] {:?} at ({:.2}, {:.2}, {:.2})",
                    i, shape.kind, center.x, center.y, center.z
                );
                if let Some(texture) = &shape.material.texture {
                    print!(
                        " textured {} ({}x{})",
                        texture.filename, texture.repeat_u, texture.repeat_v
                    );
                }
                println!();
            }

            println!("\n--- Lights ({}) ---", data.lights.len());
            for (i, light) in data.lights.iter().enumerate() {
                println!(
                    "  [{}] {:?} color ({:.2}, {:.2}, {:.2})",
                    i, light.kind, light.color.x, light.color.y, light.color.z
                );
            }

            let textures = data.texture_filenames();
            if !textures.is_empty() {
                println!("\n--- Textures ---");
                for name in textures {
                    println!("  {}", name);
                }
            }
        }
        Err(e) => {
            eprintln!("Error loading scene: {}", e);
            std::process::exit(1);
        }
    }
}
