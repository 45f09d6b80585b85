//! Simple Whitted ray tracer example.
//!
//! Renders a built-in scene with every primitive type and light type and
//! saves it in PPM format.
//!
//! Run with: cargo run --example simple_render

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use whitted_core::{GlobalCoefficients, Material, Texture};
use whitted_math::{Mat4, Quat};
use whitted_renderer::{
    render, Camera, Color, ImageBuffer, Light, Primitive, RenderConfig, Scene, Shape,
    TextureBinding, Vec3,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Whitted Ray Tracer - Simple Example");
    println!("===================================");

    let (width, height) = (640, 360);
    let scene = build_scene(width, height);
    println!("Created {} primitives, {} lights", scene.primitives.len(), scene.lights.len());

    let start = std::time::Instant::now();
    let image = render(&scene, &RenderConfig::default());
    println!("Rendered {}x{} in {:?}", width, height, start.elapsed());

    let filename = "output.ppm";
    if let Err(err) = save_ppm(&image, filename) {
        eprintln!("Failed to save {}: {}", filename, err);
        std::process::exit(1);
    }
    println!("Saved to {}", filename);
}

fn build_scene(width: u32, height: u32) -> Scene {
    let checker = Arc::new(checker_texture(64, 8));

    let floor = Primitive::new(
        Shape::Cube,
        Mat4::from_translation(Vec3::new(0.0, -0.55, 0.0)) * Mat4::from_scale(Vec3::new(8.0, 0.1, 8.0)),
        Material {
            ambient: Color::splat(0.1),
            diffuse: Color::splat(0.8),
            blend: 0.7,
            ..Default::default()
        },
        Some(TextureBinding {
            texture: checker.clone(),
            repeat_u: 4.0,
            repeat_v: 4.0,
        }),
    );

    let mirror_sphere = Primitive::new(
        Shape::Sphere,
        Mat4::from_translation(Vec3::new(0.0, 0.25, 0.0)) * Mat4::from_scale(Vec3::splat(1.5)),
        Material {
            ambient: Color::splat(0.05),
            diffuse: Color::splat(0.2),
            specular: Color::ONE,
            reflective: Color::splat(0.8),
            shininess: 40.0,
            ..Default::default()
        },
        None,
    );

    let cone = Primitive::new(
        Shape::Cone,
        Mat4::from_translation(Vec3::new(-1.8, 0.0, 0.6)),
        Material {
            ambient: Color::new(0.1, 0.02, 0.02),
            diffuse: Color::new(0.9, 0.2, 0.2),
            specular: Color::splat(0.5),
            shininess: 10.0,
            ..Default::default()
        },
        None,
    );

    let cylinder = Primitive::new(
        Shape::Cylinder,
        Mat4::from_scale_rotation_translation(
            Vec3::new(0.8, 1.0, 0.8),
            Quat::from_rotation_z(0.3),
            Vec3::new(1.8, 0.0, 0.6),
        ),
        Material {
            ambient: Color::new(0.02, 0.02, 0.1),
            diffuse: Color::new(0.2, 0.3, 0.9),
            blend: 0.5,
            ..Default::default()
        },
        Some(TextureBinding {
            texture: checker,
            repeat_u: 2.0,
            repeat_v: 1.0,
        }),
    );

    let lights = vec![
        Light::Directional {
            direction: Vec3::new(-1.0, -2.0, -1.0),
            color: Color::splat(0.6),
        },
        Light::Point {
            position: Vec3::new(3.0, 3.0, 3.0),
            color: Color::new(0.8, 0.7, 0.6),
            attenuation: Vec3::new(1.0, 0.05, 0.01),
        },
        Light::Spot {
            position: Vec3::new(-1.8, 4.0, 0.6),
            direction: Vec3::NEG_Y,
            color: Color::splat(0.7),
            attenuation: Vec3::new(1.0, 0.0, 0.0),
            angle: 20.0_f32.to_radians(),
            penumbra: 8.0_f32.to_radians(),
        },
    ];

    let position = Vec3::new(0.0, 1.5, 6.0);
    let camera = Camera::new(
        position,
        Vec3::new(0.0, 0.0, 0.0) - position,
        Vec3::Y,
        40.0_f32.to_radians(),
        width as f32 / height as f32,
    );

    Scene {
        width,
        height,
        camera,
        primitives: vec![floor, mirror_sphere, cone, cylinder],
        lights,
        globals: GlobalCoefficients {
            ka: 1.0,
            kd: 1.0,
            ks: 1.0,
        },
    }
}

/// Black and white checkerboard with `cells` squares per side.
fn checker_texture(size: u32, cells: u32) -> Texture {
    let cell = (size / cells).max(1);
    let pixels = (0..size * size)
        .map(|i| {
            let (row, col) = (i / size, i % size);
            if (row / cell + col / cell) % 2 == 0 {
                [255, 255, 255, 255]
            } else {
                [20, 20, 20, 255]
            }
        })
        .collect();
    Texture::new(size, size, pixels, "<checker>")
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let rgba = image.get(x, y);
            writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
        }
    }

    writer.flush()
}
