use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use whitted_core::{load_scene, TextureCache};
use whitted_renderer::{render, ImageBuffer, RenderConfig, Scene};

const USAGE: &str = "usage: whitted <scene.json> <output.png> [width height]";

/// Parsed command line
#[derive(Debug, PartialEq)]
struct Args {
    scene: PathBuf,
    output: PathBuf,
    /// Overrides the resolution stored in the scene file
    size: Option<(u32, u32)>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let (scene, output, size) = match args {
        [scene, output] => (scene, output, None),
        [scene, output, width, height] => {
            let width: u32 = width
                .parse()
                .with_context(|| format!("invalid width {:?}", width))?;
            let height: u32 = height
                .parse()
                .with_context(|| format!("invalid height {:?}", height))?;
            if width == 0 || height == 0 {
                bail!("width and height must be positive");
            }
            (scene, output, Some((width, height)))
        }
        _ => bail!(USAGE),
    };

    Ok(Args {
        scene: PathBuf::from(scene),
        output: PathBuf::from(output),
        size,
    })
}

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    let buffer = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("framebuffer size does not match its dimensions")?;
    buffer
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn run(args: &Args) -> Result<()> {
    let data = load_scene(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;

    let (width, height) = args
        .size
        .unwrap_or((data.settings.width, data.settings.height));

    // Texture filenames are relative to the scene file
    let base_dir = args
        .scene
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let mut textures = TextureCache::with_base_dir(base_dir);

    let scene = Scene::build(&data, width, height, &mut textures)
        .context("failed to load scene textures")?;
    if !textures.is_empty() {
        log::info!(
            "Loaded {} textures ({:.1} KB)",
            textures.len(),
            textures.total_size_bytes() as f32 / 1024.0
        );
    }

    let config = RenderConfig::from(&data.settings);
    let image = render(&scene, &config);

    let start = Instant::now();
    save_png(&image, &args.output)?;
    log::info!("Wrote {} in {:.2?}", args.output.display(), start.elapsed());

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    log::info!("Starting whitted");
    run(&args)
}
