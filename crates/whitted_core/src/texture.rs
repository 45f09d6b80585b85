//! Texture loading and caching for materials.
//!
//! Images are decoded once per filename and shared between primitives
//! through `Arc` handles held by the [`TextureCache`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Texture file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to decode texture {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Returned for lookups outside the image and for empty images.
pub const OPAQUE_BLACK: [u8; 4] = [0, 0, 0, 255];

/// A decoded texture with 8-bit RGBA pixels.
///
/// Pixels are stored row-major with row 0 at the top of the image.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data as [R, G, B, A], row-major
    pub pixels: Vec<[u8; 4]>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 4]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(rgba: [u8; 4]) -> Self {
        Self::new(1, 1, vec![rgba], "<solid>")
    }

    /// Get the pixel at (row, col), row 0 being the top of the image.
    pub fn pixel_at(&self, row: u32, col: u32) -> [u8; 4] {
        if row >= self.height || col >= self.width {
            return OPAQUE_BLACK;
        }
        let idx = (row as usize) * (self.width as usize) + col as usize;
        self.pixels.get(idx).copied().unwrap_or(OPAQUE_BLACK)
    }

    /// Look up the texel for a UV coordinate in [0, 1]^2 tiled
    /// `repeat_u` x `repeat_v` times.
    ///
    /// V=1 maps to row 0. Indices wrap modulo the image size and are then
    /// clamped to the last row/column.
    pub fn texel_at_uv(&self, u: f32, v: f32, repeat_u: f32, repeat_v: f32) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return OPAQUE_BLACK;
        }

        let col = wrap_index(u * repeat_u * self.width as f32, self.width);
        let row = wrap_index((1.0 - v) * repeat_v * self.height as f32, self.height);
        self.pixel_at(row, col)
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[u8; 4]>()
    }
}

fn wrap_index(x: f32, size: u32) -> u32 {
    let size = i64::from(size);
    (x.floor() as i64).rem_euclid(size).min(size - 1) as u32
}

/// Cache for loaded textures, keyed by filename as written in the scene.
pub struct TextureCache {
    /// Cached textures by file path
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);

        if texture.width == 0 || texture.height == 0 {
            log::warn!("Texture {} is empty, it will sample as black", path);
        }

        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Register an already decoded texture under `name`.
    ///
    /// Later loads of `name` return this texture instead of reading a file.
    pub fn insert(&mut self, name: impl Into<String>, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(name.into(), texture.clone());
        texture
    }

    /// Get a cached texture without loading.
    pub fn get(&self, path: &str) -> Option<Arc<Texture>> {
        self.textures.get(path).cloned()
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Get total memory usage of cached textures.
    pub fn total_size_bytes(&self) -> usize {
        self.textures.values().map(|t| t.size_bytes()).sum()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a texture from a file path.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    if !path.is_file() {
        return Err(TextureError::NotFound(path.to_path_buf()));
    }

    let img = image::open(path).map_err(|source| TextureError::Decode {
        path: path.display().to_string(),
        source,
    })?;

    // Alpha is ignored by the shading model, keep it as decoded
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels: Vec<[u8; 4]> = rgba.pixels().map(|p| p.0).collect();

    Ok(Texture::new(
        width,
        height,
        pixels,
        path.to_string_lossy().to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 texture: red, green on top; blue, white on the bottom.
    fn checker() -> Texture {
        Texture::new(
            2,
            2,
            vec![
                [255, 0, 0, 255],
                [0, 255, 0, 255],
                [0, 0, 255, 255],
                [255, 255, 255, 255],
            ],
            "checker",
        )
    }

    #[test]
    fn test_pixel_at_row_zero_is_top() {
        let tex = checker();
        assert_eq!(tex.pixel_at(0, 0), [255, 0, 0, 255]);
        assert_eq!(tex.pixel_at(0, 1), [0, 255, 0, 255]);
        assert_eq!(tex.pixel_at(1, 0), [0, 0, 255, 255]);
        assert_eq!(tex.pixel_at(5, 5), OPAQUE_BLACK);
    }

    #[test]
    fn test_texel_at_uv_orientation() {
        let tex = checker();
        // V near 1 is the top row, V near 0 the bottom row
        assert_eq!(tex.texel_at_uv(0.25, 0.75, 1.0, 1.0), [255, 0, 0, 255]);
        assert_eq!(tex.texel_at_uv(0.75, 0.75, 1.0, 1.0), [0, 255, 0, 255]);
        assert_eq!(tex.texel_at_uv(0.25, 0.25, 1.0, 1.0), [0, 0, 255, 255]);
        assert_eq!(tex.texel_at_uv(0.75, 0.25, 1.0, 1.0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_texel_at_uv_repeats() {
        let tex = checker();
        // With two repeats each tile spans half the U range
        assert_eq!(tex.texel_at_uv(0.3, 0.9, 2.0, 1.0), [0, 255, 0, 255]);
        assert_eq!(tex.texel_at_uv(0.55, 0.9, 2.0, 1.0), [255, 0, 0, 255]);
        assert_eq!(tex.texel_at_uv(0.8, 0.9, 2.0, 1.0), [0, 255, 0, 255]);
    }

    #[test]
    fn test_texel_at_uv_edges_stay_in_range() {
        let tex = checker();
        // U=1 wraps to column 0, V=0 wraps to row 0
        assert_eq!(tex.texel_at_uv(1.0, 1.0, 1.0, 1.0), [255, 0, 0, 255]);
        assert_eq!(tex.texel_at_uv(0.0, 0.0, 1.0, 1.0), [255, 0, 0, 255]);
        assert_eq!(tex.texel_at_uv(f32::NAN, 0.5, 1.0, 1.0), tex.texel_at_uv(0.0, 0.5, 1.0, 1.0));
    }

    #[test]
    fn test_empty_texture_is_black() {
        let tex = Texture::new(0, 0, Vec::new(), "empty");
        assert_eq!(tex.texel_at_uv(0.5, 0.5, 1.0, 1.0), OPAQUE_BLACK);
    }

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color([10, 20, 30, 255]);
        assert_eq!(tex.texel_at_uv(0.9, 0.1, 3.0, 3.0), [10, 20, 30, 255]);
    }

    #[test]
    fn test_texture_cache_shares_handles() {
        let mut cache = TextureCache::new();
        assert!(cache.is_empty());

        cache.insert("checker.png", checker());
        let a = cache.load("checker.png").unwrap();
        let b = cache.load("checker.png").unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_size_bytes(), 16);
    }

    #[test]
    fn test_texture_cache_missing_file() {
        let mut cache = TextureCache::with_base_dir("/definitely/not/here");
        match cache.load("missing.png") {
            Err(TextureError::NotFound(path)) => {
                assert!(path.ends_with("missing.png"));
            }
            other => panic!("expected NotFound, got {:?}", other.map(|t| t.path.clone())),
        }
        assert!(cache.get("missing.png").is_none());
    }
}
