//! Scene file loading.
//!
//! Scene files are JSON documents deserialized into a [`SceneFile`],
//! validated, and flattened into the [`RenderData`] the renderer consumes.
//!
//! ```json
//! {
//!   "globals": { "ka": 0.5, "kd": 0.5, "ks": 0.5 },
//!   "camera": { "position": [0, 0, 5], "look": [0, 0, -1], "up": [0, 1, 0], "height_angle": 45 },
//!   "lights": [ { "type": "directional", "color": [1, 1, 1], "direction": [0, 0, -1] } ],
//!   "root": { "primitives": [ { "type": "sphere", "material": { "diffuse": [1, 0, 0] } } ] }
//! }
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::scene::{RenderData, SceneFile, SceneNode, TransformOp};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Invalid(String),
}

/// Result type for loading operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Deepest reflection recursion a scene file may request.
pub const MAX_RECURSION_DEPTH: u32 = 32;

/// Load a scene file from disk and flatten it.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<RenderData> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let data = load_scene_from_str(&source)?;
    log::info!(
        "Loaded scene {}: {} shapes, {} lights",
        path.display(),
        data.shapes.len(),
        data.lights.len()
    );
    Ok(data)
}

/// Parse, validate and flatten a scene from a JSON string.
pub fn load_scene_from_str(source: &str) -> SceneResult<RenderData> {
    let file: SceneFile = serde_json::from_str(source)?;
    validate(&file)?;
    Ok(file.flatten())
}

fn validate(file: &SceneFile) -> SceneResult<()> {
    let camera = &file.camera;
    if camera.look.length_squared() == 0.0 {
        return Err(invalid("camera look vector has zero length"));
    }
    if camera.up.cross(camera.look).length_squared() == 0.0 {
        return Err(invalid("camera up vector is zero or parallel to look"));
    }
    if !(camera.height_angle > 0.0 && camera.height_angle < std::f32::consts::PI) {
        return Err(invalid("camera height angle must be in (0, 180) degrees"));
    }
    if file.render.width == 0 || file.render.height == 0 {
        return Err(invalid("image width and height must be positive"));
    }
    if file.render.max_depth > MAX_RECURSION_DEPTH {
        return Err(invalid(format!(
            "max_depth {} exceeds the limit of {}",
            file.render.max_depth, MAX_RECURSION_DEPTH
        )));
    }

    for (i, light) in file.lights.iter().enumerate() {
        if light.direction.length_squared() == 0.0 {
            log::warn!("Light {} has a zero direction", i);
        }
    }

    validate_node(&file.root)
}

fn validate_node(node: &SceneNode) -> SceneResult<()> {
    for op in &node.transforms {
        if let TransformOp::Rotate { axis, .. } = op {
            if axis.length_squared() == 0.0 {
                return Err(invalid("rotation axis has zero length"));
            }
        }
    }

    for primitive in &node.primitives {
        if let Some(map) = &primitive.material.texture {
            if map.repeat_u <= 0.0 || map.repeat_v <= 0.0 {
                return Err(invalid(format!(
                    "texture {} has a non-positive repeat count",
                    map.filename
                )));
            }
        }
    }

    node.children.iter().try_for_each(validate_node)
}

fn invalid(message: impl Into<String>) -> SceneError {
    SceneError::Invalid(message.into())
}
