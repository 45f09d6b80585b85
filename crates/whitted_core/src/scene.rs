//! Scene description types.
//!
//! The renderer consumes a flat [`RenderData`]: every shape paired with its
//! cumulative object-to-world transform, plus camera, lights and the global
//! shading coefficients. [`SceneFile`] is the nested form read from disk;
//! [`SceneFile::flatten`] walks its node tree to produce the flat list.
//!
//! Angles are stored in radians. Scene files give them in degrees and the
//! conversion happens during deserialization.

use serde::{Deserialize, Deserializer};
use whitted_math::{Mat4, Vec3};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// The fixed set of canonical shapes.
///
/// All are unit-sized and centered at the object-space origin:
/// sphere r=0.5, cube side 1, cone base r=0.5 h=1, cylinder r=0.5 h=1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Sphere,
    Cube,
    Cone,
    Cylinder,
}

/// A texture binding on a material.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TextureMap {
    /// Image path, relative paths resolve against the scene file's directory
    pub filename: String,

    /// Horizontal repeat count
    #[serde(default = "one")]
    pub repeat_u: f32,

    /// Vertical repeat count
    #[serde(default = "one")]
    pub repeat_v: f32,
}

/// Phong material record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub reflective: Color,

    /// Specular exponent
    pub shininess: f32,

    /// Mix between texture color (1) and diffuse color (0)
    pub blend: f32,

    pub texture: Option<TextureMap>,
}

/// Camera record.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CameraRecord {
    pub position: Vec3,
    pub look: Vec3,
    pub up: Vec3,

    /// Vertical field of view in radians
    #[serde(deserialize_with = "degrees")]
    pub height_angle: f32,

    /// Passed through, unused by the shading model
    #[serde(default)]
    pub aperture: f32,

    /// Passed through, unused by the shading model
    #[serde(default)]
    pub focal_length: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Point,
    Directional,
    Spot,
}

/// Light record.
///
/// Directional lights ignore `position` and `attenuation`; only spot lights
/// read `angle` and `penumbra`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LightRecord {
    #[serde(rename = "type")]
    pub kind: LightKind,

    #[serde(default = "white")]
    pub color: Color,

    #[serde(default)]
    pub position: Vec3,

    #[serde(default = "straight_down")]
    pub direction: Vec3,

    /// Constant, linear and quadratic coefficients (c1, c2, c3)
    #[serde(default = "no_falloff")]
    pub attenuation: Vec3,

    /// Outer cone half-angle in radians
    #[serde(default, deserialize_with = "degrees")]
    pub angle: f32,

    /// Width of the falloff band inside the outer cone, in radians
    #[serde(default, deserialize_with = "degrees")]
    pub penumbra: f32,
}

/// Global Phong coefficients.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct GlobalCoefficients {
    pub ka: f32,
    pub kd: f32,
    pub ks: f32,
}

/// Output and feature toggles for a render.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub shadows: bool,
    pub reflections: bool,
    pub texture_mapping: bool,
    pub max_depth: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            shadows: true,
            reflections: true,
            texture_mapping: true,
            max_depth: 4,
        }
    }
}

/// A local transformation on a scene-graph node.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformOp {
    Translate {
        value: Vec3,
    },
    Scale {
        value: Vec3,
    },
    Rotate {
        axis: Vec3,
        #[serde(deserialize_with = "degrees")]
        angle: f32,
    },
    /// Column-major 4x4 matrix
    Matrix {
        value: Mat4,
    },
}

impl TransformOp {
    /// Convert to a 4x4 transformation matrix.
    pub fn to_matrix(&self) -> Mat4 {
        match self {
            TransformOp::Translate { value } => Mat4::from_translation(*value),
            TransformOp::Scale { value } => Mat4::from_scale(*value),
            TransformOp::Rotate { axis, angle } => {
                Mat4::from_axis_angle(axis.normalize_or_zero(), *angle)
            }
            TransformOp::Matrix { value } => *value,
        }
    }
}

/// A primitive attached to a scene-graph node.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PrimitiveRecord {
    #[serde(rename = "type")]
    pub kind: PrimitiveKind,

    #[serde(default)]
    pub material: Material,
}

/// A node in the scene graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneNode {
    /// Applied in declaration order, left-multiplied by the parent's CTM
    pub transforms: Vec<TransformOp>,
    pub primitives: Vec<PrimitiveRecord>,
    pub children: Vec<SceneNode>,
}

/// A shape ready for rendering: kind, cumulative transform and material.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeRecord {
    pub kind: PrimitiveKind,
    pub object_to_world: Mat4,
    pub material: Material,
}

/// A scene file as read from disk.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SceneFile {
    pub globals: GlobalCoefficients,
    pub camera: CameraRecord,

    #[serde(default)]
    pub lights: Vec<LightRecord>,

    #[serde(default)]
    pub root: SceneNode,

    #[serde(default)]
    pub render: RenderSettings,
}

/// Flattened scene description consumed by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderData {
    pub globals: GlobalCoefficients,
    pub camera: CameraRecord,
    pub lights: Vec<LightRecord>,

    /// In depth-first traversal order
    pub shapes: Vec<ShapeRecord>,

    pub settings: RenderSettings,
}

impl SceneFile {
    /// Flatten the scene graph into a list of shapes with their CTMs.
    ///
    /// Traversal is depth-first from the identity. A node's own primitives
    /// are emitted before its children's, and siblings keep declaration
    /// order, so the resulting list is deterministic.
    pub fn flatten(&self) -> RenderData {
        let mut shapes = Vec::new();
        collect_shapes(&self.root, Mat4::IDENTITY, &mut shapes);

        RenderData {
            globals: self.globals,
            camera: self.camera.clone(),
            lights: self.lights.clone(),
            shapes,
            settings: self.render.clone(),
        }
    }
}

impl RenderData {
    /// Distinct texture filenames referenced by the shapes, in first-use order.
    pub fn texture_filenames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for shape in &self.shapes {
            if let Some(map) = &shape.material.texture {
                if !names.contains(&map.filename.as_str()) {
                    names.push(&map.filename);
                }
            }
        }
        names
    }
}

fn collect_shapes(node: &SceneNode, parent_ctm: Mat4, shapes: &mut Vec<ShapeRecord>) {
    let ctm = node
        .transforms
        .iter()
        .fold(parent_ctm, |ctm, op| ctm * op.to_matrix());

    for primitive in &node.primitives {
        shapes.push(ShapeRecord {
            kind: primitive.kind,
            object_to_world: ctm,
            material: primitive.material.clone(),
        });
    }

    for child in &node.children {
        collect_shapes(child, ctm, shapes);
    }
}

fn degrees<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    f32::deserialize(deserializer).map(f32::to_radians)
}

fn one() -> f32 {
    1.0
}

fn white() -> Color {
    Color::ONE
}

fn straight_down() -> Vec3 {
    Vec3::NEG_Y
}

fn no_falloff() -> Vec3 {
    Vec3::new(1.0, 0.0, 0.0)
}
