//! Frame description consumed by the render graph
//!
//! A [`RenderFrame`] is produced by the gameplay layer once per tick: an
//! ordered list of sprite draw instructions plus some bookkeeping the
//! shading pipeline ignores (time, viewport, messages). Per-instruction
//! shading hints travel in the open-ended [`Metadata`] map; the pipeline
//! decodes them into typed overrides before doing any math.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Config;

use super::sprite::SpriteHandle;

/// Open-ended per-instruction metadata
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Untyped metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Explicit null
    Null,
    /// Boolean flag
    Bool(bool),
    /// Any number
    Number(f64),
    /// Free text
    Text(String),
    /// Ordered sequence
    List(Vec<MetadataValue>),
    /// Nested named values
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    /// Interpret the value as a finite scalar
    ///
    /// Numbers and numeric text resolve; everything else is `None`.
    pub fn as_f32(&self) -> Option<f32> {
        let value = match self {
            Self::Number(number) => *number as f32,
            Self::Text(text) => text.trim().parse::<f32>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Interpret the value as a sequence of at least three scalars
    ///
    /// Extra trailing components are ignored.
    pub fn as_triplet(&self) -> Option<[f32; 3]> {
        match self {
            Self::List(items) if items.len() >= 3 => {
                Some([items[0].as_f32()?, items[1].as_f32()?, items[2].as_f32()?])
            }
            _ => None,
        }
    }

    /// Borrow the value as text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the value as a nested map
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<f32> for MetadataValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for MetadataValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<[f32; 3]> for MetadataValue {
    fn from(value: [f32; 3]) -> Self {
        Self::List(value.iter().map(|&component| Self::from(component)).collect())
    }
}

impl From<[f64; 3]> for MetadataValue {
    fn from(value: [f64; 3]) -> Self {
        Self::List(value.iter().map(|&component| Self::Number(component)).collect())
    }
}

impl From<Vec<Self>> for MetadataValue {
    fn from(value: Vec<Self>) -> Self {
        Self::List(value)
    }
}

impl<K: Into<String>> FromIterator<(K, Self)> for MetadataValue {
    fn from_iter<I: IntoIterator<Item = (K, Self)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

/// Sprite reference as carried by a draw instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    /// Manifest identifier (may be empty)
    pub id: String,
    /// Texture path relative to the asset root
    pub texture: String,
    /// Pixel size
    #[serde(default)]
    pub size: (u32, u32),
    /// Normalised pivot
    #[serde(default)]
    pub pivot: (f32, f32),
    /// Optional 8-bit tint
    #[serde(default)]
    pub tint: Option<[u8; 3]>,
}

impl SpriteDescriptor {
    /// Create a descriptor with default size and pivot
    pub fn new(id: impl Into<String>, texture: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            texture: texture.into(),
            size: (0, 0),
            pivot: (0.5, 0.5),
            tint: None,
        }
    }

    /// Set the tint
    #[must_use]
    pub const fn with_tint(mut self, tint: [u8; 3]) -> Self {
        self.tint = Some(tint);
        self
    }
}

/// Single sprite draw instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawInstruction {
    /// Scene node that emitted the instruction
    pub node_id: String,
    /// Sprite to draw
    pub sprite: SpriteDescriptor,
    /// Screen-space position
    #[serde(default)]
    pub position: (f32, f32),
    /// Uniform scale
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Rotation in radians
    #[serde(default)]
    pub rotation: f32,
    /// Horizontal flip
    #[serde(default)]
    pub flip_x: bool,
    /// Vertical flip
    #[serde(default)]
    pub flip_y: bool,
    /// Layer name
    #[serde(default)]
    pub layer: String,
    /// Draw order within the layer
    #[serde(default)]
    pub z_index: i32,
    /// Shading hints and overrides
    #[serde(default)]
    pub metadata: Metadata,
}

const fn default_scale() -> f32 {
    1.0
}

impl DrawInstruction {
    /// Create an instruction at the origin with empty metadata
    pub fn new(node_id: impl Into<String>, sprite: SpriteDescriptor) -> Self {
        Self {
            node_id: node_id.into(),
            sprite,
            position: (0.0, 0.0),
            scale: 1.0,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
            layer: "default".to_string(),
            z_index: 0,
            metadata: Metadata::new(),
        }
    }

    /// Set the screen position
    #[must_use]
    pub const fn at(mut self, x: f32, y: f32) -> Self {
        self.position = (x, y);
        self
    }

    /// Set the z-index
    #[must_use]
    pub const fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Insert a metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// One frame of draw instructions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Simulation time in seconds
    #[serde(default)]
    pub time: f64,
    /// Viewport width and height in pixels
    #[serde(default)]
    pub viewport: (u32, u32),
    /// Ordered draw instructions
    #[serde(default)]
    pub instructions: Vec<DrawInstruction>,
    /// Human-readable messages (not used for shading)
    #[serde(default)]
    pub messages: Vec<String>,
}

impl RenderFrame {
    /// Create a frame from instructions
    pub fn new(time: f64, viewport: (u32, u32), instructions: Vec<DrawInstruction>) -> Self {
        Self { time, viewport, instructions, messages: Vec::new() }
    }
}

impl Config for RenderFrame {}

/// Draw instruction paired with its resolved sprite
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRenderInstruction {
    /// Instruction as emitted by the frame
    pub instruction: DrawInstruction,
    /// Sprite handle returned by the resolver (possibly a fallback)
    pub sprite: SpriteHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_coercion() {
        assert_eq!(MetadataValue::from(0.25_f32).as_f32(), Some(0.25));
        assert_eq!(MetadataValue::from(" 0.5 ").as_f32(), Some(0.5));
        assert_eq!(MetadataValue::from("shiny").as_f32(), None);
        assert_eq!(MetadataValue::Bool(true).as_f32(), None);
        assert_eq!(MetadataValue::Number(f64::NAN).as_f32(), None);
    }

    #[test]
    fn test_triplet_requires_three_numbers() {
        assert_eq!(MetadataValue::from([0.1, 0.2, 0.3]).as_triplet(), Some([0.1, 0.2, 0.3]));

        let short = MetadataValue::List(vec![1.0_f32.into(), 2.0_f32.into()]);
        assert_eq!(short.as_triplet(), None);

        let mixed = MetadataValue::List(vec![1.0_f32.into(), "x".into(), 2.0_f32.into()]);
        assert_eq!(mixed.as_triplet(), None);

        let long = MetadataValue::List(vec![1.0_f32.into(), 0.0_f32.into(), 0.0_f32.into(), 9.0_f32.into()]);
        assert_eq!(long.as_triplet(), Some([1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_untagged_metadata_parses_from_ron() {
        let metadata: Metadata = ron::from_str(
            r#"{ "material": "terrain", "normal": [0.0, 1.0, 0.0], "material_overrides": { "metallic": 0.4 } }"#,
        )
        .unwrap();

        assert_eq!(metadata["material"].as_str(), Some("terrain"));
        assert_eq!(metadata["normal"].as_triplet(), Some([0.0, 1.0, 0.0]));
        let overrides = metadata["material_overrides"].as_map().unwrap();
        assert_eq!(overrides["metallic"].as_f32(), Some(0.4));
    }

    #[test]
    fn test_frame_from_ron_uses_defaults() {
        let frame = RenderFrame::from_ron_str(
            r#"(
                time: 1.5,
                viewport: (640, 360),
                instructions: [
                    (
                        node_id: "player",
                        sprite: (id: "ship", texture: "ship.png", tint: Some((255, 128, 0))),
                        position: (10.0, 20.0),
                        metadata: { "material": "emissive_ui" },
                    ),
                ],
            )"#,
        )
        .unwrap();

        let instruction = &frame.instructions[0];
        assert_eq!(instruction.scale, 1.0);
        assert_eq!(instruction.z_index, 0);
        assert_eq!(instruction.sprite.tint, Some([255, 128, 0]));
        assert_eq!(instruction.metadata["material"].as_str(), Some("emissive_ui"));
        assert!(frame.messages.is_empty());
    }
}
