//! Render pipeline configuration
//!
//! [`PipelineConfigFile`] is the on-disk schema (TOML or RON). It is decoded
//! into [`RenderPipelineConfig`], which holds the shared, immutable records the
//! render graph is built from.
//!
//! ```toml
//! [materials]
//! default = "default_lit"
//!
//! [[materials.definitions]]
//! name = "default_lit"
//! albedo = [0.8, 0.8, 0.8]
//!
//! [lighting]
//! ambient_color = [0.2, 0.2, 0.25]
//!
//! [[lighting.lights]]
//! kind = "directional"
//! direction = [0.0, 0.0, -1.0]
//!
//! [post_processing.tone_mapping]
//! operator = "aces"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::foundation::color::Color3;
use crate::foundation::math::{normalize_or, Vec3};

use super::lighting::{Light, LightKind, LightingEnvironment, DEFAULT_LIGHT_DIRECTION};
use super::material::{MaterialDefinition, MaterialError, MaterialRegistry};
use super::post::{PostProcessingChain, PostProcessingSettings};

/// Bundled default configuration
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../resources/rendering.toml");

/// Errors raised while building a pipeline configuration
#[derive(Debug, Error)]
pub enum PipelineConfigError {
    /// The file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The material section is invalid
    #[error("Material error: {0}")]
    Material(#[from] MaterialError),
}

/// Configuration file schema
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfigFile {
    /// Material definitions
    pub materials: MaterialSection,
    /// Ambient term and lights
    pub lighting: LightingSection,
    /// Bloom and tone mapping
    pub post_processing: PostProcessingSettings,
}

impl Config for PipelineConfigFile {}

/// `[materials]` section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSection {
    /// Default material name (first definition when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Definitions in declaration order
    pub definitions: Vec<MaterialEntry>,
}

/// One material definition as written in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    /// Material name
    pub name: String,
    /// Surface color
    #[serde(default = "white")]
    pub albedo: [f32; 3],
    /// Self-illumination
    #[serde(default)]
    pub emissive: [f32; 3],
    /// Metallic factor
    #[serde(default)]
    pub metallic: f32,
    /// Roughness factor
    #[serde(default = "one")]
    pub roughness: f32,
    /// Extra named parameters
    #[serde(default)]
    pub extras: BTreeMap<String, f32>,
}

impl MaterialEntry {
    fn to_definition(&self) -> MaterialDefinition {
        let mut definition = MaterialDefinition::new(self.name.clone(), Color3::from_array(self.albedo))
            .with_emissive(Color3::from_array(self.emissive))
            .with_metallic(self.metallic)
            .with_roughness(self.roughness);
        definition.extras.clone_from(&self.extras);
        definition
    }
}

/// `[lighting]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSection {
    /// Ambient light color
    pub ambient_color: [f32; 3],
    /// Lights in declaration order
    pub lights: Vec<LightEntry>,
}

impl Default for LightingSection {
    fn default() -> Self {
        Self {
            ambient_color: LightingEnvironment::DEFAULT_AMBIENT.to_array(),
            lights: Vec::new(),
        }
    }
}

/// One light as written in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightEntry {
    /// Light name (`light_<index>` when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Light type, case-insensitive
    #[serde(default = "default_light_kind", alias = "type")]
    pub kind: String,
    /// Light color
    #[serde(default = "white")]
    pub color: [f32; 3],
    /// Light intensity
    #[serde(default = "one")]
    pub intensity: f32,
    /// Direction the light travels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<[f32; 3]>,
    /// Light position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 3]>,
    /// Falloff distance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f32>,
}

impl LightEntry {
    fn to_light(&self, index: usize) -> Light {
        let name = self.name.clone().unwrap_or_else(|| format!("light_{index}"));
        let kind = LightKind::from_name(&self.kind);
        if let LightKind::Other(other) = &kind {
            log::warn!("Light '{}' has unsupported kind '{}'; it will not be shaded", name, other);
        }
        Light {
            name,
            kind,
            color: Color3::from_array(self.color),
            intensity: self.intensity,
            direction: self
                .direction
                .map(|direction| normalize_or(direction, Vec3::from(DEFAULT_LIGHT_DIRECTION))),
            position: self.position.map(Vec3::from),
            range: self.range,
        }
    }
}

const fn white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

const fn one() -> f32 {
    1.0
}

fn default_light_kind() -> String {
    "directional".to_string()
}

/// Decoded pipeline configuration shared by every frame
#[derive(Debug, Clone)]
pub struct RenderPipelineConfig {
    /// Material lookup table
    pub material_registry: Arc<MaterialRegistry>,
    /// Ambient term and lights
    pub lighting: Arc<LightingEnvironment>,
    /// Bloom and tone mapping settings
    pub post_processing: PostProcessingSettings,
}

impl RenderPipelineConfig {
    /// Build the records from a decoded file
    ///
    /// # Errors
    ///
    /// Fails when the material section has no definitions or names an
    /// unknown default.
    pub fn from_file_config(file: &PipelineConfigFile) -> Result<Self, PipelineConfigError> {
        let registry = MaterialRegistry::new(
            file.materials.definitions.iter().map(MaterialEntry::to_definition),
            file.materials.default.as_deref(),
        )?;

        let lights = file
            .lighting
            .lights
            .iter()
            .enumerate()
            .map(|(index, entry)| entry.to_light(index))
            .collect();
        let lighting = LightingEnvironment {
            ambient_color: Color3::from_array(file.lighting.ambient_color),
            lights,
        };

        log::info!(
            "Render pipeline configured: {} materials, {} lights, tone mapping '{}'",
            registry.len(),
            lighting.lights.len(),
            file.post_processing.tone_mapping.operator
        );
        Ok(Self {
            material_registry: Arc::new(registry),
            lighting: Arc::new(lighting),
            post_processing: file.post_processing.clone().sanitized(),
        })
    }

    /// Load a `.toml` or `.ron` configuration file
    ///
    /// # Errors
    ///
    /// I/O, parse and material errors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineConfigError> {
        let file = PipelineConfigFile::load_from_file(path)?;
        Self::from_file_config(&file)
    }

    /// Parse TOML configuration text
    ///
    /// # Errors
    ///
    /// Parse and material errors.
    pub fn from_toml_str(contents: &str) -> Result<Self, PipelineConfigError> {
        Self::from_file_config(&PipelineConfigFile::from_toml_str(contents)?)
    }

    /// Parse RON configuration text
    ///
    /// # Errors
    ///
    /// Parse and material errors.
    pub fn from_ron_str(contents: &str) -> Result<Self, PipelineConfigError> {
        Self::from_file_config(&PipelineConfigFile::from_ron_str(contents)?)
    }

    /// Post-processing chain for these settings
    pub fn build_post_chain(&self) -> PostProcessingChain {
        PostProcessingChain::new(self.post_processing.clone())
    }
}

/// Pipeline built from the bundled default configuration
///
/// # Errors
///
/// Only if the bundled file itself is broken.
pub fn default_pipeline() -> Result<RenderPipelineConfig, PipelineConfigError> {
    RenderPipelineConfig::from_toml_str(DEFAULT_CONFIG_TOML)
}
