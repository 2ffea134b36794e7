//! Material registry
//!
//! Resolves material definitions for draw calls. The registry is built once
//! per pipeline configuration and shared read-only between frames (and
//! between worker threads inside a frame), so lookups hand out `Arc`s rather
//! than copies.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::render::frame::AppliedRenderInstruction;
use crate::render::sprite::ManifestSprite;

use super::definition::MaterialDefinition;
use super::overrides::InstructionOverrides;

/// Material registry construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaterialError {
    /// No definitions were supplied
    #[error("At least one material definition must be provided")]
    Empty,

    /// The designated default is not among the definitions
    #[error("Unknown default material '{0}'")]
    UnknownDefault(String),
}

/// Lookup table of named materials with a designated default
#[derive(Debug, Clone)]
pub struct MaterialRegistry {
    materials: HashMap<String, Arc<MaterialDefinition>>,
    /// Registration order, without duplicates
    order: Vec<String>,
    default: Arc<MaterialDefinition>,
}

impl MaterialRegistry {
    /// Build a registry
    ///
    /// `default_material` defaults to the first definition. A later definition
    /// with an already-registered name replaces the earlier one.
    ///
    /// # Errors
    ///
    /// [`MaterialError::Empty`] without definitions,
    /// [`MaterialError::UnknownDefault`] when the default name is not registered.
    pub fn new(
        definitions: impl IntoIterator<Item = MaterialDefinition>,
        default_material: Option<&str>,
    ) -> Result<Self, MaterialError> {
        let mut materials = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            let name = definition.name.clone();
            if materials.insert(name.clone(), Arc::new(definition)).is_some() {
                log::warn!("Material '{}' defined more than once; keeping the last definition", name);
            } else {
                order.push(name);
            }
        }

        let default_name = match default_material {
            Some(name) => name.to_string(),
            None => order.first().cloned().ok_or(MaterialError::Empty)?,
        };
        if materials.is_empty() {
            return Err(MaterialError::Empty);
        }
        let default = materials
            .get(&default_name)
            .cloned()
            .ok_or(MaterialError::UnknownDefault(default_name))?;

        log::debug!(
            "Material registry ready: {} materials, default '{}'",
            order.len(),
            default.name
        );
        Ok(Self { materials, order, default })
    }

    /// The default material
    pub const fn default_material(&self) -> &Arc<MaterialDefinition> {
        &self.default
    }

    /// Look up a material by name
    pub fn get(&self, name: &str) -> Option<&Arc<MaterialDefinition>> {
        self.materials.get(name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered materials (always ≥ 1)
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Resolve a material by name, falling back to the default
    ///
    /// Absent, empty and unknown names all yield the default. Never fails.
    pub fn resolve(&self, name: Option<&str>) -> &Arc<MaterialDefinition> {
        name.filter(|name| !name.is_empty())
            .and_then(|name| self.materials.get(name))
            .unwrap_or(&self.default)
    }

    /// Resolve the material for an already-decoded instruction
    ///
    /// The base material is the requested one, else the sprite manifest's
    /// lighting hint, else the default. Overrides are layered on top.
    pub fn resolve_with_overrides(
        &self,
        overrides: &InstructionOverrides,
        manifest: Option<&ManifestSprite>,
    ) -> Arc<MaterialDefinition> {
        let requested = match &overrides.material {
            Some(name) => Some(name.as_str()),
            None => manifest.and_then(ManifestSprite::material_hint),
        };
        let base = self.resolve(requested);
        let material_overrides = overrides.material_overrides(base);
        if material_overrides.is_empty() {
            Arc::clone(base)
        } else {
            Arc::new(base.with_overrides(&material_overrides))
        }
    }

    /// Resolve the material for a draw instruction, decoding its metadata
    pub fn resolve_for_instruction(&self, applied: &AppliedRenderInstruction) -> Arc<MaterialDefinition> {
        let overrides = InstructionOverrides::decode(&applied.instruction.metadata);
        self.resolve_with_overrides(&overrides, applied.sprite.manifest.as_ref())
    }
}
