//! Material definitions
//!
//! A material is a flat set of shading parameters applied to a whole sprite.
//! Definitions are immutable; per-instruction tweaks produce derived copies
//! through [`MaterialDefinition::with_overrides`].

use std::collections::BTreeMap;

use crate::foundation::color::Color3;

/// Named shading parameters for sprites
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDefinition {
    /// Registry name
    pub name: String,
    /// Base color
    pub albedo: Color3,
    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metallic: f32,
    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,
    /// Self-illumination added after lighting
    pub emissive: Color3,
    /// Open-ended named parameters for downstream consumers
    pub extras: BTreeMap<String, f32>,
}

impl MaterialDefinition {
    /// Create a rough, dielectric, non-emissive material
    pub fn new(name: impl Into<String>, albedo: Color3) -> Self {
        Self {
            name: name.into(),
            albedo,
            metallic: 0.0,
            roughness: 1.0,
            emissive: Color3::BLACK,
            extras: BTreeMap::new(),
        }
    }

    /// Set the metallic factor
    #[must_use]
    pub const fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    /// Set the roughness factor
    #[must_use]
    pub const fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    /// Set the emissive color
    #[must_use]
    pub const fn with_emissive(mut self, emissive: Color3) -> Self {
        self.emissive = emissive;
        self
    }

    /// Add a named extra parameter
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: f32) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    /// Derive a copy with any subset of fields replaced
    ///
    /// Extras are merged: override keys replace existing ones, other keys are kept.
    #[must_use]
    pub fn with_overrides(&self, overrides: &MaterialOverrides) -> Self {
        let mut extras = self.extras.clone();
        extras.extend(overrides.extras.iter().map(|(key, value)| (key.clone(), *value)));
        Self {
            name: self.name.clone(),
            albedo: overrides.albedo.unwrap_or(self.albedo),
            metallic: overrides.metallic.unwrap_or(self.metallic),
            roughness: overrides.roughness.unwrap_or(self.roughness),
            emissive: overrides.emissive.unwrap_or(self.emissive),
            extras,
        }
    }
}

/// Resolved field replacements for a material
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialOverrides {
    /// Replacement albedo
    pub albedo: Option<Color3>,
    /// Replacement emissive color
    pub emissive: Option<Color3>,
    /// Replacement metallic factor
    pub metallic: Option<f32>,
    /// Replacement roughness factor
    pub roughness: Option<f32>,
    /// Extra parameters merged over the material's own
    pub extras: BTreeMap<String, f32>,
}

impl MaterialOverrides {
    /// Whether applying these overrides would change nothing
    pub fn is_empty(&self) -> bool {
        self.albedo.is_none()
            && self.emissive.is_none()
            && self.metallic.is_none()
            && self.roughness.is_none()
            && self.extras.is_empty()
    }
}
