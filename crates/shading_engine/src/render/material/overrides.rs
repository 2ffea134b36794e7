//! Per-instruction override decoding
//!
//! Draw instructions carry their shading hints in an untyped metadata map.
//! [`InstructionOverrides::decode`] reads that map exactly once and produces
//! a typed record; everything downstream works on the typed record only.
//!
//! Recognised keys:
//!
//! | key                  | shape                                   |
//! |----------------------|-----------------------------------------|
//! | `material`           | material name                           |
//! | `albedo`, `emissive` | `[r, g, b]`                             |
//! | `metallic`, `roughness` | number (or numeric text)             |
//! | `material_overrides` | map: the four fields above + extras     |
//! | `material_extras`    | map of named numbers                    |
//! | `normal`             | `[x, y, z]`                             |
//! | `depth`              | number                                  |
//!
//! Malformed values are dropped silently; decoding never fails.

use std::collections::BTreeMap;

use crate::foundation::color::Color3;
use crate::foundation::math::{normalize_or, Vec3};
use crate::render::frame::{Metadata, MetadataValue};

use super::definition::{MaterialDefinition, MaterialOverrides};

/// Field names with dedicated meaning inside `material_overrides`
const MATERIAL_FIELDS: [&str; 4] = ["albedo", "emissive", "metallic", "roughness"];

/// A scalar override that was present in metadata
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarOverride {
    /// Numeric value, already clamped to [0, 1]
    Value(f32),
    /// Present but not numeric; resolves to the material's own value
    Unresolvable,
}

impl ScalarOverride {
    fn decode(value: &MetadataValue) -> Self {
        value
            .as_f32()
            .map_or(Self::Unresolvable, |v| Self::Value(v.clamp(0.0, 1.0)))
    }

    /// The override value, or `base` when unresolvable
    pub const fn resolve(self, base: f32) -> f32 {
        match self {
            Self::Value(value) => value,
            Self::Unresolvable => base,
        }
    }
}

/// Nested `material_overrides` bundle
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverrideBundle {
    /// Albedo, as `[r, g, b]` or `{r, g, b}`
    pub albedo: Option<Color3>,
    /// Emissive, as `[r, g, b]` or `{r, g, b}`
    pub emissive: Option<Color3>,
    /// Metallic factor
    pub metallic: Option<ScalarOverride>,
    /// Roughness factor
    pub roughness: Option<ScalarOverride>,
    /// Every other numeric entry
    pub extras: BTreeMap<String, f32>,
}

impl OverrideBundle {
    fn decode(map: &BTreeMap<String, MetadataValue>) -> Self {
        let extras = map
            .iter()
            .filter(|(key, _)| !MATERIAL_FIELDS.contains(&key.as_str()))
            .filter_map(|(key, value)| value.as_f32().map(|v| (key.clone(), v)))
            .collect();
        Self {
            albedo: map.get("albedo").and_then(bundle_color),
            emissive: map.get("emissive").and_then(bundle_color),
            metallic: scalar(map, "metallic"),
            roughness: scalar(map, "roughness"),
            extras,
        }
    }
}

/// Typed view of an instruction's shading metadata
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstructionOverrides {
    /// Requested material; `Some("")` when the key held something unusable
    pub material: Option<String>,
    /// Top-level albedo
    pub albedo: Option<Color3>,
    /// Top-level emissive
    pub emissive: Option<Color3>,
    /// Top-level metallic
    pub metallic: Option<ScalarOverride>,
    /// Top-level roughness
    pub roughness: Option<ScalarOverride>,
    /// `material_overrides` bundle
    pub bundle: Option<OverrideBundle>,
    /// `material_extras` bundle
    pub extras: BTreeMap<String, f32>,
    /// Surface normal, unit length
    pub normal: Option<Vec3>,
    /// Explicit depth
    pub depth: Option<f32>,
}

impl InstructionOverrides {
    /// Decode instruction metadata
    pub fn decode(metadata: &Metadata) -> Self {
        let material = metadata.get("material").and_then(|value| match value {
            MetadataValue::Null => None,
            MetadataValue::Text(name) => Some(name.clone()),
            _ => Some(String::new()),
        });

        let extras = metadata
            .get("material_extras")
            .and_then(MetadataValue::as_map)
            .map(|map| {
                map.iter()
                    .filter_map(|(key, value)| value.as_f32().map(|v| (key.clone(), v)))
                    .collect()
            })
            .unwrap_or_default();

        let normal = metadata
            .get("normal")
            .and_then(MetadataValue::as_triplet)
            .and_then(|components| {
                let fallback = Vec3::zeros();
                let normal = normalize_or(components, fallback);
                (normal != fallback).then_some(normal)
            });

        Self {
            material,
            albedo: metadata.get("albedo").and_then(sequence_color),
            emissive: metadata.get("emissive").and_then(sequence_color),
            metallic: scalar(metadata, "metallic"),
            roughness: scalar(metadata, "roughness"),
            bundle: metadata
                .get("material_overrides")
                .and_then(MetadataValue::as_map)
                .map(OverrideBundle::decode),
            extras,
            normal,
            depth: metadata.get("depth").and_then(MetadataValue::as_f32),
        }
    }

    /// Collapse the layered overrides against a base material
    ///
    /// Top-level fields win; the nested bundle only fills fields the top level
    /// left unset; `material_extras` is merged over the bundle's extras.
    pub fn material_overrides(&self, base: &MaterialDefinition) -> MaterialOverrides {
        let mut albedo = self.albedo;
        let mut emissive = self.emissive;
        let mut metallic = self.metallic;
        let mut roughness = self.roughness;
        let mut extras = BTreeMap::new();

        if let Some(bundle) = &self.bundle {
            albedo = albedo.or(bundle.albedo);
            emissive = emissive.or(bundle.emissive);
            metallic = metallic.or(bundle.metallic);
            roughness = roughness.or(bundle.roughness);
            extras.extend(bundle.extras.iter().map(|(k, v)| (k.clone(), *v)));
        }
        extras.extend(self.extras.iter().map(|(k, v)| (k.clone(), *v)));

        MaterialOverrides {
            albedo,
            emissive,
            metallic: metallic.map(|value| value.resolve(base.metallic)),
            roughness: roughness.map(|value| value.resolve(base.roughness)),
            extras,
        }
    }
}

/// Scalar override under `key`; an explicit null counts as absent
fn scalar(map: &BTreeMap<String, MetadataValue>, key: &str) -> Option<ScalarOverride> {
    map.get(key)
        .filter(|value| !matches!(value, MetadataValue::Null))
        .map(ScalarOverride::decode)
}

fn sequence_color(value: &MetadataValue) -> Option<Color3> {
    value.as_triplet().map(Color3::from_array)
}

/// Bundle colors also accept `{r, g, b}` (or `{x, y, z}`) maps, missing channels read as 0
fn bundle_color(value: &MetadataValue) -> Option<Color3> {
    if let Some(map) = value.as_map() {
        let channel = |primary: &str, alias: &str| match map.get(primary).or_else(|| map.get(alias)) {
            Some(component) => component.as_f32(),
            None => Some(0.0),
        };
        return Some(Color3::new(channel("r", "x")?, channel("g", "y")?, channel("b", "z")?));
    }
    sequence_color(value)
}
