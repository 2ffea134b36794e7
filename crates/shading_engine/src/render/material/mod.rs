//! Material system for the shading pipeline
//!
//! Materials are flat, per-sprite shading parameters (no texture sampling):
//! - [`MaterialDefinition`]: immutable named parameter set
//! - [`MaterialRegistry`]: shared catalogue with a designated default
//! - [`InstructionOverrides`]: typed decoding of per-instruction metadata
//!
//! # Resolution order
//!
//! 1. Base material: instruction `material` → sprite manifest `lighting` hint → registry default
//! 2. Top-level `albedo` / `emissive` / `metallic` / `roughness`
//! 3. `material_overrides` bundle, filling only what step 2 left unset
//! 4. `material_extras`, merged over all extra parameters

pub mod definition;
pub mod overrides;
pub mod registry;

pub use definition::{MaterialDefinition, MaterialOverrides};
pub use overrides::{InstructionOverrides, OverrideBundle, ScalarOverride};
pub use registry::{MaterialError, MaterialRegistry};
