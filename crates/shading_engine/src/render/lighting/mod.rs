//! Lighting system
//!
//! Light definitions, the shared lighting environment, and the pass that
//! shades G-buffer samples against them.

pub mod light;
pub mod pass;

pub use light::{Light, LightKind, LightingEnvironment, DEFAULT_LIGHT_DIRECTION};
pub use pass::{
    directional_intensity, point_intensity, shade_sample, LightingContribution, LightingPass,
    LightingResult, LitSurface,
};
