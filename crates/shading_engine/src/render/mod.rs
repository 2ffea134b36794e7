//! Deferred shading pipeline
//!
//! A frame flows through four stages, each a pure function of its input and
//! the shared configuration:
//!
//! - [`material`]: resolves the material of every draw instruction
//! - [`gbuffer`]: one shading sample per instruction
//! - [`lighting`]: ambient plus per-light contributions
//! - [`post`]: bloom then tone mapping
//!
//! [`graph::RenderGraph`] wires them together; [`pipeline_config`] loads the
//! shared configuration from disk.

pub mod frame;
pub mod gbuffer;
pub mod graph;
pub mod lighting;
pub mod material;
pub mod pipeline_config;
pub mod post;
pub mod sprite;

#[cfg(test)]
mod tests;

pub use frame::{AppliedRenderInstruction, DrawInstruction, RenderFrame, SpriteDescriptor};
pub use gbuffer::{GBuffer, GBufferPass, GBufferSample};
pub use graph::{AppliedRenderFrame, RenderGraph};
pub use pipeline_config::{PipelineConfigError, PipelineConfigFile, RenderPipelineConfig};
pub use sprite::{SpriteCatalog, SpriteHandle, SpriteResolver};
