//! Post-processing
//!
//! Bloom followed by tone mapping, applied per surface.

pub mod bloom;
pub mod chain;
pub mod tone_mapping;

pub use bloom::{apply_bloom, BloomSettings};
pub use chain::{PostProcessResult, PostProcessingChain, PostProcessingSettings};
pub use tone_mapping::{apply_tone_mapping, ToneMapOperator, ToneMappingSettings};
