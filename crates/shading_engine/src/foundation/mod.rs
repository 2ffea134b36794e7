//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the pipeline:
//! - Math and color types
//! - Ordered data-parallel mapping
//! - Logging utilities

pub mod math;
pub mod color;
pub mod parallel;
pub mod logging;
