//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Library code only ever talks to the `log` facade; binaries call this once
/// at startup so `RUST_LOG` controls what reaches stderr.
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system, ignoring a logger that is already installed
///
/// Useful from tests and tools that may run more than once per process.
pub fn try_init() -> bool {
    env_logger::try_init().is_ok()
}
