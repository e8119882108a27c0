//! socket-bridge core - shared error handling, configuration, and logging.
//!
//! This crate provides the foundation used by the other socket-bridge crates:
//! - Bridge configuration (logging, event stream) persisted as TOML
//! - A unified error type
//! - Structured logging with tracing
//! - Platform directory lookup
//! - Common constants

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod platform;

// Re-export commonly used items at the crate root
pub use config::BridgeConfig;
pub use error::{SbError, SbResult};
pub use logging::init_logging;
pub use platform::Platform;
