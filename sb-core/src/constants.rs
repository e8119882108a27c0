//! Workspace-wide constants.

/// Application name, used for platform directories and log file names.
pub const APP_NAME: &str = "SocketBridge";

/// Default capacity of the mapped-event broadcast channel.
pub const DEFAULT_STREAM_CAPACITY: usize = 256;

/// Log file prefix for the daily rolling appender.
pub const LOG_FILE_NAME: &str = "socket-bridge.log";

/// Error message used when an error payload carries no usable message.
pub const FALLBACK_ERROR_MESSAGE: &str = "Socket error";

/// Prefix for error messages synthesized from unrecognized payload values.
pub const UNKNOWN_ERROR_PREFIX: &str = "Socket error: ";
