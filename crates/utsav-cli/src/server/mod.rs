//! HTTP server startup with lifecycle management.
//!
//! This module provides a clean API for starting the HTTP server with
//! enhanced error handling and graceful shutdown support.

mod error;
mod http_server;
mod shutdown;

pub use self::error::{ServerError, ServerResult};
pub use self::http_server::serve;
use self::shutdown::shutdown_signal;

/// Tracing target for server startup events.
pub const TRACING_TARGET_STARTUP: &str = "utsav_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "utsav_cli::server::shutdown";
