//! # objlens Utilities
//!
//! Shared utilities for the objlens workspace, mainly the `tracing` based
//! logging setup used by the command line tool and by embedding hosts.

pub mod logging;

pub use logging::{
    init_logging, init_logging_for_session, init_logging_with_level, LogFormat, LogLevel, LoggingError,
};
pub use tracing::{debug, error, info, trace, warn};
