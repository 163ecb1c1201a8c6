//! Optional process-wide [`Logger`].
//!
//! Applications that prefer free functions over passing a logger around
//! install one with [`set_global`] at startup. If nothing was installed, the
//! first use builds a logger from the `FANOUT_LOG_*` environment variables.

use std::sync::{Arc, OnceLock};

use crate::config::LoggerConfig;
use crate::logger::Logger;
use crate::value::Value;

static GLOBAL: OnceLock<Arc<Logger>> = OnceLock::new();

/// Install `logger` as the process-wide logger.
///
/// Returns the logger back when one is already installed.
pub fn set_global(logger: Arc<Logger>) -> Result<(), Arc<Logger>> {
    GLOBAL.set(logger)
}

pub fn global() -> &'static Arc<Logger> {
    GLOBAL.get_or_init(|| Arc::new(Logger::new(LoggerConfig::from_env())))
}

#[track_caller]
pub fn debug(message: impl Into<Value>) {
    global().debug(message);
}

#[track_caller]
pub fn info(message: impl Into<Value>) {
    global().info(message);
}

#[track_caller]
pub fn warning(message: impl Into<Value>) {
    global().warning(message);
}

#[track_caller]
pub fn error(message: impl Into<Value>) {
    global().error(message);
}

#[track_caller]
pub fn fatal(message: impl Into<Value>) {
    global().fatal(message);
}

#[track_caller]
pub fn notice(message: impl Into<Value>) {
    global().notice(message);
}

#[track_caller]
pub fn printf(template: impl Into<Value>, args: &[Value]) {
    global().printf(template, args);
}
