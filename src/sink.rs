use std::io;
use std::path::PathBuf;

use crate::config::LoggerConfig;
use crate::record::LogRecord;

/// Destination for [`LogRecord`]s produced by the logger.
///
/// Sinks are called synchronously, in registration order, from the thread
/// that made the log call, while the logger's sink lock is held. Each sink
/// decides from `config` whether it is active for this call (a path is set,
/// console output is on, ...).
pub trait Sink: Send {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Write a single record.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was written or the sink is inactive.
    /// - `Err(..)` if the sink failed. The logger disables the failing file
    ///   path or console output and reports the failure as one ERROR record to the remaining
    ///   sinks; the error never reaches the log call's caller.
    fn write(&mut self, record: &LogRecord, config: &LoggerConfig) -> Result<(), SinkError>;

    /// Release any open handles. The sink reopens lazily on the next write.
    ///
    /// Default implementation is a no-op.
    fn close(&mut self) {}
}

/// Which configured file a [`SinkError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTarget {
    Text,
    Json,
}

/// Error type returned by [`Sink::write`].
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("Unable to open file {}", path.display())]
    Open {
        target: FileTarget,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to write file {}", path.display())]
    Write {
        target: FileTarget,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to append to JSON file {}: no closing bracket", path.display())]
    CorruptJson { path: PathBuf },

    #[error("Unable to write console output")]
    Console {
        #[source]
        source: io::Error,
    },

    #[error("{sink} sink failed: {message}")]
    Other { sink: &'static str, message: String },
}

impl SinkError {
    /// Configured file that should be switched off after this error.
    pub fn disabled_target(&self) -> Option<FileTarget> {
        match self {
            SinkError::Open { target, .. } | SinkError::Write { target, .. } => Some(*target),
            SinkError::CorruptJson { .. } => Some(FileTarget::Json),
            SinkError::Console { .. } | SinkError::Other { .. } => None,
        }
    }

    /// Whether console output should be switched off after this error.
    pub fn disables_console(&self) -> bool {
        matches!(self, SinkError::Console { .. })
    }
}
