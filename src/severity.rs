use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::LoggerConfig;

/// ANSI wrapper for INFO prefixes.
pub const INFO_COLOR: &str = "\x1b[0;32m";
/// ANSI wrapper for NOTICE prefixes.
pub const NOTICE_COLOR: &str = "\x1b[0;36m";
/// ANSI wrapper for WARNING prefixes.
pub const WARNING_COLOR: &str = "\x1b[0;33m";
/// ANSI wrapper for ERROR and FATAL prefixes.
pub const ERROR_COLOR: &str = "\x1b[0;31m";
/// ANSI wrapper for DEBUG prefixes.
pub const DEBUG_COLOR: &str = "\x1b[0;34m";
/// Resets the terminal color after a prefix.
pub const COLOR_RESET: &str = "\x1b[0m";

/// Severity attached to every [`LogRecord`](crate::record::LogRecord).
///
/// The tag text (`"INFO"`, `"WARNING"`, ...) is what ends up in every sink,
/// both as the bracketed console/text tag and as the JSON `severity` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
    Notice,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
            Severity::Notice => "NOTICE",
        }
    }

    /// Severity gate: whether a message at this level may be emitted under
    /// `config`.
    ///
    /// DEBUG, INFO and WARNING follow their toggles. ERROR, FATAL and NOTICE
    /// cannot be switched off.
    pub fn is_enabled(self, config: &LoggerConfig) -> bool {
        match self {
            Severity::Debug => config.debug_enabled,
            Severity::Info => config.info_enabled,
            Severity::Warning => config.warning_enabled,
            Severity::Error | Severity::Fatal | Severity::Notice => true,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Severity::Debug => DEBUG_COLOR,
            Severity::Info => INFO_COLOR,
            Severity::Warning => WARNING_COLOR,
            Severity::Error | Severity::Fatal => ERROR_COLOR,
            Severity::Notice => NOTICE_COLOR,
        }
    }

    /// Wrap `text` in this severity's ANSI color.
    pub fn paint(self, text: &str) -> String {
        format!("{}{}{}", self.color(), text, COLOR_RESET)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&tracing::Level> for Severity {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::ERROR => Severity::Error,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Severity::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gated_levels_follow_their_toggles() {
        let mut config = LoggerConfig::default();
        config.debug_enabled = false;
        config.info_enabled = false;
        config.warning_enabled = false;

        assert!(!Severity::Debug.is_enabled(&config));
        assert!(!Severity::Info.is_enabled(&config));
        assert!(!Severity::Warning.is_enabled(&config));

        config.debug_enabled = true;
        config.info_enabled = true;
        config.warning_enabled = true;

        assert!(Severity::Debug.is_enabled(&config));
        assert!(Severity::Info.is_enabled(&config));
        assert!(Severity::Warning.is_enabled(&config));
    }

    #[test]
    fn error_fatal_and_notice_cannot_be_disabled() {
        let mut config = LoggerConfig::default();
        config.debug_enabled = false;
        config.info_enabled = false;
        config.warning_enabled = false;

        for severity in [Severity::Error, Severity::Fatal, Severity::Notice] {
            assert!(severity.is_enabled(&config), "{severity} was gated");
        }
    }

    #[test]
    fn serializes_as_uppercase_tag() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"WARNING\"");
        assert_eq!(Severity::Fatal.to_string(), "FATAL");
    }

    #[test]
    fn paint_wraps_in_color_and_reset() {
        assert_eq!(Severity::Info.paint("[x]"), "\x1b[0;32m[x]\x1b[0m");
        assert_eq!(Severity::Fatal.color(), ERROR_COLOR);
    }
}
