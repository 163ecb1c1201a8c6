use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Configuration read by the [`Logger`](crate::logger::Logger) on every call.
///
/// Controls which severities are emitted, which sinks are active and how the
/// caller location and console prefix are rendered. A logger holds one value
/// of this type; mutate it through
/// [`Logger::configure`](crate::logger::Logger::configure) at any time, the
/// next call sees the new values.
///
/// **Fields**
/// - `console_enabled`: write colored lines to the console sink.
/// - `debug_enabled` / `info_enabled` / `warning_enabled`: severity gate
///   toggles. ERROR, FATAL and NOTICE are always emitted.
/// - `skip_date` / `skip_time`: drop the date or time part of the console
///   line prefix.
/// - `skip_severity`: drop the `[SEVERITY]` tag from console lines.
/// - `skip_file`: drop the `[caller]` tag from console lines.
/// - `include_function`: annotate the innermost caller frame with its
///   function name.
/// - `single_frame`: report only the immediate caller instead of walking the
///   stack outward.
/// - `readable_objects`: render structured values as indented JSON.
/// - `text_file`: append-only plain text log file.
/// - `json_file`: file holding a single JSON array of records.
/// - `webhook_url`: receives a message card for every ERROR record.
/// - `application_title`: reported as the "Application" fact of webhook cards.
/// - `fixed_length`: width of the bracketed console caller tag, `-1` (or any
///   value `<= 0`) for unbounded.
/// - `ignored_files`: file names skipped while walking the stack.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub console_enabled: bool,
    pub debug_enabled: bool,
    pub info_enabled: bool,
    pub warning_enabled: bool,
    pub skip_date: bool,
    pub skip_time: bool,
    pub skip_severity: bool,
    pub skip_file: bool,
    pub include_function: bool,
    pub single_frame: bool,
    pub readable_objects: bool,
    pub text_file: Option<PathBuf>,
    pub json_file: Option<PathBuf>,
    pub webhook_url: Option<String>,
    pub application_title: String,
    pub fixed_length: i32,
    pub ignored_files: BTreeSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            debug_enabled: false,
            info_enabled: true,
            warning_enabled: true,
            skip_date: false,
            skip_time: false,
            skip_severity: false,
            skip_file: false,
            include_function: true,
            single_frame: false,
            readable_objects: false,
            text_file: None,
            json_file: None,
            webhook_url: None,
            application_title: String::new(),
            fixed_length: -1,
            ignored_files: BTreeSet::new(),
        }
    }
}

impl LoggerConfig {
    /// Skip frames from `file` (a bare file name such as `"db.rs"`) when
    /// resolving caller locations.
    pub fn ignore_file(&mut self, file: impl Into<String>) -> &mut Self {
        self.ignored_files.insert(file.into());
        self
    }

    /// Fixed caller-tag width, if one is configured.
    pub fn fixed_width(&self) -> Option<usize> {
        usize::try_from(self.fixed_length).ok().filter(|width| *width > 0)
    }
}
