//! Environment variable names used by this crate for convenient
//! configuration of a [`Logger`](crate::logger::Logger) from services.
//!
//! These are purely helpers; `LoggerConfig::default()` never reads the
//! environment, only [`LoggerConfig::from_env`] does.

use std::path::PathBuf;

use crate::config::LoggerConfig;

/// Console output on/off.
pub const FANOUT_LOG_CONSOLE_ENV: &str = "FANOUT_LOG_CONSOLE";

/// Emit DEBUG records.
pub const FANOUT_LOG_DEBUG_ENV: &str = "FANOUT_LOG_DEBUG";

/// Emit INFO records.
pub const FANOUT_LOG_INFO_ENV: &str = "FANOUT_LOG_INFO";

/// Emit WARNING records.
pub const FANOUT_LOG_WARNING_ENV: &str = "FANOUT_LOG_WARNING";

/// Plain text log file path. Empty disables the sink.
pub const FANOUT_LOG_FILE_ENV: &str = "FANOUT_LOG_FILE";

/// JSON array log file path. Empty disables the sink.
pub const FANOUT_LOG_JSON_ENV: &str = "FANOUT_LOG_JSON";

/// Webhook receiving ERROR alert cards. Empty disables the sink.
pub const FANOUT_LOG_WEBHOOK_ENV: &str = "FANOUT_LOG_WEBHOOK";

/// Application title shown on alert cards.
pub const FANOUT_LOG_TITLE_ENV: &str = "FANOUT_LOG_TITLE";

/// Fixed caller tag width, `-1` for unbounded.
pub const FANOUT_LOG_FIXED_LENGTH_ENV: &str = "FANOUT_LOG_FIXED_LENGTH";

/// Comma separated file names skipped during caller resolution.
pub const FANOUT_LOG_IGNORED_FILES_ENV: &str = "FANOUT_LOG_IGNORED_FILES";

pub const FANOUT_LOG_SKIP_DATE_ENV: &str = "FANOUT_LOG_SKIP_DATE";
pub const FANOUT_LOG_SKIP_TIME_ENV: &str = "FANOUT_LOG_SKIP_TIME";
pub const FANOUT_LOG_SKIP_SEVERITY_ENV: &str = "FANOUT_LOG_SKIP_SEVERITY";
pub const FANOUT_LOG_SKIP_FILE_ENV: &str = "FANOUT_LOG_SKIP_FILE";
pub const FANOUT_LOG_INCLUDE_FUNCTION_ENV: &str = "FANOUT_LOG_INCLUDE_FUNCTION";
pub const FANOUT_LOG_SINGLE_FRAME_ENV: &str = "FANOUT_LOG_SINGLE_FRAME";
pub const FANOUT_LOG_READABLE_ENV: &str = "FANOUT_LOG_READABLE";

impl LoggerConfig {
    /// Defaults overridden by any `FANOUT_LOG_*` variables that are set.
    pub fn from_env() -> Self {
        let mut config = LoggerConfig::default();
        apply_env(&mut config, |key| std::env::var(key).ok());
        config
    }
}

/// Apply overrides from `lookup` onto `config`.
///
/// Unparseable booleans and integers leave the current value untouched.
pub fn apply_env<F>(config: &mut LoggerConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let flags: [(&str, &mut bool); 11] = [
        (FANOUT_LOG_CONSOLE_ENV, &mut config.console_enabled),
        (FANOUT_LOG_DEBUG_ENV, &mut config.debug_enabled),
        (FANOUT_LOG_INFO_ENV, &mut config.info_enabled),
        (FANOUT_LOG_WARNING_ENV, &mut config.warning_enabled),
        (FANOUT_LOG_SKIP_DATE_ENV, &mut config.skip_date),
        (FANOUT_LOG_SKIP_TIME_ENV, &mut config.skip_time),
        (FANOUT_LOG_SKIP_SEVERITY_ENV, &mut config.skip_severity),
        (FANOUT_LOG_SKIP_FILE_ENV, &mut config.skip_file),
        (FANOUT_LOG_INCLUDE_FUNCTION_ENV, &mut config.include_function),
        (FANOUT_LOG_SINGLE_FRAME_ENV, &mut config.single_frame),
        (FANOUT_LOG_READABLE_ENV, &mut config.readable_objects),
    ];
    for (key, slot) in flags {
        if let Some(value) = lookup(key).as_deref().and_then(parse_bool) {
            *slot = value;
        }
    }

    if let Some(path) = lookup(FANOUT_LOG_FILE_ENV) {
        config.text_file = non_empty(path).map(PathBuf::from);
    }
    if let Some(path) = lookup(FANOUT_LOG_JSON_ENV) {
        config.json_file = non_empty(path).map(PathBuf::from);
    }
    if let Some(url) = lookup(FANOUT_LOG_WEBHOOK_ENV) {
        config.webhook_url = non_empty(url);
    }
    if let Some(title) = lookup(FANOUT_LOG_TITLE_ENV) {
        config.application_title = title;
    }
    if let Some(length) = lookup(FANOUT_LOG_FIXED_LENGTH_ENV).and_then(|v| v.trim().parse().ok()) {
        config.fixed_length = length;
    }
    if let Some(files) = lookup(FANOUT_LOG_IGNORED_FILES_ENV) {
        config.ignored_files.extend(
            files
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string),
        );
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_flags_paths_and_lists() {
        let mut config = LoggerConfig::default();
        apply_env(
            &mut config,
            lookup(&[
                (FANOUT_LOG_DEBUG_ENV, "yes"),
                (FANOUT_LOG_CONSOLE_ENV, "0"),
                (FANOUT_LOG_FILE_ENV, "/var/log/app.log"),
                (FANOUT_LOG_FIXED_LENGTH_ENV, "32"),
                (FANOUT_LOG_IGNORED_FILES_ENV, "db.rs, wrapper.rs,"),
            ]),
        );

        assert!(config.debug_enabled);
        assert!(!config.console_enabled);
        assert_eq!(config.text_file, Some(PathBuf::from("/var/log/app.log")));
        assert_eq!(config.fixed_length, 32);
        assert_eq!(config.ignored_files.len(), 2);
        assert!(config.ignored_files.contains("wrapper.rs"));
    }

    #[test]
    fn garbage_values_keep_defaults_and_empty_paths_disable() {
        let mut config = LoggerConfig::default();
        config.json_file = Some(PathBuf::from("old.json"));
        apply_env(
            &mut config,
            lookup(&[
                (FANOUT_LOG_INFO_ENV, "maybe"),
                (FANOUT_LOG_FIXED_LENGTH_ENV, "wide"),
                (FANOUT_LOG_JSON_ENV, ""),
            ]),
        );

        assert!(config.info_enabled);
        assert_eq!(config.fixed_length, -1);
        assert!(config.json_file.is_none());
    }
}
