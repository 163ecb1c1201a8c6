use std::io::{self, Write};

use crate::caller::bracket_caller;
use crate::config::LoggerConfig;
use crate::record::LogRecord;
use crate::sink::{Sink, SinkError};

/// Writes one ANSI-colored line per record to stdout (or any writer).
///
/// Line layout: `YYYY/MM/DD HH:MM:SS [caller] [SEVERITY] message`, where the
/// date, time, caller tag and severity tag can each be switched off through
/// [`LoggerConfig`]. Only the bracketed prefix is colored.
pub struct ConsoleSink {
    out: Box<dyn Write + Send>,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        ConsoleSink { out: Box::new(out) }
    }

    /// Build the console line for `record`, without the trailing newline.
    pub fn format_line(record: &LogRecord, config: &LoggerConfig) -> String {
        let mut line = String::new();
        if !config.skip_date {
            line.push_str(&record.timestamp.format("%Y/%m/%d ").to_string());
        }
        if !config.skip_time {
            line.push_str(&record.timestamp.format("%H:%M:%S ").to_string());
        }

        let tag = bracket_caller(&record.caller, config.fixed_width());
        let mut parts = Vec::with_capacity(2);
        if !config.skip_file {
            parts.push(tag.bracketed);
        }
        if !config.skip_severity {
            parts.push(format!("[{}]", record.severity));
        }
        if !parts.is_empty() {
            let prefix = format!("{}{:width$}", parts.join(" "), "", width = tag.padding);
            line.push_str(&record.severity.paint(&prefix));
            line.push(' ');
        }

        line.push_str(record.text());
        line
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn write(&mut self, record: &LogRecord, config: &LoggerConfig) -> Result<(), SinkError> {
        if !config.console_enabled {
            return Ok(());
        }
        let line = Self::format_line(record, config);
        writeln!(self.out, "{}", line)
            .and_then(|_| self.out.flush())
            .map_err(|source| SinkError::Console { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::Severity;
    use crate::value::Value;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn quiet_config() -> LoggerConfig {
        LoggerConfig {
            skip_date: true,
            skip_time: true,
            ..LoggerConfig::default()
        }
    }

    fn record(severity: Severity, message: impl Into<Value>) -> LogRecord {
        LogRecord::new(severity, "main.rs:7:main()", message.into(), Vec::new())
    }

    #[test]
    fn colors_prefix_and_appends_message() {
        let line = ConsoleSink::format_line(&record(Severity::Info, "hello"), &quiet_config());
        assert_eq!(line, "\x1b[0;32m[main.rs:7:main()] [INFO]\x1b[0m hello");
    }

    #[test]
    fn severity_and_file_tags_can_be_skipped() {
        let mut config = quiet_config();
        config.skip_severity = true;
        let line = ConsoleSink::format_line(&record(Severity::Warning, "w"), &config);
        assert_eq!(line, "\x1b[0;33m[main.rs:7:main()]\x1b[0m w");

        config.skip_severity = false;
        config.skip_file = true;
        let line = ConsoleSink::format_line(&record(Severity::Error, "e"), &config);
        assert_eq!(line, "\x1b[0;31m[ERROR]\x1b[0m e");

        config.skip_severity = true;
        let line = ConsoleSink::format_line(&record(Severity::Debug, "d"), &config);
        assert_eq!(line, "d");
    }

    #[test]
    fn fixed_width_truncates_and_pads_caller_tag() {
        let mut config = quiet_config();
        config.fixed_length = 10;
        let line = ConsoleSink::format_line(&record(Severity::Notice, 5), &config);
        assert_eq!(line, "\x1b[0;36m[7:main()] [NOTICE]\x1b[0m 5");

        config.fixed_length = 20;
        let line = ConsoleSink::format_line(&record(Severity::Notice, 5), &config);
        assert_eq!(line, "\x1b[0;36m[main.rs:7:main()] [NOTICE]  \x1b[0m 5");
    }

    #[test]
    fn date_and_time_prefixes_follow_flags() {
        let mut config = quiet_config();
        config.skip_time = false;
        let line = ConsoleSink::format_line(&record(Severity::Info, "x"), &config);
        assert_eq!(line.as_bytes()[2], b':');
        assert_eq!(line.as_bytes()[8], b' ');

        config.skip_date = false;
        let line = ConsoleSink::format_line(&record(Severity::Info, "x"), &config);
        assert_eq!(line.as_bytes()[4], b'/');
    }

    #[test]
    fn writes_lines_only_when_enabled() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::with_writer(buf.clone());
        let mut config = quiet_config();

        sink.write(&record(Severity::Info, "one"), &config).unwrap();
        config.console_enabled = false;
        sink.write(&record(Severity::Info, "two"), &config).unwrap();

        let out = String::from_utf8(buf.0.lock().clone()).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.ends_with("one\n"));
    }
}
