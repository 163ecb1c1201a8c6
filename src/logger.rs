use parking_lot::{Mutex, RwLock};
use std::io::{self, Write};
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;

use crate::caller::{describe_frames, CallerResolver, StackResolver};
use crate::config::LoggerConfig;
use crate::console::ConsoleSink;
use crate::json_file::JsonFileSink;
use crate::record::LogRecord;
use crate::severity::Severity;
use crate::sink::{FileTarget, Sink, SinkError};
use crate::text_file::TextFileSink;
use crate::value::{RenderStyle, Value};
use crate::webhook::{WebhookSink, WebhookTransport};

/// Where the caller location of a call comes from.
enum Origin {
    /// Resolve from the stack, anchored at this call site.
    Call(&'static Location<'static>),
    /// Already known, e.g. from `tracing` metadata or a parent record.
    Resolved(String),
}

/// Whether sink failures of a call are reported as further log records.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Reporting {
    On,
    Off,
}

/// The dispatcher: gates, resolves the caller, builds a [`LogRecord`] and
/// fans it out to every sink.
///
/// Sinks run in a fixed order (console, JSON file, text file, webhook, then
/// any extra sinks) behind one lock, so file sequences never interleave
/// between threads. A failing sink never stops the others and never reaches
/// the caller: file sinks that cannot be opened or written are switched off
/// in the configuration and the failure is logged once as an ERROR record.
pub struct Logger {
    config: RwLock<LoggerConfig>,
    sinks: Mutex<Vec<Box<dyn Sink>>>,
    resolver: Box<dyn CallerResolver>,
}

/// Builder for [`Logger`].
pub struct LoggerBuilder {
    config: LoggerConfig,
    resolver: Box<dyn CallerResolver>,
    console: ConsoleSink,
    webhook: Option<WebhookSink>,
    extra: Vec<Box<dyn Sink>>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        LoggerBuilder {
            config: LoggerConfig::default(),
            resolver: Box::new(StackResolver),
            console: ConsoleSink::stdout(),
            webhook: default_webhook(),
            extra: Vec::new(),
        }
    }
}

#[cfg(feature = "webhook")]
fn default_webhook() -> Option<WebhookSink> {
    Some(WebhookSink::default())
}

#[cfg(not(feature = "webhook"))]
fn default_webhook() -> Option<WebhookSink> {
    None
}

impl LoggerBuilder {
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn resolver(mut self, resolver: impl CallerResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Send console lines to `out` instead of stdout.
    pub fn console_writer(mut self, out: impl Write + Send + 'static) -> Self {
        self.console = ConsoleSink::with_writer(out);
        self
    }

    pub fn webhook_transport(mut self, transport: Arc<dyn WebhookTransport>) -> Self {
        self.webhook = Some(WebhookSink::new(transport));
        self
    }

    /// Append a sink after the built-in ones.
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.extra.push(Box::new(sink));
        self
    }

    pub fn build(self) -> Logger {
        let mut sinks: Vec<Box<dyn Sink>> = vec![
            Box::new(self.console),
            Box::new(JsonFileSink::new()),
            Box::new(TextFileSink::new()),
        ];
        if let Some(webhook) = self.webhook {
            sinks.push(Box::new(webhook));
        }
        sinks.extend(self.extra);

        Logger {
            config: RwLock::new(self.config),
            sinks: Mutex::new(sinks),
            resolver: self.resolver,
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::builder().build()
    }
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Self {
        Logger::builder().config(config).build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> LoggerConfig {
        self.config.read().clone()
    }

    /// Mutate the configuration; the next log call sees the change.
    pub fn configure<F>(&self, f: F)
    where
        F: FnOnce(&mut LoggerConfig),
    {
        f(&mut *self.config.write());
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<Value>) {
        self.entry(Severity::Debug, message.into(), Vec::new(), Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<Value>) {
        self.entry(Severity::Info, message.into(), Vec::new(), Location::caller());
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<Value>) {
        self.entry(Severity::Warning, message.into(), Vec::new(), Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<Value>) {
        self.entry(Severity::Error, message.into(), Vec::new(), Location::caller());
    }

    /// Log with the FATAL tag. The process keeps running.
    #[track_caller]
    pub fn fatal(&self, message: impl Into<Value>) {
        self.entry(Severity::Fatal, message.into(), Vec::new(), Location::caller());
    }

    #[track_caller]
    pub fn notice(&self, message: impl Into<Value>) {
        self.entry(Severity::Notice, message.into(), Vec::new(), Location::caller());
    }

    /// INFO record from a printf-style template, see
    /// [`interpolate`](crate::value::interpolate).
    #[track_caller]
    pub fn printf(&self, template: impl Into<Value>, args: &[Value]) {
        self.entry(Severity::Info, template.into(), args.to_vec(), Location::caller());
    }

    /// Log at any severity, with optional printf-style arguments.
    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl Into<Value>, args: &[Value]) {
        self.entry(severity, message.into(), args.to_vec(), Location::caller());
    }

    /// Log with an already known caller location instead of resolving one.
    pub fn log_at(&self, severity: Severity, caller: impl Into<String>, message: impl Into<Value>) {
        self.dispatch(
            severity,
            message.into(),
            Vec::new(),
            Origin::Resolved(caller.into()),
            Reporting::On,
        );
    }

    /// Close every open log file. Sinks reopen on their next write.
    pub fn close(&self) {
        for sink in self.sinks.lock().iter_mut() {
            sink.close();
        }
    }

    /// Close and delete the configured text and JSON log files.
    ///
    /// Files that do not exist are skipped, so calling this repeatedly is
    /// harmless.
    pub fn clear_log(&self) {
        let config = self.config();
        self.close();
        for path in [config.text_file, config.json_file].into_iter().flatten() {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed log file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove log file"),
            }
        }
    }

    fn entry(&self, severity: Severity, message: Value, args: Vec<Value>, location: &'static Location<'static>) {
        self.dispatch(severity, message, args, Origin::Call(location), Reporting::On);
    }

    fn dispatch(&self, severity: Severity, message: Value, args: Vec<Value>, origin: Origin, reporting: Reporting) {
        let config = self.config();
        if !severity.is_enabled(&config) {
            return;
        }

        let caller = match origin {
            Origin::Call(location) => describe_frames(&self.resolver.frames(location), &config),
            Origin::Resolved(caller) => caller,
        };
        let style = if config.readable_objects {
            RenderStyle::Readable
        } else {
            RenderStyle::Compact
        };
        let record = LogRecord::new(severity, caller, message, args).with_style(style);

        let mut failures = Vec::new();
        {
            let mut sinks = self.sinks.lock();
            for sink in sinks.iter_mut() {
                if let Err(err) = sink.write(&record, &config) {
                    tracing::debug!(sink = sink.name(), error = %err, "log sink failed");
                    failures.push(err);
                }
            }
        }

        if reporting == Reporting::Off {
            return;
        }
        // Sinks that only need the raw value leave the text unrendered.
        let _ = record.text();
        if let Some(failure) = record.render_failure() {
            self.dispatch(
                Severity::Debug,
                Value::from(format!("Unable to serialize message: {}", failure)),
                Vec::new(),
                Origin::Resolved(record.caller.clone()),
                Reporting::Off,
            );
        }
        for err in failures {
            self.disable_failed_sink(&err);
            self.dispatch(
                Severity::Error,
                Value::from(err.to_string()),
                Vec::new(),
                Origin::Resolved(record.caller.clone()),
                Reporting::Off,
            );
        }
    }

    /// Switch off the console or clear the configured path that `err` refers
    /// to. A path changed while the call was in flight is left alone.
    fn disable_failed_sink(&self, err: &SinkError) {
        if err.disables_console() {
            self.config.write().console_enabled = false;
            tracing::debug!("disabled failing console output");
            return;
        }
        let (target, path) = match (err.disabled_target(), failed_path(err)) {
            (Some(target), Some(path)) => (target, path),
            _ => return,
        };
        let mut config = self.config.write();
        let slot = match target {
            FileTarget::Text => &mut config.text_file,
            FileTarget::Json => &mut config.json_file,
        };
        if slot.as_ref() == Some(&path) {
            *slot = None;
            tracing::debug!(path = %path.display(), "disabled failing log file");
        }
    }
}

fn failed_path(err: &SinkError) -> Option<PathBuf> {
    match err {
        SinkError::Open { path, .. } | SinkError::Write { path, .. } | SinkError::CorruptJson { path } => {
            Some(path.clone())
        }
        SinkError::Console { .. } | SinkError::Other { .. } => None,
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}
