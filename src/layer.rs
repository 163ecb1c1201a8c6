use std::path::Path;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::logger::Logger;
use crate::severity::Severity;

/// `tracing_subscriber` layer that forwards events to a [`Logger`].
///
/// The event level maps onto a [`Severity`] (TRACE and DEBUG both become
/// DEBUG) and the logger's own gate decides whether it is emitted. The
/// caller is `file:line` from the event metadata. Fields are appended to the
/// message as `(Key: value, ...)` with title-cased keys, so `user` and
/// `execution_time` land in the JSON record's `user` and `executionTime`
/// fields.
///
/// Events emitted by this crate itself are skipped, so the logger's own
/// diagnostics never loop back into it.
pub struct LoggerLayer {
    logger: Arc<Logger>,
}

impl LoggerLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target().starts_with(env!("CARGO_CRATE_NAME")) {
            return;
        }
        let severity = Severity::from(meta.level());
        if !severity.is_enabled(&self.logger.config()) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let caller = match (meta.file(), meta.line()) {
            (Some(file), Some(line)) => format!("{}:{}", base_name(file), line),
            (Some(file), None) => base_name(file).to_string(),
            _ => meta.target().to_string(),
        };
        self.logger.log_at(severity, caller, visitor.into_text());
    }
}

fn base_name(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

/// `execution_time` -> `Execution Time`.
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((title_case(field.name()), value));
        }
    }

    fn into_text(self) -> String {
        let message = self.message.unwrap_or_default();
        if self.fields.is_empty() {
            return message;
        }
        let fields: Vec<String> = self
            .fields
            .into_iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        if message.is_empty() {
            format!("({})", fields.join(", "))
        } else {
            format!("{} ({})", message, fields.join(", "))
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }
}
