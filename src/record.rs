use chrono::{DateTime, Local};
use std::cell::OnceCell;

use crate::severity::Severity;
use crate::value::{interpolate, render, RenderStyle, Rendered, Value};

/// Timestamp layout shared by the text and JSON sinks.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One log call, built by the [`Logger`](crate::logger::Logger) and handed
/// to every sink.
///
/// The plain text form of the message is rendered on first use and cached,
/// so sinks that only need the raw value never pay for it.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    /// Resolved caller location, empty when no user frame was found.
    pub caller: String,
    pub message: Value,
    /// printf-style arguments; when present `message` is the template.
    pub args: Vec<Value>,
    style: RenderStyle,
    rendered: OnceCell<Rendered>,
}

impl LogRecord {
    pub fn new(severity: Severity, caller: impl Into<String>, message: Value, args: Vec<Value>) -> Self {
        LogRecord {
            timestamp: Local::now(),
            severity,
            caller: caller.into(),
            message,
            args,
            style: RenderStyle::Compact,
            rendered: OnceCell::new(),
        }
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self.rendered = OnceCell::new();
        self
    }

    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Message as plain text: the interpolated template when arguments were
    /// given, the rendered value otherwise.
    pub fn text(&self) -> &str {
        &self.rendered().text
    }

    /// Serialization error hit while rendering, if the text was rendered.
    pub fn render_failure(&self) -> Option<&str> {
        self.rendered.get().and_then(|r| r.failure.as_deref())
    }

    /// Whether the message is plain text (a string or an interpolated
    /// template) rather than a number or structured value.
    pub fn is_textual(&self) -> bool {
        !self.args.is_empty() || matches!(self.message, Value::Text(_))
    }

    /// Value written to the JSON `message` field.
    pub fn json_message(&self) -> serde_json::Value {
        if self.args.is_empty() {
            self.message.to_json()
        } else {
            serde_json::Value::String(self.text().to_string())
        }
    }

    fn rendered(&self) -> &Rendered {
        self.rendered.get_or_init(|| {
            if self.args.is_empty() {
                return render(&self.message, 2, self.style);
            }
            match &self.message {
                Value::Text(template) => Rendered {
                    text: interpolate(template, &self.args),
                    failure: None,
                },
                other => {
                    let template = render(other, 2, self.style);
                    Rendered {
                        text: interpolate(&template.text, &self.args),
                        failure: template.failure,
                    }
                }
            }
        })
    }
}
