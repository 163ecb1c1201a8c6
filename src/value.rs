//! Message values and their text rendering.
//!
//! Every public log call converts its message (and any printf-style
//! arguments) into a [`Value`] once, at the call boundary. Sinks then render
//! by matching on the variant instead of inspecting types at runtime.

use serde::Serialize;
use std::fmt;

pub use crate::printf::interpolate;
use crate::printf::non_finite;

/// A loggable message or argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    Structured(Structured),
}

/// A structured value captured through serde, plus its `Debug` text used
/// when serialization fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Structured {
    json: Result<serde_json::Value, String>,
    fallback: String,
}

impl Structured {
    pub fn new<T>(value: &T) -> Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        Structured {
            json: serde_json::to_value(value).map_err(|e| e.to_string()),
            fallback: format!("{:?}", value),
        }
    }

    pub fn json(&self) -> Option<&serde_json::Value> {
        self.json.as_ref().ok()
    }

    /// Serialization error captured at construction, if any.
    pub fn error(&self) -> Option<&str> {
        self.json.as_ref().err().map(String::as_str)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Value {
    /// Capture any serializable value as [`Value::Structured`].
    pub fn structured<T>(value: &T) -> Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        Value::Structured(Structured::new(value))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// JSON form used for the `message` field of JSON log records.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Uint(n) => serde_json::Value::from(*n),
            Value::Float(n) => match serde_json::Number::from_f64(*n) {
                Some(number) => serde_json::Value::Number(number),
                None => serde_json::Value::String(non_finite(*n).to_string()),
            },
            Value::Bool(flag) => serde_json::Value::Bool(*flag),
            Value::Text(text) => serde_json::Value::String(text.clone()),
            Value::Structured(s) => match s.json() {
                Some(json) => json.clone(),
                None => serde_json::Value::String(s.fallback().to_string()),
            },
        }
    }
}

macro_rules! value_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(n: $ty) -> Self {
                Value::Int(n as i64)
            }
        })*
    };
}

macro_rules! value_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(n: $ty) -> Self {
                Value::Uint(n as u64)
            }
        })*
    };
}

value_from_signed!(i8, i16, i32, i64, isize);
value_from_unsigned!(u8, u16, u32, u64, usize);

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&String> for Value {
    fn from(text: &String) -> Self {
        Value::Text(text.clone())
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        // Widen through the shortest decimal form so 0.1f32 stays 0.1.
        Value::Float(n.to_string().parse().unwrap_or(f64::from(n)))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::Structured(Structured {
            fallback: json.to_string(),
            json: Ok(json),
        })
    }
}

/// Build a `[Value; N]` argument list for printf-style calls.
///
/// ```
/// use fanout_logger::{args, Value};
/// let list: [Value; 2] = args!["disk", 93];
/// assert_eq!(list[1], Value::Int(93));
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::value::Value::from($arg)),*]
    };
}

/// How structured values are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    #[default]
    Compact,
    Readable,
}

/// Result of rendering a value to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Set when a structured value could not be serialized and the `Debug`
    /// fallback was used instead.
    pub failure: Option<String>,
}

/// Render `value` as display text.
///
/// Scalars and text gain a trailing newline when `indent > 2`, which keeps
/// nested multi-field output on separate lines. Floats use their JSON number
/// form. Structured values are serialized to JSON.
pub fn render(value: &Value, indent: usize, style: RenderStyle) -> Rendered {
    let newline = if indent > 2 { "\n" } else { "" };
    match value {
        Value::Int(n) => plain(format!("{}{}", n, newline)),
        Value::Uint(n) => plain(format!("{}{}", n, newline)),
        Value::Float(n) => {
            let text = match serde_json::Number::from_f64(*n) {
                Some(number) => number.to_string(),
                None => non_finite(*n).to_string(),
            };
            plain(format!("{}{}", text, newline))
        }
        Value::Bool(flag) => plain(format!("{}{}", flag, newline)),
        Value::Text(text) => plain(format!("{}{}", text, newline)),
        Value::Structured(s) => {
            let json = match s.json() {
                Some(json) => json,
                None => {
                    return Rendered {
                        text: s.fallback().to_string(),
                        failure: s.error().map(str::to_string),
                    }
                }
            };
            let encoded = match style {
                RenderStyle::Compact => serde_json::to_string(json),
                RenderStyle::Readable => serde_json::to_string_pretty(json),
            };
            match encoded {
                Ok(text) => plain(text),
                Err(e) => Rendered {
                    text: s.fallback().to_string(),
                    failure: Some(e.to_string()),
                },
            }
        }
    }
}

fn plain(text: String) -> Rendered {
    Rendered { text, failure: None }
}

pub(crate) fn display(value: &Value) -> String {
    render(value, 0, RenderStyle::Compact).text
}
