pub mod severity;
pub mod config;
pub mod env;
pub mod value;
pub mod printf;
pub mod caller;
pub mod record;
pub mod sink;

pub mod console;
pub mod text_file;
pub mod json_file;
pub mod card;
pub mod webhook;
pub mod memory_sink;

pub mod logger;
pub mod global;
pub mod layer;
pub mod init;

pub use config::LoggerConfig;
pub use logger::{Logger, LoggerBuilder};
pub use severity::Severity;
pub use sink::{Sink, SinkError};
pub use value::Value;
