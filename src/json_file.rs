use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::LoggerConfig;
use crate::record::{LogRecord, TIMESTAMP_FORMAT};
use crate::severity::Severity;
use crate::sink::{FileTarget, Sink, SinkError};
use crate::text_file::log_file_options;

/// Caller location reported by the record that seeds a new JSON log file.
pub const SEED_LOCATION: &str = "fanout-logger:seed";

/// Message of the record that seeds a new JSON log file.
pub const SEED_MESSAGE: &str = "Starting new JSON log file";

/// Bytes read per step while scanning backwards for the closing bracket.
const TAIL_WINDOW: u64 = 64;

/// One element of the JSON log array. Empty fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRecord {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub time: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub files: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub severity: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub execution_time: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub message: serde_json::Value,
}

impl JsonRecord {
    pub fn from_record(record: &LogRecord) -> Self {
        let mut json = JsonRecord {
            time: record.timestamp_text(),
            files: record.caller.clone(),
            severity: record.severity.to_string(),
            message: record.json_message(),
            ..JsonRecord::default()
        };
        json.parse();
        json
    }

    fn seed() -> Self {
        JsonRecord {
            time: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            files: SEED_LOCATION.to_string(),
            severity: Severity::Info.to_string(),
            message: serde_json::Value::String(SEED_MESSAGE.to_string()),
            ..JsonRecord::default()
        }
    }

    /// Lift `User` and `Execution Time` out of a trailing
    /// `(Key: value, Key: value)` list in a text message.
    ///
    /// Best effort: anything that does not match is left alone and the
    /// message itself is never modified.
    pub fn parse(&mut self) {
        let text = match self.message.as_str() {
            Some(text) => text,
            None => return,
        };
        let (open, close) = match (text.rfind('('), text.rfind(')')) {
            (Some(open), Some(close)) if open > 0 && close > open => (open, close),
            _ => return,
        };

        let mut user = None;
        let mut execution_time = None;
        for pair in text[open + 1..close].split(", ") {
            match pair.split_once(": ") {
                Some(("User", value)) => user = Some(value.to_string()),
                Some(("Execution Time", value)) => execution_time = Some(value.to_string()),
                _ => {}
            }
        }
        if let Some(user) = user {
            self.user = user;
        }
        if let Some(execution_time) = execution_time {
            self.execution_time = execution_time;
        }
    }
}

struct OpenFile {
    path: PathBuf,
    file: File,
}

/// Maintains a file holding one JSON array of [`JsonRecord`]s.
///
/// A missing or empty file is created with a seed record. Every write then
/// rewrites only the array's closing bracket: the tail is scanned for the
/// final `]`, and `,\n\t<record>\n]` is written from just after the last
/// element, so the file is valid JSON between calls without ever being
/// rewritten as a whole.
#[derive(Default)]
pub struct JsonFileSink {
    handle: Option<OpenFile>,
}

impl JsonFileSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn file_for(&mut self, path: &Path) -> Result<&mut File, SinkError> {
        let open = match self.handle.take() {
            Some(open) if open.path == path => open,
            _ => {
                let open_err = |source| SinkError::Open {
                    target: FileTarget::Json,
                    path: path.to_path_buf(),
                    source,
                };
                if needs_seed(path) {
                    seed(path).map_err(open_err)?;
                    tracing::debug!(path = %path.display(), "started new JSON log file");
                }
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .open(path)
                    .map_err(open_err)?;
                OpenFile {
                    path: path.to_path_buf(),
                    file,
                }
            }
        };
        Ok(&mut self.handle.insert(open).file)
    }
}

fn needs_seed(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) => e.kind() == io::ErrorKind::NotFound,
    }
}

fn seed(path: &Path) -> io::Result<()> {
    let mut file = log_file_options().write(true).truncate(true).open(path)?;
    let data = serde_json::to_string(&JsonRecord::seed())?;
    write!(file, "[\n\t{}\n]", data)?;
    file.sync_all()
}

/// Offset and value of the last non-whitespace byte before `end`, reading
/// backwards [`TAIL_WINDOW`] bytes at a time.
fn last_content_byte(file: &mut File, mut end: u64) -> io::Result<Option<(u64, u8)>> {
    let mut buf = vec![0u8; TAIL_WINDOW as usize];
    while end > 0 {
        let start = end.saturating_sub(TAIL_WINDOW);
        let chunk = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;
        if let Some(i) = chunk.iter().rposition(|b| !b.is_ascii_whitespace()) {
            return Ok(Some((start + i as u64, chunk[i])));
        }
        end = start;
    }
    Ok(None)
}

/// Where the next element goes: the offset just after the last element (or
/// after `[` for an empty array) and whether a separating comma is needed.
fn append_point(file: &mut File) -> io::Result<Option<(u64, bool)>> {
    let end = file.seek(SeekFrom::End(0))?;
    let close = match last_content_byte(file, end)? {
        Some((offset, b']')) => offset,
        _ => return Ok(None),
    };
    match last_content_byte(file, close)? {
        Some((offset, last)) => Ok(Some((offset + 1, last != b'['))),
        None => Ok(None),
    }
}

impl Sink for JsonFileSink {
    fn name(&self) -> &'static str {
        "json-file"
    }

    fn write(&mut self, record: &LogRecord, config: &LoggerConfig) -> Result<(), SinkError> {
        let path = match config.json_file.as_deref() {
            Some(path) => path,
            None => {
                self.close();
                return Ok(());
            }
        };

        let data = serde_json::to_string(&JsonRecord::from_record(record)).map_err(|e| SinkError::Other {
            sink: "json-file",
            message: e.to_string(),
        })?;

        let appended: io::Result<bool> = {
            let file = self.file_for(path)?;
            match append_point(file) {
                Ok(Some((offset, comma))) => {
                    let separator = if comma { "," } else { "" };
                    let chunk = format!("{}\n\t{}\n]", separator, data);
                    file.seek(SeekFrom::Start(offset))
                        .and_then(|_| file.write_all(chunk.as_bytes()))
                        .and_then(|_| file.set_len(offset + chunk.len() as u64))
                        .and_then(|_| file.sync_data())
                        .map(|_| true)
                }
                Ok(None) => Ok(false),
                Err(e) => Err(e),
            }
        };

        match appended {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.close();
                Err(SinkError::CorruptJson {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                self.close();
                Err(SinkError::Write {
                    target: FileTarget::Json,
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    fn close(&mut self) {
        if let Some(open) = self.handle.take() {
            tracing::debug!(path = %open.path.display(), "closed JSON log file");
        }
    }
}
