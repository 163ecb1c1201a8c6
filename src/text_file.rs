use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::LoggerConfig;
use crate::record::LogRecord;
use crate::sink::{FileTarget, Sink, SinkError};

/// Permission bits for newly created log files.
#[cfg(unix)]
pub(crate) const LOG_FILE_MODE: u32 = 0o755;

/// Base options for log files: created if absent with [`LOG_FILE_MODE`].
pub(crate) fn log_file_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(LOG_FILE_MODE);
    }
    options
}

struct OpenFile {
    path: PathBuf,
    file: File,
}

/// Appends `[timestamp] [caller] [SEVERITY] :: message` lines to the
/// configured text file.
///
/// The file is opened on first write and kept open; every line is synced to
/// disk before `write` returns. Changing the configured path closes the old
/// handle and opens the new file on the next write.
#[derive(Default)]
pub struct TextFileSink {
    handle: Option<OpenFile>,
}

impl TextFileSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn format_line(record: &LogRecord) -> String {
        format!(
            "[{}] [{}] [{}] :: {}\n",
            record.timestamp_text(),
            record.caller,
            record.severity,
            record.text()
        )
    }

    fn file_for(&mut self, path: &Path) -> Result<&mut File, SinkError> {
        let open = match self.handle.take() {
            Some(open) if open.path == path => open,
            stale => {
                if let Some(stale) = stale {
                    tracing::debug!(path = %stale.path.display(), "text log path changed, closing old file");
                }
                let file = log_file_options()
                    .append(true)
                    .open(path)
                    .map_err(|source| SinkError::Open {
                        target: FileTarget::Text,
                        path: path.to_path_buf(),
                        source,
                    })?;
                tracing::debug!(path = %path.display(), "opened text log file");
                OpenFile {
                    path: path.to_path_buf(),
                    file,
                }
            }
        };
        Ok(&mut self.handle.insert(open).file)
    }
}

impl Sink for TextFileSink {
    fn name(&self) -> &'static str {
        "text-file"
    }

    fn write(&mut self, record: &LogRecord, config: &LoggerConfig) -> Result<(), SinkError> {
        let path = match config.text_file.as_deref() {
            Some(path) => path,
            None => {
                self.close();
                return Ok(());
            }
        };

        let line = Self::format_line(record);
        let written: io::Result<()> = {
            let file = self.file_for(path)?;
            file.write_all(line.as_bytes()).and_then(|_| file.sync_all())
        };

        written.map_err(|source| {
            self.close();
            SinkError::Write {
                target: FileTarget::Text,
                path: path.to_path_buf(),
                source,
            }
        })
    }

    fn close(&mut self) {
        if let Some(open) = self.handle.take() {
            tracing::debug!(path = %open.path.display(), "closed text log file");
        }
    }
}
