#![allow(dead_code)]

use async_trait::async_trait;
use fanout_logger::caller::{CallerFrame, FixedResolver};
use fanout_logger::memory_sink::MemorySink;
use fanout_logger::webhook::WebhookTransport;
use fanout_logger::{Logger, LoggerConfig};
use parking_lot::Mutex;
use std::error::Error;
use std::io::{self, Write};
use std::sync::{mpsc, Arc};

/// Console writer whose output can be inspected after the fact.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Webhook transport that hands every POST to a channel.
pub struct RecordingTransport {
    sent: Mutex<mpsc::Sender<(String, String)>>,
}

impl RecordingTransport {
    pub fn new() -> (Arc<Self>, mpsc::Receiver<(String, String)>) {
        let (tx, rx) = mpsc::channel();
        (Arc::new(Self { sent: Mutex::new(tx) }), rx)
    }
}

#[async_trait]
impl WebhookTransport for RecordingTransport {
    async fn post(&self, url: &str, body: String) -> Result<(), Box<dyn Error + Send + Sync>> {
        let _ = self.sent.lock().send((url.to_string(), body));
        Ok(())
    }
}

pub fn frames() -> Vec<CallerFrame> {
    vec![
        CallerFrame::new("/srv/app/src/orders.rs", 88).with_function("shop::orders::place"),
        CallerFrame::new("/srv/app/src/main.rs", 12).with_function("shop::main"),
    ]
}

/// Logger with fixed caller frames, console captured into a buffer and a
/// memory sink appended after the built-in sinks.
pub fn logger(config: LoggerConfig) -> (Logger, MemorySink, SharedBuf) {
    let memory = MemorySink::new();
    let console = SharedBuf::default();
    let logger = Logger::builder()
        .config(config)
        .resolver(FixedResolver::new(frames()))
        .console_writer(console.clone())
        .sink(memory.clone())
        .build();
    (logger, memory, console)
}

/// Logs through one extra frame living in this file. Returns the line of the
/// log call.
#[inline(never)]
pub fn log_through_wrapper(logger: &Logger) -> u32 {
    let line = line!() + 1;
    logger.info("wrapped");
    line
}
