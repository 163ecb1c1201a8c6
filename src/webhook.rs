use async_trait::async_trait;
use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use crate::card::MessageCard;
use crate::config::LoggerConfig;
use crate::record::LogRecord;
use crate::severity::Severity;
use crate::sink::{Sink, SinkError};

/// Asynchronous HTTP delivery used by [`WebhookSink`].
///
/// Implementations only need to POST `body` (a JSON document) to `url`.
/// The sink never awaits the result on the logging thread; errors are
/// reported through `tracing` and otherwise dropped.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post(&self, url: &str, body: String) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// [`WebhookTransport`] backed by `reqwest`.
#[cfg(feature = "webhook")]
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "webhook")]
impl ReqwestTransport {
    /// Build a client without idle connection pooling.
    ///
    /// Deliveries may run on short-lived runtimes, and pooled connections
    /// must not outlive the runtime that opened them.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

#[cfg(feature = "webhook")]
impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "webhook")]
#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn post(&self, url: &str, body: String) -> Result<(), Box<dyn Error + Send + Sync>> {
        let resp = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(format!("webhook responded with status {}", resp.status()).into())
        }
    }
}

/// Posts a [`MessageCard`] to the configured webhook for every ERROR
/// record.
///
/// Delivery is fire-and-forget: the POST runs on the current Tokio runtime
/// when there is one, otherwise on a short-lived thread with its own
/// runtime. There is no retry and the caller never sees the outcome.
pub struct WebhookSink {
    transport: Arc<dyn WebhookTransport>,
}

impl WebhookSink {
    pub fn new(transport: Arc<dyn WebhookTransport>) -> Self {
        WebhookSink { transport }
    }

    /// Alert card for `record`: the message as summary, an
    /// Application/Files fact section and the message again as text.
    pub fn build_card(record: &LogRecord, config: &LoggerConfig) -> MessageCard {
        let text = record.text();
        let mut card = MessageCard::new(text);
        card.add_section_with_facts(
            "",
            true,
            [
                ("Application", config.application_title.as_str()),
                ("Files", record.caller.as_str()),
            ],
        );
        card.add_section_with_text("", false, text);
        card
    }
}

#[cfg(feature = "webhook")]
impl Default for WebhookSink {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestTransport::new()))
    }
}

impl Sink for WebhookSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn write(&mut self, record: &LogRecord, config: &LoggerConfig) -> Result<(), SinkError> {
        if record.severity != Severity::Error {
            return Ok(());
        }
        let url = match config.webhook_url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => return Ok(()),
        };

        let card = Self::build_card(record, config);
        let body = serde_json::to_string(&card).map_err(|e| SinkError::Other {
            sink: "webhook",
            message: e.to_string(),
        })?;

        let transport = Arc::clone(&self.transport);
        spawn_detached(async move {
            if let Err(e) = transport.post(&url, body).await {
                tracing::warn!(error = %e, url = %url, "webhook delivery failed");
            }
        });
        Ok(())
    }
}

fn spawn_detached<F>(task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        handle.spawn(task);
        return;
    }
    let spawned = std::thread::Builder::new()
        .name("fanout-logger-webhook".into())
        .spawn(move || {
            match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(rt) => rt.block_on(task),
                Err(e) => tracing::warn!(error = %e, "could not start webhook runtime"),
            }
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "could not spawn webhook thread");
    }
}
