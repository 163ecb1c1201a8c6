use crate::layer::LoggerLayer;
use crate::logger::Logger;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Error returned by [`try_init_tracing`].
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("a global tracing subscriber is already installed")]
    SubscriberAlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install a [`Registry`] with a [`LoggerLayer`] feeding `logger` as the
/// global default `tracing` subscriber.
///
/// **Effects**
///
/// Every `tracing` event in the process (outside this crate) is passed to
/// the logger's dispatcher, using the logger's severity gate and sinks.
pub fn try_init_tracing(logger: Arc<Logger>) -> Result<(), InitError> {
    let subscriber = Registry::default().with(LoggerLayer::new(logger));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Like [`try_init_tracing`], but keeps an already installed subscriber.
///
/// Returns `false` when another subscriber was already in place.
pub fn init_tracing(logger: Arc<Logger>) -> bool {
    try_init_tracing(logger).is_ok()
}
