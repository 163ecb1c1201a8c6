mod common;

use common::{frames, RecordingTransport, SharedBuf};
use fanout_logger::caller::FixedResolver;
use fanout_logger::card::MessageCard;
use fanout_logger::{Logger, LoggerConfig};
use std::time::Duration;

fn logger(transport: std::sync::Arc<RecordingTransport>) -> Logger {
    Logger::builder()
        .config(LoggerConfig {
            console_enabled: false,
            webhook_url: Some("https://chat.example/hook".into()),
            application_title: "shop".into(),
            ..LoggerConfig::default()
        })
        .resolver(FixedResolver::new(frames()))
        .console_writer(SharedBuf::default())
        .webhook_transport(transport)
        .build()
}

#[test]
fn errors_post_an_alert_card() {
    let (transport, rx) = RecordingTransport::new();
    let logger = logger(transport);

    logger.error("payment gateway unreachable");

    let (url, body) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(url, "https://chat.example/hook");
    let card: MessageCard = serde_json::from_str(&body).unwrap();
    assert_eq!(card.card_type, "MessageCard");
    assert_eq!(card.summary, "payment gateway unreachable");
    let facts: Vec<(&str, &str)> = card.sections[0]
        .facts
        .iter()
        .map(|f| (f.name.as_str(), f.value.as_str()))
        .collect();
    assert_eq!(
        facts,
        vec![("Application", "shop"), ("Files", "main.rs:12,orders.rs:88:place()")]
    );
    assert_eq!(card.sections[1].text, "payment gateway unreachable");
}

#[test]
fn other_severities_post_nothing() {
    let (transport, rx) = RecordingTransport::new();
    let logger = logger(transport);

    logger.info("fine");
    logger.warning("meh");
    logger.fatal("fatal is not an alert");
    logger.notice("notice");

    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
}

#[tokio::test]
async fn delivers_inside_a_tokio_runtime() {
    let (transport, rx) = RecordingTransport::new();
    let logger = logger(transport);

    logger.error("from async code");

    let received = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
        .await
        .unwrap();
    assert!(received.is_ok());
}
