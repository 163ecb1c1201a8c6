use serde::Serialize;

use fanout_logger::{args, Logger, LoggerConfig, Value};

#[derive(Serialize, Debug)]
struct Order {
    id: u64,
    items: Vec<&'static str>,
}

fn place_order(logger: &Logger, order: &Order) {
    logger.info(Value::structured(order));
    logger.printf(
        "order %d placed (User: %s, Execution Time: %dms)",
        &args![order.id, "ana", 12],
    );
}

fn main() {
    let dir = std::env::temp_dir().join("fanout-logger-demo");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("cannot create {}: {}", dir.display(), e);
        return;
    }

    let mut config = LoggerConfig::from_env();
    config.debug_enabled = true;
    config.text_file = Some(dir.join("app.log"));
    config.json_file = Some(dir.join("app.json"));
    config.application_title = "demo-shop".into();
    let logger = Logger::new(config);

    logger.debug("starting demo");
    place_order(
        &logger,
        &Order {
            id: 7,
            items: vec!["book", "pen"],
        },
    );
    logger.warning("stock low");
    logger.notice("maintenance window at 02:00");

    logger.configure(|c| c.fixed_length = 20);
    logger.error("payment gateway unreachable");

    logger.close();
    println!("logs written to {}", dir.display());
}
