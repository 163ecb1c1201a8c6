use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

use fanout_logger::init::init_tracing;
use fanout_logger::{Logger, LoggerConfig};

#[tokio::main]
async fn main() {
    let logger = Arc::new(Logger::new(LoggerConfig::from_env()));
    init_tracing(Arc::clone(&logger));

    info!("starting service");
    warn!(user = "ana", execution_time = "950ms", "slow login");

    error!(user_id = 42, reason = "invalid password", "authentication failed");

    // Webhook deliveries run on this runtime; give them a moment.
    sleep(Duration::from_secs(2)).await;
    logger.close();
}
