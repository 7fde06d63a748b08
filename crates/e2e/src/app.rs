//! Reachability check for the application under test

use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::HarnessConfig;
use crate::error::{E2eError, E2eResult};

/// Polls the application's base URL until it answers
pub struct AppProbe {
    base_url: String,
    startup_timeout: Duration,
    interval: Duration,
}

impl AppProbe {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            startup_timeout: config.startup_timeout(),
            interval: Duration::from_millis(250),
        }
    }

    /// Wait for the application to respond with a success status
    pub async fn wait_until_reachable(&self) -> E2eResult<()> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        let start = Instant::now();
        let mut attempts = 0;

        loop {
            attempts += 1;

            match client.get(&self.base_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!("Application is reachable at {}", self.base_url);
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("{} returned {}", self.base_url, resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for {} ...", self.base_url);
                    }
                    // connection refused is expected while a local app starts
                    if !e.is_connect() {
                        warn!("Reachability check error: {}", e);
                    }
                }
            }

            if start.elapsed() >= self.startup_timeout {
                return Err(E2eError::AppUnreachable(attempts));
            }
            sleep(self.interval).await;
        }
    }
}
