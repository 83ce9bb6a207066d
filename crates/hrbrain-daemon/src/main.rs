//! HRBrain Daemon - feedback ingestion service
//!
//! The daemon loads candidate/job profiles, owns one online Q-learning
//! agent, and exposes the feedback API that drives it.

use anyhow::Result;
use tracing::{error, info};

use hrbrain_daemon::config::Config;
use hrbrain_daemon::daemon::HrBrainDaemon;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration to get log settings
    let config = Config::load()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            format!(
                "hrbraind={level},hrbrain_daemon={level},hrbrain_rl={level},tower_http=warn",
                level = config.daemon.log_level
            )
            .into()
        });
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("Starting HRBrain daemon v{}", env!("CARGO_PKG_VERSION"));

    let daemon = HrBrainDaemon::new(config)?;

    tokio::select! {
        result = daemon.run() => {
            if let Err(e) = result {
                error!("Daemon exited with error: {e:#}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    daemon.shutdown().await?;
    Ok(())
}
