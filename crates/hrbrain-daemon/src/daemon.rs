//! Main HRBrain daemon implementation
//!
//! Wires the profile store, the TF-IDF and sentiment providers, and the
//! agent into one HTTP service. The agent restores from its snapshot if
//! one exists; a fresh agent can optionally be warm-started by the
//! episodic trainer before serving.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;
use tracing::{info, warn};

use hrbrain_rl::trainer::default_roster;
use hrbrain_rl::{Agent, EpisodicTrainer, PolicyTable};

use crate::audit::AuditLog;
use crate::config::Config;
use crate::profiles::CsvProfileStore;
use crate::sentiment::LexiconSentiment;
use crate::server::{create_router, AppState};
use crate::similarity::TfIdfScorer;
use crate::snapshot;
use crate::summary::Summarizer;
use crate::webhook::WebhookClient;

/// Main HRBrain daemon
pub struct HrBrainDaemon {
    config: Arc<Config>,
    state: AppState,
    shutdown: tokio::sync::broadcast::Sender<()>,
}

impl HrBrainDaemon {
    /// Build the full service from configuration
    pub fn new(config: Config) -> Result<Self> {
        let (shutdown_tx, _) = tokio::sync::broadcast::channel(1);

        let profiles = CsvProfileStore::load(&config.data.cvs_path, &config.data.jds_path)
            .context("Failed to load profile store")?;
        let matcher = TfIdfScorer::fit(&profiles.corpus());

        let policy = PolicyTable::new(
            config.learning.alpha,
            config.learning.gamma,
            config.learning.epsilon,
        );
        let mut agent = Agent::new(
            policy,
            Arc::new(profiles),
            Arc::new(matcher),
            Arc::new(LexiconSentiment::new()),
        );

        let restored = if config.data.snapshot_path.is_empty() {
            false
        } else {
            match snapshot::load(&config.data.snapshot_path) {
                Ok(Some(snap)) => {
                    agent.restore(snap);
                    true
                }
                Ok(None) => false,
                Err(e) => {
                    warn!("ignoring unreadable snapshot: {e}");
                    false
                }
            }
        };

        if !restored && config.learning.pretrain {
            let trainer = EpisodicTrainer::new(
                config.learning.pretrain_episodes,
                config.learning.pretrain_gamma,
            );
            let mut rng = StdRng::from_entropy();
            trainer.train(agent.policy_mut(), &default_roster(), &mut rng);
            info!(
                episodes = config.learning.pretrain_episodes,
                "policy table warm-started"
            );
        }

        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            agent: Arc::new(Mutex::new(agent)),
            summarizer: Arc::new(Summarizer::new(config.summarizer.clone())),
            webhook: WebhookClient::new(config.webhook.clone()),
            audit: Arc::new(AuditLog::new(&config.data.feedback_log_path)),
            started_at: Utc::now(),
        };

        Ok(Self {
            config,
            state,
            shutdown: shutdown_tx,
        })
    }

    /// Run the daemon main loop
    pub async fn run(&self) -> Result<()> {
        info!(
            "HRBrain daemon running on {}",
            self.config.daemon.bind_address
        );

        let addr: std::net::SocketAddr = self.config.daemon.bind_address.parse()?;
        let app = create_router(self.state.clone());
        let listener = tokio::net::TcpListener::bind(addr).await?;

        let mut shutdown_rx = self.shutdown.subscribe();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }

    /// Graceful shutdown: stop serving and persist the agent
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down daemon...");

        let _ = self.shutdown.send(());

        if !self.config.data.snapshot_path.is_empty() {
            let agent = self.state.agent.lock().await;
            snapshot::save(&self.config.data.snapshot_path, &agent.snapshot())
                .context("Failed to persist agent snapshot")?;
        }

        info!("Daemon shutdown complete");
        Ok(())
    }
}
