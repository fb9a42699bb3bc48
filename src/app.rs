use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::io::{self, BufReader};

use crate::{
    api::{PredictionClient, PredictionService},
    config::AppConfig,
    infrastructure::shutdown::{Shutdown, ShutdownListener},
    ui::TerminalView,
};

pub struct SpamCheckerApp {
    service: Arc<dyn PredictionService>,
    shutdown: Shutdown,
    config: Arc<AppConfig>,
}

impl SpamCheckerApp {
    pub fn initialize(config: AppConfig, shutdown: Shutdown) -> Result<Self> {
        let config = Arc::new(config);

        let http_client = Client::builder()
            .user_agent(format!("yt-spam-checker/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        let service: Arc<dyn PredictionService> = Arc::new(PredictionClient::new(
            http_client,
            config.api.clone(),
        ));

        Ok(Self {
            service,
            shutdown,
            config,
        })
    }

    pub async fn run(self) -> Result<()> {
        let SpamCheckerApp {
            service,
            shutdown,
            config,
        } = self;

        tracing::info!(endpoint = %config.api.endpoint, "spam checker started");
        let mut listener = shutdown.subscribe();
        probe_service(service.as_ref(), &config, &mut listener).await;

        let mut view = TerminalView::new(BufReader::new(io::stdin()), io::stdout(), service);
        let result = view.run(listener.clone()).await;

        let signalled = listener.is_triggered();
        shutdown.trigger();
        match &result {
            Ok(()) => tracing::info!(
                results = view.form().results().len(),
                signalled,
                "spam checker stopped"
            ),
            Err(err) => tracing::error!(?err, "view loop failed"),
        }
        result
    }
}

async fn probe_service(
    service: &dyn PredictionService,
    config: &AppConfig,
    shutdown: &mut ShutdownListener,
) {
    let outcome = tokio::select! {
        biased;
        _ = shutdown.notified() => {
            tracing::info!(target: "api", "shutdown requested during startup health check");
            return;
        }
        outcome = service.health() => outcome,
    };
    match outcome {
        Ok(status) if status.is_healthy() => {
            tracing::info!(target: "api", message = %status.message, "prediction service is healthy");
        }
        Ok(status) => {
            tracing::warn!(target: "api", status = %status.status, "prediction service is not healthy");
        }
        Err(err) => {
            tracing::warn!(
                target: "api",
                error = %err,
                url = %config.api.health_url(),
                "prediction service health check failed"
            );
        }
    }
}
