use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;

use crate::{config::PredictApiConfig, domain::PredictionResult};

use super::{
    error::PredictError,
    protocol::{ensure_success, parse_response, HealthStatus, PredictRequest},
};

/// Anything that can turn a batch of comments into predictions.
pub trait PredictionService: Send + Sync {
    fn predict<'a>(
        &'a self,
        request: &'a PredictRequest,
    ) -> BoxFuture<'a, Result<Vec<PredictionResult>, PredictError>>;

    fn health(&self) -> BoxFuture<'_, Result<HealthStatus, PredictError>>;
}

#[derive(Clone)]
pub struct PredictionClient {
    http: Client,
    config: PredictApiConfig,
}

impl PredictionClient {
    pub fn new(http: Client, config: PredictApiConfig) -> Self {
        Self { http, config }
    }

    pub async fn predict(
        &self,
        request: &PredictRequest,
    ) -> Result<Vec<PredictionResult>, PredictError> {
        tracing::debug!(
            target: "api",
            endpoint = %self.config.endpoint,
            comments = request.comments.len(),
            "sending prediction request"
        );

        let response = self
            .http
            .post(self.config.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(PredictError::Transport)?;

        let response = ensure_success(response).await?;
        let results = parse_response(response).await?;

        for result in results.iter().filter(|r| !r.probabilities_consistent()) {
            tracing::debug!(
                target: "api",
                spam = result.spam_probability,
                ham = result.ham_probability,
                "probabilities do not sum to one"
            );
        }
        Ok(results)
    }

    pub async fn health(&self) -> Result<HealthStatus, PredictError> {
        let response = self
            .http
            .get(self.config.health_url())
            .send()
            .await
            .map_err(PredictError::Transport)?;

        let response = ensure_success(response).await?;
        response.json().await.map_err(PredictError::Decode)
    }
}

impl PredictionService for PredictionClient {
    fn predict<'a>(
        &'a self,
        request: &'a PredictRequest,
    ) -> BoxFuture<'a, Result<Vec<PredictionResult>, PredictError>> {
        PredictionClient::predict(self, request).boxed()
    }

    fn health(&self) -> BoxFuture<'_, Result<HealthStatus, PredictError>> {
        PredictionClient::health(self).boxed()
    }
}
