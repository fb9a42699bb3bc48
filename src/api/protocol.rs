use reqwest::Response;
use serde::{Deserialize, Serialize};

use crate::domain::PredictionResult;

use super::error::PredictError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    pub comments: Vec<String>,
}

impl PredictRequest {
    pub fn single(comment: impl Into<String>) -> Self {
        Self {
            comments: vec![comment.into()],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub results: Vec<PredictionResult>,
}

/// Body the service attaches to 4xx/5xx answers.
#[derive(Debug, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

pub async fn ensure_success(response: Response) -> Result<Response, PredictError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(PredictError::Status {
        status,
        detail: error_detail(&body),
    })
}

pub async fn parse_response(response: Response) -> Result<Vec<PredictionResult>, PredictError> {
    let payload: PredictResponse = response.json().await.map_err(PredictError::Decode)?;
    Ok(payload.results)
}

fn error_detail(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ServiceErrorBody>(body) {
        return Some(parsed.error);
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_as_comment_collection() {
        let request = PredictRequest::single("Check out my channel!!! subscribe now");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "comments": ["Check out my channel!!! subscribe now"] })
        );
    }

    #[test]
    fn error_detail_prefers_error_field() {
        assert_eq!(
            error_detail(r#"{"error": "No comments provided"}"#).as_deref(),
            Some("No comments provided")
        );
        assert_eq!(error_detail("  upstream down \n").as_deref(), Some("upstream down"));
        assert_eq!(error_detail("   "), None);
    }

    #[test]
    fn health_status_matches_service_wording() {
        let status: HealthStatus =
            serde_json::from_str(r#"{"status":"healthy","message":"Server is running"}"#).unwrap();
        assert!(status.is_healthy());

        let degraded: HealthStatus = serde_json::from_str(r#"{"status":"starting"}"#).unwrap();
        assert!(!degraded.is_healthy());
        assert!(degraded.message.is_empty());

        let shouting: HealthStatus = serde_json::from_str(r#"{"status":"HEALTHY"}"#).unwrap();
        assert!(!shouting.is_healthy());
    }
}
