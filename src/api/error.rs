use reqwest::StatusCode;
use thiserror::Error;

/// Every way a prediction request can fail. The form collapses all of them
/// into a single user-facing message; the variants exist for logs.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("request to prediction service failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("prediction service responded with {status}{}", detail_suffix(.detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("prediction service returned an unreadable body: {0}")]
    Decode(#[source] reqwest::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}
