use thiserror::Error;
use url::Url;

pub const DEFAULT_PREDICT_API_URL: &str = "http://localhost:5000/api/predict";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: PredictApiConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct PredictApiConfig {
    pub endpoint: Url,
}

impl PredictApiConfig {
    /// Health probe lives at the root of the service host.
    pub fn health_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path("/");
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
