use std::env;

use url::Url;

use super::env::{
    AppConfig, ConfigError, DirectoryConfig, LoggingConfig, PredictApiConfig,
    DEFAULT_PREDICT_API_URL,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let endpoint = parse_endpoint(
            env::var("PREDICT_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .as_deref()
                .unwrap_or(DEFAULT_PREDICT_API_URL),
        )?;

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(Self {
            api: PredictApiConfig { endpoint },
            directories,
            logging,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|err| ConfigError::Invalid {
        key: "PREDICT_API_URL",
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key: "PREDICT_API_URL",
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(url)
}
