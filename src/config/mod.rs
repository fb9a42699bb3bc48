pub mod env;
mod loader;

pub use env::{AppConfig, DirectoryConfig, PredictApiConfig};
pub use loader::load_config;
