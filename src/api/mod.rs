mod client;
pub mod error;
pub mod protocol;

pub use client::{PredictionClient, PredictionService};
pub use error::PredictError;
pub use protocol::PredictRequest;
