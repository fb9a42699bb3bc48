pub mod prediction;

pub use prediction::PredictionResult;
