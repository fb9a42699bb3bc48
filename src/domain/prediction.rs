use serde::{Deserialize, Serialize};

const PROBABILITY_SUM_TOLERANCE: f64 = 0.01;

/// One classification result for a single submitted comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub comment: String,
    pub is_spam: bool,
    pub spam_probability: f64,
    pub ham_probability: f64,
}

impl PredictionResult {
    /// Whether the two probabilities add up to roughly one. Not enforced; the
    /// service owns the numbers.
    pub fn probabilities_consistent(&self) -> bool {
        (self.spam_probability + self.ham_probability - 1.0).abs() <= PROBABILITY_SUM_TOLERANCE
    }
}
