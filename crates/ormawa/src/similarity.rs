use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized, case-insensitive Levenshtein similarity between two titles.
///
/// Returns `(max_len - distance) / max_len` with lengths counted in
/// characters, so the score is always within `[0.0, 1.0]`. Two empty strings
/// are identical and score `1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max = a.chars().count().max(b.chars().count());
    if max == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(&a, &b);
    (max - distance) as f64 / max as f64
}

/// Minimum similarity at which two titles count as near-duplicates.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SimilarityThreshold(f64);

impl SimilarityThreshold {
    pub const DEFAULT: f64 = 0.85;

    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if value.is_nan() {
            return Err(ThresholdError::NotANumber);
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(ThresholdError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_met_by(self, score: f64) -> bool {
        score >= self.0
    }
}

impl Default for SimilarityThreshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f64> for SimilarityThreshold {
    type Error = ThresholdError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SimilarityThreshold> for f64 {
    fn from(value: SimilarityThreshold) -> Self {
        value.0
    }
}

impl fmt::Display for SimilarityThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("similarity threshold must be a number")]
    NotANumber,
    #[error("similarity threshold {0} is outside 0.0..=1.0")]
    OutOfRange(f64),
}
