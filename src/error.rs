use thiserror::Error;

/// Errors raised by the matching engine
///
/// Data-quality problems in profiles never surface here; they degrade the
/// affected signal to zero. Only caller contract violations are reported.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("top_k must be at least 1, got {0}")]
    InvalidTopK(usize),

    #[error("Invalid matching policy: {0}")]
    InvalidPolicy(String),
}
