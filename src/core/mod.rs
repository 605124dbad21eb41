// Core algorithm exports
pub mod aggregate;
pub mod matcher;
pub mod near_match;
pub mod relaxation;
pub mod scoring;
pub mod signals;

pub use aggregate::{aggregate, Aggregated};
pub use matcher::{MatchOutcome, Matcher};
pub use near_match::{NearMatchCollector, NearMatchEntry};
pub use relaxation::{PassStage, Relaxation, RelaxationController, DIFFERENT_COUNTRY, DIFFERENT_LOCATION};
pub use scoring::{build_justification, score_candidate, signal_breakdown, ScoredCandidate, ScoringContext, SignalBreakdown, MAX_SCORE};
pub use signals::{location_tier, parse_date_of_birth, LocationTier};
