//! Founder Match - compatibility matching engine for founders, developers and investors
//!
//! This library ranks a pool of candidate profiles against a seeker. It runs
//! up to three scoring passes with progressively looser location and score
//! policies, and reports runners-up as near matches annotated with what they
//! were missing.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchOutcome};
pub use error::MatchError;
pub use models::{ActivityCounts, MatchResult, NearMatchResult, Profile, Role, RoleProfile, ScoringWeights, RelaxationPolicy, FindMatchesRequest, FindMatchesResponse};
