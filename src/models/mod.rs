// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ActivityCounts, Budget, InvestorProfile, MatchResult, NearMatchResult, Profile,
    RelaxationPolicy, Role, RoleProfile, ScoringWeights,
};
pub use requests::{FindMatchesRequest, ScorePairRequest};
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse};
