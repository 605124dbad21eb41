use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::{ActivityCounts, Profile};

/// Request to find matches for a seeker within a supplied candidate pool
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesRequest {
    #[validate(custom(function = "validate_profile_id"))]
    pub seeker: Profile,
    #[serde(default)]
    pub pool: Vec<Profile>,
    /// When absent the service fetches counts from the activity store
    #[serde(default)]
    pub activity_counts: Option<ActivityCounts>,
    #[validate(range(min = 1))]
    #[serde(default, alias = "top_k")]
    pub top_k: Option<i64>,
}

/// Request to score a single seeker/candidate pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScorePairRequest {
    #[validate(custom(function = "validate_profile_id"))]
    pub seeker: Profile,
    #[validate(custom(function = "validate_profile_id"))]
    pub candidate: Profile,
    #[serde(default)]
    pub activity_counts: Option<ActivityCounts>,
}

fn validate_profile_id(profile: &Profile) -> Result<(), ValidationError> {
    if profile.id.trim().is_empty() {
        return Err(ValidationError::new("empty_profile_id"));
    }
    Ok(())
}
