use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-user count of authored content items, keyed by profile id
///
/// A missing id means the user has no recorded activity.
pub type ActivityCounts = HashMap<String, u32>;

/// The three kinds of member the platform connects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Founder,
    Developer,
    Investor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Founder => "founder",
            Role::Developer => "developer",
            Role::Investor => "investor",
        }
    }
}

/// Role-specific part of a profile
///
/// Only investors carry investment preferences, so the field exists only on
/// that variant instead of being optional on every profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Founder,
    Developer,
    Investor {
        #[serde(rename = "investorProfile", default)]
        investor_profile: InvestorProfile,
    },
}

/// Investment preferences of an investor profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorProfile {
    #[serde(default)]
    pub interested_domains: Vec<String>,
    #[serde(default)]
    pub budget: Option<Budget>,
}

/// Ticket size range an investor is willing to commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl Budget {
    /// Both ends of the range are present
    pub fn is_fully_specified(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }
}

/// Member profile as supplied by the profile store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    #[serde(flatten)]
    pub role: RoleProfile,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

impl Profile {
    /// Build a profile with only an id and role set
    pub fn new(id: impl Into<String>, role: RoleProfile) -> Self {
        Self {
            id: id.into(),
            role,
            location: String::new(),
            interests: Vec::new(),
            skills: Vec::new(),
            experience: None,
            date_of_birth: None,
        }
    }

    pub fn role(&self) -> Role {
        match self.role {
            RoleProfile::Founder => Role::Founder,
            RoleProfile::Developer => Role::Developer,
            RoleProfile::Investor { .. } => Role::Investor,
        }
    }

    /// Investment preferences, present only on investor profiles
    pub fn investor_profile(&self) -> Option<&InvestorProfile> {
        match &self.role {
            RoleProfile::Investor { investor_profile } => Some(investor_profile),
            _ => None,
        }
    }
}

/// Ranked match returned to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub candidate_id: String,
    pub compatibility_score: u32,
    pub justification: String,
}

/// Runner-up that failed a pass's acceptance criteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearMatchResult {
    pub candidate_id: String,
    pub proximity_score: u32,
    pub missing_signals: Vec<String>,
    pub justification: String,
}

/// Point values for each compatibility signal
///
/// Every signal is an integer contribution; the weights here are the maxima
/// and per-item increments of those contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub role_complementary: u32,
    pub location_exact: u32,
    pub location_region: u32,
    pub interest_per_shared: u32,
    pub interest_cap: u32,
    pub skill_per_shared: u32,
    pub skill_cap: u32,
    pub experience_same: u32,
    pub experience_different: u32,
    pub investor_domain_per_shared: u32,
    pub investor_domain_cap: u32,
    pub investor_budget_bonus: u32,
    pub age_within_5_years: u32,
    pub age_within_10_years: u32,
    pub activity_max: u32,
    pub activity_min_denominator: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            role_complementary: 18,
            location_exact: 10,
            location_region: 6,
            interest_per_shared: 3,
            interest_cap: 15,
            skill_per_shared: 4,
            skill_cap: 20,
            experience_same: 8,
            experience_different: 4,
            investor_domain_per_shared: 3,
            investor_domain_cap: 6,
            investor_budget_bonus: 2,
            age_within_5_years: 5,
            age_within_10_years: 3,
            activity_max: 10,
            activity_min_denominator: 3,
        }
    }
}

/// Minimum scores for each relaxation pass and how many passes may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaxationPolicy {
    pub exact_min_score: u32,
    pub region_min_score: u32,
    pub open_min_score: u32,
    pub max_passes: u8,
}

impl Default for RelaxationPolicy {
    fn default() -> Self {
        Self {
            exact_min_score: 50,
            region_min_score: 40,
            open_min_score: 30,
            max_passes: 3,
        }
    }
}
