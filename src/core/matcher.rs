use chrono::{NaiveDate, Utc};
use std::collections::HashSet;

use crate::core::{
    aggregate::aggregate,
    relaxation::RelaxationController,
    scoring::{score_candidate, ScoringContext, MAX_SCORE},
};
use crate::error::MatchError;
use crate::models::{ActivityCounts, MatchResult, NearMatchResult, Profile, RelaxationPolicy, ScoringWeights};

/// Result of the matching process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub matches: Vec<MatchResult>,
    pub near_matches: Vec<NearMatchResult>,
    /// Number of relaxation passes that ran (0 for an empty pool)
    pub passes_run: u8,
    /// Distinct candidates considered after removing the seeker and duplicates
    pub candidates_considered: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Drop the seeker and duplicate ids from the pool
/// 2. Score candidates against the seeker
/// 3. Relax location and score policies over up to three passes
/// 4. Rank, deduplicate and truncate matches and near matches
///
/// Holds no state between calls; one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    relaxation: RelaxationPolicy,
    reference_date: Option<NaiveDate>,
}

impl Matcher {
    /// Create a matcher, rejecting inconsistent policy tables
    pub fn new(weights: ScoringWeights, relaxation: RelaxationPolicy) -> Result<Self, MatchError> {
        validate_weights(&weights)?;
        validate_relaxation(&relaxation)?;

        Ok(Self {
            weights,
            relaxation,
            reference_date: None,
        })
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            relaxation: RelaxationPolicy::default(),
            reference_date: None,
        }
    }

    /// Compute ages as of `date` instead of today
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn relaxation(&self) -> &RelaxationPolicy {
        &self.relaxation
    }

    fn as_of(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Find the top `top_k` matches for `seeker` within `pool`
    ///
    /// # Arguments
    /// * `seeker` - The profile requesting matches
    /// * `pool` - Candidate profiles; their order breaks score ties
    /// * `activity` - Content counts per profile id; missing ids count as 0
    /// * `top_k` - Maximum length of both returned lists
    ///
    /// # Returns
    /// Ranked matches and near matches, or `MatchError::InvalidTopK` when
    /// `top_k` is 0
    pub fn find_matches(
        &self,
        seeker: &Profile,
        pool: &[Profile],
        activity: &ActivityCounts,
        top_k: usize,
    ) -> Result<MatchOutcome, MatchError> {
        if top_k == 0 {
            return Err(MatchError::InvalidTopK(top_k));
        }

        // Stage 1: exclude self and collapse repeated ids to their first occurrence
        let mut seen = HashSet::new();
        let candidates: Vec<(usize, &Profile)> = pool
            .iter()
            .enumerate()
            .filter(|&(_, p)| p.id != seeker.id && seen.insert(p.id.as_str()))
            .collect();

        let ctx = ScoringContext::new(
            activity,
            candidates.iter().map(|(_, p)| *p),
            self.as_of(),
        );

        // Stages 2 & 3: score lazily inside the relaxation passes
        let relaxed = RelaxationController::new(&self.relaxation, top_k).run(
            &candidates,
            |pool_index, candidate| {
                score_candidate(seeker, candidate, pool_index, &ctx, &self.weights)
            },
        );

        // Stage 4: rank and trim
        let aggregated = aggregate(relaxed.accepted, relaxed.near_matches, top_k);

        tracing::debug!(
            "Matched seeker {}: {} matches, {} near matches from {} candidates in {} passes",
            seeker.id,
            aggregated.matches.len(),
            aggregated.near_matches.len(),
            candidates.len(),
            relaxed.passes_run
        );

        Ok(MatchOutcome {
            matches: aggregated.matches,
            near_matches: aggregated.near_matches,
            passes_run: relaxed.passes_run,
            candidates_considered: candidates.len(),
        })
    }

    /// Score a single pair outside of any relaxation pass
    ///
    /// Activity is normalized as if `candidate` were the whole pool.
    pub fn score_pair(
        &self,
        seeker: &Profile,
        candidate: &Profile,
        activity: &ActivityCounts,
    ) -> MatchResult {
        let ctx = ScoringContext::new(activity, [candidate], self.as_of());
        let scored = score_candidate(seeker, candidate, 0, &ctx, &self.weights);

        MatchResult {
            candidate_id: candidate.id.clone(),
            compatibility_score: scored.score,
            justification: scored.justification,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

fn validate_weights(weights: &ScoringWeights) -> Result<(), MatchError> {
    let points = [
        ("role_complementary", weights.role_complementary),
        ("location_exact", weights.location_exact),
        ("location_region", weights.location_region),
        ("interest_per_shared", weights.interest_per_shared),
        ("interest_cap", weights.interest_cap),
        ("skill_per_shared", weights.skill_per_shared),
        ("skill_cap", weights.skill_cap),
        ("experience_same", weights.experience_same),
        ("experience_different", weights.experience_different),
        ("investor_domain_per_shared", weights.investor_domain_per_shared),
        ("investor_domain_cap", weights.investor_domain_cap),
        ("investor_budget_bonus", weights.investor_budget_bonus),
        ("age_within_5_years", weights.age_within_5_years),
        ("age_within_10_years", weights.age_within_10_years),
        ("activity_max", weights.activity_max),
    ];
    for (name, value) in points {
        if value > MAX_SCORE {
            return Err(MatchError::InvalidPolicy(format!(
                "{} must be within 0-{}, got {}",
                name, MAX_SCORE, value
            )));
        }
    }

    let caps = [
        ("interest", weights.interest_per_shared, weights.interest_cap),
        ("skill", weights.skill_per_shared, weights.skill_cap),
        (
            "investor_domain",
            weights.investor_domain_per_shared,
            weights.investor_domain_cap,
        ),
    ];
    for (name, per_item, cap) in caps {
        if cap < per_item {
            return Err(MatchError::InvalidPolicy(format!(
                "{}_cap ({}) is below {}_per_shared ({})",
                name, cap, name, per_item
            )));
        }
    }

    if weights.location_region > weights.location_exact {
        return Err(MatchError::InvalidPolicy(
            "location_region must not exceed location_exact".to_string(),
        ));
    }
    if weights.activity_min_denominator == 0 {
        return Err(MatchError::InvalidPolicy(
            "activity_min_denominator must be at least 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_relaxation(policy: &RelaxationPolicy) -> Result<(), MatchError> {
    if !(1..=3).contains(&policy.max_passes) {
        return Err(MatchError::InvalidPolicy(format!(
            "max_passes must be between 1 and 3, got {}",
            policy.max_passes
        )));
    }

    let thresholds = [
        ("exact_min_score", policy.exact_min_score),
        ("region_min_score", policy.region_min_score),
        ("open_min_score", policy.open_min_score),
    ];
    for (name, value) in thresholds {
        if value > MAX_SCORE {
            return Err(MatchError::InvalidPolicy(format!(
                "{} must be within 0-{}, got {}",
                name, MAX_SCORE, value
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleProfile;

    fn create_candidate(id: &str, role: RoleProfile, location: &str, skills: &[&str]) -> Profile {
        let mut profile = Profile::new(id, role);
        profile.location = location.to_string();
        profile.skills = skills.iter().map(|s| s.to_string()).collect();
        profile
    }

    fn matcher() -> Matcher {
        Matcher::with_default_weights()
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let seeker = create_candidate("s", RoleProfile::Founder, "", &[]);
        let result = matcher().find_matches(&seeker, &[], &ActivityCounts::new(), 0);

        assert_eq!(result, Err(MatchError::InvalidTopK(0)));
    }

    #[test]
    fn test_empty_pool() {
        let seeker = create_candidate("s", RoleProfile::Founder, "Austin, USA", &[]);
        let result = matcher()
            .find_matches(&seeker, &[], &ActivityCounts::new(), 5)
            .unwrap();

        assert!(result.matches.is_empty());
        assert!(result.near_matches.is_empty());
        assert_eq!(result.passes_run, 0);
    }

    #[test]
    fn test_seeker_and_duplicates_skipped() {
        let seeker = create_candidate("s", RoleProfile::Founder, "Austin, USA", &["go"]);
        let pool = vec![
            seeker.clone(),
            create_candidate("d", RoleProfile::Developer, "Austin, USA", &["go"]),
            create_candidate("d", RoleProfile::Developer, "Paris, France", &[]),
        ];

        let result = matcher()
            .find_matches(&seeker, &pool, &ActivityCounts::new(), 5)
            .unwrap();

        assert_eq!(result.candidates_considered, 1);
        let all_ids: Vec<&str> = result
            .matches
            .iter()
            .map(|m| m.candidate_id.as_str())
            .chain(result.near_matches.iter().map(|n| n.candidate_id.as_str()))
            .collect();
        assert!(!all_ids.contains(&"s"));
    }

    #[test]
    fn test_relaxation_fills_from_other_countries() {
        let seeker = create_candidate("s", RoleProfile::Founder, "Austin, USA", &["go", "aws"]);
        let pool = vec![create_candidate(
            "far",
            RoleProfile::Developer,
            "Berlin, Germany",
            &["go", "aws", "k8s"],
        )];
        // 18 role + 8 skills = 26: below every threshold
        let result = matcher()
            .find_matches(&seeker, &pool, &ActivityCounts::new(), 5)
            .unwrap();

        assert!(result.matches.is_empty());
        assert_eq!(result.near_matches.len(), 1);
        assert_eq!(result.near_matches[0].proximity_score, 26);
        assert_eq!(
            result.near_matches[0].missing_signals,
            vec!["different location", "different country"]
        );
        assert_eq!(result.passes_run, 3);
    }

    #[test]
    fn test_invalid_policies_rejected() {
        let weights = ScoringWeights {
            skill_cap: 2,
            ..ScoringWeights::default()
        };
        assert!(matches!(
            Matcher::new(weights, RelaxationPolicy::default()),
            Err(MatchError::InvalidPolicy(_))
        ));

        let relaxation = RelaxationPolicy {
            max_passes: 4,
            ..RelaxationPolicy::default()
        };
        assert!(Matcher::new(ScoringWeights::default(), relaxation).is_err());

        let relaxation = RelaxationPolicy {
            exact_min_score: 101,
            ..RelaxationPolicy::default()
        };
        assert!(Matcher::new(ScoringWeights::default(), relaxation).is_err());

        assert!(Matcher::new(ScoringWeights::default(), RelaxationPolicy::default()).is_ok());
    }

    #[test]
    fn test_weights_above_max_score_rejected() {
        let weights = ScoringWeights {
            role_complementary: u32::MAX,
            ..ScoringWeights::default()
        };
        assert_eq!(
            Matcher::new(weights, RelaxationPolicy::default()).unwrap_err(),
            MatchError::InvalidPolicy(format!(
                "role_complementary must be within 0-100, got {}",
                u32::MAX
            ))
        );

        let weights = ScoringWeights {
            activity_max: 101,
            ..ScoringWeights::default()
        };
        assert!(Matcher::new(weights, RelaxationPolicy::default()).is_err());

        let weights = ScoringWeights {
            skill_cap: 100,
            ..ScoringWeights::default()
        };
        assert!(Matcher::new(weights, RelaxationPolicy::default()).is_ok());
    }

    #[test]
    fn test_score_pair() {
        let seeker = create_candidate("s", RoleProfile::Founder, "Austin, USA", &["go"]);
        let dev = create_candidate("d", RoleProfile::Developer, "Dallas, USA", &["go"]);

        let result = matcher().score_pair(&seeker, &dev, &ActivityCounts::new());

        assert_eq!(result.candidate_id, "d");
        assert_eq!(result.compatibility_score, 18 + 6 + 4);
    }
}
