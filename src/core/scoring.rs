use chrono::NaiveDate;

use crate::core::signals::{
    activity_level, age_proximity, experience_alignment, interest_overlap, investor_fit,
    location_proximity, location_tier, role_complementarity, skill_overlap, LocationTier,
};
use crate::models::{ActivityCounts, Profile, ScoringWeights};

/// Upper bound of every compatibility score
pub const MAX_SCORE: u32 = 100;

const FALLBACK_JUSTIFICATION: &str = "Good potential match based on your overall profiles.";

/// Pool-wide inputs shared by every pair scored in one run
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub activity: &'a ActivityCounts,
    /// Highest activity count among the candidates in the pool
    pub pool_max_activity: u32,
    /// Date ages are computed at
    pub as_of: NaiveDate,
}

impl<'a> ScoringContext<'a> {
    pub fn new<'p, I>(activity: &'a ActivityCounts, candidates: I, as_of: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'p Profile>,
    {
        let pool_max_activity = candidates
            .into_iter()
            .map(|p| activity.get(&p.id).copied().unwrap_or(0))
            .max()
            .unwrap_or(0);

        Self {
            activity,
            pool_max_activity,
            as_of,
        }
    }

    fn activity_of(&self, profile: &Profile) -> u32 {
        self.activity.get(&profile.id).copied().unwrap_or(0)
    }
}

/// Contribution of each signal for one seeker/candidate pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalBreakdown {
    pub role: u32,
    pub location: u32,
    pub interests: u32,
    pub skills: u32,
    pub experience: u32,
    pub investor: u32,
    pub age: u32,
    pub activity: u32,
}

impl SignalBreakdown {
    /// Sum of all contributions, clamped to [0, 100]
    pub fn total(&self) -> u32 {
        [
            self.role,
            self.location,
            self.interests,
            self.skills,
            self.experience,
            self.investor,
            self.age,
            self.activity,
        ]
        .into_iter()
        .fold(0u32, u32::saturating_add)
        .min(MAX_SCORE)
    }
}

/// A candidate after scoring, before any pass policy is applied
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub profile: &'a Profile,
    /// Position in the caller's pool, used for stable tie-breaking
    pub pool_index: usize,
    pub score: u32,
    pub location: LocationTier,
    pub justification: String,
}

/// Compute every signal for a pair
pub fn signal_breakdown(
    seeker: &Profile,
    candidate: &Profile,
    ctx: &ScoringContext<'_>,
    weights: &ScoringWeights,
) -> (SignalBreakdown, LocationTier) {
    let tier = location_tier(&seeker.location, &candidate.location);

    let breakdown = SignalBreakdown {
        role: role_complementarity(seeker.role(), candidate.role(), weights),
        location: location_proximity(tier, weights),
        interests: interest_overlap(seeker, candidate, weights),
        skills: skill_overlap(seeker, candidate, weights),
        experience: experience_alignment(seeker, candidate, weights),
        investor: investor_fit(seeker, candidate, weights),
        age: age_proximity(seeker, candidate, ctx.as_of, weights),
        activity: activity_level(ctx.activity_of(candidate), ctx.pool_max_activity, weights),
    };

    (breakdown, tier)
}

/// Score a candidate (0-100) and explain the result
pub fn score_candidate<'a>(
    seeker: &Profile,
    candidate: &'a Profile,
    pool_index: usize,
    ctx: &ScoringContext<'_>,
    weights: &ScoringWeights,
) -> ScoredCandidate<'a> {
    let (breakdown, tier) = signal_breakdown(seeker, candidate, ctx, weights);

    ScoredCandidate {
        profile: candidate,
        pool_index,
        score: breakdown.total(),
        location: tier,
        justification: build_justification(&breakdown, tier),
    }
}

/// Summarize up to 3 categories that fired into one sentence
///
/// Categories are checked in the fixed order role, location, skills,
/// interests, age; the first three with a non-zero contribution are named.
pub fn build_justification(breakdown: &SignalBreakdown, tier: LocationTier) -> String {
    let location_label = match tier {
        LocationTier::Exact => "the same location",
        _ => "the same country or region",
    };

    let labels: Vec<&str> = [
        (breakdown.role, "complementary roles"),
        (breakdown.location, location_label),
        (breakdown.skills, "shared skills"),
        (breakdown.interests, "shared interests"),
        (breakdown.age, "a similar age"),
    ]
    .into_iter()
    .filter(|(points, _)| *points > 0)
    .map(|(_, label)| label)
    .take(3)
    .collect();

    if labels.is_empty() {
        return FALLBACK_JUSTIFICATION.to_string();
    }

    format!("Strong fit thanks to {}.", join_labels(&labels))
}

fn join_labels(labels: &[&str]) -> String {
    match labels {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
