use std::collections::HashMap;

use crate::core::near_match::NearMatchCollector;
use crate::core::scoring::ScoredCandidate;
use crate::core::signals::LocationTier;
use crate::models::{Profile, RelaxationPolicy};

/// Missing-signal label for a pass 1 location rejection
pub const DIFFERENT_LOCATION: &str = "different location";
/// Missing-signal label for a pass 2 location rejection
pub const DIFFERENT_COUNTRY: &str = "different country";

/// State of the relaxation loop
///
/// `ExactLocation -> SameRegion -> Anywhere -> Done`, leaving early for
/// `Done` once enough matches have accumulated or the policy's pass limit is
/// reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStage {
    ExactLocation,
    SameRegion,
    Anywhere,
    Done,
}

impl PassStage {
    /// 1-based pass number, 0 for `Done`
    pub fn number(self) -> u8 {
        match self {
            PassStage::ExactLocation => 1,
            PassStage::SameRegion => 2,
            PassStage::Anywhere => 3,
            PassStage::Done => 0,
        }
    }

    fn successor(self) -> Self {
        match self {
            PassStage::ExactLocation => PassStage::SameRegion,
            PassStage::SameRegion => PassStage::Anywhere,
            PassStage::Anywhere | PassStage::Done => PassStage::Done,
        }
    }

    /// Next state, honouring the accumulation target and pass limit
    pub fn next(self, accumulated: usize, target: usize, policy: &RelaxationPolicy) -> Self {
        if accumulated >= target {
            return PassStage::Done;
        }
        match self.successor() {
            PassStage::Done => PassStage::Done,
            next if next.number() > policy.max_passes => PassStage::Done,
            next => next,
        }
    }

    pub fn min_score(self, policy: &RelaxationPolicy) -> u32 {
        match self {
            PassStage::ExactLocation => policy.exact_min_score,
            PassStage::SameRegion => policy.region_min_score,
            PassStage::Anywhere | PassStage::Done => policy.open_min_score,
        }
    }

    /// Whether the location policy of this pass accepts the pair
    pub fn admits(self, tier: LocationTier) -> bool {
        match self {
            PassStage::ExactLocation => tier == LocationTier::Exact,
            PassStage::SameRegion => tier >= LocationTier::SameRegion,
            PassStage::Anywhere | PassStage::Done => true,
        }
    }

    /// Reason recorded when this pass's location policy rejects a candidate
    pub fn missing_signal(self) -> Option<&'static str> {
        match self {
            PassStage::ExactLocation => Some(DIFFERENT_LOCATION),
            PassStage::SameRegion => Some(DIFFERENT_COUNTRY),
            PassStage::Anywhere | PassStage::Done => None,
        }
    }
}

/// Everything the relaxation loop produced
#[derive(Debug)]
pub struct Relaxation<'a> {
    /// Accepted candidates keyed by id; the first qualifying pass wins
    pub accepted: HashMap<&'a str, ScoredCandidate<'a>>,
    pub near_matches: NearMatchCollector<'a>,
    pub passes_run: u8,
}

/// Runs scoring passes with progressively looser location and score policies
/// until `target` matches have accumulated or the passes are exhausted
///
/// Passes after the first stop accepting as soon as `target` is reached.
#[derive(Debug, Clone, Copy)]
pub struct RelaxationController<'p> {
    policy: &'p RelaxationPolicy,
    target: usize,
}

impl<'p> RelaxationController<'p> {
    pub fn new(policy: &'p RelaxationPolicy, target: usize) -> Self {
        Self { policy, target }
    }

    /// Run the passes over `candidates` (pool index, profile)
    ///
    /// `score` is invoked at most once per candidate; scores do not depend on
    /// the pass, so later passes reuse them.
    pub fn run<'a, F>(&self, candidates: &[(usize, &'a Profile)], mut score: F) -> Relaxation<'a>
    where
        F: FnMut(usize, &'a Profile) -> ScoredCandidate<'a>,
    {
        let mut accepted: HashMap<&'a str, ScoredCandidate<'a>> = HashMap::new();
        let mut near_matches = NearMatchCollector::new();
        let mut scored: Vec<Option<ScoredCandidate<'a>>> = vec![None; candidates.len()];
        let mut passes_run = 0;

        let mut stage = if candidates.is_empty() {
            PassStage::Done
        } else {
            PassStage::ExactLocation
        };

        while stage != PassStage::Done {
            let min_score = stage.min_score(self.policy);
            let before = accepted.len();

            for (slot, &(pool_index, profile)) in candidates.iter().enumerate() {
                // Pass 1 may overfill; later passes never push earlier matches out of top_k
                if stage != PassStage::ExactLocation && accepted.len() >= self.target {
                    break;
                }
                if accepted.contains_key(profile.id.as_str()) {
                    continue;
                }
                let candidate = scored[slot]
                    .get_or_insert_with(|| score(pool_index, profile))
                    .clone();

                if !stage.admits(candidate.location) {
                    near_matches.record(&candidate, stage.missing_signal());
                } else if candidate.score < min_score {
                    near_matches.record(&candidate, None);
                } else {
                    accepted.insert(profile.id.as_str(), candidate);
                }
            }

            passes_run = stage.number();
            tracing::debug!(
                "Pass {} (min score {}): accepted {} new, {} total, {} near matches",
                passes_run,
                min_score,
                accepted.len() - before,
                accepted.len(),
                near_matches.len()
            );

            stage = stage.next(accepted.len(), self.target, self.policy);
        }

        Relaxation {
            accepted,
            near_matches,
            passes_run,
        }
    }
}
