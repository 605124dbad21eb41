use std::collections::{HashMap, HashSet};

use crate::core::near_match::{NearMatchCollector, NearMatchEntry};
use crate::core::scoring::ScoredCandidate;
use crate::models::{MatchResult, NearMatchResult};

/// Final ranked lists handed back to the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregated {
    pub matches: Vec<MatchResult>,
    pub near_matches: Vec<NearMatchResult>,
}

/// Rank accepted candidates and near matches, truncating both to `top_k`
///
/// Matches sort by score descending with ties in pool order. Near matches
/// exclude every id that made the final match list and sort by proximity
/// score the same way.
pub fn aggregate<'a>(
    accepted: HashMap<&'a str, ScoredCandidate<'a>>,
    near_matches: NearMatchCollector<'a>,
    top_k: usize,
) -> Aggregated {
    let mut ranked: Vec<ScoredCandidate<'a>> = accepted.into_values().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.pool_index.cmp(&b.pool_index)));
    ranked.truncate(top_k);

    let promoted: HashSet<&str> = ranked.iter().map(|c| c.profile.id.as_str()).collect();

    let mut runners_up: Vec<(&'a str, NearMatchEntry)> = near_matches
        .into_entries()
        .into_iter()
        .filter(|(id, _)| !promoted.contains(id))
        .collect();
    runners_up.sort_by(|(_, a), (_, b)| {
        b.proximity_score
            .cmp(&a.proximity_score)
            .then(a.pool_index.cmp(&b.pool_index))
    });
    runners_up.truncate(top_k);

    let matches = ranked
        .into_iter()
        .map(|c| MatchResult {
            candidate_id: c.profile.id.clone(),
            compatibility_score: c.score,
            justification: c.justification,
        })
        .collect();

    let near_matches = runners_up
        .into_iter()
        .map(|(id, entry)| NearMatchResult {
            candidate_id: id.to_string(),
            proximity_score: entry.proximity_score,
            missing_signals: entry.missing_signals,
            justification: entry.justification,
        })
        .collect();

    Aggregated {
        matches,
        near_matches,
    }
}
