use std::collections::HashMap;

use crate::core::scoring::ScoredCandidate;

/// Near-match entry kept for one candidate id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearMatchEntry {
    pub pool_index: usize,
    pub proximity_score: u32,
    pub missing_signals: Vec<String>,
    pub justification: String,
}

/// Collects candidates rejected by a relaxation pass
///
/// A candidate rejected in several passes keeps only its highest-scoring
/// entry. An equal score keeps the existing entry and adds the new missing
/// signal to it, so a candidate turned away by both location passes reports
/// `different location` then `different country`.
#[derive(Debug, Default)]
pub struct NearMatchCollector<'a> {
    entries: HashMap<&'a str, NearMatchEntry>,
}

impl<'a> NearMatchCollector<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rejection, with the reason when it was a location rejection
    pub fn record(&mut self, candidate: &ScoredCandidate<'a>, missing_signal: Option<&str>) {
        let id = candidate.profile.id.as_str();
        if let Some(existing) = self.entries.get_mut(id) {
            if existing.proximity_score > candidate.score {
                return;
            }
            if existing.proximity_score == candidate.score {
                if let Some(signal) = missing_signal {
                    if !existing.missing_signals.iter().any(|s| s == signal) {
                        existing.missing_signals.push(signal.to_string());
                    }
                }
                return;
            }
        }

        self.entries.insert(
            id,
            NearMatchEntry {
                pool_index: candidate.pool_index,
                proximity_score: candidate.score,
                missing_signals: missing_signal.map(str::to_string).into_iter().collect(),
                justification: candidate.justification.clone(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&NearMatchEntry> {
        self.entries.get(id)
    }

    pub fn into_entries(self) -> HashMap<&'a str, NearMatchEntry> {
        self.entries
    }
}
