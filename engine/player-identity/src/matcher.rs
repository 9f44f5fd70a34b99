use crate::index::IdentityIndex;
use crate::types::{ForeignRecord, MatchMethod, MatchResult, MatchedRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Resolve one record against the index
///
/// Tiers are tried in [`MatchMethod::PRIORITY`] order and the first hit
/// wins. A tier is skipped when the record has no usable key for it.
pub fn match_record<'a>(record: &ForeignRecord, index: &'a IdentityIndex) -> MatchResult<'a> {
    for method in MatchMethod::PRIORITY {
        let Some(key) = record.identity_key(method) else {
            continue;
        };

        if let Some(player_id) = index.lookup(method, &key) {
            return MatchResult::Matched { player_id, method };
        }
    }

    MatchResult::Unmatched
}

/// Resolve a batch of records, splitting them into matched and unmatched
///
/// Every record ends up in exactly one of the two lists, and each list
/// keeps input order.
pub fn match_records<I>(records: I, index: &IdentityIndex) -> MatchOutcome
where
    I: IntoIterator<Item = ForeignRecord>,
{
    let mut outcome = MatchOutcome::default();

    for record in records {
        match match_record(&record, index) {
            MatchResult::Matched { player_id, method } => {
                trace!("Matched {:?} to {} via {}", record.name, player_id, method);
                outcome.matched.push(MatchedRecord {
                    sleeper_id: player_id.to_string(),
                    match_method: method,
                    record,
                });
            }
            MatchResult::Unmatched => {
                trace!("No match for {:?}", record.name);
                outcome.unmatched.push(record);
            }
        }
    }

    debug!("Matched {} of {} records", outcome.matched.len(), outcome.len());
    outcome
}

/// Result of matching a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    pub matched: Vec<MatchedRecord>,

    /// Records no tier resolved, unmodified, for manual review
    pub unmatched: Vec<ForeignRecord>,
}

impl MatchOutcome {
    /// Total number of records processed
    pub fn len(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> MatchStats {
        let mut by_method = BTreeMap::new();
        for record in &self.matched {
            *by_method.entry(record.match_method).or_insert(0) += 1;
        }

        MatchStats {
            total: self.len(),
            matched: self.matched.len(),
            unmatched: self.unmatched.len(),
            by_method,
        }
    }
}

/// Match counts for a batch, broken down by tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub by_method: BTreeMap<MatchMethod, usize>,
}

impl MatchStats {
    /// Fraction of records matched, 0.0 for an empty batch
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }
}
