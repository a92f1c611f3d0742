use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{SubmissionId, SubmissionRecord};
use crate::similarity::{similarity, SimilarityThreshold};

/// Two submissions whose titles met the similarity threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub first: SubmissionId,
    pub second: SubmissionId,
    pub similarity: f64,
}

/// Flagged identifiers plus the pairs that caused them, for the admin screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub threshold: SimilarityThreshold,
    pub flagged_ids: BTreeSet<SubmissionId>,
    pub pairs: Vec<DuplicatePair>,
}

impl DuplicateReport {
    pub fn is_flagged(&self, id: &SubmissionId) -> bool {
        self.flagged_ids.contains(id)
    }

    /// Pairs involving `id`, with the other submission first. A pair between
    /// two records sharing `id` never matches the id against itself.
    pub fn matches_for<'a>(
        &'a self,
        id: &'a SubmissionId,
    ) -> impl Iterator<Item = (&'a SubmissionId, f64)> + 'a {
        self.pairs.iter().filter_map(move |pair| {
            if pair.first == pair.second {
                None
            } else if &pair.first == id {
                Some((&pair.second, pair.similarity))
            } else if &pair.second == id {
                Some((&pair.first, pair.similarity))
            } else {
                None
            }
        })
    }
}

/// Identifiers of every submission involved in at least one near-duplicate pair.
///
/// Each unordered pair `(i, j)` with `i < j` is compared once. The scan is
/// quadratic in the number of records, which is fine for the repository
/// sizes the portal deals with (low hundreds).
pub fn find_duplicates(
    records: &[SubmissionRecord],
    threshold: SimilarityThreshold,
) -> BTreeSet<SubmissionId> {
    let mut flagged = BTreeSet::new();
    for pair in scan_pairs(records, threshold) {
        flagged.insert(pair.first);
        flagged.insert(pair.second);
    }
    flagged
}

/// Flagged pairs ordered by descending similarity, ties kept in record order.
pub fn duplicate_pairs(
    records: &[SubmissionRecord],
    threshold: SimilarityThreshold,
) -> Vec<DuplicatePair> {
    let mut pairs = scan_pairs(records, threshold);
    pairs.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    pairs
}

fn scan_pairs(records: &[SubmissionRecord], threshold: SimilarityThreshold) -> Vec<DuplicatePair> {
    let mut pairs = Vec::new();
    for (i, left) in records.iter().enumerate() {
        for right in &records[i + 1..] {
            let score = similarity(&left.title, &right.title);
            if threshold.is_met_by(score) {
                pairs.push(DuplicatePair {
                    first: left.id.clone(),
                    second: right.id.clone(),
                    similarity: score,
                });
            }
        }
    }
    pairs
}

/// Stateless detector bound to a configured threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateDetector {
    threshold: SimilarityThreshold,
}

impl DuplicateDetector {
    pub fn new(threshold: SimilarityThreshold) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }

    pub fn flagged(&self, records: &[SubmissionRecord]) -> BTreeSet<SubmissionId> {
        find_duplicates(records, self.threshold)
    }

    pub fn report(&self, records: &[SubmissionRecord]) -> DuplicateReport {
        let pairs = duplicate_pairs(records, self.threshold);
        let flagged_ids: BTreeSet<SubmissionId> = pairs
            .iter()
            .flat_map(|pair| [pair.first.clone(), pair.second.clone()])
            .collect();

        debug!(
            records = records.len(),
            pairs = pairs.len(),
            flagged = flagged_ids.len(),
            threshold = %self.threshold,
            "duplicate scan complete"
        );

        DuplicateReport {
            threshold: self.threshold,
            flagged_ids,
            pairs,
        }
    }
}
