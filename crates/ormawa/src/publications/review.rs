use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::{ReviewStatus, SubmissionId, SubmissionRecord};
use super::duplicates::{DuplicateDetector, DuplicateReport};

/// Totals per review state shown above the admin queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl ReviewCounts {
    pub fn total(&self) -> usize {
        self.pending + self.approved + self.rejected
    }
}

/// Another submission whose title resembles the queued one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub id: SubmissionId,
    pub title: String,
    pub status: ReviewStatus,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReviewEntry {
    pub id: SubmissionId,
    pub title: String,
    pub possible_duplicates: Vec<DuplicateMatch>,
}

impl PendingReviewEntry {
    pub fn is_flagged(&self) -> bool {
        !self.possible_duplicates.is_empty()
    }
}

/// Admin review queue: pending submissions annotated with near-duplicates.
///
/// Pending titles are compared against the whole collection, so a resubmission
/// of an already approved publication is flagged too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewQueue {
    pub counts: ReviewCounts,
    pub pending: Vec<PendingReviewEntry>,
    pub duplicates: DuplicateReport,
}

impl ReviewQueue {
    pub fn build(records: &[SubmissionRecord], detector: &DuplicateDetector) -> Self {
        let duplicates = detector.report(records);
        let by_id: HashMap<&SubmissionId, &SubmissionRecord> =
            records.iter().map(|record| (&record.id, record)).collect();

        let mut counts = ReviewCounts::default();
        let mut pending = Vec::new();

        for record in records {
            match record.status {
                ReviewStatus::Approved => counts.approved += 1,
                ReviewStatus::Rejected => counts.rejected += 1,
                ReviewStatus::Pending => {
                    counts.pending += 1;
                    let possible_duplicates = duplicates
                        .matches_for(&record.id)
                        .filter_map(|(other, similarity)| {
                            by_id.get(other).map(|other| DuplicateMatch {
                                id: other.id.clone(),
                                title: other.title.clone(),
                                status: other.status,
                                similarity,
                            })
                        })
                        .collect();

                    pending.push(PendingReviewEntry {
                        id: record.id.clone(),
                        title: record.title.clone(),
                        possible_duplicates,
                    });
                }
            }
        }

        Self {
            counts,
            pending,
            duplicates,
        }
    }

    pub fn flagged_pending(&self) -> impl Iterator<Item = &PendingReviewEntry> {
        self.pending.iter().filter(|entry| entry.is_flagged())
    }
}
