//! Publication repository review: near-duplicate detection and the admin queue.

pub mod domain;
pub mod duplicates;
pub mod import;
pub mod review;

#[cfg(test)]
mod tests;

pub use domain::{ReviewStatus, SubmissionId, SubmissionRecord};
pub use duplicates::{
    duplicate_pairs, find_duplicates, DuplicateDetector, DuplicatePair, DuplicateReport,
};
pub use import::{ImportError, SubmissionImporter};
pub use review::{DuplicateMatch, PendingReviewEntry, ReviewCounts, ReviewQueue};
