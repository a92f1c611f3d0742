//! Computation core of the student organization portal.
//!
//! Everything here works on immutable snapshots handed over by the document
//! store: near-duplicate detection for publication submissions, election
//! lifecycle status, and vote tallies. The `config`, `error`, and `telemetry`
//! modules carry the ambient plumbing shared with the HTTP service.

pub mod config;
pub mod elections;
pub mod error;
pub mod publications;
pub mod similarity;
pub mod telemetry;

pub use similarity::{similarity, SimilarityThreshold, ThresholdError};
