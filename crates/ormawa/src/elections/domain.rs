use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status shown on the e-voting pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionStatus {
    Upcoming,
    Ongoing,
    Finished,
}

impl ElectionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ElectionStatus::Upcoming => "upcoming",
            ElectionStatus::Ongoing => "ongoing",
            ElectionStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status an administrator pinned on the event, overriding the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualStatus {
    Ongoing,
    Finished,
}

impl ManualStatus {
    /// Only `ongoing` and `finished` pin the status; anything else means "follow the schedule".
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ongoing" => Some(Self::Ongoing),
            "finished" => Some(Self::Finished),
            _ => None,
        }
    }
}

impl From<ManualStatus> for ElectionStatus {
    fn from(value: ManualStatus) -> Self {
        match value {
            ManualStatus::Ongoing => ElectionStatus::Ongoing,
            ManualStatus::Finished => ElectionStatus::Finished,
        }
    }
}

/// Time bounds and optional override governing an election's status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionWindow {
    pub manual_status: Option<ManualStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ElectionWindow {
    pub fn scheduled(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            manual_status: None,
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    pub fn with_manual_status(mut self, status: ManualStatus) -> Self {
        self.manual_status = Some(status);
        self
    }
}

/// Votes counted for one candidate on the event document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTally {
    #[serde(alias = "nama")]
    pub name: String,
    #[serde(default, alias = "voteCount", alias = "jumlahSuara")]
    pub vote_count: u64,
}

impl CandidateTally {
    pub fn new(name: impl Into<String>, vote_count: u64) -> Self {
        Self {
            name: name.into(),
            vote_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(pub String);

impl From<&str> for VoterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterParticipation {
    #[serde(default, alias = "hasVoted")]
    pub has_voted: bool,
}

/// Registered voters keyed by identifier, as stored in `pemilihInfo`.
pub type ParticipationRecord = BTreeMap<VoterId, VoterParticipation>;
