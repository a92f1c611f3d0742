//! E-voting computations: lifecycle status and result tallies.

pub mod domain;
pub mod event;
pub mod status;
pub mod tally;

pub use domain::{
    CandidateTally, ElectionStatus, ElectionWindow, ManualStatus, ParticipationRecord, VoterId,
    VoterParticipation,
};
pub use event::{parse_timestamp, ElectionEvent};
pub use status::{next_transition, resolve_status, StatusTransition};
pub use tally::{compute_tally, CandidateResult, TallyResult};
