use serde::{Deserialize, Serialize};

use super::domain::{CandidateTally, ParticipationRecord};

/// One candidate's line in the published results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub name: String,
    pub vote_count: u64,
    pub vote_share_percent: f64,
}

/// Aggregated results for a single election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyResult {
    pub candidates: Vec<CandidateResult>,
    pub total_candidate_votes: u64,
    pub abstain_count: u64,
    pub total_participated: u64,
    pub registered_voter_count: u64,
    pub participation_percent: f64,
}

impl TallyResult {
    /// Candidates holding the highest vote count; ties are all returned.
    /// Empty while nobody has received a vote.
    pub fn leaders(&self) -> Vec<&CandidateResult> {
        let top = self
            .candidates
            .iter()
            .map(|candidate| candidate.vote_count)
            .max()
            .unwrap_or(0);
        if top == 0 {
            return Vec::new();
        }
        self.candidates
            .iter()
            .filter(|candidate| candidate.vote_count == top)
            .collect()
    }
}

/// Aggregates candidate votes and voter participation.
///
/// Abstentions are never stored: when abstaining is allowed they are inferred
/// as the number of voters who cast a ballot beyond the votes recorded for
/// candidates. Any drift between the two counters therefore shows up as
/// abstentions too.
pub fn compute_tally(
    candidates: &[CandidateTally],
    participation: &ParticipationRecord,
    allow_abstain: bool,
    registered_voter_count: u64,
) -> TallyResult {
    let total_candidate_votes: u64 = candidates
        .iter()
        .map(|candidate| candidate.vote_count)
        .sum();
    let total_participated = participation
        .values()
        .filter(|entry| entry.has_voted)
        .count() as u64;

    let abstain_count = if allow_abstain && total_participated > total_candidate_votes {
        total_participated - total_candidate_votes
    } else {
        0
    };

    let participation_percent = if registered_voter_count > 0 {
        round_one_decimal(total_participated as f64 / registered_voter_count as f64 * 100.0)
    } else {
        0.0
    };

    let candidates = candidates
        .iter()
        .map(|candidate| CandidateResult {
            name: candidate.name.clone(),
            vote_count: candidate.vote_count,
            vote_share_percent: if total_candidate_votes > 0 {
                round_one_decimal(
                    candidate.vote_count as f64 / total_candidate_votes as f64 * 100.0,
                )
            } else {
                0.0
            },
        })
        .collect();

    TallyResult {
        candidates,
        total_candidate_votes,
        abstain_count,
        total_participated,
        registered_voter_count,
        participation_percent,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elections::domain::{VoterId, VoterParticipation};

    fn participation(voted: usize, not_voted: usize) -> ParticipationRecord {
        let mut record = ParticipationRecord::new();
        for index in 0..voted {
            record.insert(
                VoterId(format!("voter-{index:03}")),
                VoterParticipation { has_voted: true },
            );
        }
        for index in 0..not_voted {
            record.insert(
                VoterId(format!("idle-{index:03}")),
                VoterParticipation { has_voted: false },
            );
        }
        record
    }

    fn candidates() -> Vec<CandidateTally> {
        vec![CandidateTally::new("A", 10), CandidateTally::new("B", 5)]
    }

    #[test]
    fn abstentions_fill_the_gap_between_ballots_and_candidate_votes() {
        let tally = compute_tally(&candidates(), &participation(20, 5), true, 25);

        assert_eq!(tally.total_candidate_votes, 15);
        assert_eq!(tally.total_participated, 20);
        assert_eq!(tally.abstain_count, 5);
        assert_eq!(tally.participation_percent, 80.0);
        assert_eq!(tally.candidates[0].vote_count, 10);
        assert_eq!(tally.candidates[1].vote_count, 5);
    }

    #[test]
    fn abstentions_are_zero_when_not_allowed() {
        let tally = compute_tally(&candidates(), &participation(20, 0), false, 25);

        assert_eq!(tally.abstain_count, 0);
    }

    #[test]
    fn abstentions_never_go_negative() {
        let tally = compute_tally(&candidates(), &participation(12, 0), true, 25);

        assert_eq!(tally.abstain_count, 0);
    }

    #[test]
    fn zero_registered_voters_yields_zero_percent() {
        let tally = compute_tally(&candidates(), &participation(3, 0), true, 0);

        assert_eq!(tally.participation_percent, 0.0);
    }

    #[test]
    fn empty_inputs_produce_an_empty_tally() {
        let tally = compute_tally(&[], &ParticipationRecord::new(), true, 0);

        assert_eq!(tally.total_candidate_votes, 0);
        assert_eq!(tally.total_participated, 0);
        assert_eq!(tally.abstain_count, 0);
        assert!(tally.candidates.is_empty());
        assert!(tally.leaders().is_empty());
    }

    #[test]
    fn participation_percent_is_rounded_to_one_decimal() {
        let tally = compute_tally(&[], &participation(1, 2), false, 3);

        assert_eq!(tally.participation_percent, 33.3);
    }

    #[test]
    fn vote_shares_cover_all_candidate_votes() {
        let tally = compute_tally(&candidates(), &participation(15, 0), false, 20);

        assert_eq!(tally.candidates[0].vote_share_percent, 66.7);
        assert_eq!(tally.candidates[1].vote_share_percent, 33.3);
        let sum: f64 = tally
            .candidates
            .iter()
            .map(|candidate| candidate.vote_share_percent)
            .sum();
        assert!((sum - 100.0).abs() < 0.2);
    }

    #[test]
    fn leaders_keep_ties() {
        let tied = vec![
            CandidateTally::new("A", 7),
            CandidateTally::new("B", 7),
            CandidateTally::new("C", 2),
        ];
        let tally = compute_tally(&tied, &participation(16, 0), true, 16);

        let names: Vec<_> = tally
            .leaders()
            .into_iter()
            .map(|candidate| candidate.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn recomputing_gives_identical_results() {
        let voters = participation(20, 5);
        assert_eq!(
            compute_tally(&candidates(), &voters, true, 25),
            compute_tally(&candidates(), &voters, true, 25)
        );
    }
}
