use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{
    CandidateTally, ElectionStatus, ElectionWindow, ManualStatus, ParticipationRecord,
};
use super::status::{next_transition, resolve_status, StatusTransition};
use super::tally::{compute_tally, TallyResult};

/// Snapshot of a `pemilihan_events` document.
///
/// Field names accept both the stored document keys (`tanggalMulai`,
/// `kandidat`, `pemilihInfo`, ...) and their snake_case equivalents. Unset or
/// unrecognised values map to `None`/empty rather than failing the whole
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectionEvent {
    #[serde(default, alias = "judul")]
    pub title: String,
    #[serde(
        default,
        alias = "status",
        deserialize_with = "lenient_manual_status"
    )]
    pub manual_status: Option<ManualStatus>,
    #[serde(
        default,
        alias = "tanggalMulai",
        deserialize_with = "document_timestamp"
    )]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "tanggalSelesai",
        deserialize_with = "document_timestamp"
    )]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "kandidat")]
    pub candidates: Vec<CandidateTally>,
    #[serde(default, alias = "pemilihInfo")]
    pub participation: ParticipationRecord,
    #[serde(default, alias = "allowAbstain")]
    pub allow_abstain: bool,
}

impl ElectionEvent {
    pub fn window(&self) -> ElectionWindow {
        ElectionWindow {
            manual_status: self.manual_status,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// Every voter listed on the event is registered for it.
    pub fn registered_voter_count(&self) -> u64 {
        self.participation.len() as u64
    }

    pub fn status(&self, now: DateTime<Utc>) -> ElectionStatus {
        resolve_status(&self.window(), now)
    }

    pub fn next_transition(&self, now: DateTime<Utc>) -> Option<StatusTransition> {
        next_transition(&self.window(), now)
    }

    pub fn tally(&self) -> TallyResult {
        self.tally_with_registered(self.registered_voter_count())
    }

    pub fn tally_with_registered(&self, registered_voter_count: u64) -> TallyResult {
        compute_tally(
            &self.candidates,
            &self.participation,
            self.allow_abstain,
            registered_voter_count,
        )
    }
}

fn lenient_manual_status<'de, D>(deserializer: D) -> Result<Option<ManualStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ManualStatus::parse))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Firestore {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    Millis(i64),
}

fn document_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(RawTimestamp::Text(value)) => {
            parse_timestamp(&value).map_err(serde::de::Error::custom)
        }
        Some(RawTimestamp::Firestore {
            seconds,
            nanoseconds,
        }) => Utc
            .timestamp_opt(seconds, nanoseconds)
            .single()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp {seconds}s out of range"))),
        Some(RawTimestamp::Millis(millis)) => Utc
            .timestamp_millis_opt(millis)
            .single()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp {millis}ms out of range"))),
    }
}

/// Accepts RFC 3339 and the zone-less `datetime-local` form (read as UTC).
/// A blank string means the bound was never set.
pub fn parse_timestamp(value: &str) -> Result<Option<DateTime<Utc>>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Some(naive.and_utc()));
        }
    }

    Err(format!(
        "failed to parse '{trimmed}' as an RFC 3339 or YYYY-MM-DDTHH:MM timestamp"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elections::domain::VoterId;

    const DOCUMENT: &str = r#"{
        "judul": "Pemilihan Ketua BEM 2025",
        "status": "",
        "tanggalMulai": "2025-10-20T08:00:00+07:00",
        "tanggalSelesai": "2025-10-20T16:00",
        "allowAbstain": true,
        "kandidat": [
            { "nama": "Paslon 1", "jumlahSuara": 10, "visi": "..." },
            { "nama": "Paslon 2", "voteCount": 5 }
        ],
        "pemilihInfo": {
            "2101001": { "hasVoted": true },
            "2101002": { "hasVoted": false },
            "2101003": {}
        }
    }"#;

    #[test]
    fn document_fields_map_onto_the_event() {
        let event: ElectionEvent = serde_json::from_str(DOCUMENT).expect("document parses");

        assert_eq!(event.title, "Pemilihan Ketua BEM 2025");
        assert_eq!(event.manual_status, None);
        assert_eq!(
            event.start_time,
            Some(
                Utc.with_ymd_and_hms(2025, 10, 20, 1, 0, 0)
                    .single()
                    .expect("valid")
            )
        );
        assert_eq!(
            event.end_time,
            Some(
                Utc.with_ymd_and_hms(2025, 10, 20, 16, 0, 0)
                    .single()
                    .expect("valid")
            )
        );
        assert!(event.allow_abstain);
        assert_eq!(event.candidates[0], CandidateTally::new("Paslon 1", 10));
        assert_eq!(event.candidates[1].vote_count, 5);
        assert_eq!(event.registered_voter_count(), 3);
        assert!(event.participation[&VoterId::from("2101001")].has_voted);
        assert!(!event.participation[&VoterId::from("2101003")].has_voted);
    }

    #[test]
    fn stored_override_is_honoured() {
        let event: ElectionEvent =
            serde_json::from_str(r#"{ "status": "Finished" }"#).expect("document parses");

        assert_eq!(event.manual_status, Some(ManualStatus::Finished));
        assert_eq!(event.status(Utc::now()), ElectionStatus::Finished);
    }

    #[test]
    fn unknown_stored_status_follows_the_schedule() {
        let event: ElectionEvent = serde_json::from_str(
            r#"{ "status": "upcoming", "tanggalMulai": "2000-01-01T00:00:00Z" }"#,
        )
        .expect("document parses");

        assert_eq!(event.manual_status, None);
        assert_eq!(event.status(Utc::now()), ElectionStatus::Ongoing);
    }

    #[test]
    fn firestore_and_millisecond_timestamps_are_accepted() {
        let event: ElectionEvent = serde_json::from_str(
            r#"{
                "tanggalMulai": { "_seconds": 1760918400, "_nanoseconds": 0 },
                "tanggalSelesai": 1760947200000
            }"#,
        )
        .expect("document parses");

        assert_eq!(
            event.start_time,
            Utc.timestamp_opt(1_760_918_400, 0).single()
        );
        assert_eq!(
            event.end_time,
            Utc.timestamp_opt(1_760_947_200, 0).single()
        );
    }

    #[test]
    fn blank_and_null_bounds_are_unset() {
        let event: ElectionEvent =
            serde_json::from_str(r#"{ "tanggalMulai": "", "tanggalSelesai": null }"#)
                .expect("document parses");

        assert_eq!(event.window(), ElectionWindow::default());
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let result = serde_json::from_str::<ElectionEvent>(r#"{ "tanggalMulai": "besok pagi" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn event_tally_uses_listed_voters_as_registered() {
        let event: ElectionEvent = serde_json::from_str(DOCUMENT).expect("document parses");

        let tally = event.tally();

        assert_eq!(tally.registered_voter_count, 3);
        assert_eq!(tally.total_participated, 1);
        assert_eq!(tally.participation_percent, 33.3);
        assert_eq!(event.tally_with_registered(10).participation_percent, 10.0);
    }

    #[test]
    fn serialized_event_round_trips_through_snake_case_keys() {
        let event: ElectionEvent = serde_json::from_str(DOCUMENT).expect("document parses");

        let encoded = serde_json::to_string(&event).expect("event serializes");
        let decoded: ElectionEvent = serde_json::from_str(&encoded).expect("event parses back");

        assert_eq!(decoded, event);
    }
}
