use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ElectionStatus, ElectionWindow};

/// Resolves the lifecycle status of an election at `now`.
///
/// A manual override always wins. Otherwise the event is finished once `now`
/// is strictly past the end, ongoing from the start onwards, and upcoming in
/// every other case, including when no bounds are set. `now` is always
/// supplied by the caller; callers ticking a countdown re-resolve each tick.
pub fn resolve_status(window: &ElectionWindow, now: DateTime<Utc>) -> ElectionStatus {
    if let Some(manual) = window.manual_status {
        return manual.into();
    }

    match (window.start_time, window.end_time) {
        (_, Some(end)) if now > end => ElectionStatus::Finished,
        (Some(start), _) if now >= start => ElectionStatus::Ongoing,
        _ => ElectionStatus::Upcoming,
    }
}

/// Next schedule-driven status change, used for the countdown display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub to: ElectionStatus,
    pub at: DateTime<Utc>,
    pub remaining_seconds: i64,
}

impl StatusTransition {
    pub fn remaining(&self) -> Duration {
        Duration::seconds(self.remaining_seconds)
    }
}

/// Upcoming events count down to their start (or to their end when no start
/// is scheduled before it); ongoing events count down to their end. Manual
/// overrides freeze the status, so they never transition.
pub fn next_transition(window: &ElectionWindow, now: DateTime<Utc>) -> Option<StatusTransition> {
    if window.manual_status.is_some() {
        return None;
    }

    let opening = match resolve_status(window, now) {
        ElectionStatus::Finished => return None,
        ElectionStatus::Upcoming => window.start_time.map(|at| (ElectionStatus::Ongoing, at)),
        ElectionStatus::Ongoing => None,
    };
    let closing = window.end_time.map(|at| (ElectionStatus::Finished, at));

    let (to, at) = match (opening, closing) {
        // Opening wins a tie: at the shared instant the event is ongoing, not yet past its end.
        (Some(open), Some(close)) if close.1 < open.1 => close,
        (Some(open), _) => open,
        (None, Some(close)) => close,
        (None, None) => return None,
    };

    Some(StatusTransition {
        to,
        at,
        remaining_seconds: (at - now).num_seconds().max(0),
    })
}
