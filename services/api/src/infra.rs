use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use ormawa::elections::{parse_timestamp, ElectionEvent};
use ormawa::error::AppError;
use ormawa::SimilarityThreshold;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Clap value parser for `--now`-style arguments.
pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(raw)?.ok_or_else(|| "timestamp must not be empty".to_string())
}

/// Request bodies may omit `now`; an omitted or blank value means "current time".
pub(crate) fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match raw {
        Some(value) => Ok(parse_timestamp(value)
            .map_err(AppError::InvalidInput)?
            .unwrap_or_else(Utc::now)),
        None => Ok(Utc::now()),
    }
}

pub(crate) fn resolve_threshold(
    requested: Option<f64>,
    configured: SimilarityThreshold,
) -> Result<SimilarityThreshold, AppError> {
    match requested {
        Some(value) => Ok(SimilarityThreshold::new(value)?),
        None => Ok(configured),
    }
}

pub(crate) fn load_event(path: &Path) -> Result<ElectionEvent, AppError> {
    let file = std::fs::File::open(path)?;
    serde_json::from_reader(file).map_err(|err| {
        AppError::InvalidInput(format!(
            "election document {} is not valid: {err}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_instant_accepts_rfc3339_and_local_form() {
        let expected = Utc
            .with_ymd_and_hms(2025, 10, 20, 8, 0, 0)
            .single()
            .expect("valid");
        assert_eq!(parse_instant("2025-10-20T08:00:00Z"), Ok(expected));
        assert_eq!(parse_instant("2025-10-20T08:00"), Ok(expected));
        assert!(parse_instant("").is_err());
        assert!(parse_instant("kemarin").is_err());
    }

    #[test]
    fn requested_threshold_overrides_configured_one() {
        let configured = SimilarityThreshold::default();

        let chosen = resolve_threshold(Some(0.5), configured).expect("valid threshold");
        assert_eq!(chosen.value(), 0.5);
        assert_eq!(
            resolve_threshold(None, configured).expect("configured threshold"),
            configured
        );
        assert!(resolve_threshold(Some(3.0), configured).is_err());
    }
}
