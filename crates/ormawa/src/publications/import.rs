use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{ReviewStatus, SubmissionId, SubmissionRecord};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read submission export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid submission CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid submission JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("row {row}: unknown review status '{value}'")]
    UnknownStatus { row: usize, value: String },
    #[error("unsupported submission export '{0}', expected .csv or .json")]
    UnsupportedFormat(String),
}

/// Loads a snapshot of the repository collection from an offline export.
pub struct SubmissionImporter;

impl SubmissionImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<SubmissionRecord>, ImportError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Self::from_csv(std::fs::File::open(path)?),
            Some("json") => Self::from_json(std::fs::File::open(path)?),
            _ => Err(ImportError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Reads `id,judul[,status]` rows; `title` is accepted in place of `judul`.
    pub fn from_csv<R: Read>(reader: R) -> Result<Vec<SubmissionRecord>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for (index, row) in csv_reader.deserialize::<SubmissionRow>().enumerate() {
            let row = row?;
            let status = match row.status {
                Some(raw) => {
                    ReviewStatus::parse(&raw).ok_or_else(|| ImportError::UnknownStatus {
                        row: index + 1,
                        value: raw,
                    })?
                }
                None => ReviewStatus::Pending,
            };

            records.push(SubmissionRecord {
                id: SubmissionId(row.id),
                title: row.title,
                status,
            });
        }

        Ok(records)
    }

    /// Accepts either a bare array of documents or `{ "submissions": [...] }`.
    pub fn from_json<R: Read>(reader: R) -> Result<Vec<SubmissionRecord>, ImportError> {
        let snapshot: JsonSnapshot = serde_json::from_reader(reader)?;
        Ok(match snapshot {
            JsonSnapshot::Bare(records) => records,
            JsonSnapshot::Wrapped { submissions } => submissions,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonSnapshot {
    Bare(Vec<SubmissionRecord>),
    Wrapped { submissions: Vec<SubmissionRecord> },
}

#[derive(Debug, Deserialize)]
struct SubmissionRow {
    id: String,
    #[serde(alias = "judul")]
    title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn csv_rows_map_to_pending_by_default() {
        let data = "id,judul,status\n1,Analisis Radiasi Gamma,\n2,Sistem Kendali Robot,approved\n";
        let records = SubmissionImporter::from_csv(Cursor::new(data)).expect("csv parses");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Analisis Radiasi Gamma");
        assert_eq!(records[0].status, ReviewStatus::Pending);
        assert_eq!(records[1].status, ReviewStatus::Approved);
    }

    #[test]
    fn csv_without_status_column_is_accepted() {
        let data = "id,title\nA, Laporan Tahunan \n";
        let records = SubmissionImporter::from_csv(Cursor::new(data)).expect("csv parses");

        assert_eq!(records, vec![SubmissionRecord::new("A", "Laporan Tahunan")]);
    }

    #[test]
    fn csv_rejects_unknown_status() {
        let data = "id,judul,status\n1,Judul,archived\n";
        let err = SubmissionImporter::from_csv(Cursor::new(data)).expect_err("status rejected");

        match err {
            ImportError::UnknownStatus { row, value } => {
                assert_eq!(row, 1);
                assert_eq!(value, "archived");
            }
            other => panic!("expected unknown status, got {other:?}"),
        }
    }

    #[test]
    fn json_accepts_wrapped_and_bare_snapshots() {
        let bare = r#"[{"id":"1","judul":"Buletin Edisi 1","penulis":"BEM"}]"#;
        let wrapped = r#"{"submissions":[{"id":"1","title":"Buletin Edisi 1","status":"rejected"}]}"#;

        let bare = SubmissionImporter::from_json(Cursor::new(bare)).expect("bare parses");
        let wrapped = SubmissionImporter::from_json(Cursor::new(wrapped)).expect("wrapped parses");

        assert_eq!(bare[0].title, "Buletin Edisi 1");
        assert_eq!(bare[0].status, ReviewStatus::Pending);
        assert_eq!(wrapped[0].status, ReviewStatus::Rejected);
    }

    #[test]
    fn unsupported_extension_is_reported() {
        let err = SubmissionImporter::from_path("submissions.xlsx").expect_err("rejected");
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }
}
