use crate::publications::domain::{ReviewStatus, SubmissionRecord};
use crate::publications::duplicates::DuplicateDetector;
use crate::similarity::SimilarityThreshold;

pub(super) fn record(id: &str, title: &str) -> SubmissionRecord {
    SubmissionRecord::new(id, title)
}

pub(super) fn radiation_submissions() -> Vec<SubmissionRecord> {
    vec![
        record("1", "Analisis Radiasi Gamma"),
        record("2", "Analisis Radiasi Gama"),
        record("3", "Sistem Kendali Robot"),
    ]
}

pub(super) fn mixed_collection() -> Vec<SubmissionRecord> {
    vec![
        record("pub-01", "Pengaruh Media Sosial terhadap Minat Baca")
            .with_status(ReviewStatus::Approved),
        record("pub-02", "Pengaruh Media Sosial Terhadap Minat Baca Siswa"),
        record("pub-03", "Pengaruh media sosial terhadap minat baca"),
        record("pub-04", "Rancang Bangun Alat Pemantau Kualitas Air")
            .with_status(ReviewStatus::Rejected),
        record("pub-05", "Studi Kelayakan Kantin Kampus"),
    ]
}

pub(super) fn detector() -> DuplicateDetector {
    DuplicateDetector::new(SimilarityThreshold::default())
}
