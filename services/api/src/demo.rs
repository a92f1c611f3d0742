use crate::infra::{load_event, resolve_threshold};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use ormawa::config::AppConfig;
use ormawa::elections::{
    CandidateTally, ElectionEvent, ElectionStatus, ManualStatus, TallyResult, VoterId,
    VoterParticipation,
};
use ormawa::error::AppError;
use ormawa::publications::{
    DuplicateDetector, DuplicateReport, ReviewQueue, ReviewStatus, SubmissionId,
    SubmissionImporter, SubmissionRecord,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DuplicateScanArgs {
    /// Repository export (.csv with id,judul[,status] columns or .json)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Similarity threshold between 0.0 and 1.0 (defaults to ORMAWA_DUPLICATE_THRESHOLD or 0.85)
    #[arg(long)]
    pub(crate) threshold: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct ElectionStatusArgs {
    /// Election document exported as JSON
    #[arg(long)]
    pub(crate) event: PathBuf,
    /// Evaluate at this instant (RFC 3339) instead of the current time
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub(crate) struct ElectionTallyArgs {
    /// Election document exported as JSON
    #[arg(long)]
    pub(crate) event: PathBuf,
    /// Registered voter count (defaults to the voters listed on the document)
    #[arg(long)]
    pub(crate) registered: Option<u64>,
}

pub(crate) fn run_duplicate_scan(args: DuplicateScanArgs) -> Result<(), AppError> {
    let DuplicateScanArgs { input, threshold } = args;

    let configured = AppConfig::load()?.review.duplicate_threshold;
    let threshold = resolve_threshold(threshold, configured)?;
    let records = SubmissionImporter::from_path(&input)?;

    let report = DuplicateDetector::new(threshold).report(&records);
    println!(
        "Scanned {} submission(s) from {}",
        records.len(),
        input.display()
    );
    render_duplicate_report(&report, &records);
    Ok(())
}

pub(crate) fn run_election_status(args: ElectionStatusArgs) -> Result<(), AppError> {
    let event = load_event(&args.event)?;
    let now = args.now.unwrap_or_else(Utc::now);
    render_status(&event, now);
    Ok(())
}

pub(crate) fn run_election_tally(args: ElectionTallyArgs) -> Result<(), AppError> {
    let event = load_event(&args.event)?;
    let tally = match args.registered {
        Some(count) => event.tally_with_registered(count),
        None => event.tally(),
    };
    render_tally(&event, &tally);
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    println!("Ormawa portal demo");

    println!("\nPublication review queue");
    let submissions = demo_submissions();
    let detector = DuplicateDetector::default();
    let queue = ReviewQueue::build(&submissions, &detector);
    println!(
        "- {} pending | {} approved | {} rejected",
        queue.counts.pending, queue.counts.approved, queue.counts.rejected
    );
    for entry in &queue.pending {
        if entry.is_flagged() {
            println!("  ! {} \"{}\"", entry.id, entry.title);
            for candidate in &entry.possible_duplicates {
                println!(
                    "      resembles {} \"{}\" ({}, {:.0}% similar)",
                    candidate.id,
                    candidate.title,
                    candidate.status.label(),
                    candidate.similarity * 100.0
                );
            }
        } else {
            println!("  - {} \"{}\"", entry.id, entry.title);
        }
    }

    let now = Utc::now();
    let event = demo_event(now);
    println!();
    render_status(&event, now);

    let mut pinned = event.clone();
    pinned.manual_status = Some(ManualStatus::Finished);
    println!(
        "- With the administrator's manual override the status becomes: {}",
        pinned.status(now)
    );

    println!();
    render_tally(&event, &event.tally());
    Ok(())
}

fn render_duplicate_report(report: &DuplicateReport, records: &[SubmissionRecord]) {
    println!("Similarity threshold: {}", report.threshold);
    if report.pairs.is_empty() {
        println!("No near-duplicate titles found.");
        return;
    }

    println!("Near-duplicate pairs:");
    for pair in &report.pairs {
        let title_of = |id: &SubmissionId| {
            records
                .iter()
                .find(|record| &record.id == id)
                .map(|record| record.title.as_str())
                .unwrap_or("?")
        };
        println!(
            "  - {:.2}  {} \"{}\"  <->  {} \"{}\"",
            pair.similarity,
            pair.first,
            title_of(&pair.first),
            pair.second,
            title_of(&pair.second)
        );
    }
    let flagged: Vec<&str> = report.flagged_ids.iter().map(|id| id.as_str()).collect();
    println!("Flagged submissions: {}", flagged.join(", "));
}

fn render_status(event: &ElectionEvent, now: DateTime<Utc>) {
    let title = if event.title.is_empty() {
        "(untitled election)"
    } else {
        event.title.as_str()
    };
    println!("Election: {title}");
    println!("- Status at {}: {}", now.to_rfc3339(), event.status(now));
    if event.manual_status.is_some() {
        println!("- Status pinned manually by an administrator");
    }
    match event.next_transition(now) {
        Some(transition) => {
            let remaining = transition.remaining();
            println!(
                "- Becomes {} at {} (in {}h {:02}m {:02}s)",
                transition.to,
                transition.at.to_rfc3339(),
                remaining.num_hours(),
                remaining.num_minutes() % 60,
                remaining.num_seconds() % 60
            );
        }
        None if event.status(now) == ElectionStatus::Finished => {
            println!("- Voting has closed")
        }
        None => println!("- No scheduled transition"),
    }
}

fn render_tally(event: &ElectionEvent, tally: &TallyResult) {
    println!("Results");
    for candidate in &tally.candidates {
        println!(
            "  - {}: {} vote(s) ({:.1}%)",
            candidate.name, candidate.vote_count, candidate.vote_share_percent
        );
    }
    if event.allow_abstain {
        println!("  - Abstain: {}", tally.abstain_count);
    }
    println!(
        "- Turnout: {} of {} registered voter(s) ({:.1}%)",
        tally.total_participated, tally.registered_voter_count, tally.participation_percent
    );
    let leaders: Vec<&str> = tally
        .leaders()
        .into_iter()
        .map(|candidate| candidate.name.as_str())
        .collect();
    match leaders.len() {
        0 => println!("- No votes recorded yet"),
        1 => println!("- Leading: {}", leaders[0]),
        _ => println!("- Tied: {}", leaders.join(", ")),
    }
}

fn demo_submissions() -> Vec<SubmissionRecord> {
    vec![
        SubmissionRecord::new("pub-001", "Analisis Radiasi Gamma pada Batuan Granit")
            .with_status(ReviewStatus::Approved),
        SubmissionRecord::new("pub-002", "Analisis Radiasi Gama pada Batuan Granit"),
        SubmissionRecord::new("pub-003", "Sistem Kendali Robot Lengan Berbasis PID"),
        SubmissionRecord::new("pub-004", "Laporan Pertanggungjawaban Dana Kegiatan 2024")
            .with_status(ReviewStatus::Rejected),
        SubmissionRecord::new("pub-005", "Laporan Pertanggungjawaban Dana Kegiatan 2025"),
    ]
}

fn demo_event(now: DateTime<Utc>) -> ElectionEvent {
    let participation = (1..=25)
        .map(|index| {
            (
                VoterId(format!("2101{index:03}")),
                VoterParticipation {
                    has_voted: index <= 20,
                },
            )
        })
        .collect();

    ElectionEvent {
        title: "Pemilihan Ketua Himpunan 2025".to_string(),
        manual_status: None,
        start_time: Some(now - Duration::hours(2)),
        end_time: Some(now + Duration::hours(6)),
        candidates: vec![
            CandidateTally::new("Paslon 1", 10),
            CandidateTally::new("Paslon 2", 5),
        ],
        participation,
        allow_abstain: true,
    }
}
