use crate::demo::{
    run_demo, run_duplicate_scan, run_election_status, run_election_tally, DuplicateScanArgs,
    ElectionStatusArgs, ElectionTallyArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ormawa::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Ormawa Portal",
    about = "Run the student organization portal service or its offline checks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Publication repository checks
    Publications {
        #[command(subcommand)]
        command: PublicationsCommand,
    },
    /// E-voting status and results
    Election {
        #[command(subcommand)]
        command: ElectionCommand,
    },
    /// Walk through duplicate detection, status, and tally on sample data
    Demo,
}

#[derive(Subcommand, Debug)]
enum PublicationsCommand {
    /// Flag near-duplicate titles in a CSV or JSON export
    Duplicates(DuplicateScanArgs),
}

#[derive(Subcommand, Debug)]
enum ElectionCommand {
    /// Resolve the lifecycle status of an election document
    Status(ElectionStatusArgs),
    /// Tally votes, abstentions, and participation for an election document
    Tally(ElectionTallyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Publications {
            command: PublicationsCommand::Duplicates(args),
        } => run_duplicate_scan(args),
        Command::Election {
            command: ElectionCommand::Status(args),
        } => run_election_status(args),
        Command::Election {
            command: ElectionCommand::Tally(args),
        } => run_election_tally(args),
        Command::Demo => run_demo(),
    }
}
