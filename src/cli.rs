use crate::commands;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rh_intake::config::AppConfig;
use rh_intake::error::AppError;
use rh_intake::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "rh-intake",
    about = "Track which onboarding documents each HR candidate has delivered",
    version
)]
struct Cli {
    /// Override the configured candidate data file
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the checklist for a gender and family status
    Requirements(RequirementsArgs),
    #[command(flatten)]
    Records(RecordCommand),
}

/// Commands that read or mutate the candidate store.
#[derive(Subcommand, Debug)]
enum RecordCommand {
    /// Register a new candidate
    Add(AddArgs),
    /// Edit a candidate; omitted flags keep their current value
    Update(UpdateArgs),
    /// Remove a candidate
    Delete {
        /// Candidate id (e.g. cand-000001)
        id: String,
    },
    /// Show one candidate with its checklist
    Show(ShowArgs),
    /// List candidates with their completion status
    List(ListArgs),
    /// Print total and completed candidate counters
    Stats,
    /// Print the pending list (who still owes what)
    Pending,
    /// Print the missing-documents message for one candidate
    Missing {
        /// Candidate id
        id: String,
    },
    /// Compose the dated pending report, optionally as a share link
    Report(ReportArgs),
    /// Write a JSON backup of every candidate
    Backup {
        /// Output path (defaults to backup_rh_<date>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace every candidate with the contents of a JSON backup
    Restore {
        /// Backup file produced by `backup`
        path: PathBuf,
    },
    /// Export the status report as CSV
    ExportCsv {
        /// Output path (defaults to relatorio_rh_<date>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Discard all candidates and reinstall the sample data
    Reset {
        /// Start from an empty collection instead of the sample data
        #[arg(long)]
        empty: bool,
    },
}

#[derive(Args, Debug)]
pub(crate) struct AddArgs {
    /// Candidate full name
    #[arg(long)]
    pub(crate) name: String,
    /// Gender (Masculino, Feminino or free text)
    #[arg(long)]
    pub(crate) gender: String,
    /// Candidate has children
    #[arg(long)]
    pub(crate) has_children: bool,
    /// Delivered document, by label or key (repeatable)
    #[arg(long = "doc")]
    pub(crate) documents: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct UpdateArgs {
    /// Candidate id
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) gender: Option<String>,
    /// Set the children flag (true/false)
    #[arg(long)]
    pub(crate) has_children: Option<bool>,
    /// Mark a document as delivered (repeatable)
    #[arg(long)]
    pub(crate) deliver: Vec<String>,
    /// Unmark a delivered document (repeatable)
    #[arg(long)]
    pub(crate) withdraw: Vec<String>,
    /// Clear every delivered document before applying --deliver
    #[arg(long)]
    pub(crate) clear_docs: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Candidate id
    pub(crate) id: String,
    /// Emit JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Keep only names containing this text (case-insensitive)
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Emit JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Report date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = commands::parse_date)]
    pub(crate) date: Option<chrono::NaiveDate>,
    /// Print a share link instead of the raw message
    #[arg(long, value_enum)]
    pub(crate) share: Option<ShareTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ShareTarget {
    Whatsapp,
    Email,
}

#[derive(Args, Debug)]
pub(crate) struct RequirementsArgs {
    /// Gender (Masculino, Feminino or free text)
    #[arg(long)]
    pub(crate) gender: String,
    /// Candidate has children
    #[arg(long)]
    pub(crate) has_children: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(path) = cli.data {
        config.storage.data_path = path;
    }

    telemetry::init(&config.telemetry)?;
    info!(
        environment = config.environment.label(),
        data = %config.storage.data_path.display(),
        "rh-intake ready"
    );

    match cli.command {
        Command::Requirements(args) => {
            commands::print_requirements(&args);
            Ok(())
        }
        Command::Records(command) => {
            let mut store = commands::open_store(&config)?;
            execute(&mut store, command)
        }
    }
}

fn execute(store: &mut commands::FileStore, command: RecordCommand) -> Result<(), AppError> {
    match command {
        RecordCommand::Add(args) => commands::add(store, args),
        RecordCommand::Update(args) => commands::update(store, args),
        RecordCommand::Delete { id } => commands::delete(store, &id),
        RecordCommand::Show(args) => commands::show(store, args),
        RecordCommand::List(args) => commands::list(store, args),
        RecordCommand::Stats => {
            commands::stats(store);
            Ok(())
        }
        RecordCommand::Pending => {
            commands::pending(store);
            Ok(())
        }
        RecordCommand::Missing { id } => commands::missing(store, &id),
        RecordCommand::Report(args) => commands::report(store, args),
        RecordCommand::Backup { out } => commands::backup(store, out),
        RecordCommand::Restore { path } => commands::restore(store, &path),
        RecordCommand::ExportCsv { out } => commands::export_csv(store, out),
        RecordCommand::Reset { empty } => commands::reset(store, empty),
    }
}
