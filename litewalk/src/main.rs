use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use litewalk::storage::{FilePager, PageNumber};
use litewalk::{
    Catalog, Database, Error, JoinStrategy, Result, find_people, find_people_covering_index,
    scan_for_title, stab_for_title,
};

const DEFAULT_DATABASE: &str = "database.db";
const DATABASE_ENV: &str = "LITEWALK_DB";
const REPORT_ENV: &str = "LITEWALK_REPORT";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        tracing::error!("litewalk failed: {err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

#[derive(Parser)]
#[command(
    name = "litewalk",
    version,
    about = "Walk the b-trees of a SQLite file and query movie credits"
)]
struct Cli {
    /// Database file (or set LITEWALK_DB; defaults to database.db).
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the 100-byte file header.
    Header,
    /// Dump one b-tree page.
    Page {
        /// Page number, starting at 1.
        #[arg(value_name = "N")]
        number: PageNumber,
    },
    /// List the schema objects and their root pages.
    Catalog,
    /// Print the people credited on a title.
    People(PeopleArgs),
    /// Print the titles rows with a given primary title.
    Title(TitleArgs),
}

#[derive(Args, Clone)]
struct PeopleArgs {
    /// Primary title to look up (exact, case-sensitive).
    title: String,
    /// Join strategy: nested-scan, crew-driven, index or covering-index.
    #[arg(long, short = 's', default_value_t = JoinStrategy::CoveringIndex)]
    strategy: JoinStrategy,
    /// Print a work report afterwards (or set LITEWALK_REPORT=1).
    #[arg(long)]
    report: bool,
}

#[derive(Args, Clone)]
struct TitleArgs {
    /// Primary title to look up (exact, case-sensitive).
    title: String,
    /// Scan the whole titles table instead of using the title index.
    #[arg(long)]
    scan: bool,
    /// Print a work report afterwards (or set LITEWALK_REPORT=1).
    #[arg(long)]
    report: bool,
}

fn database_path(cli_flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_flag {
        return path;
    }
    match env::var_os(DATABASE_ENV) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_DATABASE),
    }
}

fn report_requested(cli_flag: bool) -> bool {
    if cli_flag {
        return true;
    }
    match env::var(REPORT_ENV) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on"
        ),
        Err(env::VarError::NotPresent) => false,
        Err(env::VarError::NotUnicode(_)) => {
            tracing::warn!("{REPORT_ENV} is not valid UTF-8; ignoring it");
            false
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let path = database_path(cli.db);
    tracing::debug!(path = %path.display(), "opening database");
    let db = Database::open(&path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Header => writeln!(out, "{}", db.header())?,
        Command::Page { number } => {
            if number == 0 || number > db.page_count() {
                return Err(Error::InvalidArgumentError(format!(
                    "page {number} is out of range (1..={})",
                    db.page_count()
                )));
            }
            writeln!(out, "{}", db.load_page(number)?)?;
        }
        Command::Catalog => {
            for entry in db.catalog()?.entries() {
                writeln!(out, "{entry}")?;
            }
        }
        Command::People(args) => {
            let catalog = db.catalog()?;
            run_people(&db, &catalog, &args, &mut out)?;
            if report_requested(args.report) {
                writeln!(out, "{}", db.report())?;
            }
        }
        Command::Title(args) => {
            let catalog = db.catalog()?;
            if args.scan {
                scan_for_title(&db, &catalog, &args.title, &mut out)?;
            } else {
                stab_for_title(&db, &catalog, &args.title, &mut out)?;
            }
            if report_requested(args.report) {
                writeln!(out, "{}", db.report())?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn run_people(
    db: &Database<FilePager>,
    catalog: &Catalog,
    args: &PeopleArgs,
    out: &mut impl Write,
) -> Result<()> {
    tracing::debug!(strategy = %args.strategy, title = %args.title, "people query");
    match args.strategy {
        JoinStrategy::CoveringIndex => {
            // Shares stdout with the caller; flush what is buffered first.
            out.flush()?;
            find_people_covering_index(db, catalog, &args.title)
        }
        strategy => find_people(db, catalog, &args.title, strategy, out).map(|_| ()),
    }
}
