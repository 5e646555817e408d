//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use examdeck_exam::{build_bank, draw};
use examdeck_server::ServeOptions;
use examdeck_shared::{config_file_path, init_config, load_config};
use examdeck_storage::Storage;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// examdeck — turn exam documents into randomized interactive exams.
#[derive(Parser)]
#[command(
    name = "examdeck",
    version,
    about = "Parse fixed-convention exam documents and serve randomized exams.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Parse a document and report the recovered question bank.
    Parse {
        /// Path to the extracted exam document (plain text).
        file: PathBuf,

        /// Emit the full question bank as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Draw a randomized exam from a document and print it as JSON.
    Exam {
        /// Path to the extracted exam document.
        file: PathBuf,

        /// Number of questions to draw.
        #[arg(short, long, default_value_t = examdeck_exam::DEFAULT_QUESTION_CAP)]
        count: usize,

        /// Seed for a reproducible draw.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Start the exam API server.
    Serve {
        /// Path to the extracted exam document (defaults to config).
        #[arg(short, long)]
        document: Option<PathBuf>,

        /// Bind host (defaults to config).
        #[arg(long)]
        host: Option<String>,

        /// Bind port (defaults to config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Leaderboard database path (defaults to config).
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Show the leaderboard.
    Leaderboard {
        /// Leaderboard database path (defaults to config).
        #[arg(long)]
        db: Option<PathBuf>,

        /// Number of rows to show.
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "examdeck=info",
        1 => "examdeck=debug",
        _ => "examdeck=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Parse { file, json } => cmd_parse(&file, json),
        Command::Exam { file, count, seed } => cmd_exam(&file, count, seed),
        Command::Serve {
            document,
            host,
            port,
            db,
        } => cmd_serve(document, host, port, db).await,
        Command::Leaderboard { db, limit } => cmd_leaderboard(db, limit).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_parse(file: &PathBuf, json: bool) -> Result<()> {
    let bank = build_bank(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bank.questions)?);
        return Ok(());
    }

    println!();
    println!("  Parsed {}", file.display());
    println!("  Questions: {}", bank.questions.len());
    println!("  Source:    sha256:{}", bank.source_hash);
    println!();

    for q in &bank.questions {
        let flagged = q.options.iter().filter(|o| o.is_correct).count();
        println!("  #{:<4} {} ({} options, {flagged} flagged)", q.id, q.text, q.options.len());
    }

    if !bank.dropped.is_empty() {
        println!();
        println!("  Dropped content ({} records):", bank.dropped.len());
        for rec in &bank.dropped {
            println!("    {:?}: {}", rec.reason, rec.text);
        }
    }
    println!();

    Ok(())
}

fn cmd_exam(file: &PathBuf, count: usize, seed: Option<u64>) -> Result<()> {
    let bank = build_bank(file)?;

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let exam = draw(&bank.questions, count, &mut rng);
    info!(drawn = exam.len(), available = bank.questions.len(), "exam drawn");

    println!("{}", serde_json::to_string_pretty(&exam)?);
    Ok(())
}

async fn cmd_serve(
    document: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    db: Option<PathBuf>,
) -> Result<()> {
    let config = load_config()?;

    let opts = ServeOptions {
        document: document.unwrap_or_else(|| PathBuf::from(&config.defaults.document)),
        db_path: match db {
            Some(p) => p,
            None => config.storage.resolved_db_path()?,
        },
        host: host.unwrap_or_else(|| config.server.host.clone()),
        port: port.unwrap_or(config.server.port),
        question_cap: config.defaults.question_cap,
    };

    examdeck_server::serve(opts).await?;
    Ok(())
}

async fn cmd_leaderboard(db: Option<PathBuf>, limit: u32) -> Result<()> {
    let config = load_config()?;
    let db_path = match db {
        Some(p) => p,
        None => config.storage.resolved_db_path()?,
    };

    let storage = Storage::open(&db_path).await?;
    let rows = storage.leaderboard(limit).await?;

    if rows.is_empty() {
        println!("No scores recorded yet.");
        return Ok(());
    }

    println!();
    println!("  {:<4} {:<24} {:>8} {:>10}", "#", "player", "score", "percent");
    for (i, row) in rows.iter().enumerate() {
        println!(
            "  {:<4} {:<24} {:>5}/{:<3} {:>9.1}%",
            i + 1,
            row.player,
            row.best_correct,
            row.best_total,
            row.best_percent
        );
    }
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created config file at {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let path = config_file_path()?;
    println!("# resolved config ({})", path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
