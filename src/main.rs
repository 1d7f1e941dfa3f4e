//! Quizstore CLI - create the quiz schema and seed it with sample data

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "quizstore")]
#[command(version)]
#[command(about = "Create the quiz schema (students, topics, quizzes, results) and seed sample data")]
#[command(long_about = r#"
Quizstore materializes a small quiz database in SQLite and fills it with
illustrative chemistry data.

Example usage:
  quizstore                      # same as `quizstore seed`
  quizstore --database quiz.db init
  quizstore stats --json
"#)]
struct Cli {
    /// Path to the database file (overrides the config file; default example.db)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log every SQL statement
    #[arg(long, global = true)]
    echo: bool,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and insert the sample dataset in one transaction
    Seed,

    /// Create the schema only
    Init,

    /// Show row counts per table
    Stats,

    /// Print every stored record
    Show,

    /// Write a config file pointing at the resolved database
    Config {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        *self == OutputMode::Human
    }
}

pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let mut filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    if cli.echo {
        filter = filter.add_directive("quizstore::sql=debug".parse()?);
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let config_path = cli.config.clone().unwrap_or_else(quizstore::config::default_config_path);
    let command = cli.command.unwrap_or(Commands::Seed);
    // `config --force` replaces the file, so a broken one must not block it
    let config = match command {
        Commands::Config { force: true } => quizstore::config::load_config_lenient(Some(&config_path)),
        _ => quizstore::config::load_config(Some(&config_path))?,
    };
    let database = quizstore::config::resolve_database(cli.database.as_deref(), config.as_ref());
    tracing::debug!("Using database {}", database.display());

    let outcome = match command {
        Commands::Seed => commands::run_seed(&database, cli.echo, output_mode),
        Commands::Init => commands::run_init(&database, cli.echo, output_mode),
        Commands::Stats => commands::run_stats(&database, cli.echo, output_mode),
        Commands::Show => commands::run_show(&database, cli.echo, output_mode),
        Commands::Config { force } => commands::run_config(&config_path, &database, force, output_mode),
    };

    if let Err(e) = &outcome {
        if output_mode.is_human() {
            quizstore::ui::error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
    outcome
}
