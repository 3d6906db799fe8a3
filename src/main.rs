//! anon-feedback CLI - serve the feedback box or manage its table directly

use anon_feedback::config::{self, FeedbackConfig, ServerSettings, SettingsOverrides};
use anon_feedback::storage::FeedbackStore;
use anon_feedback::ui::{self, Icons};
use anon_feedback::{NewFeedback, SortOrder};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "anon-feedback")]
#[command(version)]
#[command(about = "Anonymous feedback box - collect, star and prune short text feedback")]
#[command(long_about = r#"
anon-feedback runs a tiny JSON API for anonymous feedback:
  GET    /api/feedback?sort=date|starred
  POST   /api/feedback            {"content": "..."}
  PUT    /api/feedback/{id}/star
  DELETE /api/feedback/{id}

Example usage:
  anon-feedback init
  anon-feedback serve --port 5000
  anon-feedback list --sort starred
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API and the feedback page
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Directory served under /static
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// List feedback entries
    List {
        /// Sort order: date or starred
        #[arg(short, long, default_value = "date")]
        sort: SortOrder,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Submit a feedback entry
    Add {
        /// Feedback text
        content: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Print the created entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle the star on a feedback entry
    Star {
        id: i64,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Print the updated entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a feedback entry
    Delete {
        id: i64,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Show database statistics
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);

    let file_config = match &cli.command {
        Commands::Init { .. } => None,
        _ => config::load_config(Some(&config_path))?,
    };
    if file_config.is_none() && cli.config.is_some() {
        ui::warn(&format!("Config file {} not found, using defaults", config_path.display()));
    }

    match cli.command {
        Commands::Init { force } => {
            config::write_config(&config_path, &FeedbackConfig::with_defaults(), force)?;
            ui::success(&format!("Wrote {}", config_path.display()));
        }

        Commands::Serve { host, port, database, static_dir } => {
            let settings = ServerSettings::resolve(
                SettingsOverrides { database, host, port, static_dir },
                file_config.as_ref(),
            );
            config::ensure_db_dir(&settings.database)?;

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(anon_feedback::server::start_server(&settings))?;
        }

        Commands::List { sort, database, json } => {
            let store = open_store(database, file_config.as_ref())?;
            let feedback = store.list_feedback(sort)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&feedback)?);
            } else if feedback.is_empty() {
                ui::info(&format!("{} Feedback", Icons::MAILBOX), "none yet");
            } else {
                println!("{}", ui::feedback_table(&feedback));
            }
        }

        Commands::Add { content, database, json } => {
            let new: NewFeedback = content.parse()?;
            let store = open_store(database, file_config.as_ref())?;
            let created = store.create_feedback(&new)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&created)?);
            } else {
                ui::success(&format!("Created feedback #{}", created.id));
            }
        }

        Commands::Star { id, database, json } => {
            let store = open_store(database, file_config.as_ref())?;
            let updated = store.toggle_star(id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&updated)?);
            } else if updated.starred {
                ui::success(&format!("{} Starred feedback #{}", Icons::STAR, id));
            } else {
                ui::success(&format!("{} Unstarred feedback #{}", Icons::EMPTY_STAR, id));
            }
        }

        Commands::Delete { id, database } => {
            let store = open_store(database, file_config.as_ref())?;
            store.delete_feedback(id)?;
            ui::success(&format!("{} Deleted feedback #{}", Icons::DEL, id));
        }

        Commands::Stats { database, json } => {
            let path = config::resolve_database(database, file_config.as_ref());
            let store = open_at(&path)?;
            let stats = store.stats()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                ui::section(&format!("{} Feedback Statistics", Icons::STATS));
                ui::info(&format!("{} Database", Icons::DATABASE), &path.display().to_string());
                println!("{}", ui::stats_table(&stats));
            }
        }
    }

    Ok(())
}

fn open_store(database: Option<PathBuf>, config: Option<&FeedbackConfig>) -> anyhow::Result<FeedbackStore> {
    open_at(&config::resolve_database(database, config))
}

/// Open the database for a one-shot command, creating the table if needed
fn open_at(path: &Path) -> anyhow::Result<FeedbackStore> {
    config::ensure_db_dir(path)?;
    let store = FeedbackStore::open(path)?;
    store.ensure_schema()?;
    tracing::debug!("Opened {}", path.display());
    Ok(store)
}
