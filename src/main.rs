//! Health Tracker CLI
//!
//! Command-line interface for the health tracker:
//! - Log entries
//! - Delete entries
//! - Show the log, weight and activity views
//! - Export data

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use health_tracker::config::{generate_default_config, Config};
use health_tracker::export::{export_entries, ExportFormat};
use health_tracker::logging::init_tracing;
use health_tracker::render;
use health_tracker::storage::FileStore;
use health_tracker::tracker::{Tracker, View};

#[derive(Parser)]
#[command(name = "health-tracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track your health, sport activities, and weight")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/health-tracker/config.toml, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a new entry. Numbers that do not parse are left out.
    Add {
        /// Date (yyyy-mm-dd, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Weight in kg, e.g. 70.5
        #[arg(long)]
        weight: Option<String>,
        /// Calories, e.g. 2000
        #[arg(long)]
        calories: Option<String>,
        /// Steps, e.g. 10000
        #[arg(long)]
        steps: Option<String>,
        /// Exercise, e.g. Running, Swimming, Gym
        #[arg(long)]
        exercise: Option<String>,
        /// Exercise duration in minutes
        #[arg(long)]
        duration: Option<String>,
        /// Any additional notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete an entry by id
    Delete {
        /// Entry id (shown in the log view)
        id: String,
    },

    /// Show a view: log, weight or activity
    View {
        #[arg(default_value = "log")]
        view: View,
    },

    /// Show statistics
    Stats,

    /// Export all entries
    Export {
        /// Export format (csv, json)
        #[arg(short = 't', long = "type", default_value = "csv")]
        export_type: ExportFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => Config::load_default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.to_string_lossy().to_string();
    }

    if cli.verbose || std::env::var_os("RUST_LOG").is_some() {
        init_tracing(&config.logging);
    }

    let json = match cli.format.as_str() {
        "json" => true,
        "table" => false,
        other => anyhow::bail!("Invalid output format: {}. Use: table, json", other),
    };

    match cli.command {
        Commands::Add {
            date,
            weight,
            calories,
            steps,
            exercise,
            duration,
            notes,
        } => {
            let mut tracker = open_tracker(&config);
            let draft = tracker.draft_mut();
            if let Some(date) = date {
                draft.date = date;
            }
            draft.weight = weight.unwrap_or_default();
            draft.calories = calories.unwrap_or_default();
            draft.steps = steps.unwrap_or_default();
            draft.exercise = exercise.unwrap_or_default();
            draft.duration = duration.unwrap_or_default();
            draft.notes = notes.unwrap_or_default();

            let entry = tracker.save_entry()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("Saved entry {} for {}", entry.id, entry.date_string());
            }
        }

        Commands::Delete { id } => {
            let mut tracker = open_tracker(&config);
            let removed = tracker.delete_entry(&id)?;

            if json {
                println!("{}", serde_json::json!({ "id": id, "removed": removed }));
            } else if removed {
                println!("Deleted entry {}", id);
            } else {
                println!("No entry with id {}", id);
            }
        }

        Commands::View { view } => {
            let mut tracker = open_tracker(&config);
            tracker.set_view(view);

            if json {
                let value = match view {
                    View::Log => serde_json::to_value(tracker.entries())?,
                    View::Weight => serde_json::to_value(tracker.weight_series())?,
                    View::Activity => serde_json::to_value(tracker.activity_series())?,
                };
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", render::render(&tracker));
            }
        }

        Commands::Stats => {
            let stats = open_tracker(&config).stats();

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render::render_stats(&stats));
            }
        }

        Commands::Export {
            export_type,
            output,
        } => {
            let tracker = open_tracker(&config);
            let data = export_entries(tracker.entries(), export_type)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &data)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Exported {} entries to {:?}", tracker.entries().len(), path);
                }
                None => {
                    print!("{}", data);
                }
            }
        }

        Commands::Config { output } => {
            write_default_config(output.as_ref())?;
        }
    }

    Ok(())
}

/// Load the entry store named by the config
fn open_tracker(config: &Config) -> Tracker {
    let data_dir = config.storage.data_path();
    tracing::debug!("Data directory: {:?}", data_dir);

    let backend = Arc::new(FileStore::new(data_dir));
    Tracker::open(backend, config.storage.key.clone())
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }

    Ok(())
}
