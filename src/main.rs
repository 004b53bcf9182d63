//! liftweek - 21-week strength program tracker

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use liftweek::program::{apply_week, RepLedger, Week};
use liftweek::server::{self, AppState};
use liftweek::store::{self, DocumentStore, FileStore, MemoryStore};
use liftweek::tui::App;
use liftweek::WorkoutSession;

#[derive(Parser)]
#[command(name = "liftweek")]
#[command(author, version, about = "21-week strength program tracker")]
struct Cli {
    /// Workout data file
    #[arg(long, global = true, env = "WORKOUT_DATA", default_value = store::DATA_PATH)]
    data: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Serve the workout document over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "5000")]
        port: u16,

        /// Keep the document in memory, starting from the bundled program
        #[arg(long)]
        memory: bool,
    },

    /// Print working weights for a week
    Plan {
        /// Week number (defaults to the stored current week)
        #[arg(short, long)]
        week: Option<u32>,
    },

    /// Write the bundled program to the data file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, memory }) => {
            let state = if memory {
                info!("Using in-memory workout data");
                AppState::memory(Arc::new(MemoryStore::seeded()?))
            } else {
                let store = FileStore::new(&cli.data);
                store.ensure_seeded()?;
                info!("Using workout data at {}", cli.data.display());
                AppState::file(store)
            };
            server::serve(state, port).await?;
        }

        Some(Commands::Plan { week }) => {
            let store = FileStore::new(&cli.data);
            let mut document = store.load()?;
            let week = match week {
                Some(w) => Week::new(w)?,
                None => Week::clamped(document.current_week),
            };
            apply_week(&mut document, week, &RepLedger::new())?;

            println!("Week {}", week);
            println!("{:-<60}", "");
            for day in &document.workout_days {
                println!("{}", day.name);
                for e in &day.exercises {
                    println!(
                        "  {:20} | {:>7} kg | {} reps, last set {} | goal {}",
                        e.name, e.current_weight, e.normal_set_reps, e.last_set_reps, e.set_goal
                    );
                }
            }
        }

        Some(Commands::Init { force }) => {
            let store = FileStore::new(&cli.data);
            if force {
                store.save_value(&store::seed_value()?)?;
                println!("Reset: {}", cli.data.display());
            } else if store.ensure_seeded()? {
                println!("Created: {}", cli.data.display());
            } else {
                bail!("{} already exists (use --force to overwrite)", cli.data.display());
            }
        }

        Some(Commands::Tui) | None => {
            // Default: show TUI
            let store = FileStore::new(&cli.data);
            store.ensure_seeded()?;
            let session = WorkoutSession::open(Arc::new(store))?;
            let mut app = App::new(session);
            app.run()?;
        }
    }

    Ok(())
}
