//! musclemap - pick muscles on a body model, get a workout

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use musclemap::api::DEFAULT_API_URL;
use musclemap::classify::classify;
use musclemap::config::{Settings, DEFAULT_TABLE};
use musclemap::plan::WorkoutPlan;
use musclemap::scaler::scale;
use musclemap::selector::MuscleVector;
use musclemap::session;
use musclemap::tui::App;

const TUI_LOG: &str = "musclemap.log";

#[derive(Parser)]
#[command(name = "musclemap")]
#[command(author, version, about = "Pick muscles, get a workout")]
struct Cli {
    /// Resolver service base URL
    #[arg(long, global = true, env = "WORKOUT_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Exercise reference table (CSV)
    #[arg(long, global = true, env = "WORKOUT_TABLE", default_value = DEFAULT_TABLE)]
    table: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive muscle picker
    Tui,

    /// Scale a muscle vector to per-muscle exercise counts
    Scale {
        /// Muscle intensities 0-5, e.g. "[0,5,0,0,0,0,0,0,0,0,0,3]"
        vector: String,

        /// Number of exercises
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        amount: u32,
    },

    /// Generate a workout for a muscle vector
    Generate {
        /// Muscle intensities 0-5, e.g. "[0,5,0,0,0,0,0,0,0,0,0,3]"
        vector: String,

        /// Number of exercises
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        amount: u32,
    },

    /// List the exercise reference table
    Exercises,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(matches!(cli.command, Some(Commands::Tui) | None));

    let settings = Settings::new(cli.api_url, cli.table);

    match cli.command {
        Some(Commands::Tui) | None => {
            let mut app = App::new(&settings);
            app.run()?;
        }

        Some(Commands::Scale { vector, amount }) => {
            let vector = MuscleVector::parse_lenient(&vector);
            let scaled = scale(&vector, amount);
            println!("{}", serde_json::to_string(&scaled)?);
        }

        Some(Commands::Generate { vector, amount }) => {
            generate(&settings, &vector, amount).await?;
        }

        Some(Commands::Exercises) => {
            let table = settings.load_table()?;
            println!("{:-<72}", "");
            for (i, name) in table.names().iter().enumerate() {
                let split = classify(table.row(i).unwrap_or_default(), table.headers());
                println!(
                    "{:24} | {:24} | {}",
                    name,
                    split.primary.join(", "),
                    split.secondary.join(", ")
                );
            }
        }
    }

    Ok(())
}

async fn generate(settings: &Settings, vector: &str, amount: u32) -> Result<()> {
    let table = settings.load_table()?;
    let client = settings.client();

    let vector = MuscleVector::parse_lenient(vector);
    if vector.is_empty() {
        bail!("no muscles selected");
    }
    let demand = scale(&vector, amount);
    info!("Requesting {} exercises for {:?}", amount, demand.values());

    let response = client
        .generate(&demand, amount)
        .await
        .with_context(|| format!("workout generation at {} failed", client.base_url()))?;

    let mut plan = WorkoutPlan::new();
    plan.apply_generated(response, &table);
    if let Some(err) = plan.error() {
        bail!("{}", err);
    }

    let token = CancellationToken::new();
    let session = session::arrange(&client, plan.matrix(), &token).await?;

    println!("Your workout:");
    println!("{:-<60}", "");
    for position in 0..session.len() {
        let Some(card) = session.card(&table, position) else {
            continue;
        };
        println!("{}. {}", position + 1, card.name);
        println!("   primary:   {}", or_none(&card.muscles.primary));
        println!("   secondary: {}", or_none(&card.muscles.secondary));
    }

    Ok(())
}

/// Log to stderr, or to a file while the TUI owns the terminal
fn init_logging(tui: bool) {
    if tui {
        let (writer, open_error) = tui_log_writer(Path::new(TUI_LOG));
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(Mutex::new(writer))
            .init();
        if let Some(e) = open_error {
            warn!("Logging disabled, cannot create {}: {}", TUI_LOG, e);
        }
    } else {
        tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    }
}

/// Log file for TUI mode; discards output when the file cannot be created
fn tui_log_writer(path: &Path) -> (Box<dyn Write + Send>, Option<io::Error>) {
    match File::create(path) {
        Ok(file) => (Box::new(file), None),
        Err(e) => (Box::new(io::sink()), Some(e)),
    }
}

fn or_none(muscles: &[String]) -> String {
    if muscles.is_empty() {
        "None".to_string()
    } else {
        muscles.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_log_writer_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TUI_LOG);
        let (mut writer, open_error) = tui_log_writer(&path);
        assert!(open_error.is_none());
        writer.write_all(b"started\n").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_tui_log_writer_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(TUI_LOG);
        let (mut writer, open_error) = tui_log_writer(&path);
        assert!(open_error.is_some());
        writer.write_all(b"dropped\n").unwrap();
        assert!(!path.exists());
    }
}
