//! Skema Control - CLI for the Skema schema designer.
//!
//! Turns a prose requirements text into a generated NoSQL schema, and
//! measures how stable that generation is across sampling temperatures.

mod commands;
mod display;
mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "skemactl")]
#[command(about = "Skema - NoSQL schema designer backed by a generative model", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a schema from a requirements file ("-" reads stdin)
    Generate {
        /// Requirements file path, or "-" for stdin
        input: String,

        /// Sampling temperature for the generation call
        #[arg(long, default_value_t = skema_common::gemini::SINGLE_SHOT_TEMPERATURE)]
        temperature: f32,

        /// Explain one element: a collection name, or collection.field
        #[arg(long)]
        explain: Option<String>,

        /// Emit machine-readable JSON instead of styled output
        #[arg(long)]
        json: bool,
    },

    /// Repeat generation across sampling temperatures and gauge stability
    Stability {
        /// Requirements file path, or "-" for stdin
        input: String,

        /// Emit machine-readable JSON instead of styled output
        #[arg(long)]
        json: bool,
    },

    /// Check configuration, credentials, and API reachability
    Doctor,

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so styled and --json output stay clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            temperature,
            explain,
            json,
        } => commands::generate(&input, temperature, explain.as_deref(), json).await,
        Commands::Stability { input, json } => commands::stability(&input, json).await,
        Commands::Doctor => commands::doctor().await,
        Commands::Config => commands::config_show(),
    }
}
