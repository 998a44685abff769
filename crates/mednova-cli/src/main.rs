mod cmd_config;
mod cmd_export;
mod cmd_init;
mod cmd_patient;
mod cmd_token;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mednova_core::{MednovaPaths, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mednova",
    version,
    about = "Patient records, Gemini report export and agent tokens"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new .mednova/ workspace with an empty patient table
    Init,
    /// Create or show patient records
    Patient {
        #[command(subcommand)]
        cmd: cmd_patient::PatientCmd,
    },
    /// Send one patient to the Gemini API and save the JSON reply
    Export {
        /// Patient ID
        id: String,
        /// Output file (default: patient_<id>_gemini.json)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Export the sample patient 1234
    Demo {
        /// Insert the sample patient first if it is missing
        #[arg(long)]
        seed: bool,
    },
    /// Mint a signed agent token for the media platform
    Token(cmd_token::TokenArgs),
    /// Manage .mednova/config.json
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
}

fn init_tracing() {
    // RUST_LOG=debug for verbose output. Logs go to stderr; stdout is for results.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let repo_root = std::env::current_dir()?;
    let paths = MednovaPaths::discover(&repo_root);

    match cli.cmd {
        Command::Init => cmd_init::execute(&paths),
        Command::Patient { cmd } => cmd_patient::run(cmd, &paths),
        Command::Export { id, output } => {
            let settings = Settings::load(&paths)?;
            cmd_export::execute(&paths, &settings, &id, output.as_deref())
        }
        Command::Demo { seed } => {
            let settings = Settings::load(&paths)?;
            cmd_export::demo(&paths, &settings, seed)
        }
        Command::Token(args) => {
            let settings = Settings::load(&paths)?;
            cmd_token::execute(&settings, &args)
        }
        Command::Config { cmd } => cmd_config::run(cmd, &paths),
    }
}
