//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for consultation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Transcript followed by the panel summary
    Full,
    /// Transcript only
    Transcript,
    /// JSON output
    Json,
}

impl From<OutputFormat> for consult_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Transcript => Self::Transcript,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for panel-consult
#[derive(Parser, Debug)]
#[command(name = "panel-consult")]
#[command(author, version, about = "Panel consultation - a team of doctors discusses your problem")]
#[command(long_about = r#"
panel-consult drives a multi-doctor consultation on a remote backend.

The backend advances the consultation one step at a time. Each step is a
doctor speaking, a phase transition (discussion, voting, summary) or the
end of the consultation. This client keeps asking for the next step and
prints the transcript as it grows.

Configuration files are loaded from (in priority order):
1. CONSULT_* environment variables (e.g. CONSULT_SERVER__BASE_URL)
2. --config <path>     Explicit config file
3. ./consult.toml      Project-level config
4. ~/.config/panel-consult/config.toml   Global config

Example:
  panel-consult start "Persistent headache for three days, worse in the morning"
  panel-consult run 3f2a9c4e-...
  panel-consult triage "Chest pain radiating to the left arm"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output] format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this directory (overrides [logging] dir)
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a new consultation and run it to completion
    Start {
        /// Description of the problem
        problem: String,

        /// Patient profile to attach
        #[arg(long, value_name = "UUID")]
        profile: Option<String>,

        /// Only create the consultation; do not advance it
        #[arg(long)]
        no_run: bool,
    },

    /// Resume an existing consultation until it completes
    Run {
        /// Consultation id
        id: String,
    },

    /// Print a consultation's transcript without advancing it
    Show {
        /// Consultation id
        id: String,
    },

    /// List your consultations
    History,

    /// Quick severity assessment without opening a consultation
    Triage {
        /// Description of the problem
        problem: String,
    },

    /// Print the emergency guide for a consultation
    Emergency {
        /// Consultation id
        id: String,
    },
}
