pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub use settings::QuizSettings;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "timed-quiz")]
#[command(about = "A timed quiz over question,answer pairs read from a CSV file")]
pub struct CliConfig {
    /// A csv file in the format of 'question,answer' [default: problems.csv]
    #[arg(long)]
    pub csv: Option<String>,

    /// The time limit for the whole quiz in seconds [default: 2]
    #[arg(long)]
    pub limit: Option<u64>,

    /// Optional TOML configuration file; explicit flags take precedence
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
