use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cropsense",
    version,
    about = "Classify crop sensor readings with a pre-trained irrigation model"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config, artifacts, database and data sources
    Check,
    /// Classify a stored reading (defaults to the latest)
    Classify(ClassifyArgs),
    /// Provision reference data (crops, soil types, growth stages)
    Seed(SeedArgs),
    /// Record a sensor reading in the local store
    Record(RecordArgs),
    /// Show recent diagnostic log entries
    Logs {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Args)]
pub struct SeedArgs {
    /// Crop name to add (repeatable)
    #[arg(long = "crop")]
    pub crops: Vec<String>,

    /// Soil type name to add (repeatable)
    #[arg(long = "soil-type")]
    pub soil_types: Vec<String>,

    /// Growth stage name to add (repeatable)
    #[arg(long = "growth-stage")]
    pub growth_stages: Vec<String>,
}

#[derive(Args)]
pub struct RecordArgs {
    #[arg(long)]
    pub crop_id: i64,

    /// Soil label stored verbatim on the reading
    #[arg(long)]
    pub soil: String,

    #[arg(long)]
    pub growth_stage_id: i64,

    /// Soil moisture, percent
    #[arg(long)]
    pub moi: f64,

    /// Ambient temperature, degrees Celsius
    #[arg(long)]
    pub temp: f64,

    /// Relative humidity, percent
    #[arg(long)]
    pub humidity: f64,
}

#[derive(Args, Default)]
pub struct ClassifyArgs {
    /// Reading id (defaults to the latest reading)
    #[arg(long)]
    pub id: Option<i64>,

    /// Fetch the reading from the ingest API instead of the local store
    #[arg(long)]
    pub remote: bool,

    /// Persist the class index back onto the reading
    #[arg(long)]
    pub store: bool,

    /// Overwrite a previously stored result
    #[arg(long)]
    pub force: bool,
}
