mod classifier;
mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod models;

use clap::Parser;
use classifier::encoder::{CROP_COLUMN, GROWTH_STAGE_COLUMN, SOIL_COLUMN};
use classifier::{Classifier, ContextResolver};
use cli::{Cli, ClassifyArgs, Commands, RecordArgs, SeedArgs};
use config::Config;
use datasources::ReadingsApiClient;
use db::Database;
use error::{CropSenseError, Result};
use models::{Crop, GrowthStage, Reading, SoilType};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let result = match &cli.command {
        Some(Commands::Init) => cmd_init(),
        Some(Commands::Check) => cmd_check(&cli).await,
        Some(Commands::Logs { limit }) => cmd_logs(&cli, *limit),
        Some(Commands::Classify(args)) => cmd_classify(&cli, args).await,
        Some(Commands::Seed(args)) => cmd_seed(&cli, args),
        Some(Commands::Record(args)) => cmd_record(&cli, args),
        // No subcommand: classify the latest reading
        None => cmd_classify(&cli, &ClassifyArgs::default()).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_init() -> Result<()> {
    let (_, path) = Config::setup_interactive()?;
    println!("Run `cropsense check` to validate {}", path.display());
    Ok(())
}

async fn cmd_classify(cli: &Cli, args: &ClassifyArgs) -> Result<()> {
    let config = Config::load(cli.config.clone())?;
    let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
    let classifier = Classifier::load(&config.model.dir)?;

    let reading = fetch_reading(&config, &db, args).await?.ok_or_else(|| {
        CropSenseError::NotFound(match args.id {
            Some(id) => format!("reading {}", id),
            None => "no readings recorded yet".into(),
        })
    })?;

    let context = ContextResolver::new(&db).resolve(&reading)?;
    let outcome = classifier.classify(&context, &reading)?;

    tracing::debug!(probabilities = ?outcome.probabilities, "class distribution");

    let id_display = reading
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".into());
    println!(
        "Reading {}: {} / {} / {}",
        id_display, context.crop_name, context.soil, context.growth_stage_name
    );
    println!(
        "  moi {:.1}  temp {:.1}  humidity {:.1}",
        reading.moi, reading.temp, reading.humidity
    );
    println!("Predicted class: {}", outcome.class_index);

    if args.store {
        let id = reading.id.ok_or_else(|| {
            CropSenseError::InvalidData("reading has no id to store a result against".into())
        })?;

        match reading.result {
            Some(previous) if !args.force => {
                println!(
                    "Reading {} already has result {}; pass --force to overwrite.",
                    id, previous
                );
            }
            _ => {
                db.store_result(id, outcome.class_index)?;
                db.append_log(&format!(
                    "classified reading {} as class {}",
                    id, outcome.class_index
                ))?;
                println!("Stored result for reading {}.", id);
            }
        }
    }

    Ok(())
}

async fn fetch_reading(
    config: &Config,
    db: &Database,
    args: &ClassifyArgs,
) -> Result<Option<Reading>> {
    if args.remote {
        let ingest = config.ingest.as_ref().ok_or_else(|| {
            CropSenseError::Config("no ingest API configured; remove --remote or add one".into())
        })?;
        let client = ReadingsApiClient::new(ingest.clone());
        match args.id {
            Some(id) => client.fetch_reading(id).await,
            None => client.fetch_latest().await,
        }
    } else {
        match args.id {
            Some(id) => db.get_reading(id),
            None => db.get_latest_reading(),
        }
    }
}

async fn cmd_check(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.clone())?;
    println!("Config: OK");

    let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
    println!("Database: OK ({})", db.path().display());

    let classifier = Classifier::load(&config.model.dir)?;
    println!(
        "Artifacts: OK ({} features, {} classes)",
        classifier.encoder().width(),
        classifier.n_classes()
    );

    // Names the model never saw still classify, but their indicator
    // columns stay all-zero; worth flagging before trusting predictions.
    let encoder = classifier.encoder();
    report_unseen(
        "crop",
        db.list_crops()?.into_iter().map(|c| c.name),
        &encoder.known_categories(CROP_COLUMN),
    );
    report_unseen(
        "soil type",
        db.list_soil_types()?.into_iter().map(|s| s.name),
        &encoder.known_categories(SOIL_COLUMN),
    );
    report_unseen(
        "growth stage",
        db.list_growth_stages()?.into_iter().map(|g| g.name),
        &encoder.known_categories(GROWTH_STAGE_COLUMN),
    );

    if let Some(ingest) = &config.ingest {
        let client = ReadingsApiClient::new(ingest.clone());
        match client.test_connection().await {
            Ok(true) => println!("Ingest API: OK"),
            Ok(false) => println!("Ingest API: FAILED"),
            Err(e) => println!("Ingest API: OFFLINE ({})", e),
        }
    }

    Ok(())
}

fn report_unseen(entity: &str, live: impl Iterator<Item = String>, known: &[&str]) {
    let unseen: Vec<String> = live.filter(|name| !known.contains(&name.as_str())).collect();
    if !unseen.is_empty() {
        println!(
            "  warning: {} names unseen at training time: {}",
            entity,
            unseen.join(", ")
        );
    }
}

fn cmd_seed(cli: &Cli, args: &SeedArgs) -> Result<()> {
    let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;

    for name in &args.crops {
        let id = db.create_crop(&Crop::new(name.as_str()))?;
        println!("crop {}: {}", id, name);
    }
    for name in &args.soil_types {
        let id = db.create_soil_type(&SoilType::new(name.as_str()))?;
        println!("soil type {}: {}", id, name);
    }
    for name in &args.growth_stages {
        let id = db.create_growth_stage(&GrowthStage::new(name.as_str()))?;
        println!("growth stage {}: {}", id, name);
    }

    Ok(())
}

fn cmd_record(cli: &Cli, args: &RecordArgs) -> Result<()> {
    let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;

    let reading = Reading::new(
        args.crop_id,
        args.soil.as_str(),
        args.growth_stage_id,
        args.moi,
        args.temp,
        args.humidity,
    );
    let id = db.insert_reading(&reading)?;
    println!("Recorded reading {}.", id);

    Ok(())
}

fn cmd_logs(cli: &Cli, limit: usize) -> Result<()> {
    let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
    let logs = db.recent_logs(limit)?;

    if logs.is_empty() {
        println!("No log entries.");
        return Ok(());
    }

    for entry in logs {
        println!(
            "{}  {}  {}",
            entry.id.unwrap_or_default(),
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.message
        );
    }

    Ok(())
}
