use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sandmann_fetcher::{Config, DestinationKind, Pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Sandmann Fetcher")
        .version("0.1.0")
        .author("pspace")
        .about("Downloads today's Sandmann episode in the best available quality")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (defaults to the standard search locations)")
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Write the episode into this directory")
                .conflicts_with("bucket")
        )
        .arg(
            Arg::new("bucket")
                .short('b')
                .long("bucket")
                .value_name("NAME")
                .help("Upload the episode into this bucket")
        )
        .arg(
            Arg::new("date")
                .long("date")
                .value_name("YYYY-MM-DD")
                .help("Date used in the output name (defaults to today)")
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Resolve the episode and stream without transferring anything")
                .action(clap::ArgAction::SetTrue)
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
        )
        .get_matches();

    // Load configuration
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load_from(&PathBuf::from(path))?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    if let Some(dir) = matches.get_one::<String>("output-dir") {
        config.destination.kind = DestinationKind::Local;
        config.destination.local_dir = PathBuf::from(dir);
    }
    if let Some(bucket) = matches.get_one::<String>("bucket") {
        config.destination.kind = DestinationKind::Bucket;
        config.destination.bucket = bucket.clone();
    }

    // Initialize logging
    let level = if matches.get_flag("verbose") {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sandmann_fetcher={},warn", level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.validate()?;
    info!("🚀 Sandmann Fetcher starting...");
    for line in config.summary().lines() {
        info!("{}", line);
    }

    let date = match matches.get_one::<String>("date") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid --date '{}', expected YYYY-MM-DD", raw))?,
        None => chrono::Local::now().date_naive(),
    };

    let pipeline = Pipeline::new(config).context("Failed to set up pipeline")?;

    if matches.get_flag("dry-run") {
        let plan = pipeline
            .resolve(date)
            .await
            .context("Failed to resolve today's episode")?;
        warn!("Dry run, nothing transferred");
        println!("Episode:    {}", plan.episode);
        println!("Stream:     {}", plan.stream_url);
        println!("Output:     {}", plan.filename);
        return Ok(());
    }

    let destination = pipeline
        .destination()
        .context("Failed to open destination")?;

    let start_time = std::time::Instant::now();
    let report = pipeline
        .run(date, destination.as_ref())
        .await
        .context("Failed to fetch today's episode")?;
    let duration = start_time.elapsed();

    info!("🎉 Finished in {:.2}s", duration.as_secs_f64());
    info!("📦 {} bytes written to {}", report.bytes, report.location);

    Ok(())
}
