mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;
mod report;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, RecommendArgs};
use config::Config;
use logic::calculations::current_season;
use logic::{DataSyncService, RecommendationEngine, RecommendationRequest};
use models::{CropCatalog, EnvironmentalInput, FarmProfile};
use report::{JsonReport, RecommendationReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Init) => {
            let (config, path) = Config::setup_interactive()?;
            tracing::info!("Wrote config for pincode {} to {:?}", config.farm.pincode, path);
            Ok(())
        }
        Some(Commands::Check) => check(cli.config).await,
        Some(Commands::Crops { lang }) => {
            let catalog = load_catalog(cli.crops)?;
            print!("{}", report::render_catalog(catalog.crops(), lang));
            Ok(())
        }
        Some(Commands::Recommend(args)) => recommend(cli.config, cli.crops, args).await,
        None => recommend(cli.config, cli.crops, cli.recommend).await,
    }
}

/// An explicit `--config` must load; otherwise fall back to defaults so
/// one-off runs work without `cropops init`.
fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    if path.is_some() || Config::exists(None) {
        return Config::load(path).context("Failed to load configuration");
    }
    tracing::info!("No config file found, using defaults");
    Ok(Config::default())
}

fn load_catalog(path: Option<PathBuf>) -> anyhow::Result<CropCatalog> {
    let catalog = match path {
        Some(p) => CropCatalog::load(&p)
            .with_context(|| format!("Failed to load crop catalog {}", p.display()))?,
        None => CropCatalog::bundled().context("Bundled crop catalog is invalid")?,
    };
    if catalog.is_empty() {
        tracing::warn!("Crop catalog is empty, nothing to recommend");
    }
    tracing::debug!("Loaded {} crops", catalog.len());
    Ok(catalog)
}

fn farm_profile(config: &Config, args: &RecommendArgs) -> anyhow::Result<FarmProfile> {
    let previous = if args.previous.is_empty() {
        config.farm.previous_crops.clone()
    } else {
        args.previous.clone()
    };

    let farm = FarmProfile::new(
        args.pincode.as_deref().unwrap_or(&config.farm.pincode),
        args.area.unwrap_or(config.farm.area),
        args.unit.unwrap_or(config.farm.area_unit),
        previous,
    )?;
    Ok(farm)
}

async fn recommend(
    config_path: Option<PathBuf>,
    crops_path: Option<PathBuf>,
    args: RecommendArgs,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(crops_path)?;
    let farm = farm_profile(&config, &args)?;

    let form = EnvironmentalInput {
        nitrogen: args.nitrogen,
        phosphorus: args.phosphorus,
        potassium: args.potassium,
        temperature: args.temperature,
        humidity: args.humidity,
        ph: args.ph,
        rainfall: args.rainfall,
    };

    let service = if args.offline {
        DataSyncService::offline()
    } else {
        DataSyncService::new(&config)
    };
    let environment = service.assemble(&farm.pincode, form).await?;

    let season = args.season.unwrap_or_else(current_season);

    let mut engine = RecommendationEngine::from_config(&config.recommendation);
    if let Some(top) = args.top {
        engine = engine.with_top_n(top);
    }

    let request = RecommendationRequest {
        input: environment.input,
        season: Some(season),
        farm: &farm,
    };
    let results = engine.recommend(catalog.crops(), &request);

    if args.json {
        let report = JsonReport {
            farm: &farm,
            season,
            environment: &environment,
            recommendations: &results,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let report = RecommendationReport::new(&results, &environment, season)
            .with_language(args.lang)
            .with_explain(args.explain);
        print!("{}", report.render());
    }

    Ok(())
}

async fn check(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    println!("Config OK");

    match config.farm_profile() {
        Ok(farm) => println!(
            "Farm: {} {} at pincode {}",
            farm.area, farm.area_unit, farm.pincode
        ),
        Err(e) => println!("Farm: INVALID ({})", e),
    }

    let service = DataSyncService::new(&config);
    let status = service.check_connections().await;

    let describe = |s: Option<bool>| match s {
        Some(true) => "OK",
        Some(false) => "OFFLINE",
        None => "not configured",
    };
    println!("Pincode lookup: {}", describe(status.location));
    println!("OpenWeatherMap: {}", describe(status.openweathermap));
    println!("Soil service: {}", describe(status.soil));

    if status.failures() > 0 {
        anyhow::bail!("{} data source(s) unreachable", status.failures());
    }
    if !status.any_connected() {
        println!("No data sources reachable; recommendations will rely on form input");
    }
    Ok(())
}
