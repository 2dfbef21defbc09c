use crate::models::{AreaUnit, Language, Season};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cropops",
    version,
    about = "Crop recommendations for Indian farms (English / हिन्दी)",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub recommend: RecommendArgs,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Use a crop catalog YAML file instead of the bundled one
    #[arg(long, global = true)]
    pub crops: Option<PathBuf>,

    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank crops for a farm (default)
    Recommend(RecommendArgs),
    /// List the crop catalog
    Crops {
        /// Output language
        #[arg(long, value_parser = parse_language, default_value = "en")]
        lang: Language,
    },
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RecommendArgs {
    /// Six-digit pincode, overrides the configured farm
    #[arg(long)]
    pub pincode: Option<String>,

    /// Farm area, overrides the configured farm
    #[arg(long)]
    pub area: Option<f64>,

    /// Unit for --area
    #[arg(long, value_parser = parse_area_unit)]
    pub unit: Option<AreaUnit>,

    /// Crop grown recently (repeat up to 3 times)
    #[arg(long = "previous", value_name = "CROP")]
    pub previous: Vec<String>,

    /// Soil nitrogen, kg/ha
    #[arg(long)]
    pub nitrogen: Option<f64>,

    /// Soil phosphorus, kg/ha
    #[arg(long)]
    pub phosphorus: Option<f64>,

    /// Soil potassium, kg/ha
    #[arg(long)]
    pub potassium: Option<f64>,

    /// Temperature, °C
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Relative humidity, %
    #[arg(long)]
    pub humidity: Option<f64>,

    /// Soil pH
    #[arg(long)]
    pub ph: Option<f64>,

    /// Monthly rainfall, mm
    #[arg(long)]
    pub rainfall: Option<f64>,

    /// Season to favour instead of the current one
    #[arg(long, value_parser = parse_season)]
    pub season: Option<Season>,

    /// Skip all network lookups
    #[arg(long)]
    pub offline: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Output language
    #[arg(long, value_parser = parse_language, default_value = "en")]
    pub lang: Language,

    /// Show per-parameter scores and data sources
    #[arg(long)]
    pub explain: bool,

    /// Number of crops to return
    #[arg(long)]
    pub top: Option<usize>,
}

fn parse_language(s: &str) -> Result<Language, String> {
    Language::from_str(s).ok_or_else(|| format!("unknown language '{}', expected en or hi", s))
}

fn parse_area_unit(s: &str) -> Result<AreaUnit, String> {
    AreaUnit::from_str(s).ok_or_else(|| format!("unknown unit '{}', expected acre or hectare", s))
}

fn parse_season(s: &str) -> Result<Season, String> {
    Season::from_str(s)
        .ok_or_else(|| format!("unknown season '{}', expected kharif, rabi or zaid", s))
}
