use crate::error::{CropOpsError, Result};
use crate::models::{AreaUnit, FarmProfile};
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub farm: FarmConfig,
    #[serde(default)]
    pub location: LocationConfig,
    pub openweathermap: Option<OpenWeatherMapConfig>,
    pub soil: Option<SoilServiceConfig>,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FarmConfig {
    pub pincode: String,
    pub area: f64,
    #[serde(default)]
    pub area_unit: AreaUnit,
    #[serde(default)]
    pub previous_crops: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationConfig {
    #[serde(default = "default_location_url")]
    pub base_url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_location_url() -> String {
    "https://api.postalpincode.in".into()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            base_url: default_location_url(),
            enabled: true,
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct SoilServiceConfig {
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl std::fmt::Debug for SoilServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoilServiceConfig")
            .field("url", &self.url)
            .field("token", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendationConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_enabled")]
    pub seasonal_adjustment: bool,
    /// Fraction of random score variation, 0 disables it
    #[serde(default)]
    pub jitter: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_top_n() -> usize {
    5
}

fn default_fetch_timeout() -> u64 {
    8
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            seasonal_adjustment: true,
            jitter: 0.0,
            seed: None,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

fn env_var_pattern() -> &'static regex_lite::Regex {
    static PATTERN: std::sync::OnceLock<regex_lite::Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap())
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(CropOpsError::Config(format!(
                "Config file not found at {:?}. Run `cropops init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| CropOpsError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content);

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| CropOpsError::Config(format!("Failed to parse config: {}", e)))?;

        if config.recommendation.fetch_timeout_secs == 0 {
            return Err(CropOpsError::Config(
                "recommendation.fetch_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = Self::default_config_path()?;
        Ok(default_path)
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/cropops/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CropOpsError::Config("Cannot determine config directory".into()))?
            .join("cropops");
        Ok(config_dir.join("config.yaml"))
    }

    /// Validated farm parameters from the `farm` section.
    pub fn farm_profile(&self) -> Result<FarmProfile> {
        FarmProfile::new(
            &self.farm.pincode,
            self.farm.area,
            self.farm.area_unit,
            self.farm.previous_crops.clone(),
        )
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let input_err = |e: dialoguer::Error| CropOpsError::Config(format!("Input error: {}", e));

        println!();
        println!("No configuration found. Let's set up CropOps!");
        println!();

        // --- Farm ---
        println!("Farm");
        let pincode: String = Input::new()
            .with_prompt("  Pincode")
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                crate::models::validate_pincode(input)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
            .map_err(input_err)?;

        let area: f64 = Input::new()
            .with_prompt("  Farm area")
            .default(1.0)
            .interact_text()
            .map_err(input_err)?;

        let unit: String = Input::new()
            .with_prompt("  Area unit (acre, hectare)")
            .default("acre".into())
            .interact_text()
            .map_err(input_err)?;
        let area_unit = AreaUnit::from_str(&unit).unwrap_or_default();

        let previous: String = Input::new()
            .with_prompt("  Crops grown recently (comma separated, up to 3)")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_err)?;
        let previous_crops: Vec<String> = previous
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        println!();

        // --- OpenWeatherMap (optional) ---
        println!("OpenWeatherMap (leave API key blank to skip)");
        let owm_api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(input_err)?;

        let openweathermap = if owm_api_key.is_empty() {
            None
        } else {
            Some(OpenWeatherMapConfig {
                api_key: owm_api_key,
                enabled: true,
            })
        };

        println!();

        // --- Soil report service (optional) ---
        println!("Soil report service (leave URL blank to skip)");
        let soil_url: String = Input::new()
            .with_prompt("  URL")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_err)?;

        let soil = if soil_url.is_empty() {
            None
        } else {
            let token: String = Password::new()
                .with_prompt("  Token")
                .allow_empty_password(true)
                .interact()
                .map_err(input_err)?;

            Some(SoilServiceConfig {
                url: soil_url,
                token,
                enabled: true,
            })
        };

        println!();

        let config = Config {
            farm: FarmConfig {
                pincode,
                area,
                area_unit,
                previous_crops,
            },
            location: LocationConfig::default(),
            openweathermap,
            soil,
            recommendation: RecommendationConfig::default(),
        };

        // Reject bad area or too many crops before writing anything
        config.farm_profile()?;

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| CropOpsError::Config(format!("Failed to serialize config: {}", e)))?;

        // Write with a header comment
        let content = format!(
            "# CropOps Configuration\n# Generated by `cropops init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        for cap in env_var_pattern().captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }
}

impl Default for Config {
    /// Offline defaults: no API keys, so every lookup falls back.
    fn default() -> Self {
        Self {
            farm: FarmConfig {
                pincode: "110001".into(),
                area: 1.0,
                area_unit: AreaUnit::Acre,
                previous_crops: Vec::new(),
            },
            location: LocationConfig::default(),
            openweathermap: None,
            soil: None,
            recommendation: RecommendationConfig::default(),
        }
    }
}
