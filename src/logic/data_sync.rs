use crate::config::Config;
use crate::datasources::{LocationClient, OpenWeatherMapClient, SoilDataClient};
use crate::error::{CropOpsError, Result};
use crate::models::{
    validate_pincode, DataSource, EnvironmentalInput, LocationInfo, SoilReport, WeatherReport,
};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// Where each environmental parameter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputSources {
    pub nitrogen: DataSource,
    pub phosphorus: DataSource,
    pub potassium: DataSource,
    pub temperature: DataSource,
    pub humidity: DataSource,
    pub ph: DataSource,
    pub rainfall: DataSource,
}

impl InputSources {
    fn resolve(
        form: &EnvironmentalInput,
        weather: &EnvironmentalInput,
        soil: &EnvironmentalInput,
    ) -> Self {
        let pick = |f: Option<f64>, w: Option<f64>, s: Option<f64>| {
            if f.is_some() {
                DataSource::Form
            } else if w.is_some() {
                DataSource::OpenWeatherMap
            } else if s.is_some() {
                DataSource::SoilService
            } else {
                DataSource::Default
            }
        };

        Self {
            nitrogen: pick(form.nitrogen, weather.nitrogen, soil.nitrogen),
            phosphorus: pick(form.phosphorus, weather.phosphorus, soil.phosphorus),
            potassium: pick(form.potassium, weather.potassium, soil.potassium),
            temperature: pick(form.temperature, weather.temperature, soil.temperature),
            humidity: pick(form.humidity, weather.humidity, soil.humidity),
            ph: pick(form.ph, weather.ph, soil.ph),
            rainfall: pick(form.rainfall, weather.rainfall, soil.rainfall),
        }
    }

    pub fn entries(&self) -> [(&'static str, DataSource); 7] {
        [
            ("nitrogen", self.nitrogen),
            ("phosphorus", self.phosphorus),
            ("potassium", self.potassium),
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("ph", self.ph),
            ("rainfall", self.rainfall),
        ]
    }
}

/// Environmental input for a farm after merging form values with lookups.
#[derive(Debug, Clone, Serialize)]
pub struct AssembledEnvironment {
    pub input: EnvironmentalInput,
    pub sources: InputSources,
    pub location: LocationInfo,
    pub weather: Option<WeatherReport>,
    pub soil: Option<SoilReport>,
}

/// Gathers location, weather and soil data for a pincode. Every lookup is
/// optional and bounded by the fetch timeout; failures leave values unknown.
pub struct DataSyncService {
    location_client: Option<LocationClient>,
    openweathermap_client: Option<OpenWeatherMapClient>,
    soil_client: Option<SoilDataClient>,
    fetch_timeout: Duration,
}

impl DataSyncService {
    pub fn new(config: &Config) -> Self {
        let location_client = Some(&config.location)
            .filter(|c| c.enabled && !c.base_url.is_empty())
            .map(|c| LocationClient::new(c.clone()));

        if location_client.is_none() {
            tracing::info!("Pincode lookup disabled - region will be Unknown");
        }

        // Create OpenWeatherMap client if configured and enabled
        let openweathermap_client = config
            .openweathermap
            .as_ref()
            .filter(|c| c.enabled && !c.api_key.is_empty())
            .map(|c| {
                tracing::info!("OpenWeatherMap client configured for weather data");
                OpenWeatherMapClient::new(c.clone())
            });

        if openweathermap_client.is_none() {
            tracing::info!("OpenWeatherMap not configured - temperature and rainfall need form input");
        }

        let soil_client = config
            .soil
            .as_ref()
            .filter(|c| c.enabled && !c.url.is_empty())
            .map(|c| SoilDataClient::new(c.clone()));

        if soil_client.is_none() {
            tracing::info!("Soil service not configured - nutrients and pH need form input");
        }

        Self {
            location_client,
            openweathermap_client,
            soil_client,
            fetch_timeout: Duration::from_secs(config.recommendation.fetch_timeout_secs),
        }
    }

    /// A service that never leaves the machine.
    pub fn offline() -> Self {
        Self {
            location_client: None,
            openweathermap_client: None,
            soil_client: None,
            fetch_timeout: Duration::ZERO,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Validate `pincode`, fetch what the configured services can offer and
    /// fill gaps in `form` with it. Form values always win.
    pub async fn assemble(
        &self,
        pincode: &str,
        form: EnvironmentalInput,
    ) -> Result<AssembledEnvironment> {
        let pincode = validate_pincode(pincode)?;

        let weather_lookup = async {
            match &self.openweathermap_client {
                Some(client) => {
                    self.bounded("OpenWeatherMap", client.fetch_weather(&pincode))
                        .await
                }
                None => None,
            }
        };

        // Soil lookups are keyed by region, so they wait on the pincode lookup
        let place_lookup = async {
            let location = match &self.location_client {
                Some(client) => {
                    self.bounded("Pincode lookup", client.fetch_location(&pincode))
                        .await
                }
                None => None,
            }
            .unwrap_or_else(|| LocationInfo::unknown(&pincode));

            let soil = match &self.soil_client {
                Some(client) => {
                    self.bounded(
                        "Soil service",
                        client.fetch_report(&pincode, &location.region),
                    )
                    .await
                }
                None => None,
            };

            (location, soil)
        };

        let (weather, (location, soil)) = tokio::join!(weather_lookup, place_lookup);

        let weather_input = weather.as_ref().map(|w| w.as_input()).unwrap_or_default();
        let soil_input = soil.as_ref().map(|s| s.as_input()).unwrap_or_default();

        let input = form.or(weather_input).or(soil_input);
        let sources = InputSources::resolve(&form, &weather_input, &soil_input);

        tracing::info!(
            "Assembled {} of 7 parameters for {} ({})",
            input.known_count(),
            pincode,
            location.region
        );

        Ok(AssembledEnvironment {
            input,
            sources,
            location,
            weather,
            soil,
        })
    }

    async fn bounded<T>(
        &self,
        source: &'static str,
        lookup: impl Future<Output = Result<T>>,
    ) -> Option<T> {
        match with_timeout(source, self.fetch_timeout, lookup).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("{} lookup failed, continuing without it: {}", source, e);
                None
            }
        }
    }

    pub async fn check_connections(&self) -> ConnectionStatus {
        let mut status = ConnectionStatus::default();

        if let Some(ref client) = self.location_client {
            status.location = Some(
                with_timeout("Pincode lookup", self.fetch_timeout, client.test_connection())
                    .await
                    .unwrap_or(false),
            );
        }

        if let Some(ref client) = self.openweathermap_client {
            status.openweathermap = Some(
                with_timeout("OpenWeatherMap", self.fetch_timeout, client.test_connection())
                    .await
                    .unwrap_or(false),
            );
        }

        if let Some(ref client) = self.soil_client {
            status.soil = Some(
                with_timeout("Soil service", self.fetch_timeout, client.test_connection())
                    .await
                    .unwrap_or(false),
            );
        }

        status
    }
}

/// Run `lookup`, giving up with [`CropOpsError::Timeout`] after `limit`.
pub async fn with_timeout<T>(
    source: &'static str,
    limit: Duration,
    lookup: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, lookup).await {
        Ok(result) => result,
        Err(_) => Err(CropOpsError::Timeout(source, limit)),
    }
}

/// Connection check results; `None` means the service is not configured.
#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus {
    pub location: Option<bool>,
    pub openweathermap: Option<bool>,
    pub soil: Option<bool>,
}

impl ConnectionStatus {
    pub fn any_connected(&self) -> bool {
        [self.location, self.openweathermap, self.soil]
            .iter()
            .any(|s| *s == Some(true))
    }

    pub fn failures(&self) -> usize {
        [self.location, self.openweathermap, self.soil]
            .iter()
            .filter(|s| **s == Some(false))
            .count()
    }
}
