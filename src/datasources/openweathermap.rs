use crate::config::OpenWeatherMapConfig;
use crate::error::{CropOpsError, Result};
use crate::models::{DailyRainfall, WeatherReport};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Pincode used by `test_connection` (New Delhi GPO).
const PROBE_PINCODE: &str = "110001";

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    #[serde(default)]
    name: String,
    main: OwmMain,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "3h", default)]
    three_hour: f64,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Current conditions plus the 5-day forecast rainfall for an Indian pincode.
    pub async fn fetch_weather(&self, pincode: &str) -> Result<WeatherReport> {
        let (current, forecast) = tokio::join!(
            self.get_json::<OwmCurrentResponse>("weather", pincode),
            self.get_json::<OwmForecastResponse>("forecast", pincode)
        );

        let current = current?;
        let forecast = match forecast {
            Ok(f) => Some(f),
            Err(e) => {
                tracing::warn!("Forecast unavailable, continuing without rainfall: {}", e);
                None
            }
        };

        Ok(convert_response(current, forecast))
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self) -> Result<bool> {
        let url = self.url("weather", PROBE_PINCODE);

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                CropOpsError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        Ok(response.status().is_success())
    }

    fn url(&self, endpoint: &str, pincode: &str) -> String {
        format!(
            "{}/{}?zip={},IN&appid={}&units=metric",
            API_BASE_URL, endpoint, pincode, self.config.api_key
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, pincode: &str) -> Result<T> {
        let url = self.url(endpoint, pincode);

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                CropOpsError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CropOpsError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            CropOpsError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap {} response: {}",
                endpoint, e
            ))
        })
    }
}

fn convert_response(
    current: OwmCurrentResponse,
    forecast: Option<OwmForecastResponse>,
) -> WeatherReport {
    let daily_rainfall = forecast
        .map(|f| aggregate_daily(&f.list))
        .unwrap_or_default();

    WeatherReport {
        fetched_at: Utc::now(),
        location_name: current.name,
        temperature_c: current.main.temp,
        humidity_percent: current.main.humidity,
        daily_rainfall,
    }
}

/// Sum 3-hour rain totals per calendar day (UTC), oldest first.
fn aggregate_daily(items: &[OwmForecastItem]) -> Vec<DailyRainfall> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for item in items {
        let Some(timestamp) = DateTime::from_timestamp(item.dt, 0) else {
            continue;
        };
        let rain_mm = item.rain.as_ref().map(|r| r.three_hour).unwrap_or(0.0);
        *by_date.entry(timestamp.date_naive()).or_insert(0.0) += rain_mm;
    }

    by_date
        .into_iter()
        .map(|(date, rainfall_mm)| DailyRainfall { date, rainfall_mm })
        .collect()
}
