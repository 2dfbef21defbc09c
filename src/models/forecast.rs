use super::EnvironmentalInput;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Days per month used to scale forecast rainfall into a monthly figure.
const DAYS_PER_MONTH: f64 = 30.0;

/// Current conditions plus a daily rainfall outlook for a pincode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub fetched_at: DateTime<Utc>,
    pub location_name: String,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub daily_rainfall: Vec<DailyRainfall>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRainfall {
    pub date: NaiveDate,
    pub rainfall_mm: f64,
}

impl WeatherReport {
    pub fn total_forecast_rainfall(&self) -> f64 {
        self.daily_rainfall.iter().map(|d| d.rainfall_mm).sum()
    }

    /// Mean forecast daily rainfall scaled to a month. `None` without a forecast.
    pub fn estimated_monthly_rainfall(&self) -> Option<f64> {
        if self.daily_rainfall.is_empty() {
            return None;
        }
        let avg = self.total_forecast_rainfall() / self.daily_rainfall.len() as f64;
        Some(avg * DAYS_PER_MONTH)
    }

    /// Climate fields for the ranker: temperature, humidity and monthly rainfall.
    pub fn as_input(&self) -> EnvironmentalInput {
        EnvironmentalInput {
            temperature: Some(self.temperature_c).filter(|t| t.is_finite()),
            humidity: Some(self.humidity_percent).filter(|h| h.is_finite()),
            rainfall: self.estimated_monthly_rainfall(),
            ..Default::default()
        }
    }
}
