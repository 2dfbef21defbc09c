use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    Form,
    OpenWeatherMap,
    SoilService,
    Default,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Form => "Farmer Input",
            DataSource::OpenWeatherMap => "OpenWeatherMap",
            DataSource::SoilService => "Soil Report",
            DataSource::Default => "Neutral Default",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw agronomic inputs in physical units. Any field may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalInput {
    /// kg/ha
    pub nitrogen: Option<f64>,
    /// kg/ha
    pub phosphorus: Option<f64>,
    /// kg/ha
    pub potassium: Option<f64>,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// Relative humidity, percent
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    /// Millimetres
    pub rainfall: Option<f64>,
}

impl EnvironmentalInput {
    /// Fill every missing field from `other`; fields already set win.
    pub fn or(self, other: EnvironmentalInput) -> Self {
        Self {
            nitrogen: self.nitrogen.or(other.nitrogen),
            phosphorus: self.phosphorus.or(other.phosphorus),
            potassium: self.potassium.or(other.potassium),
            temperature: self.temperature.or(other.temperature),
            humidity: self.humidity.or(other.humidity),
            ph: self.ph.or(other.ph),
            rainfall: self.rainfall.or(other.rainfall),
        }
    }

    pub fn known_count(&self) -> usize {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.known_count() == 0
    }
}

/// Region resolved from a pincode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub pincode: String,
    pub region: String,
    pub district: Option<String>,
}

impl LocationInfo {
    pub const UNKNOWN_REGION: &'static str = "Unknown";

    pub fn unknown(pincode: &str) -> Self {
        Self {
            pincode: pincode.to_string(),
            region: Self::UNKNOWN_REGION.to_string(),
            district: None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.region != Self::UNKNOWN_REGION
    }
}

/// Soil test values for a location, as reported by the soil service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilReport {
    pub ph: Option<f64>,
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub moisture_percent: Option<f64>,
    pub organic_matter_percent: Option<f64>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl SoilReport {
    pub fn as_input(&self) -> EnvironmentalInput {
        EnvironmentalInput {
            nitrogen: self.nitrogen,
            phosphorus: self.phosphorus,
            potassium: self.potassium,
            ph: self.ph,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_prefers_existing_values() {
        let form = EnvironmentalInput {
            ph: Some(6.5),
            temperature: Some(28.0),
            ..Default::default()
        };
        let fetched = EnvironmentalInput {
            ph: Some(7.8),
            humidity: Some(70.0),
            ..Default::default()
        };

        let merged = form.or(fetched);
        assert_eq!(merged.ph, Some(6.5));
        assert_eq!(merged.temperature, Some(28.0));
        assert_eq!(merged.humidity, Some(70.0));
        assert_eq!(merged.rainfall, None);
        assert_eq!(merged.known_count(), 3);
    }

    #[test]
    fn soil_report_maps_nutrients_and_ph() {
        let report = SoilReport {
            ph: Some(6.8),
            nitrogen: Some(90.0),
            phosphorus: Some(45.0),
            potassium: Some(40.0),
            moisture_percent: Some(22.0),
            organic_matter_percent: Some(0.8),
            recommendations: vec![],
        };
        let input = report.as_input();
        assert_eq!(input.ph, Some(6.8));
        assert_eq!(input.nitrogen, Some(90.0));
        assert_eq!(input.temperature, None);
    }

    #[test]
    fn unknown_location() {
        let loc = LocationInfo::unknown("110001");
        assert!(!loc.is_known());
        assert_eq!(loc.region, "Unknown");
    }

    #[test]
    fn data_source_display() {
        assert_eq!(DataSource::Form.as_str(), "Farmer Input");
        assert_eq!(DataSource::Default.to_string(), "Neutral Default");
    }
}
