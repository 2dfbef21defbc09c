use crate::error::{CropOpsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Catalog shipped with the binary; `--crops` replaces it at runtime.
const BUNDLED_CATALOG: &str = include_str!("../../data/crops.yaml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Kharif,
    Rabi,
    Zaid,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Zaid => "Zaid",
        }
    }

    pub fn as_hindi(&self) -> &'static str {
        match self {
            Season::Kharif => "खरीफ",
            Season::Rabi => "रबी",
            Season::Zaid => "जायद",
        }
    }

    /// Sowing season for a calendar month (1-12). Monsoon months map to
    /// Kharif, everything else to Rabi; Zaid is never derived from the clock.
    pub fn from_month(month: u32) -> Self {
        if (4..=9).contains(&month) {
            Season::Kharif
        } else {
            Season::Rabi
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kharif" | "monsoon" => Some(Season::Kharif),
            "rabi" | "winter" => Some(Season::Rabi),
            "zaid" | "summer" => Some(Season::Zaid),
            _ => None,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "hi" | "hindi" => Some(Language::Hi),
            _ => None,
        }
    }
}

/// A string carried in both English and Hindi.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilingual {
    pub en: String,
    pub hi: String,
}

impl Bilingual {
    pub fn get(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.en,
            Language::Hi if self.hi.is_empty() => &self.en,
            Language::Hi => &self.hi,
        }
    }
}

/// Closed interval in physical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance from `value` to the nearest bound, zero when inside.
    pub fn distance_outside(&self, value: f64) -> f64 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crop {
    pub id: String,
    pub name: Bilingual,
    pub season: Season,
    pub ph_range: ValueRange,
    /// Degrees Celsius
    pub temperature_range: ValueRange,
    /// Millimetres
    pub rainfall_range: ValueRange,
    /// Rupees per acre
    pub investment_per_acre: f64,
    /// Quintals per acre
    pub expected_yield_per_acre: f64,
    /// Reference ROI published for the crop; informational only
    pub roi_percent: f64,
    /// Rupees per quintal
    pub price_per_quintal: f64,
    #[serde(default)]
    pub regions: Vec<String>,
    pub description: Bilingual,
}

impl Crop {
    /// True if `name` refers to this crop by id or either name, ignoring case.
    pub fn matches_name(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.id.to_lowercase() == needle
            || self.name.en.to_lowercase() == needle
            || self.name.hi.to_lowercase() == needle
    }

    pub fn grows_in(&self, region: &str) -> bool {
        let region = region.trim().to_lowercase();
        self.regions.iter().any(|r| r.to_lowercase() == region)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() || self.name.en.trim().is_empty() {
            return Err(CropOpsError::InvalidData(
                "Crop is missing an id or English name".into(),
            ));
        }

        for (label, range) in [
            ("pH", &self.ph_range),
            ("temperature", &self.temperature_range),
            ("rainfall", &self.rainfall_range),
        ] {
            if !range.is_valid() {
                return Err(CropOpsError::InvalidData(format!(
                    "{}: {} range {}-{} is not a valid interval",
                    self.id, label, range.min, range.max
                )));
            }
        }

        if !self.investment_per_acre.is_finite() || self.investment_per_acre <= 0.0 {
            return Err(CropOpsError::InvalidData(format!(
                "{}: investment per acre must be positive",
                self.id
            )));
        }

        for (label, value) in [
            ("expected yield", self.expected_yield_per_acre),
            ("price per quintal", self.price_per_quintal),
            ("ROI", self.roi_percent),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CropOpsError::InvalidData(format!(
                    "{}: {} must be a finite, non-negative number, got {}",
                    self.id, label, value
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    crops: Vec<Crop>,
}

/// Ordered, validated list of reference crops.
#[derive(Debug, Clone)]
pub struct CropCatalog {
    crops: Vec<Crop>,
}

impl CropCatalog {
    pub fn bundled() -> Result<Self> {
        Self::from_yaml(BUNDLED_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CropOpsError::Config(format!("Failed to read crop catalog {:?}: {}", path, e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        Self::new(file.crops)
    }

    pub fn new(crops: Vec<Crop>) -> Result<Self> {
        for crop in &crops {
            crop.validate()?;
        }

        for (i, crop) in crops.iter().enumerate() {
            if crops[..i].iter().any(|c| c.id == crop.id) {
                return Err(CropOpsError::InvalidData(format!(
                    "Duplicate crop id '{}'",
                    crop.id
                )));
            }
        }

        Ok(Self { crops })
    }

    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample_crop(id: &str, season: Season) -> Crop {
    Crop {
        id: id.to_string(),
        name: Bilingual {
            en: id.to_string(),
            hi: String::new(),
        },
        season,
        ph_range: ValueRange::new(6.0, 7.0),
        temperature_range: ValueRange::new(20.0, 30.0),
        rainfall_range: ValueRange::new(100.0, 200.0),
        investment_per_acre: 25000.0,
        expected_yield_per_acre: 20.0,
        roi_percent: 60.0,
        price_per_quintal: 2100.0,
        regions: vec!["Punjab".to_string()],
        description: Bilingual {
            en: "Test crop".to_string(),
            hi: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_from_month() {
        assert_eq!(Season::from_month(4), Season::Kharif);
        assert_eq!(Season::from_month(9), Season::Kharif);
        assert_eq!(Season::from_month(10), Season::Rabi);
        assert_eq!(Season::from_month(1), Season::Rabi);
        assert_eq!(Season::from_month(3), Season::Rabi);
    }

    #[test]
    fn season_from_str() {
        assert_eq!(Season::from_str("Kharif"), Some(Season::Kharif));
        assert_eq!(Season::from_str(" rabi "), Some(Season::Rabi));
        assert_eq!(Season::from_str("summer"), Some(Season::Zaid));
        assert_eq!(Season::from_str("spring"), None);
    }

    #[test]
    fn bilingual_falls_back_to_english() {
        let text = Bilingual {
            en: "Wheat".into(),
            hi: String::new(),
        };
        assert_eq!(text.get(Language::Hi), "Wheat");

        let text = Bilingual {
            en: "Wheat".into(),
            hi: "गेहूं".into(),
        };
        assert_eq!(text.get(Language::Hi), "गेहूं");
        assert_eq!(text.get(Language::En), "Wheat");
    }

    #[test]
    fn value_range_distance() {
        let range = ValueRange::new(6.0, 7.0);
        assert_eq!(range.distance_outside(6.5), 0.0);
        assert!((range.distance_outside(5.5) - 0.5).abs() < 1e-9);
        assert!((range.distance_outside(8.0) - 1.0).abs() < 1e-9);
        assert!((range.midpoint() - 6.5).abs() < 1e-9);
    }

    #[test]
    fn crop_matches_name_case_insensitively() {
        let crop = sample_crop("wheat", Season::Rabi);
        assert!(crop.matches_name("WHEAT"));
        assert!(crop.matches_name(" Wheat "));
        assert!(!crop.matches_name("rice"));
        assert!(!crop.matches_name(""));
    }

    #[test]
    fn crop_validation_rejects_inverted_range() {
        let mut crop = sample_crop("rice", Season::Kharif);
        crop.ph_range = ValueRange::new(7.5, 5.5);
        assert!(crop.validate().is_err());
    }

    #[test]
    fn crop_validation_rejects_zero_investment() {
        let mut crop = sample_crop("rice", Season::Kharif);
        crop.investment_per_acre = 0.0;
        assert!(crop.validate().is_err());
    }

    #[test]
    fn crop_validation_rejects_non_finite_economics() {
        let mut crop = sample_crop("rice", Season::Kharif);
        crop.expected_yield_per_acre = f64::NAN;
        assert!(crop.validate().is_err());

        let mut crop = sample_crop("rice", Season::Kharif);
        crop.expected_yield_per_acre = f64::INFINITY;
        crop.price_per_quintal = 0.0;
        assert!(crop.validate().is_err());

        let mut crop = sample_crop("rice", Season::Kharif);
        crop.price_per_quintal = f64::NAN;
        assert!(crop.validate().is_err());

        let mut crop = sample_crop("rice", Season::Kharif);
        crop.roi_percent = f64::NEG_INFINITY;
        assert!(crop.validate().is_err());

        let mut crop = sample_crop("rice", Season::Kharif);
        crop.price_per_quintal = -1.0;
        assert!(crop.validate().is_err());
    }

    #[test]
    fn catalog_yaml_with_nan_yield_is_rejected() {
        let yaml = r#"
crops:
  - id: rice
    name: { en: Rice, hi: चावल }
    season: kharif
    ph_range: { min: 5.5, max: 7.0 }
    temperature_range: { min: 20, max: 35 }
    rainfall_range: { min: 150, max: 300 }
    investment_per_acre: 25000
    expected_yield_per_acre: .nan
    roi_percent: 60
    price_per_quintal: 2100
    description: { en: Paddy, hi: धान }
"#;
        assert!(matches!(
            CropCatalog::from_yaml(yaml),
            Err(CropOpsError::InvalidData(_))
        ));
        let valid = yaml.replace(".nan", "20");
        assert_eq!(CropCatalog::from_yaml(&valid).unwrap().len(), 1);
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let crops = vec![
            sample_crop("rice", Season::Kharif),
            sample_crop("rice", Season::Kharif),
        ];
        assert!(CropCatalog::new(crops).is_err());
    }

    #[test]
    fn bundled_catalog_loads() {
        let catalog = CropCatalog::bundled().expect("bundled catalog should parse");
        assert!(catalog.len() >= 20);
        assert!(catalog.crops().iter().any(|c| c.id == "rice"));
        assert!(catalog.crops().iter().all(|c| !c.name.hi.is_empty()));
    }
}
