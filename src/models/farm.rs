use crate::error::{CropOpsError, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const ACRES_PER_HECTARE: f64 = 2.47;
pub const MAX_PREVIOUS_CROPS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    #[default]
    Acre,
    Hectare,
}

impl AreaUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaUnit::Acre => "acre",
            AreaUnit::Hectare => "hectare",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "acre" | "acres" | "ac" => Some(AreaUnit::Acre),
            "hectare" | "hectares" | "ha" => Some(AreaUnit::Hectare),
            _ => None,
        }
    }

    pub fn to_acres(&self, area: f64) -> f64 {
        match self {
            AreaUnit::Acre => area,
            AreaUnit::Hectare => area * ACRES_PER_HECTARE,
        }
    }
}

impl std::fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn pincode_pattern() -> &'static regex_lite::Regex {
    static PATTERN: OnceLock<regex_lite::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| regex_lite::Regex::new(r"^[1-9][0-9]{5}$").unwrap())
}

/// Check an Indian postal code: six digits, first digit non-zero.
pub fn validate_pincode(pincode: &str) -> Result<String> {
    let trimmed = pincode.trim();
    if pincode_pattern().is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(CropOpsError::InvalidPincode(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FarmProfile {
    pub pincode: String,
    pub area: f64,
    pub area_unit: AreaUnit,
    pub previous_crops: Vec<String>,
}

impl FarmProfile {
    pub fn new(
        pincode: &str,
        area: f64,
        area_unit: AreaUnit,
        previous_crops: Vec<String>,
    ) -> Result<Self> {
        let pincode = validate_pincode(pincode)?;

        if !area.is_finite() || area <= 0.0 {
            return Err(CropOpsError::InvalidData(format!(
                "Farm area must be a positive number, got {}",
                area
            )));
        }

        let previous_crops: Vec<String> = previous_crops
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        if previous_crops.len() > MAX_PREVIOUS_CROPS {
            return Err(CropOpsError::InvalidData(format!(
                "At most {} previous crops can be listed, got {}",
                MAX_PREVIOUS_CROPS,
                previous_crops.len()
            )));
        }

        Ok(Self {
            pincode,
            area,
            area_unit,
            previous_crops,
        })
    }

    pub fn area_in_acres(&self) -> f64 {
        self.area_unit.to_acres(self.area)
    }
}
