use super::crop::{Crop, Language};
use serde::Serialize;

/// Projected money figures for growing a crop on a given area.
///
/// Only [`Financials::project`] builds one, so `profit` and `actual_roi`
/// always derive from the two stored totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Financials {
    total_investment: f64,
    expected_return: f64,
    profit: f64,
    actual_roi: f64,
}

impl Financials {
    /// `acres` must be positive and the crop's investment per acre non-zero;
    /// both hold for a validated crop and farm profile.
    pub fn project(crop: &Crop, acres: f64) -> Self {
        let total_investment = crop.investment_per_acre * acres;
        let expected_return = crop.expected_yield_per_acre * acres * crop.price_per_quintal;
        let profit = expected_return - total_investment;
        let actual_roi = profit / total_investment * 100.0;

        Self {
            total_investment,
            expected_return,
            profit,
            actual_roi,
        }
    }

    pub fn total_investment(&self) -> f64 {
        self.total_investment
    }

    pub fn expected_return(&self) -> f64 {
        self.expected_return
    }

    pub fn profit(&self) -> f64 {
        self.profit
    }

    pub fn actual_roi(&self) -> f64 {
        self.actual_roi
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CropCategory {
    Cereal,
    Pulse,
    Fruit,
    CashCrop,
    Other,
}

impl CropCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropCategory::Cereal => "Cereal",
            CropCategory::Pulse => "Pulse",
            CropCategory::Fruit => "Fruit",
            CropCategory::CashCrop => "Cash Crop",
            CropCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for CropCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-parameter sub-scores behind a suitability score, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub category: CropCategory,
    pub ph: f64,
    pub temperature: f64,
    pub rainfall: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    /// `None` when humidity was not supplied
    pub humidity: Option<f64>,
    /// True when a deficient nutrient capped the score
    pub nutrient_limited: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredCrop {
    pub crop: Crop,
    /// Output of the suitability scorer, in [0, 1]
    pub suitability: f64,
    /// Ranking score after seasonal and jitter adjustments, in [0, 1]
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub financials: Financials,
}

impl ScoredCrop {
    pub fn display_name(&self, lang: Language) -> &str {
        self.crop.name.get(lang)
    }

    /// Score on the 0-100 scale used for display.
    pub fn score_percent(&self) -> f64 {
        self.score * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::crop::{sample_crop, Season};

    #[test]
    fn financials_follow_yield_times_price() {
        let crop = sample_crop("wheat", Season::Rabi);
        let f = Financials::project(&crop, 2.0);

        assert_eq!(f.total_investment(), 50000.0);
        assert_eq!(f.expected_return(), 84000.0);
        assert_eq!(f.profit(), 34000.0);
        assert_eq!(f.actual_roi(), 68.0);
    }

    #[test]
    fn financial_identities_hold_exactly() {
        let mut crop = sample_crop("odd", Season::Kharif);
        crop.investment_per_acre = 33333.33;
        crop.expected_yield_per_acre = 17.3;
        crop.price_per_quintal = 2183.7;

        for acres in [0.1, 1.0, 2.47, 7.3, 1234.5] {
            let f = Financials::project(&crop, acres);
            assert_eq!(f.profit(), f.expected_return() - f.total_investment());
            assert_eq!(f.actual_roi(), f.profit() / f.total_investment() * 100.0);
        }
    }

    #[test]
    fn loss_gives_negative_roi() {
        let mut crop = sample_crop("poor", Season::Zaid);
        crop.expected_yield_per_acre = 1.0;
        let f = Financials::project(&crop, 1.0);
        assert!(f.profit() < 0.0);
        assert!(f.actual_roi() < 0.0);
    }
}
