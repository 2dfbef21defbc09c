use super::calculations::{project_for_farm, recently_grown};
use super::normalize::NormalizedInput;
use super::scoring::score_crop;
use crate::config::RecommendationConfig;
use crate::models::{Crop, EnvironmentalInput, FarmProfile, ScoredCrop, Season};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_TOP_N: usize = 5;
pub const IN_SEASON_MULTIPLIER: f64 = 1.1;
pub const OFF_SEASON_MULTIPLIER: f64 = 0.9;
pub const MAX_JITTER: f64 = 0.5;

/// Everything a single recommendation pass needs besides the crop list.
#[derive(Debug, Clone)]
pub struct RecommendationRequest<'a> {
    pub input: EnvironmentalInput,
    /// Season to favour; `None` skips the seasonal multiplier
    pub season: Option<Season>,
    pub farm: &'a FarmProfile,
}

struct Jitter {
    fraction: f64,
    rng: StdRng,
}

impl Jitter {
    fn factor(&mut self) -> f64 {
        1.0 + self.rng.gen_range(-self.fraction..=self.fraction)
    }
}

/// Scores, filters and orders candidate crops for a farm.
pub struct RecommendationEngine {
    top_n: usize,
    seasonal_adjustment: bool,
    jitter: Option<Jitter>,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            seasonal_adjustment: true,
            jitter: None,
        }
    }

    pub fn from_config(config: &RecommendationConfig) -> Self {
        Self::new()
            .with_top_n(config.top_n)
            .with_seasonal_adjustment(config.seasonal_adjustment)
            .with_jitter(config.jitter, config.seed)
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_seasonal_adjustment(mut self, enabled: bool) -> Self {
        self.seasonal_adjustment = enabled;
        self
    }

    /// Randomly scale each score by up to `fraction` either way. Zero
    /// disables jitter; a seed makes the variation reproducible.
    pub fn with_jitter(mut self, fraction: f64, seed: Option<u64>) -> Self {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, MAX_JITTER)
        } else {
            0.0
        };

        self.jitter = if fraction > 0.0 {
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Some(Jitter { fraction, rng })
        } else {
            None
        };
        self
    }

    pub fn recommend(&mut self, crops: &[Crop], request: &RecommendationRequest) -> Vec<ScoredCrop> {
        let normalized = NormalizedInput::from_input(&request.input);
        let previous = &request.farm.previous_crops;

        let mut scored: Vec<ScoredCrop> = Vec::with_capacity(crops.len());
        for crop in crops {
            if recently_grown(crop, previous) {
                tracing::debug!("Skipping {} for crop rotation", crop.id);
                continue;
            }

            let (suitability, breakdown) = score_crop(crop, &normalized);
            let score = self.adjust(suitability, crop, request.season);

            if score <= 0.0 {
                tracing::debug!("Dropping {} with non-positive score", crop.id);
                continue;
            }

            scored.push(ScoredCrop {
                crop: crop.clone(),
                suitability,
                score,
                breakdown,
                financials: project_for_farm(crop, request.farm),
            });
        }

        // sort_by is stable, so equal scores keep catalog order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.top_n);

        tracing::info!(
            "Ranked {} of {} crops (season: {})",
            scored.len(),
            crops.len(),
            request.season.map(|s| s.as_str()).unwrap_or("none")
        );

        scored
    }

    fn adjust(&mut self, suitability: f64, crop: &Crop, season: Option<Season>) -> f64 {
        let mut score = suitability;

        if let Some(current) = season.filter(|_| self.seasonal_adjustment) {
            score *= if crop.season == current {
                IN_SEASON_MULTIPLIER
            } else {
                OFF_SEASON_MULTIPLIER
            };
        }

        if let Some(jitter) = self.jitter.as_mut() {
            score *= jitter.factor();
        }

        score.clamp(0.0, 1.0)
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}
