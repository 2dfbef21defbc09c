use super::normalize::{
    denormalize, NormalizedInput, HUMIDITY_DOMAIN, NITROGEN_DOMAIN, PHOSPHORUS_DOMAIN, PH_DOMAIN,
    POTASSIUM_DOMAIN, RAINFALL_DOMAIN, TEMPERATURE_DOMAIN,
};
use crate::models::{Crop, CropCategory, ScoreBreakdown, ValueRange};

/// Sub-score used for any parameter the farmer did not supply.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// A nutrient sub-score below this caps the whole score.
const LIMITING_NUTRIENT_THRESHOLD: f64 = 0.3;
const LIMITING_NUTRIENT_SHARE: f64 = 0.3;

/// Values closer than this to a zero-width range count as on the point.
const POINT_TOLERANCE: f64 = 1e-9;

/// Tent slope inside the range and ceiling outside it, per dimension.
const PH_SHAPE: RangeShape = RangeShape::new(0.5, 0.5);
const TEMPERATURE_SHAPE: RangeShape = RangeShape::new(0.5, 0.5);
const RAINFALL_SHAPE: RangeShape = RangeShape::new(0.3, 0.7);
const HUMIDITY_SHAPE: RangeShape = RangeShape::new(0.5, 0.5);

const DEFAULT_NUTRIENTS: NutrientNeeds = NutrientNeeds::new((60.0, 100.0), (40.0, 60.0), (40.0, 60.0));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub ph: f64,
    pub temperature: f64,
    pub rainfall: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    /// Only applied when humidity is supplied
    pub humidity: f64,
}

pub fn category_weights(category: CropCategory) -> Weights {
    let w = |ph, temperature, rainfall, nitrogen, phosphorus, potassium, humidity| Weights {
        ph,
        temperature,
        rainfall,
        nitrogen,
        phosphorus,
        potassium,
        humidity,
    };

    match category {
        CropCategory::Cereal => w(0.15, 0.20, 0.20, 0.20, 0.10, 0.05, 0.10),
        CropCategory::Pulse => w(0.20, 0.15, 0.15, 0.05, 0.20, 0.15, 0.10),
        CropCategory::Fruit => w(0.15, 0.20, 0.15, 0.10, 0.10, 0.20, 0.10),
        CropCategory::CashCrop => w(0.15, 0.20, 0.20, 0.15, 0.10, 0.10, 0.10),
        CropCategory::Other => w(0.20, 0.20, 0.20, 0.10, 0.10, 0.10, 0.10),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RangeShape {
    inside_slope: f64,
    outside_ceiling: f64,
}

impl RangeShape {
    const fn new(inside_slope: f64, outside_ceiling: f64) -> Self {
        Self {
            inside_slope,
            outside_ceiling,
        }
    }
}

/// Optimal soil nutrient ranges for a crop, kg/ha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientNeeds {
    pub nitrogen: ValueRange,
    pub phosphorus: ValueRange,
    pub potassium: ValueRange,
}

impl NutrientNeeds {
    const fn new(n: (f64, f64), p: (f64, f64), k: (f64, f64)) -> Self {
        Self {
            nitrogen: ValueRange::new(n.0, n.1),
            phosphorus: ValueRange::new(p.0, p.1),
            potassium: ValueRange::new(k.0, k.1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumidityClass {
    Tropical,
    Arid,
    Temperate,
    Medium,
}

impl HumidityClass {
    pub fn band(&self) -> ValueRange {
        match self {
            HumidityClass::Tropical => ValueRange::new(70.0, 95.0),
            HumidityClass::Arid => ValueRange::new(30.0, 60.0),
            HumidityClass::Temperate => ValueRange::new(50.0, 75.0),
            HumidityClass::Medium => ValueRange::new(50.0, 85.0),
        }
    }
}

/// Lowercase a crop name and fold regional and plural spellings onto one key.
fn canonical_key(raw: &str) -> String {
    let key: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect();

    let alias = match key.as_str() {
        "paddy" => "rice",
        "corn" => "maize",
        "pearlmillet" => "bajra",
        "sorghum" => "jowar",
        "fingermillet" => "ragi",
        "gram" | "chana" => "chickpea",
        "masoor" => "lentil",
        "pigeonpea" | "arhar" | "tur" => "pigeonpeas",
        "kidneybean" | "rajma" => "kidneybeans",
        "mothbean" => "mothbeans",
        "moong" | "greengram" => "mungbean",
        "urad" => "blackgram",
        _ => return key,
    };
    alias.to_string()
}

/// Resolve a per-crop table entry by id first, then by English name.
fn lookup<T>(crop: &Crop, table: impl Fn(&str) -> Option<T>) -> Option<T> {
    table(&canonical_key(&crop.id)).or_else(|| table(&canonical_key(&crop.name.en)))
}

fn category_of(key: &str) -> Option<CropCategory> {
    match key {
        "rice" | "wheat" | "maize" | "bajra" | "jowar" | "barley" | "ragi" | "millet" => {
            Some(CropCategory::Cereal)
        }
        "chickpea" | "lentil" | "pigeonpeas" | "mungbean" | "blackgram" | "kidneybeans"
        | "mothbeans" | "cowpea" | "peas" => Some(CropCategory::Pulse),
        "mango" | "banana" | "grapes" | "watermelon" | "muskmelon" | "pomegranate" | "papaya"
        | "coconut" | "apple" | "orange" | "guava" => Some(CropCategory::Fruit),
        "cotton" | "sugarcane" | "jute" | "coffee" | "tea" | "tobacco" | "groundnut"
        | "mustard" | "soybean" | "sunflower" => Some(CropCategory::CashCrop),
        _ => None,
    }
}

pub fn classify(crop: &Crop) -> CropCategory {
    lookup(crop, category_of).unwrap_or(CropCategory::Other)
}

fn nutrients_of(key: &str) -> Option<NutrientNeeds> {
    let needs = match key {
        "rice" => ((60.0, 100.0), (35.0, 60.0), (35.0, 45.0)),
        "wheat" => ((80.0, 120.0), (40.0, 60.0), (30.0, 50.0)),
        "maize" => ((60.0, 100.0), (35.0, 60.0), (15.0, 25.0)),
        "bajra" => ((40.0, 80.0), (20.0, 40.0), (20.0, 40.0)),
        "jowar" => ((60.0, 90.0), (30.0, 50.0), (30.0, 50.0)),
        "barley" => ((50.0, 80.0), (25.0, 45.0), (20.0, 40.0)),
        "ragi" => ((40.0, 60.0), (20.0, 40.0), (20.0, 40.0)),
        "chickpea" => ((20.0, 60.0), (55.0, 80.0), (75.0, 85.0)),
        "kidneybeans" => ((0.0, 40.0), (55.0, 80.0), (15.0, 25.0)),
        "pigeonpeas" => ((0.0, 40.0), (55.0, 80.0), (15.0, 25.0)),
        "mothbeans" => ((0.0, 40.0), (35.0, 60.0), (15.0, 25.0)),
        "mungbean" => ((0.0, 40.0), (35.0, 60.0), (15.0, 25.0)),
        "blackgram" => ((20.0, 60.0), (55.0, 80.0), (15.0, 25.0)),
        "lentil" => ((0.0, 40.0), (55.0, 80.0), (15.0, 25.0)),
        "pomegranate" => ((0.0, 40.0), (5.0, 30.0), (35.0, 45.0)),
        "banana" => ((80.0, 120.0), (70.0, 95.0), (45.0, 55.0)),
        "mango" => ((0.0, 40.0), (15.0, 40.0), (25.0, 35.0)),
        "grapes" => ((0.0, 40.0), (120.0, 145.0), (195.0, 205.0)),
        "watermelon" => ((80.0, 120.0), (5.0, 30.0), (45.0, 55.0)),
        "muskmelon" => ((80.0, 120.0), (5.0, 30.0), (45.0, 55.0)),
        "apple" => ((0.0, 40.0), (120.0, 145.0), (195.0, 205.0)),
        "orange" => ((0.0, 40.0), (5.0, 30.0), (5.0, 15.0)),
        "papaya" => ((30.0, 70.0), (45.0, 70.0), (45.0, 55.0)),
        "coconut" => ((0.0, 40.0), (5.0, 30.0), (25.0, 35.0)),
        "cotton" => ((100.0, 140.0), (35.0, 60.0), (15.0, 25.0)),
        "jute" => ((60.0, 100.0), (35.0, 60.0), (35.0, 45.0)),
        "coffee" => ((80.0, 120.0), (15.0, 40.0), (25.0, 35.0)),
        "sugarcane" => ((100.0, 140.0), (40.0, 70.0), (40.0, 80.0)),
        "groundnut" => ((15.0, 30.0), (40.0, 60.0), (30.0, 50.0)),
        "mustard" => ((60.0, 100.0), (30.0, 50.0), (20.0, 40.0)),
        "soybean" => ((20.0, 40.0), (50.0, 80.0), (30.0, 50.0)),
        _ => return None,
    };
    Some(NutrientNeeds::new(needs.0, needs.1, needs.2))
}

pub fn nutrient_needs(crop: &Crop) -> NutrientNeeds {
    lookup(crop, nutrients_of).unwrap_or(DEFAULT_NUTRIENTS)
}

fn humidity_class_of(key: &str) -> Option<HumidityClass> {
    match key {
        "rice" | "banana" | "coconut" | "jute" | "papaya" | "sugarcane" | "coffee" | "tea" => {
            Some(HumidityClass::Tropical)
        }
        "bajra" | "jowar" | "ragi" | "chickpea" | "mothbeans" | "pomegranate" | "muskmelon"
        | "watermelon" | "groundnut" | "cotton" => Some(HumidityClass::Arid),
        "wheat" | "barley" | "apple" | "mustard" | "lentil" | "kidneybeans" | "grapes"
        | "orange" => Some(HumidityClass::Temperate),
        _ => None,
    }
}

pub fn humidity_class(crop: &Crop) -> HumidityClass {
    lookup(crop, humidity_class_of).unwrap_or(HumidityClass::Medium)
}

fn zero_width_score(value: f64, range: ValueRange) -> f64 {
    if (value - range.min).abs() <= POINT_TOLERANCE {
        1.0
    } else {
        0.0
    }
}

/// Tent score peaking at the range midpoint, with a linear fall-off
/// outside the range floored at zero.
fn range_score(value: f64, range: ValueRange, shape: RangeShape) -> f64 {
    let width = range.width();
    if width <= 0.0 {
        return zero_width_score(value, range);
    }

    if range.contains(value) {
        let half = width / 2.0;
        1.0 - shape.inside_slope * (value - range.midpoint()).abs() / half
    } else {
        (shape.outside_ceiling - range.distance_outside(value) / width).max(0.0)
    }
}

/// Flat 1.0 inside the optimal band, linear fall-off outside it.
fn nutrient_score(value: f64, range: ValueRange) -> f64 {
    let width = range.width();
    if width <= 0.0 {
        return zero_width_score(value, range);
    }

    if range.contains(value) {
        1.0
    } else {
        (1.0 - range.distance_outside(value) / width).max(0.0)
    }
}

pub fn ph_score(ph: f64, range: ValueRange) -> f64 {
    range_score(ph, range, PH_SHAPE)
}

pub fn temperature_score(temperature: f64, range: ValueRange) -> f64 {
    range_score(temperature, range, TEMPERATURE_SHAPE)
}

pub fn rainfall_score(rainfall: f64, range: ValueRange) -> f64 {
    range_score(rainfall, range, RAINFALL_SHAPE)
}

pub fn humidity_score(humidity: f64, band: ValueRange) -> f64 {
    range_score(humidity, band, HUMIDITY_SHAPE)
}

/// Score a normalized value in physical units, or neutral when unknown.
fn sub_score(value: Option<f64>, domain: ValueRange, score: impl Fn(f64) -> f64) -> f64 {
    value
        .map(|n| score(denormalize(n, domain)))
        .unwrap_or(NEUTRAL_SCORE)
}

/// A nutrient sub-score strictly below the threshold caps the whole score.
fn is_limiting(weakest_nutrient: f64) -> bool {
    weakest_nutrient < LIMITING_NUTRIENT_THRESHOLD
}

/// Suitability of `crop` for the given conditions, in [0, 1].
pub fn score_crop(crop: &Crop, input: &NormalizedInput) -> (f64, ScoreBreakdown) {
    let category = classify(crop);
    let weights = category_weights(category);
    let needs = nutrient_needs(crop);

    let ph = sub_score(input.ph, PH_DOMAIN, |v| ph_score(v, crop.ph_range));
    let temperature = sub_score(input.temperature, TEMPERATURE_DOMAIN, |v| {
        temperature_score(v, crop.temperature_range)
    });
    let rainfall = sub_score(input.rainfall, RAINFALL_DOMAIN, |v| {
        rainfall_score(v, crop.rainfall_range)
    });
    let nitrogen = sub_score(input.nitrogen, NITROGEN_DOMAIN, |v| {
        nutrient_score(v, needs.nitrogen)
    });
    let phosphorus = sub_score(input.phosphorus, PHOSPHORUS_DOMAIN, |v| {
        nutrient_score(v, needs.phosphorus)
    });
    let potassium = sub_score(input.potassium, POTASSIUM_DOMAIN, |v| {
        nutrient_score(v, needs.potassium)
    });

    let mut score =
        weights.ph * ph + weights.temperature * temperature + weights.rainfall * rainfall;

    let weakest_nutrient = nitrogen.min(phosphorus).min(potassium);
    let nutrient_limited = is_limiting(weakest_nutrient);
    if nutrient_limited {
        score = (1.0 - LIMITING_NUTRIENT_SHARE) * score + LIMITING_NUTRIENT_SHARE * weakest_nutrient;
    } else {
        score += weights.nitrogen * nitrogen
            + weights.phosphorus * phosphorus
            + weights.potassium * potassium;
    }

    let humidity = input.humidity.map(|n| {
        humidity_score(denormalize(n, HUMIDITY_DOMAIN), humidity_class(crop).band())
    });
    if let Some(h) = humidity {
        score += weights.humidity * h;
    }

    let breakdown = ScoreBreakdown {
        category,
        ph,
        temperature,
        rainfall,
        nitrogen,
        phosphorus,
        potassium,
        humidity,
        nutrient_limited,
    };

    (score.clamp(0.0, 1.0), breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_crop, EnvironmentalInput, Season};
    use approx::assert_abs_diff_eq;

    fn normalized(input: EnvironmentalInput) -> NormalizedInput {
        NormalizedInput::from_input(&input)
    }

    #[test]
    fn weights_sum_to_at_most_one() {
        for category in [
            CropCategory::Cereal,
            CropCategory::Pulse,
            CropCategory::Fruit,
            CropCategory::CashCrop,
            CropCategory::Other,
        ] {
            let w = category_weights(category);
            let total = w.ph
                + w.temperature
                + w.rainfall
                + w.nitrogen
                + w.phosphorus
                + w.potassium
                + w.humidity;
            assert!(total <= 1.0 + 1e-9, "{:?} sums to {}", category, total);
        }
    }

    #[test]
    fn classifies_by_id_and_name() {
        assert_eq!(classify(&sample_crop("rice", Season::Kharif)), CropCategory::Cereal);
        assert_eq!(classify(&sample_crop("Chickpea", Season::Rabi)), CropCategory::Pulse);
        assert_eq!(classify(&sample_crop("pigeon-pea", Season::Kharif)), CropCategory::Pulse);
        assert_eq!(classify(&sample_crop("mango", Season::Kharif)), CropCategory::Fruit);
        assert_eq!(classify(&sample_crop("sugarcane", Season::Kharif)), CropCategory::CashCrop);
        assert_eq!(classify(&sample_crop("saffron", Season::Rabi)), CropCategory::Other);

        let mut crop = sample_crop("crop-17", Season::Rabi);
        crop.name.en = "Pearl Millet".into();
        assert_eq!(classify(&crop), CropCategory::Cereal);
    }

    #[test]
    fn unknown_crop_uses_default_nutrients() {
        let needs = nutrient_needs(&sample_crop("saffron", Season::Rabi));
        assert_eq!(needs, DEFAULT_NUTRIENTS);
        assert_eq!(needs.nitrogen, ValueRange::new(60.0, 100.0));
    }

    #[test]
    fn midpoint_scores_one() {
        let range = ValueRange::new(6.0, 7.0);
        assert_abs_diff_eq!(ph_score(6.5, range), 1.0);
        assert_abs_diff_eq!(temperature_score(25.0, ValueRange::new(20.0, 30.0)), 1.0);
        assert_abs_diff_eq!(rainfall_score(150.0, ValueRange::new(100.0, 200.0)), 1.0);
    }

    #[test]
    fn range_bounds_score_in_range_minimum() {
        let range = ValueRange::new(20.0, 30.0);
        assert_abs_diff_eq!(temperature_score(20.0, range), 0.5);
        assert_abs_diff_eq!(temperature_score(30.0, range), 0.5);
        assert_abs_diff_eq!(rainfall_score(100.0, ValueRange::new(100.0, 200.0)), 0.7);
    }

    #[test]
    fn outside_range_is_below_in_range_minimum_and_non_negative() {
        let range = ValueRange::new(6.0, 7.0);
        for value in [5.99, 5.5, 4.0, 7.01, 8.5, 14.0] {
            let s = ph_score(value, range);
            assert!(s < 0.5 && s >= 0.0, "pH {} scored {}", value, s);
        }

        let range = ValueRange::new(100.0, 200.0);
        for value in [99.0, 50.0, 0.0, 201.0, 280.0, 1000.0] {
            let s = rainfall_score(value, range);
            assert!(s < 0.7 && s >= 0.0, "rainfall {} scored {}", value, s);
        }
    }

    #[test]
    fn zero_width_range_does_not_divide_by_zero() {
        let point = ValueRange::new(6.5, 6.5);
        assert_eq!(ph_score(6.5, point), 1.0);
        assert_eq!(ph_score(6.6, point), 0.0);
        assert_eq!(rainfall_score(6.5, point), 1.0);
        assert_eq!(nutrient_score(40.0, ValueRange::new(40.0, 40.0)), 1.0);
        assert_eq!(nutrient_score(41.0, ValueRange::new(40.0, 40.0)), 0.0);
    }

    #[test]
    fn zero_width_crop_range_through_scorer() {
        let mut crop = sample_crop("saffron", Season::Rabi);
        crop.ph_range = ValueRange::new(6.5, 6.5);

        let (_, on_point) = score_crop(
            &crop,
            &normalized(EnvironmentalInput {
                ph: Some(6.5),
                ..Default::default()
            }),
        );
        assert_eq!(on_point.ph, 1.0);

        let (_, off_point) = score_crop(
            &crop,
            &normalized(EnvironmentalInput {
                ph: Some(7.0),
                ..Default::default()
            }),
        );
        assert_eq!(off_point.ph, 0.0);
    }

    #[test]
    fn nutrient_score_flat_inside_band() {
        let band = ValueRange::new(60.0, 100.0);
        assert_eq!(nutrient_score(60.0, band), 1.0);
        assert_eq!(nutrient_score(85.0, band), 1.0);
        assert_abs_diff_eq!(nutrient_score(40.0, band), 0.5);
        assert_eq!(nutrient_score(0.0, band), 0.0);
    }

    #[test]
    fn missing_inputs_score_neutral() {
        let crop = sample_crop("saffron", Season::Rabi);
        let (score, breakdown) = score_crop(&crop, &NormalizedInput::default());

        assert_eq!(breakdown.ph, NEUTRAL_SCORE);
        assert_eq!(breakdown.nitrogen, NEUTRAL_SCORE);
        assert_eq!(breakdown.humidity, None);
        assert!(!breakdown.nutrient_limited);
        // Default weights without humidity sum to 0.9
        assert_abs_diff_eq!(score, 0.45, epsilon = 1e-9);
    }

    #[test]
    fn ideal_conditions_score_high() {
        let crop = sample_crop("rice", Season::Kharif);
        let input = normalized(EnvironmentalInput {
            nitrogen: Some(80.0),
            phosphorus: Some(45.0),
            potassium: Some(40.0),
            temperature: Some(25.0),
            humidity: Some(82.5),
            ph: Some(6.5),
            rainfall: Some(150.0),
        });

        let (score, breakdown) = score_crop(&crop, &input);
        assert_eq!(breakdown.category, CropCategory::Cereal);
        assert_abs_diff_eq!(breakdown.ph, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(breakdown.nitrogen, 1.0);
        assert_abs_diff_eq!(breakdown.humidity.unwrap(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(score, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn deficient_nutrient_caps_score() {
        let crop = sample_crop("rice", Season::Kharif);
        let base = EnvironmentalInput {
            nitrogen: Some(80.0),
            phosphorus: Some(45.0),
            potassium: Some(40.0),
            temperature: Some(25.0),
            ph: Some(6.5),
            rainfall: Some(150.0),
            ..Default::default()
        };

        let (healthy, _) = score_crop(&crop, &normalized(base));

        // Potassium far below the 35-45 band
        let starved = EnvironmentalInput {
            potassium: Some(5.0),
            ..base
        };
        let (capped, breakdown) = score_crop(&crop, &normalized(starved));

        assert!(breakdown.nutrient_limited);
        assert_eq!(breakdown.potassium, 0.0);
        // 0.7 * (0.15 + 0.20 + 0.20) + 0.3 * 0.0
        assert_abs_diff_eq!(capped, 0.385, epsilon = 1e-9);
        assert!(capped < healthy);
    }

    #[test]
    fn limiting_threshold_is_exclusive() {
        assert!(!is_limiting(0.3));
        assert!(!is_limiting(0.31));
        assert!(is_limiting(0.29));
        assert!(is_limiting(0.0));
    }

    #[test]
    fn humidity_band_follows_climate_class() {
        assert_eq!(humidity_class(&sample_crop("rice", Season::Kharif)), HumidityClass::Tropical);
        assert_eq!(humidity_class(&sample_crop("bajra", Season::Kharif)), HumidityClass::Arid);
        assert_eq!(humidity_class(&sample_crop("wheat", Season::Rabi)), HumidityClass::Temperate);
        assert_eq!(humidity_class(&sample_crop("maize", Season::Kharif)), HumidityClass::Medium);

        let band = HumidityClass::Arid.band();
        assert_abs_diff_eq!(humidity_score(45.0, band), 1.0);
        assert!(humidity_score(90.0, band) < 0.5);
        assert_eq!(humidity_score(99.0, band), 0.0);
    }

    #[test]
    fn out_of_domain_inputs_are_clamped_not_rejected() {
        let crop = sample_crop("wheat", Season::Rabi);
        let (score, breakdown) = score_crop(
            &crop,
            &normalized(EnvironmentalInput {
                temperature: Some(80.0),
                rainfall: Some(-10.0),
                ..Default::default()
            }),
        );
        assert!((0.0..=1.0).contains(&score));
        assert!(breakdown.temperature < 0.5);
        assert!(breakdown.rainfall < 0.7);
    }
}
