use crate::models::{EnvironmentalInput, ValueRange};

/// Fixed domain ranges every raw input is normalized against.
pub const NITROGEN_DOMAIN: ValueRange = ValueRange::new(0.0, 140.0);
pub const PHOSPHORUS_DOMAIN: ValueRange = ValueRange::new(5.0, 145.0);
pub const POTASSIUM_DOMAIN: ValueRange = ValueRange::new(5.0, 205.0);
pub const TEMPERATURE_DOMAIN: ValueRange = ValueRange::new(10.0, 44.0);
pub const HUMIDITY_DOMAIN: ValueRange = ValueRange::new(15.0, 99.0);
pub const PH_DOMAIN: ValueRange = ValueRange::new(3.5, 9.9);
pub const RAINFALL_DOMAIN: ValueRange = ValueRange::new(20.0, 298.0);

/// Map `value` into [0, 1] relative to `domain`, clamping out-of-range input.
pub fn normalize(value: f64, domain: ValueRange) -> f64 {
    let width = domain.width();
    if width <= 0.0 {
        return 0.0;
    }
    ((value - domain.min) / width).clamp(0.0, 1.0)
}

/// Inverse of [`normalize`] for values inside [0, 1].
pub fn denormalize(normalized: f64, domain: ValueRange) -> f64 {
    domain.min + normalized * domain.width()
}

/// Environmental input with every known value mapped into [0, 1].
/// `None` marks an unknown parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedInput {
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub rainfall: Option<f64>,
}

impl NormalizedInput {
    pub fn from_input(input: &EnvironmentalInput) -> Self {
        let norm = |v: Option<f64>, domain: ValueRange| {
            v.filter(|x| x.is_finite()).map(|x| normalize(x, domain))
        };

        Self {
            nitrogen: norm(input.nitrogen, NITROGEN_DOMAIN),
            phosphorus: norm(input.phosphorus, PHOSPHORUS_DOMAIN),
            potassium: norm(input.potassium, POTASSIUM_DOMAIN),
            temperature: norm(input.temperature, TEMPERATURE_DOMAIN),
            humidity: norm(input.humidity, HUMIDITY_DOMAIN),
            ph: norm(input.ph, PH_DOMAIN),
            rainfall: norm(input.rainfall, RAINFALL_DOMAIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_within_domain() {
        assert_eq!(normalize(70.0, NITROGEN_DOMAIN), 0.5);
        assert_eq!(normalize(10.0, TEMPERATURE_DOMAIN), 0.0);
        assert_eq!(normalize(44.0, TEMPERATURE_DOMAIN), 1.0);
    }

    #[test]
    fn clamps_out_of_domain_values() {
        assert_eq!(normalize(-20.0, NITROGEN_DOMAIN), 0.0);
        assert_eq!(normalize(500.0, RAINFALL_DOMAIN), 1.0);
        assert_eq!(normalize(2.0, PH_DOMAIN), 0.0);
    }

    #[test]
    fn denormalize_inverts_normalize() {
        for (value, domain) in [
            (6.5, PH_DOMAIN),
            (27.0, TEMPERATURE_DOMAIN),
            (150.0, RAINFALL_DOMAIN),
            (42.0, POTASSIUM_DOMAIN),
        ] {
            let back = denormalize(normalize(value, domain), domain);
            assert!((back - value).abs() < 1e-9, "{} -> {}", value, back);
        }
    }

    #[test]
    fn missing_and_non_finite_inputs_stay_unknown() {
        let input = EnvironmentalInput {
            ph: Some(f64::NAN),
            temperature: Some(27.0),
            ..Default::default()
        };
        let n = NormalizedInput::from_input(&input);
        assert_eq!(n.ph, None);
        assert_eq!(n.nitrogen, None);
        assert!(n.temperature.is_some());
    }
}
