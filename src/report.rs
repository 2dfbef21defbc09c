use crate::logic::AssembledEnvironment;
use crate::models::{Crop, FarmProfile, Language, ScoredCrop, Season};
use serde::Serialize;
use std::fmt::Write;

/// Fixed UI strings in both languages.
struct Labels {
    heading: &'static str,
    season: &'static str,
    region: &'static str,
    score: &'static str,
    investment: &'static str,
    expected_return: &'static str,
    profit: &'static str,
    roi: &'static str,
    local: &'static str,
    no_results: &'static str,
    inputs: &'static str,
}

const ENGLISH: Labels = Labels {
    heading: "Recommended crops",
    season: "Season",
    region: "Region",
    score: "Suitability",
    investment: "Investment",
    expected_return: "Expected return",
    profit: "Profit",
    roi: "ROI",
    local: "grown in your region",
    no_results: "No eligible crops for these conditions.",
    inputs: "Inputs",
};

const HINDI: Labels = Labels {
    heading: "अनुशंसित फसलें",
    season: "मौसम",
    region: "क्षेत्र",
    score: "उपयुक्तता",
    investment: "निवेश",
    expected_return: "अपेक्षित आय",
    profit: "लाभ",
    roi: "आरओआई",
    local: "आपके क्षेत्र में उगाई जाती है",
    no_results: "इन परिस्थितियों के लिए कोई उपयुक्त फसल नहीं।",
    inputs: "इनपुट",
};

fn labels(lang: Language) -> &'static Labels {
    match lang {
        Language::En => &ENGLISH,
        Language::Hi => &HINDI,
    }
}

fn season_name(season: Season, lang: Language) -> &'static str {
    match lang {
        Language::En => season.as_str(),
        Language::Hi => season.as_hindi(),
    }
}

/// Rupee amount with Indian digit grouping, e.g. 12,34,567.
pub fn format_rupees(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (left, right) = rest.split_at(rest.len() - 2);
            parts.push(right);
            rest = left;
        }
        parts.push(rest);
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };

    if negative {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

/// Plain-text listing of ranked crops.
pub struct RecommendationReport<'a> {
    pub results: &'a [ScoredCrop],
    pub environment: &'a AssembledEnvironment,
    pub season: Season,
    pub language: Language,
    pub explain: bool,
}

impl<'a> RecommendationReport<'a> {
    pub fn new(
        results: &'a [ScoredCrop],
        environment: &'a AssembledEnvironment,
        season: Season,
    ) -> Self {
        Self {
            results,
            environment,
            season,
            language: Language::En,
            explain: false,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    pub fn render(&self) -> String {
        let l = labels(self.language);
        let mut out = String::new();
        let location = &self.environment.location;

        let _ = writeln!(out, "{}", l.heading);
        let _ = writeln!(
            out,
            "{}: {}  |  {}: {}{}",
            l.season,
            season_name(self.season, self.language),
            l.region,
            location.region,
            location
                .district
                .as_deref()
                .map(|d| format!(" ({})", d))
                .unwrap_or_default()
        );
        out.push('\n');

        if self.results.is_empty() {
            let _ = writeln!(out, "{}", l.no_results);
        }

        for (rank, result) in self.results.iter().enumerate() {
            self.render_crop(&mut out, rank + 1, result);
        }

        if self.explain {
            self.render_inputs(&mut out);
        }

        out
    }

    fn render_crop(&self, out: &mut String, rank: usize, result: &ScoredCrop) {
        let l = labels(self.language);
        let crop = &result.crop;
        let f = &result.financials;

        let local = if self.environment.location.is_known()
            && crop.grows_in(&self.environment.location.region)
        {
            format!("  [{}]", l.local)
        } else {
            String::new()
        };

        let _ = writeln!(
            out,
            "{}. {} ({})  {}: {:.0}%{}",
            rank,
            result.display_name(self.language),
            season_name(crop.season, self.language),
            l.score,
            result.score_percent(),
            local
        );
        let _ = writeln!(
            out,
            "   {}: {}  {}: {}  {}: {}  {}: {:.1}%",
            l.investment,
            format_rupees(f.total_investment()),
            l.expected_return,
            format_rupees(f.expected_return()),
            l.profit,
            format_rupees(f.profit()),
            l.roi,
            f.actual_roi()
        );
        let _ = writeln!(out, "   {}", crop.description.get(self.language));

        if self.explain {
            let b = &result.breakdown;
            let _ = writeln!(
                out,
                "   [{}] pH {:.2}  temp {:.2}  rain {:.2}  N {:.2}  P {:.2}  K {:.2}  humidity {}{}",
                b.category.as_str(),
                b.ph,
                b.temperature,
                b.rainfall,
                b.nitrogen,
                b.phosphorus,
                b.potassium,
                b.humidity
                    .map(|h| format!("{:.2}", h))
                    .unwrap_or_else(|| "-".into()),
                if b.nutrient_limited {
                    "  (nutrient limited)"
                } else {
                    ""
                }
            );
            let _ = writeln!(
                out,
                "   suitability {:.3} -> ranking score {:.3}",
                result.suitability, result.score
            );
        }
        out.push('\n');
    }

    fn render_inputs(&self, out: &mut String) {
        let l = labels(self.language);
        let input = &self.environment.input;
        let values = [
            input.nitrogen,
            input.phosphorus,
            input.potassium,
            input.temperature,
            input.humidity,
            input.ph,
            input.rainfall,
        ];

        let _ = writeln!(out, "{}:", l.inputs);
        for ((name, source), value) in self.environment.sources.entries().iter().zip(values) {
            let shown = value
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| "-".into());
            let _ = writeln!(out, "   {:<12} {:>8}  {}", name, shown, source);
        }
    }
}

/// Machine-readable form of a recommendation run, printed by `--json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub farm: &'a FarmProfile,
    pub season: Season,
    pub environment: &'a AssembledEnvironment,
    pub recommendations: &'a [ScoredCrop],
}

/// One line per catalog crop.
pub fn render_catalog(crops: &[Crop], lang: Language) -> String {
    let mut out = String::new();
    for crop in crops {
        let _ = writeln!(
            out,
            "{:<14} {:<20} {:<8} pH {:.1}-{:.1}  {:.0}-{:.0}°C  {:.0}-{:.0} mm",
            crop.id,
            crop.name.get(lang),
            season_name(crop.season, lang),
            crop.ph_range.min,
            crop.ph_range.max,
            crop.temperature_range.min,
            crop.temperature_range.max,
            crop.rainfall_range.min,
            crop.rainfall_range.max
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::data_sync::InputSources;
    use crate::logic::{RecommendationEngine, RecommendationRequest};
    use crate::models::{sample_crop, AreaUnit, DataSource, EnvironmentalInput, LocationInfo};

    fn environment(region: &str) -> AssembledEnvironment {
        AssembledEnvironment {
            input: EnvironmentalInput {
                ph: Some(6.5),
                ..Default::default()
            },
            sources: InputSources {
                nitrogen: DataSource::Default,
                phosphorus: DataSource::Default,
                potassium: DataSource::Default,
                temperature: DataSource::Default,
                humidity: DataSource::Default,
                ph: DataSource::Form,
                rainfall: DataSource::Default,
            },
            location: LocationInfo {
                pincode: "141001".into(),
                region: region.into(),
                district: Some("Ludhiana".into()),
            },
            weather: None,
            soil: None,
        }
    }

    fn ranked(env: &AssembledEnvironment) -> Vec<ScoredCrop> {
        let farm = FarmProfile::new("141001", 1.0, AreaUnit::Acre, vec![]).unwrap();
        let crops = vec![sample_crop("wheat", Season::Rabi)];
        RecommendationEngine::new().recommend(
            &crops,
            &RecommendationRequest {
                input: env.input,
                season: Some(Season::Rabi),
                farm: &farm,
            },
        )
    }

    #[test]
    fn groups_rupees_the_indian_way() {
        assert_eq!(format_rupees(0.0), "₹0");
        assert_eq!(format_rupees(999.4), "₹999");
        assert_eq!(format_rupees(25000.0), "₹25,000");
        assert_eq!(format_rupees(1234567.0), "₹12,34,567");
        assert_eq!(format_rupees(-84000.0), "-₹84,000");
    }

    #[test]
    fn renders_ranked_crops_with_region_marker() {
        let env = environment("Punjab");
        let results = ranked(&env);
        let text = RecommendationReport::new(&results, &env, Season::Rabi).render();

        assert!(text.contains("Recommended crops"));
        assert!(text.contains("1. "));
        assert!(text.contains("grown in your region"));
        assert!(text.contains("Ludhiana"));
        assert!(!text.contains("Inputs:"));
    }

    #[test]
    fn renders_hindi_labels_and_explanation() {
        let env = environment("Kerala");
        let results = ranked(&env);
        let text = RecommendationReport::new(&results, &env, Season::Rabi)
            .with_language(Language::Hi)
            .with_explain(true)
            .render();

        assert!(text.contains("अनुशंसित फसलें"));
        assert!(text.contains("रबी"));
        assert!(!text.contains("आपके क्षेत्र"));
        assert!(text.contains("suitability"));
        assert!(text.contains("Farmer Input"));
    }

    #[test]
    fn empty_results_say_so() {
        let env = environment("Unknown");
        let text = RecommendationReport::new(&[], &env, Season::Kharif).render();
        assert!(text.contains("No eligible crops"));
    }

    #[test]
    fn catalog_lists_every_crop() {
        let crops = vec![
            sample_crop("wheat", Season::Rabi),
            sample_crop("rice", Season::Kharif),
        ];
        let text = render_catalog(&crops, Language::En);
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("wheat"));
    }
}
