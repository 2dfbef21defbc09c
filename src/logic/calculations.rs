use crate::models::{Crop, FarmProfile, Financials, Season};
use chrono::{Datelike, NaiveDate};

/// Sowing season in effect on `date`.
pub fn season_on(date: NaiveDate) -> Season {
    Season::from_month(date.month())
}

/// Season for today's local date. Callers derive this once per request.
pub fn current_season() -> Season {
    season_on(chrono::Local::now().date_naive())
}

/// True if `crop` was grown recently and should be rotated out.
pub fn recently_grown(crop: &Crop, previous_crops: &[String]) -> bool {
    previous_crops.iter().any(|name| crop.matches_name(name))
}

/// Money projection for the whole farm, after converting its area to acres.
pub fn project_for_farm(crop: &Crop, farm: &FarmProfile) -> Financials {
    Financials::project(crop, farm.area_in_acres())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_crop, AreaUnit};
    use approx::assert_relative_eq;

    #[test]
    fn season_follows_calendar() {
        let kharif = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let rabi = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();
        let march = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let april = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();

        assert_eq!(season_on(kharif), Season::Kharif);
        assert_eq!(season_on(rabi), Season::Rabi);
        assert_eq!(season_on(march), Season::Rabi);
        assert_eq!(season_on(april), Season::Kharif);
    }

    #[test]
    fn rotation_matches_case_insensitively() {
        let crop = sample_crop("wheat", Season::Rabi);
        assert!(recently_grown(&crop, &["Rice".into(), "WHEAT".into()]));
        assert!(!recently_grown(&crop, &["rice".into()]));
        assert!(!recently_grown(&crop, &[]));
    }

    #[test]
    fn hectares_scale_financials_by_conversion_factor() {
        let crop = sample_crop("wheat", Season::Rabi);
        for area in [0.5, 1.0, 2.0, 3.7] {
            let acres = FarmProfile::new("110001", area, AreaUnit::Acre, vec![]).unwrap();
            let hectares = FarmProfile::new("110001", area, AreaUnit::Hectare, vec![]).unwrap();

            let a = project_for_farm(&crop, &acres);
            let h = project_for_farm(&crop, &hectares);

            assert_relative_eq!(
                h.total_investment(),
                a.total_investment() * 2.47,
                max_relative = 1e-12
            );
            assert_relative_eq!(
                h.expected_return(),
                a.expected_return() * 2.47,
                max_relative = 1e-12
            );
            assert_relative_eq!(h.profit(), a.profit() * 2.47, max_relative = 1e-12);
            assert_relative_eq!(h.actual_roi(), a.actual_roi(), max_relative = 1e-12);
        }
    }
}
