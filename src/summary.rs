use chrono::NaiveDate;

use crate::model::{DailySummary, ForecastOverview, KpBulletin, ProbabilityForecast};

/// Ap equivalent of each integer Kp from 0 to 9
pub const AP_BY_KP: [u32; 10] = [0, 4, 7, 15, 27, 48, 80, 132, 207, 400];

/// Approximate Ap for a (possibly fractional) Kp by interpolating between
/// the neighbouring integer Kp values.
pub fn kp_to_ap(kp: f64) -> u32 {
    if !kp.is_finite() || kp <= 0.0 {
        return 0;
    }
    if kp >= 9.0 {
        return AP_BY_KP[9];
    }

    let lo = kp.floor() as usize;
    let fraction = kp - lo as f64;
    let low = AP_BY_KP[lo] as f64;
    let high = AP_BY_KP[lo + 1] as f64;
    (low + (high - low) * fraction).round() as u32
}

/// One summary per forecast day, in day order.
///
/// Days come from the Kp table; a bulletin without one falls back to the
/// probability tables' days.
pub fn daily_summaries(
    bulletin: &KpBulletin,
    probabilities: &ProbabilityForecast,
) -> Vec<DailySummary> {
    let days = if bulletin.days_iso.is_empty() {
        &probabilities.days_iso
    } else {
        &bulletin.days_iso
    };

    days.iter()
        .map(|&day| {
            let kps = kp_values_on(bulletin, day);
            let kp_mean = mean(&kps);
            DailySummary {
                day,
                kp_mean,
                kp_max: max(&kps),
                ap_estimate: kp_mean.map(kp_to_ap),
                solar_percent: probabilities.solar_by_day.get(&day).copied(),
                radio_percent: probabilities.radio_by_day.get(&day).copied(),
            }
        })
        .collect()
}

/// Peaks and mean over the whole 72-hour window
pub fn overview(bulletin: &KpBulletin, probabilities: &ProbabilityForecast) -> ForecastOverview {
    let kps: Vec<f64> = bulletin.kp_series.iter().map(|p| p.kp).collect();

    ForecastOverview {
        peak_kp: max(&kps),
        mean_kp: mean(&kps),
        peak_solar_percent: probabilities.solar_by_day.values().copied().max(),
        peak_radio_percent: probabilities.radio_by_day.values().copied().max(),
    }
}

fn kp_values_on(bulletin: &KpBulletin, day: NaiveDate) -> Vec<f64> {
    bulletin
        .kp_series
        .iter()
        .filter(|p| p.iso.date_naive() == day)
        .map(|p| p.kp)
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
