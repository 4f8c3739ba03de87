use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

use crate::clock::{Clock, SystemClock};
use crate::config::ScanLimits;
use crate::model::ProbabilityForecast;
use crate::parser::day_header::{day_labels, resolve_day_columns, MAX_DAY_COLUMNS};
use crate::parser::lines::{BulletinLines, ScanPhase};
use crate::utils::{clamp_percentage, trailing_year};

static SOLAR_S1_OR_GREATER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)S1\s*or\s*greater\s+(\d{1,3})\s*%\s+(\d{1,3})\s*%\s+(\d{1,3})\s*%").unwrap()
});
static RADIO_R1_R2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)R1\s*-\s*R2\s+(\d{1,3})\s*%\s+(\d{1,3})\s*%\s+(\d{1,3})\s*%").unwrap()
});
static RADIO_R3_OR_GREATER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)R3\s*or\s*greater\s+(\d{1,3})\s*%\s+(\d{1,3})\s*%\s+(\d{1,3})\s*%").unwrap()
});
static ANY_PERCENT_TRIPLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3})\s*%\s+(\d{1,3})\s*%\s+(\d{1,3})\s*%").unwrap()
});

type DayTriple = [NaiveDate; MAX_DAY_COLUMNS];
type PercentTriple = [u8; MAX_DAY_COLUMNS];

/// Probability tables of the 3-day forecast bulletin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbabilitySection {
    SolarRadiationStorm,
    RadioBlackout,
}

impl ProbabilitySection {
    fn phase(self) -> ScanPhase {
        match self {
            ProbabilitySection::SolarRadiationStorm => ScanPhase::SeekSolarSection,
            ProbabilitySection::RadioBlackout => ScanPhase::SeekRadioSection,
        }
    }

    /// Row patterns from most to least specific
    fn triplet_patterns(self) -> Vec<&'static Regex> {
        match self {
            ProbabilitySection::SolarRadiationStorm => {
                vec![&*SOLAR_S1_OR_GREATER, &*ANY_PERCENT_TRIPLET]
            }
            ProbabilitySection::RadioBlackout => vec![
                &*RADIO_R1_R2,
                &*RADIO_R3_OR_GREATER,
                &*ANY_PERCENT_TRIPLET,
            ],
        }
    }
}

impl fmt::Display for ProbabilitySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbabilitySection::SolarRadiationStorm => write!(f, "solar radiation storm"),
            ProbabilitySection::RadioBlackout => write!(f, "radio blackout"),
        }
    }
}

/// What one probability section yielded on its own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SectionScan {
    days: Option<DayTriple>,
    percentages: Option<PercentTriple>,
}

/// Parser for the solar radiation storm and radio blackout forecast tables.
#[derive(Debug, Clone)]
pub struct ProbabilityParser<C = SystemClock> {
    limits: ScanLimits,
    clock: C,
}

impl ProbabilityParser<SystemClock> {
    pub fn new(limits: ScanLimits) -> Self {
        Self::with_clock(limits, SystemClock)
    }
}

impl Default for ProbabilityParser<SystemClock> {
    fn default() -> Self {
        Self::new(ScanLimits::default())
    }
}

impl<C: Clock> ProbabilityParser<C> {
    pub fn with_clock(limits: ScanLimits, clock: C) -> Self {
        Self { limits, clock }
    }

    /// Parse both probability sections.
    ///
    /// Each section is keyed by its own day header when it has one, else by
    /// the other section's header, else by `hinted_days` (used only when it
    /// holds exactly three days). A section with no percentage row, or with
    /// no days to key it by, yields an empty map.
    #[instrument(skip(self, text, hinted_days), fields(text_len = text.len()))]
    pub fn parse(
        &self,
        text: &str,
        fallback_year: Option<i32>,
        hinted_days: &[NaiveDate],
    ) -> ProbabilityForecast {
        let lines = BulletinLines::new(text);

        let solar = self.scan_section(&lines, ProbabilitySection::SolarRadiationStorm, fallback_year);
        let radio = self.scan_section(&lines, ProbabilitySection::RadioBlackout, fallback_year);

        let hint = DayTriple::try_from(hinted_days).ok();
        if hint.is_none() && !hinted_days.is_empty() {
            debug!(
                "Ignoring {} hinted days, exactly {} are required",
                hinted_days.len(),
                MAX_DAY_COLUMNS
            );
        }

        let solar_by_day = key_by_days(solar.percentages, solar.days.or(radio.days).or(hint));
        let radio_by_day = key_by_days(radio.percentages, radio.days.or(solar.days).or(hint));
        let days_iso = solar
            .days
            .or(radio.days)
            .or(hint)
            .map(Vec::from)
            .unwrap_or_default();

        info!(
            "Parsed probabilities: {} days, {} solar, {} radio",
            days_iso.len(),
            solar_by_day.len(),
            radio_by_day.len()
        );

        ProbabilityForecast {
            days_iso,
            solar_by_day,
            radio_by_day,
        }
    }

    fn scan_section(
        &self,
        lines: &BulletinLines,
        section: ProbabilitySection,
        fallback_year: Option<i32>,
    ) -> SectionScan {
        let Some(header_idx) = lines.seek(section.phase()) else {
            debug!("No {} forecast section", section);
            return SectionScan::default();
        };

        let scan = SectionScan {
            days: self.local_days(lines, header_idx, fallback_year),
            percentages: self.find_percentages(lines, header_idx, section),
        };
        debug!("{} section at line {}: {:?}", section, header_idx, scan);
        scan
    }

    /// The section's own day-label row, if one appears within the window.
    ///
    /// Only the first line with three labels is considered; if one of its
    /// labels is not a real date the section has no local days.
    fn local_days(
        &self,
        lines: &BulletinLines,
        header_idx: usize,
        fallback_year: Option<i32>,
    ) -> Option<DayTriple> {
        let header = lines.get(header_idx).unwrap_or_default();

        for (idx, line) in lines.window(header_idx, self.limits.day_header_window) {
            let labels = day_labels(line);
            if labels.len() < MAX_DAY_COLUMNS {
                continue;
            }

            let year = trailing_year(header)
                .or_else(|| trailing_year(line))
                .or(fallback_year)
                .unwrap_or_else(|| self.clock.current_year());
            let columns = resolve_day_columns(&labels[..MAX_DAY_COLUMNS], year);
            debug!(
                phase = %ScanPhase::ParseHeader,
                line = idx,
                "Day header resolved to {} days in {}",
                columns.len(),
                year
            );

            let days: Vec<NaiveDate> = columns.iter().map(|c| c.day).collect();
            return DayTriple::try_from(days.as_slice()).ok();
        }

        None
    }

    /// First row matching the most specific pattern that matches anywhere in the window
    fn find_percentages(
        &self,
        lines: &BulletinLines,
        header_idx: usize,
        section: ProbabilitySection,
    ) -> Option<PercentTriple> {
        section.triplet_patterns().into_iter().find_map(|pattern| {
            lines
                .window(header_idx, self.limits.triplet_window)
                .find_map(|(_, line)| percent_triplet(pattern, line))
        })
    }
}

fn percent_triplet(pattern: &Regex, line: &str) -> Option<PercentTriple> {
    let cap = pattern.captures(line)?;
    let mut triple = [0u8; MAX_DAY_COLUMNS];
    for (slot, group) in triple.iter_mut().zip(1..=MAX_DAY_COLUMNS) {
        let raw = cap.get(group)?.as_str().parse::<i64>().ok()?;
        *slot = clamp_percentage(raw);
    }
    Some(triple)
}

fn key_by_days(
    percentages: Option<PercentTriple>,
    days: Option<DayTriple>,
) -> BTreeMap<NaiveDate, u8> {
    match (percentages, days) {
        (Some(percentages), Some(days)) => days.into_iter().zip(percentages).collect(),
        _ => BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn parser() -> ProbabilityParser<FixedClock> {
        ProbabilityParser::with_clock(ScanLimits::default(), FixedClock(2030))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_percent_triplet_clamps() {
        assert_eq!(
            percent_triplet(&ANY_PERCENT_TRIPLET, "150%  5%  42%"),
            Some([100, 5, 42])
        );
    }

    #[test]
    fn test_percent_triplet_labeled_rows() {
        assert_eq!(
            percent_triplet(&SOLAR_S1_OR_GREATER, "S1 or greater    1%      1%      1%"),
            Some([1, 1, 1])
        );
        assert_eq!(
            percent_triplet(&RADIO_R1_R2, "R1-R2           15%           15%           10%"),
            Some([15, 15, 10])
        );
        assert_eq!(
            percent_triplet(&RADIO_R3_OR_GREATER, "R3 or greater    1%            1%            1%"),
            Some([1, 1, 1])
        );
        assert_eq!(percent_triplet(&RADIO_R1_R2, "R3 or greater  1%  1%  1%"), None);
    }

    #[test]
    fn test_percent_triplet_needs_three_values() {
        assert_eq!(percent_triplet(&ANY_PERCENT_TRIPLET, "S1 or greater  1%  1%"), None);
    }

    #[test]
    fn test_key_by_days_requires_both() {
        let days = [date(2025, 10, 23), date(2025, 10, 24), date(2025, 10, 25)];
        assert!(key_by_days(None, Some(days)).is_empty());
        assert!(key_by_days(Some([1, 2, 3]), None).is_empty());

        let keyed = key_by_days(Some([1, 2, 3]), Some(days));
        assert_eq!(keyed.get(&date(2025, 10, 24)), Some(&2));
    }

    #[test]
    fn test_radio_prefers_r1_r2_over_r3() {
        let text = "Radio Blackout Forecast for Oct 23-Oct 25 2025\n\
                    \n\
                    Oct 23        Oct 24        Oct 25\n\
                    R3 or greater    1%            1%            1%\n\
                    R1-R2           15%           15%           10%\n";
        let result = parser().parse(text, None, &[]);
        assert_eq!(result.radio_by_day.get(&date(2025, 10, 25)), Some(&10));
    }

    #[test]
    fn test_section_year_from_header_line() {
        let text = "Solar Radiation Storm Forecast for Dec 31-Jan 02 2025\n\
                    \n\
                    Dec 31  Jan 01  Jan 02\n\
                    S1 or greater    5%      5%      5%\n";
        let result = parser().parse(text, Some(1999), &[]);
        assert_eq!(
            result.days_iso,
            vec![date(2025, 12, 31), date(2026, 1, 1), date(2026, 1, 2)]
        );
    }

    #[test]
    fn test_section_year_from_fallback_then_clock() {
        let text = "Solar Radiation Storm Forecast\n\
                    Oct 23  Oct 24  Oct 25\n\
                    S1 or greater    5%      5%      5%\n";
        assert_eq!(parser().parse(text, Some(2024), &[]).days_iso[0], date(2024, 10, 23));
        assert_eq!(parser().parse(text, None, &[]).days_iso[0], date(2030, 10, 23));
    }

    #[test]
    fn test_day_header_outside_window_is_ignored() {
        let limits = ScanLimits {
            day_header_window: 2,
            ..ScanLimits::default()
        };
        let parser = ProbabilityParser::with_clock(limits, FixedClock(2030));
        let text = "Solar Radiation Storm Forecast 2025\n\
                    \n\
                    \n\
                    Oct 23  Oct 24  Oct 25\n\
                    S1 or greater    5%      5%      5%\n";
        let result = parser.parse(text, None, &[]);
        assert!(result.days_iso.is_empty());
        assert!(result.solar_by_day.is_empty());
    }

    #[test]
    fn test_impossible_day_label_leaves_section_without_days() {
        let text = "Solar Radiation Storm Forecast for Feb 28-Mar 02 2025\n\
                    Feb 28  Feb 30  Mar 01\n\
                    Feb 28  Mar 01  Mar 02\n\
                    S1 or greater    5%      5%      5%\n";
        let hint = [date(2025, 2, 28), date(2025, 3, 1), date(2025, 3, 2)];
        let result = parser().parse(text, None, &hint);
        assert_eq!(result.days_iso, hint.to_vec());
        assert_eq!(result.solar_by_day.get(&date(2025, 3, 2)), Some(&5));
    }

    #[test]
    fn test_radio_keyed_by_solar_days_when_it_has_none() {
        let text = "Solar Radiation Storm Forecast for Oct 23-Oct 25 2025\n\
                    Oct 23  Oct 24  Oct 25\n\
                    S1 or greater    1%      1%      1%\n\
                    \n\
                    Radio Blackout Forecast\n\
                    R1-R2           15%           15%           10%\n";
        let result = parser().parse(text, None, &[]);
        assert_eq!(result.radio_by_day.len(), 3);
        assert_eq!(result.radio_by_day.get(&date(2025, 10, 23)), Some(&15));
    }

    #[test]
    fn test_wrong_sized_hint_is_ignored() {
        let text = "Solar Radiation Storm Forecast\nS1 or greater 1% 1% 1%\n";
        let result = parser().parse(text, None, &[date(2025, 10, 23)]);
        assert!(result.days_iso.is_empty());
        assert!(result.solar_by_day.is_empty());
    }

    #[test]
    fn test_no_sections() {
        let result = parser().parse("nothing to see", Some(2025), &[]);
        assert_eq!(result, ProbabilityForecast::default());
    }
}
