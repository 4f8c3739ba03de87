use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use crate::utils::month_index;

static DAY_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{3})\s+(\d{1,2})$").unwrap());

// Bulletin metadata and prose summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletinMeta {
    pub issued: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub greatest_observed_kp: Option<f64>,
    pub greatest_expected_kp: Option<f64>,
}

/// Day column label as printed in a bulletin table header, e.g. "Oct 23".
///
/// Serializes as the label text printed in the bulletin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayLabel {
    pub text: String,
    /// Zero-based month (0 = Jan, 11 = Dec)
    pub month: u32,
    pub day: u32,
}

impl DayLabel {
    /// Parse a single column token; anything other than `<month abbr> <1-2 digit day>` is rejected
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let cap = DAY_LABEL.captures(token)?;
        let month = month_index(&cap[1])?;
        let day = cap[2].parse::<u32>().ok()?;
        Some(Self {
            text: token.to_string(),
            month,
            day,
        })
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for DayLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One 3-hour UTC block of the Kp table, printed as "00-03" ... "21-00".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HourBlock {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl fmt::Display for HourBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.start_hour, self.end_hour)
    }
}

impl Serialize for HourBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the Kp index breakdown, keyed by calendar day.
///
/// Every resolved day of the table has an entry; `None` marks a blank or
/// unparsable cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpBreakdownRow {
    pub hour_block: HourBlock,
    #[serde(flatten)]
    pub values: BTreeMap<NaiveDate, Option<f64>>,
}

impl KpBreakdownRow {
    pub fn value(&self, day: NaiveDate) -> Option<f64> {
        self.values.get(&day).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpSeriesPoint {
    /// Start of the 3-hour block
    pub iso: DateTime<Utc>,
    pub kp: f64,
    /// Column index of the day in the table header
    pub day_index: usize,
}

/// Everything the Kp parser extracts from one bulletin
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpBulletin {
    pub meta: BulletinMeta,
    pub summary: Summary,
    pub kp_breakdown: Vec<KpBreakdownRow>,
    pub days_label: Vec<DayLabel>,
    #[serde(rename = "daysISO")]
    pub days_iso: Vec<NaiveDate>,
    pub kp_series: Vec<KpSeriesPoint>,
}

/// Solar radiation storm and radio blackout probabilities, in percent per day
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityForecast {
    #[serde(rename = "daysISO")]
    pub days_iso: Vec<NaiveDate>,
    pub solar_by_day: BTreeMap<NaiveDate, u8>,
    pub radio_by_day: BTreeMap<NaiveDate, u8>,
}

// Derived per-day and 72-hour views
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub day: NaiveDate,
    pub kp_mean: Option<f64>,
    pub kp_max: Option<f64>,
    pub ap_estimate: Option<u32>,
    pub solar_percent: Option<u8>,
    pub radio_percent: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastOverview {
    pub peak_kp: Option<f64>,
    pub mean_kp: Option<f64>,
    pub peak_solar_percent: Option<u8>,
    pub peak_radio_percent: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDayForecast {
    pub bulletin: KpBulletin,
    pub probabilities: ProbabilityForecast,
    pub daily: Vec<DailySummary>,
    pub overview: ForecastOverview,
}
