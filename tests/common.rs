// Shared fixtures for bulletin parsing tests
#![allow(dead_code)]

use chrono::NaiveDate;
use space_weather_forecast::clock::FixedClock;
use space_weather_forecast::config::ScanLimits;
use space_weather_forecast::parser::{KpBulletinParser, ProbabilityParser};

pub const SAMPLE_BULLETIN: &str = include_str!("../sample-data-files/3-day-forecast.txt");
pub const ROLLOVER_BULLETIN: &str =
    include_str!("../sample-data-files/3-day-forecast-rollover.txt");

/// Year reported by the fixed clock; chosen so it never matches a fixture year
pub const CLOCK_YEAR: i32 = 2031;

pub fn kp_parser() -> KpBulletinParser<FixedClock> {
    KpBulletinParser::with_clock(ScanLimits::default(), FixedClock(CLOCK_YEAR))
}

pub fn probability_parser() -> ProbabilityParser<FixedClock> {
    ProbabilityParser::with_clock(ScanLimits::default(), FixedClock(CLOCK_YEAR))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn iso_days(days: &[NaiveDate]) -> Vec<String> {
    days.iter().map(|d| d.to_string()).collect()
}
