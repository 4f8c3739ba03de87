// Config::from_env tests
// These mutate process environment variables, so they run serially

use serial_test::serial;
use space_weather_forecast::config::{Config, ConfigError, ScanLimits};
use std::env;

const VARS: [&str; 4] = [
    "BULLETIN_SUMMARY_WINDOW_LINES",
    "BULLETIN_DAY_HEADER_WINDOW_LINES",
    "BULLETIN_TRIPLET_WINDOW_LINES",
    "BULLETIN_FALLBACK_YEAR",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_when_unset() {
    clear_env();

    let config = Config::from_env().unwrap();
    assert_eq!(config.scan_limits, ScanLimits::default());
    assert_eq!(config.fallback_year, None);
}

#[test]
#[serial]
fn test_overrides_from_env() {
    clear_env();
    env::set_var("BULLETIN_SUMMARY_WINDOW_LINES", "80");
    env::set_var("BULLETIN_DAY_HEADER_WINDOW_LINES", " 4 ");
    env::set_var("BULLETIN_TRIPLET_WINDOW_LINES", "12");
    env::set_var("BULLETIN_FALLBACK_YEAR", "2025");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.scan_limits.summary_window, 80);
    assert_eq!(config.scan_limits.day_header_window, 4);
    assert_eq!(config.scan_limits.triplet_window, 12);
    assert_eq!(config.fallback_year, Some(2025));
}

#[test]
#[serial]
fn test_invalid_window_rejected() {
    clear_env();
    env::set_var("BULLETIN_TRIPLET_WINDOW_LINES", "lots");

    let result = Config::from_env();
    clear_env();

    assert_eq!(
        result,
        Err(ConfigError::InvalidValue {
            var: "BULLETIN_TRIPLET_WINDOW_LINES",
            value: "lots".to_string(),
        })
    );
}

#[test]
#[serial]
fn test_zero_window_rejected() {
    clear_env();
    env::set_var("BULLETIN_SUMMARY_WINDOW_LINES", "0");

    let result = Config::from_env();
    clear_env();

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            var: "BULLETIN_SUMMARY_WINDOW_LINES",
            ..
        })
    ));
}

#[test]
#[serial]
fn test_invalid_fallback_year_rejected() {
    clear_env();
    env::set_var("BULLETIN_FALLBACK_YEAR", "25");

    let result = Config::from_env();
    clear_env();

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Invalid value for BULLETIN_FALLBACK_YEAR: \"25\"");
}

#[test]
#[serial]
fn test_empty_value_treated_as_unset() {
    clear_env();
    env::set_var("BULLETIN_DAY_HEADER_WINDOW_LINES", "");
    env::set_var("BULLETIN_FALLBACK_YEAR", "   ");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.scan_limits.day_header_window, 10);
    assert_eq!(config.fallback_year, None);
}
