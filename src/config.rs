use std::env;

pub const DEFAULT_SUMMARY_WINDOW_LINES: usize = 60;
pub const DEFAULT_DAY_HEADER_WINDOW_LINES: usize = 10;
pub const DEFAULT_TRIPLET_WINDOW_LINES: usize = 20;

/// Lookahead windows, in lines, for the bounded scan phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Lines of section "A." prose searched for the greatest observed/expected Kp
    pub summary_window: usize,
    /// Lines after a probability section header searched for its day-label row
    pub day_header_window: usize,
    /// Lines after a probability section header searched for a percentage triplet
    pub triplet_window: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            summary_window: DEFAULT_SUMMARY_WINDOW_LINES,
            day_header_window: DEFAULT_DAY_HEADER_WINDOW_LINES,
            triplet_window: DEFAULT_TRIPLET_WINDOW_LINES,
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub scan_limits: ScanLimits,
    pub fallback_year: Option<i32>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            scan_limits: ScanLimits {
                summary_window: window_from_env(
                    "BULLETIN_SUMMARY_WINDOW_LINES",
                    DEFAULT_SUMMARY_WINDOW_LINES,
                )?,
                day_header_window: window_from_env(
                    "BULLETIN_DAY_HEADER_WINDOW_LINES",
                    DEFAULT_DAY_HEADER_WINDOW_LINES,
                )?,
                triplet_window: window_from_env(
                    "BULLETIN_TRIPLET_WINDOW_LINES",
                    DEFAULT_TRIPLET_WINDOW_LINES,
                )?,
            },
            fallback_year: year_from_env("BULLETIN_FALLBACK_YEAR")?,
        })
    }
}

/// Unset or empty variables are treated as absent
fn non_empty_var(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn window_from_env(var: &'static str, default: usize) -> Result<usize, ConfigError> {
    let Some(value) = non_empty_var(var) else {
        return Ok(default);
    };
    match value.trim().parse::<usize>() {
        Ok(lines) if lines > 0 => Ok(lines),
        _ => Err(ConfigError::InvalidValue { var, value }),
    }
}

fn year_from_env(var: &'static str) -> Result<Option<i32>, ConfigError> {
    let Some(value) = non_empty_var(var) else {
        return Ok(None);
    };
    match value.trim().parse::<i32>() {
        Ok(year) if (1000..=9999).contains(&year) => Ok(Some(year)),
        _ => Err(ConfigError::InvalidValue { var, value }),
    }
}
