use tracing::{debug, instrument};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::model::ThreeDayForecast;
use crate::parser::{KpBulletinParser, ProbabilityParser};
use crate::summary::{daily_summaries, overview};
use crate::utils::leading_year;

/// Runs both bulletin parsers and derives the per-day summaries.
///
/// The Kp parser runs first; its day keys are hinted to the probability
/// parser, and the year of the `:Issued:` line (else the configured fallback
/// year) is used for probability tables that print no year.
#[derive(Debug, Clone)]
pub struct ForecastService<C = SystemClock> {
    kp_parser: KpBulletinParser<C>,
    probability_parser: ProbabilityParser<C>,
    fallback_year: Option<i32>,
}

impl ForecastService<SystemClock> {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock + Clone> ForecastService<C> {
    pub fn with_clock(config: &Config, clock: C) -> Self {
        Self {
            kp_parser: KpBulletinParser::with_clock(config.scan_limits, clock.clone()),
            probability_parser: ProbabilityParser::with_clock(config.scan_limits, clock),
            fallback_year: config.fallback_year,
        }
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn build(&self, text: &str) -> ThreeDayForecast {
        let bulletin = self.kp_parser.parse(text);

        let fallback_year = bulletin
            .meta
            .issued
            .as_deref()
            .and_then(leading_year)
            .or(self.fallback_year);
        debug!("Probability fallback year: {:?}", fallback_year);

        let probabilities = self
            .probability_parser
            .parse(text, fallback_year, &bulletin.days_iso);

        let daily = daily_summaries(&bulletin, &probabilities);
        let overview = overview(&bulletin, &probabilities);

        ThreeDayForecast {
            bulletin,
            probabilities,
            daily,
            overview,
        }
    }
}
