use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use space_weather_forecast::bulletin_error::BulletinError;
use space_weather_forecast::config::Config;
use space_weather_forecast::forecast::ForecastService;
use space_weather_forecast::input::read_bulletin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Section {
    /// Bulletin, probabilities, daily summaries and overview
    All,
    /// Kp metadata, summary, breakdown table and series
    Kp,
    /// Solar radiation storm and radio blackout probabilities
    Probabilities,
    /// Per-day summaries
    Daily,
}

#[derive(Parser)]
#[command(name = "space-weather-forecast")]
#[command(about = "Parse a NOAA 3-day space weather forecast bulletin into JSON", long_about = None)]
struct Cli {
    /// Bulletin text file; omit or pass "-" to read stdin
    input: Option<PathBuf>,

    /// Year for probability tables when the bulletin prints none
    #[arg(long, env = "BULLETIN_FALLBACK_YEAR")]
    fallback_year: Option<i32>,

    /// Part of the forecast to print
    #[arg(long, value_enum, default_value_t = Section::All)]
    section: Section,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[instrument]
fn main() -> Result<(), BulletinError> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,space_weather_forecast=info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if cli.fallback_year.is_some() {
        config.fallback_year = cli.fallback_year;
    }
    info!("Parsing bulletin with config: {:?}", config);

    let text = read_bulletin(cli.input.as_deref())?;
    let forecast = ForecastService::new(&config).build(&text);

    let output = match cli.section {
        Section::All => serde_json::to_value(&forecast)?,
        Section::Kp => serde_json::to_value(&forecast.bulletin)?,
        Section::Probabilities => serde_json::to_value(&forecast.probabilities)?,
        Section::Daily => serde_json::to_value(&forecast.daily)?,
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}
