use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use marketsense::analysis::{sentiment_price_correlation, technical_snapshot, TechnicalSnapshot};
use marketsense::backtest::{MarketScenario, SyntheticDataGenerator, WalkForwardRunner};
use marketsense::indicators::calculate_macd;
use marketsense::{
    closes, combine_predictions, load_config, EngineConfig, Prediction, PredictionRequest,
    RegimeDetector, SentimentPredictor, TechnicalPredictor,
};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marketsense")]
#[command(about = "Technical and sentiment price prediction", long_about = None)]
struct Cli {
    /// TOML configuration file (MARKETSENSE_* environment variables override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Technical, sentiment and combined predictions
    Predict {
        /// Request JSON file, or - for stdin
        #[arg(short, long)]
        input: PathBuf,
        /// Prediction horizon in days
        #[arg(short, long)]
        days: Option<u32>,
        /// Issue date (defaults to the last price date)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Classify the market regime
    Regime {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Latest indicator readings
    Indicators {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Correlation between sentiment and daily price changes
    Correlation {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Emit a synthetic request document
    Simulate {
        /// uptrend, downtrend, sideways or volatile
        #[arg(short, long, default_value = "uptrend")]
        scenario: MarketScenario,
        /// Trading days to generate
        #[arg(short, long, default_value_t = 120)]
        points: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value = "SYNTH")]
        ticker: String,
        /// First calendar day of the series
        #[arg(long, default_value = "2024-01-01")]
        start: NaiveDate,
    },
    /// Walk-forward accuracy of the technical predictor
    Backtest {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        days: Option<u32>,
        /// Points between successive predictions
        #[arg(short, long, default_value_t = 5)]
        step: usize,
    },
}

#[derive(Serialize)]
struct PredictResponse {
    ticker: String,
    technical: Prediction,
    #[serde(skip_serializing_if = "Option::is_none")]
    sentiment: Option<Prediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    combined: Option<Prediction>,
}

#[derive(Serialize)]
struct MacdReading {
    macd: f64,
    signal: f64,
    histogram: f64,
}

#[derive(Serialize)]
struct IndicatorsResponse {
    ticker: String,
    #[serde(flatten)]
    snapshot: TechnicalSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    macd: Option<MacdReading>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    setup_logging(&config.log_filter);

    match cli.command {
        Commands::Predict { input, days, as_of } => {
            let request = read_request(&input)?;
            let days = days.unwrap_or(config.default_days_ahead);
            print_json(&predict(&config, &request, days, as_of)?)
        }
        Commands::Regime { input } => {
            let request = read_request(&input)?;
            let detector = RegimeDetector::new(config.regime.clone());
            let result = detector
                .detect(&request.price_data)
                .with_context(|| format!("regime detection failed for {}", request.ticker))?;
            print_json(&result)
        }
        Commands::Indicators { input } => {
            let request = read_request(&input)?;
            print_json(&indicators(&request)?)
        }
        Commands::Correlation { input } => {
            let request = read_request(&input)?;
            let correlation =
                sentiment_price_correlation(&request.price_data, &request.sentiment_data)
                    .with_context(|| format!("correlation failed for {}", request.ticker))?;
            print_json(&correlation)
        }
        Commands::Simulate {
            scenario,
            points,
            seed,
            ticker,
            start,
        } => {
            let mut generator = SyntheticDataGenerator::new(seed);
            let price_data = generator.generate(scenario, start, points);
            let sentiment_data = generator.generate_sentiment(&price_data);

            tracing::info!(
                "Generated {} {} points for {} (seed {})",
                price_data.len(),
                scenario,
                ticker,
                seed
            );

            print_json(&PredictionRequest {
                ticker,
                price_data,
                sentiment_data,
            })
        }
        Commands::Backtest { input, days, step } => {
            let request = read_request(&input)?;
            let days = days.unwrap_or(config.default_days_ahead);
            let runner = WalkForwardRunner::new(
                TechnicalPredictor::new(config.technical.clone()),
                days,
                step,
            );
            let report = runner
                .run(&request.ticker, &request.price_data)
                .with_context(|| format!("walk-forward replay failed for {}", request.ticker))?;
            print_json(&report)
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn predict(
    config: &EngineConfig,
    request: &PredictionRequest,
    days: u32,
    as_of: Option<NaiveDate>,
) -> anyhow::Result<PredictResponse> {
    let Some(as_of) = as_of.or_else(|| request.price_data.last().map(|p| p.date)) else {
        bail!("price_data for {} is empty", request.ticker);
    };

    let technical = TechnicalPredictor::new(config.technical.clone())
        .predict(&request.ticker, &request.price_data, as_of, days)
        .with_context(|| format!("technical prediction failed for {}", request.ticker))?;

    let sentiment = if request.sentiment_data.is_empty() {
        None
    } else {
        match SentimentPredictor::new(config.sentiment.clone()).predict(
            &request.ticker,
            &request.price_data,
            &request.sentiment_data,
            as_of,
            days,
        ) {
            Ok(prediction) => Some(prediction),
            Err(e) => {
                tracing::warn!("Skipping sentiment prediction for {}: {}", request.ticker, e);
                None
            }
        }
    };

    let combined = match &sentiment {
        Some(sentiment) => Some(combine_predictions(&technical, sentiment)?),
        None => None,
    };

    Ok(PredictResponse {
        ticker: request.ticker.clone(),
        technical,
        sentiment,
        combined,
    })
}

fn indicators(request: &PredictionRequest) -> anyhow::Result<IndicatorsResponse> {
    let prices = closes(&request.price_data);
    let snapshot = technical_snapshot(&prices)
        .with_context(|| format!("no prices for {}", request.ticker))?;

    let series = calculate_macd(&prices);
    let macd = match (
        series.macd_line.last(),
        series.signal_line.last(),
        series.histogram.last(),
    ) {
        (Some(&macd), Some(&signal), Some(&histogram)) => Some(MacdReading {
            macd,
            signal,
            histogram,
        }),
        _ => None,
    };

    Ok(IndicatorsResponse {
        ticker: request.ticker.clone(),
        snapshot,
        macd,
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

fn setup_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_request(path: &Path) -> anyhow::Result<PredictionRequest> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read request from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    let request: PredictionRequest =
        serde_json::from_str(&raw).context("request is not a valid prediction request")?;

    tracing::debug!(
        "Loaded {} prices and {} sentiment points for {}",
        request.price_data.len(),
        request.sentiment_data.len(),
        request.ticker
    );

    Ok(request)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialise output")?;
    println!("{}", json);
    Ok(())
}
