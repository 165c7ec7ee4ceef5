use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `MARKETSENSE_TECHNICAL__MIN_POINTS=40`
pub const ENV_PREFIX: &str = "MARKETSENSE";

/// Windows and gates of the technical predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalConfig {
    pub short_ma_period: usize,
    pub long_ma_period: usize,
    pub momentum_period: usize,
    pub volatility_period: usize,
    pub trend_period: usize,
    pub min_points: usize,
}

impl Default for TechnicalConfig {
    fn default() -> Self {
        Self {
            short_ma_period: 5,
            long_ma_period: 20,
            momentum_period: 10,
            volatility_period: 20,
            trend_period: 10,
            min_points: 30,
        }
    }
}

/// Windows and gates of the sentiment predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Most recent sentiment points considered
    pub window: usize,
    pub min_price_points: usize,
    pub min_sentiment_points: usize,
    /// |average sentiment| above this is directional
    pub signal_threshold: f64,
    /// News count at which the volume bonus saturates
    pub news_saturation: u32,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            window: 10,
            min_price_points: 10,
            min_sentiment_points: 5,
            signal_threshold: 0.2,
            news_saturation: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    pub min_points: usize,
    pub short_ma_period: usize,
    pub long_ma_period: usize,
    pub volatility_period: usize,
    /// 30-period move required for a bull/bear call
    pub trend_threshold: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            min_points: 60,
            short_ma_period: 20,
            long_ma_period: 50,
            volatility_period: 30,
            trend_threshold: 0.05,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub technical: TechnicalConfig,
    pub sentiment: SentimentConfig,
    pub regime: RegimeConfig,
    /// Prediction horizon when the caller does not pass one
    pub default_days_ahead: u32,
    /// `tracing_subscriber` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            technical: TechnicalConfig::default(),
            sentiment: SentimentConfig::default(),
            regime: RegimeConfig::default(),
            default_days_ahead: 7,
            log_filter: "marketsense=info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Reject window and period settings of 0
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let windows = [
            ("technical.short_ma_period", self.technical.short_ma_period),
            ("technical.long_ma_period", self.technical.long_ma_period),
            ("technical.momentum_period", self.technical.momentum_period),
            ("technical.volatility_period", self.technical.volatility_period),
            ("technical.trend_period", self.technical.trend_period),
            ("sentiment.window", self.sentiment.window),
            ("regime.short_ma_period", self.regime.short_ma_period),
            ("regime.long_ma_period", self.regime.long_ma_period),
            ("regime.volatility_period", self.regime.volatility_period),
        ];

        match windows.iter().find(|(_, value)| *value == 0) {
            Some((key, _)) => Err(config::ConfigError::Message(format!(
                "{} must be at least 1",
                key
            ))),
            None => Ok(()),
        }
    }
}

/// Load configuration: built-in defaults, then an optional TOML file, then
/// `MARKETSENSE_*` environment variables (`__` separates sections)
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, config::ConfigError> {
    let mut builder =
        config::Config::builder().add_source(config::Config::try_from(&EngineConfig::default())?);

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let engine: EngineConfig = settings.try_deserialize()?;
    engine.validate()?;
    Ok(engine)
}
