// Supplementary analysis: display snapshot, sentiment correlation, headline aggregation
pub mod correlation;
pub mod headlines;
pub mod snapshot;

pub use correlation::{sentiment_price_correlation, ImpactStrength, SentimentCorrelation};
pub use headlines::{aggregate_headlines, HeadlineSummary, MarketImpact, ScoredHeadline, ThemeSentiment};
pub use snapshot::{technical_snapshot, TechnicalSnapshot};
