use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::SentimentPoint;
use crate::utils::{mean, round_dp};

/// Headlines considered per aggregation
const MAX_HEADLINES: usize = 20;
const POSITIVE_THRESHOLD: f64 = 0.2;
const IMPACT_THRESHOLD: f64 = 0.1;
const HEADLINES_PER_THEME: usize = 3;
const MAX_THEMES: usize = 5;

const THEME_KEYWORDS: &[(&str, &[&str])] = &[
    ("Earnings", &["earnings", "profit", "revenue", "sales"]),
    ("Partnerships", &["partnership", "deal", "acquisition", "merger"]),
    ("Regulation", &["regulation", "regulatory", "compliance", "sec"]),
    ("Innovation", &["innovation", "technology", "ai", "digital"]),
    ("Market", &["market", "trading", "volatility", "price"]),
];

/// A headline already scored by the external sentiment model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHeadline {
    pub headline: String,
    /// In [-1, 1]
    pub sentiment_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketImpact {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSentiment {
    pub theme: String,
    pub sentiment: f64,
}

/// One day of headlines reduced to counts, themes and an overall score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineSummary {
    pub date: NaiveDate,
    pub overall_sentiment: f64,
    pub total_headlines: usize,
    pub processed_headlines: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub market_impact: MarketImpact,
    pub positive_summary: Vec<String>,
    pub negative_summary: Vec<String>,
    pub key_themes: Vec<ThemeSentiment>,
}

impl HeadlineSummary {
    /// Daily sentiment point for the sentiment predictor
    pub fn to_sentiment_point(&self) -> SentimentPoint {
        SentimentPoint::new(
            self.date,
            self.overall_sentiment.clamp(-1.0, 1.0),
            self.processed_headlines as u32,
        )
    }
}

/// Aggregate a day's scored headlines
///
/// Counts and the overall score read only the first 20 headlines; themes
/// scan every headline. Blank headlines and non-finite scores are skipped.
pub fn aggregate_headlines(date: NaiveDate, headlines: &[ScoredHeadline]) -> HeadlineSummary {
    let is_usable =
        |h: &&ScoredHeadline| !h.headline.trim().is_empty() && h.sentiment_score.is_finite();

    let usable: Vec<&ScoredHeadline> = headlines.iter().filter(is_usable).collect();
    let processed: Vec<&ScoredHeadline> =
        headlines.iter().take(MAX_HEADLINES).filter(is_usable).collect();

    let scores: Vec<f64> = processed.iter().map(|h| h.sentiment_score).collect();
    let overall = mean(&scores);

    let positive_count = scores.iter().filter(|s| **s > POSITIVE_THRESHOLD).count();
    let negative_count = scores.iter().filter(|s| **s < -POSITIVE_THRESHOLD).count();

    let market_impact = if overall > IMPACT_THRESHOLD {
        MarketImpact::Positive
    } else if overall < -IMPACT_THRESHOLD {
        MarketImpact::Negative
    } else {
        MarketImpact::Neutral
    };

    HeadlineSummary {
        date,
        overall_sentiment: round_dp(overall, 3),
        total_headlines: headlines.len(),
        processed_headlines: processed.len(),
        positive_count,
        negative_count,
        neutral_count: processed.len() - positive_count - negative_count,
        market_impact,
        positive_summary: positive_summary(positive_count),
        negative_summary: negative_summary(negative_count),
        key_themes: key_themes(&usable),
    }
}

fn positive_summary(positive_count: usize) -> Vec<String> {
    if positive_count == 0 {
        return Vec::new();
    }
    vec![
        format!("Strong positive sentiment detected in {} headlines", positive_count),
        "Market optimism reflected in recent news coverage".to_string(),
        "Favorable developments supporting bullish outlook".to_string(),
    ]
}

fn negative_summary(negative_count: usize) -> Vec<String> {
    if negative_count == 0 {
        return Vec::new();
    }
    vec![
        format!("Negative sentiment identified in {} headlines", negative_count),
        "Market concerns reflected in recent coverage".to_string(),
    ]
}

fn key_themes(headlines: &[&ScoredHeadline]) -> Vec<ThemeSentiment> {
    THEME_KEYWORDS
        .iter()
        .filter_map(|(theme, keywords)| {
            let scores: Vec<f64> = headlines
                .iter()
                .filter(|h| mentions_any(&h.headline, keywords))
                .take(HEADLINES_PER_THEME)
                .map(|h| h.sentiment_score)
                .collect();

            if scores.is_empty() {
                return None;
            }

            Some(ThemeSentiment {
                theme: theme.to_string(),
                sentiment: round_dp(mean(&scores), 2),
            })
        })
        .take(MAX_THEMES)
        .collect()
}

/// Whole-word, case-insensitive keyword match
fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|word| word.to_lowercase())
        .any(|word| keywords.contains(&word.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(headline: &str, score: f64) -> ScoredHeadline {
        ScoredHeadline {
            headline: headline.to_string(),
            sentiment_score: score,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    }

    #[test]
    fn test_aggregate_counts_and_impact() {
        let headlines = vec![
            scored("Apple beats earnings expectations", 0.8),
            scored("Apple announces AI partnership", 0.5),
            scored("Analysts split on outlook", 0.0),
            scored("Regulators open SEC probe", -0.6),
        ];
        let summary = aggregate_headlines(date(), &headlines);

        assert_eq!(summary.processed_headlines, 4);
        assert_eq!(summary.positive_count, 2);
        assert_eq!(summary.negative_count, 1);
        assert_eq!(summary.neutral_count, 1);
        assert_eq!(summary.overall_sentiment, 0.175);
        assert_eq!(summary.market_impact, MarketImpact::Positive);
    }

    #[test]
    fn test_key_themes() {
        let headlines = vec![
            scored("Record revenue lifts shares", 0.6),
            scored("Profit warning hits stock", -0.4),
            scored("New AI chip unveiled", 0.9),
        ];
        let summary = aggregate_headlines(date(), &headlines);

        let themes: Vec<&str> = summary.key_themes.iter().map(|t| t.theme.as_str()).collect();
        assert_eq!(themes, vec!["Earnings", "Innovation"]);
        assert_eq!(summary.key_themes[0].sentiment, 0.1);
        assert_eq!(summary.key_themes[1].sentiment, 0.9);
    }

    #[test]
    fn test_keywords_match_whole_words() {
        // "said" and "second" must not match "ai" and "sec"
        let headlines = vec![scored("CEO said second quarter looks fine", 0.1)];
        let summary = aggregate_headlines(date(), &headlines);
        assert!(summary.key_themes.is_empty());
    }

    #[test]
    fn test_only_first_twenty_headlines() {
        let mut headlines: Vec<ScoredHeadline> =
            (0..20).map(|i| scored(&format!("Headline {}", i), 0.5)).collect();
        headlines.push(scored("Late headline", -1.0));

        let summary = aggregate_headlines(date(), &headlines);
        assert_eq!(summary.total_headlines, 21);
        assert_eq!(summary.processed_headlines, 20);
        assert_eq!(summary.overall_sentiment, 0.5);
    }

    #[test]
    fn test_themes_scan_past_first_twenty() {
        let mut headlines: Vec<ScoredHeadline> =
            (0..20).map(|i| scored(&format!("Headline {}", i), 0.0)).collect();
        headlines.push(scored("Merger talks confirmed", 0.7));

        let summary = aggregate_headlines(date(), &headlines);
        assert_eq!(summary.processed_headlines, 20);
        assert_eq!(summary.key_themes.len(), 1);
        assert_eq!(summary.key_themes[0].theme, "Partnerships");
        assert_eq!(summary.key_themes[0].sentiment, 0.7);
    }

    #[test]
    fn test_summary_lines() {
        let headlines = vec![
            scored("Upgrade lifts shares", 0.6),
            scored("Guidance beats", 0.4),
            scored("Recall widens", -0.5),
        ];
        let summary = aggregate_headlines(date(), &headlines);

        assert_eq!(summary.positive_summary.len(), 3);
        assert_eq!(
            summary.positive_summary[0],
            "Strong positive sentiment detected in 2 headlines"
        );
        assert_eq!(summary.negative_summary.len(), 2);
        assert_eq!(
            summary.negative_summary[0],
            "Negative sentiment identified in 1 headlines"
        );

        let neutral = aggregate_headlines(date(), &[scored("Shares flat", 0.0)]);
        assert!(neutral.positive_summary.is_empty());
        assert!(neutral.negative_summary.is_empty());
    }

    #[test]
    fn test_blank_headlines_skipped() {
        let headlines = vec![scored("   ", 0.9), scored("Shares slide", -0.3)];
        let summary = aggregate_headlines(date(), &headlines);

        assert_eq!(summary.processed_headlines, 1);
        assert_eq!(summary.market_impact, MarketImpact::Negative);
    }

    #[test]
    fn test_to_sentiment_point() {
        let headlines = vec![scored("Upbeat guidance", 0.4), scored("Strong demand", 0.6)];
        let point = aggregate_headlines(date(), &headlines).to_sentiment_point();

        assert_eq!(point.date, date());
        assert_eq!(point.sentiment_score, 0.5);
        assert_eq!(point.news_count, 2);
    }

    #[test]
    fn test_no_headlines() {
        let summary = aggregate_headlines(date(), &[]);
        assert_eq!(summary.overall_sentiment, 0.0);
        assert_eq!(summary.market_impact, MarketImpact::Neutral);
    }
}
