use super::{round_confidence, round_price};
use crate::error::PredictionError;
use crate::models::{Direction, Prediction, PredictionType};
use crate::Result;

const AGREEMENT_FACTOR: f64 = 1.2;
const DISAGREEMENT_FACTOR: f64 = 0.8;
/// Weight above which one prediction decides a disputed direction alone
const DOMINANT_WEIGHT: f64 = 0.7;
/// Move assumed to be baked into a directional technical price
const ASSUMED_TECHNICAL_CHANGE: f64 = 0.02;
/// Half-width of the NEUTRAL band around the reconstructed baseline
const NEUTRAL_BAND: f64 = 0.01;

/// Merge a technical and a sentiment prediction, weighted by confidence
///
/// The combined prediction keeps the technical prediction's dates.
///
/// # Errors
/// * `MismatchedInput` when the tickers differ
/// * `InvalidData` when either prediction carries no price
pub fn combine_predictions(technical: &Prediction, sentiment: &Prediction) -> Result<Prediction> {
    if technical.ticker != sentiment.ticker {
        return Err(PredictionError::MismatchedInput {
            expected: technical.ticker.clone(),
            actual: sentiment.ticker.clone(),
        });
    }

    if technical.target_date != sentiment.target_date {
        tracing::warn!(
            "{}: combining predictions for different target dates ({} vs {})",
            technical.ticker,
            technical.target_date,
            sentiment.target_date
        );
    }

    let (tech_price, sent_price) = match (technical.predicted_price, sentiment.predicted_price) {
        (Some(tech), Some(sent)) => (tech, sent),
        _ => {
            return Err(PredictionError::InvalidData(format!(
                "{}: combined prediction needs a price from both inputs",
                technical.ticker
            )))
        }
    };

    let tech_confidence = technical.confidence_score;
    let sent_confidence = sentiment.confidence_score;

    let total_confidence = tech_confidence + sent_confidence;
    let tech_weight = if total_confidence == 0.0 {
        0.5
    } else {
        tech_confidence / total_confidence
    };
    let sent_weight = 1.0 - tech_weight;

    let predicted_price = tech_price * tech_weight + sent_price * sent_weight;

    let directions_agree = technical.predicted_direction == sentiment.predicted_direction;
    let direction = if directions_agree {
        technical.predicted_direction
    } else if tech_weight > DOMINANT_WEIGHT {
        technical.predicted_direction
    } else if sent_weight > DOMINANT_WEIGHT {
        sentiment.predicted_direction
    } else {
        direction_from_baseline(predicted_price, tech_price, technical.predicted_direction)
    };

    let agreement_factor = if directions_agree {
        AGREEMENT_FACTOR
    } else {
        DISAGREEMENT_FACTOR
    };
    let confidence = ((tech_confidence * tech_weight + sent_confidence * sent_weight)
        * agreement_factor)
        .clamp(0.0, 100.0);

    tracing::debug!(
        "{} combined: tech_weight={:.3} price={:.2} agree={} -> {:?} ({:.1})",
        technical.ticker,
        tech_weight,
        predicted_price,
        directions_agree,
        direction,
        confidence
    );

    Ok(Prediction {
        ticker: technical.ticker.clone(),
        issued_date: technical.issued_date,
        target_date: technical.target_date,
        predicted_price: Some(round_price(predicted_price)),
        predicted_direction: direction,
        confidence_score: round_confidence(confidence),
        prediction_type: PredictionType::Combined,
    })
}

/// Compare the blended price with the price the technical call started from
///
/// The starting price is reconstructed assuming a ±2% technical move (none
/// for NEUTRAL); within ±1% of it the call is NEUTRAL.
fn direction_from_baseline(predicted_price: f64, tech_price: f64, tech_direction: Direction) -> Direction {
    let estimated_change = match tech_direction {
        Direction::Up => ASSUMED_TECHNICAL_CHANGE,
        Direction::Down => -ASSUMED_TECHNICAL_CHANGE,
        Direction::Neutral => 0.0,
    };
    let baseline = tech_price / (1.0 + estimated_change);

    if predicted_price > baseline * (1.0 + NEUTRAL_BAND) {
        Direction::Up
    } else if predicted_price < baseline * (1.0 - NEUTRAL_BAND) {
        Direction::Down
    } else {
        Direction::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn prediction(
        ticker: &str,
        price: f64,
        direction: Direction,
        confidence: f64,
        prediction_type: PredictionType,
    ) -> Prediction {
        Prediction {
            ticker: ticker.to_string(),
            issued_date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            target_date: NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
            predicted_price: Some(price),
            predicted_direction: direction,
            confidence_score: confidence,
            prediction_type,
        }
    }

    fn technical(price: f64, direction: Direction, confidence: f64) -> Prediction {
        prediction("AAPL", price, direction, confidence, PredictionType::Technical)
    }

    fn sentiment(price: f64, direction: Direction, confidence: f64) -> Prediction {
        prediction("AAPL", price, direction, confidence, PredictionType::Sentiment)
    }

    #[test]
    fn test_agreeing_predictions() {
        let combined = combine_predictions(
            &technical(110.0, Direction::Up, 80.0),
            &sentiment(103.0, Direction::Up, 60.0),
        )
        .unwrap();

        assert_eq!(combined.predicted_direction, Direction::Up);
        assert_eq!(combined.prediction_type, PredictionType::Combined);
        // (80 * 4/7 + 60 * 3/7) * 1.2
        assert_eq!(combined.confidence_score, 85.71);
        // 110 * 4/7 + 103 * 3/7
        assert_eq!(combined.predicted_price, Some(107.0));
    }

    #[test]
    fn test_dominant_weight_decides_disagreement() {
        let combined = combine_predictions(
            &technical(110.0, Direction::Up, 90.0),
            &sentiment(99.0, Direction::Down, 30.0),
        )
        .unwrap();

        // tech weight 0.75
        assert_eq!(combined.predicted_direction, Direction::Up);
        assert_eq!(combined.confidence_score, 60.0);

        let combined = combine_predictions(
            &technical(101.0, Direction::Up, 20.0),
            &sentiment(95.0, Direction::Down, 80.0),
        )
        .unwrap();
        assert_eq!(combined.predicted_direction, Direction::Down);
    }

    #[test]
    fn test_balanced_disagreement_uses_baseline() {
        // Technical UP at 102 implies a 100 baseline; blend is 101.5 -> UP
        let combined = combine_predictions(
            &technical(102.0, Direction::Up, 50.0),
            &sentiment(101.0, Direction::Down, 50.0),
        )
        .unwrap();
        assert_eq!(combined.predicted_direction, Direction::Up);

        // Blend at 100.5 stays within 1% of the baseline
        let combined = combine_predictions(
            &technical(102.0, Direction::Up, 50.0),
            &sentiment(99.0, Direction::Down, 50.0),
        )
        .unwrap();
        assert_eq!(combined.predicted_direction, Direction::Neutral);

        // Technical NEUTRAL keeps the technical price as baseline
        let combined = combine_predictions(
            &technical(100.0, Direction::Neutral, 50.0),
            &sentiment(95.0, Direction::Down, 50.0),
        )
        .unwrap();
        assert_eq!(combined.predicted_direction, Direction::Down);
    }

    #[test]
    fn test_zero_confidences_split_evenly() {
        let combined = combine_predictions(
            &technical(100.0, Direction::Neutral, 0.0),
            &sentiment(110.0, Direction::Neutral, 0.0),
        )
        .unwrap();

        assert_eq!(combined.predicted_price, Some(105.0));
        assert_eq!(combined.confidence_score, 0.0);
    }

    #[test]
    fn test_confidence_clamped() {
        let combined = combine_predictions(
            &technical(110.0, Direction::Up, 95.0),
            &sentiment(105.0, Direction::Up, 90.0),
        )
        .unwrap();
        assert_eq!(combined.confidence_score, 100.0);
    }

    #[test]
    fn test_mismatched_tickers() {
        let other = prediction("MSFT", 100.0, Direction::Up, 50.0, PredictionType::Sentiment);
        let result = combine_predictions(&technical(100.0, Direction::Up, 50.0), &other);

        assert_eq!(
            result,
            Err(PredictionError::MismatchedInput {
                expected: "AAPL".to_string(),
                actual: "MSFT".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_price_rejected() {
        let mut sent = sentiment(100.0, Direction::Up, 50.0);
        sent.predicted_price = None;
        let result = combine_predictions(&technical(100.0, Direction::Up, 50.0), &sent);
        assert!(matches!(result, Err(PredictionError::InvalidData(_))));
    }

    #[test]
    fn test_swapped_roles_keep_agreement_logic() {
        let a = technical(110.0, Direction::Up, 85.0);
        let b = sentiment(100.0, Direction::Down, 20.0);

        let forward = combine_predictions(&a, &b).unwrap();
        let swapped = combine_predictions(&b, &a).unwrap();

        // The dominant prediction wins whichever slot it occupies
        assert_eq!(forward.predicted_direction, Direction::Up);
        assert_eq!(swapped.predicted_direction, Direction::Up);
        assert_eq!(forward.confidence_score, swapped.confidence_score);
        assert_eq!(forward.predicted_price, swapped.predicted_price);
    }
}
