//! Rating constraints and aggregation.

use serde::Serialize;

use crate::error::CoreError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

const RATING_MESSAGE: &str = "Rating must be an integer between 1 and 5";

/// Validate a raw JSON rating value.
///
/// Accepts JSON numbers with an integral value in `1..=5`, so `4` and `4.0`
/// both pass; fractions, strings, and out-of-range numbers are rejected.
pub fn parse_rating(value: Option<&serde_json::Value>) -> Result<i32, CoreError> {
    let rating = value
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().and_then(integral)))
        .ok_or_else(|| CoreError::Validation(RATING_MESSAGE.into()))?;
    if !(i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&rating) {
        return Err(CoreError::Validation(RATING_MESSAGE.into()));
    }
    Ok(rating as i32)
}

fn integral(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX)).then_some(value as i64)
}

/// Aggregate over a project's rating sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_ratings: usize,
}

impl RatingSummary {
    /// Average rounded to one decimal place; `0.0` for an empty sequence.
    pub fn from_ratings(ratings: &[i32]) -> Self {
        let total_ratings = ratings.len();
        let average_rating = if total_ratings == 0 {
            0.0
        } else {
            let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
            let mean = sum as f64 / total_ratings as f64;
            (mean * 10.0).round() / 10.0
        };
        Self {
            average_rating,
            total_ratings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_integers_in_range() {
        for r in 1..=5 {
            assert_eq!(parse_rating(Some(&json!(r))).unwrap(), r);
        }
    }

    #[test]
    fn accepts_whole_floats() {
        assert_eq!(parse_rating(Some(&json!(4.0))).unwrap(), 4);
        assert_eq!(parse_rating(Some(&json!(1.0))).unwrap(), 1);
    }

    #[test]
    fn rejects_out_of_range_and_non_integers() {
        for bad in [json!(0), json!(6), json!(-1), json!(3.5), json!(6.0), json!(0.0), json!("4"), json!(null)] {
            assert!(parse_rating(Some(&bad)).is_err(), "{bad} should be rejected");
        }
        assert!(parse_rating(None).is_err());
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        let summary = RatingSummary::from_ratings(&[5, 4, 4]);
        assert_eq!(summary.average_rating, 4.3);
        assert_eq!(summary.total_ratings, 3);

        assert_eq!(RatingSummary::from_ratings(&[1, 2]).average_rating, 1.5);
        assert_eq!(RatingSummary::from_ratings(&[5, 5, 4]).average_rating, 4.7);
    }

    #[test]
    fn empty_sequence_averages_to_zero() {
        let summary = RatingSummary::from_ratings(&[]);
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.total_ratings, 0);
    }
}
