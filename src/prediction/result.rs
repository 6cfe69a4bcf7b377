// PredictionResult — the validated success response from the backend.
//
// The wire body is deserialized into loose `Raw*` structs first (every field
// optional) and then checked field by field, so a missing `nlp_insights` or an
// hour of 31 becomes a ParseError naming the problem, never a partial result.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::error::PredictionError;

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Sentiment bucket reported for the caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    #[serde(alias = "pos", alias = "Positive", alias = "POSITIVE")]
    Positive,
    #[serde(alias = "neg", alias = "Negative", alias = "NEGATIVE")]
    Negative,
    #[serde(alias = "neu", alias = "Neutral", alias = "NEUTRAL")]
    Neutral,
}

impl SentimentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Positive => "positive",
            SentimentCategory::Negative => "negative",
            SentimentCategory::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content signals computed from the caption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NlpInsights {
    pub topic: String,
    pub sentiment_category: SentimentCategory,
    /// 0.0 (benign) to 100.0 (very toxic)
    pub toxicity_score: f64,
    /// ISO-like language code, e.g. "en"
    pub language: String,
    pub content_length: Option<u64>,
    pub num_hashtags: Option<u64>,
    pub sentiment_positive: Option<f64>,
    pub sentiment_negative: Option<f64>,
    pub sentiment_neutral: Option<f64>,
}

/// Recommended posting slot plus caption insights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Monday = 0 ... Sunday = 6
    pub best_day: u8,
    /// 0..=23
    pub best_hour: u8,
    pub nlp_insights: NlpInsights,
    pub predicted_engagement: Option<f64>,
}

impl PredictionResult {
    /// Parse and validate a response body.
    pub fn from_json(body: &str) -> Result<Self, PredictionError> {
        let raw: RawPrediction = serde_json::from_str(body)
            .map_err(|e| PredictionError::parse(format!("invalid JSON body: {e}")))?;
        raw.validate()
    }

    pub fn day_name(&self) -> &'static str {
        DAY_NAMES
            .get(usize::from(self.best_day))
            .copied()
            .unwrap_or("Unknown")
    }

    /// The first moment at or after `now` that falls on the recommended
    /// weekday and hour (top of the hour, in `now`'s timezone).
    pub fn next_window<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> NaiveDateTime {
        let local = now.naive_local();
        let today = i64::from(local.weekday().num_days_from_monday());
        let mut days_ahead = (i64::from(self.best_day) - today).rem_euclid(7);

        let slot =
            NaiveTime::from_hms_opt(u32::from(self.best_hour), 0, 0).unwrap_or(NaiveTime::MIN);
        if days_ahead == 0 && local.time() > slot {
            days_ahead = 7;
        }

        (local.date() + Duration::days(days_ahead)).and_time(slot)
    }
}

// --- wire shapes (everything optional so we can name what's missing) ---

#[derive(Deserialize)]
struct RawPrediction {
    best_day: Option<i64>,
    best_hour: Option<i64>,
    nlp_insights: Option<RawInsights>,
    predicted_engagement: Option<f64>,
}

#[derive(Deserialize)]
struct RawInsights {
    topic: Option<String>,
    sentiment_category: Option<SentimentCategory>,
    toxicity_score: Option<f64>,
    language: Option<String>,
    content_length: Option<u64>,
    num_hashtags: Option<u64>,
    sentiment_positive: Option<f64>,
    sentiment_negative: Option<f64>,
    sentiment_neutral: Option<f64>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, PredictionError> {
    value.ok_or_else(|| PredictionError::parse(format!("missing required field `{field}`")))
}

fn in_range(value: i64, field: &str, max: i64) -> Result<u8, PredictionError> {
    u8::try_from(value)
        .ok()
        .filter(|v| i64::from(*v) <= max)
        .ok_or_else(|| {
            PredictionError::parse(format!(
                "`{field}` must be between 0 and {max}, got {value}"
            ))
        })
}

impl RawPrediction {
    fn validate(self) -> Result<PredictionResult, PredictionError> {
        let best_day = in_range(required(self.best_day, "best_day")?, "best_day", 6)?;
        let best_hour = in_range(required(self.best_hour, "best_hour")?, "best_hour", 23)?;
        let insights = required(self.nlp_insights, "nlp_insights")?;

        let toxicity_score = required(insights.toxicity_score, "nlp_insights.toxicity_score")?;
        if !toxicity_score.is_finite() || !(0.0..=100.0).contains(&toxicity_score) {
            return Err(PredictionError::parse(format!(
                "`nlp_insights.toxicity_score` must be between 0 and 100, got {toxicity_score}"
            )));
        }

        Ok(PredictionResult {
            best_day,
            best_hour,
            nlp_insights: NlpInsights {
                topic: required(insights.topic, "nlp_insights.topic")?,
                sentiment_category: required(
                    insights.sentiment_category,
                    "nlp_insights.sentiment_category",
                )?,
                toxicity_score,
                language: required(insights.language, "nlp_insights.language")?,
                content_length: insights.content_length,
                num_hashtags: insights.num_hashtags,
                sentiment_positive: insights.sentiment_positive,
                sentiment_negative: insights.sentiment_negative,
                sentiment_neutral: insights.sentiment_neutral,
            },
            predicted_engagement: self.predicted_engagement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn result_at(day: u8, hour: u8) -> PredictionResult {
        PredictionResult {
            best_day: day,
            best_hour: hour,
            nlp_insights: NlpInsights {
                topic: "Tech".into(),
                sentiment_category: SentimentCategory::Neutral,
                toxicity_score: 0.0,
                language: "en".into(),
                content_length: None,
                num_hashtags: None,
                sentiment_positive: None,
                sentiment_negative: None,
                sentiment_neutral: None,
            },
            predicted_engagement: None,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn next_window_later_this_week() {
        // 2026-10-19 is a Monday
        let now = at(2026, 10, 19, 9, 30);
        let window = result_at(2, 14).next_window(&now);
        assert_eq!(window.to_string(), "2026-10-21 14:00:00");
    }

    #[test]
    fn next_window_same_day_before_slot() {
        let now = at(2026, 10, 19, 9, 30);
        let window = result_at(0, 18).next_window(&now);
        assert_eq!(window.to_string(), "2026-10-19 18:00:00");
    }

    #[test]
    fn next_window_exact_slot_is_now() {
        let now = at(2026, 10, 19, 18, 0);
        let window = result_at(0, 18).next_window(&now);
        assert_eq!(window.to_string(), "2026-10-19 18:00:00");
    }

    #[test]
    fn next_window_wraps_to_next_week_once_passed() {
        let now = at(2026, 10, 19, 18, 5);
        let window = result_at(0, 18).next_window(&now);
        assert_eq!(window.to_string(), "2026-10-26 18:00:00");
    }

    #[test]
    fn next_window_earlier_weekday_wraps() {
        // Saturday -> next Tuesday
        let now = at(2026, 10, 24, 12, 0);
        let window = result_at(1, 8).next_window(&now);
        assert_eq!(window.to_string(), "2026-10-27 08:00:00");
    }

    #[test]
    fn day_name_lookup() {
        assert_eq!(result_at(0, 0).day_name(), "Monday");
        assert_eq!(result_at(6, 0).day_name(), "Sunday");
    }
}
