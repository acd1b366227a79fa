use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores strictly above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.6;
/// Scores strictly below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = 0.4;

/// Sentiment classification shared by per-review and aggregate scores.
///
/// Unknown labels coming from the service deserialize as `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[serde(other)]
    Neutral,
}

impl SentimentLabel {
    /// Classify a score in `[0, 1]`. Both thresholds are exclusive, so
    /// `0.6` and `0.4` are neutral.
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }

    /// Badge text shown next to a score, e.g. `Positive (75%)`.
    pub fn badge(&self, score: f64) -> String {
        match self {
            SentimentLabel::Positive => format!("Positive ({:.0}%)", score * 100.0),
            SentimentLabel::Negative => format!("Negative ({:.0}%)", score * 100.0),
            SentimentLabel::Neutral => "Neutral".to_string(),
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-label review counts for a hotel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentStats {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentStats {
    /// Count scores using the same thresholds as [`SentimentLabel::from_score`].
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut stats = Self::default();
        for score in scores {
            match SentimentLabel::from_score(score) {
                SentimentLabel::Positive => stats.positive += 1,
                SentimentLabel::Negative => stats.negative += 1,
                SentimentLabel::Neutral => stats.neutral += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_score_thresholds() {
        assert_eq!(SentimentLabel::from_score(0.75), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(0.25), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(0.5), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.61), SentimentLabel::Positive);
    }

    #[test]
    fn test_from_score_boundaries_are_exclusive() {
        assert_eq!(SentimentLabel::from_score(0.6), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.4), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.39), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(0.0), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(1.0), SentimentLabel::Positive);
    }

    #[test]
    fn test_badge_text() {
        assert_eq!(SentimentLabel::Positive.badge(0.75), "Positive (75%)");
        assert_eq!(SentimentLabel::Negative.badge(0.25), "Negative (25%)");
        assert_eq!(SentimentLabel::Neutral.badge(0.5), "Neutral");
    }

    #[test]
    fn test_label_serde() {
        let json = serde_json::to_string(&SentimentLabel::Positive).unwrap();
        assert_eq!(json, "\"POSITIVE\"");

        let parsed: SentimentLabel = serde_json::from_str("\"NEGATIVE\"").unwrap();
        assert_eq!(parsed, SentimentLabel::Negative);

        // Anything unexpected falls back to neutral
        let parsed: SentimentLabel = serde_json::from_str("\"MIXED\"").unwrap();
        assert_eq!(parsed, SentimentLabel::Neutral);
    }

    #[test]
    fn test_stats_from_scores() {
        let stats = SentimentStats::from_scores([0.9, 0.3, 0.95, 0.5, 0.6, 0.1]);
        assert_eq!(stats.positive, 2);
        assert_eq!(stats.negative, 2);
        assert_eq!(stats.neutral, 2);
        assert_eq!(stats.total(), 6);
    }

    #[test]
    fn test_stats_empty() {
        let stats = SentimentStats::from_scores(std::iter::empty());
        assert_eq!(stats, SentimentStats::default());
        assert_eq!(stats.total(), 0);
    }
}
