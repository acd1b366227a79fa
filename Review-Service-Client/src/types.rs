use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::sentiment::{SentimentLabel, SentimentStats};

/// Hotel identifiers as assigned by the review service.
pub type HotelId = i64;

/// Configuration for the review service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Per-request timeout (default: 30s)
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at the given base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Length bounds passed to the summarization model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Upper bound on summary length in tokens (service default: 100)
    pub max_length: u32,
    /// Lower bound on summary length in tokens (service default: 20)
    pub min_length: u32,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_length: 100,
            min_length: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SummarizeRequest {
    pub hotel_id: HotelId,
    pub max_length: u32,
    pub min_length: u32,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub text: &'a str,
}

/// Review summary returned by `POST /summarize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub hotel_id: HotelId,
    #[serde(default)]
    pub hotel_name: String,
    pub summary: String,
    pub total_reviews: u32,
    pub processed_reviews: u32,
    #[serde(default)]
    pub model_used: Option<String>,
    /// Advisory message, e.g. when the service fell back to extractive summaries.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub input_length: Option<u32>,
}

/// Result of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub text: String,
    pub label: SentimentLabel,
    pub score: f64,
    pub confidence: f64,
}

/// Hotel as listed by `GET /hotels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: HotelId,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub average_sentiment: f64,
    pub total_reviews: u32,
}

impl Hotel {
    /// Overall sentiment derived from the average score.
    pub fn sentiment(&self) -> SentimentLabel {
        SentimentLabel::from_score(self.average_sentiment)
    }

    pub fn has_reviews(&self) -> bool {
        self.total_reviews > 0
    }
}

/// Hotel with all its reviews, from `GET /hotels/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelDetail {
    #[serde(flatten)]
    pub hotel: Hotel,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl HotelDetail {
    pub fn sentiment_stats(&self) -> SentimentStats {
        SentimentStats::from_scores(self.reviews.iter().map(|r| r.sentiment_score))
    }
}

/// A stored review with the sentiment assigned at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub hotel_id: HotelId,
    pub reviewer_name: String,
    pub review_text: String,
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: f64,
    pub created_at: String,
}

/// Payload for `POST /reviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub hotel_id: HotelId,
    pub reviewer_name: String,
    pub review_text: String,
}

impl NewReview {
    pub fn new(
        hotel_id: HotelId,
        reviewer_name: impl Into<String>,
        review_text: impl Into<String>,
    ) -> Self {
        Self {
            hotel_id,
            reviewer_name: reviewer_name.into(),
            review_text: review_text.into(),
        }
    }

    /// Returns the first problem with this review, if any.
    pub fn validate(&self) -> Option<&'static str> {
        if self.reviewer_name.trim().is_empty() {
            Some("Reviewer name cannot be empty")
        } else if self.review_text.trim().is_empty() {
            Some("Review text cannot be empty")
        } else {
            None
        }
    }
}
