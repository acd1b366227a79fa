//! # review-service-client
//!
//! Async client for the hotel review service: hotel listings, review
//! submission, sentiment analysis and AI review summaries.
//!
//! ## Features
//!
//! - **Typed endpoints** for `/hotels`, `/hotels/{id}`, `/reviews`,
//!   `/analyze` and `/summarize`
//! - **Per-request timeouts** reported separately from transport and HTTP
//!   errors, so callers can tell a slow service from a failing one
//! - **Server error detail** extracted from `{"detail": ...}` bodies
//! - **Shared sentiment thresholds** for per-review and aggregate scores
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use review_service_client::{ClientConfig, ReviewServiceClient, SummaryOptions};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::with_base_url("http://localhost:8000")
//!         .timeout(Duration::from_secs(20));
//!     let client = ReviewServiceClient::new(config);
//!
//!     for hotel in client.hotels().await? {
//!         println!("{} ({})", hotel.name, hotel.sentiment());
//!     }
//!
//!     let summary = client.summarize(1, &SummaryOptions::default()).await?;
//!     println!("{}", summary.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Sentiment Thresholds
//!
//! ```rust
//! use review_service_client::SentimentLabel;
//!
//! assert_eq!(SentimentLabel::from_score(0.75), SentimentLabel::Positive);
//! assert_eq!(SentimentLabel::from_score(0.6), SentimentLabel::Neutral);
//! assert_eq!(SentimentLabel::from_score(0.25), SentimentLabel::Negative);
//! ```

pub mod client;
pub mod error;
pub mod sentiment;
pub mod types;

// Re-export main types at crate root
pub use client::ReviewServiceClient;
pub use error::{ClientError, Result};
pub use sentiment::{SentimentLabel, SentimentStats, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD};
pub use types::{
    ClientConfig, Hotel, HotelDetail, HotelId, NewReview, Review, ReviewSummary,
    SentimentAnalysis, SummaryOptions,
};
