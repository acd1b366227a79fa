use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::types::*;

fn normalize(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Async client for the hotel review service.
///
/// Every request is bounded by [`ClientConfig::timeout`]; an expired deadline
/// is reported as [`ClientError::Timeout`], distinct from transport and HTTP
/// failures.
///
/// # Example
/// ```no_run
/// use review_service_client::{ClientConfig, ReviewServiceClient, SummaryOptions};
///
/// # async fn example() -> review_service_client::Result<()> {
/// let client = ReviewServiceClient::new(ClientConfig::with_base_url("http://localhost:8000"));
/// let summary = client.summarize(1, &SummaryOptions::default()).await?;
/// println!("{}", summary.summary);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReviewServiceClient {
    http: Client,
    config: ClientConfig,
}

impl ReviewServiceClient {
    pub fn new(config: ClientConfig) -> Self {
        let config = ClientConfig {
            base_url: normalize(&config.base_url),
            ..config
        };
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Use a custom `reqwest::Client` (for connection pooling, proxies, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ── Hotels ──────────────────────────────────────────────────────

    /// List hotels with pagination (`GET /hotels?skip=&limit=`).
    pub async fn list_hotels(&self, skip: u32, limit: u32) -> Result<Vec<Hotel>> {
        let url = format!("{}/hotels", self.config.base_url);
        let req = self
            .http
            .get(&url)
            .query(&[("skip", skip), ("limit", limit)]);
        self.send(req).await
    }

    /// First page of hotels, using the service's default page size.
    pub async fn hotels(&self) -> Result<Vec<Hotel>> {
        self.list_hotels(0, 100).await
    }

    /// Hotel detail including every review (`GET /hotels/{id}`).
    pub async fn hotel(&self, hotel_id: HotelId) -> Result<HotelDetail> {
        let url = format!("{}/hotels/{}", self.config.base_url, hotel_id);
        self.send(self.http.get(&url)).await
    }

    // ── Reviews ─────────────────────────────────────────────────────

    /// Submit a review; the service scores its sentiment before storing it.
    pub async fn create_review(&self, review: &NewReview) -> Result<Review> {
        if let Some(problem) = review.validate() {
            return Err(ClientError::InvalidRequest(problem.to_string()));
        }
        let url = format!("{}/reviews", self.config.base_url);
        self.send(self.http.post(&url).json(review)).await
    }

    // ── Inference ───────────────────────────────────────────────────

    /// Classify the sentiment of arbitrary text (`POST /analyze`).
    pub async fn analyze(&self, text: &str) -> Result<SentimentAnalysis> {
        if text.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "Text cannot be empty".to_string(),
            ));
        }
        let url = format!("{}/analyze", self.config.base_url);
        self.send(self.http.post(&url).json(&AnalyzeRequest { text }))
            .await
    }

    /// Summarize all reviews of one hotel (`POST /summarize`).
    pub async fn summarize(
        &self,
        hotel_id: HotelId,
        options: &SummaryOptions,
    ) -> Result<ReviewSummary> {
        let url = format!("{}/summarize", self.config.base_url);
        let body = SummarizeRequest {
            hotel_id,
            max_length: options.max_length,
            min_length: options.min_length,
        };
        debug!(hotel_id, max_length = options.max_length, "requesting summary");
        self.send(self.http.post(&url).json(&body)).await
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.config.timeout)
        } else {
            ClientError::Connection {
                endpoint: self.config.base_url.clone(),
                source: err,
            }
        }
    }
}

/// Pull the `detail` field out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        match json.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "(empty response body)".to_string()
    } else {
        trimmed.to_string()
    }
}
