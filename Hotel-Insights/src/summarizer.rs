use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use review_service_client::{ClientError, Hotel, HotelId, ReviewServiceClient, SummaryOptions};
use summary_queue::{EnrichError, EnrichmentResult, Enricher};
use tracing::debug;

pub const NO_REVIEWS: &str = "No reviews available to summarize";

/// Summarizes one hotel's reviews through the review service.
///
/// Review counts learned from hotel listings gate requests: a hotel known to
/// have no reviews is rejected before anything is sent.
pub struct HotelSummarizer {
    client: ReviewServiceClient,
    options: SummaryOptions,
    review_counts: RwLock<HashMap<HotelId, u32>>,
}

impl HotelSummarizer {
    pub fn new(client: ReviewServiceClient, options: SummaryOptions) -> Self {
        Self {
            client,
            options,
            review_counts: RwLock::new(HashMap::new()),
        }
    }

    pub fn client(&self) -> &ReviewServiceClient {
        &self.client
    }

    pub fn options(&self) -> &SummaryOptions {
        &self.options
    }

    /// Record the review counts of `hotels`.
    pub fn remember(&self, hotels: &[Hotel]) {
        let mut counts = self
            .review_counts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for hotel in hotels {
            counts.insert(hotel.id, hotel.total_reviews);
        }
    }

    /// Fetch every hotel and remember its review count.
    pub async fn load_hotels(&self) -> Result<Vec<Hotel>, ClientError> {
        let hotels = self.client.hotels().await?;
        self.remember(&hotels);
        Ok(hotels)
    }

    fn known_reviews(&self, hotel_id: HotelId) -> Option<u32> {
        self.review_counts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&hotel_id)
            .copied()
    }
}

/// Hotels worth summarizing, in listing order.
pub fn work_set(hotels: &[Hotel]) -> Vec<HotelId> {
    hotels
        .iter()
        .filter(|hotel| hotel.has_reviews())
        .map(|hotel| hotel.id)
        .collect()
}

/// Map a transport error onto the queue's failure taxonomy.
pub fn enrich_error(err: ClientError) -> EnrichError {
    match err {
        ClientError::Timeout(_) => EnrichError::Timeout,
        ClientError::Http { status, message } => EnrichError::Remote { status, message },
        ClientError::InvalidResponse(msg) => EnrichError::InvalidResponse(msg),
        ClientError::InvalidRequest(msg) => EnrichError::InvalidRequest(msg),
        err @ ClientError::Connection { .. } => EnrichError::Connection(err.to_string()),
    }
}

impl Enricher<HotelId> for HotelSummarizer {
    async fn enrich(&self, hotel_id: &HotelId) -> Result<EnrichmentResult, EnrichError> {
        let summary = self
            .client
            .summarize(*hotel_id, &self.options)
            .await
            .map_err(enrich_error)?;
        debug!(
            hotel_id,
            processed = summary.processed_reviews,
            total = summary.total_reviews,
            "summary received"
        );
        Ok(EnrichmentResult::new(
            summary.summary,
            summary.processed_reviews,
            summary.total_reviews,
        )?
        .with_model(summary.model_used)
        .with_note(summary.error))
    }

    fn check_ready(&self, hotel_id: &HotelId) -> Result<(), EnrichError> {
        match self.known_reviews(*hotel_id) {
            Some(0) => Err(EnrichError::Precondition(NO_REVIEWS.to_string())),
            _ => Ok(()),
        }
    }
}
