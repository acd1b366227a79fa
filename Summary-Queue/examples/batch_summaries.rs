//! Summarize a handful of fake hotels one at a time, printing every state change.
//!
//! Run with: cargo run -p summary-queue --example batch_summaries

use std::time::Duration;

use summary_queue::*;

struct CannedSummaries;

impl Enricher<u32> for CannedSummaries {
    async fn enrich(&self, key: &u32) -> Result<EnrichmentResult, EnrichError> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        if *key == 3 {
            return Err(EnrichError::Remote {
                status: 503,
                message: "model is loading".to_string(),
            });
        }
        Ok(
            EnrichmentResult::new(format!("Guests enjoyed hotel {}.", key), 2, 3)?
                .with_model(Some("canned".to_string())),
        )
    }

    fn check_ready(&self, key: &u32) -> Result<(), EnrichError> {
        if *key == 4 {
            return Err(EnrichError::Precondition(
                "No reviews available to summarize".to_string(),
            ));
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let controller = SummaryController::new(
        CannedSummaries,
        RunnerConfig::builder()
            .with_dispatch_delay(Duration::from_millis(500))
            .build(),
    );

    let _sub = controller.subscribe_all(|change| match &change.state {
        TaskState::Pending => println!("hotel {}: generating...", change.key),
        TaskState::Ready(result) => println!(
            "hotel {}: {} ({} of {} reviews)",
            change.key,
            result.summary(),
            result.reviews_processed(),
            result.reviews_available()
        ),
        TaskState::Failed(failure) => println!("hotel {}: {}", change.key, failure),
        TaskState::Idle => {}
    });

    match controller.request_all(vec![1, 2, 3, 4]).await {
        Ok(summary) => println!(
            "done: {} succeeded, {} failed, {} skipped in {} ms",
            summary.succeeded, summary.failed, summary.skipped, summary.total_duration_ms
        ),
        Err(e) => eprintln!("batch rejected: {}", e),
    }

    // Retry the failed one by hand
    if let Ok(handle) = controller.request_one(3) {
        let _ = handle.await;
    }
}
