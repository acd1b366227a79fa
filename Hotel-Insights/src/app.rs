use std::collections::HashMap;

use anyhow::{Context, Result};
use review_service_client::{Hotel, HotelId, NewReview, ReviewServiceClient, SummaryOptions};
use summary_queue::{BatchSummary, QueueError, RunnerConfig, Subscription, SummaryController};
use tracing::{info, warn};

use crate::cli::{runner_config, Cli, Command};
use crate::render::*;
use crate::summarizer::{work_set, HotelSummarizer, NO_REVIEWS};

pub type HotelController = SummaryController<HotelId, HotelSummarizer>;

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let client = ReviewServiceClient::new(cli.client_config());
    info!(api_url = %client.base_url(), "using review service");

    match cli.command {
        Command::Hotels { skip, limit } => {
            let hotels = client
                .list_hotels(skip, limit)
                .await
                .context("Failed to load hotels")?;
            println!("{}", render_hotel_list(&hotels));
        }
        Command::Hotel { id } => {
            let detail = client.hotel(id).await.context("Failed to load hotel")?;
            println!("{}", render_hotel_detail(&detail));
        }
        Command::Analyze { text } => {
            let analysis = client
                .analyze(&text)
                .await
                .context("Failed to analyze sentiment")?;
            println!("{}", render_analysis(&analysis));
        }
        Command::Review {
            hotel_id,
            name,
            text,
        } => {
            let review = client
                .create_review(&NewReview::new(hotel_id, name, text))
                .await
                .context("Failed to submit review")?;
            println!("{}", render_submitted_review(&review));
        }
        Command::Summarize { id, lengths } => {
            summarize_one(client, id, lengths.into()).await?;
        }
        Command::SummarizeAll {
            ids,
            delay_ms,
            call_timeout_secs,
            lengths,
        } => {
            let summarizer = HotelSummarizer::new(client, lengths.into());
            let hotels = summarizer
                .load_hotels()
                .await
                .context("Failed to load hotels")?;
            let selected = select_hotels(&hotels, &ids);
            for hotel in selected.iter().filter(|h| !h.has_reviews()) {
                println!("{}: {}", hotel.name, NO_REVIEWS);
            }

            let controller =
                SummaryController::new(summarizer, runner_config(delay_ms, call_timeout_secs));
            let _printer = print_transitions(&controller, &selected);

            let cancel_on_ctrl_c = {
                let controller = controller.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        info!("interrupted, stopping after the current hotel");
                        controller.cancel_all();
                    }
                })
            };

            let summary = summarize_all(&controller, &selected).await;
            cancel_on_ctrl_c.abort();
            println!("{}", render_batch_summary(&summary?));
        }
    }

    Ok(())
}

async fn summarize_one(
    client: ReviewServiceClient,
    hotel_id: HotelId,
    options: SummaryOptions,
) -> Result<()> {
    let detail = client.hotel(hotel_id).await.context("Failed to load hotel")?;
    let summarizer = HotelSummarizer::new(client, options);
    summarizer.remember(std::slice::from_ref(&detail.hotel));

    let controller = SummaryController::new(summarizer, RunnerConfig::default());
    let _printer = print_transitions(&controller, std::slice::from_ref(&detail.hotel));

    match controller.request_one(hotel_id) {
        Ok(handle) => {
            handle.await.context("Summary task panicked")?;
        }
        Err(QueueError::Precondition(_)) => println!("{}: {}", detail.hotel.name, NO_REVIEWS),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Batch-summarize the hotels in `hotels` that have reviews.
pub async fn summarize_all(
    controller: &HotelController,
    hotels: &[Hotel],
) -> Result<BatchSummary, QueueError> {
    controller.request_all(work_set(hotels)).await
}

/// The hotels named in `ids`, in the order given, or all of them when `ids`
/// is empty.
pub fn select_hotels(hotels: &[Hotel], ids: &[HotelId]) -> Vec<Hotel> {
    if ids.is_empty() {
        return hotels.to_vec();
    }
    let by_id: HashMap<HotelId, &Hotel> = hotels.iter().map(|h| (h.id, h)).collect();
    ids.iter()
        .filter_map(|id| match by_id.get(id) {
            Some(hotel) => Some((*hotel).clone()),
            None => {
                warn!(hotel_id = id, "unknown hotel, ignoring");
                None
            }
        })
        .collect()
}

/// Print every state change of the given hotels as it happens.
pub fn print_transitions(controller: &HotelController, hotels: &[Hotel]) -> Subscription {
    let labels: HashMap<HotelId, (String, u32)> = hotels
        .iter()
        .map(|h| (h.id, (h.name.clone(), h.total_reviews)))
        .collect();
    controller.subscribe_all(move |change| {
        if let Some((name, total)) = labels.get(&change.key) {
            if let Some(text) = render_summary_state(name, *total, &change.state) {
                println!("{}", text);
            }
        }
    })
}
