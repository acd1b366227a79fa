//! Plain-text rendering for the console front end.
//!
//! Every function here is pure: it turns data into the exact text printed,
//! so the output can be checked without a terminal.

use review_service_client::{
    Hotel, HotelDetail, Review, SentimentAnalysis, SentimentLabel, SentimentStats,
};
use summary_queue::{BatchSummary, EnrichmentResult, TaskState};

pub fn render_hotel_row(hotel: &Hotel) -> String {
    format!(
        "#{} {} ({}) · {} reviews · {}",
        hotel.id,
        hotel.name,
        hotel.location,
        hotel.total_reviews,
        hotel.sentiment().badge(hotel.average_sentiment)
    )
}

pub fn render_hotel_list(hotels: &[Hotel]) -> String {
    if hotels.is_empty() {
        return "No hotels found.".to_string();
    }
    hotels
        .iter()
        .map(render_hotel_row)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_stats(stats: &SentimentStats) -> String {
    format!(
        "Positive: {} · Neutral: {} · Negative: {}",
        stats.positive, stats.neutral, stats.negative
    )
}

pub fn render_review(review: &Review) -> String {
    let badge = SentimentLabel::from_score(review.sentiment_score).badge(review.sentiment_score);
    format!(
        "- {} [{}]\n  {}",
        review.reviewer_name, badge, review.review_text
    )
}

pub fn render_hotel_detail(detail: &HotelDetail) -> String {
    let hotel = &detail.hotel;
    let mut lines = vec![
        format!("{} ({})", hotel.name, hotel.location),
        format!(
            "Overall: {} · {} reviews",
            hotel.sentiment().badge(hotel.average_sentiment),
            hotel.total_reviews
        ),
    ];
    if !hotel.description.is_empty() {
        lines.push(hotel.description.clone());
    }
    lines.push(render_stats(&detail.sentiment_stats()));

    if detail.reviews.is_empty() {
        lines.push("No reviews yet.".to_string());
    } else {
        lines.push(String::new());
        lines.extend(detail.reviews.iter().map(render_review));
    }
    lines.join("\n")
}

pub fn render_analysis(analysis: &SentimentAnalysis) -> String {
    format!(
        "{} (confidence {:.0}%)",
        analysis.label.badge(analysis.score),
        analysis.confidence * 100.0
    )
}

pub fn render_submitted_review(review: &Review) -> String {
    format!("Review #{} saved.\n{}", review.id, render_review(review))
}

/// Footer under a summary, e.g. `3 of 5 reviews analyzed • t5-small`.
pub fn render_summary_footer(result: &EnrichmentResult) -> String {
    let mut footer = format!(
        "{} of {} reviews analyzed",
        result.reviews_processed(),
        result.reviews_available()
    );
    if let Some(model) = result.model() {
        footer.push_str(" • ");
        footer.push_str(model);
    }
    footer
}

/// Text for one hotel's summary state, or `None` while it is Idle.
///
/// `total_reviews` is the count shown while the summary is pending.
pub fn render_summary_state(name: &str, total_reviews: u32, state: &TaskState) -> Option<String> {
    match state {
        TaskState::Idle => None,
        TaskState::Pending => Some(format!("{}: Analyzing {} reviews...", name, total_reviews)),
        TaskState::Ready(result) => {
            let mut text = format!("{}\n  {}", name, result.summary());
            if let Some(note) = result.note() {
                text.push_str(&format!("\n  Note: {}", note));
            }
            text.push_str(&format!("\n  {}", render_summary_footer(result)));
            Some(text)
        }
        TaskState::Failed(failure) => Some(format!("{}: {}", name, failure.message)),
    }
}

pub fn render_batch_summary(summary: &BatchSummary) -> String {
    let mut text = format!(
        "{} summarized, {} failed, {} skipped in {:.1}s",
        summary.succeeded,
        summary.failed,
        summary.skipped,
        summary.total_duration_ms as f64 / 1000.0
    );
    if summary.cancelled {
        text.push_str(&format!(" (cancelled, {} not started)", summary.remaining));
    }
    text
}
