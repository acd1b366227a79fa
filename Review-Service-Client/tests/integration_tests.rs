
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use review_service_client::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;
use test_helpers::{hotel_json, StubService};

type Seen = Arc<Mutex<Vec<Value>>>;

async fn summarize_handler(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    let hotel_id = body["hotel_id"].as_i64().unwrap_or_default();
    seen.lock().unwrap().push(body);
    Json(json!({
        "hotel_id": hotel_id,
        "hotel_name": "Grand Plaza Hotel",
        "summary": "Spacious rooms with great views, but street noise at night.",
        "total_reviews": 3,
        "processed_reviews": 3,
        "model_used": "t5-small",
        "input_length": 412,
    }))
}

fn summarize_app(seen: Seen) -> Router {
    Router::new()
        .route("/summarize", post(summarize_handler))
        .with_state(seen)
}

// -- Hotels --

#[tokio::test]
async fn test_list_hotels_passes_pagination() {
    let seen: Arc<Mutex<Option<HashMap<String, String>>>> = Arc::new(Mutex::new(None));
    let seen_query = Arc::clone(&seen);
    let app = Router::new().route(
        "/hotels",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen_query = Arc::clone(&seen_query);
            async move {
                *seen_query.lock().unwrap() = Some(params);
                Json(json!([
                    hotel_json(1, "Grand Plaza Hotel", 3, 0.716),
                    hotel_json(4, "Downtown Business Hotel", 0, 0.0),
                ]))
            }
        }),
    );
    let stub = StubService::spawn(app).await;

    let hotels = stub.client().list_hotels(5, 20).await.unwrap();
    assert_eq!(hotels.len(), 2);
    assert_eq!(hotels[0].name, "Grand Plaza Hotel");
    assert!(hotels[0].has_reviews());
    assert!(!hotels[1].has_reviews());
    assert_eq!(hotels[0].sentiment(), SentimentLabel::Positive);

    let params = seen.lock().unwrap().clone().unwrap();
    assert_eq!(params.get("skip").map(String::as_str), Some("5"));
    assert_eq!(params.get("limit").map(String::as_str), Some("20"));
}

#[tokio::test]
async fn test_hotel_detail() {
    let app = Router::new().route(
        "/hotels/:id",
        get(|Path(id): Path<i64>| async move {
            let mut hotel = hotel_json(id, "Ocean Breeze Resort", 2, 0.55);
            hotel["reviews"] = json!([
                {"id": 4, "hotel_id": id, "reviewer_name": "Sarah Wilson",
                 "review_text": "Perfect beachfront location.", "sentiment_label": "POSITIVE",
                 "sentiment_score": 0.85, "created_at": "2024-03-01T10:00:00"},
                {"id": 5, "hotel_id": id, "reviewer_name": "David Lee",
                 "review_text": "Showing its age.", "sentiment_label": "NEGATIVE",
                 "sentiment_score": 0.25, "created_at": "2024-03-02T10:00:00"}
            ]);
            Json(hotel)
        }),
    );
    let stub = StubService::spawn(app).await;

    let detail = stub.client().hotel(2).await.unwrap();
    assert_eq!(detail.hotel.id, 2);
    assert_eq!(detail.hotel.sentiment(), SentimentLabel::Neutral);
    assert_eq!(detail.reviews.len(), 2);
    assert_eq!(detail.reviews[1].sentiment_label, SentimentLabel::Negative);

    let stats = detail.sentiment_stats();
    assert_eq!((stats.positive, stats.negative, stats.neutral), (1, 1, 0));
}

#[tokio::test]
async fn test_hotel_not_found_surfaces_detail() {
    let app = Router::new().route(
        "/hotels/:id",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": "Hotel not found"})),
            )
        }),
    );
    let stub = StubService::spawn(app).await;

    let err = stub.client().hotel(99).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    match err {
        ClientError::Http { message, .. } => assert_eq!(message, "Hotel not found"),
        other => panic!("expected Http error, got {:?}", other),
    }
}

// -- Summaries --

#[tokio::test]
async fn test_summarize_sends_default_lengths() {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let stub = StubService::spawn(summarize_app(Arc::clone(&seen))).await;

    let summary = stub
        .client()
        .summarize(1, &SummaryOptions::default())
        .await
        .unwrap();
    assert_eq!(summary.hotel_id, 1);
    assert_eq!(summary.processed_reviews, 3);
    assert_eq!(summary.total_reviews, 3);
    assert_eq!(summary.model_used.as_deref(), Some("t5-small"));
    assert_eq!(summary.input_length, Some(412));
    assert!(summary.error.is_none());

    let bodies = seen.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({"hotel_id": 1, "max_length": 100, "min_length": 20})
    );
}

#[tokio::test]
async fn test_summarize_custom_lengths() {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let stub = StubService::spawn(summarize_app(Arc::clone(&seen))).await;

    let options = SummaryOptions {
        max_length: 200,
        min_length: 50,
    };
    stub.client().summarize(7, &options).await.unwrap();

    let bodies = seen.lock().unwrap();
    assert_eq!(bodies[0]["hotel_id"], 7);
    assert_eq!(bodies[0]["max_length"], 200);
    assert_eq!(bodies[0]["min_length"], 50);
}

#[tokio::test]
async fn test_summarize_server_error() {
    let app = Router::new().route(
        "/summarize",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "model crashed"})),
            )
        }),
    );
    let stub = StubService::spawn(app).await;

    let err = stub
        .client()
        .summarize(1, &SummaryOptions::default())
        .await
        .unwrap_err();
    assert!(!err.is_timeout());
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("model crashed"));
}

#[tokio::test]
async fn test_summarize_timeout() {
    let app = Router::new().route(
        "/summarize",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({}))
        }),
    );
    let stub = StubService::spawn(app).await;

    let err = stub
        .client_with_timeout(Duration::from_millis(200))
        .summarize(1, &SummaryOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
}

#[tokio::test]
async fn test_invalid_response_body() {
    let app = Router::new().route("/summarize", post(|| async { "definitely not json" }));
    let stub = StubService::spawn(app).await;

    let err = stub
        .client()
        .summarize(1, &SummaryOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_connection_refused() {
    // Grab a free port, then release it so nothing is listening there
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ReviewServiceClient::new(
        ClientConfig::with_base_url(format!("http://{}", addr)).timeout(Duration::from_secs(2)),
    );
    let err = client.hotels().await.unwrap_err();
    assert!(matches!(err, ClientError::Connection { .. }));
}

// -- Sentiment analysis --

#[tokio::test]
async fn test_analyze() {
    let app = Router::new().route(
        "/analyze",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "text": body["text"],
                "label": "POSITIVE",
                "score": 0.975,
                "confidence": 0.95,
            }))
        }),
    );
    let stub = StubService::spawn(app).await;

    let result = stub.client().analyze("Lovely staff").await.unwrap();
    assert_eq!(result.text, "Lovely staff");
    assert_eq!(result.label, SentimentLabel::Positive);
    assert_eq!(result.score, 0.975);
}

#[tokio::test]
async fn test_analyze_empty_text_never_sent() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let app = Router::new().route(
        "/analyze",
        post(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Json(json!({})) }
        }),
    );
    let stub = StubService::spawn(app).await;

    let err = stub.client().analyze("   ").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

// -- Reviews --

#[tokio::test]
async fn test_create_review() {
    let app = Router::new().route(
        "/reviews",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "id": 11,
                "hotel_id": body["hotel_id"],
                "reviewer_name": body["reviewer_name"],
                "review_text": body["review_text"],
                "sentiment_label": "NEGATIVE",
                "sentiment_score": 0.2,
                "created_at": "2024-05-05T12:00:00",
            }))
        }),
    );
    let stub = StubService::spawn(app).await;

    let review = stub
        .client()
        .create_review(&NewReview::new(3, "Lisa", "Cold rooms and slow check-in."))
        .await
        .unwrap();
    assert_eq!(review.id, 11);
    assert_eq!(review.hotel_id, 3);
    assert_eq!(review.reviewer_name, "Lisa");
    assert_eq!(review.sentiment_label, SentimentLabel::Negative);
}

#[tokio::test]
async fn test_create_review_rejects_blank_text() {
    let client = ReviewServiceClient::new(ClientConfig::default());
    let err = client
        .create_review(&NewReview::new(3, "Lisa", ""))
        .await
        .unwrap_err();
    match err {
        ClientError::InvalidRequest(msg) => assert_eq!(msg, "Review text cannot be empty"),
        other => panic!("expected InvalidRequest, got {:?}", other),
    }
}
