use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use review_service_client::{ClientConfig, ReviewServiceClient};
use serde_json::{json, Value};

/// In-process review service with three reviewed hotels and one without
/// reviews. Hotel 2 answers too slowly; hotel 3 reports a fallback summary.
#[derive(Clone, Default)]
pub struct FakeReviewService {
    pub summarize_calls: Arc<Mutex<Vec<i64>>>,
}

impl FakeReviewService {
    pub const SLOW_HOTEL: i64 = 2;
    pub const SLOW_FOR: Duration = Duration::from_secs(3);

    pub fn calls(&self) -> Vec<i64> {
        self.summarize_calls.lock().unwrap().clone()
    }

    fn router(self) -> Router {
        Router::new()
            .route("/hotels", get(list_hotels))
            .route("/summarize", post(summarize))
            .with_state(self)
    }
}

fn hotel(id: i64, name: &str, total_reviews: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "location": "Miami, FL",
        "description": "",
        "average_sentiment": 0.7,
        "total_reviews": total_reviews,
    })
}

async fn list_hotels() -> Json<Value> {
    Json(json!([
        hotel(1, "Grand Plaza Hotel", 3),
        hotel(2, "Ocean Breeze Resort", 2),
        hotel(3, "Mountain View Lodge", 2),
        hotel(4, "Downtown Business Hotel", 0),
    ]))
}

async fn summarize(State(service): State<FakeReviewService>, Json(body): Json<Value>) -> Response {
    let hotel_id = body["hotel_id"].as_i64().unwrap_or_default();
    service.summarize_calls.lock().unwrap().push(hotel_id);

    if hotel_id == FakeReviewService::SLOW_HOTEL {
        tokio::time::sleep(FakeReviewService::SLOW_FOR).await;
    }
    if hotel_id == 4 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "No reviews found for this hotel"})),
        )
            .into_response();
    }

    let error = if hotel_id == 3 {
        Value::from("AI summarization failed, used fallback")
    } else {
        Value::Null
    };
    Json(json!({
        "hotel_id": hotel_id,
        "hotel_name": "",
        "summary": format!("Guests liked hotel {}.", hotel_id),
        "total_reviews": 3,
        "processed_reviews": 2,
        "model_used": "t5-small",
        "error": error,
    }))
    .into_response()
}

pub struct StubService {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl StubService {
    pub async fn spawn(service: FakeReviewService) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let app = service.router();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { base_url, handle }
    }

    pub fn client(&self, timeout: Duration) -> ReviewServiceClient {
        ReviewServiceClient::new(ClientConfig::with_base_url(&self.base_url).timeout(timeout))
    }
}

impl Drop for StubService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
