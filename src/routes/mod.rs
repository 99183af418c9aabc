pub mod submissions;

use axum::Json;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use serde_json::{Value, json};
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::SharedState;

pub fn api_routes(max_body_size: usize) -> Router<SharedState> {
    Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
        .route(
            "/api/submissions",
            get(submissions::list).post(submissions::create),
        )
        .route("/api/submissions/{id}", get(submissions::get))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "AI Chatbot Onboarding API" }))
}
