pub mod chat;
pub mod health;

use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{OpenApi, ToSchema};

use crate::{config::Config, middleware::logging, state::AppState};

/// `{ "reply": ... }` body shared by chat errors
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReplyBody {
    pub reply: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        chat::send_message,
        chat::get_history,
        chat::delete_conversation,
        health::health_check,
    ),
    components(schemas(
        ReplyBody,
        chat::SendMessageRequest,
        chat::SendMessageResponse,
        chat::HistoryMessage,
        chat::HistoryResponse,
        chat::DeleteResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "chat", description = "Support chat conversations"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn build(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Chat
        .route(
            "/api/chat",
            get(chat::get_history)
                .post(chat::send_message)
                .delete(chat::delete_conversation),
        )
        // Docs
        .route("/api-docs/openapi.json", get(openapi_json));

    Router::new()
        .merge(api_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}
