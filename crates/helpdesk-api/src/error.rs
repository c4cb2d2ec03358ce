use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use helpdesk_persist::PersistError;

use crate::routes::ReplyBody;

pub const EMPTY_MESSAGE_REPLY: &str = "Message cannot be empty.";
pub const RATE_LIMITED_REPLY: &str = "Too many requests. Please slow down.";
pub const GENERIC_FAILURE_REPLY: &str = "Something went wrong.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Message is missing or empty")]
    Validation,

    #[error("Rate limit exceeded for {0}")]
    RateLimited(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Completion error: {0}")]
    Provider(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation => StatusCode::BAD_REQUEST,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::MalformedBody(_)
            | ApiError::InvalidSessionId(_)
            | ApiError::Persist(_)
            | ApiError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let reply = match self {
            ApiError::Validation => EMPTY_MESSAGE_REPLY,
            ApiError::RateLimited(ref identity) => {
                tracing::warn!(client = %identity, "Rate limit exceeded");
                RATE_LIMITED_REPLY
            }
            ApiError::MalformedBody(ref e) => {
                tracing::error!("Malformed chat request body: {}", e);
                GENERIC_FAILURE_REPLY
            }
            ApiError::InvalidSessionId(ref id) => {
                tracing::error!(session_id = %id, "Session id is not a valid conversation id");
                GENERIC_FAILURE_REPLY
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                GENERIC_FAILURE_REPLY
            }
            ApiError::Provider(ref e) => {
                tracing::error!("Completion error: {:#}", e);
                GENERIC_FAILURE_REPLY
            }
        };

        let body = Json(ReplyBody {
            reply: reply.to_string(),
        });

        (self.status(), body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
