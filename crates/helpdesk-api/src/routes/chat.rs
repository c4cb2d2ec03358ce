use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use helpdesk_llm::Message as LLMMessage;
use helpdesk_persist::Sender;

use crate::{
    error::{ApiError, ApiResult},
    rate_limit::client_identity,
    routes::ReplyBody,
    state::AppState,
};

/// Turns replayed into the model on each completion
pub const HISTORY_LIMIT: i64 = 10;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub message: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMessageResponse {
    pub reply: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SessionQuery {
    /// Conversation id returned by a previous POST
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryMessage {
    #[schema(value_type = String, example = "user")]
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryMessage>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Send a message and get the support agent's reply
///
/// Starts a new conversation when `sessionId` is omitted.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Agent reply", body = SendMessageResponse),
        (status = 400, description = "Message missing or empty", body = ReplyBody),
        (status = 429, description = "Too many requests from this address", body = ReplyBody),
        (status = 500, description = "Malformed body, store or provider failure", body = ReplyBody)
    ),
    tag = "chat"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<SendMessageResponse>> {
    let client = client_identity(&headers);
    if !state.rate_limiter.check(&client) {
        return Err(ApiError::RateLimited(client));
    }

    // Parsed regardless of Content-Type; only a missing or blank message is a 400.
    let request: SendMessageRequest = serde_json::from_slice(&body)?;

    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or(ApiError::Validation)?;

    // A supplied id is trusted; appending to an unknown one fails in the store.
    let conversation_id = match request.session_id.filter(|id| !id.is_empty()) {
        Some(id) => parse_session_id(&id)?,
        None => {
            let conversation = state.persist.create_conversation().await?;
            tracing::info!(conversation_id = %conversation.id, "Started conversation");
            conversation.id
        }
    };

    // Committed before completion; not rolled back if completion fails.
    state
        .persist
        .append_message(conversation_id, Sender::User, &message)
        .await?;

    let history: Vec<LLMMessage> = state
        .persist
        .list_messages(conversation_id, Some(HISTORY_LIMIT))
        .await?
        .into_iter()
        .map(LLMMessage::from)
        .collect();

    let reply = state
        .agent
        .generate_reply(history, &message)
        .await
        .map_err(ApiError::Provider)?;

    state
        .persist
        .append_message(conversation_id, Sender::Ai, &reply)
        .await?;

    tracing::info!(%conversation_id, reply_len = reply.len(), "Chat turn completed");

    Ok(Json(SendMessageResponse {
        reply,
        session_id: conversation_id.to_string(),
    }))
}

/// Full history of a conversation, oldest first
#[utoipa::path(
    get,
    path = "/api/chat",
    params(SessionQuery),
    responses(
        (status = 200, description = "Conversation history", body = HistoryResponse),
        (status = 500, description = "Store failure", body = ReplyBody)
    ),
    tag = "chat"
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return Ok(Json(HistoryResponse { messages: Vec::new() }));
    };

    let conversation_id = parse_session_id(&session_id)?;
    let messages = state
        .persist
        .list_messages(conversation_id, None)
        .await?
        .into_iter()
        .map(|m| HistoryMessage {
            sender: m.sender,
            text: m.text,
        })
        .collect();

    Ok(Json(HistoryResponse { messages }))
}

/// Delete a conversation and all of its messages
#[utoipa::path(
    delete,
    path = "/api/chat",
    params(SessionQuery),
    responses(
        (status = 200, description = "`success` is false only when sessionId is missing", body = DeleteResponse),
        (status = 500, description = "Store failure", body = ReplyBody)
    ),
    tag = "chat"
)]
pub async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> ApiResult<Json<DeleteResponse>> {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return Ok(Json(DeleteResponse { success: false }));
    };

    let conversation_id = parse_session_id(&session_id)?;
    state.persist.delete_conversation(conversation_id).await?;
    tracing::info!(%conversation_id, "Deleted conversation");

    Ok(Json(DeleteResponse { success: true }))
}

fn parse_session_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidSessionId(raw.to_string()))
}
