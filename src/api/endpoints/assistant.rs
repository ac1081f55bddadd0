//! Assistant endpoints.
//!
//! `GET /api/patients/:id/assistant` — open the assistant view for a
//! patient: stores the patient's context block in the session and resets
//! chat history.
//! `POST /api/assistant/chat` — one conversation turn against the
//! external completion service.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::assistant;
use crate::db::repository;
use crate::models::{ChatTurn, Patient};

#[derive(Serialize)]
pub struct AssistantViewResponse {
    pub patient: Patient,
    pub history: Vec<ChatTurn>,
}

/// `GET /api/patients/:id/assistant` — open the assistant for a patient.
///
/// Side effects: overwrites the session's patient context and resets its
/// chat history to empty. The ownership rule is the same as the patient
/// detail endpoint — absent and not-owned produce identical 404s.
pub async fn open(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Path(patient_id): Path<i64>,
) -> Result<Json<AssistantViewResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let patient = repository::get_patient_for_user(&conn, patient_id, user.user_id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;

    let context = assistant::build_patient_context(&patient);
    let history = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        if !sessions.set_patient_context(&user.token, context) {
            return Err(ApiError::Unauthorized);
        }
        sessions.history(&user.token).unwrap_or_default()
    };

    tracing::info!(patient_id, user_id = user.user_id, "Assistant view opened");
    Ok(Json(AssistantViewResponse { patient, history }))
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// `POST /api/assistant/chat` — one assistant turn.
///
/// Upstream failure never surfaces as an HTTP error: the fixed fallback
/// reply is substituted and recorded, and the endpoint returns 200.
pub async fn chat(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".into()));
    }

    // Snapshot the session's assistant state; the store lock is released
    // before the upstream call.
    let (context, history) = {
        let sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.chat_state(&user.token).ok_or(ApiError::Unauthorized)?
    };

    let client = Arc::clone(&ctx.assistant);
    let outbound_message = message.clone();
    let reply = tokio::task::spawn_blocking(move || {
        assistant::run_turn(client.as_ref(), &context, &history, &outbound_message)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("assistant task: {e}")))?;

    // Append both sides of the exchange. Concurrent turns on the same
    // session interleave here (last-write-wins on stored order).
    {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.append_exchange(&user.token, message, reply.clone());
    }

    Ok(Json(ChatResponse { reply }))
}
