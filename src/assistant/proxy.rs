use crate::models::ChatTurn;

use super::client::{ChatClient, OutboundMessage};
use super::prompt::compose_system_prompt;

/// Reply substituted when the completion call fails for any reason.
/// The turn is still recorded in history with this text, so a broken
/// upstream does not corrupt conversation continuity.
pub const FALLBACK_REPLY: &str = "AI assistant is currently unavailable.";

/// Assemble the outbound sequence for one turn: system instruction with
/// the patient context embedded, then the stored history in order, then
/// the new clinician message last.
pub fn build_turn_messages(
    patient_context: &str,
    history: &[ChatTurn],
    message: &str,
) -> Vec<OutboundMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(OutboundMessage {
        role: "system",
        content: compose_system_prompt(patient_context),
    });
    for turn in history {
        messages.push(OutboundMessage {
            role: turn.role.as_str(),
            content: turn.content.clone(),
        });
    }
    messages.push(OutboundMessage {
        role: "user",
        content: message.to_string(),
    });
    messages
}

/// Run one assistant turn: one best-effort completion call, no retries.
/// Any upstream failure is masked with `FALLBACK_REPLY` — the caller
/// always gets a reply string to record and return.
pub fn run_turn(
    client: &dyn ChatClient,
    patient_context: &str,
    history: &[ChatTurn],
    message: &str,
) -> String {
    let messages = build_turn_messages(patient_context, history, message);
    match client.complete(&messages) {
        Ok(reply) => reply,
        Err(err) => {
            tracing::warn!("Assistant upstream failed, substituting fallback: {err}");
            FALLBACK_REPLY.to_string()
        }
    }
}
