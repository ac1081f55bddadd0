//! AI differential-support assistant.
//!
//! - `context` renders a patient record into the grounding text block
//! - `prompt` holds the frozen clinician-facing system instruction
//! - `client` talks to the external chat-completion service
//! - `proxy` runs one conversation turn (compose, call, fall back)

pub mod client;
pub mod context;
pub mod prompt;
pub mod proxy;

pub use client::{ChatClient, CompletionClient, CompletionError, MockChatClient, OutboundMessage};
pub use context::build_patient_context;
pub use proxy::{run_turn, FALLBACK_REPLY};
