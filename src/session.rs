//! Per-browser-session state, keyed by opaque bearer token.
//!
//! Each session holds the authenticated clinician's identity plus the two
//! assistant fields: `ai_patient_context` (formatted snapshot of one
//! patient's record, overwritten whenever an assistant view is opened) and
//! `ai_chat_history` (ordered user/assistant turns, reset on assistant
//! open, accumulating until reset or session end).
//!
//! Key properties:
//! - Tokens are random 32-byte values, URL-safe base64, never persisted
//! - Sliding inactivity expiration; expired sessions are purged lazily
//! - History read-then-write is non-atomic across a chat turn: the store
//!   mutex is never held over the upstream call, so concurrent turns on
//!   one session interleave appends (last-write-wins, accepted)

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::{ChatTurn, User};

/// Inactivity window before a session expires (sliding).
pub const SESSION_TTL_SECS: u64 = 30 * 60;

/// Generate a random session token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

// ═══════════════════════════════════════════════════════════
// Session — one logged-in browser
// ═══════════════════════════════════════════════════════════

/// State for one logged-in browser session.
#[derive(Debug)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub doctor_name: String,
    pub ai_patient_context: String,
    pub ai_chat_history: Vec<ChatTurn>,
    last_seen: Instant,
}

/// Identity snapshot handed to request handlers after authentication.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user_id: i64,
    pub username: String,
    pub doctor_name: String,
}

// ═══════════════════════════════════════════════════════════
// SessionStore — all live sessions
// ═══════════════════════════════════════════════════════════

/// In-memory session store with sliding expiration.
pub struct SessionStore {
    sessions: HashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(SESSION_TTL_SECS))
    }

    /// Custom TTL, used by expiry tests.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Create a session for a freshly authenticated clinician.
    /// Returns the opaque token the client must present from now on.
    pub fn create(&mut self, user: &User) -> String {
        self.purge_expired();
        let token = generate_token();
        self.sessions.insert(
            token.clone(),
            Session {
                user_id: user.id,
                username: user.username.clone(),
                doctor_name: user.name.clone(),
                ai_patient_context: String::new(),
                ai_chat_history: Vec::new(),
                last_seen: Instant::now(),
            },
        );
        token
    }

    /// Validate a token and refresh its sliding expiry.
    /// Returns the identity for request handling, or `None` if the token
    /// is unknown or has expired (expired entries are removed here).
    pub fn touch(&mut self, token: &str) -> Option<SessionIdentity> {
        let ttl = self.ttl;
        let expired = match self.sessions.get_mut(token) {
            Some(session) => {
                if session.last_seen.elapsed() > ttl {
                    true
                } else {
                    session.last_seen = Instant::now();
                    return Some(SessionIdentity {
                        user_id: session.user_id,
                        username: session.username.clone(),
                        doctor_name: session.doctor_name.clone(),
                    });
                }
            }
            None => return None,
        };
        if expired {
            self.sessions.remove(token);
        }
        None
    }

    /// Remove a session (logout). Returns whether it existed.
    pub fn evict(&mut self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    // ── Assistant state ─────────────────────────────────────

    /// Overwrite the patient context and reset chat history to empty.
    /// Called exactly when an assistant view is opened.
    pub fn set_patient_context(&mut self, token: &str, context: String) -> bool {
        match self.sessions.get_mut(token) {
            Some(session) => {
                session.ai_patient_context = context;
                session.ai_chat_history.clear();
                true
            }
            None => false,
        }
    }

    /// Snapshot the context and history for one chat turn.
    /// A clone, so the store lock is not held over the upstream call.
    pub fn chat_state(&self, token: &str) -> Option<(String, Vec<ChatTurn>)> {
        self.sessions
            .get(token)
            .map(|s| (s.ai_patient_context.clone(), s.ai_chat_history.clone()))
    }

    /// Append one completed exchange — the user message, then the
    /// assistant reply — preserving all prior turns.
    pub fn append_exchange(&mut self, token: &str, message: String, reply: String) -> bool {
        match self.sessions.get_mut(token) {
            Some(session) => {
                session.ai_chat_history.push(ChatTurn::user(message));
                session.ai_chat_history.push(ChatTurn::assistant(reply));
                true
            }
            None => false,
        }
    }

    /// Current history for a session (for view seeding and tests).
    pub fn history(&self, token: &str) -> Option<Vec<ChatTurn>> {
        self.sessions.get(token).map(|s| s.ai_chat_history.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    // ── Internal ────────────────────────────────────────────

    fn purge_expired(&mut self) {
        let ttl = self.ttl;
        self.sessions
            .retain(|_, session| session.last_seen.elapsed() <= ttl);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatRole;

    fn test_user() -> User {
        User {
            id: 7,
            name: "Dr A".to_string(),
            username: "dra".to_string(),
            password_hash: "digest".to_string(),
        }
    }

    #[test]
    fn create_and_touch_session() {
        let mut store = SessionStore::new();
        let token = store.create(&test_user());

        let identity = store.touch(&token).unwrap();
        assert_eq!(identity.user_id, 7);
        assert_eq!(identity.username, "dra");
        assert_eq!(identity.doctor_name, "Dr A");
    }

    #[test]
    fn tokens_are_unique_and_opaque() {
        let mut store = SessionStore::new();
        let a = store.create(&test_user());
        let b = store.create(&test_user());
        assert_ne!(a, b);
        assert!(a.len() >= 40, "32 bytes of entropy in base64");
    }

    #[test]
    fn unknown_token_is_rejected() {
        let mut store = SessionStore::new();
        assert!(store.touch("no-such-token").is_none());
    }

    #[test]
    fn expired_session_is_rejected_and_removed() {
        let mut store = SessionStore::with_ttl(Duration::ZERO);
        let token = store.create(&test_user());

        std::thread::sleep(Duration::from_millis(5));
        assert!(store.touch(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn evict_ends_the_session() {
        let mut store = SessionStore::new();
        let token = store.create(&test_user());

        assert!(store.evict(&token));
        assert!(store.touch(&token).is_none());
        assert!(!store.evict(&token), "second evict is a no-op");
    }

    #[test]
    fn new_session_has_no_assistant_state() {
        let mut store = SessionStore::new();
        let token = store.create(&test_user());

        let (context, history) = store.chat_state(&token).unwrap();
        assert_eq!(context, "");
        assert!(history.is_empty());
    }

    #[test]
    fn set_patient_context_resets_history() {
        let mut store = SessionStore::new();
        let token = store.create(&test_user());

        store.append_exchange(&token, "q1".into(), "a1".into());
        assert_eq!(store.history(&token).unwrap().len(), 2);

        assert!(store.set_patient_context(&token, "Patient Name: John".into()));
        let (context, history) = store.chat_state(&token).unwrap();
        assert_eq!(context, "Patient Name: John");
        assert!(history.is_empty(), "opening the assistant view resets history");
    }

    #[test]
    fn context_reset_is_idempotent() {
        let mut store = SessionStore::new();
        let token = store.create(&test_user());

        store.set_patient_context(&token, "ctx".into());
        store.append_exchange(&token, "q".into(), "a".into());
        store.set_patient_context(&token, "ctx".into());

        assert!(store.history(&token).unwrap().is_empty());
    }

    #[test]
    fn exchanges_accumulate_in_order() {
        let mut store = SessionStore::new();
        let token = store.create(&test_user());

        store.append_exchange(&token, "q1".into(), "a1".into());
        store.append_exchange(&token, "q2".into(), "a2".into());

        let history = store.history(&token).unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[0].content, "q1");
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert_eq!(history[1].content, "a1");
        assert_eq!(history[2].content, "q2");
        assert_eq!(history[3].content, "a2");
    }

    #[test]
    fn assistant_ops_on_dead_session_fail() {
        let mut store = SessionStore::new();
        assert!(!store.set_patient_context("gone", "ctx".into()));
        assert!(!store.append_exchange("gone", "q".into(), "a".into()));
        assert!(store.chat_state("gone").is_none());
    }
}
