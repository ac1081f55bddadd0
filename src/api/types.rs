//! Shared types for the API layer.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::assistant::ChatClient;
use crate::db::{self, DatabaseError};
use crate::session::SessionStore;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware: database location,
/// live sessions, and the completion backend.
#[derive(Clone)]
pub struct ApiContext {
    db_path: Arc<PathBuf>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub assistant: Arc<dyn ChatClient>,
}

impl ApiContext {
    pub fn new(db_path: PathBuf, assistant: Arc<dyn ChatClient>) -> Self {
        Self {
            db_path: Arc::new(db_path),
            sessions: Arc::new(Mutex::new(SessionStore::new())),
            assistant,
        }
    }

    /// Open a database connection for one request. Migrations already ran
    /// at startup; reopening per request keeps handlers free of a shared
    /// connection lock.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }
}

// ═══════════════════════════════════════════════════════════
// Authenticated session context
// ═══════════════════════════════════════════════════════════

/// Authenticated clinician context, injected into request extensions by
/// the auth middleware after session validation.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub doctor_name: String,
}

/// Hash a password the way the accounts table stores it: SHA-256 hex
/// digest. Login compares digests for equality.
pub fn hash_password(password: &str) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(password.as_bytes()))
}
