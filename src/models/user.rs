/// A clinician account. Created at registration, immutable afterwards.
///
/// Deliberately not `Serialize`: the password digest must never reach an
/// API response. Endpoints return the fields they need individually.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub password_hash: String,
}
