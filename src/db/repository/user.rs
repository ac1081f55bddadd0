use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::User;

/// Insert a clinician account. Returns the new row id.
///
/// A duplicate username surfaces as `DatabaseError::Duplicate` so callers
/// can recover (form error), instead of a generic SQLite failure.
pub fn insert_user(
    conn: &Connection,
    name: &str,
    username: &str,
    password_hash: &str,
) -> Result<i64, DatabaseError> {
    let result = conn.execute(
        "INSERT INTO users (name, username, password_hash) VALUES (?1, ?2, ?3)",
        params![name, username, password_hash],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(err, msg))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(DatabaseError::Duplicate(
                msg.unwrap_or_else(|| "users.username".to_string()),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_user_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<User>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, name, username, password_hash FROM users WHERE username = ?1",
        params![username],
        |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                username: row.get(2)?,
                password_hash: row.get(3)?,
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
