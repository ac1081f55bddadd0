use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "clinicore";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "clinicore=info,tower_http=warn"
}

/// Socket address the API server binds to.
pub fn bind_addr() -> String {
    std::env::var("CLINICORE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8350".to_string())
}

/// Path of the SQLite database file.
pub fn database_path() -> PathBuf {
    std::env::var("CLINICORE_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("clinicore.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_clinicore() {
        assert_eq!(APP_NAME, "clinicore");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_database_path_is_relative() {
        if std::env::var("CLINICORE_DB").is_err() {
            assert_eq!(database_path(), PathBuf::from("clinicore.db"));
        }
    }

    #[test]
    fn default_log_filter_scopes_crate() {
        assert!(default_log_filter().starts_with("clinicore="));
    }
}
