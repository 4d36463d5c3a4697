//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::debug;

/// Ensure the parent directory of a file-backed SQLite database exists.
///
/// Non-SQLite urls and in-memory databases are left untouched.
pub async fn ensure_sqlite_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite:") else { return Ok(()) };
    let path = rest.trim_start_matches("//");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
        debug!(dir = %dir.display(), "sqlite data directory ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ignores_postgres_and_memory_urls() {
        ensure_sqlite_dir("postgres://u:p@localhost/db").await.unwrap();
        ensure_sqlite_dir("sqlite::memory:").await.unwrap();
    }

    #[tokio::test]
    async fn creates_parent_dir_for_file_db() {
        let base = std::env::temp_dir().join(format!("rpg_auth_env_{}", std::process::id()));
        let url = format!("sqlite://{}/nested/users.db?mode=rwc", base.display());
        ensure_sqlite_dir(&url).await.unwrap();
        assert!(base.join("nested").is_dir());
        let _ = std::fs::remove_dir_all(base);
    }
}
