//! Cache schema migrations.
//!
//! Each schema version is applied at most once, inside its own transaction,
//! and recorded in `_migrations`.

use super::Error;
use tokio_rusqlite::{Connection, params};

/// Schema versions in application order.
const SCHEMA: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_cache_stores.sql"))];

/// Bring the schema up to the latest version.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS _migrations (version INTEGER PRIMARY KEY, applied_at TEXT NOT NULL)",
        )?;
        let applied: i64 = conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

        for &(version, sql) in SCHEMA.iter().filter(|(version, _)| *version > applied) {
            let tx = conn.transaction()?;
            tx.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("schema v{version}: {e}")))?;
            tx.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, chrono::Utc::now().to_rfc3339()],
            )?;
            tx.commit()?;
            tracing::debug!(version, "cache schema migrated");
        }
        Ok(())
    })
    .await
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rerun_applies_nothing() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        run(&conn).await.unwrap();

        let versions: Vec<i64> = conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT version FROM _migrations ORDER BY version")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect::<Result<Vec<i64>, _>>()
            })
            .await
            .unwrap();

        assert_eq!(versions, SCHEMA.iter().map(|(v, _)| *v).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_entries_cascade_with_their_store() {
        let conn = Connection::open_in_memory().await.unwrap();
        conn.call(|conn| conn.execute_batch("PRAGMA foreign_keys=ON;")).await.unwrap();
        run(&conn).await.unwrap();

        let remaining: i64 = conn
            .call(|conn| {
                conn.execute_batch(
                    "INSERT INTO stores (name, created_at) VALUES ('shell-v1', 'now');
                     INSERT INTO entries (store, hash, method, url, status, headers_json, body, cached_at)
                     VALUES ('shell-v1', 'h', 'GET', 'https://a.example/', 200, '[]', x'00ff', 'now');
                     DELETE FROM stores WHERE name = 'shell-v1';",
                )?;
                conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            })
            .await
            .unwrap();

        assert_eq!(remaining, 0);
    }
}
