//! Named cache stores.
//!
//! Store names carry a version tag (`coldchain-shell-v3`); the tag is what
//! generational replacement keys on.

use super::connection::CacheDb;
use crate::Error;
use tokio_rusqlite::params;

/// Version number embedded in a `<logical-name>-v<N>` store name.
pub fn version_tag(name: &str) -> Option<u32> {
    let (logical, version) = name.rsplit_once("-v")?;
    if logical.is_empty() || version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    version.parse().ok()
}

impl CacheDb {
    /// Create `name` if it doesn't exist yet.
    pub async fn open_store(&self, name: &str) -> Result<(), Error> {
        let name = name.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO stores (name, created_at) VALUES (?1, ?2)",
                    params![name, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Names of every existing store, oldest first.
    pub async fn store_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM stores ORDER BY created_at, name")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a store and every snapshot it owns.
    ///
    /// Returns false if no store had that name.
    pub async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM stores WHERE name = ?1", params![name])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::hash::RequestKey;
    use crate::cache::snapshots::Snapshot;

    #[test]
    fn test_version_tag() {
        assert_eq!(version_tag("coldchain-shell-v1"), Some(1));
        assert_eq!(version_tag("fonts-v12"), Some(12));
        assert_eq!(version_tag("coldchain-shell"), None);
        assert_eq!(version_tag("-v1"), None);
        assert_eq!(version_tag("shell-v"), None);
        assert_eq!(version_tag("shell-vx"), None);
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_store("shell-v1").await.unwrap();
        db.open_store("shell-v1").await.unwrap();

        assert_eq!(db.store_names().await.unwrap(), vec!["shell-v1".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_entries() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let key = RequestKey::new("GET", &url::Url::parse("https://example.com/").unwrap());
        let snapshot = Snapshot {
            hash: key.hash.clone(),
            method: key.method,
            url: key.url,
            status: 200,
            headers: Vec::new(),
            body: b"<html>".to_vec(),
            cached_at: chrono::Utc::now().to_rfc3339(),
        };
        db.upsert_snapshot("shell-v1", &snapshot).await.unwrap();

        assert!(db.delete_store("shell-v1").await.unwrap());
        assert!(db.store_names().await.unwrap().is_empty());
        assert_eq!(db.count_snapshots("shell-v1").await.unwrap(), 0);

        // Re-opening yields an empty store, not the old entries.
        db.open_store("shell-v1").await.unwrap();
        assert!(db.get_snapshot("shell-v1", &key.hash).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_store() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(!db.delete_store("fonts-v1").await.unwrap());
    }
}
