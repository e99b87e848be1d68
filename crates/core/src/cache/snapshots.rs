//! Stored response snapshots.
//!
//! A snapshot is written once per `put` and never mutated; a later `put` for
//! the same request identity replaces the row wholesale.

use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// An immutable capture of a network response at caching time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Snapshot {
    /// Request identity hash (see [`super::hash::RequestKey`]).
    pub hash: String,
    pub method: String,
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub cached_at: String,
}

impl CacheDb {
    /// Insert or replace a snapshot in `store`, creating the store if needed.
    pub async fn upsert_snapshot(&self, store: &str, snapshot: &Snapshot) -> Result<(), Error> {
        let store = store.to_string();
        let snapshot = snapshot.clone();
        let headers_json = serde_json::to_string(&snapshot.headers)?;
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO stores (name, created_at) VALUES (?1, ?2)",
                    params![&store, &created_at],
                )?;
                conn.execute(
                    "INSERT INTO entries (store, hash, method, url, status, headers_json, body, cached_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(store, hash) DO UPDATE SET
                        method = excluded.method,
                        url = excluded.url,
                        status = excluded.status,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        cached_at = excluded.cached_at",
                    params![
                        &store,
                        &snapshot.hash,
                        &snapshot.method,
                        &snapshot.url,
                        snapshot.status,
                        &headers_json,
                        &snapshot.body,
                        &snapshot.cached_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get the snapshot stored under `hash` in `store`.
    ///
    /// Returns None if either the store or the entry doesn't exist.
    pub async fn get_snapshot(&self, store: &str, hash: &str) -> Result<Option<Snapshot>, Error> {
        let store = store.to_string();
        let hash = hash.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Snapshot>, Error> {
                let result = conn.query_row(
                    "SELECT hash, method, url, status, headers_json, body, cached_at
                     FROM entries WHERE store = ?1 AND hash = ?2",
                    params![store, hash],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, u16>(3)?,
                            row.get::<_, String>(4)?,
                            row.get::<_, Vec<u8>>(5)?,
                            row.get::<_, String>(6)?,
                        ))
                    },
                );

                match result {
                    Ok((hash, method, url, status, headers_json, body, cached_at)) => Ok(Some(Snapshot {
                        hash,
                        method,
                        url,
                        status,
                        headers: serde_json::from_str(&headers_json)?,
                        body,
                        cached_at,
                    })),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Number of snapshots held by `store`.
    pub async fn count_snapshots(&self, store: &str) -> Result<u64, Error> {
        let store = store.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM entries WHERE store = ?1", params![store], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
