//! [`CacheStorage`] over the SQLite backend.

use async_trait::async_trait;

use super::connection::CacheDb;
use super::hash::RequestKey;
use super::snapshots::Snapshot;
use crate::Error;
use crate::platform::CacheStorage;

#[async_trait]
impl CacheStorage for CacheDb {
    async fn open(&self, name: &str) -> Result<(), Error> {
        self.open_store(name).await
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.store_names().await
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        self.delete_store(name).await
    }

    async fn match_request(&self, name: &str, key: &RequestKey) -> Result<Option<Snapshot>, Error> {
        self.get_snapshot(name, &key.hash).await
    }

    async fn put(&self, name: &str, key: &RequestKey, snapshot: &Snapshot) -> Result<(), Error> {
        if snapshot.hash != key.hash {
            return Err(Error::InvalidInput(format!("snapshot for {} stored under key for {}", snapshot.url, key.url)));
        }
        self.upsert_snapshot(name, snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{AgentRequest, LiveResponse};

    fn request(url: &str) -> AgentRequest {
        AgentRequest::get(url::Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn test_put_then_match() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let storage: &dyn CacheStorage = &db;
        let req = request("https://fonts.gstatic.com/s/inter.woff2");
        let snapshot = LiveResponse::new(200, vec![], "font").snapshot(&req.key());

        storage.put("fonts-v1", &req.key(), &snapshot).await.unwrap();

        let found = storage.match_request("fonts-v1", &req.key()).await.unwrap();
        assert_eq!(found, Some(snapshot));
        assert_eq!(storage.keys().await.unwrap(), vec!["fonts-v1".to_string()]);
    }

    #[tokio::test]
    async fn test_put_rejects_mismatched_key() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let snapshot = LiveResponse::new(200, vec![], "a").snapshot(&request("https://example.com/a").key());

        let result = db.put("shell-v1", &request("https://example.com/b").key(), &snapshot).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_match_in_missing_store() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let found = db.match_request("never-opened-v1", &request("https://example.com/").key()).await.unwrap();
        assert!(found.is_none());
    }
}
