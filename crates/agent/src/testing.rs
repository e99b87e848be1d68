//! Scripted host doubles shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use coldchain_core::{
    AgentConfig, AgentRequest, CacheDb, CacheStorage, Error, LiveResponse, Network, RequestKey, Snapshot,
};

pub const ORIGIN: &str = "https://app.coldchain.example";

/// Network double answering from a URL table.
#[derive(Default)]
pub struct ScriptedNetwork {
    routes: Mutex<HashMap<String, (u16, Vec<u8>)>>,
    offline: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.respond_bytes(url, status, body.as_bytes());
    }

    pub fn respond_bytes(&self, url: &str, status: u16, body: &[u8]) {
        self.routes.lock().unwrap().insert(url.to_string(), (status, body.to_vec()));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Network for ScriptedNetwork {
    async fn fetch(&self, request: &AgentRequest) -> Result<LiveResponse, Error> {
        self.calls.lock().unwrap().push(request.url.to_string());
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network("offline".into()));
        }
        let route = self.routes.lock().unwrap().get(request.url.as_str()).cloned();
        Ok(match route {
            Some((status, body)) => LiveResponse::new(status, vec![("Content-Type".into(), "text/html".into())], body),
            None => LiveResponse::new(404, Vec::new(), "not found"),
        })
    }
}

/// In-memory SQLite storage with switchable failures and a write counter.
pub struct FlakyStorage {
    db: CacheDb,
    fail_open: AtomicBool,
    fail_puts: AtomicBool,
    fail_keys: AtomicBool,
    fail_deletes: Mutex<HashSet<String>>,
    puts: AtomicUsize,
    deletes: AtomicUsize,
}

impl FlakyStorage {
    pub async fn new() -> Arc<Self> {
        Arc::new(Self {
            db: CacheDb::open_in_memory().await.unwrap(),
            fail_open: AtomicBool::new(false),
            fail_puts: AtomicBool::new(false),
            fail_keys: AtomicBool::new(false),
            fail_deletes: Mutex::new(HashSet::new()),
            puts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        })
    }

    pub fn fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_keys(&self, fail: bool) {
        self.fail_keys.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete_of(&self, name: &str) {
        self.fail_deletes.lock().unwrap().insert(name.to_string());
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn db(&self) -> &CacheDb {
        &self.db
    }
}

#[async_trait]
impl CacheStorage for FlakyStorage {
    async fn open(&self, name: &str) -> Result<(), Error> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(Error::Host("storage unavailable".into()));
        }
        CacheStorage::open(&self.db, name).await
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        if self.fail_keys.load(Ordering::SeqCst) {
            return Err(Error::Host("cache enumeration failed".into()));
        }
        self.db.keys().await
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        if self.fail_deletes.lock().unwrap().contains(name) {
            return Err(Error::Host(format!("cannot delete {name}")));
        }
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.db.delete(name).await
    }

    async fn match_request(&self, name: &str, key: &RequestKey) -> Result<Option<Snapshot>, Error> {
        self.db.match_request(name, key).await
    }

    async fn put(&self, name: &str, key: &RequestKey, snapshot: &Snapshot) -> Result<(), Error> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(Error::Host("quota exceeded".into()));
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.db.put(name, key, snapshot).await
    }
}

pub fn test_config() -> AgentConfig {
    AgentConfig {
        origin: ORIGIN.into(),
        precache: vec!["/".into(), "/index.html".into(), "/manifest.json".into()],
        ..Default::default()
    }
}

pub fn url(s: &str) -> url::Url {
    url::Url::parse(s).unwrap()
}
