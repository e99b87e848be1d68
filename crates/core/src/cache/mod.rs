//! SQLite-backed cache stores for response snapshots.
//!
//! This module provides named, versioned stores using SQLite with async
//! access via tokio-rusqlite. It supports:
//!
//! - Request identity keys using SHA-256 over method and URL
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Whole-store deletion, cascading to every snapshot the store owns

pub mod connection;
pub mod hash;
pub mod migrations;
pub mod snapshots;
pub mod storage;
pub mod stores;

pub use crate::Error;

pub use connection::CacheDb;
pub use hash::RequestKey;
pub use snapshots::Snapshot;
