//! Core types and shared functionality for the ColdChain agent.
//!
//! This crate provides:
//! - Cache store implementation with SQLite backend
//! - Request, response and snapshot value types
//! - Host platform traits
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod platform;

pub use cache::{CacheDb, RequestKey, Snapshot};
pub use config::{AgentConfig, ConfigError};
pub use error::Error;
pub use http::{AgentRequest, LiveResponse, OFFLINE_BODY, RequestMode, ResponseSource};
pub use lifecycle::LifecycleState;
pub use platform::{CacheStorage, Host, Network, Notification, WindowClient};
