//! Cache inspection tools.
//!
//! Read-only views of the SQLite cache stores for the host's diagnostics.

pub mod get;
pub mod list;

pub use get::{CacheGetParams, get_impl};
pub use list::list_impl;
