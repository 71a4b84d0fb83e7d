//! Persistent client-side cache for tunegate
//!
//! This crate provides [`CacheStore`], a named string-keyed JSON-value store
//! backed by a single JSON file. It is the persistence layer callers use to
//! keep fetched gateway entities (tracks, playlists) across restarts, keyed
//! by a content hash such as a track or playlist id.
//!
//! The store is deliberately simple: every operation reads or rewrites the
//! whole backing file, which always holds one JSON object mapping keys to
//! values. A store that has never been written deserializes to the empty
//! mapping. There is no TTL, no eviction and no locking; the execution model
//! assumes a single writer.
//!
//! # Example
//!
//! ```no_run
//! use tgcache::CacheStore;
//! use serde_json::json;
//!
//! fn main() -> anyhow::Result<()> {
//!     let cache = CacheStore::open("tracks")?;
//!
//!     cache.store("4f9ac01f2ba642d8afdcbc12ac795f16", &json!({
//!         "title": "So What",
//!         "artist": "Miles Davis",
//!     }))?;
//!
//!     if let Some(track) = cache.load("4f9ac01f2ba642d8afdcbc12ac795f16")? {
//!         println!("cached: {}", track["title"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod store;

pub use store::{CacheStore, DEFAULT_STORE_NAME};
