//! Client library for a session-based music-catalog gateway
//!
//! `tgclient` talks to a gateway that proxies a session-based music-catalog
//! backend over plain HTTP GET requests. It provides:
//!
//! - **Request dispatch** ([`api::GatewayApi`]): one GET per operation with
//!   a fixed `format=json` selector and a bounded timeout, unifying
//!   transport failures, non-success statuses and gateway-reported errors
//!   into a single [`Error`] taxonomy.
//! - **Endpoint façade** ([`GatewayClient`]): one method per backend
//!   operation (session bootstrap, catalog search/browse/toplist, playlists,
//!   playback control), plus out-of-band image and stream URL builders that
//!   perform no request.
//! - **Change-log decoding** ([`changelog`]): reconstruction of [`Playlist`]
//!   and [`PlaylistContainer`] entities from the gateway's diff-style
//!   "next-change" payloads, including the fixed 32-character id slicing.
//! - **Track-collection operations** ([`tracks`]): grouping of identical
//!   tracks (same title and artist) and stable field-based sorting.
//! - **Cache-through fetches** over a [`tgcache::CacheStore`], so decoded
//!   playlists survive restarts.
//!
//! Sessions are opaque: the caller obtains a token via [`GatewayClient::start`]
//! / [`GatewayClient::login`] and passes it to session-scoped operations.
//! The library never negotiates or refreshes sessions on its own.
//!
//! # Example
//!
//! ```no_run
//! use tgclient::{GatewayClient, SortField, SortOrder, Track};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GatewayClient::builder()
//!         .gateway("http://localhost:8080")
//!         .build()?;
//!
//!     let started = client.start().await?;
//!     let session = started["session"].as_str().unwrap_or_default().to_string();
//!
//!     let results = client.search(&[("query", "so what")], &session).await?;
//!     let tracks: Vec<Track> =
//!         serde_json::from_value(results["result"]["tracks"].clone())?;
//!
//!     let mut tracks = tgclient::group_identical_tracks(tracks);
//!     tgclient::sort_tracks(&mut tracks, SortField::Title, SortOrder::Asc);
//!
//!     for track in &tracks {
//!         println!("{} - {} ({} more)",
//!             track.artist, track.title, track.identical_tracks.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod changelog;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod tracks;

// Re-exports
pub use api::GatewayApi;
pub use client::{ClientBuilder, GatewayClient};
pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use models::{
    FileDescriptor, FileEntry, FileList, Playlist, PlaylistContainer, Track, ID_LENGTH,
};
pub use tracks::{group_identical_tracks, sort_tracks, SortField, SortOrder};
