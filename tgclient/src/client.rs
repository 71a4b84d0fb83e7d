//! Gateway client façade
//!
//! One method per gateway endpoint. Session-scoped operations take the
//! caller-supplied session token as an opaque string and inject it into the
//! query parameters; everything else is delegated to
//! [`GatewayApi::request`]. Two operations (`image_url`, `stream_url`)
//! perform no request at all and only synthesize URLs.
//!
//! # Example
//!
//! ```no_run
//! use tgclient::GatewayClient;
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
//!     let container = client.playlists_decoded(&session).await?;
//!     println!("{} playlists (revision {})",
//!         container.playlists.len(),
//!         container.revision
//!     );
//!
//!     Ok(())
//! }
//! ```

use crate::api::{GatewayApi, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::models::{Playlist, PlaylistContainer, Track};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tgcache::CacheStore;
use tracing::debug;

/// Default gateway base URL (a locally running gateway)
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "tunegate/0.1.0";

/// Cache key under which the decoded playlist container is stored
pub const PLAYLIST_CONTAINER_KEY: &str = "playlist-container";

/// High-level gateway client
#[derive(Debug, Clone)]
pub struct GatewayClient {
    api: GatewayApi,
}

impl GatewayClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client over an existing `reqwest::Client`.
    ///
    /// Useful for sharing HTTP connection pools or custom proxy settings.
    pub fn with_client(client: Client) -> Self {
        Self {
            api: GatewayApi::new(
                client,
                DEFAULT_GATEWAY_URL,
                Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        }
    }

    /// Current gateway base URL
    pub fn gateway(&self) -> &str {
        self.api.gateway()
    }

    /// Change the gateway base URL for subsequent requests.
    ///
    /// Requests already dispatched are unaffected.
    pub fn set_gateway(&mut self, gateway: impl Into<String>) {
        self.api.set_gateway(gateway);
    }

    /// The underlying dispatcher
    pub fn api(&self) -> &GatewayApi {
        &self.api
    }

    // ========================================================================
    // Session bootstrap
    // ========================================================================

    /// Start a new gateway session
    pub async fn start(&self) -> Result<Value> {
        self.api.request("start", &[]).await
    }

    /// Check whether a session is still alive
    pub async fn check(&self, session: &str) -> Result<Value> {
        self.api.request("check", &[("session", session)]).await
    }

    /// Log in with caller-assembled credentials parameters
    pub async fn login(&self, params: &[(&str, &str)]) -> Result<Value> {
        self.api.request("login", params).await
    }

    /// Close a session
    pub async fn close(&self, session: &str) -> Result<Value> {
        self.api.request("close", &[("session", session)]).await
    }

    /// Fetch the logged-in user's profile
    pub async fn user(&self, session: &str) -> Result<Value> {
        self.api.request("user", &[("session", session)]).await
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Fetch a toplist (charts)
    pub async fn toplist(&self, params: &[(&str, &str)], session: &str) -> Result<Value> {
        self.api
            .request("toplist", &with_session(params, session))
            .await
    }

    /// Search the catalog
    pub async fn search(&self, params: &[(&str, &str)], session: &str) -> Result<Value> {
        self.api
            .request("search", &with_session(params, session))
            .await
    }

    /// Browse an artist, album or track by id
    pub async fn browse(&self, params: &[(&str, &str)], session: &str) -> Result<Value> {
        self.api
            .request("browse", &with_session(params, session))
            .await
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Fetch the raw playlist-container payload for the logged-in user
    pub async fn playlists(&self, session: &str) -> Result<Value> {
        self.api.request("playlists", &[("session", session)]).await
    }

    /// Fetch a raw playlist payload
    pub async fn playlist(&self, params: &[(&str, &str)], session: &str) -> Result<Value> {
        self.api
            .request("playlist", &with_session(params, session))
            .await
    }

    /// Fetch and decode the playlist container for the logged-in user
    pub async fn playlists_decoded(&self, session: &str) -> Result<PlaylistContainer> {
        let payload = self.playlists(session).await?;
        PlaylistContainer::from_change_log(&payload)
    }

    /// Fetch and decode a playlist by id
    pub async fn playlist_decoded(&self, id: &str, session: &str) -> Result<Playlist> {
        let payload = self.playlist(&[("id", id)], session).await?;
        Playlist::from_change_log(&payload)
    }

    /// Fetch a playlist through a cache store.
    ///
    /// The decoded playlist is looked up under its id first; on a miss it is
    /// fetched from the gateway, decoded and stored before being returned.
    pub async fn playlist_cached(
        &self,
        cache: &CacheStore,
        id: &str,
        session: &str,
    ) -> Result<Playlist> {
        if let Some(value) = cache.load(id)? {
            debug!("Playlist {} found in cache", id);
            return Ok(serde_json::from_value(value)?);
        }

        let playlist = self.playlist_decoded(id, session).await?;
        cache.store(id, &playlist)?;

        Ok(playlist)
    }

    /// Fetch the playlist container through a cache store.
    ///
    /// Stored under the fixed key [`PLAYLIST_CONTAINER_KEY`]; use one store
    /// per user to keep containers apart.
    pub async fn playlists_cached(
        &self,
        cache: &CacheStore,
        session: &str,
    ) -> Result<PlaylistContainer> {
        if let Some(value) = cache.load(PLAYLIST_CONTAINER_KEY)? {
            debug!("Playlist container found in cache");
            return Ok(serde_json::from_value(value)?);
        }

        let container = self.playlists_decoded(session).await?;
        cache.store(PLAYLIST_CONTAINER_KEY, &container)?;

        Ok(container)
    }

    // ========================================================================
    // Playback control
    // ========================================================================

    /// Start playing a track.
    ///
    /// Selects the track's first file descriptor; it is an error for the
    /// track to carry none.
    pub async fn play_track(&self, track: &Track, session: &str) -> Result<Value> {
        let file = track
            .first_file()
            .ok_or_else(|| Error::NoFiles(track.id.clone()))?;

        self.api
            .request(
                "play",
                &[("session", session), ("id", &track.id), ("file", &file.id)],
            )
            .await
    }

    /// Resume playback
    pub async fn play(&self, session: &str) -> Result<Value> {
        self.api.request("play", &[("session", session)]).await
    }

    /// Pause playback
    pub async fn pause(&self, session: &str) -> Result<Value> {
        self.api.request("pause", &[("session", session)]).await
    }

    /// Stop playback
    pub async fn stop(&self, session: &str) -> Result<Value> {
        self.api.request("stop", &[("session", session)]).await
    }

    // ========================================================================
    // Out-of-band URLs (no request is performed)
    // ========================================================================

    /// URL for fetching an image by id
    pub fn image_url(&self, id: &str, session: &str) -> String {
        self.api.image_url(id, session)
    }

    /// URL for streaming a track, using its first file descriptor.
    ///
    /// It is an error for the track to carry no file descriptors.
    pub fn stream_url(&self, track: &Track, session: &str) -> Result<String> {
        let file = track
            .first_file()
            .ok_or_else(|| Error::NoFiles(track.id.clone()))?;

        Ok(self.api.stream_url(&track.id, &file.id, session))
    }
}

/// Append the session token to caller-supplied parameters.
fn with_session<'a>(params: &[(&'a str, &'a str)], session: &'a str) -> Vec<(&'a str, &'a str)> {
    let mut all = params.to_vec();
    all.push(("session", session));
    all
}

/// Builder for configuring a [`GatewayClient`]
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    gateway: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            gateway: DEFAULT_GATEWAY_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder pre-populated from a configuration
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            gateway: config.gateway.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            ..Self::default()
        }
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the gateway base URL
    pub fn gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<GatewayClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder().user_agent(&self.user_agent).build()?,
        };

        Ok(GatewayClient {
            api: GatewayApi::new(client, self.gateway, self.timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileDescriptor, FileEntry, FileList};

    fn track_with_files(files: FileEntry) -> Track {
        Track {
            id: "t".repeat(32),
            title: "So What".to_string(),
            artist: "Miles Davis".to_string(),
            album: None,
            year: None,
            length: None,
            popularity: None,
            files: FileList { file: files },
            identical_tracks: Vec::new(),
        }
    }

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::default();
        assert_eq!(builder.gateway, DEFAULT_GATEWAY_URL);
        assert_eq!(
            builder.timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_builder_from_config() {
        let config = GatewayConfig {
            gateway: "http://gw.example:9999".to_string(),
            timeout_secs: 3,
            ..Default::default()
        };

        let builder = ClientBuilder::from_config(&config);
        assert_eq!(builder.gateway, "http://gw.example:9999");
        assert_eq!(builder.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_stream_url_picks_first_of_many() {
        let client = GatewayClient::new().unwrap();
        let track = track_with_files(FileEntry::Many(vec![
            FileDescriptor {
                id: "f1".to_string(),
                format: None,
            },
            FileDescriptor {
                id: "f2".to_string(),
                format: None,
            },
        ]));

        let url = client.stream_url(&track, "sess").unwrap();
        assert!(url.contains("file=f1"));
        assert!(url.contains(&format!("id={}", "t".repeat(32))));
    }

    #[test]
    fn test_stream_url_single_descriptor() {
        let client = GatewayClient::new().unwrap();
        let track = track_with_files(FileEntry::One(FileDescriptor {
            id: "only".to_string(),
            format: None,
        }));

        let url = client.stream_url(&track, "sess").unwrap();
        assert!(url.contains("file=only"));
    }

    #[test]
    fn test_stream_url_without_files_is_an_error() {
        let client = GatewayClient::new().unwrap();
        let track = track_with_files(FileEntry::Many(Vec::new()));

        assert!(matches!(
            client.stream_url(&track, "sess"),
            Err(Error::NoFiles(_))
        ));
    }

    #[test]
    fn test_set_gateway_redirects_urls() {
        let mut client = GatewayClient::new().unwrap();
        client.set_gateway("http://elsewhere.example");

        assert!(client
            .image_url("img", "sess")
            .starts_with("http://elsewhere.example/"));
    }
}
