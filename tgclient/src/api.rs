//! Low-level request dispatch to the gateway
//!
//! Every endpoint call funnels through [`GatewayApi::request`], which issues
//! exactly one GET and folds the possible outcomes into a single
//! `Result<Value>`: transport failures (network error, timeout, non-success
//! status) and application failures (an `error` field in an otherwise
//! well-formed body) become [`Error`] variants, anything else is the decoded
//! payload. A request either succeeds or fails, never both, and awaiting
//! the returned future delivers the outcome exactly once.
//!
//! There are no retries and no coalescing; concurrent requests are fully
//! independent, and dropping the future is the only cancellation.

use crate::error::{Error, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Fixed response-format selector appended to every request
const FORMAT_PARAM: (&str, &str) = ("format", "json");

/// Default timeout for gateway requests (10 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Dispatches single requests to the gateway.
///
/// The base URL is per-instance state: [`GatewayApi::set_gateway`] redirects
/// future requests without affecting those already dispatched.
#[derive(Debug, Clone)]
pub struct GatewayApi {
    client: Client,
    gateway: String,
    timeout: Duration,
}

impl GatewayApi {
    /// Create a dispatcher over an existing HTTP client
    pub fn new(client: Client, gateway: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            gateway: gateway.into(),
            timeout,
        }
    }

    /// Current gateway base URL
    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    /// Change the base URL used by subsequent requests.
    ///
    /// Requests already in flight keep the URL they were dispatched with.
    pub fn set_gateway(&mut self, gateway: impl Into<String>) {
        self.gateway = gateway.into();
    }

    /// Configured per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue a single GET to `<gateway>/<handler>` with `params` as query
    /// parameters plus the fixed `format=json` selector.
    ///
    /// Returns the decoded payload, or:
    /// - [`Error::Timeout`] when the bounded wait elapses,
    /// - [`Error::Http`] for other transport failures,
    /// - [`Error::Status`] for a non-success HTTP status,
    /// - [`Error::Gateway`] when the body carries an `error` field (the
    ///   payload is never returned in that case).
    pub async fn request(&self, handler: &str, params: &[(&str, &str)]) -> Result<Value> {
        let mut url = Url::parse(&format!("{}/{}", self.gateway, handler))?;
        for (key, value) in params {
            url.query_pairs_mut().append_pair(key, value);
        }
        url.query_pairs_mut()
            .append_pair(FORMAT_PARAM.0, FORMAT_PARAM.1);

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Gateway returned status {}", status);
            return Err(Error::Status(status.as_u16()));
        }

        let payload: Value = response.json().await.map_err(classify_transport)?;

        // The gateway reports application failures as an `error` field in an
        // otherwise well-formed 200 body.
        if let Some(message) = payload.get("error") {
            let message = message
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| message.to_string());
            warn!("Gateway error: {}", message);
            return Err(Error::Gateway(message));
        }

        Ok(payload)
    }

    /// URL for fetching an image out of band. No request is made; the URL is
    /// meant for direct consumption (e.g. an image widget).
    pub fn image_url(&self, id: &str, session: &str) -> String {
        format!("{}/image?session={}&id={}", self.gateway, session, id)
    }

    /// URL for streaming a file out of band. No request is made; the URL is
    /// meant for direct consumption (e.g. a media element).
    pub fn stream_url(&self, track_id: &str, file_id: &str, session: &str) -> String {
        format!(
            "{}/stream?session={}&id={}&file={}",
            self.gateway, session, track_id, file_id
        )
    }
}

/// Timeouts get their own variant so callers can tell them apart from a
/// gateway-reported error; everything else stays a reqwest error.
fn classify_transport(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(gateway: &str) -> GatewayApi {
        GatewayApi::new(
            Client::new(),
            gateway,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    #[test]
    fn test_image_url() {
        let api = api("http://gw.example:8080");
        assert_eq!(
            api.image_url("img42", "sess1"),
            "http://gw.example:8080/image?session=sess1&id=img42"
        );
    }

    #[test]
    fn test_stream_url() {
        let api = api("http://gw.example:8080");
        assert_eq!(
            api.stream_url("track1", "file9", "sess1"),
            "http://gw.example:8080/stream?session=sess1&id=track1&file=file9"
        );
    }

    #[test]
    fn test_set_gateway_changes_future_urls() {
        let mut api = api("http://old.example");
        api.set_gateway("http://new.example");
        assert_eq!(api.gateway(), "http://new.example");
        assert!(api.image_url("i", "s").starts_with("http://new.example/"));
    }
}
