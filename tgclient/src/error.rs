//! Error types for the gateway client

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the gateway.
///
/// Three classes matter to callers: failures of the transport itself
/// ([`Error::Http`], [`Error::Timeout`], [`Error::Status`]), failures the
/// gateway reports inside an otherwise well-formed response
/// ([`Error::Gateway`]), and local decode failures. Use
/// [`Error::is_transport`] to tell the first class from the rest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Gateway answered with a non-success HTTP status
    #[error("gateway returned status {0}")]
    Status(u16),

    /// Gateway reported an application-level error in the response body
    #[error("gateway error: {0}")]
    Gateway(String),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed or written
    #[error("configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Cache store error
    #[error("cache error: {0}")]
    Cache(#[from] anyhow::Error),

    /// Change-log payload did not match the wire format
    #[error("malformed change log: {0}")]
    ChangeLog(String),

    /// Track carries no file descriptors to stream or play
    #[error("track {0} has no playable files")]
    NoFiles(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a change-log decode error
    pub fn change_log(msg: impl Into<String>) -> Self {
        Self::ChangeLog(msg.into())
    }

    /// True for failures of the transport itself (network error, timeout,
    /// non-success status), as opposed to errors the gateway reported in a
    /// well-formed response body.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Timeout | Error::Status(_))
    }

    /// True when the gateway itself reported the failure (an `error` field
    /// in the response body).
    pub fn is_gateway(&self) -> bool {
        matches!(self, Error::Gateway(_))
    }
}
