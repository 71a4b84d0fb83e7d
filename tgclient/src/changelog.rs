//! Decoder for the gateway's change-log playlist format
//!
//! The gateway describes the current state of a playlist (or of the
//! container listing a user's playlists) as a diff-style "next-change"
//! record:
//!
//! ```json
//! {
//!   "playlist": {
//!     "next-change": {
//!       "change": {
//!         "user": "alice",
//!         "time": 1262304000,
//!         "ops": {
//!           "add": { "items": "<id>[,<id>...]" },
//!           "name": "Jazz"
//!         }
//!       },
//!       "version": "5,1,1"
//!     }
//!   }
//! }
//! ```
//!
//! `items` is a single string of comma-separated tokens. Every token starts
//! with an id of exactly [`ID_LENGTH`] characters; any trailing characters
//! are per-item metadata this layer ignores. The revision counter is the
//! integer before the first comma of `version`, and `time` is whole seconds
//! since the epoch.
//!
//! A payload missing `version` or `items` is malformed and decoding fails;
//! an empty `items` string, however, is a playlist with zero items.

use crate::error::{Error, Result};
use crate::models::{Playlist, PlaylistContainer, ID_LENGTH};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ChangeLogPayload {
    playlist: Envelope,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "next-change")]
    next_change: NextChange,
}

#[derive(Debug, Deserialize)]
struct NextChange {
    change: Change,
    version: String,
}

#[derive(Debug, Deserialize)]
struct Change {
    user: String,
    time: i64,
    ops: Ops,
}

#[derive(Debug, Deserialize)]
struct Ops {
    add: AddOp,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddOp {
    items: String,
}

/// Decode a playlist from a change-log payload.
///
/// Fails with [`Error::Json`] when the payload does not match the wire
/// shape, and with [`Error::ChangeLog`] when a field that does parse is
/// semantically invalid (non-integer revision, missing name, out-of-range
/// timestamp).
pub fn decode_playlist(payload: &Value) -> Result<Playlist> {
    let next_change = parse_payload(payload)?;
    let name = next_change
        .change
        .ops
        .name
        .ok_or_else(|| Error::change_log("playlist change is missing ops.name"))?;

    Ok(Playlist {
        author: next_change.change.user,
        time: parse_time(next_change.change.time)?,
        revision: parse_revision(&next_change.version)?,
        name,
        tracks: split_ids(&next_change.change.ops.add.items),
    })
}

/// Decode a playlist container from a change-log payload.
///
/// Identical to [`decode_playlist`] except that the items are playlist ids
/// and no name is expected.
pub fn decode_playlist_container(payload: &Value) -> Result<PlaylistContainer> {
    let next_change = parse_payload(payload)?;

    Ok(PlaylistContainer {
        author: next_change.change.user,
        time: parse_time(next_change.change.time)?,
        revision: parse_revision(&next_change.version)?,
        playlists: split_ids(&next_change.change.ops.add.items),
    })
}

impl Playlist {
    /// Decode a playlist from a gateway change-log payload.
    pub fn from_change_log(payload: &Value) -> Result<Self> {
        decode_playlist(payload)
    }
}

impl PlaylistContainer {
    /// Decode a playlist container from a gateway change-log payload.
    pub fn from_change_log(payload: &Value) -> Result<Self> {
        decode_playlist_container(payload)
    }
}

fn parse_payload(payload: &Value) -> Result<NextChange> {
    let decoded: ChangeLogPayload = serde_json::from_value(payload.clone())?;
    Ok(decoded.playlist.next_change)
}

/// Split an `items` string into ids, keeping the first [`ID_LENGTH`]
/// characters of each comma-separated token.
///
/// An empty string decodes to zero ids, not one empty id.
fn split_ids(items: &str) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }

    items
        .split(',')
        .map(|token| token.get(..ID_LENGTH).unwrap_or(token).to_string())
        .collect()
}

/// Parse the revision counter from the leading component of a
/// comma-separated version string.
fn parse_revision(version: &str) -> Result<u64> {
    let leading = version.split(',').next().unwrap_or(version);
    leading.parse().map_err(|_| {
        Error::change_log(format!("invalid revision in version string {version:?}"))
    })
}

fn parse_time(secs: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| Error::change_log(format!("timestamp {secs} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn container_payload(items: &str, version: &str) -> Value {
        json!({
            "playlist": {
                "next-change": {
                    "change": {
                        "user": "u",
                        "time": 1000,
                        "ops": {"add": {"items": items}}
                    },
                    "version": version
                }
            }
        })
    }

    fn playlist_payload(items: &str, version: &str, name: &str) -> Value {
        json!({
            "playlist": {
                "next-change": {
                    "change": {
                        "user": "alice",
                        "time": 1262304000,
                        "ops": {"add": {"items": items}, "name": name}
                    },
                    "version": version
                }
            }
        })
    }

    #[test]
    fn test_decode_playlist_container() {
        let items = format!("{},{}", "a".repeat(32), "b".repeat(32));
        let payload = container_payload(&items, "5,1,1");

        let container = decode_playlist_container(&payload).unwrap();

        assert_eq!(container.author, "u");
        assert_eq!(container.time, Utc.timestamp_opt(1000, 0).unwrap());
        assert_eq!(container.revision, 5);
        assert_eq!(container.playlists, vec!["a".repeat(32), "b".repeat(32)]);
    }

    #[test]
    fn test_decode_playlist() {
        let items = format!("{},{}", "c".repeat(32), "d".repeat(32));
        let payload = playlist_payload(&items, "12,3,9", "Jazz");

        let playlist = decode_playlist(&payload).unwrap();

        assert_eq!(playlist.author, "alice");
        assert_eq!(playlist.name, "Jazz");
        assert_eq!(playlist.revision, 12);
        assert_eq!(playlist.tracks, vec!["c".repeat(32), "d".repeat(32)]);
    }

    #[test]
    fn test_token_trailing_characters_are_ignored() {
        // Tokens may carry metadata after the 32-character id.
        let items = format!("{}0002", "e".repeat(32));
        let payload = container_payload(&items, "1");

        let container = decode_playlist_container(&payload).unwrap();
        assert_eq!(container.playlists, vec!["e".repeat(32)]);
    }

    #[test]
    fn test_empty_items_decodes_to_zero_ids() {
        let payload = container_payload("", "3,1,1");

        let container = decode_playlist_container(&payload).unwrap();
        assert!(container.playlists.is_empty());
    }

    #[test]
    fn test_missing_version_is_fatal() {
        let payload = json!({
            "playlist": {
                "next-change": {
                    "change": {
                        "user": "u",
                        "time": 1000,
                        "ops": {"add": {"items": ""}}
                    }
                }
            }
        });

        assert!(decode_playlist_container(&payload).is_err());
    }

    #[test]
    fn test_missing_items_is_fatal() {
        let payload = json!({
            "playlist": {
                "next-change": {
                    "change": {"user": "u", "time": 1000, "ops": {"add": {}}},
                    "version": "1,1,1"
                }
            }
        });

        assert!(decode_playlist_container(&payload).is_err());
    }

    #[test]
    fn test_non_integer_revision_is_fatal() {
        let payload = container_payload("", "latest,1,1");

        let err = decode_playlist_container(&payload).unwrap_err();
        assert!(matches!(err, Error::ChangeLog(_)));
    }

    #[test]
    fn test_playlist_without_name_is_fatal() {
        let payload = container_payload(&"f".repeat(32), "1,1,1");

        let err = decode_playlist(&payload).unwrap_err();
        assert!(matches!(err, Error::ChangeLog(_)));
    }
}
