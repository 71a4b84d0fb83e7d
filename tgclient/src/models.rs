//! Data models for gateway payloads
//!
//! This module contains the entities reconstructed from gateway responses:
//! tracks as they appear in browse/search/toplist results, and the playlist
//! entities decoded from the change-log wire format (see [`crate::changelog`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of a catalog id in the gateway's text encoding.
///
/// Track and playlist ids are always exactly 32 characters; inside a
/// change-log token any characters past the id are metadata this layer
/// ignores.
pub const ID_LENGTH: usize = 32;

/// A track as returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// 32-character track id
    pub id: String,
    /// Track title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Album title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Release year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Track length in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Popularity in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    /// Available file encodings
    #[serde(default)]
    pub files: FileList,
    /// Tracks judged identical to this one (same title and artist),
    /// populated by [`crate::tracks::group_identical_tracks`]
    #[serde(
        rename = "identical-tracks",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub identical_tracks: Vec<Track>,
}

impl Track {
    /// First available file descriptor, if the track has any.
    ///
    /// The gateway lists encodings in preference order, so streaming and
    /// playback always pick the first one.
    pub fn first_file(&self) -> Option<&FileDescriptor> {
        self.files.file.first()
    }
}

/// The `files` field of a track.
///
/// The gateway emits `{"file": {...}}` for a track with a single encoding
/// and `{"file": [...]}` for several; [`FileEntry`] absorbs both shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileList {
    /// One or many file descriptors
    #[serde(default)]
    pub file: FileEntry,
}

/// A single file descriptor or a list of them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FileEntry {
    /// A single descriptor
    One(FileDescriptor),
    /// Several descriptors, in gateway preference order
    Many(Vec<FileDescriptor>),
}

impl Default for FileEntry {
    fn default() -> Self {
        FileEntry::Many(Vec::new())
    }
}

impl FileEntry {
    /// First descriptor, whether this entry holds one or many
    pub fn first(&self) -> Option<&FileDescriptor> {
        match self {
            FileEntry::One(file) => Some(file),
            FileEntry::Many(files) => files.first(),
        }
    }

    /// Number of descriptors
    pub fn len(&self) -> usize {
        match self {
            FileEntry::One(_) => 1,
            FileEntry::Many(files) => files.len(),
        }
    }

    /// True when the track carries no file descriptors
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An encoded file belonging to a track
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileDescriptor {
    /// File id used by the stream/play endpoints
    pub id: String,
    /// Encoding description (codec and bitrate)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// A playlist decoded from the gateway's change-log format.
///
/// Immutable after construction; a newer state of the same playlist arrives
/// as a fresh payload with a higher revision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Playlist {
    /// User who authored the latest change
    pub author: String,
    /// Time of the latest change
    pub time: DateTime<Utc>,
    /// Revision counter (leading component of the version string)
    pub revision: u64,
    /// Playlist name
    pub name: String,
    /// Ordered 32-character track ids
    pub tracks: Vec<String>,
}

/// The container listing a user's playlists, decoded from the same
/// change-log format as [`Playlist`] except that its items are playlist ids
/// and it carries no name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaylistContainer {
    /// User who authored the latest change
    pub author: String,
    /// Time of the latest change
    pub time: DateTime<Utc>,
    /// Revision counter (leading component of the version string)
    pub revision: u64,
    /// Ordered 32-character playlist ids
    pub playlists: Vec<String>,
}
