//! Grouping and sorting operations over track collections
//!
//! These are pure functions over decoded [`Track`] lists: collapsing tracks
//! that are the same recording published several times (same title and
//! artist) into one representative, and sorting by a chosen field.

use crate::models::Track;
use std::cmp::Ordering;

/// Field to sort a track collection by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Track title (default)
    #[default]
    Title,
    /// Artist name
    Artist,
    /// Album title
    Album,
    /// Release year
    Year,
    /// Track length
    Length,
    /// Popularity
    Popularity,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending (default)
    #[default]
    Asc,
    /// Descending
    Desc,
}

/// Collapse identical tracks into one representative each.
///
/// Two tracks are identical when they share both title and artist. The
/// first occurrence (in input order) becomes the representative; every
/// later duplicate is moved, preserving relative order, into the
/// representative's `identical_tracks` list. Representatives keep their
/// first-seen order.
///
/// Every input track appears exactly once in the result, either as a
/// representative or inside one representative's group, so the operation is
/// idempotent: a collection that is already grouped passes through
/// unchanged.
pub fn group_identical_tracks(tracks: Vec<Track>) -> Vec<Track> {
    let mut slots: Vec<Option<Track>> = tracks.into_iter().map(Some).collect();
    let mut grouped = Vec::with_capacity(slots.len());

    for i in 0..slots.len() {
        let Some(mut representative) = slots[i].take() else {
            continue;
        };

        for slot in slots.iter_mut().skip(i + 1) {
            let identical = slot.as_ref().is_some_and(|track| {
                track.title == representative.title && track.artist == representative.artist
            });
            if identical {
                if let Some(track) = slot.take() {
                    representative.identical_tracks.push(track);
                }
            }
        }

        grouped.push(representative);
    }

    grouped
}

/// Sort tracks in place by the given field.
///
/// The sort is stable; numeric fields compare numerically, string fields
/// lexicographically. A field that is absent on either side compares equal,
/// leaving the original relative order of those tracks untouched.
pub fn sort_tracks(tracks: &mut [Track], field: SortField, order: SortOrder) {
    tracks.sort_by(|a, b| {
        let ordering = compare_field(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_field(a: &Track, b: &Track, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.cmp(&b.title),
        SortField::Artist => a.artist.cmp(&b.artist),
        SortField::Album => compare_present(a.album.as_ref(), b.album.as_ref()),
        SortField::Year => compare_present(a.year.as_ref(), b.year.as_ref()),
        SortField::Length => compare_present(a.length.as_ref(), b.length.as_ref()),
        SortField::Popularity => match (a.popularity, b.popularity) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
    }
}

fn compare_present<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
