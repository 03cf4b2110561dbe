use super::error::DuplicateTrack;
use super::model::{Track, TrackEntry};

/// Append-only, insertion-ordered list of tracks with unique names.
#[derive(Debug, Default)]
pub struct TrackStore {
    tracks: Vec<Track>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `track`, returning its index. Rejects a name that is already
    /// present and leaves the store untouched.
    pub fn push(&mut self, track: Track) -> Result<usize, DuplicateTrack> {
        if self.contains(&track.name) {
            return Err(DuplicateTrack(track.name));
        }
        self.tracks.push(track);
        Ok(self.tracks.len() - 1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tracks.iter().any(|t| t.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn entries(&self) -> Vec<TrackEntry> {
        self.tracks.iter().map(Track::entry).collect()
    }
}
