use std::path::PathBuf;
use std::time::Duration;

use super::decode::DecodedAudio;

/// A decoded, immutable playlist entry.
///
/// `name` is the file name and is the store's uniqueness key; `display` is
/// what the track list renders and may be built from tags.
#[derive(Clone, Debug)]
pub struct Track {
    pub name: String,
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub display: String,
    pub audio: DecodedAudio,
}

impl Track {
    pub fn duration(&self) -> Duration {
        self.audio.duration()
    }

    /// Lightweight view of this track for the UI snapshot.
    pub fn entry(&self) -> TrackEntry {
        TrackEntry {
            name: self.name.clone(),
            display: self.display.clone(),
            duration: self.duration(),
        }
    }
}

/// What the UI needs to know about a loaded track (no sample data).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackEntry {
    pub name: String,
    pub display: String,
    pub duration: Duration,
}
