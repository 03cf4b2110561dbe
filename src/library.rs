//! Library module: decoded tracks and the append-only track store.
//!
//! Paths given on the command line (or typed into the open prompt) are
//! resolved by `scan`, decoded off the audio thread by `loader`, and appended
//! to a `TrackStore` owned by the playback engine.

mod decode;
mod display;
mod error;
mod loader;
mod model;
mod scan;
mod store;

pub use decode::DecodedAudio;
pub use error::DuplicateTrack;
pub use loader::spawn_loader;
pub use model::{Track, TrackEntry};
pub use store::TrackStore;
