//! Audio module: the playback engine and the thread that drives it.
//!
//! All engine state lives on one audio thread. The UI and the MPRIS bridge
//! talk to it through `AudioCmd` messages and read back a `PlaybackInfo`
//! snapshot.

mod engine;
mod error;
mod order;
mod output;
mod player;
mod ramp;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use ramp::{MAX_RATE, MIN_RATE};
pub use types::{AudioCmd, PlaybackInfo, PlaybackState, RampInfo, RampMode};
