use thiserror::Error;

use crate::library::DuplicateTrack;

/// Failures reported by the playback primitive.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to open audio output: {0}")]
    Stream(String),

    #[error("failed to create playback unit: {0}")]
    Unit(String),

    #[error("playback unit already stopped")]
    AlreadyStopped,
}

/// Errors returned by engine operations. None of these leave the engine in
/// an unusable state.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no tracks loaded")]
    NoTracks,

    #[error("track index {0} out of range")]
    TrackOutOfRange(usize),

    #[error("invalid playback rate: {0}")]
    InvalidRate(f64),

    #[error("invalid ramp speed: {0}")]
    InvalidRampPercent(f64),

    #[error(transparent)]
    Duplicate(#[from] DuplicateTrack),

    #[error(transparent)]
    Output(#[from] OutputError),
}
