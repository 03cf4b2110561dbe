//! Audio-related small types and handles.
//!
//! This module defines the commands accepted by the audio thread, the
//! playback state machine's states, and the snapshot shared with the UI.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::RampModeSetting;
use crate::library::{Track, TrackEntry};

/// How a ramp tick changes the rate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RampMode {
    /// `rate += fraction` every tick.
    #[default]
    Linear,
    /// `rate *= 1 + fraction` every tick.
    Multiplicative,
}

impl RampMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Linear => Self::Multiplicative,
            Self::Multiplicative => Self::Linear,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Multiplicative => "multiplicative",
        }
    }
}

impl From<RampModeSetting> for RampMode {
    fn from(m: RampModeSetting) -> Self {
        match m {
            RampModeSetting::Linear => Self::Linear,
            RampModeSetting::Multiplicative => Self::Multiplicative,
        }
    }
}

/// Playback controller states. `Loaded` only exists inside a track load,
/// between binding the unit and starting it, so it is never observable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    /// The last track finished on its own.
    Ended,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Decode and append the given files/directories.
    LoadPaths(Vec<PathBuf>),
    /// A decoded track, delivered by the loader.
    AddTrack(Box<Track>),
    /// The loader could not decode a file.
    DecodeFailed { name: String, reason: String },
    /// Load and play the track at the given store index.
    Play(usize),
    /// Resume (or start) playback; no-op while playing.
    Resume,
    /// Pause; no-op unless playing.
    Pause,
    /// Toggle pause/resume.
    TogglePause,
    /// Stop playback and drop the session.
    Stop,
    /// Skip to the next track in play order.
    Next,
    /// Go to the previous track in play order.
    Prev,
    ToggleShuffle,
    ToggleLoop,
    /// Set the playback rate (must be finite and > 0).
    SetRate(f64),
    StartRamp,
    StopRamp,
    SetRampMode(RampMode),
    /// Ramp speed in percent per second.
    SetRampPercent(f64),
    /// Quit the audio thread.
    Quit,
}

/// Ramp state as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampInfo {
    pub active: bool,
    pub mode: RampMode,
    pub percent_per_second: f64,
}

#[derive(Debug, Clone)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    pub state: PlaybackState,
    /// Track the session belongs to (the last one played, once anything played).
    pub index: Option<usize>,
    /// Media position within the current track.
    pub position: Duration,
    pub rate: f64,
    pub shuffle: bool,
    pub loop_on_completion: bool,
    pub ramp: RampInfo,
    pub order: Vec<usize>,
    pub tracks: Arc<[TrackEntry]>,
    /// Last user-facing message (errors, rejected input).
    pub message: Option<String>,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            state: PlaybackState::Idle,
            index: None,
            position: Duration::ZERO,
            rate: 1.0,
            shuffle: false,
            loop_on_completion: false,
            ramp: RampInfo {
                active: false,
                mode: RampMode::Linear,
                percent_per_second: 0.0,
            },
            order: Vec::new(),
            tracks: Arc::from(Vec::new()),
            message: None,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
