//! The playback primitive the engine drives.
//!
//! An `Output` hands out single-use playback units and owns the clock used
//! for elapsed-time bookkeeping. The rodio implementation lives in `sink`.

use std::time::{Duration, Instant};

use crate::library::DecodedAudio;

use super::error::OutputError;

pub trait Output {
    type Unit: PlaybackUnit;

    /// Bind `audio` to a fresh, silent unit.
    fn create_unit(&mut self, audio: &DecodedAudio) -> Result<Self::Unit, OutputError>;

    /// Monotonic clock.
    fn now(&self) -> Instant;
}

/// One playback of one track. A unit is started at most once; resuming
/// after a pause creates a new unit.
pub trait PlaybackUnit {
    /// Begin producing sound `offset` into the track.
    fn start(&mut self, offset: Duration);

    fn stop(&mut self) -> Result<(), OutputError>;

    fn set_rate(&mut self, rate: f64);

    /// True once a started unit has played to the end on its own.
    fn has_ended(&self) -> bool;
}
