//! Decoding selected files into in-memory PCM.
//!
//! Tracks are decoded once, up front, so every later start/resume can bind a
//! fresh playback unit to the same samples at an arbitrary offset.

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, Source};

use super::error::DecodeError;

/// Interleaved `f32` samples plus their layout. Cloning shares the buffer.
#[derive(Clone)]
pub struct DecodedAudio {
    channels: u16,
    sample_rate: u32,
    samples: Arc<[f32]>,
}

impl DecodedAudio {
    pub fn new(channels: u16, sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            channels: channels.max(1),
            sample_rate: sample_rate.max(1),
            samples: samples.into(),
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Samples starting at `offset`, aligned to a frame boundary. Offsets past
    /// the end yield an empty slice.
    pub fn samples_from(&self, offset: Duration) -> &[f32] {
        let frame = (offset.as_secs_f64() * self.sample_rate as f64) as usize;
        let start = frame
            .saturating_mul(self.channels as usize)
            .min(self.samples.len());
        &self.samples[start..]
    }
}

impl fmt::Debug for DecodedAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedAudio")
            .field("channels", &self.channels)
            .field("sample_rate", &self.sample_rate)
            .field("frames", &self.frames())
            .finish()
    }
}

/// Decode a complete in-memory file.
pub fn decode(bytes: Vec<u8>) -> Result<DecodedAudio, DecodeError> {
    let decoder = Decoder::new(Cursor::new(bytes))?;
    let channels = u16::from(decoder.channels());
    let sample_rate = u32::from(decoder.sample_rate());
    let samples: Vec<f32> = decoder.collect();

    if samples.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(DecodedAudio::new(channels, sample_rate, samples))
}

pub fn decode_file(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let bytes = fs::read(path)?;
    decode(bytes)
}
