//! `rodio` implementation of the playback primitive.
//!
//! Each unit is its own paused `Sink` on the shared output mixer. Rate
//! changes go through `Sink::set_speed`, which resamples (pitch follows
//! speed).

use std::time::{Duration, Instant};

use rodio::buffer::SamplesBuffer;
use rodio::{ChannelCount, OutputStream, OutputStreamBuilder, SampleRate, Sink};

use crate::library::DecodedAudio;

use super::error::OutputError;
use super::output::{Output, PlaybackUnit};
use super::ramp::clamp_rate;

/// Narrow a playback rate to the `f32` speed `Sink` takes. The rate band
/// keeps the result finite and above zero.
fn sink_speed(rate: f64) -> f32 {
    clamp_rate(rate) as f32
}

pub struct RodioOutput {
    stream: OutputStream,
}

impl RodioOutput {
    pub fn open_default() -> Result<Self, OutputError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| OutputError::Stream(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would draw
        // over the TUI.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl Output for RodioOutput {
    type Unit = SinkUnit;

    fn create_unit(&mut self, audio: &DecodedAudio) -> Result<SinkUnit, OutputError> {
        let channels = ChannelCount::try_from(audio.channels())
            .map_err(|_| OutputError::Unit(format!("bad channel count {}", audio.channels())))?;
        let sample_rate = SampleRate::try_from(audio.sample_rate())
            .map_err(|_| OutputError::Unit(format!("bad sample rate {}", audio.sample_rate())))?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        Ok(SinkUnit {
            sink,
            audio: audio.clone(),
            channels,
            sample_rate,
            phase: Phase::Fresh,
        })
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fresh,
    Started,
    Stopped,
}

pub struct SinkUnit {
    sink: Sink,
    audio: DecodedAudio,
    channels: ChannelCount,
    sample_rate: SampleRate,
    phase: Phase,
}

impl PlaybackUnit for SinkUnit {
    fn start(&mut self, offset: Duration) {
        if self.phase != Phase::Fresh {
            return;
        }
        let remaining = self.audio.samples_from(offset).to_vec();
        self.sink
            .append(SamplesBuffer::new(self.channels, self.sample_rate, remaining));
        self.sink.play();
        self.phase = Phase::Started;
    }

    fn stop(&mut self) -> Result<(), OutputError> {
        if self.phase == Phase::Stopped {
            return Err(OutputError::AlreadyStopped);
        }
        self.sink.stop();
        self.phase = Phase::Stopped;
        Ok(())
    }

    fn set_rate(&mut self, rate: f64) {
        self.sink.set_speed(sink_speed(rate));
    }

    fn has_ended(&self) -> bool {
        self.phase == Phase::Started && self.sink.empty()
    }
}
