//! Playback engine: track store, play order, the playback session state
//! machine and the speed ramp, owned by one value and driven by one thread.
//!
//! Nothing here blocks or sleeps. Time comes from `Output::now`, and work
//! that must happen later (ramp ticks, the auto-advance delay) is exposed
//! through `next_deadline` and performed by `poll`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::Settings;
use crate::library::{DecodedAudio, Track, TrackEntry, TrackStore};

use super::error::PlayerError;
use super::order::PlayOrder;
use super::output::{Output, PlaybackUnit};
use super::ramp::{SpeedRamp, clamp_rate};
use super::types::{PlaybackInfo, PlaybackState, RampMode};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub shuffle: bool,
    pub loop_on_completion: bool,
    pub initial_rate: f64,
    pub advance_delay: Duration,
    pub ramp_mode: RampMode,
    pub ramp_percent: f64,
    pub ticks_per_second: u32,
}

impl From<&Settings> for EngineSettings {
    fn from(s: &Settings) -> Self {
        Self {
            shuffle: s.playback.shuffle,
            loop_on_completion: s.playback.loop_on_completion,
            initial_rate: s.playback.initial_rate,
            advance_delay: Duration::from_millis(s.playback.advance_delay_ms),
            ramp_mode: s.ramp.mode.into(),
            ramp_percent: s.ramp.percent_per_second,
            ticks_per_second: s.ramp.ticks_per_second,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// The single playback session: which track, where in it, and the unit
/// rendering it (absent while paused).
struct Session<U> {
    index: usize,
    unit: Option<U>,
    /// Media position at `segment_start`.
    offset: Duration,
    /// Set while the unit is producing sound.
    segment_start: Option<Instant>,
}

impl<U> Session<U> {
    fn position(&self, now: Instant, rate: f64) -> Duration {
        match self.segment_start {
            Some(start) => {
                let played = now.saturating_duration_since(start).as_secs_f64() * rate;
                let played = Duration::try_from_secs_f64(played).unwrap_or(Duration::MAX);
                self.offset.saturating_add(played)
            }
            None => self.offset,
        }
    }

    /// Fold the running segment into `offset` at the rate it was played at.
    fn fold(&mut self, now: Instant, rate: f64) {
        if self.segment_start.is_some() {
            self.offset = self.position(now, rate);
            self.segment_start = Some(now);
        }
    }
}

pub struct Engine<O: Output> {
    output: O,
    store: TrackStore,
    entries: Arc<[TrackEntry]>,
    order: PlayOrder,
    shuffle: bool,
    loop_on_completion: bool,
    rate: f64,
    state: PlaybackState,
    current: Option<usize>,
    session: Option<Session<O::Unit>>,
    ramp: SpeedRamp,
    advance_delay: Duration,
    pending_advance: Option<Instant>,
}

impl<O: Output> Engine<O> {
    pub fn new(output: O, settings: EngineSettings) -> Self {
        Self {
            output,
            store: TrackStore::new(),
            entries: Arc::from(Vec::new()),
            order: PlayOrder::new(),
            shuffle: settings.shuffle,
            loop_on_completion: settings.loop_on_completion,
            rate: clamp_rate(settings.initial_rate),
            state: PlaybackState::Idle,
            current: None,
            session: None,
            ramp: SpeedRamp::new(
                settings.ramp_mode,
                settings.ramp_percent,
                settings.ticks_per_second,
            ),
            advance_delay: settings.advance_delay,
            pending_advance: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn order(&self) -> &[usize] {
        self.order.as_slice()
    }

    pub fn track_count(&self) -> usize {
        self.store.len()
    }

    pub fn ramp(&self) -> &SpeedRamp {
        &self.ramp
    }

    pub fn clock(&self) -> Instant {
        self.output.now()
    }

    /// Media position within the current track.
    pub fn position(&self) -> Duration {
        let now = self.output.now();
        self.session
            .as_ref()
            .map(|s| s.position(now, self.rate))
            .unwrap_or(Duration::ZERO)
    }

    /// Append a decoded track and recompute the play order around whatever
    /// is currently playing.
    pub fn add_track(&mut self, track: Track) -> Result<usize, PlayerError> {
        let index = self.store.push(track)?;
        self.entries = self.store.entries().into();
        self.regenerate_order();
        Ok(index)
    }

    fn regenerate_order(&mut self) {
        self.order
            .regenerate(self.store.len(), self.shuffle, self.current, true);
    }

    /// Replace any session with a fresh one playing `index` from the start.
    pub fn load_track(&mut self, index: usize) -> Result<(), PlayerError> {
        let audio = self
            .store
            .get(index)
            .map(|t| t.audio.clone())
            .ok_or(PlayerError::TrackOutOfRange(index))?;

        self.teardown();
        self.current = Some(index);
        if !self.order.covers(self.store.len()) {
            self.regenerate_order();
        }
        self.order.seek_to(index);
        self.start_session(index, &audio, Duration::ZERO)
    }

    fn start_session(
        &mut self,
        index: usize,
        audio: &DecodedAudio,
        offset: Duration,
    ) -> Result<(), PlayerError> {
        let mut unit = match self.output.create_unit(audio) {
            Ok(u) => u,
            Err(e) => {
                self.state = if self.session.is_some() {
                    PlaybackState::Paused
                } else {
                    PlaybackState::Idle
                };
                return Err(e.into());
            }
        };
        unit.set_rate(self.rate);
        unit.start(offset);

        let now = self.output.now();
        self.session = Some(Session {
            index,
            unit: Some(unit),
            offset,
            segment_start: Some(now),
        });
        self.state = PlaybackState::Playing;
        self.ramp.restart(now);
        debug!(index, ?offset, rate = self.rate, "playing");
        Ok(())
    }

    /// Best-effort stop of the active unit; the session is dropped.
    fn teardown(&mut self) {
        self.pending_advance = None;
        let Some(mut session) = self.session.take() else {
            return;
        };
        if let Some(mut unit) = session.unit.take() {
            if let Err(e) = unit.stop() {
                warn!(error = %e, "ignoring playback unit teardown failure");
            }
        }
    }

    pub fn toggle_play(&mut self) -> Result<(), PlayerError> {
        if self.state.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Resume a paused session, or start the current track from the top when
    /// idle or ended. No-op while playing.
    pub fn play(&mut self) -> Result<(), PlayerError> {
        match self.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Idle | PlaybackState::Ended => {
                if self.store.is_empty() {
                    return Err(PlayerError::NoTracks);
                }
                if !self.order.covers(self.store.len()) {
                    self.regenerate_order();
                }
                let index = self.current.or(self.order.current()).unwrap_or(0);
                self.load_track(index)
            }
        }
    }

    fn resume(&mut self) -> Result<(), PlayerError> {
        let Some((index, offset)) = self.session.as_ref().map(|s| (s.index, s.offset)) else {
            self.state = PlaybackState::Idle;
            return self.play();
        };
        let audio = self
            .store
            .get(index)
            .map(|t| t.audio.clone())
            .ok_or(PlayerError::TrackOutOfRange(index))?;
        self.start_session(index, &audio, offset)
    }

    /// Stop the unit and keep the position. No-op unless playing.
    pub fn pause(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        let now = self.output.now();
        let rate = self.rate;
        if let Some(session) = self.session.as_mut() {
            session.fold(now, rate);
            session.segment_start = None;
            if let Some(mut unit) = session.unit.take() {
                if let Err(e) = unit.stop() {
                    warn!(error = %e, "ignoring playback unit teardown failure");
                }
            }
        }
        self.state = PlaybackState::Paused;
        debug!(position = ?self.position(), "paused");
    }

    pub fn stop(&mut self) {
        self.teardown();
        self.state = PlaybackState::Idle;
        debug!("stopped");
    }

    pub fn next_track(&mut self) -> Result<(), PlayerError> {
        self.step(true)
    }

    pub fn prev_track(&mut self) -> Result<(), PlayerError> {
        self.step(false)
    }

    fn step(&mut self, forward: bool) -> Result<(), PlayerError> {
        if self.store.is_empty() {
            return Err(PlayerError::NoTracks);
        }
        if !self.order.covers(self.store.len()) {
            self.regenerate_order();
        }
        let next = if forward {
            self.order.advance()
        } else {
            self.order.retreat()
        };
        let index = next.ok_or(PlayerError::NoTracks)?;
        self.load_track(index)
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        self.regenerate_order();
        debug!(shuffle = self.shuffle, order = ?self.order.as_slice(), "shuffle toggled");
    }

    pub fn toggle_loop(&mut self) {
        self.loop_on_completion = !self.loop_on_completion;
        if !self.loop_on_completion {
            self.pending_advance = None;
        }
    }

    /// Set the playback rate. Rejects non-finite and non-positive values,
    /// keeping the previous rate.
    pub fn set_rate(&mut self, rate: f64) -> Result<(), PlayerError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PlayerError::InvalidRate(rate));
        }
        self.apply_rate(rate);
        Ok(())
    }

    fn apply_rate(&mut self, rate: f64) {
        let rate = clamp_rate(rate);
        let now = self.output.now();
        let previous = self.rate;
        if let Some(session) = self.session.as_mut() {
            session.fold(now, previous);
            if let Some(unit) = session.unit.as_mut() {
                unit.set_rate(rate);
            }
        }
        self.rate = rate;
    }

    pub fn start_ramp(&mut self) {
        let now = self.output.now();
        if self.ramp.start(now) {
            debug!(info = ?self.ramp.info(), "ramp started");
        }
    }

    pub fn stop_ramp(&mut self) {
        if self.ramp.stop() {
            debug!(rate = self.rate, "ramp stopped");
        }
    }

    pub fn set_ramp_mode(&mut self, mode: RampMode) {
        self.ramp.set_mode(mode);
    }

    pub fn set_ramp_percent(&mut self, percent: f64) -> Result<(), PlayerError> {
        if self.ramp.set_percent_per_second(percent) {
            Ok(())
        } else {
            Err(PlayerError::InvalidRampPercent(percent))
        }
    }

    fn ramp_tick(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        let next = self.ramp.next_rate(self.rate);
        self.apply_rate(next);
    }

    /// Earliest time `poll` has scheduled work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.ramp.next_deadline(), self.pending_advance]
            .into_iter()
            .flatten()
            .min()
    }

    /// Run whatever is due: natural completion, auto-advance, one ramp tick.
    pub fn poll(&mut self) {
        let now = self.output.now();

        if self.state.is_playing() {
            let ended = self
                .session
                .as_ref()
                .and_then(|s| s.unit.as_ref())
                .is_some_and(|u| u.has_ended());
            if ended {
                self.on_track_ended(now);
            }
        }

        if let Some(at) = self.pending_advance {
            if now >= at {
                self.pending_advance = None;
                if self.state == PlaybackState::Ended && self.loop_on_completion {
                    if let Err(e) = self.next_track() {
                        warn!(error = %e, "auto-advance failed");
                    }
                }
            }
        }

        if self.ramp.take_due(now) {
            self.ramp_tick();
        }
    }

    // Only reachable from Playing, and leaves Playing, so a finished unit is
    // handled exactly once.
    fn on_track_ended(&mut self, now: Instant) {
        self.session = None;
        self.state = PlaybackState::Ended;
        debug!(index = ?self.current, "track ended");
        if self.loop_on_completion {
            self.pending_advance = Some(now + self.advance_delay);
        }
    }

    pub fn snapshot(&self) -> PlaybackInfo {
        PlaybackInfo {
            state: self.state,
            index: self.current,
            position: self.position(),
            rate: self.rate,
            shuffle: self.shuffle,
            loop_on_completion: self.loop_on_completion,
            ramp: self.ramp.info(),
            order: self.order().to_vec(),
            tracks: self.entries.clone(),
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(offset: Duration, start: Instant) -> Session<()> {
        Session {
            index: 0,
            unit: None,
            offset,
            segment_start: Some(start),
        }
    }

    #[test]
    fn position_saturates_instead_of_overflowing() {
        let start = Instant::now();
        let now = start + Duration::from_secs(1);

        let session = running(Duration::from_secs(5), start);
        assert_eq!(session.position(now, f64::MAX), Duration::MAX);

        let session = running(Duration::MAX, start);
        assert_eq!(session.position(now, 2.0), Duration::MAX);
    }

    #[test]
    fn paused_session_reports_its_offset() {
        let session: Session<()> = Session {
            index: 0,
            unit: None,
            offset: Duration::from_secs(3),
            segment_start: None,
        };
        assert_eq!(session.position(Instant::now(), 4.0), Duration::from_secs(3));
    }
}
