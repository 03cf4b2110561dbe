//! Application model: the `App` struct the TUI renders and edits.
//!
//! `App` never touches the engine directly. It mirrors the latest playback
//! snapshot, owns the cursor and the prompt line, and turns prompt edits into
//! `AudioCmd`s for the event loop to send.

use std::path::PathBuf;
use std::sync::Arc;

use crate::audio::{AudioCmd, PlaybackInfo, RampMode};
use crate::library::TrackEntry;

use super::input::{NumericField, PromptKind};

/// The main application model.
pub struct App {
    pub tracks: Arc<[TrackEntry]>,
    pub selected: usize,
    pub playback: PlaybackInfo,

    pub follow_playback: bool,
    pub pending_follow_index: Option<usize>,

    pub prompt: Option<PromptKind>,
    pub rate_field: NumericField,
    pub ramp_field: NumericField,
    pub path_input: String,

    /// Message produced by the UI itself (rejected input); shown in
    /// preference to the audio thread's message until the next edit.
    pub local_message: Option<String>,
}

impl App {
    pub fn new(follow_playback: bool, rate: f64, ramp_percent: f64) -> Self {
        Self {
            tracks: Arc::from(Vec::new()),
            selected: 0,
            playback: PlaybackInfo::default(),
            follow_playback,
            pending_follow_index: None,
            prompt: None,
            rate_field: NumericField::new(rate),
            ramp_field: NumericField::new(ramp_percent),
            path_input: String::new(),
            local_message: None,
        }
    }

    /// Adopt a new snapshot from the audio thread and, when following,
    /// move the cursor onto the playing track.
    pub fn sync(&mut self, info: PlaybackInfo) {
        self.tracks = info.tracks.clone();
        let idx = info.index;
        self.playback = info;

        if self.selected >= self.tracks.len() {
            self.selected = 0;
        }

        let Some(idx) = idx else {
            return;
        };
        if !self.follow_playback {
            return;
        }
        match self.pending_follow_index {
            Some(pending) if pending == idx => {
                self.clear_pending_follow_index();
                self.set_selected(idx);
            }
            Some(_) => {}
            None => self.set_selected(idx),
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// The message to show in the status box, if any.
    pub fn message(&self) -> Option<&str> {
        self.local_message
            .as_deref()
            .or(self.playback.message.as_deref())
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }
    /// Disable follow-playback and clear any pending follow index.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
        self.pending_follow_index = None;
    }
    /// Set an index to follow once the audio thread reports it playing.
    pub fn set_pending_follow_index(&mut self, idx: usize) {
        self.pending_follow_index = Some(idx);
    }
    pub fn clear_pending_follow_index(&mut self) {
        self.pending_follow_index = None;
    }

    pub fn set_selected(&mut self, idx: usize) {
        if idx < self.tracks.len() {
            self.selected = idx;
        }
    }

    /// Move selection down, wrapping to the top.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move selection up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            let len = self.tracks.len();
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    /// `selectTrack`: play the track under the cursor and follow it.
    pub fn select_track(&mut self) -> Option<AudioCmd> {
        if !self.has_tracks() {
            return None;
        }
        self.follow_playback_on();
        self.set_pending_follow_index(self.selected);
        Some(AudioCmd::Play(self.selected))
    }

    pub fn ramp_mode_toggled(&self) -> RampMode {
        self.playback.ramp.mode.toggled()
    }

    /// Open the prompt line. The rate field starts from the engine's current
    /// rate; the ramp field keeps its own last value.
    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.local_message = None;
        match kind {
            PromptKind::Rate => self.rate_field.reset(self.playback.rate),
            PromptKind::RampPercent => {}
            PromptKind::OpenPath => self.path_input.clear(),
        }
        self.prompt = Some(kind);
    }

    pub fn close_prompt(&mut self) {
        self.prompt = None;
    }

    /// Text currently shown in the prompt line.
    pub fn prompt_text(&self) -> Option<(PromptKind, &str)> {
        let kind = self.prompt?;
        let text = match kind {
            PromptKind::Rate => self.rate_field.text(),
            PromptKind::RampPercent => self.ramp_field.text(),
            PromptKind::OpenPath => self.path_input.as_str(),
        };
        Some((kind, text))
    }

    /// Type one character. The ramp prompt applies every accepted keystroke.
    pub fn prompt_push(&mut self, c: char) -> Option<AudioCmd> {
        self.local_message = None;
        match self.prompt? {
            PromptKind::Rate => {
                self.rate_field.push(c);
                None
            }
            PromptKind::RampPercent => {
                if self.ramp_field.push(c) {
                    Some(AudioCmd::SetRampPercent(self.ramp_field.effective()))
                } else {
                    None
                }
            }
            PromptKind::OpenPath => {
                self.path_input.push(c);
                None
            }
        }
    }

    pub fn prompt_pop(&mut self) -> Option<AudioCmd> {
        self.local_message = None;
        match self.prompt? {
            PromptKind::Rate => {
                self.rate_field.pop();
                None
            }
            PromptKind::RampPercent => {
                self.ramp_field.pop();
                Some(AudioCmd::SetRampPercent(self.ramp_field.effective()))
            }
            PromptKind::OpenPath => {
                self.path_input.pop();
                None
            }
        }
    }

    /// Enter: close the prompt and produce the command it stands for.
    /// Invalid input closes nothing and leaves a message instead.
    pub fn prompt_submit(&mut self) -> Option<AudioCmd> {
        let kind = self.prompt?;
        match kind {
            PromptKind::Rate => match self.rate_field.value() {
                Some(rate) if rate > 0.0 => {
                    self.close_prompt();
                    Some(AudioCmd::SetRate(rate))
                }
                _ => {
                    self.local_message =
                        Some(format!("invalid rate: {:?}", self.rate_field.text()));
                    None
                }
            },
            PromptKind::RampPercent => {
                self.close_prompt();
                Some(AudioCmd::SetRampPercent(self.ramp_field.effective()))
            }
            PromptKind::OpenPath => {
                let path = self.path_input.trim();
                if path.is_empty() {
                    self.close_prompt();
                    return None;
                }
                let path = expand_home(path);
                self.close_prompt();
                Some(AudioCmd::LoadPaths(vec![path]))
            }
        }
    }
}

/// Expand a leading `~/` using `$HOME`.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}
