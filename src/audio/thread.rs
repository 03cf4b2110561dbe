use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::config::{LibrarySettings, Settings};
use crate::library::spawn_loader;

use super::engine::{Engine, EngineSettings};
use super::error::PlayerError;
use super::output::Output;
use super::sink::RodioOutput;
use super::types::{AudioCmd, PlaybackHandle, PlaybackState};

/// Upper bound on how long the loop sleeps while a track is playing, so
/// natural completion is noticed promptly.
const PLAYING_POLL: Duration = Duration::from_millis(50);
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Flow {
    Continue,
    Quit,
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    tx: Sender<AudioCmd>,
    playback_info: PlaybackHandle,
    settings: Settings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let output = match RodioOutput::open_default() {
            Ok(o) => o,
            Err(e) => {
                error!(error = %e, "no audio output");
                if let Ok(mut info) = playback_info.lock() {
                    info.message = Some(e.to_string());
                }
                // Keep draining so senders never block on a dead thread.
                while let Ok(cmd) = rx.recv() {
                    if matches!(cmd, AudioCmd::Quit) {
                        break;
                    }
                }
                return;
            }
        };

        let mut engine = Engine::new(output, EngineSettings::from(&settings));
        let mut message: Option<String> = None;
        publish(&engine, &playback_info, &message);

        loop {
            let timeout = wait_for(&engine, engine.clock());
            let flow = match rx.recv_timeout(timeout) {
                Ok(cmd) => handle_cmd(&mut engine, cmd, &tx, &settings.library, &mut message),
                Err(RecvTimeoutError::Timeout) => Flow::Continue,
                Err(RecvTimeoutError::Disconnected) => Flow::Quit,
            };
            if flow == Flow::Quit {
                engine.stop();
                publish(&engine, &playback_info, &message);
                info!("audio thread exiting");
                break;
            }

            engine.poll();
            publish(&engine, &playback_info, &message);
        }
    })
}

/// How long to block waiting for the next command.
pub(super) fn wait_for<O: Output>(engine: &Engine<O>, now: Instant) -> Duration {
    let cap = if engine.state() == PlaybackState::Playing {
        PLAYING_POLL
    } else {
        IDLE_POLL
    };
    engine
        .next_deadline()
        .map(|d| d.saturating_duration_since(now))
        .map_or(cap, |d| d.min(cap))
}

fn publish<O: Output>(engine: &Engine<O>, handle: &PlaybackHandle, message: &Option<String>) {
    let mut snapshot = engine.snapshot();
    snapshot.message = message.clone();
    if let Ok(mut info) = handle.lock() {
        *info = snapshot;
    }
}

/// Apply one command to the engine. Failures are logged and surfaced as the
/// status message; they never stop the thread.
pub(super) fn handle_cmd<O: Output>(
    engine: &mut Engine<O>,
    cmd: AudioCmd,
    tx: &Sender<AudioCmd>,
    library: &LibrarySettings,
    message: &mut Option<String>,
) -> Flow {
    debug!(?cmd, "audio command");
    let result: Result<(), PlayerError> = match cmd {
        AudioCmd::LoadPaths(paths) => {
            spawn_loader(paths, library.clone(), tx.clone());
            Ok(())
        }
        AudioCmd::AddTrack(track) => {
            let name = track.name.clone();
            match engine.add_track(*track) {
                Ok(index) => {
                    // Leave any earlier load failure on screen.
                    debug!(index, %name, "track added");
                    return Flow::Continue;
                }
                Err(e) => Err(e),
            }
        }
        AudioCmd::DecodeFailed { name, reason } => {
            *message = Some(format!("could not load {name}: {reason}"));
            return Flow::Continue;
        }
        AudioCmd::Play(index) => engine.load_track(index),
        AudioCmd::Resume => engine.play(),
        AudioCmd::Pause => {
            engine.pause();
            Ok(())
        }
        AudioCmd::TogglePause => engine.toggle_play(),
        AudioCmd::Stop => {
            engine.stop();
            Ok(())
        }
        AudioCmd::Next => engine.next_track(),
        AudioCmd::Prev => engine.prev_track(),
        AudioCmd::ToggleShuffle => {
            engine.toggle_shuffle();
            Ok(())
        }
        AudioCmd::ToggleLoop => {
            engine.toggle_loop();
            Ok(())
        }
        AudioCmd::SetRate(rate) => engine.set_rate(rate),
        AudioCmd::StartRamp => {
            engine.start_ramp();
            Ok(())
        }
        AudioCmd::StopRamp => {
            engine.stop_ramp();
            Ok(())
        }
        AudioCmd::SetRampMode(mode) => {
            engine.set_ramp_mode(mode);
            Ok(())
        }
        AudioCmd::SetRampPercent(percent) => engine.set_ramp_percent(percent),
        AudioCmd::Quit => return Flow::Quit,
    };

    match result {
        Ok(()) => *message = None,
        Err(e) => {
            warn!(error = %e, "command failed");
            *message = Some(e.to_string());
        }
    }
    Flow::Continue
}
