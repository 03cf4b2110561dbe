use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::{App, PromptKind};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{MprisView, update_mpris};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// What was last published to MPRIS.
    pub last_mpris: MprisView,
}

/// What a key press asks the event loop to do.
#[derive(Debug)]
pub enum KeyAction {
    Nothing,
    Send(AudioCmd),
    Quit,
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let playback = audio_player.playback_handle();
    loop {
        // Sync from the audio thread; the lock is released before drawing.
        let snapshot = playback.lock().ok().map(|info| info.clone());
        if let Some(info) = snapshot {
            app.sync(info);
        }

        // Keep MPRIS in sync even when playback changes come from media keys or auto-advance.
        let view = MprisView::of(app);
        if view != state.last_mpris {
            update_mpris(mpris, app);
            state.last_mpris = view;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            debug!(?cmd, "MPRIS command");
            match control_to_audio(cmd) {
                Some(audio_cmd) => send(audio_player, audio_cmd),
                None => {
                    audio_player.quit();
                    return Ok(());
                }
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key_event(key, app, state) {
                    KeyAction::Nothing => {}
                    KeyAction::Send(cmd) => send(audio_player, cmd),
                    KeyAction::Quit => {
                        audio_player.quit();
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn send(audio_player: &AudioPlayer, cmd: AudioCmd) {
    if let Err(e) = audio_player.send(cmd) {
        warn!(error = %e, "audio thread is gone");
    }
}

/// Map an MPRIS request onto an engine command. `None` means quit.
pub fn control_to_audio(cmd: ControlCmd) -> Option<AudioCmd> {
    let audio = match cmd {
        ControlCmd::Quit => return None,
        ControlCmd::Play => AudioCmd::Resume,
        ControlCmd::Pause => AudioCmd::Pause,
        ControlCmd::PlayPause => AudioCmd::TogglePause,
        ControlCmd::Stop => AudioCmd::Stop,
        ControlCmd::Next => AudioCmd::Next,
        ControlCmd::Prev => AudioCmd::Prev,
        ControlCmd::SetRate(rate) => AudioCmd::SetRate(rate),
    };
    Some(audio)
}

fn handle_prompt_key(key: KeyEvent, app: &mut App) -> KeyAction {
    let cmd = match key.code {
        KeyCode::Esc => {
            app.close_prompt();
            None
        }
        KeyCode::Backspace => app.prompt_pop(),
        KeyCode::Enter => app.prompt_submit(),
        KeyCode::Char(c) if !c.is_control() => app.prompt_push(c),
        _ => None,
    };
    cmd.map_or(KeyAction::Nothing, KeyAction::Send)
}

pub fn handle_key_event(key: KeyEvent, app: &mut App, state: &mut EventLoopState) -> KeyAction {
    if app.prompt.is_some() {
        state.pending_gg = false;
        return handle_prompt_key(key, app);
    }

    let was_pending_gg = std::mem::take(&mut state.pending_gg);

    let cmd = match key.code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('g') => {
            if was_pending_gg {
                app.follow_playback_off();
                app.select_first();
            } else {
                state.pending_gg = true;
            }
            return KeyAction::Nothing;
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.select_last();
            return KeyAction::Nothing;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next();
            return KeyAction::Nothing;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev();
            return KeyAction::Nothing;
        }
        KeyCode::Enter => return app.select_track().map_or(KeyAction::Nothing, KeyAction::Send),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            app.follow_playback_on();
            AudioCmd::TogglePause
        }
        KeyCode::Char('l') => {
            app.follow_playback_on();
            AudioCmd::Next
        }
        KeyCode::Char('h') => {
            app.follow_playback_on();
            AudioCmd::Prev
        }
        KeyCode::Char('x') => AudioCmd::Stop,
        KeyCode::Char('s') => AudioCmd::ToggleShuffle,
        KeyCode::Char('r') => AudioCmd::ToggleLoop,
        KeyCode::Char('a') => AudioCmd::StartRamp,
        KeyCode::Char('A') => AudioCmd::StopRamp,
        KeyCode::Char('m') => AudioCmd::SetRampMode(app.ramp_mode_toggled()),
        KeyCode::Char('=') => {
            app.open_prompt(PromptKind::Rate);
            return KeyAction::Nothing;
        }
        KeyCode::Char('%') => {
            app.open_prompt(PromptKind::RampPercent);
            return KeyAction::Nothing;
        }
        KeyCode::Char('o') => {
            app.open_prompt(PromptKind::OpenPath);
            return KeyAction::Nothing;
        }
        _ => return KeyAction::Nothing,
    };
    KeyAction::Send(cmd)
}
