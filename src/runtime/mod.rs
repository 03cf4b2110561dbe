use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::logging;
use crate::mpris::ControlCmd;

mod event_loop;
mod mpris_sync;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();

    match logging::init(&settings.log) {
        Ok(path) => info!(path = %path.display(), "logging started"),
        // The TUI has not taken over the terminal yet.
        Err(e) => eprintln!("varispeed: logging disabled: {e}"),
    }
    if let Some(w) = config_warning {
        warn!("{w}");
    }

    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();

    let audio_player = AudioPlayer::new(settings.clone());
    if let Err(e) = audio_player.load_paths(paths) {
        warn!(error = %e, "could not queue initial paths");
    }

    let mut app = App::new(
        settings.ui.follow_playback,
        settings.playback.initial_rate,
        settings.ramp.percent_per_second,
    );

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            &mpris,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    run_result
}
