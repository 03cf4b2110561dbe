//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::App;
use crate::audio::{PlaybackState, RampInfo};
use crate::config::UiSettings;

/// Rates below this render as a percentage, at or above it as a multiplier.
pub const RATE_DISPLAY_THRESHOLD: f64 = 10.0;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("x", "stop"),
    ("s", "shuffle"),
    ("r", "loop"),
    ("=", "set rate"),
    ("a/A", "ramp start/stop"),
    ("m", "ramp mode"),
    ("%", "ramp speed"),
    ("o", "open"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a playback rate for display: `160.00%` below ten times normal
/// speed, `12.5×` from there on.
pub fn format_rate(rate: f64) -> String {
    if rate < RATE_DISPLAY_THRESHOLD {
        format!("{:.2}%", rate * 100.0)
    } else {
        format!("{rate:.1}×")
    }
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Idle => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
        PlaybackState::Ended => "Ended",
    }
}

fn ramp_text(ramp: &RampInfo) -> String {
    format!(
        "RAMP: {} {} {:+}%/s",
        if ramp.active { "ON" } else { "OFF" },
        ramp.mode.label(),
        ramp.percent_per_second
    )
}

/// Status line parts in display order.
pub fn status_parts(app: &App) -> Vec<String> {
    let info = &app.playback;
    let mut parts: Vec<String> = Vec::new();

    parts.push(state_label(info.state).to_string());

    if let Some(track) = info.index.and_then(|i| app.tracks.get(i)) {
        // Clamp so a late completion poll never shows past the end.
        let position = info.position.min(track.duration);
        parts.push(format!(
            "Song: {} [{}/{}]",
            track.display,
            format_mmss(position),
            format_mmss(track.duration)
        ));
    }

    parts.push(format!("SPEED: {}", format_rate(info.rate)));
    parts.push(ramp_text(&info.ramp));
    parts.push(format!(
        "Shuffle: {}",
        if info.shuffle { "ON" } else { "OFF" }
    ));
    parts.push(format!(
        "Loop: {}",
        if info.loop_on_completion { "ON" } else { "OFF" }
    ));
    parts.push(if app.follow_playback {
        "CURSOR: Follow".to_string()
    } else {
        "CURSOR: Free-roam".to_string()
    });

    parts
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" varispeed ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = status_parts(app).join(" • ");
    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list
    {
        // Only build ListItems for the visible window, centered on the cursor.
        let total = app.tracks.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height)
        };

        let playing = app.playback.index;
        let visible_items: Vec<ListItem> = app.tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let marker = if playing == Some(start + offset) {
                    "♪ "
                } else {
                    "  "
                };
                ListItem::new(format!("{marker}{}", track.display))
            })
            .collect();

        let title = format!(" tracks ({total}) ");
        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(sel_pos - start));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Prompt / message line
    let line = match app.prompt_text() {
        Some((kind, text)) => format!("{}: {text}_", kind.label()),
        None => app.message().unwrap_or_default().to_string(),
    };
    let prompt = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(prompt, chunks[3]);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PlaybackInfo, RampMode};
    use crate::library::TrackEntry;
    use std::sync::Arc;

    #[test]
    fn rates_below_ten_render_as_percent() {
        assert_eq!(format_rate(1.0), "100.00%");
        assert_eq!(format_rate(1.6), "160.00%");
        assert_eq!(format_rate(0.25), "25.00%");
        assert_eq!(format_rate(9.999), "999.90%");
    }

    #[test]
    fn rates_from_ten_render_as_multiplier() {
        assert_eq!(format_rate(10.0), "10.0×");
        assert_eq!(format_rate(12.5), "12.5×");
        assert_eq!(format_rate(250.0), "250.0×");
    }

    #[test]
    fn status_shows_track_speed_and_ramp() {
        let mut app = App::new(true, 1.0, 0.0);
        app.sync(PlaybackInfo {
            state: PlaybackState::Playing,
            index: Some(0),
            position: Duration::from_secs(65),
            rate: 1.6,
            shuffle: true,
            loop_on_completion: false,
            ramp: RampInfo {
                active: true,
                mode: RampMode::Multiplicative,
                percent_per_second: 60.0,
            },
            tracks: Arc::from(vec![TrackEntry {
                name: "a.wav".into(),
                display: "Artist - A".into(),
                duration: Duration::from_secs(200),
            }]),
            ..PlaybackInfo::default()
        });

        let parts = status_parts(&app);
        assert_eq!(parts[0], "Playing");
        assert_eq!(parts[1], "Song: Artist - A [01:05/03:20]");
        assert_eq!(parts[2], "SPEED: 160.00%");
        assert_eq!(parts[3], "RAMP: ON multiplicative +60%/s");
        assert_eq!(parts[4], "Shuffle: ON");
        assert_eq!(parts[5], "Loop: OFF");
    }

    #[test]
    fn controls_list_every_binding() {
        let text = controls_text();
        for (key, _) in CONTROLS {
            assert!(text.contains(&format!("[{key}]")));
        }
    }
}
