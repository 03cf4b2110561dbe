use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::audio::{AudioCmd, PlaybackInfo, PlaybackState};
use crate::library::TrackEntry;

fn entry(name: &str) -> TrackEntry {
    TrackEntry {
        name: name.into(),
        display: name.into(),
        duration: Duration::from_secs(3),
    }
}

fn info(index: Option<usize>, n: usize) -> PlaybackInfo {
    let tracks: Vec<TrackEntry> = (0..n).map(|i| entry(&format!("t{i}.wav"))).collect();
    PlaybackInfo {
        state: PlaybackState::Playing,
        index,
        tracks: Arc::from(tracks),
        ..PlaybackInfo::default()
    }
}

fn app_with(n: usize) -> App {
    let mut app = App::new(false, 1.0, 10.0);
    app.sync(info(None, n));
    app
}

#[test]
fn cursor_wraps_both_ways() {
    let mut app = app_with(3);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn cursor_moves_are_noops_without_tracks() {
    let mut app = app_with(0);
    app.next();
    app.prev();
    app.select_last();
    assert_eq!(app.selected, 0);
    assert!(app.select_track().is_none());
}

#[test]
fn following_moves_cursor_to_playing_track() {
    let mut app = app_with(4);
    app.follow_playback_on();
    app.sync(info(Some(2), 4));
    assert_eq!(app.selected, 2);

    app.follow_playback_off();
    app.sync(info(Some(3), 4));
    assert_eq!(app.selected, 2);
}

#[test]
fn pending_follow_waits_for_the_requested_track() {
    let mut app = app_with(4);
    app.selected = 3;
    let cmd = app.select_track();
    assert!(matches!(cmd, Some(AudioCmd::Play(3))));

    // Snapshot from before the command was handled.
    app.sync(info(Some(1), 4));
    assert_eq!(app.selected, 3);
    assert_eq!(app.pending_follow_index, Some(3));

    app.sync(info(Some(3), 4));
    assert_eq!(app.selected, 3);
    assert_eq!(app.pending_follow_index, None);
}

#[test]
fn rate_prompt_starts_from_current_rate_and_submits() {
    let mut app = app_with(1);
    let mut snapshot = info(Some(0), 1);
    snapshot.rate = 1.5;
    app.sync(snapshot);

    app.open_prompt(PromptKind::Rate);
    assert_eq!(app.prompt_text(), Some((PromptKind::Rate, "1.5")));
    app.prompt_pop();
    app.prompt_pop();
    assert!(app.prompt_push('2').is_none());
    assert!(app.prompt_push('x').is_none());
    assert_eq!(app.prompt_text(), Some((PromptKind::Rate, "12")));

    match app.prompt_submit() {
        Some(AudioCmd::SetRate(r)) => assert_eq!(r, 12.0),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(app.prompt, None);
}

#[test]
fn rate_prompt_resubmits_a_very_slow_rate_unchanged() {
    let mut app = app_with(1);
    let mut snapshot = info(Some(0), 1);
    snapshot.rate = 0.00004;
    app.sync(snapshot);

    app.open_prompt(PromptKind::Rate);
    assert_eq!(app.prompt_text(), Some((PromptKind::Rate, "0.00004")));
    match app.prompt_submit() {
        Some(AudioCmd::SetRate(r)) => assert_eq!(r, 0.00004),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(app.message(), None);
}

#[test]
fn rate_prompt_rejects_non_positive_and_keeps_prompt_open() {
    let mut app = app_with(1);
    app.open_prompt(PromptKind::Rate);
    app.prompt_pop();
    app.prompt_push('-');
    assert!(app.prompt_submit().is_none());
    assert_eq!(app.prompt, Some(PromptKind::Rate));
    assert!(app.message().unwrap_or_default().contains("invalid rate"));

    app.prompt_push('0');
    assert!(app.message().is_none());
    assert!(app.prompt_submit().is_none());
}

#[test]
fn ramp_prompt_applies_live_with_last_valid_fallback() {
    let mut app = app_with(1);
    app.open_prompt(PromptKind::RampPercent);
    assert_eq!(app.prompt_text(), Some((PromptKind::RampPercent, "10")));

    app.prompt_pop();
    app.prompt_pop();
    // Empty text: fall back to the last valid value.
    app.prompt_pop();
    let cmd = app.prompt_push('-');
    assert!(matches!(cmd, Some(AudioCmd::SetRampPercent(v)) if v == 1.0));

    let cmd = app.prompt_push('5');
    assert!(matches!(cmd, Some(AudioCmd::SetRampPercent(v)) if v == -5.0));

    // Rejected characters send nothing.
    assert!(app.prompt_push('z').is_none());

    let cmd = app.prompt_submit();
    assert!(matches!(cmd, Some(AudioCmd::SetRampPercent(v)) if v == -5.0));
    assert_eq!(app.prompt, None);
}

#[test]
fn open_prompt_loads_typed_path() {
    let mut app = app_with(0);
    app.open_prompt(PromptKind::OpenPath);
    for c in "/music/a.flac".chars() {
        app.prompt_push(c);
    }
    match app.prompt_submit() {
        Some(AudioCmd::LoadPaths(paths)) => {
            assert_eq!(paths, vec![PathBuf::from("/music/a.flac")])
        }
        other => panic!("unexpected {other:?}"),
    }

    app.open_prompt(PromptKind::OpenPath);
    assert!(app.prompt_submit().is_none());
    assert_eq!(app.prompt, None);
}

#[test]
fn ui_message_takes_precedence_over_snapshot_message() {
    let mut app = app_with(1);
    let mut snapshot = info(None, 1);
    snapshot.message = Some("could not load x".into());
    app.sync(snapshot);
    assert_eq!(app.message(), Some("could not load x"));

    app.local_message = Some("invalid rate".into());
    assert_eq!(app.message(), Some("invalid rate"));
}

#[test]
fn shrinking_track_list_resets_cursor() {
    let mut app = app_with(5);
    app.selected = 4;
    app.sync(info(None, 2));
    assert_eq!(app.selected, 0);
}
