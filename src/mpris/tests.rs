use super::*;
use std::sync::mpsc;
use std::time::Duration;

fn make_entry() -> TrackEntry {
    TrackEntry {
        name: "test.mp3".to_string(),
        display: "Test Artist - Test Title".to_string(),
        duration: Duration::from_micros(1_234_567),
    }
}

fn player() -> (PlayerIface, Arc<Mutex<SharedState>>, mpsc::Receiver<ControlCmd>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    (iface, state, rx)
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    let entry = make_entry();
    handle.set_track_metadata(Some(7), Some(&entry));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Artist - Test Title"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn playback_status_maps_engine_states() {
    let (iface, state, _rx) = player();

    for (playback, expected) in [
        (PlaybackState::Idle, "Stopped"),
        (PlaybackState::Playing, "Playing"),
        (PlaybackState::Paused, "Paused"),
        (PlaybackState::Ended, "Stopped"),
    ] {
        state.lock().unwrap().playback = playback;
        assert_eq!(iface.playback_status(), expected);
    }
}

#[test]
fn rate_reads_shared_state_and_writes_forward_valid_values() {
    let (mut iface, state, rx) = player();
    let handle = MprisHandle {
        state: state.clone(),
    };

    assert_eq!(iface.rate(), 1.0);
    handle.set_rate(1.6);
    assert_eq!(iface.rate(), 1.6);

    iface.set_rate(2.0);
    iface.set_rate(0.0);
    iface.set_rate(f64::NAN);
    assert_eq!(rx.try_recv().ok(), Some(ControlCmd::SetRate(2.0)));
    assert!(rx.try_recv().is_err());
}

#[test]
fn rate_bounds_match_the_engine_band() {
    let (iface, _state, _rx) = player();
    assert_eq!(iface.minimum_rate(), MIN_RATE);
    assert_eq!(iface.maximum_rate(), MAX_RATE);
    assert!(iface.maximum_rate().is_finite());
}

#[test]
fn methods_forward_control_commands() {
    let (iface, _state, rx) = player();
    iface.play();
    iface.pause();
    iface.play_pause();
    iface.stop();
    iface.next();
    iface.previous();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Play,
            ControlCmd::Pause,
            ControlCmd::PlayPause,
            ControlCmd::Stop,
            ControlCmd::Next,
            ControlCmd::Prev,
        ]
    );
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (iface, state, _rx) = player();
    let handle = MprisHandle { state };

    let map = iface.metadata();
    assert!(map.contains_key("xesam:title"));
    assert!(!map.contains_key("mpris:length"));

    handle.set_track_metadata(Some(1), Some(&make_entry()));
    let map = iface.metadata();
    for k in ["mpris:trackid", "xesam:title", "mpris:length"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}
