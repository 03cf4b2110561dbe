use crate::app::App;
use crate::mpris::MprisHandle;

/// What MPRIS last saw, so it is only rewritten when something changed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MprisView {
    index: Option<usize>,
    state: Option<crate::audio::PlaybackState>,
    rate: f64,
    track_count: usize,
}

impl MprisView {
    pub fn of(app: &App) -> Self {
        Self {
            index: app.playback.index,
            state: Some(app.playback.state),
            rate: app.playback.rate,
            track_count: app.tracks.len(),
        }
    }
}

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let idx = app.playback.index;
    let track = idx.and_then(|i| app.tracks.get(i));
    mpris.set_track_metadata(idx, track);
    mpris.set_playback(app.playback.state);
    mpris.set_rate(app.playback.rate);
}
