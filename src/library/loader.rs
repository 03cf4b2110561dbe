use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::audio::AudioCmd;
use crate::config::LibrarySettings;

use super::decode::decode_file;
use super::display::{display_from_fields, read_tags};
use super::error::DecodeError;
use super::model::Track;
use super::scan::resolve_paths;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Decode one file and read its tags into a `Track`.
pub fn load_track(path: &Path, settings: &LibrarySettings) -> Result<Track, DecodeError> {
    let audio = decode_file(path)?;
    let name = file_name(path);
    let tags = read_tags(path);

    let title = tags.title.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone())
    });
    let display = display_from_fields(
        &name,
        &title,
        tags.artist.as_deref(),
        tags.album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );

    Ok(Track {
        name,
        path: path.to_path_buf(),
        title,
        artist: tags.artist,
        album: tags.album,
        display,
        audio,
    })
}

/// Decode `paths` on a background thread, delivering each result to the
/// audio thread as a command so it is applied between other events.
pub fn spawn_loader(
    paths: Vec<PathBuf>,
    settings: LibrarySettings,
    tx: Sender<AudioCmd>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for path in resolve_paths(&paths, &settings) {
            let cmd = match load_track(&path, &settings) {
                Ok(track) => {
                    debug!(name = %track.name, duration = ?track.duration(), "decoded");
                    AudioCmd::AddTrack(Box::new(track))
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "decode failed");
                    AudioCmd::DecodeFailed {
                        name: file_name(&path),
                        reason: e.to_string(),
                    }
                }
            };
            if tx.send(cmd).is_err() {
                // Audio thread is gone; nothing left to deliver to.
                break;
            }
        }
    })
}
