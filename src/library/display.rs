use std::path::Path;

use lofty::prelude::*;

use crate::config::TrackDisplayField;

/// Tag values read from a file; all optional.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Read title/artist/album tags. Files without readable tags yield empty `Tags`.
pub fn read_tags(path: &Path) -> Tags {
    let Ok(tagged) = lofty::read_from_path(path) else {
        return Tags::default();
    };
    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return Tags::default();
    };

    Tags {
        title: non_empty(tag.title()),
        artist: non_empty(tag.artist()),
        album: non_empty(tag.album()),
    }
}

/// Build a display string for a track according to the provided `fields` and separator.
///
/// Falls back to `name` when no field produced any text.
pub fn display_from_fields(
    name: &str,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Name => {
                if !name.trim().is_empty() {
                    parts.push(name.to_string());
                }
            }
            TrackDisplayField::Title => {
                if !title.trim().is_empty() {
                    parts.push(title.trim().to_string());
                }
            }
            TrackDisplayField::Artist => {
                if let Some(a) = artist.map(str::trim).filter(|s| !s.is_empty()) {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Album => {
                if let Some(a) = album.map(str::trim).filter(|s| !s.is_empty()) {
                    parts.push(a.to_string());
                }
            }
        }
    }

    if parts.is_empty() {
        name.to_string()
    } else {
        parts.join(sep)
    }
}
