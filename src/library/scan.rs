use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn scan_dir(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut found: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .map(|e| e.into_path())
        .filter(|p| {
            p.is_file() && (settings.include_hidden || !is_hidden(p)) && is_audio_file(p, settings)
        })
        .collect();

    found.sort_by_key(|p| p.to_string_lossy().to_lowercase());
    found
}

/// Expand user-selected paths into the files to decode, in selection order.
///
/// Directories are walked per `settings` and filtered by extension; files
/// named explicitly are taken as-is and left to the decoder to accept or
/// reject. Missing paths are skipped.
pub fn resolve_paths(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            out.extend(scan_dir(path, settings));
        } else if path.is_file() {
            out.push(path.clone());
        } else {
            warn!(path = %path.display(), "skipping missing path");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .filter_map(|p| p.file_name().and_then(|s| s.to_str()).map(str::to_string))
            .collect()
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn directory_scan_filters_non_audio_and_sorts_case_insensitive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.MP3"), b"x").unwrap();
        fs::write(dir.path().join("A.ogg"), b"x").unwrap();
        fs::write(dir.path().join("c.txt"), b"x").unwrap();

        let found = resolve_paths(&[dir.path().to_path_buf()], &LibrarySettings::default());
        assert_eq!(names(&found), vec!["A.ogg", "b.MP3"]);
    }

    #[test]
    fn explicit_files_are_kept_in_selection_order_regardless_of_extension() {
        let dir = tempdir().unwrap();
        let z = dir.path().join("z.wav");
        let notes = dir.path().join("notes.bin");
        fs::write(&z, b"x").unwrap();
        fs::write(&notes, b"x").unwrap();

        let found = resolve_paths(&[z, notes], &LibrarySettings::default());
        assert_eq!(names(&found), vec!["z.wav", "notes.bin"]);
    }

    #[test]
    fn missing_paths_are_skipped() {
        let dir = tempdir().unwrap();
        let found = resolve_paths(
            &[dir.path().join("nope.mp3")],
            &LibrarySettings::default(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"x").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let found = resolve_paths(&[dir.path().to_path_buf()], &settings);
        assert_eq!(names(&found), vec!["visible.mp3"]);
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"x").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let found = resolve_paths(&[dir.path().to_path_buf()], &settings);
        assert_eq!(names(&found), vec!["root.mp3"]);
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"x").unwrap();
        fs::write(d1.join("one.mp3"), b"x").unwrap();
        fs::write(d2.join("two.mp3"), b"x").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2.
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let found = names(&resolve_paths(&[dir.path().to_path_buf()], &settings));
        assert!(found.contains(&"root.mp3".to_string()));
        assert!(found.contains(&"one.mp3".to_string()));
        assert!(!found.contains(&"two.mp3".to_string()));
    }
}
