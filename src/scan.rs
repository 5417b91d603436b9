//! Finding game executables in a directory, for adding many games at once.

use std::path::Path;

use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::{
    data::NewGame,
    utils::{has_extension, unix_millis_now},
};

/// Extensions of files picked up by [`scan_directory`] when none are given
pub const DEFAULT_EXTENSIONS: &[&str] = &["exe"];

/// Recursively finds files with one of the given extensions in the directory, returning a new
/// game for each, named after its file stem
///
/// Games are returned in file name order, with IDs of the form `<timestamp>_<index>`.
#[tracing::instrument(level = "debug")]
pub fn scan_directory(dir: &Path, extensions: &[&str]) -> Vec<NewGame> {
    let timestamp = unix_millis_now();

    let games = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|e| warn!("Error reading entry while scanning {dir:?}: {e}"))
                .ok()
        })
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), extensions))
        .enumerate()
        .map(|(i, entry)| {
            let path = entry.into_path();
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            trace!("Found executable '{name}' at {path:?}");

            NewGame {
                id: Some(format!("{timestamp}_{i}")),
                ..NewGame::new(name, path)
            }
        })
        .collect::<Vec<_>>();

    debug!("Found {} executables in {dir:?}", games.len());
    games
}
