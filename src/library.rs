//! The game library: an ordered collection of [`GameRecord`]s backed by a JSON document.

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashSet},
    fs::read_to_string,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use serde_json::{Map, Value};
use tracing::{debug, error, trace, warn};

use crate::{
    data::{GameRecord, GameUpdate, ImportSummary, NewGame, SortField},
    document::{Document, LoadOutcome, read_json, write_json_pretty},
    error::LibraryError,
    macros::logs::{debug_path, warn_fallback},
    utils::{contains_ignore_case, none_if_empty, unix_millis_now, unix_seconds_now},
};

/// Name given to games added without one
pub const DEFAULT_GAME_NAME: &str = "Unknown Game";

/// Store for all games in the library
///
/// Every mutating operation rewrites the whole document before returning. If writing fails the
/// error is returned, but the change is kept in memory, so the in-memory library and the
/// document can differ until the next successful save.
#[derive(Debug)]
pub struct LibraryStore {
    path_document: PathBuf,
    games: Vec<GameRecord>,
    load_outcome: LoadOutcome,
}

impl LibraryStore {
    /// Opens the library document at the given path
    ///
    /// A missing document is created immediately as an empty library. A document which can't be
    /// read or parsed, or isn't a list, results in an empty library, and is left untouched until
    /// the next save. Within a list, fields with invalid values are backfilled like missing ones.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn open(path_document: impl Into<PathBuf>) -> Self {
        let path_document = path_document.into();
        debug_path!("library document", path_document);

        let mut store = Self {
            path_document,
            games: Vec::new(),
            load_outcome: LoadOutcome::NotFound,
        };

        store.load_outcome = match read_json::<Vec<Value>>(&store.path_document) {
            Document::Found(values) => {
                let entries = entries_from_values(values);
                let summary = store.extend_backfilled(entries, unix_seconds_now());
                if summary.skipped > 0 {
                    warn!(
                        "Skipped {} games with duplicate paths in {:?}",
                        summary.skipped, store.path_document
                    );
                }
                LoadOutcome::Found(store.games.len())
            }
            Document::NotFound => {
                debug!("Creating empty library document at {:?}", store.path_document);
                if let Err(e) = store.save() {
                    error!("Could not create library document: {e}");
                }
                LoadOutcome::NotFound
            }
            Document::Malformed(reason) => {
                warn_fallback!("Library document", store.path_document, reason);
                LoadOutcome::Malformed(reason)
            }
        };

        store
    }

    /// Outcome of reading the document when the store was opened
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn path(&self) -> &Path {
        &self.path_document
    }

    /// All games, in library order
    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Writes the whole library to its document
    pub fn save(&self) -> Result<(), LibraryError> {
        write_json_pretty(&self.path_document, &self.games).map_err(|e| {
            error!("Error saving library to {:?}: {e}", self.path_document);
            LibraryError::from(e)
        })
    }

    // QUERIES ------------------------------------------------------------------------------
    pub fn find(&self, id: &str) -> Option<&GameRecord> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn find_by_path(&self, path: impl AsRef<Path>) -> Option<&GameRecord> {
        let path = path.as_ref();
        self.games.iter().find(|g| g.path == path)
    }

    /// Games whose name contains the query, ignoring case
    pub fn search(&self, query: &str) -> Vec<&GameRecord> {
        self.games
            .iter()
            .filter(|g| contains_ignore_case(&g.name, query))
            .collect()
    }

    /// Games matching all given criteria
    ///
    /// With `favorites_only`, only favorites are kept. With a non-empty tag set, only games
    /// having at least one of the tags are kept.
    pub fn filter(&self, favorites_only: bool, tags: &BTreeSet<String>) -> Vec<&GameRecord> {
        self.games
            .iter()
            .filter(|g| !favorites_only || g.favorite)
            .filter(|g| tags.is_empty() || !g.tags.is_disjoint(tags))
            .collect()
    }

    /// All games, stably sorted by the given field
    pub fn sort_by(&self, field: SortField, descending: bool) -> Vec<&GameRecord> {
        let mut games = self.games.iter().collect::<Vec<_>>();
        sort_games(&mut games, field, descending);
        games
    }

    /// Like [`LibraryStore::sort_by`], with the field given by name
    ///
    /// An unknown field name sorts by name, ascending.
    pub fn sort_by_name(&self, field: &str, descending: bool) -> Vec<&GameRecord> {
        match field.parse::<SortField>() {
            Ok(field) => self.sort_by(field, descending),
            Err(_) => {
                debug!("Unknown sort field '{field}', sorting by name");
                self.sort_by(SortField::Name, false)
            }
        }
    }

    /// Sum of the playtime of all games, in seconds
    pub fn total_playtime(&self) -> u64 {
        self.games.iter().map(|g| g.playtime).sum()
    }

    /// All distinct tags used in the library, sorted
    pub fn all_tags(&self) -> Vec<&str> {
        self.games
            .iter()
            .flat_map(|g| g.tags.iter().map(String::as_str))
            .unique()
            .sorted()
            .collect()
    }

    // MUTATIONS ----------------------------------------------------------------------------
    /// Adds a game, filling any missing fields with defaults, and returns its ID
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn add(&mut self, game: NewGame) -> Result<String, LibraryError> {
        let path = game.path.clone().unwrap_or_default();
        if self.find_by_path(&path).is_some() {
            debug!("Not adding game as its path is already in the library: {path:?}");
            return Err(LibraryError::DuplicatePath(path));
        }

        let record = self.backfill(game, unix_seconds_now());
        let id = record.id.clone();
        self.games.push(record);
        self.save()?;

        Ok(id)
    }

    /// Adds several games with a single save, skipping those whose path is already present
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn add_all(
        &mut self,
        games: impl IntoIterator<Item = NewGame>,
    ) -> Result<ImportSummary, LibraryError> {
        let summary = self.extend_backfilled(games, unix_seconds_now());
        if summary.added > 0 {
            self.save()?;
        }

        Ok(summary)
    }

    /// Applies the fields present in the update to the game with the given ID
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn update(&mut self, id: &str, update: GameUpdate) -> Result<(), LibraryError> {
        if let Some(path) = &update.path {
            if self.games.iter().any(|g| g.id != id && g.path == *path) {
                return Err(LibraryError::DuplicatePath(path.clone()));
            }
        }

        let record = self.find_mut(id)?;
        let GameUpdate {
            name,
            path,
            cover,
            playtime,
            last_played,
            favorite,
            tags,
            notes,
        } = update;

        if let Some(name) = name {
            record.name = name;
        }
        if let Some(path) = path {
            record.path = path;
        }
        if let Some(cover) = cover {
            record.cover = none_if_empty(cover);
        }
        if let Some(playtime) = playtime {
            record.playtime = playtime;
        }
        if let Some(last_played) = last_played {
            record.last_played = last_played;
        }
        if let Some(favorite) = favorite {
            record.favorite = favorite;
        }
        if let Some(tags) = tags {
            record.tags = tags;
        }
        if let Some(notes) = notes {
            record.notes = notes;
        }

        self.save()
    }

    /// Removes the game with the given ID, returning whether a game was removed
    ///
    /// Removing an ID which isn't in the library is not an error.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: &str) -> Result<bool, LibraryError> {
        let len_before = self.games.len();
        self.games.retain(|g| g.id != id);

        let removed = self.games.len() != len_before;
        if removed {
            self.save()?;
        }

        Ok(removed)
    }

    /// Adds the given number of seconds to a game's playtime and marks it as played now
    pub fn accrue_playtime(&mut self, id: &str, seconds: u64) -> Result<(), LibraryError> {
        self.accrue_playtime_at(id, seconds, unix_seconds_now())
    }

    /// Like [`LibraryStore::accrue_playtime`], with the time of play given explicitly
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn accrue_playtime_at(
        &mut self,
        id: &str,
        seconds: u64,
        played_at: i64,
    ) -> Result<(), LibraryError> {
        let record = self.find_mut(id)?;
        record.playtime = record.playtime.saturating_add(seconds);
        record.last_played = played_at;
        trace!("Playtime of '{}' is now {}s", record.name, record.playtime);

        self.save()
    }

    /// Sets a game's last played time, as happens whenever it is launched
    pub fn mark_launched_at(&mut self, id: &str, launched_at: i64) -> Result<(), LibraryError> {
        self.find_mut(id)?.last_played = launched_at;
        self.save()
    }

    /// Clears playtime and last played time for every game
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn reset_stats(&mut self) -> Result<(), LibraryError> {
        for game in &mut self.games {
            game.playtime = 0;
            game.last_played = 0;
        }

        self.save()
    }

    // IMPORT / EXPORT ----------------------------------------------------------------------
    /// Writes the whole library to the given path, in the library document format
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn export_all(&self, path: &Path) -> Result<(), LibraryError> {
        write_json_pretty(path, &self.games).map_err(|e| {
            error!("Error exporting library to {path:?}: {e}");
            LibraryError::from(e)
        })
    }

    /// Reads games from a document in the library document format
    ///
    /// With `merge`, games are added to the library, skipping any whose path is already present.
    /// Otherwise, the library is replaced entirely by the imported games. If the document can't
    /// be read or isn't a list, the library is left unchanged.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn import_all(&mut self, path: &Path, merge: bool) -> Result<ImportSummary, LibraryError> {
        let content = read_to_string(path).inspect_err(|e| {
            error!("Error reading library import from {path:?}: {e}");
        })?;
        let Value::Array(values) = serde_json::from_str::<Value>(&content)? else {
            return Err(LibraryError::NotASequence(path.to_owned()));
        };
        let entries = entries_from_values(values);

        if !merge {
            debug!("Replacing library with {} imported games", entries.len());
            self.games.clear();
        }

        let summary = self.extend_backfilled(entries, unix_seconds_now());
        self.save()?;

        Ok(summary)
    }

    // HELPERS ------------------------------------------------------------------------------
    fn find_mut(&mut self, id: &str) -> Result<&mut GameRecord, LibraryError> {
        self.games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_owned()))
    }

    /// Appends the games, skipping any whose path is already in the library
    fn extend_backfilled(
        &mut self,
        games: impl IntoIterator<Item = NewGame>,
        now: i64,
    ) -> ImportSummary {
        let mut paths = self
            .games
            .iter()
            .map(|g| g.path.clone())
            .collect::<HashSet<_>>();
        let mut summary = ImportSummary::default();

        for game in games {
            let path = game.path.clone().unwrap_or_default();
            if paths.contains(&path) {
                trace!("Skipping game with duplicate path {path:?}");
                summary.skipped += 1;
                continue;
            }

            let record = self.backfill(game, now);
            paths.insert(path);
            self.games.push(record);
            summary.added += 1;
        }

        summary
    }

    /// Builds a full record from the given game, filling any missing fields with defaults
    fn backfill(&self, game: NewGame, now: i64) -> GameRecord {
        let NewGame {
            id,
            name,
            path,
            cover,
            playtime,
            last_played,
            added,
            favorite,
            tags,
            notes,
        } = game;

        let id = match id.filter(|id| !id.is_empty()) {
            Some(id) if self.find(&id).is_none() => id,
            Some(id) => {
                debug!("ID '{id}' is already in use, generating a new one");
                self.generate_id()
            }
            None => self.generate_id(),
        };

        GameRecord {
            id,
            name: name.unwrap_or_else(|| DEFAULT_GAME_NAME.to_owned()),
            path: path.unwrap_or_default(),
            cover: none_if_empty(cover),
            playtime: playtime.unwrap_or(0),
            last_played: last_played.unwrap_or(0),
            added: added.unwrap_or(now),
            favorite: favorite.unwrap_or(false),
            tags: tags.unwrap_or_default(),
            notes: notes.unwrap_or_default(),
        }
    }

    /// Generates an ID from the current time, unique within the library
    fn generate_id(&self) -> String {
        let base = unix_millis_now().to_string();
        if self.find(&base).is_none() {
            return base;
        }

        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|id| self.find(id).is_none())
            .unwrap_or(base)
    }
}

/// Reads the entries of a library document, skipping any which aren't objects
fn entries_from_values(values: Vec<Value>) -> Vec<NewGame> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| entry_from_value(index, value))
        .collect()
}

/// Reads a single entry. Fields with a value of the wrong type are dropped, so that they get
/// backfilled like missing fields.
fn entry_from_value(index: usize, value: Value) -> Option<NewGame> {
    let Value::Object(fields) = value else {
        warn!("Skipping library entry {index} as it is not an object: {value}");
        return None;
    };

    if let Ok(game) = serde_json::from_value::<NewGame>(Value::Object(fields.clone())) {
        return Some(game);
    }

    let fields = fields
        .into_iter()
        .filter(|(key, value)| {
            let field = Map::from_iter([(key.clone(), value.clone())]);
            let valid = serde_json::from_value::<NewGame>(Value::Object(field)).is_ok();
            if !valid {
                warn!("Ignoring invalid value of '{key}' in library entry {index}: {value}");
            }
            valid
        })
        .collect::<Map<_, _>>();

    serde_json::from_value(Value::Object(fields))
        .inspect_err(|e| warn!("Skipping library entry {index}: {e}"))
        .ok()
}

/// Stably sorts the games by the given field
pub fn sort_games(games: &mut [&GameRecord], field: SortField, descending: bool) {
    let compare = |a: &&GameRecord, b: &&GameRecord| -> Ordering {
        match field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Playtime => a.playtime.cmp(&b.playtime),
            SortField::LastPlayed => a.last_played.cmp(&b.last_played),
            SortField::Added => a.added.cmp(&b.added),
        }
    };

    if descending {
        games.sort_by(|a, b| compare(b, a));
    } else {
        games.sort_by(compare);
    }
}
