use std::{
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
    path::PathBuf,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Data structure which defines all stored data about any particular game in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    /// Unique ID, generated from the time the game was added
    pub id: String,
    pub name: String,
    /// Path to the game's executable or shortcut. No two records share a path
    pub path: PathBuf,
    pub cover: Option<PathBuf>,
    /// Total time played, in seconds
    pub playtime: u64,
    /// Unix timestamp of the last session, `0` if the game was never played
    pub last_played: i64,
    /// Unix timestamp of when the game was added to the library
    pub added: i64,
    pub favorite: bool,
    pub tags: BTreeSet<String>,
    pub notes: String,
}

/// A game as supplied for adding to the library, or as read from a library document
///
/// Any field may be missing; missing fields are backfilled with defaults when the game enters
/// the library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewGame {
    pub id: Option<String>,
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    pub cover: Option<PathBuf>,
    pub playtime: Option<u64>,
    pub last_played: Option<i64>,
    pub added: Option<i64>,
    pub favorite: Option<bool>,
    pub tags: Option<BTreeSet<String>>,
    pub notes: Option<String>,
}

impl NewGame {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: Some(name.into()),
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn with_cover(mut self, cover: impl Into<PathBuf>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }
}

impl From<GameRecord> for NewGame {
    fn from(record: GameRecord) -> Self {
        Self {
            id: Some(record.id),
            name: Some(record.name),
            path: Some(record.path),
            cover: record.cover,
            playtime: Some(record.playtime),
            last_played: Some(record.last_played),
            added: Some(record.added),
            favorite: Some(record.favorite),
            tags: Some(record.tags),
            notes: Some(record.notes),
        }
    }
}

/// Partial update of a record, where only the fields which are `Some` are changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameUpdate {
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    /// `Some(None)` removes the cover
    pub cover: Option<Option<PathBuf>>,
    pub playtime: Option<u64>,
    pub last_played: Option<i64>,
    pub favorite: Option<bool>,
    pub tags: Option<BTreeSet<String>>,
    pub notes: Option<String>,
}

impl GameUpdate {
    /// Returns true if applying this update would not change anything
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Field which the library can be sorted by
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Case-insensitive name
    #[default]
    Name,
    Playtime,
    LastPlayed,
    Added,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Playtime => "playtime",
            SortField::LastPlayed => "last_played",
            SortField::Added => "added",
        }
    }
}

impl FromStr for SortField {
    type Err = UnknownSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "playtime" => Ok(SortField::Playtime),
            "last_played" => Ok(SortField::LastPlayed),
            "added" => Ok(SortField::Added),
            _ => Err(UnknownSortField(s.to_owned())),
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when parsing a [`SortField`] from an unrecognised name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortField(pub String);

/// Summary of a batch of games entering the library
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    /// Games which were not added because their path is already in the library
    pub skipped: usize,
}
