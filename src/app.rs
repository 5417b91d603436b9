//! The application context, tying the stores and the tracker together.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::{
    data::GameRecord,
    error::LaunchError,
    library::{LibraryStore, sort_games},
    settings::SettingsStore,
    tracker::{
        Clock, CommandSpawner, LaunchOutcome, PlaytimeTracker, Spawner, SystemClock, TrackerEvent,
    },
    utils::contains_ignore_case,
    version::should_check,
};

/// Name of the directory holding the application's documents
pub const APP_DIR_NAME: &str = "lib_game_library";
pub const LIBRARY_FILE_NAME: &str = "games.json";
pub const SETTINGS_FILE_NAME: &str = "config.json";

/// Locations of the documents backing the stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub library: PathBuf,
    pub settings: PathBuf,
}

impl DataPaths {
    /// Paths for documents stored in the given directory
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            library: dir.join(LIBRARY_FILE_NAME),
            settings: dir.join(SETTINGS_FILE_NAME),
        }
    }
}

impl Default for DataPaths {
    /// Paths inside the user's data directory, or the working directory if there is none
    fn default() -> Self {
        let dir = dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| {
                debug!("No data directory found for the current user, using working directory");
                PathBuf::from(".")
            });

        Self::in_dir(&dir)
    }
}

/// The game library application: owns the library, the settings and the playtime tracker
///
/// Create it on application start with [`GameLibrary::open`], call [`GameLibrary::tick`] from
/// the event loop, and finish with [`GameLibrary::shutdown`] so that running sessions are
/// counted.
#[derive(Debug)]
pub struct GameLibrary<C = SystemClock, S = CommandSpawner> {
    library: LibraryStore,
    settings: SettingsStore,
    tracker: PlaytimeTracker<C, S>,
}

impl GameLibrary {
    /// Opens the documents at the given paths, with a tracker launching real processes
    pub fn open(paths: &DataPaths) -> Self {
        Self::with_tracker(
            LibraryStore::open(&paths.library),
            SettingsStore::open(&paths.settings),
            PlaytimeTracker::default(),
        )
    }
}

impl<C: Clock, S: Spawner> GameLibrary<C, S> {
    pub fn with_tracker(
        library: LibraryStore,
        settings: SettingsStore,
        tracker: PlaytimeTracker<C, S>,
    ) -> Self {
        info!(
            "Opened library with {} games from {:?}",
            library.len(),
            library.path()
        );

        Self {
            library,
            settings,
            tracker,
        }
    }

    pub fn library(&self) -> &LibraryStore {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut LibraryStore {
        &mut self.library
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn tracker(&self) -> &PlaytimeTracker<C, S> {
        &self.tracker
    }

    /// Games whose name matches the query, sorted as configured in the settings
    pub fn visible_games(&self, query: &str) -> Vec<&GameRecord> {
        let settings = self.settings.settings();
        let mut games = self
            .library
            .games()
            .iter()
            .filter(|g| contains_ignore_case(&g.name, query))
            .collect::<Vec<_>>();

        sort_games(
            &mut games,
            settings.sort_field(),
            settings.sort_descending(),
        );
        games
    }

    /// Launches a game, tracking its playtime if enabled in the settings
    pub fn launch(&mut self, id: &str) -> Result<LaunchOutcome, LaunchError> {
        let track = self.settings.settings().track_playtime;
        self.tracker.launch(&mut self.library, id, track)
    }

    /// Advances the tracker; to be called regularly from the event loop
    pub fn tick(&mut self) -> Vec<TrackerEvent> {
        self.tracker.tick(&mut self.library)
    }

    /// Whether it has been long enough since the last check for application updates
    pub fn update_check_due(&self, now: i64) -> bool {
        let settings = self.settings.settings();
        settings.auto_check_updates && should_check(settings.last_update_check, now)
    }

    /// Records that an update check happened at the given time
    pub fn record_update_check(&mut self, now: i64) {
        let result = self
            .settings
            .set("last_update_check", now)
            .and_then(|()| self.settings.save());

        if let Err(e) = result {
            error!("Could not record update check: {e}");
        }
    }

    /// Settles all running sessions and saves the settings
    ///
    /// Game processes are left running, but their time up to now is counted.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn shutdown(mut self) -> Vec<TrackerEvent> {
        let events = self.tracker.shutdown(&mut self.library);

        if let Err(e) = self.settings.save() {
            error!("Could not save settings on shutdown: {e}");
        }
        info!("Closed library, settled {} sessions", events.len());

        events
    }
}
