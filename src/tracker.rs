//! Launching games and tracking how long they are played for.
//!
//! The tracker never blocks or spawns threads. The owner's event loop calls
//! [`PlaytimeTracker::tick`] regularly (e.g. every second), which polls launched processes and
//! settles the sessions of those which have exited. Each game moves through the states
//! [`SessionState::Idle`] → [`SessionState::Launching`] → [`SessionState::Running`] →
//! [`SessionState::Settling`] → [`SessionState::Idle`].

use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Formatter},
    io::{self, ErrorKind},
    path::Path,
    process::Child,
    time::{Duration, Instant},
};

use tracing::{debug, error, info, trace, warn};

use crate::{
    error::{LaunchError, LibraryError},
    library::LibraryStore,
    utils::{get_launch_command, unix_seconds_now},
};

// TRAITS -------------------------------------------------------------------------------
/// Source of the current time
pub trait Clock {
    /// Monotonic time since a fixed point, used to measure sessions
    fn monotonic(&self) -> Duration;
    /// Current unix time in seconds, used for the timestamps stored in the library
    fn unix_now(&self) -> i64;
}

/// [`Clock`] reading the system time
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn monotonic(&self) -> Duration {
        self.origin.elapsed()
    }

    fn unix_now(&self) -> i64 {
        unix_seconds_now()
    }
}

/// A launched game process which can be checked for exit without blocking
pub trait GameProcess {
    /// Returns true once the process has exited
    fn has_exited(&mut self) -> io::Result<bool>;
}

impl GameProcess for Child {
    fn has_exited(&mut self) -> io::Result<bool> {
        Ok(self.try_wait()?.is_some())
    }
}

/// Starts game processes
pub trait Spawner {
    fn spawn(&self, path: &Path) -> Result<Box<dyn GameProcess>, LaunchError>;
}

/// [`Spawner`] starting games as OS processes
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandSpawner;

impl Spawner for CommandSpawner {
    #[tracing::instrument(level = "debug", skip(self))]
    fn spawn(&self, path: &Path) -> Result<Box<dyn GameProcess>, LaunchError> {
        if !path.exists() {
            return Err(LaunchError::NotFound(path.to_owned()));
        }

        let mut command = get_launch_command(path);
        trace!("Launch command: {command:?}");

        match command.spawn() {
            Ok(child) => {
                debug!("Started process {} for {path:?}", child.id());
                Ok(Box::new(child))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(LaunchError::NotFound(path.to_owned())),
            Err(source) => Err(LaunchError::Spawn {
                path: path.to_owned(),
                source,
            }),
        }
    }
}

// DATA ---------------------------------------------------------------------------------
/// Timing rules for launches and sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Sessions shorter than this are not counted, filtering out crashes and cancelled launches
    pub min_session: Duration,
    /// Delay between launching a game and first checking whether it has exited
    pub first_poll_delay: Duration,
    pub poll_interval: Duration,
    /// How long a game is shown as loading after being launched
    pub loading_duration: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_session: Duration::from_secs(5),
            first_poll_delay: Duration::from_secs(3),
            poll_interval: Duration::from_secs(1),
            loading_duration: Duration::from_secs(2),
        }
    }
}

/// Tracking state of a single game
///
/// `Launching` and `Settling` are passed through within a single call to
/// [`PlaytimeTracker::launch`], [`PlaytimeTracker::tick`] or [`PlaytimeTracker::shutdown`], so
/// [`PlaytimeTracker::state`] only ever reports `Idle` or `Running`. The transient states show up
/// in trace logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// The process is being started
    Launching,
    /// The process is running and being polled
    Running,
    /// The process has exited (or the application is closing) and the elapsed time is being
    /// accounted for
    Settling,
}

/// Result of a launch request which did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The game was started and its session is being tracked
    Tracked,
    /// The game was started without tracking playtime
    Untracked,
    /// The game already has a running session, so nothing was done
    AlreadyRunning,
}

/// Something that happened to a game's session, for the owner to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// The cosmetic loading state of the game has ended
    LoadingCleared { id: String },
    /// The session has ended. `accrued` is false if the session was too short to count, or its
    /// game is no longer in the library
    Settled {
        id: String,
        elapsed_secs: u64,
        accrued: bool,
    },
    /// The process could not be polled, so the session was dropped without counting it
    PollFailed { id: String, reason: String },
}

struct Session {
    process: Box<dyn GameProcess>,
    started: Duration,
    next_poll: Duration,
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("started", &self.started)
            .field("next_poll", &self.next_poll)
            .finish_non_exhaustive()
    }
}

/// Process of an untracked launch, kept only to be reaped once it exits
struct Detached {
    id: String,
    process: Box<dyn GameProcess>,
}

impl Debug for Detached {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detached")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// TRACKER ------------------------------------------------------------------------------
/// Launches games and accrues the time they were played into the library
///
/// Each game has at most one session at a time, but any number of games may be running at
/// once.
#[derive(Debug)]
pub struct PlaytimeTracker<C = SystemClock, S = CommandSpawner> {
    config: TrackerConfig,
    clock: C,
    spawner: S,
    sessions: BTreeMap<String, Session>,
    detached: Vec<Detached>,
    /// Time at which each loading game stops being shown as loading
    loading_until: BTreeMap<String, Duration>,
}

impl Default for PlaytimeTracker {
    fn default() -> Self {
        Self::new(
            TrackerConfig::default(),
            SystemClock::default(),
            CommandSpawner,
        )
    }
}

impl<C: Clock, S: Spawner> PlaytimeTracker<C, S> {
    pub fn new(config: TrackerConfig, clock: C, spawner: S) -> Self {
        Self {
            config,
            clock,
            spawner,
            sessions: BTreeMap::new(),
            detached: Vec::new(),
            loading_until: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn state(&self, id: &str) -> SessionState {
        if self.sessions.contains_key(id) {
            SessionState::Running
        } else {
            SessionState::Idle
        }
    }

    /// Whether the game should still be shown as loading
    pub fn is_loading(&self, id: &str) -> bool {
        self.loading_until.contains_key(id)
    }

    /// IDs of all games with a running session
    pub fn active_sessions(&self) -> impl Iterator<Item = &str> {
        self.sessions.keys().map(String::as_str)
    }

    pub fn has_active_sessions(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Seconds elapsed so far in the game's running session
    pub fn elapsed(&self, id: &str) -> Option<u64> {
        self.sessions
            .get(id)
            .map(|s| self.clock.monotonic().saturating_sub(s.started).as_secs())
    }

    /// Launches the game with the given ID
    ///
    /// When `track` is false no playtime is recorded, and the process is only checked to reap it
    /// once it exits. A launch request for a game which is already running is ignored.
    #[tracing::instrument(level = "debug", skip(self, library))]
    pub fn launch(
        &mut self,
        library: &mut LibraryStore,
        id: &str,
        track: bool,
    ) -> Result<LaunchOutcome, LaunchError> {
        if self.sessions.contains_key(id) {
            debug!("Ignoring launch of '{id}' as it is already running");
            return Ok(LaunchOutcome::AlreadyRunning);
        }

        let path = library
            .find(id)
            .map(|g| g.path.clone())
            .ok_or_else(|| LibraryError::NotFound(id.to_owned()))?;

        let now = self.clock.monotonic();
        transition(id, SessionState::Idle, SessionState::Launching);
        self.loading_until
            .insert(id.to_owned(), now + self.config.loading_duration);

        let process = match self.spawner.spawn(&path) {
            Ok(process) => process,
            Err(e) => {
                error!("Error launching '{id}': {e}");
                self.loading_until.remove(id);
                transition(id, SessionState::Launching, SessionState::Idle);
                return Err(e);
            }
        };
        info!("Launched '{id}' from {path:?}");

        if let Err(e) = library.mark_launched_at(id, self.clock.unix_now()) {
            warn!("Could not record launch time of '{id}': {e}");
        }

        if !track {
            self.detached.push(Detached {
                id: id.to_owned(),
                process,
            });
            transition(id, SessionState::Launching, SessionState::Idle);
            return Ok(LaunchOutcome::Untracked);
        }

        self.sessions.insert(
            id.to_owned(),
            Session {
                process,
                started: now,
                next_poll: now + self.config.first_poll_delay,
            },
        );
        transition(id, SessionState::Launching, SessionState::Running);

        Ok(LaunchOutcome::Tracked)
    }

    /// Clears expired loading states and polls every session which is due, settling those
    /// whose process has exited. Untracked processes which have exited are reaped.
    pub fn tick(&mut self, library: &mut LibraryStore) -> Vec<TrackerEvent> {
        let now = self.clock.monotonic();
        let mut events = Vec::new();

        self.detached
            .retain_mut(|Detached { id, process }| match process.has_exited() {
                Ok(exited) => {
                    if exited {
                        trace!("Reaped untracked process of '{id}'");
                    }
                    !exited
                }
                Err(e) => {
                    warn!("Error polling the untracked process of '{id}', ignoring it: {e}");
                    false
                }
            });

        self.loading_until.retain(|id, until| {
            let expired = *until <= now;
            if expired {
                events.push(TrackerEvent::LoadingCleared { id: id.clone() });
            }
            !expired
        });

        let due = self
            .sessions
            .iter()
            .filter(|(_, s)| s.next_poll <= now)
            .map(|(id, _)| id.clone())
            .collect::<Vec<_>>();

        for id in due {
            let Some(session) = self.sessions.get_mut(&id) else {
                continue;
            };

            match session.process.has_exited() {
                Ok(false) => {
                    session.next_poll = now + self.config.poll_interval;
                }
                Ok(true) => {
                    if let Some(session) = self.sessions.remove(&id) {
                        events.push(self.settle(library, id, session, now));
                    }
                }
                Err(e) => {
                    warn!("Error polling the process of '{id}', dropping its session: {e}");
                    self.sessions.remove(&id);
                    transition(&id, SessionState::Running, SessionState::Idle);
                    events.push(TrackerEvent::PollFailed {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        events
    }

    /// Settles every running session with the time elapsed so far
    ///
    /// Called when the application is closing, so that no tracked time is lost. Game processes
    /// are left running.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn shutdown(&mut self, library: &mut LibraryStore) -> Vec<TrackerEvent> {
        let now = self.clock.monotonic();
        self.loading_until.clear();

        std::mem::take(&mut self.sessions)
            .into_iter()
            .map(|(id, session)| self.settle(library, id, session, now))
            .collect()
    }

    fn settle(
        &self,
        library: &mut LibraryStore,
        id: String,
        session: Session,
        now: Duration,
    ) -> TrackerEvent {
        transition(&id, SessionState::Running, SessionState::Settling);
        let elapsed = now.saturating_sub(session.started);
        let elapsed_secs = elapsed.as_secs();

        let accrued = if elapsed < self.config.min_session {
            debug!("Session of '{id}' lasted {elapsed_secs}s, too short to count");
            false
        } else {
            match library.accrue_playtime_at(&id, elapsed_secs, self.clock.unix_now()) {
                Ok(()) => true,
                Err(LibraryError::NotFound(_)) => {
                    warn!("'{id}' was removed from the library while running");
                    false
                }
                // The playtime is kept in memory, only saving failed
                Err(e) => {
                    error!("Error saving playtime of '{id}': {e}");
                    true
                }
            }
        };
        if accrued {
            info!("Accrued {elapsed_secs}s of playtime to '{id}'");
        }

        transition(&id, SessionState::Settling, SessionState::Idle);
        TrackerEvent::Settled {
            id,
            elapsed_secs,
            accrued,
        }
    }
}

fn transition(id: &str, from: SessionState, to: SessionState) {
    trace!("'{id}': {from:?} -> {to:?}");
}


#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        path::PathBuf,
        rc::Rc,
    };

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use test_case::test_case;

    use super::*;
    use crate::data::NewGame;

    const T0: i64 = 1_700_000_000;

    /// Clock starting at `T0`, moved forward by hand
    #[derive(Clone)]
    struct ManualClock(Rc<Cell<Duration>>);

    impl ManualClock {
        fn advance(&self, secs: i64) {
            self.advance_millis(secs as u64 * 1000);
        }

        fn advance_millis(&self, millis: u64) {
            self.0.set(self.0.get() + Duration::from_millis(millis));
        }
    }

    impl Clock for ManualClock {
        fn monotonic(&self) -> Duration {
            self.0.get()
        }

        fn unix_now(&self) -> i64 {
            T0 + self.0.get().as_secs() as i64
        }
    }

    /// Process which exits when its shared flag is set
    struct FakeProcess {
        exited: Rc<Cell<bool>>,
        fail_poll: bool,
    }

    impl GameProcess for FakeProcess {
        fn has_exited(&mut self) -> io::Result<bool> {
            if self.fail_poll {
                return Err(io::Error::other("poll failed"));
            }
            Ok(self.exited.get())
        }
    }

    #[derive(Clone, Default)]
    struct FakeSpawner {
        /// Exit flags of spawned processes, by path
        spawned: Rc<RefCell<Vec<(PathBuf, Rc<Cell<bool>>)>>>,
        fail_poll: bool,
    }

    impl FakeSpawner {
        fn exit(&self, path: &str) {
            self.spawned
                .borrow()
                .iter()
                .filter(|(p, _)| p == Path::new(path))
                .for_each(|(_, exited)| exited.set(true));
        }

        fn spawn_count(&self) -> usize {
            self.spawned.borrow().len()
        }
    }

    impl Spawner for FakeSpawner {
        fn spawn(&self, path: &Path) -> Result<Box<dyn GameProcess>, LaunchError> {
            if path.starts_with("/missing") {
                return Err(LaunchError::NotFound(path.to_owned()));
            }

            let exited = Rc::new(Cell::new(false));
            self.spawned
                .borrow_mut()
                .push((path.to_owned(), Rc::clone(&exited)));
            Ok(Box::new(FakeProcess {
                exited,
                fail_poll: self.fail_poll,
            }))
        }
    }

    struct Fixture {
        tracker: PlaytimeTracker<ManualClock, FakeSpawner>,
        clock: ManualClock,
        spawner: FakeSpawner,
        library: LibraryStore,
        _dir: TempDir,
    }

    fn fixture_with_spawner(spawner: FakeSpawner) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let mut library = LibraryStore::open(dir.path().join("games.json"));
        library
            .add_all([
                NewGame {
                    id: Some("celeste".to_owned()),
                    playtime: Some(100),
                    ..NewGame::new("Celeste", "/games/celeste")
                },
                NewGame {
                    id: Some("hades".to_owned()),
                    ..NewGame::new("Hades", "/games/hades")
                },
                NewGame {
                    id: Some("gone".to_owned()),
                    ..NewGame::new("Gone", "/missing/gone")
                },
            ])
            .unwrap();

        let clock = ManualClock(Rc::new(Cell::new(Duration::ZERO)));
        let tracker =
            PlaytimeTracker::new(TrackerConfig::default(), clock.clone(), spawner.clone());

        Fixture {
            tracker,
            clock,
            spawner,
            library,
            _dir: dir,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_spawner(FakeSpawner::default())
    }

    impl Fixture {
        fn launch(&mut self, id: &str) -> Result<LaunchOutcome, LaunchError> {
            self.tracker.launch(&mut self.library, id, true)
        }

        fn tick(&mut self) -> Vec<TrackerEvent> {
            self.tracker.tick(&mut self.library)
        }

        fn playtime(&self, id: &str) -> u64 {
            self.library.find(id).unwrap().playtime
        }

        fn last_played(&self, id: &str) -> i64 {
            self.library.find(id).unwrap().last_played
        }
    }

    #[test_case(12, 112, true; "long session is counted")]
    #[test_case(5, 105, true; "session at threshold is counted")]
    #[test_case(3, 100, false; "short session is discarded")]
    fn test_session_accrual(run_for: i64, expected_playtime: u64, expected_accrued: bool) {
        let mut f = fixture();

        assert_eq!(f.launch("celeste").unwrap(), LaunchOutcome::Tracked);
        assert_eq!(f.tracker.state("celeste"), SessionState::Running);

        f.clock.advance(run_for);
        f.spawner.exit("/games/celeste");
        let events = f.tick();

        assert!(events.contains(&TrackerEvent::Settled {
            id: "celeste".to_owned(),
            elapsed_secs: run_for as u64,
            accrued: expected_accrued,
        }));
        assert_eq!(f.playtime("celeste"), expected_playtime);
        assert_eq!(f.tracker.state("celeste"), SessionState::Idle);
        if expected_accrued {
            assert_eq!(f.last_played("celeste"), T0 + run_for);
        }
    }

    #[test_case(900, 4100, false; "short session starting mid second")]
    #[test_case(100, 5900, true; "long session ending mid second")]
    fn test_session_measured_monotonically(
        start_ms: u64,
        run_for_ms: u64,
        expected_accrued: bool,
    ) {
        let mut f = fixture();
        f.clock.advance_millis(start_ms);
        f.launch("celeste").unwrap();

        f.clock.advance_millis(run_for_ms);
        f.spawner.exit("/games/celeste");
        let events = f.tick();

        assert!(events.contains(&TrackerEvent::Settled {
            id: "celeste".to_owned(),
            elapsed_secs: run_for_ms / 1000,
            accrued: expected_accrued,
        }));
        let expected_playtime = if expected_accrued { 105 } else { 100 };
        assert_eq!(f.playtime("celeste"), expected_playtime);
    }

    #[test]
    fn test_launch_marks_last_played() {
        let mut f = fixture();

        f.launch("hades").unwrap();

        assert_eq!(f.last_played("hades"), T0);
    }

    #[test]
    fn test_polling_schedule() {
        let mut f = fixture();
        f.launch("celeste").unwrap();
        f.spawner.exit("/games/celeste");

        // First poll only happens after the initial delay
        f.clock.advance(2);
        assert!(
            !f.tick()
                .iter()
                .any(|e| matches!(e, TrackerEvent::Settled { .. }))
        );
        assert_eq!(f.tracker.state("celeste"), SessionState::Running);

        f.clock.advance(1);
        assert!(
            f.tick()
                .iter()
                .any(|e| matches!(e, TrackerEvent::Settled { .. }))
        );
    }

    #[test]
    fn test_running_session_keeps_polling() {
        let mut f = fixture();
        f.launch("celeste").unwrap();

        for _ in 0..10 {
            f.clock.advance(1);
            f.tick();
        }
        assert_eq!(f.tracker.state("celeste"), SessionState::Running);
        assert_eq!(f.tracker.elapsed("celeste"), Some(10));

        f.spawner.exit("/games/celeste");
        f.clock.advance(1);
        f.tick();

        assert_eq!(f.playtime("celeste"), 111);
    }

    #[test]
    fn test_second_launch_is_ignored() {
        let mut f = fixture();

        f.launch("celeste").unwrap();
        assert_eq!(f.launch("celeste").unwrap(), LaunchOutcome::AlreadyRunning);
        assert_eq!(f.spawner.spawn_count(), 1);
    }

    #[test]
    fn test_concurrent_sessions() {
        let mut f = fixture();
        f.launch("celeste").unwrap();
        f.clock.advance(4);
        f.launch("hades").unwrap();

        f.clock.advance(6);
        f.spawner.exit("/games/celeste");
        f.tick();
        assert_eq!(f.playtime("celeste"), 110);
        assert_eq!(f.tracker.state("hades"), SessionState::Running);

        f.clock.advance(10);
        f.spawner.exit("/games/hades");
        f.tick();
        assert_eq!(f.playtime("hades"), 16);
        assert!(!f.tracker.has_active_sessions());
    }

    #[test]
    fn test_untracked_launch() {
        let mut f = fixture();

        let outcome = f.tracker.launch(&mut f.library, "celeste", false).unwrap();

        assert_eq!(outcome, LaunchOutcome::Untracked);
        assert_eq!(f.tracker.state("celeste"), SessionState::Idle);
        assert!(f.tracker.is_loading("celeste"));

        f.clock.advance(60);
        f.spawner.exit("/games/celeste");
        f.tick();
        assert_eq!(f.playtime("celeste"), 100);
    }

    #[test]
    fn test_untracked_process_is_reaped() {
        let mut f = fixture();
        f.tracker.launch(&mut f.library, "celeste", false).unwrap();
        assert_eq!(f.tracker.detached.len(), 1);

        f.clock.advance(1);
        f.tick();
        assert_eq!(f.tracker.detached.len(), 1);

        f.spawner.exit("/games/celeste");
        f.tick();
        assert!(f.tracker.detached.is_empty());
        assert_eq!(f.playtime("celeste"), 100);
    }

    #[test]
    fn test_loading_flag_clears_after_delay() {
        let mut f = fixture();
        f.launch("celeste").unwrap();
        assert!(f.tracker.is_loading("celeste"));

        f.clock.advance(1);
        assert!(f.tick().is_empty());
        assert!(f.tracker.is_loading("celeste"));

        f.clock.advance(1);
        assert_eq!(
            f.tick(),
            [TrackerEvent::LoadingCleared {
                id: "celeste".to_owned()
            }]
        );
        assert!(!f.tracker.is_loading("celeste"));
        assert_eq!(f.tracker.state("celeste"), SessionState::Running);
    }

    #[test]
    fn test_launch_failure() {
        let mut f = fixture();
        let before = f.library.find("gone").cloned();

        let result = f.launch("gone");

        assert!(matches!(result, Err(LaunchError::NotFound(_))));
        assert_eq!(f.tracker.state("gone"), SessionState::Idle);
        assert!(!f.tracker.is_loading("gone"));
        assert_eq!(f.library.find("gone").cloned(), before);
    }

    #[test]
    fn test_launch_unknown_game() {
        let mut f = fixture();

        let result = f.launch("not-in-library");

        assert!(matches!(
            result,
            Err(LaunchError::Library(LibraryError::NotFound(_)))
        ));
        assert_eq!(f.spawner.spawn_count(), 0);
    }

    #[test]
    fn test_shutdown_settles_running_sessions() {
        let mut f = fixture();
        f.launch("celeste").unwrap();
        f.launch("hades").unwrap();
        f.clock.advance(20);

        let events = f.tracker.shutdown(&mut f.library);

        assert_eq!(events.len(), 2);
        assert_eq!(f.playtime("celeste"), 120);
        assert_eq!(f.playtime("hades"), 20);
        assert_eq!(f.last_played("celeste"), T0 + 20);
        assert!(!f.tracker.has_active_sessions());

        // Persisted before returning
        let reopened = LibraryStore::open(f.library.path());
        assert_eq!(reopened.find("celeste").unwrap().playtime, 120);
    }

    #[test]
    fn test_shutdown_discards_short_sessions() {
        let mut f = fixture();
        f.launch("celeste").unwrap();
        f.clock.advance(2);

        let events = f.tracker.shutdown(&mut f.library);

        assert_eq!(
            events,
            [TrackerEvent::Settled {
                id: "celeste".to_owned(),
                elapsed_secs: 2,
                accrued: false,
            }]
        );
        assert_eq!(f.playtime("celeste"), 100);
    }

    #[test]
    fn test_game_removed_while_running() {
        let mut f = fixture();
        f.launch("hades").unwrap();
        f.library.remove("hades").unwrap();

        f.clock.advance(30);
        f.spawner.exit("/games/hades");
        let events = f.tick();

        assert!(events.contains(&TrackerEvent::Settled {
            id: "hades".to_owned(),
            elapsed_secs: 30,
            accrued: false,
        }));
    }

    #[test]
    fn test_poll_failure_drops_session() {
        let mut f = fixture_with_spawner(FakeSpawner {
            fail_poll: true,
            ..Default::default()
        });
        f.launch("celeste").unwrap();

        f.clock.advance(30);
        let events = f.tick();

        assert!(
            events
                .iter()
                .any(|e| matches!(e, TrackerEvent::PollFailed { id, .. } if id == "celeste"))
        );
        assert_eq!(f.tracker.state("celeste"), SessionState::Idle);
        assert_eq!(f.playtime("celeste"), 100);
    }

    #[test]
    fn test_command_spawner_missing_executable() {
        let result = CommandSpawner.spawn(Path::new("/definitely/not/a/game.exe"));

        assert!(matches!(result, Err(LaunchError::NotFound(_))));
    }
}
