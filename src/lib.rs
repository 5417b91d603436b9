//! [![License](https://img.shields.io/badge/License-AGPLv3-green.svg)](https://www.gnu.org/licenses/agpl-3.0)
//!
//! A Rust library for keeping a local library of games, launching them, and tracking how long
//! they are played for.
//!
//! # Description
//!
//! This is a Rust library intended to be used as the core of a games launcher. Games are
//! registered by the path to their executable or shortcut and stored, together with playtime
//! and other details, in a JSON document. Launched games are tracked, and the time spent playing
//! them is added to their record once they exit, or when the launcher closes.
//!
//! Application settings are kept in a second JSON document. Both documents are created or
//! fall back to defaults when missing or unreadable, so opening a library never fails.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lib_game_library::{data::NewGame, open_library};
//!
//! let mut app = open_library();
//! let id = app
//!     .library_mut()
//!     .add(NewGame::new("Celeste", "/games/celeste/Celeste"))
//!     .unwrap();
//!
//! app.launch(&id).unwrap();
//! loop {
//!     // From the application's event loop, about once a second
//!     app.tick();
//!     # break;
//! }
//!
//! // Counts the time of any games still running
//! app.shutdown();
//! ```
//!
//! # Examples
//!
//! - Check the `demos` folder, which can be run with e.g. `cargo run --example 01_basic`

pub mod app;
pub mod data;
pub mod document;
pub mod error;
pub mod format;
pub mod library;
mod macros;
pub mod scan;
pub mod settings;
pub mod tracker;
mod utils;
pub mod version;

use app::{DataPaths, GameLibrary};

/// Primary entry point into the crate - open the library stored in the user's data directory
pub fn open_library() -> GameLibrary {
    GameLibrary::open(&DataPaths::default())
}
