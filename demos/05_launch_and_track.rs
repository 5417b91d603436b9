use std::{env, thread, time::Duration};

use lib_game_library::{
    data::NewGame, error::LibraryError, open_library, tracker::TrackerEvent,
};

// NOTE: run with, e.g. `RUST_LOG=debug cargo run --example 05_launch_and_track -- /usr/bin/xclock`
fn main() {
    tracing_subscriber::fmt::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("Usage: 05_launch_and_track <path to executable>");
        return;
    };

    let mut app = open_library();
    let id = match app.library_mut().add(NewGame::new(&path, &path)) {
        Ok(id) => id,
        Err(LibraryError::DuplicatePath(_)) => match app.library().find_by_path(&path) {
            Some(game) => game.id.clone(),
            None => return,
        },
        Err(e) => {
            eprintln!("Failed to add game: {e}");
            return;
        }
    };

    if let Err(e) = app.launch(&id) {
        eprintln!("Failed to launch game: {e}");
        return;
    }

    // Stand-in for an application's event loop
    while app.tracker().has_active_sessions() {
        thread::sleep(Duration::from_secs(1));
        for event in app.tick() {
            if let TrackerEvent::Settled {
                elapsed_secs,
                accrued,
                ..
            } = event
            {
                println!("Played for {elapsed_secs}s (counted: {accrued})");
            }
        }
    }

    app.shutdown();
}
