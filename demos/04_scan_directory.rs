use std::{env, path::PathBuf};

use lib_game_library::{
    open_library,
    scan::{DEFAULT_EXTENSIONS, scan_directory},
};

// NOTE: run with, e.g. `cargo run --example 04_scan_directory -- ~/Games`
fn main() {
    let Some(dir) = env::args().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: 04_scan_directory <games directory>");
        return;
    };

    let games = scan_directory(&dir, DEFAULT_EXTENSIONS);
    if games.is_empty() {
        println!("No executables found in {}", dir.display());
        return;
    }

    let mut app = open_library();
    match app.library_mut().add_all(games) {
        Ok(summary) => println!(
            "Added {} games ({} already in the library)",
            summary.added, summary.skipped
        ),
        Err(e) => eprintln!("Failed to save the library: {e}"),
    }
}
