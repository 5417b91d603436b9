use std::{env, path::PathBuf};

use lib_game_library::open_library;

fn main() {
    let path = env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("library_export.json"), PathBuf::from);

    let app = open_library();
    match app.library().export_all(&path) {
        Ok(()) => println!(
            "Exported {} games to {}",
            app.library().len(),
            path.display()
        ),
        Err(e) => eprintln!("Failed to export library: {e}"),
    }
}
