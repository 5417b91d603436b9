use lib_game_library::open_library;
use tracing::debug;

fn main() {
    // Init tracing
    tracing_subscriber::fmt::init();

    debug!("Opening library");
    let app = open_library();

    dbg!(app.library().load_outcome());
    dbg!(app.library().games());
    dbg!(app.settings().settings());
    dbg!(app.library().all_tags());
}
