use lib_game_library::{data::SortField, open_library};
use tracing::debug;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    // Init tracing
    tracing_subscriber::fmt::init();

    debug!("Opening library");
    let app = open_library();

    dbg!(app.library().sort_by(SortField::Playtime, true));
    // dbg!(app.library().filter(true, &Default::default()));
    dbg!(app.settings().settings());
}
