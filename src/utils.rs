mod commands;
mod paths;
mod strings;
mod time;

pub use commands::*;
pub use paths::*;
pub use strings::*;
pub use time::*;
