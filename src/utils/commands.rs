use std::{path::Path, process::Command};

use cfg_if::cfg_if;

/// Returns a `std::process::Command` which will start the game at the given path
///
/// The working directory is set to the directory containing the executable, as many games
/// expect to find their data files relative to it.
pub fn get_launch_command(path: &Path) -> Command {
    let mut command = get_platform_command(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        command.current_dir(parent);
    }

    command
}

fn get_platform_command(path: &Path) -> Command {
    cfg_if! {
        if #[cfg(windows)] {
            // Shortcuts can't be executed directly, so hand them to the shell
            if super::has_extension(path, &["lnk", "url"]) {
                let mut command = Command::new("cmd");
                command.args(["/C", "start", ""]).arg(path);
                command
            } else {
                Command::new(path)
            }
        } else if #[cfg(target_os = "macos")] {
            if super::has_extension(path, &["app"]) {
                let mut command = Command::new("open");
                command.arg("-W").arg(path);
                command
            } else {
                Command::new(path)
            }
        } else {
            Command::new(path)
        }
    }
}
