//! Human-readable renderings of playtime and play dates, for display next to games.

use chrono::{DateTime, Datelike, Local, TimeZone};

/// Formats a number of seconds as e.g. `< 1min`, `45min`, `3h` or `3h 20m`
pub fn format_playtime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    match (hours, minutes) {
        (0, 0) => "< 1min".to_owned(),
        (0, minutes) => format!("{minutes}min"),
        (hours, 0) => format!("{hours}h"),
        (hours, minutes) => format!("{hours}h {minutes}m"),
    }
}

/// Formats a last played timestamp relative to `now`, in local time
///
/// Gives `Never` for `0`, `Today at HH:MM`, `Yesterday at HH:MM`, `DD/MM at HH:MM` within the
/// current year, and `DD/MM/YYYY` otherwise.
pub fn format_last_played(timestamp: i64, now: DateTime<Local>) -> String {
    if timestamp == 0 {
        return "Never".to_owned();
    }
    let Some(played) = Local.timestamp_opt(timestamp, 0).earliest() else {
        return "Never".to_owned();
    };

    let played_date = played.date_naive();
    let today = now.date_naive();

    if played_date == today {
        format!("Today at {}", played.format("%H:%M"))
    } else if today.pred_opt() == Some(played_date) {
        format!("Yesterday at {}", played.format("%H:%M"))
    } else if played.year() == now.year() {
        played.format("%d/%m at %H:%M").to_string()
    } else {
        played.format("%d/%m/%Y").to_string()
    }
}
