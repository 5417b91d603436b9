use lib_game_library::{
    format::{format_last_played, format_playtime},
    open_library,
};

fn main() {
    let app = open_library();
    let games = app.visible_games("");

    if games.is_empty() {
        println!("The library is empty.");
        return;
    }

    let now = chrono::Local::now();
    println!("Games ({}):", games.len());
    for game in games {
        println!(
            "\t- {} [{}] last played: {}",
            game.name,
            format_playtime(game.playtime),
            format_last_played(game.last_played, now)
        );
    }
    println!(
        "Total playtime: {}",
        format_playtime(app.library().total_playtime())
    );
}
