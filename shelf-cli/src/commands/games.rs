use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_catalog::{Game, GameId, Status, TimelineEventType};
use shelf_core::Timestamp;
use shelf_lib::Library;

use super::{require_game, require_label, require_tab};
use crate::error::CliError;

/// List games, optionally only those with a label or in a tab.
pub(crate) fn run_list(library: &Library, label: Option<&str>, tab: Option<&str>) -> Result<(), CliError> {
    let label = label.map(|name| require_label(library, name)).transpose()?;
    let tab = tab.map(|name| require_tab(library, name)).transpose()?;

    let mut shown = 0;
    for game in library.games() {
        if label.is_some_and(|label| !game.has_label(label.id())) {
            continue;
        }
        if tab.is_some_and(|tab| *game.tab() != Some(tab.id())) {
            continue;
        }
        log::info!("{}", summary_line(library, game));
        shown += 1;
    }

    if shown == 0 {
        log::info!("{}", "No games.".if_supports_color(Stdout, |t| t.dimmed()));
    } else {
        log::info!("");
        log::info!("{shown} games");
    }
    Ok(())
}

fn summary_line(library: &Library, game: &Game) -> String {
    let labels: Vec<String> = game
        .labels()
        .iter()
        .filter_map(|id| library.label(*id))
        .map(|label| label.short_name())
        .collect();
    format!(
        "  {:>8}  {} {} [{}]{}",
        game.id().if_supports_color(Stdout, |t| t.dimmed()),
        game.name().if_supports_color(Stdout, |t| t.bold()),
        game.version().if_supports_color(Stdout, |t| t.cyan()),
        game.status(),
        if labels.is_empty() {
            String::new()
        } else {
            format!(" {}", labels.join(" ").if_supports_color(Stdout, |t| t.yellow()))
        },
    )
}

/// Print every detail of one game, then its timeline.
pub(crate) fn run_show(library: &Library, id: GameId) -> Result<(), CliError> {
    let game = require_game(library, id)?;
    let settings = library.settings();

    log::info!(
        "{} {}",
        game.name().if_supports_color(Stdout, |t| t.bold()),
        format!("#{}", game.id()).if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("  Version:    {}", game.version());
    if !game.installed().is_empty() {
        let marker = if game.is_installed_current() {
            "(current)".if_supports_color(Stdout, |t| t.green()).to_string()
        } else {
            "(outdated)".if_supports_color(Stdout, |t| t.yellow()).to_string()
        };
        log::info!("  Installed:  {} {}", game.installed(), marker);
    }
    if !game.developer().is_empty() {
        log::info!("  Developer:  {}", game.developer());
    }
    log::info!("  Type:       {}", game.kind());
    log::info!("  Status:     {}", game.status());
    if *game.rating() > 0 {
        log::info!("  Rating:     {}/5", game.rating());
    }
    log::info!(
        "  Added:      {}",
        game.added_on().display(&settings.datestamp_format)
    );
    if game.last_launched().is_set() {
        log::info!(
            "  Launched:   {}",
            game.last_launched().display(&settings.timestamp_format)
        );
    }

    let labels: Vec<&str> = game
        .labels()
        .iter()
        .filter_map(|id| library.label(*id))
        .map(|label| label.name().as_str())
        .collect();
    if !labels.is_empty() {
        log::info!("  Labels:     {}", labels.join(", "));
    }
    if let Some(tab) = game.tab().and_then(|id| library.tab(id)) {
        log::info!("  Tab:        {}", tab.name());
    }
    for exe in game.executables() {
        log::info!("  Executable: {exe}");
    }
    if let Some(image) = game.image() {
        log::info!("  Image:      {}", image.display());
    }
    if !game.notes().is_empty() {
        log::info!("  Notes:      {}", game.notes());
    }

    let timeline = library.timeline(id);
    if !timeline.is_empty() {
        log::info!("");
        log::info!("{}", "Timeline".if_supports_color(Stdout, |t| t.bold()));
        for event in timeline {
            log::info!(
                "  {}  {}",
                event
                    .timestamp()
                    .display(&settings.timestamp_format)
                    .if_supports_color(Stdout, |t| t.dimmed()),
                event.message(),
            );
        }
    }
    Ok(())
}

pub(crate) async fn run_add(
    library: &mut Library,
    id: GameId,
    name: String,
    version: Option<String>,
    developer: Option<String>,
) -> Result<(), CliError> {
    let game = library.add_game(id, name).await?;
    if let Some(version) = version {
        game.set_version(version);
    }
    if let Some(developer) = developer {
        game.set_developer(developer);
    }
    log::info!(
        "{} Added {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        game.name().if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}

pub(crate) fn run_rename(library: &mut Library, id: GameId, name: String) -> Result<(), CliError> {
    let game = game_mut(library, id)?;
    let old = game.name().clone();
    game.set_name(name);
    log::info!("Renamed {} to {}", old, game.name().if_supports_color(Stdout, |t| t.bold()));
    Ok(())
}

pub(crate) fn run_status(library: &mut Library, id: GameId, status: Status) -> Result<(), CliError> {
    let game = game_mut(library, id)?;
    game.set_status(status);
    log::info!("{} is now {}", game.name(), status);
    Ok(())
}

pub(crate) async fn run_renumber(library: &mut Library, old: GameId, new: GameId) -> Result<(), CliError> {
    require_game(library, old)?;
    library.renumber_game(old, new).await?;
    log::info!(
        "{} Game {} is now {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        old,
        new.if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}

pub(crate) async fn run_delete(library: &mut Library, id: GameId) -> Result<(), CliError> {
    let name = require_game(library, id)?.name().clone();
    library.delete_game(id).await?;
    log::info!("Deleted {}", name.if_supports_color(Stdout, |t| t.bold()));
    Ok(())
}

/// Stamp the launch time and record it in the timeline.
pub(crate) async fn run_launch(library: &mut Library, id: GameId) -> Result<(), CliError> {
    let game = game_mut(library, id)?;
    game.set_last_launched(Timestamp::now());
    let version = game.version().clone();
    library
        .create_timeline_event(id, TimelineEventType::GameLaunched, vec![version])
        .await?;
    log::info!("Launched {}", require_game(library, id)?.name());
    Ok(())
}

pub(crate) async fn run_exe(library: &mut Library, id: GameId, path: &str) -> Result<(), CliError> {
    require_game(library, id)?;
    if library.add_executable(id, path).await? {
        log::info!("Added executable {path}");
    } else {
        log::warn!("{path} is already listed");
    }
    Ok(())
}

fn game_mut(library: &mut Library, id: GameId) -> Result<&mut Game, CliError> {
    library
        .game_mut(id)
        .ok_or_else(|| CliError::not_found(format!("game {id}")))
}
