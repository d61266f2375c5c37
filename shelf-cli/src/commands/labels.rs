use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_core::Color;
use shelf_lib::Library;

use super::{require_game, require_label, require_tab};
use crate::cli_types::{LabelAction, TabAction};
use crate::error::CliError;

pub(crate) async fn run_label(library: &mut Library, action: LabelAction) -> Result<(), CliError> {
    match action {
        LabelAction::List => {
            list_labels(library);
            Ok(())
        }
        LabelAction::Add { name, color } => {
            let color = color
                .map(|hex| {
                    Color::from_hex(&hex)
                        .ok_or_else(|| CliError::invalid(format!("not a hex color: {hex}")))
                })
                .transpose()?;
            let id = library.create_label(name.as_str()).await?;
            if let Some(color) = color {
                if let Some(label) = library.label_mut(id) {
                    label.set_color(color);
                }
            }
            log::info!("Created label {}", name.if_supports_color(Stdout, |t| t.bold()));
            Ok(())
        }
        LabelAction::Delete { name } => {
            let id = require_label(library, &name)?.id();
            let games = library.games().filter(|game| game.has_label(id)).count();
            library.delete_label(id).await?;
            log::info!("Deleted label {name} (removed from {games} games)");
            Ok(())
        }
        LabelAction::Attach { id, name } => {
            require_game(library, id)?;
            let label = require_label(library, &name)?.id();
            library.add_label_to_game(id, label)?;
            log::info!("Labelled game {id} {name}");
            Ok(())
        }
        LabelAction::Detach { id, name } => {
            let label = require_label(library, &name)?.id();
            if !library.remove_label_from_game(id, label)? {
                log::warn!("Game {id} was not labelled {name}");
            }
            Ok(())
        }
        LabelAction::Reorder { name, index } => {
            let id = require_label(library, &name)?.id();
            if library.move_label(id, index)? {
                log::info!("Moved label {name}");
            }
            list_labels(library);
            Ok(())
        }
    }
}

fn list_labels(library: &Library) {
    let mut any = false;
    for label in library.labels() {
        let count = library.games().filter(|game| game.has_label(label.id())).count();
        log::info!(
            "  {:<4} {} {} ({} games)",
            label.short_name().if_supports_color(Stdout, |t| t.bold()),
            label.name(),
            label.color().to_hex().if_supports_color(Stdout, |t| t.dimmed()),
            count,
        );
        any = true;
    }
    if !any {
        log::info!("{}", "No labels.".if_supports_color(Stdout, |t| t.dimmed()));
    }
}

pub(crate) async fn run_tab(library: &mut Library, action: TabAction) -> Result<(), CliError> {
    match action {
        TabAction::List => {
            list_tabs(library);
            Ok(())
        }
        TabAction::Add { name, icon } => {
            let id = library.create_tab(name.as_str()).await?;
            if let Some(icon) = icon {
                if let Some(tab) = library.tab_mut(id) {
                    tab.set_icon(icon);
                }
            }
            log::info!("Created tab {}", name.if_supports_color(Stdout, |t| t.bold()));
            Ok(())
        }
        TabAction::Delete { name } => {
            let id = require_tab(library, &name)?.id();
            library.delete_tab(id).await?;
            log::info!("Deleted tab {name}");
            Ok(())
        }
        TabAction::Move { id, name } => {
            let tab = name
                .as_deref()
                .map(|name| require_tab(library, name).map(|tab| tab.id()))
                .transpose()?;
            require_game(library, id)?;
            library.set_game_tab(id, tab)?;
            match name {
                Some(name) => log::info!("Moved game {id} to {name}"),
                None => log::info!("Moved game {id} to the main view"),
            }
            Ok(())
        }
        TabAction::Reorder { name, index } => {
            let id = require_tab(library, &name)?.id();
            if library.move_tab(id, index)? {
                log::info!("Moved tab {name}");
            }
            list_tabs(library);
            Ok(())
        }
    }
}

fn list_tabs(library: &Library) {
    let untabbed = library.games().filter(|game| game.tab().is_none()).count();
    log::info!(
        "  {} ({} games)",
        "Main".if_supports_color(Stdout, |t| t.bold()),
        untabbed
    );
    for tab in library.tabs() {
        let count = library
            .games()
            .filter(|game| *game.tab() == Some(tab.id()))
            .count();
        let icon = if tab.icon().is_empty() {
            String::new()
        } else {
            format!("{} ", tab.icon())
        };
        log::info!("  {}{} ({} games)", icon, tab.name(), count);
    }
}
