pub(crate) mod config;
pub(crate) mod cookies;
pub(crate) mod games;
pub(crate) mod labels;

use shelf_catalog::{Game, GameId, Label, Tab};
use shelf_lib::Library;

use crate::error::CliError;

pub(crate) fn require_game(library: &Library, id: GameId) -> Result<&Game, CliError> {
    library
        .game(id)
        .ok_or_else(|| CliError::not_found(format!("game {id}")))
}

pub(crate) fn require_label<'a>(library: &'a Library, name: &str) -> Result<&'a Label, CliError> {
    library
        .label_by_name(name)
        .ok_or_else(|| CliError::not_found(format!("label {name:?}")))
}

pub(crate) fn require_tab<'a>(library: &'a Library, name: &str) -> Result<&'a Tab, CliError> {
    library
        .tab_by_name(name)
        .ok_or_else(|| CliError::not_found(format!("tab {name:?}")))
}
