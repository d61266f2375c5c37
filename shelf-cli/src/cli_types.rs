//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shelf_catalog::Status;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Keep track of a personal game library", long_about = None)]
pub(crate) struct Cli {
    /// Library database (defaults to the one in settings.toml)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List games in the library
    List {
        /// Only games carrying this label
        #[arg(long)]
        label: Option<String>,

        /// Only games in this tab
        #[arg(long)]
        tab: Option<String>,
    },

    /// Show one game and its timeline
    Show { id: i64 },

    /// Add a game
    Add {
        id: i64,
        name: String,

        #[arg(long)]
        version: Option<String>,

        #[arg(long)]
        developer: Option<String>,
    },

    /// Change a game's name
    Rename { id: i64, name: String },

    /// Change a game's status (e.g. completed, onhold)
    Status { id: i64, status: Status },

    /// Give a game a new id, moving its history and images
    Renumber { old: i64, new: i64 },

    /// Delete a game with its history and images
    Delete { id: i64 },

    /// Record that a game was launched
    Launch { id: i64 },

    /// Add an executable to a game
    Exe { id: i64, path: String },

    /// Manage labels
    Label {
        #[command(subcommand)]
        action: LabelAction,
    },

    /// Manage tabs
    Tab {
        #[command(subcommand)]
        action: TabAction,
    },

    /// Show or replace stored cookies
    Cookies {
        #[command(subcommand)]
        action: CookieAction,
    },

    /// Show settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum LabelAction {
    /// List labels in order
    List,

    /// Create a label
    Add {
        name: String,

        /// Hex color, e.g. #1AB0F2
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a label and remove it from every game
    Delete { name: String },

    /// Put a label on a game
    Attach { id: i64, name: String },

    /// Take a label off a game
    Detach { id: i64, name: String },

    /// Move a label to a place in the label order (0 is first)
    Reorder { name: String, index: usize },
}

#[derive(Subcommand)]
pub(crate) enum TabAction {
    /// List tabs in order
    List,

    /// Create a tab
    Add {
        name: String,

        #[arg(long)]
        icon: Option<String>,
    },

    /// Delete a tab, moving its games back to the main view
    Delete { name: String },

    /// Move a game into a tab (omit the tab to move it back)
    Move { id: i64, name: Option<String> },

    /// Move a tab to a place in the tab order (0 is first)
    Reorder { name: String, index: usize },
}

#[derive(Subcommand)]
pub(crate) enum CookieAction {
    /// List stored cookies
    List,

    /// Replace all cookies with the given key=value pairs
    Set {
        #[arg(value_parser = parse_key_value)]
        pairs: Vec<(String, String)>,
    },

    /// Remove all cookies
    Clear,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings
    Show,

    /// Print the settings file path
    Path,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {s:?}"))?;
    Ok((key.to_string(), value.to_string()))
}
