//! Library data model: games, labels, tabs, timeline events and browsers.
//!
//! This crate defines the persisted entities and their column layouts without
//! any database dependencies. Setters report changes through the
//! `shelf_core::Binding` each entity carries; `shelf-lib` wires that binding
//! to the database writer.

#[macro_use]
mod macros;

pub mod browser;
pub mod filter;
pub mod game;
pub mod label;
pub mod timeline;
pub mod types;

pub use browser::{Browser, BrowserRegistry, CUSTOM_HASH, INTEGRATED_HASH};
pub use filter::{Filter, FilterMatch};
pub use game::{Game, GameField, GameId, LabelId, TabId};
pub use label::{DEFAULT_LABEL_COLOR, Label, LabelField, Tab, TabField};
pub use timeline::TimelineEvent;
pub use types::*;
