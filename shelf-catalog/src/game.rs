//! The `Game` record and its write-through setters.

use std::path::{Path, PathBuf};

use shelf_core::{Binding, Timestamp, TypeDescriptor};

use crate::types::{DOWNLOAD, GAME_TYPE, REVIEW, STATUS, TAG};
use crate::types::{Download, GameType, Review, Status, Tag};

pub type GameId = i64;
pub type LabelId = i64;
pub type TabId = i64;

const TEXT_LIST: TypeDescriptor = TypeDescriptor::Sequence(&TypeDescriptor::Text);
const INT_LIST: TypeDescriptor = TypeDescriptor::Sequence(&TypeDescriptor::Int);
const TAG_ITEM: TypeDescriptor = TypeDescriptor::Enum(&TAG);
const TAG_LIST: TypeDescriptor = TypeDescriptor::Sequence(&TAG_ITEM);
const DOWNLOAD_LIST: TypeDescriptor = TypeDescriptor::Sequence(&DOWNLOAD);
const REVIEW_LIST: TypeDescriptor = TypeDescriptor::Sequence(&REVIEW);
const OPTIONAL_ID: TypeDescriptor = TypeDescriptor::Optional(&TypeDescriptor::Int);

/// A tracked game.
///
/// Persisted fields are read through getters and written through `set_*`
/// setters; every setter call on a bound game schedules a single-column
/// UPDATE. `selected` and `image` are view state and never stored.
#[derive(Debug)]
pub struct Game {
    id: GameId,
    data: GameData,
    binding: Binding,
    pub selected: bool,
    image: Option<PathBuf>,
}

persisted_fields! {
    Game / GameData / GameField {
        table: "games",
        id: "INTEGER PRIMARY KEY",
        Custom: custom / set_custom: bool = false
            => "custom", TypeDescriptor::Bool, "INTEGER DEFAULT NULL";
        Name: name / set_name: String = String::new()
            => "name", TypeDescriptor::Text, "TEXT DEFAULT ''";
        Version: version / set_version: String = "Unchecked".to_string()
            => "version", TypeDescriptor::Text, "TEXT DEFAULT 'Unchecked'";
        Developer: developer / set_developer: String = String::new()
            => "developer", TypeDescriptor::Text, "TEXT DEFAULT ''";
        Type: kind / set_kind: GameType = GameType::Unchecked
            => "type", TypeDescriptor::Enum(&GAME_TYPE), "INTEGER DEFAULT 23";
        Status: status / set_status: Status = Status::Unchecked
            => "status", TypeDescriptor::Enum(&STATUS), "INTEGER DEFAULT 5";
        Url: url / set_url: String = String::new()
            => "url", TypeDescriptor::Text, "TEXT DEFAULT ''";
        AddedOn: added_on / set_added_on: Timestamp = Timestamp::default()
            => "added_on", TypeDescriptor::Timestamp, "INTEGER DEFAULT 0";
        LastUpdated: last_updated / set_last_updated: Timestamp = Timestamp::default()
            => "last_updated", TypeDescriptor::Timestamp, "INTEGER DEFAULT 0";
        LastFullCheck: last_full_check / set_last_full_check: Timestamp = Timestamp::default()
            => "last_full_check", TypeDescriptor::Timestamp, "INTEGER DEFAULT 0";
        LastCheckVersion: last_check_version / set_last_check_version: String = String::new()
            => "last_check_version", TypeDescriptor::Text, "TEXT DEFAULT ''";
        LastLaunched: last_launched / set_last_launched: Timestamp = Timestamp::default()
            => "last_launched", TypeDescriptor::Timestamp, "INTEGER DEFAULT 0";
        Score: score / set_score: f64 = 0.0
            => "score", TypeDescriptor::Real, "REAL DEFAULT 0";
        Votes: votes / set_votes: i64 = 0
            => "votes", TypeDescriptor::Int, "INTEGER DEFAULT 0";
        Rating: rating / set_rating: i64 = 0
            => "rating", TypeDescriptor::Int, "INTEGER DEFAULT 0";
        Finished: finished / set_finished: String = String::new()
            => "finished", TypeDescriptor::Text, "TEXT DEFAULT ''";
        Installed: installed / set_installed: String = String::new()
            => "installed", TypeDescriptor::Text, "TEXT DEFAULT ''";
        Updated: updated / set_updated: bool = false
            => "updated", TypeDescriptor::Bool, "INTEGER DEFAULT NULL";
        Archived: archived / set_archived: bool = false
            => "archived", TypeDescriptor::Bool, "INTEGER DEFAULT 0";
        Executables: executables / set_executables: Vec<String> = Vec::new()
            => "executables", TEXT_LIST, "TEXT DEFAULT '[]'";
        Description: description / set_description: String = String::new()
            => "description", TypeDescriptor::Text, "TEXT DEFAULT ''";
        Changelog: changelog / set_changelog: String = String::new()
            => "changelog", TypeDescriptor::Text, "TEXT DEFAULT ''";
        Tags: tags / set_tags: Vec<Tag> = Vec::new()
            => "tags", TAG_LIST, "TEXT DEFAULT '[]'";
        UnknownTags: unknown_tags / set_unknown_tags: Vec<String> = Vec::new()
            => "unknown_tags", TEXT_LIST, "TEXT DEFAULT '[]'";
        UnknownTagsFlag: unknown_tags_flag / set_unknown_tags_flag: bool = false
            => "unknown_tags_flag", TypeDescriptor::Bool, "INTEGER DEFAULT 0";
        Labels: labels / set_labels: Vec<LabelId> = Vec::new()
            => "labels", INT_LIST, "TEXT DEFAULT '[]'";
        Tab: tab / set_tab: Option<TabId> = None
            => "tab", OPTIONAL_ID, "INTEGER DEFAULT NULL";
        Notes: notes / set_notes: String = String::new()
            => "notes", TypeDescriptor::Text, "TEXT DEFAULT ''";
        ImageUrl: image_url / set_image_url: String = String::new()
            => "image_url", TypeDescriptor::Text, "TEXT DEFAULT ''";
        PreviewsUrls: previews_urls / set_previews_urls: Vec<String> = Vec::new()
            => "previews_urls", TEXT_LIST, "TEXT DEFAULT '[]'";
        Downloads: downloads / set_downloads: Vec<Download> = Vec::new()
            => "downloads", DOWNLOAD_LIST, "TEXT DEFAULT '[]'";
        ReviewsTotal: reviews_total / set_reviews_total: i64 = 0
            => "reviews_total", TypeDescriptor::Int, "INTEGER DEFAULT 0";
        Reviews: reviews / set_reviews: Vec<Review> = Vec::new()
            => "reviews", REVIEW_LIST, "TEXT DEFAULT '[]'";
    }
}

impl Game {
    /// A new, unbound game with every field at its column default.
    pub fn new(id: GameId) -> Self {
        Self::from_parts(id, GameData::default())
    }

    fn from_parts(id: GameId, data: GameData) -> Self {
        Self {
            id,
            data,
            binding: Binding::unbound(),
            selected: false,
            image: None,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    /// Change the in-memory id after the stored row has been renumbered.
    ///
    /// Nothing is written; the caller has already moved the row.
    pub fn reassign_id(&mut self, id: GameId) {
        self.id = id;
    }

    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    pub fn set_image(&mut self, image: Option<PathBuf>) {
        self.image = image;
    }

    // ── Labels ──────────────────────────────────────────────────────────────

    pub fn has_label(&self, label: LabelId) -> bool {
        self.data.labels.contains(&label)
    }

    /// Add a label, keeping the list sorted by `order` (label ids in registry
    /// order). Labels missing from `order` sort last.
    pub fn add_label(&mut self, label: LabelId, order: &[LabelId]) {
        if !self.data.labels.contains(&label) {
            self.data.labels.push(label);
        }
        let position = |id: &LabelId| order.iter().position(|o| o == id).unwrap_or(usize::MAX);
        self.data.labels.sort_by_key(position);
        self.persist(GameField::Labels);
    }

    /// Remove every occurrence of `label`. Returns whether any was present.
    pub fn remove_label(&mut self, label: LabelId) -> bool {
        let before = self.data.labels.len();
        self.data.labels.retain(|l| *l != label);
        let removed = self.data.labels.len() != before;
        if removed {
            self.persist(GameField::Labels);
        }
        removed
    }

    // ── Executables ─────────────────────────────────────────────────────────

    /// Returns false if the executable was already listed.
    pub fn add_executable(&mut self, executable: impl Into<String>) -> bool {
        let executable = executable.into();
        if self.data.executables.contains(&executable) {
            return false;
        }
        self.data.executables.push(executable);
        self.persist(GameField::Executables);
        true
    }

    pub fn remove_executable(&mut self, executable: &str) -> bool {
        let Some(index) = self.data.executables.iter().position(|e| e == executable) else {
            return false;
        };
        self.data.executables.remove(index);
        self.persist(GameField::Executables);
        true
    }

    pub fn clear_executables(&mut self) {
        self.data.executables.clear();
        self.persist(GameField::Executables);
    }

    /// True once the installed version matches the current version.
    pub fn is_installed_current(&self) -> bool {
        !self.data.installed.is_empty() && self.data.installed == self.data.version
    }
}
