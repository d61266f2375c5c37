//! The loaded library: every entity in memory, bound to the database.
//!
//! Entities live in [`Registry`] arenas owned by [`Library`]. Once loaded
//! or created, each one carries a binding to the shared [`Persistence`]
//! sink, so plain setter calls write through in the background.
//! Operations that touch more than one row are `async` methods here and in
//! [`crate::integrity`], and are awaited to completion.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use shelf_catalog::{
    BrowserRegistry, Filter, FilterMatch, Game, GameId, Label, LabelId, Tab, TabId, TimelineEvent,
    TimelineEventType,
};
use shelf_core::{Binding, Entity, Timestamp};
use shelf_db::{ErrorReporter, LogReporter, Store, WriteQueue, Writer};

use crate::collaborators::{AssetStore, ImageDir, NoAssets, StaleFlag, StaleNotifier};
use crate::error::LibraryError;
use crate::persistence::Persistence;
use crate::registry::Registry;
use crate::settings::{self, Settings};

/// The services a library reports to.
#[derive(Clone)]
pub struct Collaborators {
    pub assets: Arc<dyn AssetStore>,
    pub stale: Arc<dyn StaleNotifier>,
    pub reporter: Arc<dyn ErrorReporter>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            assets: Arc::new(NoAssets),
            stale: Arc::new(StaleFlag::new()),
            reporter: Arc::new(LogReporter),
        }
    }
}

impl Collaborators {
    /// Images from the configured directory, errors to the log.
    pub fn for_settings(settings: &Settings) -> Self {
        Self {
            assets: Arc::new(ImageDir::new(&settings.images_path)),
            ..Self::default()
        }
    }
}

/// What [`Library::load_all`] found.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    pub games: usize,
    pub labels: usize,
    pub tabs: usize,
    pub events: usize,
    /// Game ids whose timeline events were deleted for lack of a game.
    pub purged_game_ids: Vec<GameId>,
    pub purged_events: usize,
}

pub struct Library {
    pub(crate) settings: Settings,
    /// Where view state such as the displayed tab is saved.
    settings_file: Option<PathBuf>,
    pub(crate) store: Store,
    writer: Writer,
    queue: WriteQueue,
    binding: Binding,
    pub(crate) assets: Arc<dyn AssetStore>,
    pub(crate) stale: Arc<dyn StaleNotifier>,
    pub(crate) games: Registry<Game>,
    pub(crate) labels: Registry<Label>,
    pub(crate) tabs: Registry<Tab>,
    /// Timeline events per game, newest first.
    pub(crate) events: HashMap<GameId, Vec<TimelineEvent>>,
    cookies: BTreeMap<String, String>,
    pub(crate) filters: Vec<Filter>,
    browsers: BrowserRegistry,
}

impl Library {
    /// Open the database named by `settings` and start the writer.
    ///
    /// Nothing is loaded yet; call [`Library::load_all`].
    pub async fn open(settings: Settings) -> Result<Self, LibraryError> {
        if let Some(parent) = settings.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Store::open(&settings.database_path).await?;
        let collaborators = Collaborators::for_settings(&settings);
        Ok(Self::with_store(store, settings, collaborators).with_settings_file(settings::settings_path()))
    }

    /// Build a library over an already open store.
    ///
    /// Spawns the writer task, so this must run inside a tokio runtime.
    /// Settings changes stay in memory until a file is set with
    /// [`Library::with_settings_file`].
    pub fn with_store(store: Store, settings: Settings, collaborators: Collaborators) -> Self {
        let writer = Writer::spawn(
            store.clone(),
            settings.write_queue_capacity,
            collaborators.reporter,
        );
        let queue = writer.queue();
        let sink = Persistence::new(queue.clone(), Arc::clone(&collaborators.stale));
        Self {
            settings,
            settings_file: None,
            store,
            writer,
            queue,
            binding: Binding::new(Arc::new(sink)),
            assets: collaborators.assets,
            stale: collaborators.stale,
            games: Registry::new(),
            labels: Registry::new(),
            tabs: Registry::new(),
            events: HashMap::new(),
            cookies: BTreeMap::new(),
            filters: Vec::new(),
            browsers: BrowserRegistry::default(),
        }
    }

    /// Save settings changes made through the library to `path`.
    pub fn with_settings_file(mut self, path: PathBuf) -> Self {
        self.settings_file = Some(path);
        self
    }

    // ── Loading ─────────────────────────────────────────────────────────────

    /// Replace everything in memory with the database contents.
    ///
    /// Label and tab references that no longer resolve are dropped from the
    /// loaded games, and timeline events of missing games are purged from
    /// the database.
    pub async fn load_all(&mut self) -> Result<LoadReport, LibraryError> {
        self.flush().await?;

        let labels: Vec<Label> = self.store.read_all().await?;
        let tabs: Vec<Tab> = self.store.read_all().await?;
        let games: Vec<Game> = self.store.read_all().await?;
        let events = self.store.all_timeline_events().await?;
        self.cookies = self.store.read_cookies().await?;

        self.labels.clear();
        for mut label in labels {
            label.bind(self.binding.clone());
            self.labels.insert(label.id(), label);
        }
        self.labels.sort_by_key(|label| *label.position());
        self.renumber_labels();
        self.tabs.clear();
        for mut tab in tabs {
            tab.bind(self.binding.clone());
            self.tabs.insert(tab.id(), tab);
        }
        self.tabs.sort_by_key(|tab| *tab.position());
        self.renumber_tabs();

        self.games.clear();
        for mut game in games {
            self.resolve_references(&mut game);
            game.set_image(self.assets.locate(game.id()));
            game.bind(self.binding.clone());
            self.games.insert(game.id(), game);
        }

        self.events.clear();
        let mut attached = 0;
        for event in events {
            if self.games.contains(event.game_id()) {
                self.events.entry(event.game_id()).or_default().push(event);
                attached += 1;
            }
        }

        let (labels, tabs) = (&self.labels, &self.tabs);
        self.filters.retain(|filter| match filter.criteria {
            FilterMatch::Label(id) => labels.contains(id),
            FilterMatch::Tab(id) => tabs.contains(id),
            _ => true,
        });
        if self.settings.display_tab.is_some_and(|tab| !self.tabs.contains(tab)) {
            self.store_display_tab(None);
        }

        let (purged_game_ids, purged_events) = self.purge_orphans().await?;
        let report = LoadReport {
            games: self.games.len(),
            labels: self.labels.len(),
            tabs: self.tabs.len(),
            events: attached,
            purged_game_ids,
            purged_events,
        };
        log::debug!(
            "Loaded {} games, {} labels, {} tabs, {} timeline events",
            report.games,
            report.labels,
            report.tabs,
            report.events
        );
        self.stale.notify_stale();
        Ok(report)
    }

    /// Drop label and tab ids with no registry entry and order labels by
    /// registry position. Runs before the game is bound, so nothing is
    /// written.
    fn resolve_references(&self, game: &mut Game) {
        let mut labels: Vec<LabelId> = game
            .labels()
            .iter()
            .copied()
            .filter(|id| self.labels.contains(*id))
            .collect();
        labels.sort_by_key(|id| self.labels.position(*id));
        labels.dedup();
        if labels != *game.labels() {
            game.set_labels(labels);
        }
        if game.tab().is_some_and(|tab| !self.tabs.contains(tab)) {
            game.set_tab(None);
        }
    }

    // ── Factories ───────────────────────────────────────────────────────────

    /// Add a new game with the given id and name.
    pub async fn add_game(
        &mut self,
        id: GameId,
        name: impl Into<String>,
    ) -> Result<&mut Game, LibraryError> {
        if self.games.contains(id) {
            return Err(LibraryError::IdCollision(id));
        }
        let mut game = Game::new(id);
        game.set_name(name.into());
        game.set_added_on(Timestamp::now());
        self.store.insert(&game).await?;
        game.set_image(self.assets.locate(id));
        game.bind(self.binding.clone());
        self.games.insert(id, game);
        log::debug!("Added game {id}");

        self.create_timeline_event(id, TimelineEventType::GameAdded, Vec::new())
            .await?;
        self.games.get_mut(id).ok_or(LibraryError::UnknownGame(id))
    }

    /// Create a label at the end of the label order. Names must be unique.
    pub async fn create_label(&mut self, name: impl Into<String>) -> Result<LabelId, LibraryError> {
        let name = name.into();
        if self.labels.iter().any(|label| *label.name() == name) {
            return Err(LibraryError::DuplicateLabel(name));
        }
        let id = self.store.insert_default_returning(Label::TABLE).await?;
        let mut label = Label::new(id);
        label.bind(self.binding.clone());
        label.set_name(name);
        label.set_position(self.labels.len() as i64);
        self.labels.insert(id, label);
        Ok(id)
    }

    /// Create a tab at the end of the tab order. Names must be unique.
    pub async fn create_tab(&mut self, name: impl Into<String>) -> Result<TabId, LibraryError> {
        let name = name.into();
        if self.tabs.iter().any(|tab| *tab.name() == name) {
            return Err(LibraryError::DuplicateTab(name));
        }
        let id = self.store.insert_default_returning(Tab::TABLE).await?;
        let mut tab = Tab::new(id);
        tab.bind(self.binding.clone());
        tab.set_name(name);
        tab.set_position(self.tabs.len() as i64);
        self.tabs.insert(id, tab);
        Ok(id)
    }

    /// Record a timeline event for a game, stamped now.
    pub async fn create_timeline_event(
        &mut self,
        game_id: GameId,
        kind: TimelineEventType,
        arguments: Vec<String>,
    ) -> Result<(), LibraryError> {
        if !self.games.contains(game_id) {
            return Err(LibraryError::UnknownGame(game_id));
        }
        let event = TimelineEvent::new(game_id, kind, arguments);
        self.store.insert_timeline_event(&event).await?;
        self.events.entry(game_id).or_default().insert(0, event);
        self.stale.notify_stale();
        Ok(())
    }

    // ── Game references ─────────────────────────────────────────────────────

    /// Attach a label to a game, keeping the game's labels in label order.
    pub fn add_label_to_game(&mut self, game_id: GameId, label_id: LabelId) -> Result<(), LibraryError> {
        if !self.labels.contains(label_id) {
            return Err(LibraryError::UnknownLabel(label_id));
        }
        let game = self
            .games
            .get_mut(game_id)
            .ok_or(LibraryError::UnknownGame(game_id))?;
        game.add_label(label_id, self.labels.ids());
        Ok(())
    }

    pub fn remove_label_from_game(
        &mut self,
        game_id: GameId,
        label_id: LabelId,
    ) -> Result<bool, LibraryError> {
        let game = self
            .games
            .get_mut(game_id)
            .ok_or(LibraryError::UnknownGame(game_id))?;
        Ok(game.remove_label(label_id))
    }

    /// Move a game into a tab, or back to the default view with `None`.
    pub fn set_game_tab(&mut self, game_id: GameId, tab: Option<TabId>) -> Result<(), LibraryError> {
        if let Some(tab) = tab.filter(|tab| !self.tabs.contains(*tab)) {
            return Err(LibraryError::UnknownTab(tab));
        }
        let game = self
            .games
            .get_mut(game_id)
            .ok_or(LibraryError::UnknownGame(game_id))?;
        game.set_tab(tab);
        Ok(())
    }

    /// Add an executable to a game. Returns false if it was already listed.
    ///
    /// Paths under the configured executable directory are stored relative
    /// to it. The first executable for a version marks that version
    /// installed and records a timeline event.
    pub async fn add_executable(&mut self, game_id: GameId, executable: &str) -> Result<bool, LibraryError> {
        let executable = self.normalize_executable(executable);
        let game = self
            .games
            .get_mut(game_id)
            .ok_or(LibraryError::UnknownGame(game_id))?;
        if !game.add_executable(executable) {
            return Ok(false);
        }
        if game.installed() == game.version() {
            return Ok(true);
        }
        let version = game.version().clone();
        game.set_installed(version.clone());
        game.set_updated(false);
        self.create_timeline_event(game_id, TimelineEventType::GameInstalled, vec![version])
            .await?;
        Ok(true)
    }

    fn normalize_executable(&self, executable: &str) -> String {
        if executable.contains("://") {
            return executable.to_string();
        }
        let path = Path::new(executable);
        let path = match &self.settings.default_exe_dir {
            Some(base) => path.strip_prefix(base).unwrap_or(path),
            None => path,
        };
        path.to_string_lossy().replace('\\', "/")
    }

    // ── Cookies, filters, view state ────────────────────────────────────────

    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    /// Replace the whole cookie jar.
    pub async fn update_cookies(&mut self, cookies: BTreeMap<String, String>) -> Result<(), LibraryError> {
        self.store.replace_cookies(cookies.clone()).await?;
        self.cookies = cookies;
        Ok(())
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
        self.stale.notify_stale();
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<Filter> {
        if index >= self.filters.len() {
            return None;
        }
        self.stale.notify_stale();
        Some(self.filters.remove(index))
    }

    pub fn display_tab(&self) -> Option<TabId> {
        self.settings.display_tab
    }

    pub fn set_display_tab(&mut self, tab: Option<TabId>) -> Result<(), LibraryError> {
        if let Some(tab) = tab.filter(|tab| !self.tabs.contains(*tab)) {
            return Err(LibraryError::UnknownTab(tab));
        }
        self.store_display_tab(tab);
        Ok(())
    }

    /// Record the displayed tab in the settings, saving them if a settings
    /// file is set. A failed save is logged; the change stays in memory.
    pub(crate) fn store_display_tab(&mut self, tab: Option<TabId>) {
        if self.settings.display_tab == tab {
            return;
        }
        self.settings.display_tab = tab;
        if let Some(path) = &self.settings_file {
            if let Err(e) = self.settings.save_to(path) {
                log::warn!("Could not save settings to {}: {e}", path.display());
            }
        }
        self.stale.notify_stale();
    }

    // ── Lookup ──────────────────────────────────────────────────────────────

    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.get(id)
    }

    pub fn game_mut(&mut self, id: GameId) -> Option<&mut Game> {
        self.games.get_mut(id)
    }

    /// Games in load order.
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.games.iter()
    }

    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(id)
    }

    pub fn label_mut(&mut self, id: LabelId) -> Option<&mut Label> {
        self.labels.get_mut(id)
    }

    /// Labels in position order.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    pub fn label_by_name(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.name() == name)
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.get_mut(id)
    }

    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    pub fn tab_by_name(&self, name: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.name() == name)
    }

    /// A game's timeline, newest first.
    pub fn timeline(&self, game_id: GameId) -> &[TimelineEvent] {
        self.events.get(&game_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn browsers(&self) -> &BrowserRegistry {
        &self.browsers
    }

    pub fn browsers_mut(&mut self) -> &mut BrowserRegistry {
        &mut self.browsers
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // ── Lifecycle ───────────────────────────────────────────────────────────

    /// Wait until every setter write made so far is in the database.
    pub async fn flush(&self) -> Result<(), LibraryError> {
        self.queue.flush().await?;
        Ok(())
    }

    /// Apply pending writes and stop the writer.
    pub async fn close(self) -> Result<(), LibraryError> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
