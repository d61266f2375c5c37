//! Operations that keep references between entities consistent.
//!
//! A game id is the only foreign key: timeline events and image files follow
//! it. Labels and tabs are referenced by id from games, saved filters and
//! the displayed tab.

use shelf_catalog::{Game, GameId, Label, LabelId, Tab, TabId};
use shelf_core::Entity;

use crate::error::LibraryError;
use crate::library::Library;
use crate::registry::Registry;

/// Rewrite positions to 0..n in registry order. Only changed positions go
/// through the setter, so a compact order writes nothing.
fn compact_positions<T>(
    registry: &mut Registry<T>,
    position: impl Fn(&T) -> i64,
    set_position: impl Fn(&mut T, i64),
) {
    let order = registry.ids().to_vec();
    for (index, id) in order.into_iter().enumerate() {
        let index = index as i64;
        if let Some(item) = registry.get_mut(id) {
            if position(item) != index {
                set_position(item, index);
            }
        }
    }
}

impl Library {
    /// Give a game a new id, moving its timeline events and images with it.
    ///
    /// Fails with [`LibraryError::IdCollision`] before changing anything if
    /// `new_id` is taken. The database side is one transaction. Images are
    /// moved afterwards; failing to move them is logged, not returned.
    pub async fn renumber_game(&mut self, old_id: GameId, new_id: GameId) -> Result<(), LibraryError> {
        if old_id == new_id {
            return Ok(());
        }
        if !self.games.contains(old_id) {
            return Err(LibraryError::UnknownGame(old_id));
        }
        if self.games.contains(new_id) {
            return Err(LibraryError::IdCollision(new_id));
        }

        // Queued writes still address the old id.
        self.flush().await?;
        self.store.renumber_game(old_id, new_id).await?;

        if let Some(mut events) = self.events.remove(&old_id) {
            for event in &mut events {
                event.reassign_game(new_id);
            }
            self.events.insert(new_id, events);
        }

        if let Err(e) = self.assets.relocate(old_id, new_id) {
            log::warn!("Could not move images of game {old_id} to {new_id}: {e}");
        }

        self.games.rekey(old_id, new_id);
        if let Some(game) = self.games.get_mut(new_id) {
            game.reassign_id(new_id);
            game.set_image(self.assets.locate(new_id));
        }
        log::info!("Renumbered game {old_id} to {new_id}");
        self.stale.notify_stale();
        Ok(())
    }

    /// Delete a label and every reference to it.
    ///
    /// Returns `Ok(false)` if there is no such label.
    pub async fn delete_label(&mut self, id: LabelId) -> Result<bool, LibraryError> {
        if !self.labels.contains(id) {
            return Ok(false);
        }
        self.flush().await?;
        self.store.delete(Label::TABLE.name, id).await?;

        for game in self.games.values_mut() {
            game.remove_label(id);
        }
        self.filters.retain(|filter| !filter.names_label(id));
        self.labels.remove(id);
        self.renumber_labels();
        log::debug!("Deleted label {id}");
        self.stale.notify_stale();
        Ok(true)
    }

    /// Delete a tab, moving its games back to the default view.
    ///
    /// Returns `Ok(false)` if there is no such tab.
    pub async fn delete_tab(&mut self, id: TabId) -> Result<bool, LibraryError> {
        if !self.tabs.contains(id) {
            return Ok(false);
        }
        self.flush().await?;
        self.store.delete(Tab::TABLE.name, id).await?;

        for game in self.games.values_mut() {
            if *game.tab() == Some(id) {
                game.set_tab(None);
            }
        }
        self.filters.retain(|filter| !filter.names_tab(id));
        if self.display_tab() == Some(id) {
            self.store_display_tab(None);
        }
        self.tabs.remove(id);
        self.renumber_tabs();
        log::debug!("Deleted tab {id}");
        self.stale.notify_stale();
        Ok(true)
    }

    /// Move a label to `index` in the label order, clamped to the last
    /// place. Positions are rewritten and every game's labels re-sorted.
    ///
    /// Returns `Ok(false)` if the label was already there.
    pub fn move_label(&mut self, id: LabelId, index: usize) -> Result<bool, LibraryError> {
        if !self.labels.contains(id) {
            return Err(LibraryError::UnknownLabel(id));
        }
        if !self.labels.move_to(id, index) {
            return Ok(false);
        }
        self.renumber_labels();

        let order = self.labels.ids().to_vec();
        for game in self.games.values_mut() {
            let mut labels = game.labels().clone();
            labels.sort_by_key(|label| order.iter().position(|o| o == label));
            if labels != *game.labels() {
                game.set_labels(labels);
            }
        }
        log::debug!("Moved label {id} to position {index}");
        self.stale.notify_stale();
        Ok(true)
    }

    /// Move a tab to `index` in the tab order, clamped to the last place.
    ///
    /// Returns `Ok(false)` if the tab was already there.
    pub fn move_tab(&mut self, id: TabId, index: usize) -> Result<bool, LibraryError> {
        if !self.tabs.contains(id) {
            return Err(LibraryError::UnknownTab(id));
        }
        if !self.tabs.move_to(id, index) {
            return Ok(false);
        }
        self.renumber_tabs();
        self.stale.notify_stale();
        Ok(true)
    }

    pub(crate) fn renumber_labels(&mut self) {
        compact_positions(&mut self.labels, |label| *label.position(), Label::set_position);
    }

    pub(crate) fn renumber_tabs(&mut self) {
        compact_positions(&mut self.tabs, |tab| *tab.position(), Tab::set_position);
    }

    /// Delete a game with its timeline events and images.
    ///
    /// Returns `Ok(false)` if there is no such game.
    pub async fn delete_game(&mut self, id: GameId) -> Result<bool, LibraryError> {
        if !self.games.contains(id) {
            return Ok(false);
        }
        self.flush().await?;
        self.store.delete(Game::TABLE.name, id).await?;
        self.store.delete_timeline_events(id).await?;
        self.events.remove(&id);
        if let Err(e) = self.assets.remove(id) {
            log::warn!("Could not delete images of game {id}: {e}");
        }
        self.games.remove(id);
        log::debug!("Deleted game {id}");
        self.stale.notify_stale();
        Ok(true)
    }

    /// Delete stored timeline events whose game does not exist, one DELETE
    /// per missing game id. Returns the ids and the number of rows removed.
    pub async fn purge_orphans(&mut self) -> Result<(Vec<GameId>, usize), LibraryError> {
        let orphans = self.store.orphaned_event_game_ids().await?;
        let mut purged = 0;
        for &game_id in &orphans {
            purged += self.store.delete_timeline_events(game_id).await?;
            self.events.remove(&game_id);
        }
        if !orphans.is_empty() {
            log::info!(
                "Purged {purged} timeline events of {} missing games",
                orphans.len()
            );
        }
        Ok((orphans, purged))
    }
}
