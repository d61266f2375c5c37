//! Id-keyed arena with a stable display order.

use std::collections::HashMap;

use shelf_core::RowId;

/// Owns entities by id and remembers the order they are listed in.
///
/// Lookup hands out borrows; nothing outside the registry owns an entity.
/// For labels and tabs the order is the user-visible position.
#[derive(Debug)]
pub struct Registry<T> {
    items: HashMap<RowId, T>,
    order: Vec<RowId>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the end of the order, or replace in place if `id` is taken.
    pub fn insert(&mut self, id: RowId, item: T) -> Option<T> {
        let previous = self.items.insert(id, item);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    pub fn get(&self, id: RowId) -> Option<&T> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: RowId) -> Option<&mut T> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn remove(&mut self, id: RowId) -> Option<T> {
        let item = self.items.remove(&id)?;
        self.order.retain(|o| *o != id);
        Some(item)
    }

    /// Move the entity at `old` to `new`, keeping its place in the order.
    /// Returns false if `old` is missing or `new` is taken.
    pub fn rekey(&mut self, old: RowId, new: RowId) -> bool {
        if self.items.contains_key(&new) {
            return false;
        }
        let Some(item) = self.items.remove(&old) else {
            return false;
        };
        self.items.insert(new, item);
        for id in &mut self.order {
            if *id == old {
                *id = new;
            }
        }
        true
    }

    /// Ids in order.
    pub fn ids(&self) -> &[RowId] {
        &self.order
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.order.iter().position(|o| *o == id)
    }

    /// Entities in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Entities in no particular order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    /// Move `id` to `index` in the order, clamped to the last place.
    /// Returns false if `id` is missing or already there.
    pub fn move_to(&mut self, id: RowId, index: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let to = index.min(self.order.len() - 1);
        if from == to {
            return false;
        }
        self.order.remove(from);
        self.order.insert(to, id);
        true
    }

    /// Reorder with a stable sort on a key of each entity.
    pub fn sort_by_key<K: Ord>(&mut self, mut key: impl FnMut(&T) -> K) {
        let items = &self.items;
        self.order
            .sort_by_cached_key(|id| items.get(id).map(&mut key));
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
