//! Ordered registry

use std::collections::HashSet;
use std::sync::Arc;

/// An entry that can live in a [`CollectionState`]
pub trait CollectionItem: Clone + PartialEq {
    /// Key, unique within one collection
    fn id(&self) -> &str;
}

/// Ordered collection keyed by [`CollectionItem::id`].
///
/// The item sequence is never edited in place: every change builds a new
/// `Vec` and swaps the `Arc`, so a clone of [`items`](Self::items) taken
/// earlier stays valid and `Arc::ptr_eq` tells whether anything changed.
#[derive(Debug, Clone)]
pub struct CollectionState<T> {
    items: Arc<Vec<T>>,
}

impl<T: CollectionItem> CollectionState<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Vec::new()),
        }
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(dedupe(items)),
        }
    }

    /// Shared handle to the current sequence
    pub fn items(&self) -> &Arc<Vec<T>> {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id().to_string()).collect()
    }

    /// Insert an item, or update the entry with the same id in place.
    /// Returns true if the sequence changed.
    pub fn register(&mut self, item: T) -> bool {
        let mut next = (*self.items).clone();
        match self.position(item.id()) {
            Some(index) => {
                if next[index] == item {
                    return false;
                }
                tracing::debug!(item_id = %item.id(), index, "Updated registered item");
                next[index] = item;
            }
            None => {
                tracing::debug!(item_id = %item.id(), index = next.len(), "Registered item");
                next.push(item);
            }
        }
        self.items = Arc::new(next);
        true
    }

    /// Remove the item with the given id
    pub fn unregister(&mut self, id: &str) -> Option<T> {
        let index = self.position(id)?;
        let mut next = (*self.items).clone();
        let removed = next.remove(index);
        self.items = Arc::new(next);

        tracing::debug!(item_id = %id, index, "Unregistered item");

        Some(removed)
    }

    /// Replace the whole sequence. Later duplicates of an id are dropped.
    /// Returns true if the sequence changed.
    pub fn replace_items(&mut self, items: Vec<T>) -> bool {
        let items = dedupe(items);
        if *self.items == items {
            return false;
        }
        self.items = Arc::new(items);
        true
    }

    /// Derive a new sequence from the current one.
    ///
    /// `derive` returns `None` to leave the sequence (and its identity)
    /// untouched.
    pub fn update_items<F>(&mut self, derive: F) -> bool
    where
        F: FnOnce(&[T]) -> Option<Vec<T>>,
    {
        match derive(&self.items) {
            Some(items) => self.replace_items(items),
            None => false,
        }
    }
}

impl<T: CollectionItem> Default for CollectionState<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn dedupe<T: CollectionItem>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.id().to_string()) {
            unique.push(item);
        } else {
            tracing::warn!(item_id = %item.id(), "Dropped duplicate item id");
        }
    }
    unique
}
