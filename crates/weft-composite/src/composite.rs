//! Composite selection state
//!
//! Tracks which registered item is active. `move_to` is the roving-focus
//! variant of `set_active_id`: it also bumps `moves`, which renderers watch
//! to move DOM focus onto the new active item.

use std::sync::Arc;

use weft_collection::{CollectionItem, CollectionState};

use crate::orientation::{Direction, Orientation};

/// An entry that can take part in composite navigation
pub trait CompositeItem: CollectionItem {
    /// Disabled items are skipped by keyboard navigation
    fn disabled(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
pub struct CompositeState<T> {
    items: CollectionState<T>,
    active_id: Option<String>,
    /// Number of focus moves requested so far
    moves: u64,
    orientation: Orientation,
    /// Wrap from the last item back to the first and vice versa
    focus_loop: bool,
}

impl<T: CompositeItem> CompositeState<T> {
    pub fn new(orientation: Orientation, focus_loop: bool) -> Self {
        Self {
            items: CollectionState::new(),
            active_id: None,
            moves: 0,
            orientation,
            focus_loop,
        }
    }

    pub fn with_active_id(mut self, active_id: Option<String>) -> Self {
        self.active_id = active_id;
        self
    }

    pub fn items(&self) -> &CollectionState<T> {
        &self.items
    }

    pub fn item_list(&self) -> &Arc<Vec<T>> {
        self.items.items()
    }

    pub fn register(&mut self, item: T) -> bool {
        self.items.register(item)
    }

    pub fn unregister(&mut self, id: &str) -> Option<T> {
        self.items.unregister(id)
    }

    pub fn replace_items(&mut self, items: Vec<T>) -> bool {
        self.items.replace_items(items)
    }

    pub fn update_items<F>(&mut self, derive: F) -> bool
    where
        F: FnOnce(&[T]) -> Option<Vec<T>>,
    {
        self.items.update_items(derive)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Change the active item without requesting a focus move.
    /// Returns true if the active id changed.
    pub fn set_active_id(&mut self, id: Option<String>) -> bool {
        if self.active_id == id {
            return false;
        }
        self.active_id = id;
        true
    }

    /// Make `id` active and request focus on it
    pub fn move_to(&mut self, id: Option<String>) {
        tracing::trace!(from = ?self.active_id, to = ?id, "Composite move");
        self.active_id = id;
        self.moves += 1;
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn focus_loop(&self) -> bool {
        self.focus_loop
    }

    /// First enabled item
    pub fn first(&self) -> Option<String> {
        self.items
            .iter()
            .find(|item| !item.disabled())
            .map(|item| item.id().to_string())
    }

    /// Last enabled item
    pub fn last(&self) -> Option<String> {
        self.items
            .iter()
            .rev()
            .find(|item| !item.disabled())
            .map(|item| item.id().to_string())
    }

    /// Enabled item after the active one
    pub fn next(&self) -> Option<String> {
        self.step(true)
    }

    /// Enabled item before the active one
    pub fn previous(&self) -> Option<String> {
        self.step(false)
    }

    /// Item reached by an arrow key, or `None` when the orientation
    /// ignores that direction
    pub fn navigate(&self, direction: Direction) -> Option<String> {
        if !self.orientation.accepts(direction) {
            return None;
        }
        self.step(direction.is_forward())
    }

    fn step(&self, forward: bool) -> Option<String> {
        let items = self.items.items();
        let Some(current) = self.active_id().and_then(|id| self.items.position(id)) else {
            return if forward { self.first() } else { self.last() };
        };

        let len = items.len();
        let candidates: Vec<usize> = if forward {
            let ahead = current + 1..len;
            if self.focus_loop {
                ahead.chain(0..current).collect()
            } else {
                ahead.collect()
            }
        } else {
            let behind = (0..current).rev();
            if self.focus_loop {
                behind.chain((current + 1..len).rev()).collect()
            } else {
                behind.collect()
            }
        };

        candidates
            .into_iter()
            .map(|index| &items[index])
            .find(|item| !item.disabled())
            .map(|item| item.id().to_string())
    }
}
