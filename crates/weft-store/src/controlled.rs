//! Controlled value cell
//!
//! A widget value is either owned by the widget state, seeded with a
//! default, or delegated to the caller, who supplies a getter and a setter.
//! The choice is made once at construction.

use std::fmt;
use std::sync::Arc;

type Getter<T> = Arc<dyn Fn() -> T + Send + Sync>;
type Setter<T> = Arc<dyn Fn(T) + Send + Sync>;

pub enum ControlledState<T> {
    /// Value held by the widget state itself
    Owned(T),
    /// Value held by the caller; writes are forwarded, reads always go to `get`
    Delegated { get: Getter<T>, set: Setter<T> },
}

impl<T: Clone> ControlledState<T> {
    pub fn owned(default: T) -> Self {
        Self::Owned(default)
    }

    pub fn delegated<G, S>(get: G, set: S) -> Self
    where
        G: Fn() -> T + Send + Sync + 'static,
        S: Fn(T) + Send + Sync + 'static,
    {
        Self::Delegated {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    /// Current value. For a delegated cell this is whatever the caller holds.
    pub fn get(&self) -> T {
        match self {
            Self::Owned(value) => value.clone(),
            Self::Delegated { get, .. } => get(),
        }
    }

    pub fn set(&mut self, value: T) {
        match self {
            Self::Owned(current) => *current = value,
            Self::Delegated { set, .. } => set(value),
        }
    }

    /// Derive the next value from the current one
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.get());
        self.set(next);
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::Delegated { .. })
    }
}

impl<T: Clone + Default> Default for ControlledState<T> {
    fn default() -> Self {
        Self::Owned(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for ControlledState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned(value) => f.debug_tuple("Owned").field(value).finish(),
            Self::Delegated { .. } => f.write_str("Delegated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_owned_cell() {
        let mut cell = ControlledState::owned(Some("a".to_string()));
        assert!(!cell.is_controlled());

        cell.set(Some("b".to_string()));
        assert_eq!(cell.get().as_deref(), Some("b"));

        cell.update(|_| None);
        assert_eq!(cell.get(), None);
    }

    #[test]
    fn test_delegated_cell_forwards_writes() {
        let external = Arc::new(Mutex::new(1u32));
        let writes = Arc::new(Mutex::new(Vec::new()));

        let reader = Arc::clone(&external);
        let writer = Arc::clone(&writes);
        let mut cell = ControlledState::delegated(
            move || *reader.lock(),
            move |value| writer.lock().push(value),
        );
        assert!(cell.is_controlled());

        // The caller ignores the write, so the read value does not move.
        cell.set(5);
        assert_eq!(*writes.lock(), vec![5]);
        assert_eq!(cell.get(), 1);

        // The caller changes its own value; reads follow it.
        *external.lock() = 9;
        assert_eq!(cell.get(), 9);

        cell.update(|v| v + 1);
        assert_eq!(*writes.lock(), vec![5, 10]);
    }
}
