//! Weft Composite
//!
//! Selection state for composite widgets (tab lists, toolbars, listboxes):
//! an ordered set of items plus one active item that keyboard navigation
//! moves between.

mod composite;
mod orientation;

pub use composite::{CompositeItem, CompositeState};
pub use orientation::{Direction, Orientation};
