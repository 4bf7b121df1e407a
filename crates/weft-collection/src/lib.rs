//! Weft Collection
//!
//! Ordered, uniquely keyed registry that widget parts register into as
//! they mount and leave as they unmount. Registration order is the order
//! every other state primitive uses.

mod collection;

pub use collection::{CollectionItem, CollectionState};
