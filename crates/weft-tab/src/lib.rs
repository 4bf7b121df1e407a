//! Weft Tabs
//!
//! Headless state for a tab list and its tab panels:
//! - the visible tab follows the active tab, and the reverse
//! - tabs and panels that were not linked explicitly are paired by position
//! - `show` moves focus and reveals a panel in one step
//!
//! Every mutation runs [`reconcile`] until nothing changes, then publishes
//! one [`TabSnapshot`].

mod reconcile;
mod state;
mod tab;

pub use reconcile::{link_panels, link_tabs, reconcile, resolve_visible_id, Patch, TabSnapshot};
pub use state::{TabState, TabStateProps};
pub use tab::{Panel, Tab};

pub use weft_composite::{Direction, Orientation};
pub use weft_store::{ControlledState, Store, SubscriptionId};
