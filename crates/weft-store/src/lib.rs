//! Weft Store
//!
//! State publication primitives shared by the widget states:
//! - [`Store`] keeps the latest snapshot and notifies subscribers
//! - [`ControlledState`] is a value that is either owned or delegated to the caller

mod controlled;
mod store;

pub use controlled::ControlledState;
pub use store::{Store, SubscriptionId};
