//! Weft Core
//!
//! Entry point for applications embedding the widget states.
//! State lives in Rust; renderers only read snapshots.

mod config;
mod error;

pub use config::Config;
pub use error::CoreError;

// Re-export the widget states
pub use weft_collection::{CollectionItem, CollectionState};
pub use weft_composite::{CompositeItem, CompositeState, Direction, Orientation};
pub use weft_store::{ControlledState, Store, SubscriptionId};
pub use weft_tab::{
    link_panels, link_tabs, reconcile, resolve_visible_id, Panel, Patch, Tab, TabSnapshot,
    TabState, TabStateProps,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Logs go to stderr. `RUST_LOG` wins over `default_filter`.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second call (tests, embedding apps) keeps the first subscriber.
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
    {
        tracing::debug!(error = %e, "Logging already initialized");
    }
}
