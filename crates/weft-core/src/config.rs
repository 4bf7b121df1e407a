//! Tab state configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use weft_composite::Orientation;
use weft_tab::{TabState, TabStateProps};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Layout of the tab list
    pub orientation: Orientation,
    /// Wrap keyboard navigation at the ends
    pub focus_loop: bool,
    /// Tab shown before anything is selected
    pub default_visible_id: Option<String>,
    /// Tab focused initially
    pub default_active_id: Option<String>,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;

        tracing::debug!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let ids = [
            ("default_visible_id", &self.default_visible_id),
            ("default_active_id", &self.default_active_id),
        ];
        for (field, id) in ids {
            if id.as_deref().is_some_and(|id| id.trim().is_empty()) {
                return Err(CoreError::Config(format!("{} cannot be blank", field)));
            }
        }
        if self.log_filter.trim().is_empty() {
            return Err(CoreError::Config("log_filter cannot be blank".to_string()));
        }
        Ok(())
    }

    pub fn tab_props(&self) -> TabStateProps {
        TabStateProps {
            orientation: self.orientation,
            focus_loop: self.focus_loop,
            default_visible_id: self.default_visible_id.clone(),
            default_active_id: self.default_active_id.clone(),
            visible_id: None,
        }
    }

    /// Fresh tab state with this configuration
    pub fn tab_state(&self) -> TabState {
        TabState::new(self.tab_props())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            focus_loop: true,
            default_visible_id: None,
            default_active_id: None,
            log_filter: "info".to_string(),
        }
    }
}
