//! Tab and tab panel entries
//!
//! Cross references between the two are plain ids. Both registries are
//! replaced wholesale on every change, so an id is looked up again
//! whenever it is followed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use weft_collection::CollectionItem;
use weft_composite::CompositeItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier within the tab list
    #[serde(default = "generate_tab_id")]
    pub id: String,
    /// Focusable, but never picked as the visible tab automatically
    #[serde(default)]
    pub dimmed: bool,
    /// Skipped by keyboard navigation
    #[serde(default)]
    pub disabled: bool,
    /// Panel this tab controls
    #[serde(default)]
    pub panel_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    #[serde(default = "generate_panel_id")]
    pub id: String,
    /// Tab that controls this panel
    #[serde(default)]
    pub tab_id: Option<String>,
}

fn generate_tab_id() -> String {
    format!("tab-{}", Uuid::new_v4())
}

fn generate_panel_id() -> String {
    format!("panel-{}", Uuid::new_v4())
}

impl Tab {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dimmed: false,
            disabled: false,
            panel_id: None,
        }
    }

    /// Tab with a generated id, for parts mounted without one
    pub fn generated() -> Self {
        Self::new(generate_tab_id())
    }

    pub fn dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn panel_id(mut self, panel_id: impl Into<String>) -> Self {
        self.panel_id = Some(panel_id.into());
        self
    }

    /// True while no panel is linked
    pub fn is_orphan(&self) -> bool {
        self.panel_id.as_deref().map_or(true, str::is_empty)
    }
}

impl Panel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tab_id: None,
        }
    }

    pub fn generated() -> Self {
        Self::new(generate_panel_id())
    }

    pub fn tab_id(mut self, tab_id: impl Into<String>) -> Self {
        self.tab_id = Some(tab_id.into());
        self
    }

    pub fn is_orphan(&self) -> bool {
        self.tab_id.as_deref().map_or(true, str::is_empty)
    }
}

impl CollectionItem for Tab {
    fn id(&self) -> &str {
        &self.id
    }
}

impl CompositeItem for Tab {
    fn disabled(&self) -> bool {
        self.disabled
    }
}

impl CollectionItem for Panel {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Tab::generated();
        let b = Tab::generated();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("tab-"));
        assert!(Panel::generated().id.starts_with("panel-"));
    }

    #[test]
    fn test_orphan_detection() {
        assert!(Tab::new("t1").is_orphan());
        assert!(Tab::new("t1").panel_id("").is_orphan());
        assert!(!Tab::new("t1").panel_id("p1").is_orphan());
        assert!(Panel::new("p1").is_orphan());
        assert!(!Panel::new("p1").tab_id("t1").is_orphan());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let tab: Tab = serde_json::from_str(r#"{"id": "t1", "dimmed": true}"#).unwrap();
        assert_eq!(tab, Tab::new("t1").dimmed(true));

        let panel: Panel = serde_json::from_str("{}").unwrap();
        assert!(panel.id.starts_with("panel-"));
        assert!(panel.is_orphan());
    }
}
