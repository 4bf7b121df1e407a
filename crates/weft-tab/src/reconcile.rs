//! Tab reconciliation
//!
//! [`reconcile`] compares the snapshot seen by the previous pass with the
//! current one and returns the patches that bring the state closer to its
//! fixed point:
//!
//! ```text
//! panels changed      → link orphan tabs
//! tabs changed        → link orphan panels
//! visible id changed  → active id follows
//! active id changed   → visible id follows
//! visible id missing  → active tab, else first tab that is not dimmed
//! ```
//!
//! Registry changes are detected by `Arc` identity, so a registry that was
//! left untouched never triggers linking again.

use serde::Serialize;
use std::sync::Arc;

use weft_composite::Orientation;

use crate::tab::{Panel, Tab};

/// Everything observers can see of a tab state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabSnapshot {
    pub tabs: Arc<Vec<Tab>>,
    pub panels: Arc<Vec<Panel>>,
    pub active_id: Option<String>,
    pub visible_id: Option<String>,
    pub moves: u64,
    pub orientation: Orientation,
    pub focus_loop: bool,
}

/// A single write produced by [`reconcile`]
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    SetActiveId(Option<String>),
    SetVisibleId(Option<String>),
    /// Replace the tab sequence (link fields only differ)
    ReplaceTabs(Vec<Tab>),
    /// Replace the panel sequence (link fields only differ)
    ReplacePanels(Vec<Panel>),
}

impl TabSnapshot {
    /// Snapshot with nothing registered and nothing selected
    pub fn empty(orientation: Orientation, focus_loop: bool) -> Self {
        Self {
            tabs: Arc::new(Vec::new()),
            panels: Arc::new(Vec::new()),
            active_id: None,
            visible_id: None,
            moves: 0,
            orientation,
            focus_loop,
        }
    }

    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.id == id)
    }

    /// The visible tab, if the visible id resolves to a registered tab
    pub fn visible_tab(&self) -> Option<&Tab> {
        self.visible_id.as_deref().and_then(|id| self.tab(id))
    }

    /// The panel to display, or `None` when nothing is visible
    pub fn visible_panel(&self) -> Option<&Panel> {
        let visible_id = self.visible_id.as_deref()?;
        self.visible_tab()
            .and_then(|tab| tab.panel_id.as_deref())
            .and_then(|panel_id| self.panel(panel_id))
            .or_else(|| {
                self.panels
                    .iter()
                    .find(|panel| panel.tab_id.as_deref() == Some(visible_id))
            })
    }

    pub fn is_panel_visible(&self, panel_id: &str) -> bool {
        self.visible_panel().is_some_and(|panel| panel.id == panel_id)
    }
}

/// Compute the patches for one reconciliation pass
pub fn reconcile(prev: &TabSnapshot, next: &TabSnapshot) -> Vec<Patch> {
    let mut patches = Vec::new();

    if !Arc::ptr_eq(&prev.panels, &next.panels) {
        if let Some(tabs) = link_tabs(&next.tabs, &next.panels) {
            patches.push(Patch::ReplaceTabs(tabs));
        }
    }

    if !Arc::ptr_eq(&prev.tabs, &next.tabs) {
        if let Some(panels) = link_panels(&next.panels, &next.tabs) {
            patches.push(Patch::ReplacePanels(panels));
        }
    }

    patches.extend(sync_selection(prev, next));
    patches
}

fn sync_selection(prev: &TabSnapshot, next: &TabSnapshot) -> Option<Patch> {
    // A visible tab that was just unregistered counts as no visible tab.
    let removed = next
        .visible_id
        .as_deref()
        .is_some_and(|id| prev.tab(id).is_some() && next.tab(id).is_none());

    let visible = match next.visible_id.as_deref() {
        Some(id) if !removed => id,
        _ => {
            let resolved = resolve_visible_id(&next.tabs, next.active_id.as_deref());
            return if resolved.is_some() || removed {
                Some(Patch::SetVisibleId(resolved))
            } else {
                None
            };
        }
    };

    let active = next.active_id.as_deref();

    if prev.visible_id != next.visible_id {
        return (active != Some(visible)).then(|| Patch::SetActiveId(Some(visible.to_string())));
    }

    if prev.active_id != next.active_id {
        let active = active?;
        let dimmed = next.tab(active).is_some_and(|tab| tab.dimmed);
        if active != visible && !dimmed {
            return Some(Patch::SetVisibleId(Some(active.to_string())));
        }
    }

    None
}

/// Pick a visible id when there is none: the active tab if it exists and
/// is not dimmed, otherwise the first tab that is not dimmed.
pub fn resolve_visible_id(tabs: &[Tab], active_id: Option<&str>) -> Option<String> {
    let active_tab = active_id.and_then(|id| tabs.iter().find(|tab| tab.id == id));
    if let Some(tab) = active_tab.filter(|tab| !tab.dimmed) {
        return Some(tab.id.clone());
    }

    tabs.iter()
        .find(|tab| !tab.dimmed)
        .map(|tab| tab.id.clone())
}

/// Give every tab without a panel one: the panel that already names it,
/// else the panel at the same position. Returns `None` when nothing would
/// change.
pub fn link_tabs(tabs: &[Tab], panels: &[Panel]) -> Option<Vec<Tab>> {
    // Panels mount after tabs; wait for them.
    if panels.is_empty() || !tabs.iter().any(Tab::is_orphan) {
        return None;
    }

    let linked: Vec<Tab> = tabs
        .iter()
        .enumerate()
        .map(|(index, tab)| {
            if !tab.is_orphan() {
                return tab.clone();
            }
            let panel = panels
                .iter()
                .find(|panel| panel.tab_id.as_deref() == Some(tab.id.as_str()))
                .or_else(|| panels.get(index));
            Tab {
                panel_id: panel.map(|panel| panel.id.clone()),
                ..tab.clone()
            }
        })
        .collect();

    (linked.as_slice() != tabs).then_some(linked)
}

/// Give every panel without a tab one: the tab that already names it,
/// else the tab at the same position.
pub fn link_panels(panels: &[Panel], tabs: &[Tab]) -> Option<Vec<Panel>> {
    if tabs.is_empty() || !panels.iter().any(Panel::is_orphan) {
        return None;
    }

    let linked: Vec<Panel> = panels
        .iter()
        .enumerate()
        .map(|(index, panel)| {
            if !panel.is_orphan() {
                return panel.clone();
            }
            let tab = tabs
                .iter()
                .find(|tab| tab.panel_id.as_deref() == Some(panel.id.as_str()))
                .or_else(|| tabs.get(index));
            Panel {
                tab_id: tab.map(|tab| tab.id.clone()),
                ..panel.clone()
            }
        })
        .collect();

    (linked.as_slice() != panels).then_some(linked)
}
