//! Tab state
//!
//! Owns the tab composite, the panel collection and the visible id, and
//! drives [`reconcile`] after every mutation. Observers read the published
//! [`TabSnapshot`] through the [`Store`] and only ever see settled states.

use std::sync::Arc;

use weft_collection::CollectionState;
use weft_composite::{CompositeState, Direction, Orientation};
use weft_store::{ControlledState, Store, SubscriptionId};

use crate::reconcile::{reconcile, Patch, TabSnapshot};
use crate::tab::{Panel, Tab};

/// Upper bound on reconciliation passes per mutation
const MAX_PASSES: usize = 16;

pub struct TabStateProps {
    pub orientation: Orientation,
    /// Wrap keyboard navigation around the ends of the tab list
    pub focus_loop: bool,
    /// Tab whose panel is shown first
    pub default_visible_id: Option<String>,
    pub default_active_id: Option<String>,
    /// Caller-owned visible id; overrides `default_visible_id`
    pub visible_id: Option<ControlledState<Option<String>>>,
}

impl TabStateProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn focus_loop(mut self, focus_loop: bool) -> Self {
        self.focus_loop = focus_loop;
        self
    }

    pub fn default_visible_id(mut self, id: impl Into<String>) -> Self {
        self.default_visible_id = Some(id.into());
        self
    }

    pub fn default_active_id(mut self, id: impl Into<String>) -> Self {
        self.default_active_id = Some(id.into());
        self
    }

    /// Hand the visible id over to the caller
    pub fn controlled_visible_id<G, S>(mut self, get: G, set: S) -> Self
    where
        G: Fn() -> Option<String> + Send + Sync + 'static,
        S: Fn(Option<String>) + Send + Sync + 'static,
    {
        self.visible_id = Some(ControlledState::delegated(get, set));
        self
    }
}

impl Default for TabStateProps {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            focus_loop: true,
            default_visible_id: None,
            default_active_id: None,
            visible_id: None,
        }
    }
}

pub struct TabState {
    composite: CompositeState<Tab>,
    panels: CollectionState<Panel>,
    visible_id: ControlledState<Option<String>>,
    /// Snapshot the last reconciliation pass compared against
    settled: TabSnapshot,
    store: Store<TabSnapshot>,
    /// Open `batch` calls; reconciliation waits until the outermost ends
    batch_depth: usize,
}

impl TabState {
    pub fn new(props: TabStateProps) -> Self {
        let TabStateProps {
            orientation,
            focus_loop,
            default_visible_id,
            default_active_id,
            visible_id,
        } = props;

        let empty = TabSnapshot::empty(orientation, focus_loop);
        let mut state = Self {
            composite: CompositeState::new(orientation, focus_loop).with_active_id(default_active_id),
            panels: CollectionState::new(),
            visible_id: visible_id.unwrap_or_else(|| ControlledState::owned(default_visible_id)),
            settled: empty.clone(),
            store: Store::new(empty),
            batch_depth: 0,
        };

        // Defaults count as changes against the empty snapshot.
        state.settle();
        state
    }

    /// Id of the tab whose panel is visible
    pub fn visible_id(&self) -> Option<String> {
        self.visible_id.get()
    }

    pub fn set_visible_id(&mut self, id: Option<String>) {
        self.visible_id.set(id);
        self.settle();
    }

    /// Derive the visible id from its current value
    pub fn update_visible_id<F>(&mut self, f: F)
    where
        F: FnOnce(Option<&str>) -> Option<String>,
    {
        self.visible_id.update(|current| f(current.as_deref()));
        self.settle();
    }

    /// Move focus to `id` and show its panel.
    ///
    /// The id is not checked; an unknown id leaves nothing visible.
    pub fn show(&mut self, id: impl Into<String>) {
        let id = id.into();
        tracing::debug!(tab_id = %id, "Show tab");

        self.composite.move_to(Some(id.clone()));
        self.visible_id.set(Some(id));
        self.settle();
    }

    /// Move focus to `id`; the visible id follows on reconciliation
    pub fn move_to(&mut self, id: impl Into<String>) {
        self.composite.move_to(Some(id.into()));
        self.settle();
    }

    pub fn set_active_id(&mut self, id: Option<String>) {
        self.composite.set_active_id(id);
        self.settle();
    }

    pub fn active_id(&self) -> Option<&str> {
        self.composite.active_id()
    }

    pub fn moves(&self) -> u64 {
        self.composite.moves()
    }

    pub fn orientation(&self) -> Orientation {
        self.composite.orientation()
    }

    pub fn focus_loop(&self) -> bool {
        self.composite.focus_loop()
    }

    pub fn next(&self) -> Option<String> {
        self.composite.next()
    }

    pub fn previous(&self) -> Option<String> {
        self.composite.previous()
    }

    pub fn first(&self) -> Option<String> {
        self.composite.first()
    }

    pub fn last(&self) -> Option<String> {
        self.composite.last()
    }

    pub fn navigate(&self, direction: Direction) -> Option<String> {
        self.composite.navigate(direction)
    }

    pub fn composite(&self) -> &CompositeState<Tab> {
        &self.composite
    }

    pub fn tabs(&self) -> &CollectionState<Tab> {
        self.composite.items()
    }

    pub fn panels(&self) -> &CollectionState<Panel> {
        &self.panels
    }

    /// Register a tab, or update the tab with the same id
    pub fn register_tab(&mut self, tab: Tab) {
        if self.composite.register(tab) {
            self.settle();
        }
    }

    pub fn unregister_tab(&mut self, id: &str) -> Option<Tab> {
        let removed = self.composite.unregister(id)?;
        self.settle();
        Some(removed)
    }

    pub fn update_tabs<F>(&mut self, derive: F)
    where
        F: FnOnce(&[Tab]) -> Option<Vec<Tab>>,
    {
        if self.composite.update_items(derive) {
            self.settle();
        }
    }

    pub fn register_panel(&mut self, panel: Panel) {
        if self.panels.register(panel) {
            self.settle();
        }
    }

    pub fn unregister_panel(&mut self, id: &str) -> Option<Panel> {
        let removed = self.panels.unregister(id)?;
        self.settle();
        Some(removed)
    }

    pub fn update_panels<F>(&mut self, derive: F)
    where
        F: FnOnce(&[Panel]) -> Option<Vec<Panel>>,
    {
        if self.panels.update_items(derive) {
            self.settle();
        }
    }

    pub fn register_tabs(&mut self, tabs: impl IntoIterator<Item = Tab>) {
        self.batch(|state| tabs.into_iter().for_each(|tab| state.register_tab(tab)));
    }

    pub fn register_panels(&mut self, panels: impl IntoIterator<Item = Panel>) {
        self.batch(|state| {
            panels
                .into_iter()
                .for_each(|panel| state.register_panel(panel))
        });
    }

    /// Run several mutations and reconcile once at the end, the way parts
    /// mounted together are seen together
    pub fn batch<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        self.settle();
        result
    }

    /// Re-read a caller-owned visible id and reconcile against it
    pub fn sync(&mut self) {
        self.settle();
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<TabSnapshot> {
        self.store.snapshot()
    }

    /// Shared handle for observers
    pub fn store(&self) -> Store<TabSnapshot> {
        self.store.clone()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Arc<TabSnapshot>) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    fn capture(&self) -> TabSnapshot {
        TabSnapshot {
            tabs: Arc::clone(self.composite.item_list()),
            panels: Arc::clone(self.panels.items()),
            active_id: self.composite.active_id().map(str::to_string),
            visible_id: self.visible_id.get(),
            moves: self.composite.moves(),
            orientation: self.composite.orientation(),
            focus_loop: self.composite.focus_loop(),
        }
    }

    /// Reconcile until no patches remain, then publish
    fn settle(&mut self) {
        if self.batch_depth > 0 {
            return;
        }

        for pass in 0..MAX_PASSES {
            let next = self.capture();
            let patches = reconcile(&self.settled, &next);
            self.settled = next;

            if patches.is_empty() {
                self.store.publish(self.settled.clone());
                return;
            }

            tracing::debug!(pass, patches = patches.len(), "Applying tab patches");
            for patch in patches {
                self.apply(patch);
            }

            // A caller-owned visible id may refuse the write.
            if self.capture() == self.settled {
                tracing::debug!(pass, "Tab patches had no effect");
                self.store.publish(self.settled.clone());
                return;
            }
        }

        tracing::warn!(passes = MAX_PASSES, "Tab state did not settle");
        self.store.publish(self.capture());
    }

    fn apply(&mut self, patch: Patch) {
        tracing::trace!(?patch, "Tab patch");
        match patch {
            Patch::SetActiveId(id) => {
                self.composite.set_active_id(id);
            }
            Patch::SetVisibleId(id) => {
                self.visible_id.set(id.clone());

                // A caller-owned visible id that kept its value pulls the
                // active id back to it.
                let kept = self.visible_id.get();
                if self.visible_id.is_controlled() && kept.is_some() && kept != id {
                    tracing::debug!(requested = ?id, kept = ?kept, "Visible id write refused");
                    self.composite.set_active_id(kept);
                }
            }
            Patch::ReplaceTabs(tabs) => {
                self.composite.replace_items(tabs);
            }
            Patch::ReplacePanels(panels) => {
                self.panels.replace_items(panels);
            }
        }
    }
}

impl Default for TabState {
    fn default() -> Self {
        Self::new(TabStateProps::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn panel_links(state: &TabState) -> Vec<(String, Option<String>)> {
        state
            .tabs()
            .iter()
            .map(|tab| (tab.id.clone(), tab.panel_id.clone()))
            .collect()
    }

    fn tab_links(state: &TabState) -> Vec<(String, Option<String>)> {
        state
            .panels()
            .iter()
            .map(|panel| (panel.id.clone(), panel.tab_id.clone()))
            .collect()
    }

    fn pair(a: &str, b: &str) -> (String, Option<String>) {
        (a.to_string(), Some(b.to_string()))
    }

    #[test]
    fn test_positional_pairing() {
        let mut state = TabState::default();
        state.register_tabs(["t1", "t2", "t3"].map(Tab::new));
        state.register_panels(["p1", "p2", "p3"].map(Panel::new));

        assert_eq!(
            panel_links(&state),
            vec![pair("t1", "p1"), pair("t2", "p2"), pair("t3", "p3")]
        );
        assert_eq!(
            tab_links(&state),
            vec![pair("p1", "t1"), pair("p2", "t2"), pair("p3", "t3")]
        );
    }

    #[test]
    fn test_pairing_one_at_a_time() {
        let mut state = TabState::default();
        for (tab, panel) in [("t1", "p1"), ("t2", "p2")] {
            state.register_tab(Tab::new(tab));
            state.register_panel(Panel::new(panel));
        }

        assert_eq!(panel_links(&state), vec![pair("t1", "p1"), pair("t2", "p2")]);
        assert_eq!(tab_links(&state), vec![pair("p1", "t1"), pair("p2", "t2")]);
    }

    #[test]
    fn test_explicit_link_overrides_position() {
        let mut state = TabState::default();
        state.register_tabs(["t1", "t2"].map(Tab::new));
        state.register_panels([Panel::new("p1"), Panel::new("p2").tab_id("t1")]);

        assert_eq!(state.tabs().get("t1").and_then(|t| t.panel_id.as_deref()), Some("p2"));
    }

    #[test]
    fn test_relinking_without_changes_is_stable() {
        let mut state = TabState::default();
        state.register_tabs(["t1", "t2"].map(Tab::new));
        state.register_panels(["p1", "p2"].map(Panel::new));

        let tabs = Arc::clone(state.tabs().items());
        let panels = Arc::clone(state.panels().items());
        state.sync();
        state.sync();

        assert!(Arc::ptr_eq(&tabs, state.tabs().items()));
        assert!(Arc::ptr_eq(&panels, state.panels().items()));
    }

    #[test]
    fn test_first_enabled_tab_becomes_visible() {
        let mut state = TabState::default();
        state.register_tabs([Tab::new("t1"), Tab::new("t2").dimmed(true)]);
        state.register_panels(["p1", "p2"].map(Panel::new));

        assert_eq!(state.visible_id().as_deref(), Some("t1"));
        assert_eq!(state.active_id(), Some("t1"));
        assert!(state.snapshot().is_panel_visible("p1"));
    }

    #[test]
    fn test_dimmed_first_tab_is_skipped() {
        let mut state = TabState::default();
        state.register_tabs([Tab::new("t1").dimmed(true), Tab::new("t2")]);

        assert_eq!(state.visible_id().as_deref(), Some("t2"));
    }

    #[test]
    fn test_default_visible_id_drives_active() {
        let mut state = TabState::new(TabStateProps::new().default_visible_id("t2"));
        state.register_tabs(["t1", "t2"].map(Tab::new));

        assert_eq!(state.visible_id().as_deref(), Some("t2"));
        assert_eq!(state.active_id(), Some("t2"));
    }

    #[test]
    fn test_default_active_id_becomes_visible() {
        let mut state = TabState::new(TabStateProps::new().default_active_id("t2"));
        state.register_tabs(["t1", "t2"].map(Tab::new));

        assert_eq!(state.visible_id().as_deref(), Some("t2"));
    }

    #[test]
    fn test_unregistering_visible_tab_falls_back() {
        let mut state = TabState::default();
        state.register_tabs(["t1", "t2"].map(Tab::new));
        assert_eq!(state.visible_id().as_deref(), Some("t1"));

        state.unregister_tab("t1");
        assert_eq!(state.visible_id().as_deref(), Some("t2"));
        assert_eq!(state.active_id(), Some("t2"));

        state.unregister_tab("t2");
        assert_eq!(state.visible_id(), None);
    }

    #[test]
    fn test_show_updates_both_in_one_snapshot() {
        let mut state = TabState::default();
        state.register_tabs(["t1", "t2"].map(Tab::new));
        state.register_panels(["p1", "p2"].map(Panel::new));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        state.subscribe(move |snapshot| {
            sink.lock()
                .push((snapshot.active_id.clone(), snapshot.visible_id.clone()))
        });

        let moves = state.moves();
        state.show("t2");

        let t2 = Some("t2".to_string());
        assert_eq!(*seen.lock(), vec![(t2.clone(), t2)]);
        assert_eq!(state.moves(), moves + 1);
        assert!(state.snapshot().is_panel_visible("p2"));
    }

    #[test]
    fn test_show_unknown_id_shows_nothing() {
        let mut state = TabState::default();
        state.register_tabs(["t1"].map(Tab::new));
        state.register_panels(["p1"].map(Panel::new));

        state.show("nope");
        let snapshot = state.snapshot();
        assert_eq!(snapshot.visible_id.as_deref(), Some("nope"));
        assert_eq!(snapshot.active_id.as_deref(), Some("nope"));
        assert!(snapshot.visible_panel().is_none());
    }

    #[test]
    fn test_navigation_moves_visible() {
        let mut state = TabState::default();
        state.register_tabs(["t1", "t2", "t3"].map(Tab::new));

        let next = state.next().unwrap();
        state.move_to(next);
        assert_eq!(state.visible_id().as_deref(), Some("t2"));

        state.set_visible_id(Some("t3".to_string()));
        assert_eq!(state.active_id(), Some("t3"));

        // Loops back to the start.
        assert_eq!(state.next().as_deref(), Some("t1"));
    }

    #[test]
    fn test_update_visible_id() {
        let mut state = TabState::default();
        state.register_tabs(["t1", "t2"].map(Tab::new));

        state.update_visible_id(|current| {
            assert_eq!(current, Some("t1"));
            Some("t2".to_string())
        });
        assert_eq!(state.active_id(), Some("t2"));
    }

    #[test]
    fn test_controlled_visible_id_forwards_writes() {
        let external = Arc::new(Mutex::new(Some("t2".to_string())));
        let writes = Arc::new(Mutex::new(Vec::new()));

        let reader = Arc::clone(&external);
        let writer = Arc::clone(&writes);
        let mut state = TabState::new(TabStateProps::new().controlled_visible_id(
            move || reader.lock().clone(),
            move |id| writer.lock().push(id),
        ));
        state.register_tabs(["t1", "t2"].map(Tab::new));

        // The caller's value drives the active tab.
        assert_eq!(state.visible_id().as_deref(), Some("t2"));
        assert_eq!(state.active_id(), Some("t2"));

        // Writes go to the caller, who has not applied them yet.
        state.show("t1");
        {
            let writes = writes.lock();
            assert!(!writes.is_empty());
            assert!(writes.iter().all(|id| id.as_deref() == Some("t1")));
        }
        assert_eq!(state.visible_id().as_deref(), Some("t2"));
        assert_eq!(state.snapshot().visible_id.as_deref(), Some("t2"));

        // Once the caller applies it, the state follows.
        *external.lock() = Some("t1".to_string());
        state.sync();
        assert_eq!(state.snapshot().visible_id.as_deref(), Some("t1"));
        assert_eq!(state.active_id(), Some("t1"));
    }

    #[test]
    fn test_refused_controlled_write_restores_active() {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let writer = Arc::clone(&writes);
        let mut state = TabState::new(TabStateProps::new().controlled_visible_id(
            || Some("t2".to_string()),
            move |id| writer.lock().push(id),
        ));
        state.register_tabs(["t1", "t2"].map(Tab::new));
        assert_eq!(state.active_id(), Some("t2"));

        state.move_to("t1");
        assert_eq!(*writes.lock(), vec![Some("t1".to_string())]);
        assert_eq!(state.active_id(), Some("t2"));
        assert_eq!(state.snapshot().active_id, state.snapshot().visible_id);

        state.show("t1");
        let snapshot = state.snapshot();
        assert_eq!(snapshot.visible_id.as_deref(), Some("t2"));
        assert_eq!(snapshot.active_id.as_deref(), Some("t2"));
    }

    #[test]
    fn test_unsettled_state_still_publishes() {
        // Every read yields a new visible id, so the loop never reaches a
        // fixed point.
        let reads = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&reads);
        let state = TabState::new(TabStateProps::new().controlled_visible_id(
            move || {
                let mut reads = counter.lock();
                *reads += 1;
                Some(format!("t{}", *reads))
            },
            |_| {},
        ));

        assert!(*reads.lock() > MAX_PASSES);
        let snapshot = state.snapshot();
        assert!(snapshot.visible_id.is_some());
        assert!(snapshot.active_id.is_some());
    }

    #[test]
    fn test_refused_controlled_write_settles() {
        let writes = Arc::new(Mutex::new(0usize));
        let writer = Arc::clone(&writes);
        let mut state = TabState::new(
            TabStateProps::new().controlled_visible_id(|| None, move |_| *writer.lock() += 1),
        );
        state.register_tab(Tab::new("t1"));

        assert_eq!(state.visible_id(), None);
        assert!(*writes.lock() < MAX_PASSES);
    }

    #[test]
    fn test_no_publish_without_changes() {
        let mut state = TabState::default();
        state.register_tab(Tab::new("t1"));
        let before = state.snapshot();

        state.register_tab(Tab::new("t1"));
        state.sync();
        assert!(Arc::ptr_eq(&before, &state.snapshot()));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = TabState::default();
        state.register_tabs(["t1"].map(Tab::new));

        let json = serde_json::to_value(&*state.snapshot()).unwrap();
        assert_eq!(json["visible_id"], "t1");
        assert_eq!(json["orientation"], "horizontal");
    }
}
