//! Weft scenario runner
//!
//! Reads a JSON scenario, mounts its tabs and panels, applies each step and
//! prints one JSON line per step with the settled snapshot.
//!
//! ```text
//! weft scenario.json
//! weft - < scenario.json
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::Arc;

use weft_core::{Config, Direction, Panel, Tab, TabSnapshot, TabState};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Scenario {
    config: Config,
    tabs: Vec<Tab>,
    panels: Vec<Panel>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Show { id: String },
    SetVisible { id: Option<String> },
    MoveTo { id: String },
    RegisterTab { tab: Tab },
    UnregisterTab { id: String },
    RegisterPanel { panel: Panel },
    UnregisterPanel { id: String },
    Next,
    Previous,
    Navigate { direction: Direction },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Show { .. } => "show",
            Step::SetVisible { .. } => "set_visible",
            Step::MoveTo { .. } => "move_to",
            Step::RegisterTab { .. } => "register_tab",
            Step::UnregisterTab { .. } => "unregister_tab",
            Step::RegisterPanel { .. } => "register_panel",
            Step::UnregisterPanel { .. } => "unregister_panel",
            Step::Next => "next",
            Step::Previous => "previous",
            Step::Navigate { .. } => "navigate",
        }
    }
}

#[derive(Debug, Serialize)]
struct StepResult {
    pub step: usize,
    pub op: &'static str,
    pub success: bool,
    pub data: Option<Arc<TabSnapshot>>,
    pub error: Option<String>,
}

impl StepResult {
    fn ok(step: usize, op: &'static str, data: Arc<TabSnapshot>) -> Self {
        Self {
            step,
            op,
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(step: usize, op: &'static str, error: String) -> Self {
        Self {
            step,
            op,
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

fn apply_step(state: &mut TabState, step: Step) -> Result<()> {
    match step {
        Step::Show { id } => state.show(id),
        Step::SetVisible { id } => state.set_visible_id(id),
        Step::MoveTo { id } => state.move_to(id),
        Step::RegisterTab { tab } => state.register_tab(tab),
        Step::UnregisterTab { id } => {
            if state.unregister_tab(&id).is_none() {
                bail!("Tab not found: {}", id);
            }
        }
        Step::RegisterPanel { panel } => state.register_panel(panel),
        Step::UnregisterPanel { id } => {
            if state.unregister_panel(&id).is_none() {
                bail!("Panel not found: {}", id);
            }
        }
        Step::Next => match state.next() {
            Some(id) => state.move_to(id),
            None => bail!("No enabled tab after the active one"),
        },
        Step::Previous => match state.previous() {
            Some(id) => state.move_to(id),
            None => bail!("No enabled tab before the active one"),
        },
        Step::Navigate { direction } => match state.navigate(direction) {
            Some(id) => state.move_to(id),
            None => bail!("Cannot move {:?} in a {} tab list", direction, state.orientation()),
        },
    }
    Ok(())
}

fn run(scenario: Scenario) -> Result<Vec<StepResult>> {
    scenario.config.validate()?;

    let mut state = scenario.config.tab_state();
    let (tabs, panels) = (scenario.tabs, scenario.panels);
    state.batch(|state| {
        state.register_tabs(tabs);
        state.register_panels(panels);
    });

    let mut results = vec![StepResult::ok(0, "mount", state.snapshot())];

    for (index, step) in scenario.steps.into_iter().enumerate() {
        let op = step.name();
        let result = match apply_step(&mut state, step) {
            Ok(()) => StepResult::ok(index + 1, op, state.snapshot()),
            Err(e) => {
                tracing::warn!(step = index + 1, op, error = %e, "Scenario step failed");
                StepResult::err(index + 1, op, e.to_string())
            }
        };
        results.push(result);
    }

    Ok(results)
}

fn read_scenario(path: &str) -> Result<Scenario> {
    let json = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read scenario from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?
    };

    serde_json::from_str(&json).with_context(|| format!("Invalid scenario {}", path))
}

fn main() -> Result<()> {
    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: weft <scenario.json | ->");
    };

    let scenario = read_scenario(&path)?;
    weft_core::init_logging(&scenario.config.log_filter);

    tracing::info!(
        tabs = scenario.tabs.len(),
        panels = scenario.panels.len(),
        steps = scenario.steps.len(),
        "Running scenario"
    );

    for result in run(scenario)? {
        println!("{}", serde_json::to_string(&result)?);
    }

    Ok(())
}
