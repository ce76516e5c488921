//! Scripted viewer input.
//!
//! A script is a JSON array of steps, each tagged by `op`:
//!
//! ```json
//! [
//!   { "op": "goto", "page": 2 },
//!   { "op": "tool", "tool": "highlighter" },
//!   { "op": "down", "x": 10, "y": 10 },
//!   { "op": "move", "x": 20, "y": 10 },
//!   { "op": "up" }
//! ]
//! ```

use doc_model::Point;
use serde::Deserialize;
use viewer_core::{
    DocumentHandle, NavigationOutcome, PagedAnnotationViewer, PointerEvent, Surface, ViewerError,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Goto {
        page: u32,
    },
    Next,
    Prev,
    Tool {
        tool: String,
        #[serde(default)]
        color: Option<String>,
    },
    Down {
        x: f64,
        y: f64,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up,
    Leave,
    /// Drops every stored segment.
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub steps: usize,
    pub ignored_navigations: usize,
    pub failed_renders: usize,
}

pub fn parse(json: &str) -> serde_json::Result<Vec<Step>> {
    serde_json::from_str(json)
}

/// Runs `steps` in order. Render failures are counted rather than aborting,
/// since the viewer stays usable after them.
pub async fn run<D, S>(
    viewer: &mut PagedAnnotationViewer<D, S>,
    steps: &[Step],
) -> ScriptSummary
where
    D: DocumentHandle,
    S: Surface + Default,
{
    let mut summary = ScriptSummary::default();

    for step in steps {
        summary.steps += 1;

        let navigation = match step {
            Step::Goto { page } => Some(viewer.go_to_page(*page).await),
            Step::Next => Some(viewer.next_page().await),
            Step::Prev => Some(viewer.prev_page().await),
            Step::Tool { tool, color } => {
                viewer.set_tool(tool, color.as_deref());
                None
            }
            Step::Down { x, y } => {
                viewer.handle_pointer(PointerEvent::Down(Point::new(*x, *y)));
                None
            }
            Step::Move { x, y } => {
                viewer.handle_pointer(PointerEvent::Move(Point::new(*x, *y)));
                None
            }
            Step::Up => {
                viewer.handle_pointer(PointerEvent::Up);
                None
            }
            Step::Leave => {
                viewer.handle_pointer(PointerEvent::Leave);
                None
            }
            Step::Clear => {
                viewer.set_annotations(None);
                None
            }
        };

        match navigation {
            Some(Ok(NavigationOutcome::Ignored(err))) => {
                log::info!("step {}: {err}", summary.steps);
                summary.ignored_navigations += 1;
            }
            Some(Err(ViewerError::Render(err))) => {
                log::warn!("step {}: {err}", summary.steps);
                summary.failed_renders += 1;
            }
            Some(Err(err)) => {
                log::warn!("step {}: {err}", summary.steps);
            }
            _ => {}
        }
    }

    summary
}
