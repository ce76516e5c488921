//! Annotation overlay: freehand capture and per-page replay.
//!
//! Capture is a two-state machine driven by [`PointerEvent`]s:
//!
//! - `Idle` + `Down` -> `Drawing`
//! - `Drawing` + `Move` -> `Drawing`, emitting one segment from the last
//!   point to the new one
//! - `Drawing` + `Up`/`Leave` -> `Idle`, emitting nothing
//! - `Idle` + `Move` -> ignored
//!
//! Replay clears the surface and repaints the active page's segments in
//! insertion order, each with its own stored style.

use crate::surface::Surface;
use doc_model::{AnnotationSet, Point, StrokeSegment, ToolState, ViewportSize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Drawing {
        last: Point,
    },
}

#[derive(Debug)]
pub struct AnnotationOverlay<S> {
    surface: S,
    state: CaptureState,
    tool: ToolState,
    annotations: AnnotationSet,
}

impl<S: Surface> AnnotationOverlay<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: CaptureState::Idle,
            tool: ToolState::default(),
            annotations: AnnotationSet::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn tool(&self) -> &ToolState {
        &self.tool
    }

    pub fn set_tool(&mut self, tool: ToolState) {
        self.tool = tool;
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    /// Feeds one pointer event, tagging any new segment with `page`.
    pub fn handle(&mut self, event: PointerEvent, page: u32) -> Option<&StrokeSegment> {
        match (self.state, event) {
            (_, PointerEvent::Down(point)) => {
                self.state = CaptureState::Drawing { last: point };
                None
            }
            (CaptureState::Drawing { last }, PointerEvent::Move(point)) => {
                let style = self.tool.line_style();
                self.surface.draw_line(last, point, &style);
                self.annotations.push(StrokeSegment::new(page, last, point, &style));
                self.state = CaptureState::Drawing { last: point };
                self.annotations.last()
            }
            (CaptureState::Idle, PointerEvent::Move(_)) => None,
            (_, PointerEvent::Up | PointerEvent::Leave) => {
                self.state = CaptureState::Idle;
                None
            }
        }
    }

    pub fn cancel_capture(&mut self) {
        self.state = CaptureState::Idle;
    }

    pub fn replay(&mut self, page: u32) {
        self.surface.clear();

        let mut painted = 0usize;
        for segment in self.annotations.for_page(page) {
            self.surface.draw_line(segment.start, segment.end, &segment.style());
            painted += 1;
        }

        log::debug!("replayed {painted} segments on page {page}");
    }

    /// Matches the overlay to a freshly rendered base surface, then replays.
    pub fn sync(&mut self, size: ViewportSize, page: u32) {
        self.surface.resize(size);
        self.replay(page);
    }

    /// Empties the surface at `size` without replaying anything. Used while
    /// a placeholder is showing instead of a page.
    pub fn blank(&mut self, size: ViewportSize) {
        self.state = CaptureState::Idle;
        self.surface.resize(size);
    }

    pub fn replace(&mut self, annotations: AnnotationSet, page: u32) {
        self.annotations = annotations;
        self.replay(page);
    }
}
