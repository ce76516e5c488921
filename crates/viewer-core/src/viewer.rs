//! The paged annotation viewer.
//!
//! One instance owns all session state: the document reference, the page
//! cursor, the render pipeline, a base surface for the page and an overlay
//! surface for annotations. Instances share nothing, so any number of them
//! can live side by side.

use crate::config::ViewerConfig;
use crate::cursor::DocumentCursor;
use crate::error::{DocumentLoadError, InvalidNavigationError, ViewerError, ViewerResult};
use crate::overlay::{AnnotationOverlay, CaptureState, PointerEvent};
use crate::pipeline::{FetchedPage, PendingRender, RenderPipeline, RenderStep};
use crate::placeholder::paint_message;
use crate::source::{DocumentHandle, DocumentProvider};
use crate::surface::Surface;
use doc_model::{AnnotationSet, PageIndicator, StrokeSegment, ToolKind, ToolState};
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The page was painted and the overlay replayed.
    Rendered(PageIndicator),
    /// Target outside the document; nothing changed.
    Ignored(InvalidNavigationError),
    /// A newer navigation was issued before this one resolved.
    Superseded { page: u32 },
}

type PageObserver = Box<dyn FnMut(PageIndicator)>;

pub struct PagedAnnotationViewer<D, S> {
    config: ViewerConfig,
    document: Option<Arc<D>>,
    cursor: DocumentCursor,
    pipeline: RenderPipeline,
    base: S,
    overlay: AnnotationOverlay<S>,
    observers: Vec<PageObserver>,
}

impl<D, S> PagedAnnotationViewer<D, S>
where
    D: DocumentHandle,
    S: Surface + Default,
{
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            document: None,
            cursor: DocumentCursor::new(),
            pipeline: RenderPipeline::new(),
            base: S::default(),
            overlay: AnnotationOverlay::new(S::default()),
            observers: Vec::new(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn document(&self) -> Option<&Arc<D>> {
        self.document.as_ref()
    }

    pub fn base_surface(&self) -> &S {
        &self.base
    }

    pub fn overlay_surface(&self) -> &S {
        self.overlay.surface()
    }

    pub fn capture_state(&self) -> CaptureState {
        self.overlay.state()
    }

    /// Shows the loading placeholder, awaits `pending`, then renders page 1.
    ///
    /// On failure the placeholder shows the error and the previous document
    /// and cursor are kept. Pointer input stays off until a page renders.
    pub async fn load_document<F>(&mut self, pending: F) -> ViewerResult<PageIndicator>
    where
        F: Future<Output = Result<D, DocumentLoadError>>,
    {
        let loading = self.config.loading_message.clone();
        self.show_placeholder(&loading);

        let document = match pending.await {
            Ok(document) if document.page_count() == 0 => Err(DocumentLoadError::Empty),
            other => other,
        };

        let document = match document {
            Ok(document) => document,
            Err(err) => {
                log::warn!("document load failed: {err}");
                self.show_placeholder(&err.to_string());
                return Err(err.into());
            }
        };

        let total = document.page_count();
        log::info!("loaded document with {total} pages");

        self.document = Some(Arc::new(document));
        self.cursor.reset(total);
        self.notify();

        match self.go_to_page(1).await? {
            NavigationOutcome::Rendered(indicator) => Ok(indicator),
            _ => Ok(self.cursor.indicator()),
        }
    }

    /// Replaces both layers with a message. Outstanding renders are orphaned
    /// and the overlay is emptied to the placeholder size.
    fn show_placeholder(&mut self, message: &str) {
        self.pipeline.invalidate();
        paint_message(&mut self.base, &self.config, message);
        self.overlay.blank(self.base.size());
    }

    pub async fn load_from<P>(&mut self, provider: &P, identifier: &str) -> ViewerResult<PageIndicator>
    where
        P: DocumentProvider<Document = D>,
    {
        self.load_document(provider.load(identifier)).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> ViewerResult<NavigationOutcome> {
        self.render_page(page).await
    }

    pub async fn next_page(&mut self) -> ViewerResult<NavigationOutcome> {
        self.go_to_page(self.cursor.next_target()).await
    }

    pub async fn prev_page(&mut self) -> ViewerResult<NavigationOutcome> {
        self.go_to_page(self.cursor.prev_target()).await
    }

    /// Full render cycle: fetch, paint base, resize overlay, replay.
    pub async fn render_page(&mut self, page: u32) -> ViewerResult<NavigationOutcome> {
        let pending = match self.request_page(page) {
            Ok(pending) => pending,
            Err(err) => {
                log::debug!("navigation ignored: {err}");
                return Ok(NavigationOutcome::Ignored(err));
            }
        };

        let fetched = pending.fetch().await;
        self.complete_render(fetched)
    }

    /// First half of a navigation. Validates `page` and issues a ticket; the
    /// returned handle fetches the page without borrowing the viewer.
    ///
    /// The cursor keeps pointing at the page on screen until the render
    /// completes. Dropping the handle abandons the navigation.
    pub fn request_page(&mut self, page: u32) -> Result<PendingRender<D>, InvalidNavigationError> {
        let Some(document) = self.document.as_ref() else {
            return Err(InvalidNavigationError { requested: page, page_count: 0 });
        };

        self.cursor.validate(page)?;
        self.overlay.cancel_capture();

        Ok(self.pipeline.request(page, Arc::clone(document)))
    }

    /// Second half of a navigation. Stale results are discarded; a failed
    /// page leaves the last good page visible and the cursor on it.
    pub fn complete_render(
        &mut self,
        fetched: FetchedPage<D::Page>,
    ) -> ViewerResult<NavigationOutcome> {
        match self.pipeline.complete(fetched, &mut self.base) {
            Ok(RenderStep::Painted(rendered)) => {
                self.overlay.sync(self.base.size(), rendered.page);
                if self.cursor.move_to(rendered.page).is_err() {
                    log::warn!("rendered page {} is outside the cursor range", rendered.page);
                }
                self.notify();
                Ok(NavigationOutcome::Rendered(self.cursor.indicator()))
            }
            Ok(RenderStep::Superseded(ticket)) => {
                Ok(NavigationOutcome::Superseded { page: ticket.page() })
            }
            Err(err) => {
                log::warn!("render failed: {err}");
                Err(ViewerError::Render(err))
            }
        }
    }

    pub fn current_page(&self) -> u32 {
        self.cursor.current()
    }

    pub fn total_pages(&self) -> u32 {
        self.cursor.total()
    }

    pub fn page_indicator(&self) -> PageIndicator {
        self.cursor.indicator()
    }

    /// Registers a closure called with every page-indicator update.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(PageIndicator) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self) {
        let indicator = self.cursor.indicator();
        for observer in &mut self.observers {
            observer(indicator);
        }
    }

    /// Selects a tool by name. Unknown names draw like a pen.
    pub fn set_tool(&mut self, tool: &str, color: Option<&str>) {
        self.set_tool_kind(ToolKind::from_name(tool), color);
    }

    pub fn set_tool_kind(&mut self, tool: ToolKind, color: Option<&str>) {
        if !self.config.editable {
            return;
        }

        let state = ToolState::select(tool, color);
        log::debug!("tool set to {} ({}, width {})", tool.as_str(), state.color, state.width);
        self.overlay.set_tool(state);
    }

    pub fn tool(&self) -> &ToolState {
        self.overlay.tool()
    }

    /// Single entry point for pointer input on the overlay.
    ///
    /// Ignored for read-only viewers, while a placeholder is showing, and
    /// while a navigation is in flight.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<&StrokeSegment> {
        if !self.config.editable
            || self.pipeline.last_rendered().is_none()
            || self.pipeline.in_flight().is_some()
        {
            return None;
        }

        self.overlay.handle(event, self.cursor.current())
    }

    pub fn get_annotations(&self) -> &AnnotationSet {
        self.overlay.annotations()
    }

    /// Replaces every stored segment and replays the current page.
    /// `None` clears the set.
    pub fn set_annotations(&mut self, annotations: impl Into<Option<AnnotationSet>>) {
        let annotations = annotations.into().unwrap_or_default();
        log::debug!("replacing annotations with {} segments", annotations.len());
        self.overlay.replace(annotations, self.cursor.current());
    }
}
