//! Render pipeline with generation-based supersession.
//!
//! Every navigation begins a new generation. A fetched page is only painted
//! if its ticket still carries the newest generation; anything older is
//! dropped, so a slow page 3 can never overwrite a page 5 that was asked for
//! later.
//!
//! Painting happens on a staged surface which replaces the base surface only
//! once the page has drawn successfully, so a failed draw never leaves a
//! half-painted page behind.
//!
//! A request counts as in flight only while its [`PendingRender`] (or the
//! [`FetchedPage`] it turns into) is alive. Dropping either abandons it.

use crate::error::PageRenderError;
use crate::source::{DocumentHandle, PageHandle};
use crate::surface::Surface;
use doc_model::ViewportSize;
use std::sync::{Arc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket {
    generation: u64,
    page: u32,
}

impl RenderTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page(&self) -> u32 {
        self.page
    }
}

/// A navigation that has been accepted but whose page is not fetched yet.
///
/// Holds its own reference to the document, so fetching does not borrow the
/// viewer and later navigations can be issued in the meantime.
#[derive(Debug)]
pub struct PendingRender<D> {
    ticket: RenderTicket,
    document: Arc<D>,
    claim: Arc<()>,
}

impl<D: DocumentHandle> PendingRender<D> {
    pub fn ticket(&self) -> RenderTicket {
        self.ticket
    }

    pub async fn fetch(self) -> FetchedPage<D::Page> {
        let result = self.document.get_page(self.ticket.page).await;
        FetchedPage { ticket: self.ticket, result, claim: self.claim }
    }
}

#[derive(Debug)]
pub struct FetchedPage<P> {
    ticket: RenderTicket,
    result: Result<P, PageRenderError>,
    claim: Arc<()>,
}

impl<P> FetchedPage<P> {
    pub fn ticket(&self) -> RenderTicket {
        self.ticket
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedPage {
    pub page: u32,
    pub viewport: ViewportSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStep {
    Painted(RenderedPage),
    Superseded(RenderTicket),
}

#[derive(Debug)]
struct InFlight {
    ticket: RenderTicket,
    claim: Weak<()>,
}

#[derive(Debug, Default)]
pub struct RenderPipeline {
    generation: u64,
    in_flight: Option<InFlight>,
    rendered: Option<RenderedPage>,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation for `page` of `document`.
    pub fn request<D: DocumentHandle>(&mut self, page: u32, document: Arc<D>) -> PendingRender<D> {
        self.generation += 1;
        let ticket = RenderTicket { generation: self.generation, page };
        let claim = Arc::new(());
        self.in_flight = Some(InFlight { ticket, claim: Arc::downgrade(&claim) });
        PendingRender { ticket, document, claim }
    }

    /// Drops every outstanding ticket and forgets the rendered page.
    /// Called when a placeholder replaces the page.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.rendered = None;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        ticket.generation == self.generation
    }

    /// The newest request, if its handle has not been dropped.
    pub fn in_flight(&self) -> Option<RenderTicket> {
        self.in_flight
            .as_ref()
            .filter(|in_flight| in_flight.claim.strong_count() > 0)
            .map(|in_flight| in_flight.ticket)
    }

    pub fn last_rendered(&self) -> Option<RenderedPage> {
        self.rendered
    }

    pub fn complete<P, S>(
        &mut self,
        fetched: FetchedPage<P>,
        base: &mut S,
    ) -> Result<RenderStep, PageRenderError>
    where
        P: PageHandle,
        S: Surface + Default,
    {
        let FetchedPage { ticket, result, .. } = fetched;

        if !self.is_current(ticket) {
            log::warn!(
                "discarding render of page {} (generation {} superseded by {})",
                ticket.page,
                ticket.generation,
                self.generation
            );
            return Ok(RenderStep::Superseded(ticket));
        }

        self.in_flight = None;
        let page = result?;
        let viewport = page.viewport_size();

        let mut staged = S::default();
        staged.resize(viewport);
        page.draw(&mut staged, viewport)?;
        *base = staged;

        let rendered = RenderedPage { page: ticket.page, viewport };
        self.rendered = Some(rendered);
        log::debug!("rendered page {} at {}", ticket.page, viewport);

        Ok(RenderStep::Painted(rendered))
    }
}
