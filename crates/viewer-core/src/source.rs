//! Collaborator traits for the document-rendering engine.
//!
//! The viewer never parses documents. A provider resolves an identifier to a
//! [`DocumentHandle`], the handle hands out [`PageHandle`]s on demand, and a
//! page draws itself onto a surface sized to its viewport.

use crate::error::{DocumentLoadError, PageRenderError};
use crate::surface::Surface;
use doc_model::ViewportSize;
use std::future::Future;

pub trait DocumentProvider {
    type Document: DocumentHandle;

    fn load(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Self::Document, DocumentLoadError>>;
}

pub trait DocumentHandle {
    type Page: PageHandle;

    fn page_count(&self) -> u32;

    /// Fetches the 1-based `page`. Pages are requested fresh per navigation.
    fn get_page(&self, page: u32) -> impl Future<Output = Result<Self::Page, PageRenderError>>;
}

pub trait PageHandle {
    fn viewport_size(&self) -> ViewportSize;

    /// Paints the page. `surface` has already been sized to `viewport`.
    fn draw(&self, surface: &mut dyn Surface, viewport: ViewportSize)
        -> Result<(), PageRenderError>;
}
