//! Placeholder painting and the demo document.
//!
//! `paint_message` covers the loading and load-failure states.
//! [`PlaceholderDocument`] stands in for a real rendering engine: every page
//! is a blank 800x1100 sheet with a border and a caption.

use crate::config::ViewerConfig;
use crate::error::{DocumentLoadError, PageRenderError};
use crate::source::{DocumentHandle, DocumentProvider, PageHandle};
use crate::surface::{Rect, Surface, TextStyle};
use doc_model::{LineStyle, Point, ViewportSize, BLACK, WHITE};
use std::collections::{BTreeSet, HashMap};

pub const PLACEHOLDER_PAGE_SIZE: ViewportSize = ViewportSize { width: 800, height: 1100 };

const BORDER_COLOR: &str = "#dddddd";
const BORDER_INSET: f64 = 10.0;

/// Replaces the surface content with a centred message.
pub fn paint_message<S: Surface + ?Sized>(surface: &mut S, config: &ViewerConfig, message: &str) {
    let size = config.placeholder_size;
    surface.resize(size);
    surface.fill_rect(Rect::covering(size), &config.background);
    surface.fill_text(
        message,
        Point::new(size.width as f64 / 2.0, size.height as f64 / 2.0),
        &TextStyle::centered(config.placeholder_font_px, BLACK),
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderDocument {
    page_count: u32,
    broken_pages: BTreeSet<u32>,
}

impl PlaceholderDocument {
    pub fn new(page_count: u32) -> Self {
        Self { page_count, broken_pages: BTreeSet::new() }
    }

    /// Makes `get_page(page)` fail, for exercising render-error paths.
    pub fn with_broken_page(mut self, page: u32) -> Self {
        self.broken_pages.insert(page);
        self
    }
}

impl DocumentHandle for PlaceholderDocument {
    type Page = PlaceholderPage;

    fn page_count(&self) -> u32 {
        self.page_count
    }

    async fn get_page(&self, page: u32) -> Result<PlaceholderPage, PageRenderError> {
        if page == 0 || page > self.page_count {
            return Err(PageRenderError::Fetch {
                page,
                reason: format!("document has {} pages", self.page_count),
            });
        }

        if self.broken_pages.contains(&page) {
            return Err(PageRenderError::Fetch { page, reason: "page data unavailable".to_owned() });
        }

        Ok(PlaceholderPage { number: page, viewport: PLACEHOLDER_PAGE_SIZE })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderPage {
    number: u32,
    viewport: ViewportSize,
}

impl PageHandle for PlaceholderPage {
    fn viewport_size(&self) -> ViewportSize {
        self.viewport
    }

    fn draw(
        &self,
        surface: &mut dyn Surface,
        viewport: ViewportSize,
    ) -> Result<(), PageRenderError> {
        if surface.size() != viewport {
            return Err(PageRenderError::Draw {
                page: self.number,
                reason: format!("surface is {}, expected {}", surface.size(), viewport),
            });
        }

        let width = viewport.width as f64;
        let height = viewport.height as f64;

        surface.fill_rect(Rect::covering(viewport), WHITE);
        surface.stroke_rect(
            Rect::new(
                BORDER_INSET,
                BORDER_INSET,
                width - 2.0 * BORDER_INSET,
                height - 2.0 * BORDER_INSET,
            ),
            &LineStyle::new(BORDER_COLOR, 1.0, 1.0),
        );

        let center = width / 2.0;
        surface.fill_text(
            &format!("Page {} of PDF Document", self.number),
            Point::new(center, 50.0),
            &TextStyle::centered(24.0, BLACK),
        );

        let body = TextStyle::centered(16.0, BLACK);
        surface.fill_text("This is a placeholder for PDF content", Point::new(center, 100.0), &body);
        surface.fill_text(
            "In a real implementation, actual PDF content would be rendered here",
            Point::new(center, 130.0),
            &body,
        );

        Ok(())
    }
}

/// Resolves identifiers registered with [`PlaceholderProvider::with_document`].
#[derive(Debug, Clone, Default)]
pub struct PlaceholderProvider {
    documents: HashMap<String, PlaceholderDocument>,
}

impl PlaceholderProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, identifier: impl Into<String>, page_count: u32) -> Self {
        self.documents.insert(identifier.into(), PlaceholderDocument::new(page_count));
        self
    }

    pub fn with_handle(mut self, identifier: impl Into<String>, document: PlaceholderDocument) -> Self {
        self.documents.insert(identifier.into(), document);
        self
    }
}

impl DocumentProvider for PlaceholderProvider {
    type Document = PlaceholderDocument;

    async fn load(&self, identifier: &str) -> Result<PlaceholderDocument, DocumentLoadError> {
        self.documents
            .get(identifier)
            .cloned()
            .ok_or_else(|| DocumentLoadError::Unreachable(identifier.to_owned()))
    }
}
