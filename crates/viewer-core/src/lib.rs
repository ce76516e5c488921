//! Annotation-capable paged document viewer.
//!
//! [`PagedAnnotationViewer`] combines a page cursor, a render pipeline that
//! paints pages onto a base surface, and an overlay that captures freehand
//! strokes and replays them per page. Document parsing and pixel output are
//! supplied by the caller through [`DocumentHandle`] and [`Surface`].
//!
//! # Example
//!
//! ```
//! use futures::executor::block_on;
//! use viewer_core::{
//!     PagedAnnotationViewer, PlaceholderDocument, PlaceholderProvider, PointerEvent,
//!     RecordingSurface, ViewerConfig,
//! };
//! use doc_model::Point;
//!
//! let provider = PlaceholderProvider::new().with_document("worksheet.pdf", 3);
//! let mut viewer: PagedAnnotationViewer<PlaceholderDocument, RecordingSurface> =
//!     PagedAnnotationViewer::new(ViewerConfig::default());
//!
//! block_on(viewer.load_from(&provider, "worksheet.pdf")).unwrap();
//! block_on(viewer.go_to_page(2)).unwrap();
//!
//! viewer.handle_pointer(PointerEvent::Down(Point::new(10.0, 10.0)));
//! viewer.handle_pointer(PointerEvent::Move(Point::new(20.0, 10.0)));
//! viewer.handle_pointer(PointerEvent::Up);
//!
//! assert_eq!(viewer.get_annotations().len(), 1);
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod placeholder;
pub mod source;
pub mod surface;
pub mod viewer;

pub use config::ViewerConfig;
pub use cursor::DocumentCursor;
pub use error::{
    DocumentLoadError, InvalidNavigationError, PageRenderError, ViewerError, ViewerResult,
};
pub use overlay::{AnnotationOverlay, CaptureState, PointerEvent};
pub use pipeline::{
    FetchedPage, PendingRender, RenderPipeline, RenderStep, RenderTicket, RenderedPage,
};
pub use placeholder::{
    paint_message, PlaceholderDocument, PlaceholderPage, PlaceholderProvider,
    PLACEHOLDER_PAGE_SIZE,
};
pub use source::{DocumentHandle, DocumentProvider, PageHandle};
pub use surface::{DrawCommand, RecordingSurface, Rect, Surface, TextAlign, TextStyle};
pub use viewer::{NavigationOutcome, PagedAnnotationViewer};
