//! Error types for document loading, page rendering and navigation.
//!
//! None of these are fatal to a viewer. A failed load or render leaves the
//! viewer usable; callers recover by navigating again or reloading.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentLoadError {
    #[error("document source unreachable: {0}")]
    Unreachable(String),
    #[error("document could not be parsed: {0}")]
    Unparseable(String),
    #[error("document has no pages")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRenderError {
    #[error("page {page} could not be fetched: {reason}")]
    Fetch { page: u32, reason: String },
    #[error("page {page} failed to draw: {reason}")]
    Draw { page: u32, reason: String },
}

impl PageRenderError {
    pub fn page(&self) -> u32 {
        match self {
            Self::Fetch { page, .. } | Self::Draw { page, .. } => *page,
        }
    }
}

/// Navigation target outside `1..=page_count`. Reported, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("page {requested} out of range (page_count={page_count})")]
pub struct InvalidNavigationError {
    pub requested: u32,
    pub page_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Load(#[from] DocumentLoadError),
    #[error(transparent)]
    Render(#[from] PageRenderError),
}

pub type ViewerResult<T> = Result<T, ViewerError>;
