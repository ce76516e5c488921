//! Shared data model for the annotation viewer.
//!
//! Stroke coordinates live in overlay-surface pixel space. Nothing here
//! rescales them, so a stored segment only lines up with its page while the
//! page is rendered at the viewport it was captured on.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const BLACK: &str = "#000000";
pub const YELLOW: &str = "#ffff00";
pub const WHITE: &str = "#ffffff";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions a page is rendered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for ViewportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

impl LineStyle {
    pub fn new(color: impl Into<String>, width: f64, opacity: f64) -> Self {
        Self { color: color.into(), width, opacity }
    }
}

/// One straight piece of a freehand stroke.
///
/// Style is snapshotted from the tool at capture time, so later tool
/// changes never restyle a segment that is already stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeSegment {
    #[serde(alias = "page", deserialize_with = "page_number")]
    pub page_index: u32,
    pub start: Point,
    pub end: Point,
    pub color: String,
    pub width: f64,
    #[serde(default = "opaque", skip_serializing_if = "is_opaque")]
    pub opacity: f64,
}

fn page_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let page = u32::deserialize(deserializer)?;
    if page == 0 {
        return Err(de::Error::invalid_value(Unexpected::Unsigned(0), &"a 1-based page index"));
    }
    Ok(page)
}

fn opaque() -> f64 {
    1.0
}

fn is_opaque(opacity: &f64) -> bool {
    *opacity == 1.0
}

impl StrokeSegment {
    pub fn new(page_index: u32, start: Point, end: Point, style: &LineStyle) -> Self {
        Self {
            page_index,
            start,
            end,
            color: style.color.clone(),
            width: style.width,
            opacity: style.opacity,
        }
    }

    pub fn style(&self) -> LineStyle {
        LineStyle::new(self.color.clone(), self.width, self.opacity)
    }
}

/// Ordered stroke list. Later segments paint over earlier ones, which is
/// how the eraser works: it adds white segments instead of removing any.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet {
    segments: Vec<StrokeSegment>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: StrokeSegment) {
        self.segments.push(segment);
    }

    pub fn as_slice(&self) -> &[StrokeSegment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StrokeSegment> {
        self.segments.iter()
    }

    /// Segments recorded on `page_index`, in insertion order.
    pub fn for_page(&self, page_index: u32) -> impl Iterator<Item = &StrokeSegment> + '_ {
        self.segments.iter().filter(move |segment| segment.page_index == page_index)
    }

    pub fn last(&self) -> Option<&StrokeSegment> {
        self.segments.last()
    }

    pub fn into_vec(self) -> Vec<StrokeSegment> {
        self.segments
    }
}

impl From<Vec<StrokeSegment>> for AnnotationSet {
    fn from(segments: Vec<StrokeSegment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<StrokeSegment> for AnnotationSet {
    fn from_iter<I: IntoIterator<Item = StrokeSegment>>(iter: I) -> Self {
        Self { segments: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a StrokeSegment;
    type IntoIter = std::slice::Iter<'a, StrokeSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Pen,
    Highlighter,
    Eraser,
    #[default]
    Default,
}

impl ToolKind {
    /// Names match exactly. Anything else maps to `Default`, which draws
    /// like a pen.
    pub fn from_name(name: &str) -> Self {
        match name {
            "pen" => Self::Pen,
            "highlighter" => Self::Highlighter,
            "eraser" => Self::Eraser,
            _ => Self::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pen => "pen",
            Self::Highlighter => "highlighter",
            Self::Eraser => "eraser",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolState {
    pub tool: ToolKind,
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

impl Default for ToolState {
    fn default() -> Self {
        Self { tool: ToolKind::Default, color: BLACK.to_owned(), width: 2.0, opacity: 1.0 }
    }
}

impl ToolState {
    /// Resolves the style for `tool`. An empty or missing color falls back
    /// to the tool's own default; the eraser ignores the color entirely.
    pub fn select(tool: ToolKind, color: Option<&str>) -> Self {
        let color = color.map(str::trim).filter(|color| !color.is_empty());

        match tool {
            ToolKind::Pen => Self {
                tool,
                color: color.unwrap_or(BLACK).to_owned(),
                width: 2.0,
                opacity: 1.0,
            },
            ToolKind::Highlighter => Self {
                tool,
                color: color.unwrap_or(YELLOW).to_owned(),
                width: 10.0,
                opacity: 0.4,
            },
            ToolKind::Eraser => Self { tool, color: WHITE.to_owned(), width: 20.0, opacity: 1.0 },
            ToolKind::Default => Self::default(),
        }
    }

    pub fn line_style(&self) -> LineStyle {
        LineStyle::new(self.color.clone(), self.width, self.opacity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageIndicator {
    pub current: u32,
    pub total: u32,
}

impl fmt::Display for PageIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {} of {}", self.current, self.total)
    }
}
