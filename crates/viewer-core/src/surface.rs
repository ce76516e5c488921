//! Drawing surface abstraction.
//!
//! The viewer paints through [`Surface`] and never touches pixels itself.
//! [`RecordingSurface`] keeps the draw calls as data, which is what tests
//! and headless callers inspect.

use doc_model::{LineStyle, Point, ViewportSize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn covering(size: ViewportSize) -> Self {
        Self::new(0.0, 0.0, size.width as f64, size.height as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_px: f64,
    pub color: String,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn centered(font_px: f64, color: impl Into<String>) -> Self {
        Self { font_px, color: color.into(), align: TextAlign::Center }
    }
}

/// A resizable 2D drawing target.
pub trait Surface {
    fn size(&self) -> ViewportSize;

    /// Sets the pixel dimensions. Existing content is discarded.
    fn resize(&mut self, size: ViewportSize);

    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: &str);

    fn draw_line(&mut self, start: Point, end: Point, style: &LineStyle);

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);

    fn stroke_rect(&mut self, rect: Rect, style: &LineStyle) {
        let top_left = Point::new(rect.x, rect.y);
        let top_right = Point::new(rect.x + rect.width, rect.y);
        let bottom_right = Point::new(rect.x + rect.width, rect.y + rect.height);
        let bottom_left = Point::new(rect.x, rect.y + rect.height);

        self.draw_line(top_left, top_right, style);
        self.draw_line(top_right, bottom_right, style);
        self.draw_line(bottom_right, bottom_left, style);
        self.draw_line(bottom_left, top_left, style);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: String },
    Line { start: Point, end: Point, style: LineStyle },
    Text { text: String, at: Point, style: TextStyle },
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    size: ViewportSize,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn lines(&self) -> impl Iterator<Item = (Point, Point, &LineStyle)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { start, end, style } => Some((*start, *end, style)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn is_blank(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> ViewportSize {
        self.size
    }

    fn resize(&mut self, size: ViewportSize) {
        self.size = size;
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCommand::FillRect { rect, color: color.to_owned() });
    }

    fn draw_line(&mut self, start: Point, end: Point, style: &LineStyle) {
        self.commands.push(DrawCommand::Line { start, end, style: style.clone() });
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            at,
            style: style.clone(),
        });
    }
}
