//! Pixel-backed surface for PNG output.
//!
//! Drawing goes through a `tiny_skia::Pixmap`: lines are round-capped
//! strokes painted at the stroke opacity. There is no font rasterizer, so
//! text calls are dropped. Pixels become an `RgbaImage` only when composed
//! for saving.

use doc_model::{LineStyle, Point, ViewportSize};
use image::{Rgba, RgbaImage};
use tiny_skia::{
    Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};
use viewer_core::{Rect, Surface, TextStyle};

/// A zero-sized surface holds no pixmap.
#[derive(Debug, Clone, Default)]
pub struct RasterSurface {
    pixmap: Option<Pixmap>,
}

impl RasterSurface {
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let color = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Rgba([color.red(), color.green(), color.blue(), color.alpha()]))
    }

    pub fn to_image(&self) -> RgbaImage {
        let size = self.size();
        RgbaImage::from_fn(size.width, size.height, |x, y| {
            self.pixel(x, y).unwrap_or(Rgba([0, 0, 0, 0]))
        })
    }

    /// Stacks `overlay` on a copy of `base`, as the two layers appear on screen.
    pub fn composite(base: &RasterSurface, overlay: &RasterSurface) -> RgbaImage {
        let mut out = base.clone();
        if let (Some(target), Some(layer)) = (out.pixmap.as_mut(), overlay.pixmap.as_ref()) {
            target.draw_pixmap(
                0,
                0,
                layer.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
        out.to_image()
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> ViewportSize {
        self.pixmap
            .as_ref()
            .map(|pixmap| ViewportSize::new(pixmap.width(), pixmap.height()))
            .unwrap_or_default()
    }

    fn resize(&mut self, size: ViewportSize) {
        self.pixmap = Pixmap::new(size.width, size.height);
    }

    fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(Color::TRANSPARENT);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(rect) = tiny_skia::Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) else {
            return;
        };

        let [r, g, b] = parse_color(color);
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, 255);

        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn draw_line(&mut self, start: Point, end: Point, style: &LineStyle) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(start.x as f32, start.y as f32);
        pb.line_to(end.x as f32, end.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };

        let [r, g, b] = parse_color(&style.color);
        let alpha = (style.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, alpha);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: style.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn fill_text(&mut self, text: &str, _at: Point, _style: &TextStyle) {
        log::debug!("raster surface skips text {text:?}");
    }
}

/// Accepts `#rgb`, `#rrggbb` and a few CSS names. Anything else is black.
pub fn parse_color(color: &str) -> [u8; 3] {
    let color = color.trim();

    match color.to_ascii_lowercase().as_str() {
        "white" => return [255, 255, 255],
        "black" => return [0, 0, 0],
        "yellow" => return [255, 255, 0],
        "red" => return [255, 0, 0],
        _ => {}
    }

    let Some(hex) = color.strip_prefix('#') else {
        log::warn!("unsupported color {color:?}, drawing black");
        return [0, 0, 0];
    };

    let parsed = match hex.len() {
        _ if !hex.is_ascii() => None,
        3 => hex
            .chars()
            .map(|ch| ch.to_digit(16).map(|digit| (digit * 17) as u8))
            .collect::<Option<Vec<u8>>>(),
        6 => (0..3)
            .map(|index| u8::from_str_radix(&hex[index * 2..index * 2 + 2], 16).ok())
            .collect::<Option<Vec<u8>>>(),
        _ => None,
    };

    match parsed.as_deref() {
        Some(&[r, g, b]) => [r, g, b],
        _ => {
            log::warn!("unsupported color {color:?}, drawing black");
            [0, 0, 0]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn sized(width: u32, height: u32) -> RasterSurface {
        let mut surface = RasterSurface::default();
        surface.resize(ViewportSize::new(width, height));
        surface
    }

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(parse_color("#ff0000"), [255, 0, 0]);
        assert_eq!(parse_color("#0f0"), [0, 255, 0]);
        assert_eq!(parse_color("white"), [255, 255, 255]);
        assert_eq!(parse_color("#zzzzzz"), [0, 0, 0]);
        assert_eq!(parse_color("teal"), [0, 0, 0]);
    }

    #[test]
    fn default_surface_is_empty() {
        let surface = RasterSurface::default();
        assert_eq!(surface.size(), ViewportSize::new(0, 0));
        assert_eq!(surface.pixel(0, 0), None);
        assert_eq!(surface.to_image().dimensions(), (0, 0));
    }

    #[test]
    fn line_covers_its_width() {
        let mut surface = sized(40, 40);
        surface.draw_line(
            Point::new(5.0, 20.0),
            Point::new(35.0, 20.0),
            &LineStyle::new("#ff0000", 4.0, 1.0),
        );

        assert_eq!(surface.pixel(20, 19), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(surface.pixel(20, 30), Some(TRANSPARENT));
    }

    #[test]
    fn round_caps_extend_past_the_endpoints() {
        let mut surface = sized(40, 40);
        surface.draw_line(
            Point::new(10.0, 20.0),
            Point::new(30.0, 20.0),
            &LineStyle::new("#000000", 10.0, 1.0),
        );

        let cap = surface.pixel(7, 20).expect("pixel in bounds");
        assert_eq!(cap.0[3], 255);
        assert_eq!(surface.pixel(2, 20), Some(TRANSPARENT));
    }

    #[test]
    fn translucent_line_blends_over_page() {
        let mut base = sized(20, 20);
        base.fill_rect(Rect::covering(base.size()), "#ffffff");
        let mut overlay = sized(20, 20);
        overlay.draw_line(
            Point::new(0.0, 10.0),
            Point::new(20.0, 10.0),
            &LineStyle::new("#ffff00", 10.0, 0.4),
        );

        let composed = RasterSurface::composite(&base, &overlay);
        let pixel = composed.get_pixel(10, 10);

        assert!(pixel.0[0] >= 254 && pixel.0[1] >= 254, "red/green {:?}", pixel.0);
        assert!(pixel.0[2] < 255 && pixel.0[2] > 100, "blue channel {}", pixel.0[2]);
        assert_eq!(pixel.0[3], 255);
    }

    #[test]
    fn clear_and_resize_reset_pixels() {
        let mut surface = sized(4, 4);
        surface.fill_rect(Rect::covering(surface.size()), "#000000");
        assert_eq!(surface.pixel(1, 1), Some(Rgba([0, 0, 0, 255])));

        surface.clear();
        assert_eq!(surface.pixel(1, 1), Some(TRANSPARENT));

        surface.resize(ViewportSize::new(2, 3));
        assert_eq!(surface.size(), ViewportSize::new(2, 3));
        assert_eq!(surface.pixel(2, 0), None);
    }
}
