//! Glyph outline extraction for the raster surface.
//!
//! skrifa hands out outlines in font space (y up, origin at the baseline);
//! the pen flips them into surface space while appending to one path per
//! line, so a whole line fills in a single rasterizer pass.

use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{GlyphId, MetadataProvider};
use tiny_skia::PathBuilder;

use affiche_core::error::FontError;
use affiche_fonts::FontData;

/// Build the filled outline path for one line of text.
///
/// The path starts at `origin_x` with its baseline on `baseline`. Returns
/// `None` when nothing in the line has an outline (all whitespace).
pub fn line_path(
    font: &FontData,
    size: f32,
    text: &str,
    origin_x: f32,
    baseline: f32,
) -> Result<Option<tiny_skia::Path>, FontError> {
    let font_ref = skrifa::FontRef::new(font.bytes()).map_err(|_| FontError::InvalidData {
        family: font.family().to_owned(),
    })?;

    let font_size = Size::new(size);
    let location = LocationRef::default();
    let charmap = font_ref.charmap();
    let glyph_metrics = font_ref.glyph_metrics(font_size, location);
    let outlines = font_ref.outline_glyphs();

    let mut builder = PathBuilder::new();
    let mut cursor = origin_x;
    for ch in text.chars() {
        let glyph_id = charmap.map(ch).unwrap_or(GlyphId::new(0));
        if let Some(glyph) = outlines.get(glyph_id) {
            let mut pen = SurfacePen {
                builder: &mut builder,
                dx: cursor,
                dy: baseline,
            };
            glyph
                .draw(DrawSettings::unhinted(font_size, location), &mut pen)
                .map_err(|_| FontError::InvalidData {
                    family: font.family().to_owned(),
                })?;
        }
        cursor += glyph_metrics.advance_width(glyph_id).unwrap_or(0.0);
    }

    Ok(builder.finish())
}

/// Flips font-space outlines into surface space at a fixed offset.
struct SurfacePen<'a> {
    builder: &'a mut PathBuilder,
    dx: f32,
    dy: f32,
}

impl OutlinePen for SurfacePen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.dx + x, self.dy - y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.dx + x, self.dy - y);
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.builder
            .quad_to(self.dx + cx, self.dy - cy, self.dx + x, self.dy - y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.dx + cx0,
            self.dy - cy0,
            self.dx + cx1,
            self.dy - cy1,
            self.dx + x,
            self.dy - y,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
