//! Line measurement against parsed font data.
//!
//! All backends measure through here with the same family/size/text inputs,
//! which is the invariant that keeps layout identical across surfaces. A
//! line's vertical footprint is its font size; the baseline sits at the
//! font's scaled ascent below the line top.

use skrifa::instance::{LocationRef, Size};
use skrifa::{GlyphId, MetadataProvider};

use affiche_core::error::FontError;
use affiche_core::text::MeasuredLine;

use crate::FontData;

/// Measure one line of text at `size` pixels.
///
/// Characters the font does not map fall back to the `.notdef` glyph's
/// advance, mirroring what the glyph renderers will draw.
pub fn measure_line(font: &FontData, size: f32, text: &str) -> Result<MeasuredLine, FontError> {
    let font_ref = parse(font)?;
    let font_size = Size::new(size);
    let location = LocationRef::default();

    let charmap = font_ref.charmap();
    let glyph_metrics = font_ref.glyph_metrics(font_size, location);

    let mut width = 0.0;
    for ch in text.chars() {
        let glyph_id = charmap.map(ch).unwrap_or(GlyphId::new(0));
        width += glyph_metrics.advance_width(glyph_id).unwrap_or(0.0);
    }

    let metrics = font_ref.metrics(font_size, location);
    Ok(MeasuredLine {
        width,
        height: size,
        ascent: metrics.ascent,
    })
}

/// Baseline offset (scaled ascent) for a family at `size` pixels.
pub fn ascent(font: &FontData, size: f32) -> Result<f32, FontError> {
    let font_ref = parse(font)?;
    Ok(font_ref
        .metrics(Size::new(size), LocationRef::default())
        .ascent)
}

fn parse<'a>(font: &'a FontData) -> Result<skrifa::FontRef<'a>, FontError> {
    skrifa::FontRef::new(font.bytes()).map_err(|_| FontError::InvalidData {
        family: font.family().to_owned(),
    })
}
