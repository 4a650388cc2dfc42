//! Text block layout: measurement contract and line stacking.
//!
//! Measurement is a backend concern (each surface has its own way of asking
//! a font how wide a string runs), so it hides behind [`TextMeasurer`]; the
//! stacking math on top of the measurements is shared, which is what keeps
//! the three surfaces agreeing on where every line lands.

use futures::future::BoxFuture;

use crate::error::FontError;
use crate::{HorizontalAlign, LineDistribution, Point, Rect};

/// Extents of one rendered line at a given font size.
///
/// `height` is the line's vertical footprint in the stack; `ascent` is the
/// distance from the line's top to its baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredLine {
    pub width: f32,
    pub height: f32,
    pub ascent: f32,
}

/// Asynchronous line measurement against real font data.
///
/// Resolving a family may suspend on a font fetch; concurrent requests for
/// one family share a single fetch (see the font store).
pub trait TextMeasurer: Send + Sync {
    fn measure(
        &self,
        family: &str,
        size: f32,
        text: &str,
    ) -> BoxFuture<'_, Result<MeasuredLine, FontError>>;
}

/// Generic-face approximation for surfaces that degrade gracefully when a
/// family cannot be resolved: 0.6em per character, baseline at 0.8em.
pub fn approximate_line(size: f32, text: &str) -> MeasuredLine {
    MeasuredLine {
        width: text.chars().count() as f32 * size * 0.6,
        height: size,
        ascent: size * 0.8,
    }
}

/// One line placed on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedLine {
    /// Left edge of the line.
    pub x: f32,
    /// Top of the line's footprint.
    pub top: f32,
    /// Baseline y, where all three surfaces actually draw.
    pub baseline: f32,
    pub width: f32,
    pub height: f32,
}

/// A stacked block of placed lines plus its aggregate bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlockLayout {
    pub lines: Vec<PlacedLine>,
    /// Tight bounds of the block: min line x, max line width, total height.
    /// Background fills expand this by their padding.
    pub bounds: Rect,
}

/// Stack measured lines against an anchor.
///
/// The first line's top starts at the anchor for `Down`, the whole block
/// ends at the anchor for `Up`, and is centered on it for `Center`. Each
/// subsequent line stacks immediately below the previous one using its own
/// measured height, so mixed sizes across lines work. Horizontal placement
/// is per line: the anchor x is the left edge, right edge, or center of
/// each line depending on alignment.
pub fn stack_lines(
    metrics: &[MeasuredLine],
    anchor: Point,
    horizontal: HorizontalAlign,
    distribution: LineDistribution,
) -> TextBlockLayout {
    let total_height: f32 = metrics.iter().map(|m| m.height).sum();

    let mut top = match distribution {
        LineDistribution::Down => anchor.y,
        LineDistribution::Up => anchor.y - total_height,
        LineDistribution::Center => anchor.y - total_height / 2.0,
    };
    let block_top = top;

    let mut lines = Vec::with_capacity(metrics.len());
    let mut min_x = f32::INFINITY;
    let mut max_width = 0.0f32;

    for metric in metrics {
        let x = match horizontal {
            HorizontalAlign::Left => anchor.x,
            HorizontalAlign::Center => anchor.x - metric.width / 2.0,
            HorizontalAlign::Right => anchor.x - metric.width,
        };
        lines.push(PlacedLine {
            x,
            top,
            baseline: top + metric.ascent,
            width: metric.width,
            height: metric.height,
        });
        min_x = min_x.min(x);
        max_width = max_width.max(metric.width);
        top += metric.height;
    }

    let bounds = if lines.is_empty() {
        Rect::new(anchor.x, block_top, 0.0, 0.0)
    } else {
        Rect::new(min_x, block_top, max_width, total_height)
    };

    TextBlockLayout { lines, bounds }
}
