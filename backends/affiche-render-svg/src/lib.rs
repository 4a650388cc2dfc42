//! Vector/preview renderer: the element list becomes a scalable SVG tree.
//!
//! The preview surface keeps text as text and images as references, so the
//! artifact stays small and scales with its viewport. Fit/fill placement is
//! expressed through `preserveAspectRatio` (`meet` letterboxes, `slice`
//! cover-crops): the viewer performs the same crop the raster backend
//! computes explicitly, from the same alignment.
//!
//! Node order in the tree is paint order, matching the other surfaces.

use std::sync::Arc;

use base64::Engine as _;
use futures::future::BoxFuture;
use futures::FutureExt;

use affiche_core::element::{ImageElement, ImageSource, RenderElement, TextContainer};
use affiche_core::error::{FontError, Result};
use affiche_core::render::{check_dimensions, Renderer};
use affiche_core::text::{approximate_line, stack_lines, MeasuredLine, TextMeasurer};
use affiche_core::{Color, HorizontalAlign, Rect, ScaleStrategy, VerticalAlign};

/// One drawable node of the preview tree.
///
/// Every node carries the key of the element it came from, so an embedding
/// view can reconcile nodes across re-renders instead of rebuilding.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorNode {
    Rect {
        key: String,
        rect: Rect,
        fill: Color,
    },
    Image {
        key: String,
        href: String,
        frame: Rect,
        preserve_aspect_ratio: String,
    },
    Text {
        key: String,
        x: f32,
        y: f32,
        anchor: &'static str,
        font_family: String,
        font_size: f32,
        fill: Color,
        content: String,
    },
}

impl VectorNode {
    pub fn key(&self) -> &str {
        match self {
            Self::Rect { key, .. } | Self::Image { key, .. } | Self::Text { key, .. } => key,
        }
    }
}

/// The preview artifact: a sized tree with a scalable viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorTree {
    width: f32,
    height: f32,
    nodes: Vec<VectorNode>,
}

impl VectorTree {
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn nodes(&self) -> &[VectorNode] {
        &self.nodes
    }

    /// Serialize to an SVG document. The root carries `width="100%"` plus a
    /// `viewBox`, so the document scales to whatever it is embedded in.
    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" viewBox="0 0 {} {}">"#,
            fmt_f32(self.width),
            fmt_f32(self.height)
        );
        svg.push('\n');
        for node in &self.nodes {
            match node {
                VectorNode::Rect { key, rect, fill } => {
                    svg.push_str(&format!(
                        r#"  <rect id="{}" x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                        escape_xml(key),
                        fmt_f32(rect.x),
                        fmt_f32(rect.y),
                        fmt_f32(rect.width),
                        fmt_f32(rect.height),
                        fill.to_css()
                    ));
                }
                VectorNode::Image {
                    key,
                    href,
                    frame,
                    preserve_aspect_ratio,
                } => {
                    svg.push_str(&format!(
                        r#"  <image id="{}" href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="{}"/>"#,
                        escape_xml(key),
                        escape_xml(href),
                        fmt_f32(frame.x),
                        fmt_f32(frame.y),
                        fmt_f32(frame.width),
                        fmt_f32(frame.height),
                        preserve_aspect_ratio
                    ));
                }
                VectorNode::Text {
                    key,
                    x,
                    y,
                    anchor,
                    font_family,
                    font_size,
                    fill,
                    content,
                } => {
                    svg.push_str(&format!(
                        r#"  <text id="{}" x="{}" y="{}" text-anchor="{}" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
                        escape_xml(key),
                        fmt_f32(*x),
                        fmt_f32(*y),
                        anchor,
                        escape_xml(font_family),
                        fmt_f32(*font_size),
                        fill.to_css(),
                        escape_xml(content)
                    ));
                }
            }
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}

/// The vector/preview backend.
///
/// Needs a measurer only for text backgrounds and baselines; image elements
/// never resolve their bytes here (locations pass through as references).
pub struct SvgRenderer {
    measurer: Arc<dyn TextMeasurer>,
}

impl SvgRenderer {
    pub fn new(measurer: Arc<dyn TextMeasurer>) -> Self {
        Self { measurer }
    }

    fn push_image(&self, nodes: &mut Vec<VectorNode>, image: &ImageElement) {
        let Some(source) = &image.source else {
            return;
        };

        if let Some(background) = image.background {
            nodes.push(VectorNode::Rect {
                key: format!("{}-bg", image.key),
                rect: background.expand(image.frame),
                fill: background.fill,
            });
        }

        nodes.push(VectorNode::Image {
            key: image.key.clone(),
            href: image_href(source),
            frame: image.frame,
            preserve_aspect_ratio: preserve_aspect_ratio(
                image.horizontal_align,
                image.vertical_align,
                image.scale,
            ),
        });
    }

    async fn push_text(&self, nodes: &mut Vec<VectorNode>, text: &TextContainer) -> Result<()> {
        if text.is_blank() {
            return Ok(());
        }

        let mut metrics = Vec::with_capacity(text.lines.len());
        for line in &text.lines {
            metrics.push(self.measure_line(&line.font_family, line.font_size, &line.text).await?);
        }

        let layout = stack_lines(&metrics, text.anchor, text.horizontal_align, text.distribution);

        if let Some(background) = text.background {
            nodes.push(VectorNode::Rect {
                key: format!("{}-bg", text.key),
                rect: background.expand(layout.bounds),
                fill: background.fill,
            });
        }

        let anchor = match text.horizontal_align {
            HorizontalAlign::Left => "start",
            HorizontalAlign::Center => "middle",
            HorizontalAlign::Right => "end",
        };
        for (index, (line, placed)) in text.lines.iter().zip(&layout.lines).enumerate() {
            nodes.push(VectorNode::Text {
                key: format!("{}-{}", text.key, index),
                x: text.anchor.x,
                y: placed.baseline,
                anchor,
                font_family: line.font_family.clone(),
                font_size: line.font_size,
                fill: line.color,
                content: line.text.clone(),
            });
        }
        Ok(())
    }

    async fn measure_line(&self, family: &str, size: f32, text: &str) -> Result<MeasuredLine> {
        match self.measurer.measure(family, size, text).await {
            Ok(measured) => Ok(measured),
            // The preview keeps working on a generic face when the family
            // has no resolvable source; the viewer substitutes its own.
            Err(FontError::UnsupportedFamily(family)) => {
                log::warn!("font '{family}' not resolvable, preview falls back to generic metrics");
                Ok(approximate_line(size, text))
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl Renderer for SvgRenderer {
    type Artifact = VectorTree;

    fn render<'a>(
        &'a self,
        width: f32,
        height: f32,
        elements: &'a [RenderElement],
    ) -> BoxFuture<'a, Result<VectorTree>> {
        async move {
            check_dimensions(width, height)?;
            log::debug!("svg render {}x{} with {} elements", width, height, elements.len());

            let mut nodes = Vec::new();
            for element in elements {
                match element {
                    RenderElement::Image(image) => self.push_image(&mut nodes, image),
                    RenderElement::Text(text) => self.push_text(&mut nodes, text).await?,
                }
            }
            Ok(VectorTree {
                width,
                height,
                nodes,
            })
        }
        .boxed()
    }
}

fn image_href(source: &ImageSource) -> String {
    match source {
        ImageSource::Location(location) => location.clone(),
        ImageSource::Bytes(bytes) => {
            let mime = sniff_mime(bytes);
            let payload = base64::engine::general_purpose::STANDARD.encode(bytes.as_slice());
            format!("data:{mime};base64,{payload}")
        }
    }
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

fn preserve_aspect_ratio(
    horizontal: HorizontalAlign,
    vertical: VerticalAlign,
    scale: ScaleStrategy,
) -> String {
    let x = match horizontal {
        HorizontalAlign::Left => "xMin",
        HorizontalAlign::Center => "xMid",
        HorizontalAlign::Right => "xMax",
    };
    let y = match vertical {
        VerticalAlign::Top => "YMin",
        VerticalAlign::Center => "YMid",
        VerticalAlign::Bottom => "YMax",
    };
    let mode = match scale {
        ScaleStrategy::Fit => "meet",
        ScaleStrategy::Fill => "slice",
    };
    format!("{x}{y} {mode}")
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Trim trailing zeros without losing precision for whole numbers.
fn fmt_f32(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e7 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}
