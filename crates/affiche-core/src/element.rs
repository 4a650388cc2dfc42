//! The declarative render element model.
//!
//! An element says *what* to draw and *where*; it never draws anything
//! itself. Backends dispatch over the closed [`RenderElement`] set, so the
//! whole vocabulary of the system is visible right here: positioned images
//! and anchored text blocks, nothing else.

use std::sync::Arc;

use crate::{
    Background, Color, HorizontalAlign, LineDistribution, Point, Rect, ScaleStrategy,
    VerticalAlign,
};

/// Where an image's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A location resolved through the render's [`crate::assets::AssetSource`]
    /// (relative asset path, URL, or a `data:` URL passed through verbatim).
    Location(String),
    /// Bytes already in hand (user uploads, cropped picture data).
    Bytes(Arc<Vec<u8>>),
}

impl ImageSource {
    /// Build a source from an href-style string; empty means "no image".
    pub fn from_href(href: &str) -> Option<Self> {
        if href.is_empty() {
            None
        } else {
            Some(Self::Location(href.to_owned()))
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::Bytes(Arc::new(bytes))
    }
}

/// A positioned image slot.
///
/// The `key` is stable across re-renders; the vector backend carries it on
/// its nodes as a reconciliation hint. An absent `source` renders nothing in
/// every backend and never touches the asynchronous resource path.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub key: String,
    pub source: Option<ImageSource>,
    pub frame: Rect,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub scale: ScaleStrategy,
    pub background: Option<Background>,
}

impl ImageElement {
    pub fn new(key: impl Into<String>, source: Option<ImageSource>, frame: Rect) -> Self {
        Self {
            key: key.into(),
            source,
            frame,
            horizontal_align: HorizontalAlign::default(),
            vertical_align: VerticalAlign::default(),
            scale: ScaleStrategy::default(),
            background: None,
        }
    }

    pub fn with_alignment(mut self, horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        self.horizontal_align = horizontal;
        self.vertical_align = vertical;
        self
    }

    pub fn with_scale(mut self, scale: ScaleStrategy) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }
}

/// One styled line inside a [`TextContainer`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
    pub color: Color,
}

impl TextLine {
    pub fn new(
        text: impl Into<String>,
        font_family: impl Into<String>,
        font_size: f32,
        color: Color,
    ) -> Self {
        Self {
            text: text.into(),
            font_family: font_family.into(),
            font_size,
            color,
        }
    }
}

/// An anchored block of stacked text lines.
///
/// The anchor's vertical meaning is set by `distribution` (top of the block,
/// bottom of it, or its center); horizontal alignment is relative to
/// `anchor.x` per line. A container whose every line is empty renders
/// nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct TextContainer {
    pub key: String,
    pub lines: Vec<TextLine>,
    pub anchor: Point,
    pub horizontal_align: HorizontalAlign,
    pub distribution: LineDistribution,
    pub background: Option<Background>,
}

impl TextContainer {
    pub fn new(key: impl Into<String>, lines: Vec<TextLine>, anchor: Point) -> Self {
        Self {
            key: key.into(),
            lines,
            anchor,
            horizontal_align: HorizontalAlign::Left,
            distribution: LineDistribution::default(),
            background: None,
        }
    }

    pub fn with_alignment(mut self, horizontal: HorizontalAlign) -> Self {
        self.horizontal_align = horizontal;
        self
    }

    pub fn with_distribution(mut self, distribution: LineDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    /// True when there is nothing to draw: no lines, or only empty text.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.text.is_empty())
    }

    /// Every distinct font family used by the block, in first-use order.
    pub fn font_families(&self) -> Vec<&str> {
        let mut families: Vec<&str> = Vec::new();
        for line in &self.lines {
            if !families.contains(&line.font_family.as_str()) {
                families.push(&line.font_family);
            }
        }
        families
    }
}

/// One item in the paint-ordered element list.
///
/// Later elements draw over earlier ones, identically on every backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderElement {
    Image(ImageElement),
    Text(TextContainer),
}

impl RenderElement {
    pub fn key(&self) -> &str {
        match self {
            Self::Image(image) => &image.key,
            Self::Text(text) => &text.key,
        }
    }
}

impl From<ImageElement> for RenderElement {
    fn from(element: ImageElement) -> Self {
        Self::Image(element)
    }
}

impl From<TextContainer> for RenderElement {
    fn from(element: TextContainer) -> Self {
        Self::Text(element)
    }
}
