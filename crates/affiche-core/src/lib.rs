//! Affiche Core: one element list, three rendering surfaces
//!
//! A poster is described once as an ordered list of [`RenderElement`]s
//! (positioned images and anchored text blocks) and rendered to whichever
//! surface the caller needs: a scalable vector preview, an exact-size raster
//! bitmap, or a single-page document. The list order is the paint order, on
//! every surface.
//!
//! This crate holds everything the backends agree on:
//!
//! - [`element`] - The declarative element model
//! - [`geometry`] - Fit/fill placement and alignment resolution
//! - [`text`] - Line stacking, measurement contract, block bounds
//! - [`render`] - The [`render::Renderer`] contract every backend implements
//! - [`assets`] - Asynchronous byte sources for images and fonts
//! - [`error`] - The error taxonomy shared across the pipeline
//!
//! Backends live in their own crates and consume this one; none of them is
//! special-cased here. Whatever they must agree on (placement math, line
//! stacking, the meaning of an empty source) lives here, so the three of
//! them cannot drift apart.

use serde::{Deserialize, Serialize};

pub mod assets;
pub mod element;
pub mod error;
pub mod geometry;
pub mod render;
pub mod text;

pub use element::{ImageElement, ImageSource, RenderElement, TextContainer, TextLine};
pub use error::{AssetError, FontError, RenderError, Result};
pub use render::Renderer;

/// Simple RGBA color shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse a `#rrggbb` or `#rgb` hex string (campaign brand colors).
    pub fn parse(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        match digits.len() {
            6 => {
                let value = u32::from_str_radix(digits, 16).ok()?;
                Some(Self::rgb(
                    (value >> 16) as u8,
                    (value >> 8) as u8,
                    value as u8,
                ))
            }
            3 => {
                let value = u32::from_str_radix(digits, 16).ok()?;
                let (r, g, b) = ((value >> 8) & 0xf, (value >> 4) & 0xf, value & 0xf);
                Some(Self::rgb((r * 17) as u8, (g * 17) as u8, (b * 17) as u8))
            }
            _ => None,
        }
    }

    /// CSS-style `rgb()`/`rgba()` string, used by the vector backend.
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                f32::from(self.a) / 255.0
            )
        }
    }
}

/// A point in surface coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Horizontal placement of content inside its anchor geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical placement of content inside its anchor geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// How an image is scaled into its frame.
///
/// `Fit` letterboxes: the whole image is visible, the frame may show slack.
/// `Fill` covers: the frame is completely painted, overflow is cropped from
/// the side opposite the alignment anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleStrategy {
    #[default]
    Fit,
    Fill,
}

/// How a multi-line text block relates to its anchor y.
///
/// `Down`: the anchor is the top of the block. `Up`: the anchor is the
/// bottom, lines grow upward. `Center`: the block is vertically centered on
/// the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDistribution {
    #[default]
    Down,
    Up,
    Center,
}

/// Optional filled backdrop behind an element, expanded by `padding` on all
/// four sides of the element's extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    pub fill: Color,
    pub padding: f32,
}

impl Background {
    pub const fn new(fill: Color, padding: f32) -> Self {
        Self { fill, padding }
    }

    /// The backdrop rect for content occupying `content`.
    pub fn expand(&self, content: Rect) -> Rect {
        Rect::new(
            content.x - self.padding,
            content.y - self.padding,
            content.width + 2.0 * self.padding,
            content.height + 2.0 * self.padding,
        )
    }
}
