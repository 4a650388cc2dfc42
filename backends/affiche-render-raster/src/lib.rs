//! Raster renderer: the element list composited onto an exact-size surface.
//!
//! Allocates a width x height pixel surface, decodes every referenced image
//! off the asset source, and fills text from real glyph outlines. Elements
//! draw strictly in list order onto one shared surface; the first failure
//! rejects the whole pass with no partial artifact.
//!
//! Fill-crops use the same [`Placement`] source window as every other
//! backend, applied here as a scale transform masked to the frame.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use image::ImageEncoder;
use tiny_skia::{
    FillRule, FilterQuality, IntSize, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Transform,
};

use affiche_core::assets::{resolve_image_bytes, AssetSource};
use affiche_core::element::{ImageElement, RenderElement, TextContainer};
use affiche_core::error::{RenderError, Result};
use affiche_core::geometry::{place, Placement};
use affiche_core::render::{check_dimensions, Renderer};
use affiche_core::text::stack_lines;
use affiche_core::{Color, Rect, ScaleStrategy};
use affiche_fonts::{metrics, FontStore};

mod glyphs;

/// The finished pixel surface.
///
/// Pixels are stored premultiplied internally; sampling and PNG encoding
/// hand back straight-alpha RGBA.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixmap: Pixmap,
}

impl RasterSurface {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha color at (x, y), or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let pixel = self.pixmap.pixel(x, y)?;
        let color = pixel.demultiply();
        Some(Color::rgba(
            color.red(),
            color.green(),
            color.blue(),
            color.alpha(),
        ))
    }

    /// The surface as straight-alpha RGBA8 bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixmap.pixels().len() * 4);
        for pixel in self.pixmap.pixels() {
            let color = pixel.demultiply();
            rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        rgba
    }

    /// Encode the surface as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut png = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png);
        encoder
            .write_image(
                &self.to_rgba(),
                self.width(),
                self.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|err| RenderError::Encode(err.to_string()))?;
        Ok(png)
    }
}

/// The raster backend.
pub struct RasterRenderer {
    assets: Arc<dyn AssetSource>,
    fonts: Arc<FontStore>,
}

impl RasterRenderer {
    pub fn new(assets: Arc<dyn AssetSource>, fonts: Arc<FontStore>) -> Self {
        Self { assets, fonts }
    }

    async fn draw_image(&self, pixmap: &mut Pixmap, image: &ImageElement) -> Result<()> {
        let Some(source) = &image.source else {
            return Ok(());
        };

        let bytes = resolve_image_bytes(source, self.assets.as_ref()).await?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|err| RenderError::ImageDecode {
                key: image.key.clone(),
                reason: err.to_string(),
            })?
            .to_rgba8();
        let (natural_width, natural_height) = decoded.dimensions();

        if let Some(background) = image.background {
            fill_rect(pixmap, background.expand(image.frame), background.fill);
        }

        let Some(placement) = place(
            image.frame,
            natural_width as f32,
            natural_height as f32,
            image.horizontal_align,
            image.vertical_align,
            image.scale,
        ) else {
            return Ok(());
        };

        let source_pixmap =
            premultiplied_pixmap(decoded).ok_or_else(|| RenderError::ImageDecode {
                key: image.key.clone(),
                reason: "image dimensions exceed the surface limits".to_owned(),
            })?;

        // Map the source window onto the destination box; for fill-crops the
        // window is smaller than the image, so the overflow is masked away.
        let Placement { dest, src } = placement;
        let scale = placement.scale();
        let transform = Transform::from_row(
            scale,
            0.0,
            0.0,
            scale,
            dest.x - src.x * scale,
            dest.y - src.y * scale,
        );

        let mask = if image.scale == ScaleStrategy::Fill {
            clip_mask(pixmap.width(), pixmap.height(), dest)
        } else {
            None
        };

        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(
            0,
            0,
            source_pixmap.as_ref(),
            &paint,
            transform,
            mask.as_ref(),
        );
        Ok(())
    }

    async fn draw_text(&self, pixmap: &mut Pixmap, text: &TextContainer) -> Result<()> {
        if text.is_blank() {
            return Ok(());
        }

        // Resolve every line's font before measuring; the store makes each
        // family a single fetch no matter how many lines share it.
        let mut line_fonts = Vec::with_capacity(text.lines.len());
        let mut line_metrics = Vec::with_capacity(text.lines.len());
        for line in &text.lines {
            let font = self.fonts.family_data(&line.font_family).await?;
            line_metrics.push(metrics::measure_line(&font, line.font_size, &line.text)?);
            line_fonts.push(font);
        }

        let layout = stack_lines(
            &line_metrics,
            text.anchor,
            text.horizontal_align,
            text.distribution,
        );

        if let Some(background) = text.background {
            fill_rect(pixmap, background.expand(layout.bounds), background.fill);
        }

        for ((line, font), placed) in text.lines.iter().zip(&line_fonts).zip(&layout.lines) {
            let path = glyphs::line_path(font, line.font_size, &line.text, placed.x, placed.baseline)?;
            if let Some(path) = path {
                let mut paint = Paint::default();
                paint.set_color_rgba8(line.color.r, line.color.g, line.color.b, line.color.a);
                paint.anti_alias = true;
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        Ok(())
    }
}

impl Renderer for RasterRenderer {
    type Artifact = RasterSurface;

    fn render<'a>(
        &'a self,
        width: f32,
        height: f32,
        elements: &'a [RenderElement],
    ) -> BoxFuture<'a, Result<RasterSurface>> {
        async move {
            check_dimensions(width, height)?;
            let surface_width = width.round() as u32;
            let surface_height = height.round() as u32;
            let mut pixmap = Pixmap::new(surface_width, surface_height)
                .ok_or(RenderError::InvalidDimensions { width, height })?;
            log::debug!(
                "raster render {}x{} with {} elements",
                surface_width,
                surface_height,
                elements.len()
            );

            for element in elements {
                match element {
                    RenderElement::Image(image) => self.draw_image(&mut pixmap, image).await?,
                    RenderElement::Text(text) => self.draw_text(&mut pixmap, text).await?,
                }
            }
            Ok(RasterSurface { pixmap })
        }
        .boxed()
    }
}

fn fill_rect(pixmap: &mut Pixmap, rect: Rect, color: Color) {
    let Some(sk_rect) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
    else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    pixmap.fill_rect(sk_rect, &paint, Transform::identity(), None);
}

fn clip_mask(width: u32, height: u32, rect: Rect) -> Option<Mask> {
    let mut mask = Mask::new(width, height)?;
    let sk_rect = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)?;
    let path = PathBuilder::from_rect(sk_rect);
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    Some(mask)
}

/// Straight-alpha RGBA from the image decoder into tiny-skia's
/// premultiplied layout.
fn premultiplied_pixmap(rgba: image::RgbaImage) -> Option<Pixmap> {
    let (width, height) = rgba.dimensions();
    let mut data = rgba.into_raw();
    for pixel in data.chunks_exact_mut(4) {
        let alpha = u16::from(pixel[3]);
        if alpha < 255 {
            pixel[0] = ((u16::from(pixel[0]) * alpha) / 255) as u8;
            pixel[1] = ((u16::from(pixel[1]) * alpha) / 255) as u8;
            pixel[2] = ((u16::from(pixel[2]) * alpha) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, IntSize::from_wh(width, height)?)
}
