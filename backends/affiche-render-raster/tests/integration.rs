//! Pixel-level behavior of the raster surface.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use image::ImageEncoder;

use affiche_core::assets::{AssetSource, MemoryAssets};
use affiche_core::element::{ImageElement, ImageSource, RenderElement, TextContainer, TextLine};
use affiche_core::error::{AssetError, RenderError};
use affiche_core::render::Renderer;
use affiche_core::{
    Background, Color, HorizontalAlign, Point, Rect, ScaleStrategy, VerticalAlign,
};
use affiche_fonts::{FontCatalog, FontStore};
use affiche_render_raster::RasterRenderer;

/// Encode a solid-color PNG for use as a synthetic asset.
fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .unwrap();
    png
}

/// A two-pixel-wide PNG: left column red, right column blue.
fn split_png(height: u32) -> Vec<u8> {
    let mut img = image::RgbaImage::new(2, height);
    for y in 0..height {
        img.put_pixel(0, y, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, y, image::Rgba([0, 0, 255, 255]));
    }
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(img.as_raw(), 2, height, image::ExtendedColorType::Rgba8)
        .unwrap();
    png
}

fn renderer_with(assets: MemoryAssets) -> RasterRenderer {
    let assets: Arc<dyn AssetSource> = Arc::new(assets);
    let fonts = Arc::new(FontStore::new(FontCatalog::new(), Arc::clone(&assets)));
    RasterRenderer::new(assets, fonts)
}

#[derive(Default)]
struct CountingAssets {
    calls: AtomicUsize,
}

impl AssetSource for CountingAssets {
    fn fetch(&self, location: &str) -> BoxFuture<'_, Result<Vec<u8>, AssetError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let location = location.to_owned();
        async move { Err(AssetError::NotFound(location)) }.boxed()
    }
}

#[tokio::test]
async fn later_elements_paint_over_earlier_ones() {
    let assets = MemoryAssets::new()
        .with("red.png", solid_png(1, 1, [255, 0, 0, 255]))
        .with("blue.png", solid_png(1, 1, [0, 0, 255, 255]));
    let renderer = renderer_with(assets);

    // Both images cover the 40x40 overlap centered on the surface.
    let elements = vec![
        ImageElement::new(
            "under",
            ImageSource::from_href("red.png"),
            Rect::new(0.0, 0.0, 60.0, 60.0),
        )
        .into(),
        ImageElement::new(
            "over",
            ImageSource::from_href("blue.png"),
            Rect::new(20.0, 20.0, 60.0, 60.0),
        )
        .into(),
    ];

    let surface = renderer.render(80.0, 80.0, &elements).await.unwrap();
    assert_eq!(surface.pixel(40, 40), Some(Color::rgb(0, 0, 255)));
    // Outside the overlap the first element still shows.
    assert_eq!(surface.pixel(5, 5), Some(Color::rgb(255, 0, 0)));
}

#[tokio::test]
async fn fill_crop_keeps_the_aligned_side() {
    // A 2x1 source in a square frame: cover-scale crops one column away.
    let assets = MemoryAssets::new().with("split.png", split_png(1));
    let renderer = renderer_with(assets);
    let frame = Rect::new(0.0, 0.0, 50.0, 50.0);

    // Left-aligned cover keeps the red (left) column.
    let left: Vec<RenderElement> = vec![ImageElement::new(
        "pic",
        ImageSource::from_href("split.png"),
        frame,
    )
    .with_alignment(HorizontalAlign::Left, VerticalAlign::Center)
    .with_scale(ScaleStrategy::Fill)
    .into()];
    let surface = renderer.render(50.0, 50.0, &left).await.unwrap();
    assert_eq!(surface.pixel(10, 25), Some(Color::rgb(255, 0, 0)));

    // Right-aligned cover keeps the blue (right) column.
    let right: Vec<RenderElement> = vec![ImageElement::new(
        "pic",
        ImageSource::from_href("split.png"),
        frame,
    )
    .with_alignment(HorizontalAlign::Right, VerticalAlign::Center)
    .with_scale(ScaleStrategy::Fill)
    .into()];
    let surface = renderer.render(50.0, 50.0, &right).await.unwrap();
    assert_eq!(surface.pixel(40, 25), Some(Color::rgb(0, 0, 255)));
}

#[tokio::test]
async fn fit_letterboxes_and_leaves_slack_transparent() {
    let assets = MemoryAssets::new().with("wide.png", solid_png(2, 1, [0, 255, 0, 255]));
    let renderer = renderer_with(assets);

    let elements = vec![ImageElement::new(
        "pic",
        ImageSource::from_href("wide.png"),
        Rect::new(0.0, 0.0, 100.0, 100.0),
    )
    .into()];

    // Drawn box is 100x50 centered: y in [25, 75).
    let surface = renderer.render(100.0, 100.0, &elements).await.unwrap();
    assert_eq!(surface.pixel(50, 50), Some(Color::rgb(0, 255, 0)));
    assert_eq!(surface.pixel(50, 10).map(|c| c.a), Some(0));
    assert_eq!(surface.pixel(50, 90).map(|c| c.a), Some(0));
}

#[tokio::test]
async fn background_fill_extends_by_padding() {
    let assets = MemoryAssets::new().with("pic.png", solid_png(1, 1, [0, 0, 0, 255]));
    let renderer = renderer_with(assets);

    let elements = vec![ImageElement::new(
        "pic",
        ImageSource::from_href("pic.png"),
        Rect::new(20.0, 20.0, 20.0, 20.0),
    )
    .with_background(Background::new(Color::rgb(255, 189, 89), 10.0))
    .into()];

    let surface = renderer.render(60.0, 60.0, &elements).await.unwrap();
    // Inside the padding ring, outside the frame.
    assert_eq!(surface.pixel(15, 30), Some(Color::rgb(255, 189, 89)));
    // Outside the padded rect: untouched.
    assert_eq!(surface.pixel(5, 5).map(|c| c.a), Some(0));
}

#[tokio::test]
async fn empty_source_never_touches_the_asset_path() {
    let counting = Arc::new(CountingAssets::default());
    let assets: Arc<dyn AssetSource> = Arc::clone(&counting) as Arc<dyn AssetSource>;
    let fonts = Arc::new(FontStore::new(FontCatalog::new(), Arc::clone(&assets)));
    let renderer = RasterRenderer::new(assets, fonts);

    let elements = vec![
        ImageElement::new("missing", None, Rect::new(0.0, 0.0, 10.0, 10.0)).into(),
        TextContainer::new(
            "blank",
            vec![TextLine::new("", "Quicksand", 55.0, Color::black())],
            Point::new(0.0, 0.0),
        )
        .into(),
    ];

    let surface = renderer.render(10.0, 10.0, &elements).await.unwrap();
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    assert_eq!(surface.pixel(5, 5).map(|c| c.a), Some(0));
}

#[tokio::test]
async fn undecodable_image_rejects_the_render() {
    let assets = MemoryAssets::new().with("broken.png", b"definitely not a png".to_vec());
    let renderer = renderer_with(assets);

    let elements = vec![ImageElement::new(
        "broken",
        ImageSource::from_href("broken.png"),
        Rect::new(0.0, 0.0, 10.0, 10.0),
    )
    .into()];

    let err = renderer.render(10.0, 10.0, &elements).await.unwrap_err();
    assert!(matches!(err, RenderError::ImageDecode { .. }), "{err:?}");
}

#[tokio::test]
async fn missing_asset_rejects_the_render() {
    let renderer = renderer_with(MemoryAssets::new());
    let elements = vec![ImageElement::new(
        "gone",
        ImageSource::from_href("gone.png"),
        Rect::new(0.0, 0.0, 10.0, 10.0),
    )
    .into()];

    let err = renderer.render(10.0, 10.0, &elements).await.unwrap_err();
    assert!(matches!(err, RenderError::Asset(_)), "{err:?}");
}

#[tokio::test]
async fn unresolvable_font_rejects_text() {
    // The store has an empty catalog, so any family is unsupported.
    let renderer = renderer_with(MemoryAssets::new());
    let elements = vec![TextContainer::new(
        "t",
        vec![TextLine::new("hello", "Quicksand", 55.0, Color::black())],
        Point::new(0.0, 0.0),
    )
    .into()];

    let err = renderer.render(10.0, 10.0, &elements).await.unwrap_err();
    assert!(matches!(err, RenderError::Font(_)), "{err:?}");
}

#[tokio::test]
async fn png_artifact_has_magic_bytes() {
    let assets = MemoryAssets::new().with("pic.png", solid_png(4, 4, [9, 9, 9, 255]));
    let renderer = renderer_with(assets);

    let elements = vec![ImageElement::new(
        "pic",
        ImageSource::from_href("pic.png"),
        Rect::new(0.0, 0.0, 4.0, 4.0),
    )
    .into()];

    let surface = renderer.render(4.0, 4.0, &elements).await.unwrap();
    let png = surface.encode_png().unwrap();
    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
}
