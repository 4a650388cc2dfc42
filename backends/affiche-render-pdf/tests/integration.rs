//! Document-backend behavior: structure, font failure semantics, no-ops.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use image::ImageEncoder;

use affiche_core::assets::{AssetSource, MemoryAssets};
use affiche_core::element::{ImageElement, ImageSource, RenderElement, TextContainer, TextLine};
use affiche_core::error::{AssetError, FontError, RenderError};
use affiche_core::render::Renderer;
use affiche_core::{Color, Point, Rect, ScaleStrategy};
use affiche_fonts::{FontCatalog, FontStore};
use affiche_render_pdf::PdfRenderer;

fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .unwrap();
    png
}

fn renderer_with(assets: MemoryAssets) -> PdfRenderer {
    let assets: Arc<dyn AssetSource> = Arc::new(assets);
    let fonts = Arc::new(FontStore::new(FontCatalog::new(), Arc::clone(&assets)));
    PdfRenderer::new(assets, fonts)
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
async fn image_render_produces_a_pdf() {
    let assets = MemoryAssets::new().with("bg.png", solid_png(8, 8, [10, 20, 30, 255]));
    let renderer = renderer_with(assets);

    let elements = vec![ImageElement::new(
        "background",
        ImageSource::from_href("bg.png"),
        Rect::new(0.0, 0.0, 200.0, 300.0),
    )
    .into()];

    let artifact = renderer.render(200.0, 300.0, &elements).await.unwrap();
    assert!(artifact.bytes().starts_with(b"%PDF"), "not a PDF header");
    assert!(artifact.bytes().len() > 100);
}

#[tokio::test]
async fn cover_cropped_image_renders() {
    // 4x2 source into a square frame forces a cover-crop window.
    let assets = MemoryAssets::new().with("wide.png", solid_png(4, 2, [1, 2, 3, 255]));
    let renderer = renderer_with(assets);

    let elements = vec![ImageElement::new(
        "pic",
        ImageSource::from_href("wide.png"),
        Rect::new(10.0, 10.0, 100.0, 100.0),
    )
    .with_scale(ScaleStrategy::Fill)
    .into()];

    let artifact = renderer.render(200.0, 200.0, &elements).await.unwrap();
    assert!(artifact.bytes().starts_with(b"%PDF"));
}

#[tokio::test]
async fn unsupported_family_rejects_the_chain() {
    let renderer = renderer_with(MemoryAssets::new());

    let elements = vec![TextContainer::new(
        "website",
        vec![TextLine::new("example.com", "Quicksand", 75.0, Color::black())],
        Point::new(100.0, 0.0),
    )
    .into()];

    let err = renderer.render(200.0, 200.0, &elements).await.unwrap_err();
    match err {
        RenderError::Font(FontError::UnsupportedFamily(family)) => {
            assert_eq!(family, "Quicksand");
        }
        other => panic!("expected unsupported-family rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn failure_in_a_later_element_rejects_everything() {
    // First element renders fine; the second aborts the chain.
    let assets = MemoryAssets::new().with("ok.png", solid_png(2, 2, [0, 0, 0, 255]));
    let renderer = renderer_with(assets);

    let elements: Vec<RenderElement> = vec![
        ImageElement::new(
            "ok",
            ImageSource::from_href("ok.png"),
            Rect::new(0.0, 0.0, 50.0, 50.0),
        )
        .into(),
        ImageElement::new(
            "gone",
            ImageSource::from_href("gone.png"),
            Rect::new(0.0, 0.0, 50.0, 50.0),
        )
        .into(),
    ];

    assert!(renderer.render(100.0, 100.0, &elements).await.is_err());
}

#[tokio::test]
async fn empty_elements_are_silent_no_ops() {
    let counting = Arc::new(CountingAssets::default());
    let assets: Arc<dyn AssetSource> = Arc::clone(&counting);
    let fonts = Arc::new(FontStore::new(FontCatalog::new(), Arc::clone(&assets)));
    let renderer = PdfRenderer::new(assets, fonts);

    let elements = vec![
        ImageElement::new("missing", None, Rect::new(0.0, 0.0, 10.0, 10.0)).into(),
        TextContainer::new(
            "blank",
            vec![TextLine::new("", "Quicksand", 55.0, Color::black())],
            Point::new(0.0, 0.0),
        )
        .into(),
    ];

    let artifact = renderer.render(100.0, 100.0, &elements).await.unwrap();
    assert!(artifact.bytes().starts_with(b"%PDF"));
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_dimensions_reject() {
    let renderer = renderer_with(MemoryAssets::new());
    assert!(renderer.render(-5.0, 100.0, &[]).await.is_err());
}
