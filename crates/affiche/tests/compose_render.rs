//! End-to-end: campaign + session through composition into every backend.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use image::ImageEncoder;

use affiche::prelude::*;
use affiche_core::text::{approximate_line, MeasuredLine, TextMeasurer};

const CAMPAIGN_JSON: &str = r##"{
    "assetPath": "frame",
    "assetPaths": {
        "background": "{background}_{size}.png",
        "foreground": "{background}_foreground.png",
        "header": "{background}_header_{language}.png"
    },
    "languages": ["English", "Spanish"],
    "backgrounds": [
        {"name": "Boundaries", "color": "#ffbd59"}
    ],
    "sizes": [
        {
            "name": "11x14",
            "label": "11x14",
            "width": 1571,
            "height": 2000,
            "website": {
                "x": 1571,
                "y": 75,
                "horizontalAlignment": "right",
                "includeBackgroundFill": true
            }
        }
    ]
}"##;

fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .unwrap();
    png
}

/// Deterministic generic-face metrics for preview assertions.
struct FixedMeasurer;

impl TextMeasurer for FixedMeasurer {
    fn measure(
        &self,
        _family: &str,
        size: f32,
        text: &str,
    ) -> BoxFuture<'_, Result<MeasuredLine, FontError>> {
        let measured = approximate_line(size, text);
        async move { Ok(measured) }.boxed()
    }
}

fn session_with_website() -> (Campaign, Session) {
    let campaign = Campaign::from_json(CAMPAIGN_JSON).unwrap();
    let mut session = Session::new();
    session.website = "example.com".to_owned();
    session.font_size = 75.0;
    (campaign, session)
}

#[tokio::test]
async fn website_scenario_against_the_preview_backend() {
    // The brand scenario: "example.com" at 75px, right-aligned at
    // x=1571/y=75, backed by the brand color with 5px padding.
    let (campaign, session) = session_with_website();
    let elements = compose(&campaign, &session).unwrap();
    let size = &campaign.sizes[session.size];

    let renderer = SvgRenderer::new(Arc::new(FixedMeasurer));
    let tree = renderer
        .render(size.width, size.height, &elements)
        .await
        .unwrap();

    // Fixed metrics: width = 11 chars * 45 = 495, ascent = 60.
    let brand = Color::parse("#ffbd59").unwrap();
    let backdrop = tree
        .nodes()
        .iter()
        .find_map(|node| match node {
            VectorNode::Rect { key, rect, fill } if key.as_str() == "website-bg" => {
                Some((*rect, *fill))
            }
            _ => None,
        })
        .unwrap();
    assert_eq!(backdrop.0, Rect::new(1071.0, 70.0, 505.0, 85.0));
    assert_eq!(backdrop.1, brand);

    let line = tree
        .nodes()
        .iter()
        .find_map(|node| match node {
            VectorNode::Text { key, x, y, anchor, .. } if key.as_str() == "website-0" => {
                Some((*x, *y, *anchor))
            }
            _ => None,
        })
        .unwrap();
    assert_eq!(line, (1571.0, 135.0, "end"));
}

#[tokio::test]
async fn composed_poster_renders_to_png_and_pdf() {
    let (campaign, mut session) = session_with_website();
    session.website.clear(); // keep the render font-free
    let elements = compose(&campaign, &session).unwrap();
    let size = &campaign.sizes[session.size];

    let assets: Arc<dyn AssetSource> = Arc::new(
        MemoryAssets::new().with(
            "frame/boundaries_11x14.png",
            solid_png(4, 4, [255, 189, 89, 255]),
        ),
    );
    let fonts = Arc::new(FontStore::new(FontCatalog::builtin(), Arc::clone(&assets)));

    let surface = RasterRenderer::new(Arc::clone(&assets), Arc::clone(&fonts))
        .render(size.width, size.height, &elements)
        .await
        .unwrap();
    assert_eq!(surface.width(), 1571);
    assert_eq!(surface.height(), 2000);
    assert_eq!(surface.pixel(785, 1000), Some(Color::rgb(255, 189, 89)));
    let png = surface.encode_png().unwrap();
    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

    let pdf = PdfRenderer::new(assets, fonts)
        .render(size.width, size.height, &elements)
        .await
        .unwrap();
    assert!(pdf.bytes().starts_with(b"%PDF"));
}

#[tokio::test]
async fn all_backends_share_one_element_list() {
    let (campaign, session) = session_with_website();
    let elements = compose(&campaign, &session).unwrap();

    // The preview consumes the same list the other backends do; paint order
    // starts with the background and ends with the website text.
    assert_eq!(elements[0].key(), "background");
    assert_eq!(elements.last().unwrap().key(), "website");
}
