//! Affiche: assemble a branded poster from a campaign template and render
//! it to a live preview, a PNG, or a PDF.
//!
//! The crates compose like this:
//!
//! 1. **Campaign + session** ([`campaign`]) - template data plus the user's
//!    picks become an ordered element list
//! 2. **Elements** ([`core`]) - the backend-agnostic description of what to
//!    draw
//! 3. **Backends** ([`render_svg`], [`render_raster`], [`render_pdf`]) -
//!    three implementations of one [`core::Renderer`] contract
//! 4. **Fonts** ([`fonts`]) - one memoized byte store shared by every
//!    backend, so measurement agrees everywhere
//!
//! # Example
//!
//! ```ignore
//! use affiche::prelude::*;
//! use std::sync::Arc;
//!
//! let campaign = Campaign::from_json(&config_json)?;
//! let mut session = Session::new();
//! session.website = "example.com".into();
//!
//! let elements = compose(&campaign, &session)?;
//! let size = &campaign.sizes[session.size];
//!
//! let fonts = Arc::new(FontStore::new(FontCatalog::builtin(), assets.clone()));
//! let preview = SvgRenderer::new(fonts.clone())
//!     .render(size.width, size.height, &elements)
//!     .await?;
//! ```

pub use affiche_campaign as campaign;
pub use affiche_core as core;
pub use affiche_fonts as fonts;
pub use affiche_render_pdf as render_pdf;
pub use affiche_render_raster as render_raster;
pub use affiche_render_svg as render_svg;

/// Common imports for typical usage.
pub mod prelude {
    pub use affiche_campaign::{compose, Campaign, CampaignError, Session};
    pub use affiche_core::assets::{AssetSource, DirectoryAssets, MemoryAssets};
    pub use affiche_core::element::{
        ImageElement, ImageSource, RenderElement, TextContainer, TextLine,
    };
    pub use affiche_core::error::{AssetError, FontError, RenderError};
    pub use affiche_core::render::Renderer;
    pub use affiche_core::{Background, Color, HorizontalAlign, LineDistribution, Point, Rect};
    pub use affiche_fonts::{FontCatalog, FontStore};
    pub use affiche_render_pdf::{PdfArtifact, PdfRenderer};
    pub use affiche_render_raster::{RasterRenderer, RasterSurface};
    pub use affiche_render_svg::{SvgRenderer, VectorNode, VectorTree};
}
