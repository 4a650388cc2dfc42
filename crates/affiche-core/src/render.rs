//! The contract every rendering backend implements.

use futures::future::BoxFuture;

use crate::element::RenderElement;
use crate::error::{RenderError, Result};

/// Render an ordered element list to a backend-specific artifact.
///
/// Implementations must process elements strictly in list order, awaiting
/// each element's work before starting the next. There is no parallel
/// fan-out inside one render: the raster and document surfaces mutate one
/// shared drawing context (current font, fill, clip) as they go, and the
/// element sequence is what keeps that safe. It also fixes error order: the
/// first failing element rejects the whole render and later elements never
/// execute. Cancellation is not supported; callers may drop the result.
pub trait Renderer {
    type Artifact;

    fn render<'a>(
        &'a self,
        width: f32,
        height: f32,
        elements: &'a [RenderElement],
    ) -> BoxFuture<'a, Result<Self::Artifact>>;
}

/// Shared up-front dimension check for all backends.
pub fn check_dimensions(width: f32, height: f32) -> Result<()> {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    Ok(())
}
