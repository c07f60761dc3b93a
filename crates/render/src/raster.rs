//! Page rasterizer collaborator interface
//!
//! PDF decoding lives outside the engine. The annotation layer only needs
//! the post-rotation pixel dimensions of the raster it is layered over;
//! pixel data passes through untouched for the compositor.

use planmark_viewer::Rotation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("page {0} out of range")]
    PageOutOfRange(u32),

    #[error("rasterizer backend failure: {0}")]
    Backend(String),
}

/// A rendered page image. `width_px`/`height_px` already reflect the
/// requested rotation (axes swap at 90/270 degrees).
#[derive(Debug, Clone)]
pub struct RasterPage {
    pub page_number: u32,
    pub width_px: u32,
    pub height_px: u32,
    /// RGBA8 pixel data, row-major.
    pub pixels: Vec<u8>,
}

/// External PDF renderer.
pub trait PageRasterizer {
    fn rasterize(
        &mut self,
        page_number: u32,
        zoom: f32,
        rotation: Rotation,
    ) -> Result<RasterPage, RasterError>;
}
