//! Canvas capture: thumbnails for saved maps and PDF export.
//!
//! Rasterizing the drawn canvas belongs to the host, so both concerns sit
//! behind traits. A thumbnail is best-effort: any failure, including a
//! missing surface, yields no thumbnail and the save goes ahead.

#[cfg(test)]
#[path = "thumbnail_test.rs"]
mod thumbnail_test;

use tracing::warn;

use crate::doc::DiagramSnapshot;

/// Selector of the drawn canvas surface.
pub const CANVAS_SURFACE: &str = ".mind-map-canvas";

// =============================================================================
// TYPES
// =============================================================================

/// The on-screen surface to capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceRef {
    pub selector: String,
}

impl Default for SurfaceRef {
    fn default() -> Self {
        Self { selector: CANVAS_SURFACE.to_owned() }
    }
}

/// Output geometry of a thumbnail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailOptions {
    /// Render scale applied to the surface before fitting.
    pub scale: f64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("surface not found: {0}")]
    SurfaceMissing(String),
    #[error("rasterization failed: {0}")]
    Render(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("surface not found: {0}")]
    SurfaceMissing(String),
    #[error("export failed: {0}")]
    Failed(String),
}

/// Renders a surface to a PNG data URL.
#[async_trait::async_trait]
pub trait Rasterizer: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`RasterError`] if the surface is absent or cannot be rendered.
    async fn rasterize(&self, surface: &SurfaceRef, options: &ThumbnailOptions) -> Result<String, RasterError>;
}

/// Exports the current diagram as a PDF document.
#[async_trait::async_trait]
pub trait PdfExporter: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`ExportError`] if the document cannot be produced.
    async fn export(&self, surface: &SurfaceRef, diagram: &DiagramSnapshot) -> Result<(), ExportError>;
}

// =============================================================================
// CAPTURE
// =============================================================================

/// Capture a thumbnail, or `None` when there is no rasterizer or it fails.
pub async fn capture_thumbnail(
    rasterizer: Option<&dyn Rasterizer>,
    surface: &SurfaceRef,
    options: &ThumbnailOptions,
) -> Option<String> {
    let rasterizer = rasterizer?;
    match rasterizer.rasterize(surface, options).await {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(selector = %surface.selector, error = %e, "thumbnail capture failed");
            None
        }
    }
}
