//! Viewer transform state for the plan annotation engine
//!
//! Tracks the zoom level and quarter-turn rotation applied to the page
//! raster currently on screen. Annotation geometry is stored relative to
//! the unrotated, unscaled page; everything here describes how that page
//! is presently displayed.

use thiserror::Error;

/// Default zoom limits applied when none are configured.
pub const DEFAULT_MIN_ZOOM: f32 = 0.25;
pub const DEFAULT_MAX_ZOOM: f32 = 8.0;

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// Page dimensions must be positive and finite.
    #[error("degenerate page dimensions: {width} x {height}")]
    DegeneratePage { width: f32, height: f32 },
}

/// Quarter-turn rotation applied by the page rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Whether this rotation swaps the page's width and height on screen.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// The next rotation, turning clockwise.
    pub fn clockwise(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Rotation angle in degrees, as handed to the rasterizer.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// Current display state for a single page.
///
/// `page_width` / `page_height` are the page's raw pixel dimensions at
/// scale 1 with no rotation. The on-screen canvas dimensions are derived:
/// rotation swaps the axes at 90 and 270 degrees, then zoom scales both.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerTransform {
    zoom: f32,
    rotation: Rotation,
    page_width: f32,
    page_height: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl ViewerTransform {
    /// Create a transform at zoom 1, no rotation.
    pub fn new(page_width: f32, page_height: f32) -> Result<Self, TransformError> {
        if !(page_width.is_finite() && page_height.is_finite())
            || page_width <= 0.0
            || page_height <= 0.0
        {
            return Err(TransformError::DegeneratePage {
                width: page_width,
                height: page_height,
            });
        }

        Ok(Self {
            zoom: 1.0,
            rotation: Rotation::Deg0,
            page_width,
            page_height,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        })
    }

    /// Override the zoom limits.
    pub fn with_zoom_limits(mut self, min_zoom: f32, max_zoom: f32) -> Self {
        self.min_zoom = min_zoom.max(f32::EPSILON);
        self.max_zoom = max_zoom.max(self.min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    /// Set the zoom level, clamped to the configured limits.
    pub fn set_zoom(&mut self, zoom: f32) {
        let requested = if zoom.is_finite() { zoom } else { 1.0 };
        self.zoom = requested.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Rotate the view one quarter turn clockwise.
    pub fn rotate_cw(&mut self) {
        self.rotation = self.rotation.clockwise();
    }

    /// On-screen canvas width in pixels at the current zoom and rotation.
    pub fn canvas_width(&self) -> f32 {
        if self.rotation.swaps_axes() {
            self.page_height * self.zoom
        } else {
            self.page_width * self.zoom
        }
    }

    /// On-screen canvas height in pixels at the current zoom and rotation.
    pub fn canvas_height(&self) -> f32 {
        if self.rotation.swaps_axes() {
            self.page_width * self.zoom
        } else {
            self.page_height * self.zoom
        }
    }
}

impl Default for ViewerTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotation: Rotation::Deg0,
            page_width: 612.0,
            page_height: 792.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

/// Zoom that fits the page width inside the given viewport width.
pub fn fit_width_zoom(viewport_width_px: f32, transform: &ViewerTransform) -> f32 {
    let page_width = if transform.rotation().swaps_axes() {
        transform.page_height()
    } else {
        transform.page_width()
    };

    if viewport_width_px <= 0.0 || page_width <= 0.0 {
        return 1.0;
    }

    (viewport_width_px / page_width).clamp(transform.min_zoom, transform.max_zoom)
}

/// Zoom that fits the whole page inside the given viewport.
pub fn fit_page_zoom(
    viewport_width_px: f32,
    viewport_height_px: f32,
    transform: &ViewerTransform,
) -> f32 {
    let (page_w, page_h) = if transform.rotation().swaps_axes() {
        (transform.page_height(), transform.page_width())
    } else {
        (transform.page_width(), transform.page_height())
    };

    if viewport_width_px <= 0.0 || viewport_height_px <= 0.0 || page_w <= 0.0 || page_h <= 0.0 {
        return 1.0;
    }

    let width_ratio = viewport_width_px / page_w;
    let height_ratio = viewport_height_px / page_h;
    width_ratio
        .min(height_ratio)
        .clamp(transform.min_zoom, transform.max_zoom)
}
