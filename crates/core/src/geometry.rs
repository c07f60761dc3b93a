//! Coordinate spaces and conversions
//!
//! Annotations are stored in *document space*: the unrotated page at scale 1,
//! with the origin at the bottom-left corner and Y increasing upward (standard
//! PDF convention). The screen works in *canvas space*: pixels at the current
//! zoom and rotation, origin at the top-left with Y increasing downward.
//!
//! The page raster handed to us by the rasterizer already reflects the
//! requested rotation, and the canvas dimensions reported by the viewer
//! transform account for the axis swap at 90/270 degrees. Conversions here
//! therefore only scale and flip Y; they never rotate.

use planmark_viewer::ViewerTransform;

/// A point in document space (page-local, scale 1, rotation 0).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocPoint {
    pub x: f32,
    pub y: f32,
}

impl DocPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another document-space point.
    pub fn distance_to(&self, other: &DocPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point in canvas space (on-screen pixels at the current zoom/rotation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
}

impl CanvasPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A sampled point on a freehand path, with stylus pressure.
///
/// Pressure is normalized to [0, 1]; mice report 0.5.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathPoint {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
}

impl PathPoint {
    pub fn new(x: f32, y: f32, pressure: f32) -> Self {
        Self { x, y, pressure }
    }

    pub fn position(&self) -> DocPoint {
        DocPoint::new(self.x, self.y)
    }
}

/// An axis-aligned rectangle in document space.
///
/// Anchored by its *lower-left* corner per the document Y convention:
/// `y` is the bottom edge, `y + height` the top.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DocRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// The rectangle spanned by two document-space corner points.
    pub fn from_corners(a: DocPoint, b: DocPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn center(&self) -> DocPoint {
        DocPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Radius of the largest circle that fits inside this rectangle.
    pub fn inscribed_radius(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }

    /// Whether a point lies inside the rectangle, inflated by `tolerance`.
    pub fn contains(&self, point: &DocPoint, tolerance: f32) -> bool {
        point.x >= self.x - tolerance
            && point.x <= self.x + self.width + tolerance
            && point.y >= self.y - tolerance
            && point.y <= self.y + self.height + tolerance
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// An axis-aligned rectangle in canvas space, anchored at its top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Convert a document-space point to canvas pixels.
pub fn doc_to_canvas(point: DocPoint, transform: &ViewerTransform) -> CanvasPoint {
    let scale = transform.zoom();
    CanvasPoint {
        x: point.x * scale,
        y: transform.canvas_height() - point.y * scale,
    }
}

/// Convert a canvas-pixel point back to document space. Exact inverse of
/// [`doc_to_canvas`] up to floating-point rounding.
pub fn canvas_to_doc(point: CanvasPoint, transform: &ViewerTransform) -> DocPoint {
    let scale = transform.zoom();
    DocPoint {
        x: point.x / scale,
        y: (transform.canvas_height() - point.y) / scale,
    }
}

/// Convert a document-space rectangle to a canvas rectangle.
///
/// Document rectangles anchor at their lower corner, canvas rectangles at
/// their top-left, so the scaled height is subtracted when flipping Y.
pub fn rect_to_canvas(rect: DocRect, transform: &ViewerTransform) -> CanvasRect {
    let scale = transform.zoom();
    CanvasRect {
        x: rect.x * scale,
        y: transform.canvas_height() - (rect.y + rect.height) * scale,
        width: rect.width * scale,
        height: rect.height * scale,
    }
}

/// Whether `point` lies within `tolerance` of the segment `start`..`end`.
///
/// Degenerate (zero-length) segments are treated as a single point.
pub fn point_near_segment(
    point: &DocPoint,
    start: &DocPoint,
    end: &DocPoint,
    tolerance: f32,
) -> bool {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-6 {
        return point.distance_to(start) <= tolerance;
    }

    let t = ((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq;
    let t = t.clamp(0.0, 1.0);

    let closest = DocPoint::new(start.x + t * dx, start.y + t * dy);
    point.distance_to(&closest) <= tolerance
}
