//! Annotation data model
//!
//! The persisted unit of drawn content. Geometry is always expressed in
//! document space (see [`crate::geometry`]) so an annotation re-renders
//! identically at any zoom or rotation. The serde representation of these
//! types is the engine's persistence contract; wire encoding belongs to the
//! persistence adapter.

use crate::geometry::{point_near_segment, DocPoint, DocRect, PathPoint};

/// Unique identifier for an annotation.
///
/// Generated locally with UUID v4 on commit, later reconciled with the
/// server-assigned canonical id.
pub type AnnotationId = uuid::Uuid;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
}

/// Font weight for text annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Visual styling applied when an annotation is rendered.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnnotationStyle {
    /// Stroke color for outlines and paths.
    pub stroke_color: Color,

    /// Fill color for closed shapes (None for no fill).
    pub fill_color: Option<Color>,

    /// Stroke width in document units.
    pub stroke_width: f32,

    /// Stroke opacity (0.0 transparent, 1.0 opaque).
    pub opacity: f32,

    /// Fill opacity, when distinct from the stroke opacity.
    pub fill_opacity: Option<f32>,

    /// Font size in document units (text annotations).
    pub font_size: f32,

    /// Font family (text annotations).
    pub font_family: String,

    /// Font weight (text annotations).
    pub font_weight: FontWeight,
}

impl AnnotationStyle {
    /// Default style: black 2pt stroke, no fill.
    pub fn new() -> Self {
        Self {
            stroke_color: Color::BLACK,
            fill_color: None,
            stroke_width: 2.0,
            opacity: 1.0,
            fill_opacity: None,
            font_size: 12.0,
            font_family: "Helvetica".to_string(),
            font_weight: FontWeight::Normal,
        }
    }

    /// Red markup stroke, the usual survey markup style.
    pub fn red_markup() -> Self {
        Self {
            stroke_color: Color::RED,
            ..Self::new()
        }
    }

    /// Semi-transparent yellow fill for the highlight tool.
    pub fn highlighter() -> Self {
        Self {
            stroke_color: Color::YELLOW,
            fill_color: Some(Color::YELLOW),
            stroke_width: 0.0,
            fill_opacity: Some(0.35),
            ..Self::new()
        }
    }
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self::new()
    }
}

/// Document-space geometry, one variant per drawing tool.
///
/// Closed set: render, hit-test, and finalize all match exhaustively, so a
/// new variant is a compile-enforced single-point change.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AnnotationGeometry {
    /// Freehand path through pressure-sampled points.
    Freehand { points: Vec<PathPoint> },

    /// Axis-aligned rectangle.
    Rectangle { rect: DocRect },

    /// Circle inscribed in its bounding rectangle: the diameter equals the
    /// shorter side, centered in the box.
    Circle { rect: DocRect },

    /// Highlight region; rendered fill-dominant with no stroke emphasis.
    Highlight { rect: DocRect },

    /// Line segment from start to end.
    Line { start: DocPoint, end: DocPoint },

    /// Line segment with an arrowhead at `end`. Direction is part of the
    /// geometry, so both endpoints are stored rather than a bounding box.
    Arrow { start: DocPoint, end: DocPoint },

    /// Text anchored at a single point (baseline bottom-left).
    Text { anchor: DocPoint, content: String },
}

impl AnnotationGeometry {
    /// Bounding box in document space.
    ///
    /// For text the extent is an estimate from the nominal glyph advance;
    /// exact bounds depend on the rendering backend.
    pub fn bounding_box(&self, style: &AnnotationStyle) -> DocRect {
        match self {
            AnnotationGeometry::Freehand { points } => {
                if points.is_empty() {
                    return DocRect::new(0.0, 0.0, 0.0, 0.0);
                }
                let mut min_x = points[0].x;
                let mut max_x = points[0].x;
                let mut min_y = points[0].y;
                let mut max_y = points[0].y;
                for point in points.iter().skip(1) {
                    min_x = min_x.min(point.x);
                    max_x = max_x.max(point.x);
                    min_y = min_y.min(point.y);
                    max_y = max_y.max(point.y);
                }
                DocRect::new(min_x, min_y, max_x - min_x, max_y - min_y)
            }
            AnnotationGeometry::Rectangle { rect }
            | AnnotationGeometry::Circle { rect }
            | AnnotationGeometry::Highlight { rect } => *rect,
            AnnotationGeometry::Line { start, end }
            | AnnotationGeometry::Arrow { start, end } => DocRect::from_corners(*start, *end),
            AnnotationGeometry::Text { anchor, content } => {
                let width = content.chars().count() as f32 * style.font_size * 0.6;
                DocRect::new(anchor.x, anchor.y, width, style.font_size * 1.2)
            }
        }
    }

    /// Whether a document-space point strikes this geometry within
    /// `tolerance` document units.
    ///
    /// Box variants use an inflated point-in-rectangle test; path and line
    /// variants use point-to-segment proximity.
    pub fn contains_point(
        &self,
        point: &DocPoint,
        tolerance: f32,
        style: &AnnotationStyle,
    ) -> bool {
        match self {
            AnnotationGeometry::Freehand { points } => {
                if points.len() == 1 {
                    return points[0].position().distance_to(point) <= tolerance;
                }
                points.windows(2).any(|pair| {
                    point_near_segment(point, &pair[0].position(), &pair[1].position(), tolerance)
                })
            }
            AnnotationGeometry::Rectangle { rect }
            | AnnotationGeometry::Circle { rect }
            | AnnotationGeometry::Highlight { rect } => rect.contains(point, tolerance),
            AnnotationGeometry::Line { start, end }
            | AnnotationGeometry::Arrow { start, end } => {
                point_near_segment(point, start, end, tolerance)
            }
            AnnotationGeometry::Text { .. } => {
                self.bounding_box(style).contains(point, tolerance)
            }
        }
    }

    /// A copy of this geometry translated by `(dx, dy)` document units.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        let shift = |p: &DocPoint| DocPoint::new(p.x + dx, p.y + dy);
        match self {
            AnnotationGeometry::Freehand { points } => AnnotationGeometry::Freehand {
                points: points
                    .iter()
                    .map(|p| PathPoint::new(p.x + dx, p.y + dy, p.pressure))
                    .collect(),
            },
            AnnotationGeometry::Rectangle { rect } => AnnotationGeometry::Rectangle {
                rect: DocRect::new(rect.x + dx, rect.y + dy, rect.width, rect.height),
            },
            AnnotationGeometry::Circle { rect } => AnnotationGeometry::Circle {
                rect: DocRect::new(rect.x + dx, rect.y + dy, rect.width, rect.height),
            },
            AnnotationGeometry::Highlight { rect } => AnnotationGeometry::Highlight {
                rect: DocRect::new(rect.x + dx, rect.y + dy, rect.width, rect.height),
            },
            AnnotationGeometry::Line { start, end } => AnnotationGeometry::Line {
                start: shift(start),
                end: shift(end),
            },
            AnnotationGeometry::Arrow { start, end } => AnnotationGeometry::Arrow {
                start: shift(start),
                end: shift(end),
            },
            AnnotationGeometry::Text { anchor, content } => AnnotationGeometry::Text {
                anchor: shift(anchor),
                content: content.clone(),
            },
        }
    }
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// A persisted annotation anchored to a single plan page.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Annotation {
    id: AnnotationId,

    /// Page this annotation belongs to (1-based).
    page_number: u32,

    geometry: AnnotationGeometry,
    style: AnnotationStyle,

    /// Hidden annotations are neither rendered nor hit-tested.
    visible: bool,

    /// Locked annotations can be selected but not moved or edited.
    locked: bool,

    created_at: i64,
    updated_at: i64,
    author_id: Option<String>,
}

impl Annotation {
    /// Create a new annotation with a freshly generated local id.
    pub fn new(page_number: u32, geometry: AnnotationGeometry, style: AnnotationStyle) -> Self {
        let now = unix_now();
        Self {
            id: AnnotationId::new_v4(),
            page_number,
            geometry,
            style,
            visible: true,
            locked: false,
            created_at: now,
            updated_at: now,
            author_id: None,
        }
    }

    /// Create an annotation with a known id (server-canonical records).
    pub fn with_id(
        id: AnnotationId,
        page_number: u32,
        geometry: AnnotationGeometry,
        style: AnnotationStyle,
    ) -> Self {
        let mut annotation = Self::new(page_number, geometry, style);
        annotation.id = id;
        annotation
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    /// Rebind the id, keeping everything else. Used when the persistence
    /// adapter returns the canonical server id for an optimistic create.
    pub(crate) fn set_id(&mut self, id: AnnotationId) {
        self.id = id;
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn geometry(&self) -> &AnnotationGeometry {
        &self.geometry
    }

    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author_id.as_deref()
    }

    pub fn set_author_id(&mut self, author_id: impl Into<String>) {
        self.author_id = Some(author_id.into());
    }

    pub fn bounding_box(&self) -> DocRect {
        self.geometry.bounding_box(&self.style)
    }

    /// Document-space hit test. Invisible annotations never hit.
    pub fn hit_test(&self, point: &DocPoint, tolerance: f32) -> bool {
        if !self.visible {
            return false;
        }
        self.geometry.contains_point(point, tolerance, &self.style)
    }

    /// A copy with new geometry, same id, and a refreshed update timestamp.
    pub fn with_geometry(&self, geometry: AnnotationGeometry) -> Self {
        let mut annotation = self.clone();
        annotation.geometry = geometry;
        annotation.updated_at = unix_now();
        annotation
    }

    /// A copy with new style, same id, and a refreshed update timestamp.
    pub fn with_style(&self, style: AnnotationStyle) -> Self {
        let mut annotation = self.clone();
        annotation.style = style;
        annotation.updated_at = unix_now();
        annotation
    }
}
