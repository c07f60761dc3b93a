//! Annotation replay renderer
//!
//! Replays an annotation store onto a [`DrawSurface`], converting each
//! annotation's document-space geometry into canvas space for the current
//! viewer transform. The pass is idempotent and total: it never mutates the
//! store, and a single bad annotation is skipped with a log line rather
//! than aborting the rest of the page.

use planmark_core::{
    doc_to_canvas, rect_to_canvas, Annotation, AnnotationGeometry, AnnotationStyle, CanvasPoint,
    DrawingSession,
};
use planmark_viewer::ViewerTransform;

use crate::surface::{DrawSurface, FillStyle, StrokeStyle, TextStyle};

/// Visual constants for the replay pass.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Arrowhead length in document units (scales with zoom).
    pub arrow_head_length: f32,

    /// Half-angle of the arrowhead in radians.
    pub arrow_head_half_angle: f32,

    /// Opacity multiplier for the in-progress preview pass, keeping it
    /// visually distinct from committed annotations.
    pub preview_opacity: f32,

    /// Fill opacity applied to highlights that don't specify their own.
    pub highlight_opacity: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            arrow_head_length: 12.0,
            arrow_head_half_angle: std::f32::consts::FRAC_PI_6,
            preview_opacity: 0.7,
            highlight_opacity: 0.35,
        }
    }
}

/// Replays committed annotations and live previews.
#[derive(Debug, Default)]
pub struct AnnotationRenderer {
    config: RenderConfig,
}

impl AnnotationRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw every visible annotation in z-order (bottom first).
    ///
    /// Returns the number of annotations actually drawn; annotations whose
    /// converted geometry is non-finite are skipped and logged.
    pub fn render_page<'a, I>(
        &self,
        annotations: I,
        transform: &ViewerTransform,
        surface: &mut dyn DrawSurface,
    ) -> usize
    where
        I: Iterator<Item = &'a Annotation>,
    {
        let mut drawn = 0;
        for annotation in annotations {
            if !annotation.is_visible() {
                continue;
            }
            if self.draw_geometry(annotation.geometry(), annotation.style(), transform, surface, 1.0)
            {
                drawn += 1;
            } else {
                tracing::warn!(
                    annotation_id = %annotation.id(),
                    "skipping annotation with non-finite canvas geometry"
                );
            }
        }
        drawn
    }

    /// Draw the in-progress session on the overlay surface.
    ///
    /// The overlay is cleared first so every pointer-move redraws from
    /// scratch and a cancelled draw never leaves residue.
    pub fn render_preview(
        &self,
        session: &DrawingSession,
        transform: &ViewerTransform,
        overlay: &mut dyn DrawSurface,
    ) {
        overlay.clear();
        let geometry = session.geometry();
        if !self.draw_geometry(
            &geometry,
            session.style(),
            transform,
            overlay,
            self.config.preview_opacity,
        ) {
            tracing::warn!("skipping preview with non-finite canvas geometry");
        }
    }

    /// Clear the overlay, e.g. after a finalize or cancel.
    pub fn clear_preview(&self, overlay: &mut dyn DrawSurface) {
        overlay.clear();
    }

    fn draw_geometry(
        &self,
        geometry: &AnnotationGeometry,
        style: &AnnotationStyle,
        transform: &ViewerTransform,
        surface: &mut dyn DrawSurface,
        opacity_factor: f32,
    ) -> bool {
        let zoom = transform.zoom();
        let stroke = StrokeStyle {
            color: style.stroke_color,
            width: style.stroke_width * zoom,
            opacity: style.opacity * opacity_factor,
        };
        let fill = style.fill_color.map(|color| FillStyle {
            color,
            opacity: style.fill_opacity.unwrap_or(style.opacity) * opacity_factor,
        });

        match geometry {
            AnnotationGeometry::Freehand { points } => {
                let canvas: Vec<CanvasPoint> = points
                    .iter()
                    .map(|p| doc_to_canvas(p.position(), transform))
                    .collect();
                if canvas.iter().any(|p| !p.is_finite()) {
                    return false;
                }
                surface.draw_path(&canvas, &stroke);
            }
            AnnotationGeometry::Rectangle { rect } => {
                let canvas = rect_to_canvas(*rect, transform);
                if !canvas.is_finite() {
                    return false;
                }
                surface.draw_rect(canvas, Some(&stroke), fill.as_ref());
            }
            AnnotationGeometry::Highlight { rect } => {
                let canvas = rect_to_canvas(*rect, transform);
                if !canvas.is_finite() {
                    return false;
                }
                // Fill-dominant: no stroke emphasis on highlights.
                let fill = FillStyle {
                    color: style.fill_color.unwrap_or(style.stroke_color),
                    opacity: style.fill_opacity.unwrap_or(self.config.highlight_opacity)
                        * opacity_factor,
                };
                surface.draw_rect(canvas, None, Some(&fill));
            }
            AnnotationGeometry::Circle { rect } => {
                let canvas = rect_to_canvas(*rect, transform);
                if !canvas.is_finite() {
                    return false;
                }
                // Inscribed: diameter equals the shorter side of the box.
                let radius = canvas.width.min(canvas.height) / 2.0;
                let center = CanvasPoint::new(
                    canvas.x + canvas.width / 2.0,
                    canvas.y + canvas.height / 2.0,
                );
                surface.draw_ellipse(center, radius, radius, Some(&stroke), fill.as_ref());
            }
            AnnotationGeometry::Line { start, end } => {
                let a = doc_to_canvas(*start, transform);
                let b = doc_to_canvas(*end, transform);
                if !a.is_finite() || !b.is_finite() {
                    return false;
                }
                surface.draw_path(&[a, b], &stroke);
            }
            AnnotationGeometry::Arrow { start, end } => {
                let a = doc_to_canvas(*start, transform);
                let b = doc_to_canvas(*end, transform);
                if !a.is_finite() || !b.is_finite() {
                    return false;
                }
                surface.draw_path(&[a, b], &stroke);
                if let Some(head) = self.arrow_head(a, b, zoom) {
                    surface.draw_path(&head, &stroke);
                }
            }
            AnnotationGeometry::Text { anchor, content } => {
                let canvas = doc_to_canvas(*anchor, transform);
                if !canvas.is_finite() {
                    return false;
                }
                let text_style = TextStyle {
                    color: style.stroke_color,
                    size: style.font_size * zoom,
                    family: style.font_family.clone(),
                    weight: style.font_weight,
                    opacity: style.opacity * opacity_factor,
                };
                surface.draw_text(canvas, content, &text_style);
            }
        }

        true
    }

    /// The two barb points of the arrowhead, wings first, tip in the middle.
    ///
    /// The head sits at `b` (the drag's end point) so direction survives
    /// any zoom or rotation. Zero-length arrows get no head.
    fn arrow_head(&self, a: CanvasPoint, b: CanvasPoint, zoom: f32) -> Option<[CanvasPoint; 3]> {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }

        let angle = dy.atan2(dx);
        let length = self.config.arrow_head_length * zoom;
        let half = self.config.arrow_head_half_angle;

        let barb = |theta: f32| {
            CanvasPoint::new(b.x - length * theta.cos(), b.y - length * theta.sin())
        };

        Some([barb(angle - half), b, barb(angle + half)])
    }
}
