//! Drawing surface abstraction
//!
//! The renderer draws through this capability instead of binding to a
//! concrete backend, so the same replay logic drives an on-screen canvas,
//! a software raster buffer, or the recording surface used in tests.
//! All coordinates handed to a surface are canvas-space pixels.

use planmark_core::{CanvasPoint, CanvasRect, Color, FontWeight};

/// Stroke parameters in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
}

/// Fill parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FillStyle {
    pub color: Color,
    pub opacity: f32,
}

/// Text parameters in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
    pub family: String,
    pub weight: FontWeight,
    pub opacity: f32,
}

/// Backend-agnostic drawing capability.
pub trait DrawSurface {
    /// Erase the whole surface.
    fn clear(&mut self);

    /// Stroke a polyline through the given points.
    fn draw_path(&mut self, points: &[CanvasPoint], stroke: &StrokeStyle);

    /// Fill and/or stroke an axis-aligned rectangle.
    fn draw_rect(&mut self, rect: CanvasRect, stroke: Option<&StrokeStyle>, fill: Option<&FillStyle>);

    /// Fill and/or stroke an ellipse.
    fn draw_ellipse(
        &mut self,
        center: CanvasPoint,
        radius_x: f32,
        radius_y: f32,
        stroke: Option<&StrokeStyle>,
        fill: Option<&FillStyle>,
    );

    /// Draw a string anchored at its baseline start.
    fn draw_text(&mut self, anchor: CanvasPoint, content: &str, style: &TextStyle);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Path {
        points: Vec<CanvasPoint>,
        stroke: StrokeStyle,
    },
    Rect {
        rect: CanvasRect,
        stroke: Option<StrokeStyle>,
        fill: Option<FillStyle>,
    },
    Ellipse {
        center: CanvasPoint,
        radius_x: f32,
        radius_y: f32,
        stroke: Option<StrokeStyle>,
        fill: Option<FillStyle>,
    },
    Text {
        anchor: CanvasPoint,
        content: String,
        style: TextStyle,
    },
}

/// A surface that records every call instead of rasterizing.
///
/// The command log is `PartialEq`, which is how the tests check that two
/// render passes are bit-identical.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_path(&mut self, points: &[CanvasPoint], stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            stroke: stroke.clone(),
        });
    }

    fn draw_rect(
        &mut self,
        rect: CanvasRect,
        stroke: Option<&StrokeStyle>,
        fill: Option<&FillStyle>,
    ) {
        self.commands.push(DrawCommand::Rect {
            rect,
            stroke: stroke.cloned(),
            fill: fill.cloned(),
        });
    }

    fn draw_ellipse(
        &mut self,
        center: CanvasPoint,
        radius_x: f32,
        radius_y: f32,
        stroke: Option<&StrokeStyle>,
        fill: Option<&FillStyle>,
    ) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radius_x,
            radius_y,
            stroke: stroke.cloned(),
            fill: fill.cloned(),
        });
    }

    fn draw_text(&mut self, anchor: CanvasPoint, content: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            anchor,
            content: content.to_string(),
            style: style.clone(),
        });
    }
}
