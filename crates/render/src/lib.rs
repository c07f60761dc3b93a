//! Planmark Render Library
//!
//! Backend-agnostic annotation rendering: the [`DrawSurface`] drawing
//! abstraction, the page rasterizer interface, and the replay renderer that
//! converts document-space annotations into canvas-space draw calls.

pub mod raster;
pub mod renderer;
pub mod surface;

pub use raster::{PageRasterizer, RasterError, RasterPage};
pub use renderer::{AnnotationRenderer, RenderConfig};
pub use surface::{DrawCommand, DrawSurface, FillStyle, RecordingSurface, StrokeStyle, TextStyle};
