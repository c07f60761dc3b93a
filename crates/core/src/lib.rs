//! Planmark Core Library
//!
//! Annotation engine for survey plan markup: coordinate spaces, the
//! annotation data model and store, the drawing state machine, hit-testing,
//! and the persistence adapter interface with optimistic reconciliation.

pub mod annotation;
pub mod geometry;
pub mod hit;
pub mod persist;
pub mod session;
pub mod store;

pub use annotation::{
    Annotation, AnnotationGeometry, AnnotationId, AnnotationStyle, Color, FontWeight,
};
pub use geometry::{
    canvas_to_doc, doc_to_canvas, point_near_segment, rect_to_canvas, CanvasPoint, CanvasRect,
    DocPoint, DocRect, PathPoint,
};
pub use hit::{hit_test, Selection, DEFAULT_HIT_TOLERANCE_PX};
pub use persist::{
    AuthorizationGuard, Dispatch, PersistError, PersistResult, PersistenceAdapter, PlanId,
    Reconciler, Release, Resolution, SyncFailure, SyncOp,
};
pub use session::{DrawingEngine, DrawingSession, EngineConfig, EngineEvent, Tool};
pub use store::AnnotationStore;
