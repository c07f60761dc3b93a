//! Drawing state machine
//!
//! Converts pointer events into committed annotations. The engine is
//! single-threaded and synchronous: pointer-down opens a drawing session,
//! pointer-move grows it, pointer-up freezes it into an [`Annotation`] and
//! pushes it into the store, pointer-cancel discards it without trace.
//! Persistence is the host's job; the engine reports what happened through
//! [`EngineEvent`] and the host dispatches adapter calls.

use planmark_viewer::ViewerTransform;

use crate::annotation::{Annotation, AnnotationGeometry, AnnotationId, AnnotationStyle};
use crate::geometry::{canvas_to_doc, CanvasPoint, DocPoint, DocRect, PathPoint};
use crate::hit::{hit_test, Selection, DEFAULT_HIT_TOLERANCE_PX};
use crate::store::AnnotationStore;

/// The active tool.
///
/// `Select` drives hit-testing and drag-moves, `Pan`/`Zoom` are delegated
/// entirely to the surrounding viewer; the rest are drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Pan,
    Zoom,
    Freehand,
    Rectangle,
    Circle,
    Highlight,
    Line,
    Arrow,
    Text,
}

impl Tool {
    /// Whether this tool produces annotations.
    pub fn is_drawing(self) -> bool {
        !matches!(self, Tool::Select | Tool::Pan | Tool::Zoom)
    }
}

/// Engine behavior knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Grab radius for hit-testing, in screen pixels.
    pub hit_tolerance_px: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hit_tolerance_px: DEFAULT_HIT_TOLERANCE_PX,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hit_tolerance(mut self, tolerance_px: f32) -> Self {
        self.hit_tolerance_px = tolerance_px;
        self
    }
}

/// What an input event did, for the host to act on.
///
/// `Committed` and `Updated` carry the annotation the host should hand to
/// the persistence adapter (create and update respectively).
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Nothing happened.
    None,

    /// The preview overlay or main surface needs a redraw.
    RenderNeeded,

    /// A drawing session finalized into this annotation; it is already in
    /// the store and awaits a persistence create.
    Committed(Annotation),

    /// An existing annotation changed (drag-move); it awaits a persistence
    /// update.
    Updated(Annotation),

    /// The selection set changed.
    SelectionChanged(Vec<AnnotationId>),
}

/// The in-progress annotation between pointer-down and pointer-up/cancel.
///
/// Ephemeral and never persisted; the preview pass renders it on the
/// overlay surface.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    tool: Tool,
    page_number: u32,
    style: AnnotationStyle,
    anchor: DocPoint,
    current: DocPoint,
    points: Vec<PathPoint>,
    text: String,
}

impl DrawingSession {
    fn open(
        tool: Tool,
        page_number: u32,
        style: AnnotationStyle,
        anchor: DocPoint,
        pressure: f32,
        text: String,
    ) -> Self {
        let points = if tool == Tool::Freehand {
            vec![PathPoint::new(anchor.x, anchor.y, pressure)]
        } else {
            Vec::new()
        };
        Self {
            tool,
            page_number,
            style,
            anchor,
            current: anchor,
            points,
            text,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    pub fn anchor(&self) -> DocPoint {
        self.anchor
    }

    /// The live document-space geometry for this session.
    ///
    /// Box tools recompute their bounds from anchor and current point each
    /// move; line/arrow keep the drag direction; freehand grows
    /// monotonically.
    pub fn geometry(&self) -> AnnotationGeometry {
        match self.tool {
            Tool::Freehand => AnnotationGeometry::Freehand {
                points: self.points.clone(),
            },
            Tool::Rectangle => AnnotationGeometry::Rectangle {
                rect: DocRect::from_corners(self.anchor, self.current),
            },
            Tool::Circle => AnnotationGeometry::Circle {
                rect: DocRect::from_corners(self.anchor, self.current),
            },
            Tool::Highlight => AnnotationGeometry::Highlight {
                rect: DocRect::from_corners(self.anchor, self.current),
            },
            Tool::Line => AnnotationGeometry::Line {
                start: self.anchor,
                end: self.current,
            },
            Tool::Arrow => AnnotationGeometry::Arrow {
                start: self.anchor,
                end: self.current,
            },
            Tool::Text => AnnotationGeometry::Text {
                anchor: self.anchor,
                content: self.text.clone(),
            },
            // Non-drawing tools never open a session.
            Tool::Select | Tool::Pan | Tool::Zoom => unreachable!("no session for {:?}", self.tool),
        }
    }

    fn push_point(&mut self, point: DocPoint, pressure: f32) {
        self.current = point;
        if self.tool == Tool::Freehand {
            self.points.push(PathPoint::new(point.x, point.y, pressure));
        }
    }
}

/// A drag of an existing annotation with the select tool.
#[derive(Debug, Clone)]
struct MoveDrag {
    id: AnnotationId,
    /// Snapshot for restoring on pointer-cancel.
    original: Annotation,
    last: DocPoint,
    moved: bool,
}

#[derive(Debug, Clone)]
enum DragState {
    Drawing(DrawingSession),
    Moving(MoveDrag),
}

/// The annotation engine: store, selection, active tool, and the drawing
/// state machine (`Idle` when `drag` is empty, `Drawing`/`Moving`
/// otherwise).
#[derive(Debug)]
pub struct DrawingEngine {
    store: AnnotationStore,
    selection: Selection,
    config: EngineConfig,
    tool: Tool,
    style: AnnotationStyle,
    page_number: u32,
    editable: bool,
    pending_text: Option<String>,
    drag: Option<DragState>,
}

impl DrawingEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: AnnotationStore::new(),
            selection: Selection::new(),
            config,
            tool: Tool::Select,
            style: AnnotationStyle::red_markup(),
            page_number: 1,
            editable: true,
            pending_text: None,
            drag: None,
        }
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AnnotationStore {
        &mut self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    /// Style applied to annotations drawn from now on.
    pub fn set_style(&mut self, style: AnnotationStyle) {
        self.style = style;
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Switch the page new annotations anchor to. An active drag is
    /// cancelled; the store is left to the host to repopulate.
    pub fn set_page_number(&mut self, page_number: u32) {
        self.page_number = page_number.max(1);
        self.drag = None;
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Driven by the authorization guard: when not editable the engine is a
    /// read-only viewer and only `Select` input is honored.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
        if !editable {
            self.drag = None;
        }
    }

    /// Text content for the next `Text` pointer-down. Supplied synchronously
    /// by the host (e.g. from an input prompt) before forwarding the event.
    pub fn set_pending_text(&mut self, content: impl Into<String>) {
        self.pending_text = Some(content.into());
    }

    /// The in-progress session, if any, for the preview pass.
    pub fn session(&self) -> Option<&DrawingSession> {
        match &self.drag {
            Some(DragState::Drawing(session)) => Some(session),
            _ => None,
        }
    }

    /// Replace the store contents from the persistence adapter's listing.
    pub fn load_annotations(&mut self, annotations: Vec<Annotation>) {
        self.store.clear();
        self.selection.clear();
        for annotation in annotations {
            self.store.upsert(annotation);
        }
    }

    /// Pointer pressed on the canvas.
    ///
    /// `additive` is the multi-select modifier (shift). A pointer-down while
    /// a drag is already active is ignored; the input surface is expected to
    /// capture the initiating pointer exclusively.
    pub fn pointer_down(
        &mut self,
        point: CanvasPoint,
        pressure: f32,
        additive: bool,
        transform: &ViewerTransform,
    ) -> EngineEvent {
        if self.drag.is_some() || !point.is_finite() {
            return EngineEvent::None;
        }

        match self.tool {
            Tool::Pan | Tool::Zoom => EngineEvent::None,
            Tool::Select => self.select_down(point, additive, transform),
            _ => {
                if !self.editable {
                    return EngineEvent::None;
                }
                let anchor = canvas_to_doc(point, transform);
                let text = if self.tool == Tool::Text {
                    self.pending_text.take().unwrap_or_default()
                } else {
                    String::new()
                };
                self.drag = Some(DragState::Drawing(DrawingSession::open(
                    self.tool,
                    self.page_number,
                    self.style.clone(),
                    anchor,
                    pressure,
                    text,
                )));
                EngineEvent::RenderNeeded
            }
        }
    }

    /// Pointer moved while pressed.
    pub fn pointer_move(
        &mut self,
        point: CanvasPoint,
        pressure: f32,
        transform: &ViewerTransform,
    ) -> EngineEvent {
        if !point.is_finite() {
            return EngineEvent::None;
        }
        let doc_point = canvas_to_doc(point, transform);

        match &mut self.drag {
            Some(DragState::Drawing(session)) => {
                session.push_point(doc_point, pressure);
                EngineEvent::RenderNeeded
            }
            Some(DragState::Moving(drag)) => {
                let dx = doc_point.x - drag.last.x;
                let dy = doc_point.y - drag.last.y;
                drag.last = doc_point;
                if dx == 0.0 && dy == 0.0 {
                    return EngineEvent::None;
                }
                drag.moved = true;
                let id = drag.id;
                if let Some(annotation) = self.store.get(id) {
                    let translated = annotation.with_geometry(annotation.geometry().translated(dx, dy));
                    self.store.upsert(translated);
                }
                EngineEvent::RenderNeeded
            }
            None => EngineEvent::None,
        }
    }

    /// Pointer released: finalize the session or commit the move.
    pub fn pointer_up(
        &mut self,
        point: CanvasPoint,
        pressure: f32,
        transform: &ViewerTransform,
    ) -> EngineEvent {
        match self.drag.take() {
            Some(DragState::Drawing(mut session)) => {
                if point.is_finite() {
                    session.push_point(canvas_to_doc(point, transform), pressure);
                }
                let annotation =
                    Annotation::new(session.page_number(), session.geometry(), session.style().clone());
                self.store.upsert(annotation.clone());
                EngineEvent::Committed(annotation)
            }
            Some(DragState::Moving(drag)) => {
                if !drag.moved {
                    return EngineEvent::None;
                }
                match self.store.get(drag.id) {
                    Some(annotation) => EngineEvent::Updated(annotation.clone()),
                    None => EngineEvent::None,
                }
            }
            None => EngineEvent::None,
        }
    }

    /// Pointer cancelled: abort without trace.
    ///
    /// A cancelled draw leaves the store untouched; a cancelled move
    /// restores the annotation's original geometry.
    pub fn pointer_cancel(&mut self) -> EngineEvent {
        match self.drag.take() {
            Some(DragState::Drawing(_)) => EngineEvent::RenderNeeded,
            Some(DragState::Moving(drag)) => {
                if drag.moved {
                    self.store.upsert(drag.original);
                }
                EngineEvent::RenderNeeded
            }
            None => EngineEvent::None,
        }
    }

    /// Remove an annotation locally (the host dispatches the adapter call).
    pub fn remove_annotation(&mut self, id: AnnotationId) -> Option<Annotation> {
        self.selection.deselect(id);
        self.store.remove(id)
    }

    fn select_down(
        &mut self,
        point: CanvasPoint,
        additive: bool,
        transform: &ViewerTransform,
    ) -> EngineEvent {
        let hit = hit_test(
            point,
            transform,
            self.store.for_page(self.page_number),
            self.config.hit_tolerance_px,
        )
        .map(|a| (a.id(), a.is_locked(), a.clone()));

        match hit {
            Some((id, locked, original)) => {
                if additive {
                    self.selection.toggle(id);
                } else if !self.selection.contains(id) {
                    self.selection.replace(id);
                }

                // Locked annotations stay selectable but never move.
                if self.editable && !locked && self.selection.contains(id) {
                    self.drag = Some(DragState::Moving(MoveDrag {
                        id,
                        original,
                        last: canvas_to_doc(point, transform),
                        moved: false,
                    }));
                }
            }
            None => {
                if !additive {
                    self.selection.clear();
                }
            }
        }

        EngineEvent::SelectionChanged(self.selection.ids().collect())
    }
}

impl Default for DrawingEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> ViewerTransform {
        ViewerTransform::new(600.0, 800.0).unwrap()
    }

    fn engine(tool: Tool) -> DrawingEngine {
        let mut engine = DrawingEngine::default();
        engine.set_tool(tool);
        engine
    }

    #[test]
    fn rectangle_drag_commits_flipped_document_box() {
        // The worked scenario: page 600x800, zoom 1, drag canvas
        // (100,100) -> (300,250) with the rectangle tool.
        let mut engine = engine(Tool::Rectangle);
        let t = transform();

        engine.pointer_down(CanvasPoint::new(100.0, 100.0), 0.5, false, &t);
        engine.pointer_move(CanvasPoint::new(300.0, 250.0), 0.5, &t);
        let event = engine.pointer_up(CanvasPoint::new(300.0, 250.0), 0.5, &t);

        let annotation = match event {
            EngineEvent::Committed(a) => a,
            other => panic!("expected commit, got {other:?}"),
        };
        assert_eq!(annotation.page_number(), 1);
        match annotation.geometry() {
            AnnotationGeometry::Rectangle { rect } => {
                assert_eq!(rect.x, 100.0);
                assert_eq!(rect.y, 550.0);
                assert_eq!(rect.width, 200.0);
                assert_eq!(rect.height, 150.0);
            }
            other => panic!("expected rectangle, got {other:?}"),
        }
        assert_eq!(engine.store().len(), 1);
    }

    #[test]
    fn freehand_path_grows_monotonically() {
        let mut engine = engine(Tool::Freehand);
        let t = transform();

        engine.pointer_down(CanvasPoint::new(10.0, 10.0), 0.7, false, &t);
        for i in 1..=5 {
            engine.pointer_move(CanvasPoint::new(10.0 + i as f32 * 4.0, 10.0), 0.7, &t);
        }
        let event = engine.pointer_up(CanvasPoint::new(40.0, 10.0), 0.7, &t);

        match event {
            EngineEvent::Committed(annotation) => match annotation.geometry() {
                AnnotationGeometry::Freehand { points } => {
                    // down + 5 moves + up
                    assert_eq!(points.len(), 7);
                    assert!(points.windows(2).all(|w| w[1].x >= w[0].x));
                }
                other => panic!("expected freehand, got {other:?}"),
            },
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn line_and_arrow_preserve_drag_direction() {
        for tool in [Tool::Line, Tool::Arrow] {
            let mut engine = engine(tool);
            let t = transform();

            // Drag right-to-left so the box-normalized form would differ.
            engine.pointer_down(CanvasPoint::new(300.0, 100.0), 0.5, false, &t);
            engine.pointer_move(CanvasPoint::new(100.0, 250.0), 0.5, &t);
            let event = engine.pointer_up(CanvasPoint::new(100.0, 250.0), 0.5, &t);

            let annotation = match event {
                EngineEvent::Committed(a) => a,
                other => panic!("expected commit, got {other:?}"),
            };
            let (start, end) = match annotation.geometry() {
                AnnotationGeometry::Line { start, end }
                | AnnotationGeometry::Arrow { start, end } => (*start, *end),
                other => panic!("expected line/arrow, got {other:?}"),
            };
            assert_eq!(start, DocPoint::new(300.0, 700.0));
            assert_eq!(end, DocPoint::new(100.0, 550.0));
        }
    }

    #[test]
    fn cancel_leaves_no_trace() {
        let mut engine = engine(Tool::Freehand);
        let t = transform();
        let ids_before = engine.store().ids();

        engine.pointer_down(CanvasPoint::new(10.0, 10.0), 0.5, false, &t);
        for i in 1..=10 {
            engine.pointer_move(CanvasPoint::new(10.0 + i as f32, 10.0), 0.5, &t);
        }
        engine.pointer_cancel();

        assert_eq!(engine.store().ids(), ids_before);
        assert!(engine.session().is_none());
    }

    #[test]
    fn zero_area_box_commit_is_accepted() {
        let mut engine = engine(Tool::Rectangle);
        let t = transform();

        engine.pointer_down(CanvasPoint::new(100.0, 100.0), 0.5, false, &t);
        let event = engine.pointer_up(CanvasPoint::new(100.0, 100.0), 0.5, &t);

        match event {
            EngineEvent::Committed(annotation) => match annotation.geometry() {
                AnnotationGeometry::Rectangle { rect } => {
                    assert_eq!(rect.width, 0.0);
                    assert_eq!(rect.height, 0.0);
                }
                other => panic!("expected rectangle, got {other:?}"),
            },
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn second_pointer_down_while_drawing_is_ignored() {
        let mut engine = engine(Tool::Rectangle);
        let t = transform();

        engine.pointer_down(CanvasPoint::new(100.0, 100.0), 0.5, false, &t);
        let event = engine.pointer_down(CanvasPoint::new(200.0, 200.0), 0.5, false, &t);
        assert_eq!(event, EngineEvent::None);

        // The original session is still live and anchored at the first point.
        let session = engine.session().expect("session should survive");
        assert_eq!(session.anchor(), DocPoint::new(100.0, 700.0));
    }

    #[test]
    fn read_only_mode_refuses_drawing_but_allows_selection() {
        let t = transform();
        let mut engine = engine(Tool::Rectangle);

        // Seed one annotation while editable.
        engine.pointer_down(CanvasPoint::new(100.0, 100.0), 0.5, false, &t);
        engine.pointer_move(CanvasPoint::new(300.0, 250.0), 0.5, &t);
        engine.pointer_up(CanvasPoint::new(300.0, 250.0), 0.5, &t);

        engine.set_editable(false);

        let event = engine.pointer_down(CanvasPoint::new(400.0, 400.0), 0.5, false, &t);
        assert_eq!(event, EngineEvent::None);
        assert_eq!(engine.store().len(), 1);

        engine.set_tool(Tool::Select);
        let event = engine.pointer_down(CanvasPoint::new(200.0, 180.0), 0.5, false, &t);
        match event {
            EngineEvent::SelectionChanged(ids) => assert_eq!(ids.len(), 1),
            other => panic!("expected selection change, got {other:?}"),
        }
        // Read-only: selection works but no move drag was opened.
        assert_eq!(
            engine.pointer_move(CanvasPoint::new(250.0, 180.0), 0.5, &t),
            EngineEvent::None
        );
    }

    #[test]
    fn text_commits_pending_content_at_anchor() {
        let mut engine = engine(Tool::Text);
        let t = transform();

        engine.set_pending_text("IP FOUND");
        engine.pointer_down(CanvasPoint::new(50.0, 60.0), 0.5, false, &t);
        let event = engine.pointer_up(CanvasPoint::new(50.0, 60.0), 0.5, &t);

        match event {
            EngineEvent::Committed(annotation) => match annotation.geometry() {
                AnnotationGeometry::Text { anchor, content } => {
                    assert_eq!(content, "IP FOUND");
                    assert_eq!(*anchor, DocPoint::new(50.0, 740.0));
                }
                other => panic!("expected text, got {other:?}"),
            },
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn select_drag_moves_annotation_and_emits_update() {
        let t = transform();
        let mut engine = engine(Tool::Rectangle);

        engine.pointer_down(CanvasPoint::new(100.0, 100.0), 0.5, false, &t);
        engine.pointer_move(CanvasPoint::new(300.0, 250.0), 0.5, &t);
        let committed = match engine.pointer_up(CanvasPoint::new(300.0, 250.0), 0.5, &t) {
            EngineEvent::Committed(a) => a,
            other => panic!("expected commit, got {other:?}"),
        };

        engine.set_tool(Tool::Select);
        engine.pointer_down(CanvasPoint::new(200.0, 180.0), 0.5, false, &t);
        engine.pointer_move(CanvasPoint::new(250.0, 180.0), 0.5, &t);
        let event = engine.pointer_up(CanvasPoint::new(250.0, 180.0), 0.5, &t);

        let updated = match event {
            EngineEvent::Updated(a) => a,
            other => panic!("expected update, got {other:?}"),
        };
        assert_eq!(updated.id(), committed.id());
        match updated.geometry() {
            AnnotationGeometry::Rectangle { rect } => {
                // Moved 50 canvas px right at zoom 1.
                assert_eq!(rect.x, 150.0);
                assert_eq!(rect.y, 550.0);
            }
            other => panic!("expected rectangle, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_move_restores_original_geometry() {
        let t = transform();
        let mut engine = engine(Tool::Rectangle);

        engine.pointer_down(CanvasPoint::new(100.0, 100.0), 0.5, false, &t);
        engine.pointer_move(CanvasPoint::new(300.0, 250.0), 0.5, &t);
        let committed = match engine.pointer_up(CanvasPoint::new(300.0, 250.0), 0.5, &t) {
            EngineEvent::Committed(a) => a,
            other => panic!("expected commit, got {other:?}"),
        };

        engine.set_tool(Tool::Select);
        engine.pointer_down(CanvasPoint::new(200.0, 180.0), 0.5, false, &t);
        engine.pointer_move(CanvasPoint::new(280.0, 120.0), 0.5, &t);
        engine.pointer_cancel();

        let restored = engine.store().get(committed.id()).expect("still present");
        assert_eq!(restored.geometry(), committed.geometry());
    }

    #[test]
    fn locked_annotation_is_selectable_but_not_movable() {
        let t = transform();
        let mut engine = engine(Tool::Rectangle);

        engine.pointer_down(CanvasPoint::new(100.0, 100.0), 0.5, false, &t);
        engine.pointer_move(CanvasPoint::new(300.0, 250.0), 0.5, &t);
        let committed = match engine.pointer_up(CanvasPoint::new(300.0, 250.0), 0.5, &t) {
            EngineEvent::Committed(a) => a,
            other => panic!("expected commit, got {other:?}"),
        };
        engine
            .store_mut()
            .get_mut(committed.id())
            .unwrap()
            .set_locked(true);

        engine.set_tool(Tool::Select);
        let event = engine.pointer_down(CanvasPoint::new(200.0, 180.0), 0.5, false, &t);
        match event {
            EngineEvent::SelectionChanged(ids) => assert_eq!(ids, vec![committed.id()]),
            other => panic!("expected selection change, got {other:?}"),
        }

        engine.pointer_move(CanvasPoint::new(260.0, 180.0), 0.5, &t);
        let unchanged = engine.store().get(committed.id()).unwrap();
        assert_eq!(unchanged.geometry(), committed.geometry());
    }

    #[test]
    fn empty_area_click_clears_selection() {
        let t = transform();
        let mut engine = engine(Tool::Rectangle);

        engine.pointer_down(CanvasPoint::new(100.0, 100.0), 0.5, false, &t);
        engine.pointer_move(CanvasPoint::new(300.0, 250.0), 0.5, &t);
        engine.pointer_up(CanvasPoint::new(300.0, 250.0), 0.5, &t);

        engine.set_tool(Tool::Select);
        engine.pointer_down(CanvasPoint::new(200.0, 180.0), 0.5, false, &t);
        engine.pointer_up(CanvasPoint::new(200.0, 180.0), 0.5, &t);
        assert_eq!(engine.selection().len(), 1);

        let event = engine.pointer_down(CanvasPoint::new(550.0, 700.0), 0.5, false, &t);
        assert_eq!(event, EngineEvent::SelectionChanged(Vec::new()));
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn authorization_guard_drives_read_only_mode() {
        use crate::persist::{AuthorizationGuard, PlanId};

        struct PlanPermissions {
            editable_plan: PlanId,
        }

        impl AuthorizationGuard for PlanPermissions {
            fn can_edit(&self, plan_id: PlanId) -> bool {
                plan_id == self.editable_plan
            }
        }

        let editable_plan = PlanId::new_v4();
        let foreign_plan = PlanId::new_v4();
        let guard = PlanPermissions { editable_plan };
        let t = transform();

        let mut engine = engine(Tool::Rectangle);
        engine.set_editable(guard.can_edit(foreign_plan));
        assert!(!engine.is_editable());
        let event = engine.pointer_down(CanvasPoint::new(100.0, 100.0), 0.5, false, &t);
        assert_eq!(event, EngineEvent::None);
        assert!(engine.store().is_empty());

        engine.set_editable(guard.can_edit(editable_plan));
        let event = engine.pointer_down(CanvasPoint::new(100.0, 100.0), 0.5, false, &t);
        assert_eq!(event, EngineEvent::RenderNeeded);
    }

    #[test]
    fn pan_and_zoom_tools_are_delegated() {
        let t = transform();
        for tool in [Tool::Pan, Tool::Zoom] {
            let mut engine = engine(tool);
            let event = engine.pointer_down(CanvasPoint::new(100.0, 100.0), 0.5, false, &t);
            assert_eq!(event, EngineEvent::None);
            assert!(engine.session().is_none());
        }
    }
}
