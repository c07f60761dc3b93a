//! Hit-testing and selection
//!
//! Resolves a canvas-space pointer position to the topmost annotation under
//! it. The pixel tolerance is fixed in screen space, so it is divided by the
//! zoom before testing in document space: a 10px grab radius feels the same
//! at every zoom level.

use std::collections::HashSet;

use planmark_viewer::ViewerTransform;

use crate::annotation::{Annotation, AnnotationId};
use crate::geometry::{canvas_to_doc, CanvasPoint};

/// Default grab radius around strokes and outlines, in screen pixels.
pub const DEFAULT_HIT_TOLERANCE_PX: f32 = 10.0;

/// Find the topmost annotation under `point`.
///
/// `annotations` must be in z-order (bottom first), as produced by
/// [`crate::store::AnnotationStore::for_page`]; the scan runs in reverse so
/// overlapping annotations resolve to the most recently created one.
/// Invisible annotations never hit; locked annotations do (locking blocks
/// edits, not selection).
pub fn hit_test<'a, I>(
    point: CanvasPoint,
    transform: &ViewerTransform,
    annotations: I,
    tolerance_px: f32,
) -> Option<&'a Annotation>
where
    I: DoubleEndedIterator<Item = &'a Annotation>,
{
    if !point.is_finite() {
        return None;
    }

    let doc_point = canvas_to_doc(point, transform);
    let tolerance = tolerance_px / transform.zoom();

    annotations
        .rev()
        .find(|annotation| annotation.hit_test(&doc_point, tolerance))
}

/// The current selection: a set of annotation ids.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    ids: HashSet<AnnotationId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole selection with a single annotation.
    pub fn replace(&mut self, id: AnnotationId) {
        self.ids.clear();
        self.ids.insert(id);
    }

    /// Additive select: toggle membership (shift-click behavior).
    pub fn toggle(&mut self, id: AnnotationId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Drop an id, e.g. when its annotation is deleted.
    pub fn deselect(&mut self, id: AnnotationId) {
        self.ids.remove(&id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = AnnotationId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationGeometry, AnnotationStyle};
    use crate::geometry::DocRect;
    use crate::store::AnnotationStore;

    fn transform() -> ViewerTransform {
        ViewerTransform::new(600.0, 800.0).unwrap()
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Annotation {
        Annotation::new(
            1,
            AnnotationGeometry::Rectangle {
                rect: DocRect::new(x, y, w, h),
            },
            AnnotationStyle::new(),
        )
    }

    #[test]
    fn overlapping_annotations_resolve_to_the_topmost() {
        let mut store = AnnotationStore::new();
        let below = rect(100.0, 100.0, 200.0, 200.0);
        let above = rect(100.0, 100.0, 200.0, 200.0);
        let above_id = above.id();
        store.upsert(below);
        store.upsert(above);

        // Canvas point over both: doc (200, 200) -> canvas (200, 800-200).
        let hit = hit_test(
            CanvasPoint::new(200.0, 600.0),
            &transform(),
            store.for_page(1),
            DEFAULT_HIT_TOLERANCE_PX,
        );
        assert_eq!(hit.map(|a| a.id()), Some(above_id));
    }

    #[test]
    fn tolerance_shrinks_with_zoom() {
        let mut store = AnnotationStore::new();
        store.upsert(rect(100.0, 100.0, 50.0, 50.0));

        // 8 doc units left of the box edge.
        let mut t = transform();
        let near_miss_doc_x = 92.0;

        // At zoom 1 a 10px tolerance covers 10 doc units: hit.
        let hit = hit_test(
            CanvasPoint::new(near_miss_doc_x, 800.0 - 120.0),
            &t,
            store.for_page(1),
            10.0,
        );
        assert!(hit.is_some());

        // At zoom 4 the same 10px tolerance is only 2.5 doc units: miss.
        t.set_zoom(4.0);
        let miss = hit_test(
            CanvasPoint::new(near_miss_doc_x * 4.0, (800.0 - 120.0) * 4.0),
            &t,
            store.for_page(1),
            10.0,
        );
        assert!(miss.is_none());
    }

    #[test]
    fn invisible_annotations_are_skipped() {
        let mut store = AnnotationStore::new();
        let mut hidden = rect(100.0, 100.0, 200.0, 200.0);
        hidden.set_visible(false);
        store.upsert(hidden);

        let hit = hit_test(
            CanvasPoint::new(200.0, 600.0),
            &transform(),
            store.for_page(1),
            DEFAULT_HIT_TOLERANCE_PX,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn non_finite_pointer_never_hits() {
        let mut store = AnnotationStore::new();
        store.upsert(rect(0.0, 0.0, 600.0, 800.0));

        let hit = hit_test(
            CanvasPoint::new(f32::NAN, 100.0),
            &transform(),
            store.for_page(1),
            DEFAULT_HIT_TOLERANCE_PX,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn selection_toggle_is_additive() {
        let mut selection = Selection::new();
        let a = AnnotationId::new_v4();
        let b = AnnotationId::new_v4();

        selection.replace(a);
        selection.toggle(b);
        assert_eq!(selection.len(), 2);
        assert!(selection.contains(a) && selection.contains(b));

        selection.toggle(a);
        assert!(!selection.contains(a));
        assert_eq!(selection.len(), 1);

        selection.clear();
        assert!(selection.is_empty());
    }
}
