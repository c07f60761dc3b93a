//! In-memory annotation store
//!
//! Holds the annotations for the plan currently on screen. Order is
//! insertion order, which doubles as z-order: earlier entries render
//! first, later entries on top. `upsert` replaces in place so a
//! reconciled or edited annotation keeps its z position.

use crate::annotation::{Annotation, AnnotationId};

/// Insertion-ordered annotation collection keyed by id.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new annotation or replace the existing one with the same id.
    ///
    /// Replacement keeps the annotation's position in z-order.
    pub fn upsert(&mut self, annotation: Annotation) {
        match self.position(annotation.id()) {
            Some(index) => self.annotations[index] = annotation,
            None => self.annotations.push(annotation),
        }
    }

    /// Remove an annotation by id, returning it if present.
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        let index = self.position(id)?;
        Some(self.annotations.remove(index))
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.position(id).map(|index| &self.annotations[index])
    }

    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        let index = self.position(id)?;
        Some(&mut self.annotations[index])
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.position(id).is_some()
    }

    /// Rebind an annotation to a new id in place, preserving z-order.
    ///
    /// Used when the persistence adapter confirms a create with a
    /// server-assigned canonical id. Returns false if `old` is absent.
    pub fn replace_id(&mut self, old: AnnotationId, new: AnnotationId) -> bool {
        match self.position(old) {
            Some(index) => {
                self.annotations[index].set_id(new);
                true
            }
            None => false,
        }
    }

    /// All annotations for a page, in z-order (bottom first).
    pub fn for_page(&self, page_number: u32) -> impl DoubleEndedIterator<Item = &Annotation> {
        self.annotations
            .iter()
            .filter(move |a| a.page_number() == page_number)
    }

    /// All annotations in the store, in z-order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// The id set currently held, in z-order.
    pub fn ids(&self) -> Vec<AnnotationId> {
        self.annotations.iter().map(|a| a.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
    }

    fn position(&self, id: AnnotationId) -> Option<usize> {
        self.annotations.iter().position(|a| a.id() == id)
    }
}
