//! Persistence adapter interface and optimistic reconciliation
//!
//! The engine never talks to a network itself. Commits are applied to the
//! local store immediately (optimistic), then handed to a
//! [`PersistenceAdapter`] by the host. The [`Reconciler`] tracks what is in
//! flight, serializes create/update per annotation id, and applies the
//! server's canonical answer when the host reports it back.
//!
//! Failures never roll back the local store: losing consistency beats
//! losing a surveyor's freehand markup. The host receives a
//! [`SyncFailure`] and decides whether to retry, discard, or flag the
//! annotation as unsynced.

use std::collections::HashMap;

use thiserror::Error;

use crate::annotation::{Annotation, AnnotationId};
use crate::store::AnnotationStore;

/// Identifier of a survey plan (the unit annotations are listed under).
pub type PlanId = uuid::Uuid;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("not authorized to edit plan {0}")]
    Unauthorized(PlanId),

    #[error("server rejected annotation: {0}")]
    Validation(String),

    #[error("annotation {0} not found on server")]
    NotFound(AnnotationId),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// External annotation storage. Implementations own transport and schema
/// mapping; the serde form of [`Annotation`] is the contract.
///
/// `create` and `update` return the canonical server record, which may
/// carry a different id than the optimistic local one.
pub trait PersistenceAdapter {
    fn create(&mut self, annotation: &Annotation) -> PersistResult<Annotation>;

    fn update(&mut self, id: AnnotationId, annotation: &Annotation) -> PersistResult<Annotation>;

    fn remove(&mut self, id: AnnotationId) -> PersistResult<()>;

    fn list_for_plan(
        &mut self,
        plan_id: PlanId,
        page_number: Option<u32>,
    ) -> PersistResult<Vec<Annotation>>;
}

/// External permission check consulted before accepting drawing input.
pub trait AuthorizationGuard {
    fn can_edit(&self, plan_id: PlanId) -> bool;
}

/// Which adapter call an entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    Create,
    Update,
    Remove,
}

/// A persistence call that failed. The optimistic store entry is still
/// present; retry/discard is the host's decision.
#[derive(Debug)]
pub struct SyncFailure {
    pub annotation_id: AnnotationId,
    pub op: SyncOp,
    pub error: PersistError,
}

/// Whether the host should dispatch an adapter call now or wait.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Nothing in flight for this id; send it.
    Now,

    /// A call for the same id is in flight; the op was queued and will be
    /// released by the matching `resolve_*`.
    Queued,
}

/// An op held back while a call for the same id was in flight.
///
/// A queued remove supersedes any queued update; the annotation is gone
/// locally, so only the delete needs to reach the server.
#[derive(Debug, Clone)]
enum QueuedOp {
    Update(Annotation),
    Remove,
}

/// A queued op released by a `resolve_*`, rebound to the id the server
/// knows. The host dispatches the matching adapter call now.
#[derive(Debug, Clone, PartialEq)]
pub enum Release {
    Update(Annotation),
    Remove(AnnotationId),
}

/// Outcome of resolving an in-flight call.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Set when the call failed.
    pub failure: Option<SyncFailure>,

    /// An op released from the per-id queue for the host to dispatch.
    pub release: Option<Release>,
}

/// Two-phase commit bookkeeping for optimistic mutations.
///
/// One call per annotation id is in flight at a time; an edit or delete
/// arriving while its create/update is outstanding is held back and
/// released when the outstanding call resolves, so id reconciliation never
/// races.
#[derive(Debug, Default)]
pub struct Reconciler {
    in_flight: HashMap<AnnotationId, SyncOp>,
    queued: HashMap<AnnotationId, QueuedOp>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls currently awaiting resolution.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Register a create for dispatch.
    pub fn begin_create(&mut self, annotation: &Annotation) -> Dispatch {
        let id = annotation.id();
        if self.in_flight.contains_key(&id) {
            // A duplicate commit for an id already being created; the
            // canonical answer will supersede it.
            self.queued.insert(id, QueuedOp::Update(annotation.clone()));
            return Dispatch::Queued;
        }
        self.in_flight.insert(id, SyncOp::Create);
        Dispatch::Now
    }

    /// Register an update for dispatch. Updates behind an in-flight call
    /// are queued per id, latest edit wins. A queued remove is never
    /// overwritten back into an update.
    pub fn begin_update(&mut self, annotation: &Annotation) -> Dispatch {
        let id = annotation.id();
        if self.in_flight.contains_key(&id) {
            if !matches!(self.queued.get(&id), Some(QueuedOp::Remove)) {
                self.queued.insert(id, QueuedOp::Update(annotation.clone()));
            }
            return Dispatch::Queued;
        }
        self.in_flight.insert(id, SyncOp::Update);
        Dispatch::Now
    }

    /// Register a remove for dispatch.
    ///
    /// A remove behind an in-flight call replaces any held-back edit and
    /// is released once the outstanding call resolves.
    pub fn begin_remove(&mut self, id: AnnotationId) -> Dispatch {
        if self.in_flight.contains_key(&id) {
            self.queued.insert(id, QueuedOp::Remove);
            return Dispatch::Queued;
        }
        self.in_flight.insert(id, SyncOp::Remove);
        Dispatch::Now
    }

    /// Mark a queued op as in flight against `id` and hand it to the host.
    fn release(&mut self, id: AnnotationId, op: QueuedOp) -> Release {
        match op {
            QueuedOp::Update(mut annotation) => {
                annotation.set_id(id);
                self.in_flight.insert(id, SyncOp::Update);
                Release::Update(annotation)
            }
            QueuedOp::Remove => {
                self.in_flight.insert(id, SyncOp::Remove);
                Release::Remove(id)
            }
        }
    }

    /// Apply the result of a create dispatched for `local_id`.
    ///
    /// On success the store entry is rebound to the canonical id in place
    /// (z-order preserved) and replaced with the canonical record. If the
    /// annotation was removed locally in the meantime, the result is
    /// discarded silently. On failure the optimistic entry stays.
    pub fn resolve_create(
        &mut self,
        local_id: AnnotationId,
        result: PersistResult<Annotation>,
        store: &mut AnnotationStore,
    ) -> Resolution {
        self.in_flight.remove(&local_id);

        match result {
            Ok(canonical) => {
                let canonical_id = canonical.id();
                let queued = self.queued.remove(&local_id);

                if store.contains(local_id) {
                    store.replace_id(local_id, canonical_id);
                    store.upsert(canonical);
                } else if !matches!(queued, Some(QueuedOp::Remove)) {
                    // Removed locally with no delete pending (e.g. a page
                    // reload dropped the store entry); nothing to apply.
                    tracing::debug!(%local_id, "create resolved after local removal, discarding");
                    return Resolution::default();
                }

                // A queued delete now targets the server's id.
                let release = queued.map(|op| self.release(canonical_id, op));

                Resolution {
                    failure: None,
                    release,
                }
            }
            Err(error) => {
                // Held-back ops are moot without a server record: an edit
                // cannot be sent, a delete has nothing to delete.
                if self.queued.remove(&local_id).is_some() {
                    tracing::warn!(%local_id, "dropping queued op after failed create");
                }
                Resolution {
                    failure: Some(SyncFailure {
                        annotation_id: local_id,
                        op: SyncOp::Create,
                        error,
                    }),
                    release: None,
                }
            }
        }
    }

    /// Apply the result of an update dispatched for `id`.
    pub fn resolve_update(
        &mut self,
        id: AnnotationId,
        result: PersistResult<Annotation>,
        store: &mut AnnotationStore,
    ) -> Resolution {
        self.in_flight.remove(&id);

        match result {
            Ok(canonical) => {
                if store.contains(id) {
                    store.upsert(canonical);
                } else {
                    tracing::debug!(%id, "update resolved after local removal, discarding");
                }

                let release = self.queued.remove(&id).map(|op| self.release(id, op));

                Resolution {
                    failure: None,
                    release,
                }
            }
            Err(error) => {
                let release = self.queued.remove(&id).map(|op| self.release(id, op));
                Resolution {
                    failure: Some(SyncFailure {
                        annotation_id: id,
                        op: SyncOp::Update,
                        error,
                    }),
                    release,
                }
            }
        }
    }

    /// Apply the result of a remove dispatched for `id`.
    pub fn resolve_remove(&mut self, id: AnnotationId, result: PersistResult<()>) -> Resolution {
        self.in_flight.remove(&id);
        match result {
            Ok(()) => Resolution::default(),
            Err(error) => Resolution {
                failure: Some(SyncFailure {
                    annotation_id: id,
                    op: SyncOp::Remove,
                    error,
                }),
                release: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationGeometry, AnnotationStyle};
    use crate::geometry::DocRect;

    fn annotation(x: f32) -> Annotation {
        Annotation::new(
            1,
            AnnotationGeometry::Rectangle {
                rect: DocRect::new(x, 0.0, 10.0, 10.0),
            },
            AnnotationStyle::new(),
        )
    }

    #[test]
    fn create_success_swaps_to_canonical_id_in_place() {
        let mut store = AnnotationStore::new();
        let mut reconciler = Reconciler::new();

        let bottom = annotation(0.0);
        let top = annotation(50.0);
        let local_id = bottom.id();
        let top_id = top.id();
        store.upsert(bottom.clone());
        store.upsert(top);

        assert_eq!(reconciler.begin_create(&bottom), Dispatch::Now);

        let canonical = Annotation::with_id(
            AnnotationId::new_v4(),
            bottom.page_number(),
            bottom.geometry().clone(),
            bottom.style().clone(),
        );
        let canonical_id = canonical.id();

        let resolution = reconciler.resolve_create(local_id, Ok(canonical), &mut store);
        assert!(resolution.failure.is_none());
        assert!(resolution.release.is_none());

        // Canonical id replaced the local one without changing z-order.
        let order: Vec<_> = store.for_page(1).map(|a| a.id()).collect();
        assert_eq!(order, vec![canonical_id, top_id]);
        assert!(!store.contains(local_id));
    }

    #[test]
    fn create_failure_keeps_optimistic_entry_and_surfaces_error() {
        let mut store = AnnotationStore::new();
        let mut reconciler = Reconciler::new();

        let a = annotation(0.0);
        let id = a.id();
        store.upsert(a.clone());
        reconciler.begin_create(&a);

        let resolution = reconciler.resolve_create(
            id,
            Err(PersistError::Transport("connection reset".into())),
            &mut store,
        );

        let failure = resolution.failure.expect("failure must be surfaced");
        assert_eq!(failure.annotation_id, id);
        assert_eq!(failure.op, SyncOp::Create);
        // The drawing is still visible.
        assert!(store.contains(id));
    }

    #[test]
    fn update_during_pending_create_is_queued_then_released() {
        let mut store = AnnotationStore::new();
        let mut reconciler = Reconciler::new();

        let a = annotation(0.0);
        let local_id = a.id();
        store.upsert(a.clone());
        assert_eq!(reconciler.begin_create(&a), Dispatch::Now);

        // Edit lands while the create is still in flight.
        let edited = a.with_geometry(a.geometry().translated(5.0, 5.0));
        assert_eq!(reconciler.begin_update(&edited), Dispatch::Queued);

        let canonical = Annotation::with_id(
            AnnotationId::new_v4(),
            a.page_number(),
            a.geometry().clone(),
            a.style().clone(),
        );
        let canonical_id = canonical.id();

        let resolution = reconciler.resolve_create(local_id, Ok(canonical), &mut store);
        match resolution.release {
            // The released update carries the canonical id, not the local one.
            Some(Release::Update(released)) => assert_eq!(released.id(), canonical_id),
            other => panic!("expected released update, got {other:?}"),
        }
        assert_eq!(reconciler.in_flight(), 1);
    }

    #[test]
    fn remove_during_pending_create_is_released_with_canonical_id() {
        let mut store = AnnotationStore::new();
        let mut reconciler = Reconciler::new();

        let a = annotation(0.0);
        let local_id = a.id();
        store.upsert(a.clone());
        assert_eq!(reconciler.begin_create(&a), Dispatch::Now);

        // Edit then delete while the create is still outstanding; the
        // delete supersedes the held-back edit.
        let edited = a.with_geometry(a.geometry().translated(5.0, 5.0));
        assert_eq!(reconciler.begin_update(&edited), Dispatch::Queued);
        store.remove(local_id);
        assert_eq!(reconciler.begin_remove(local_id), Dispatch::Queued);

        let canonical = Annotation::with_id(
            AnnotationId::new_v4(),
            a.page_number(),
            a.geometry().clone(),
            a.style().clone(),
        );
        let canonical_id = canonical.id();

        let resolution = reconciler.resolve_create(local_id, Ok(canonical), &mut store);
        assert!(resolution.failure.is_none());
        // The delete reaches the server under the id it assigned.
        assert_eq!(resolution.release, Some(Release::Remove(canonical_id)));
        assert_eq!(reconciler.in_flight(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn remove_queued_behind_update_is_released_on_resolution() {
        let mut store = AnnotationStore::new();
        let mut reconciler = Reconciler::new();

        let a = annotation(0.0);
        let id = a.id();
        store.upsert(a.clone());

        let edited = a.with_geometry(a.geometry().translated(5.0, 0.0));
        assert_eq!(reconciler.begin_update(&edited), Dispatch::Now);
        store.remove(id);
        assert_eq!(reconciler.begin_remove(id), Dispatch::Queued);

        let resolution = reconciler.resolve_update(id, Ok(edited), &mut store);
        assert!(resolution.failure.is_none());
        assert_eq!(resolution.release, Some(Release::Remove(id)));
        assert_eq!(reconciler.in_flight(), 1);
        // Applying the stale update result must not resurrect the entry.
        assert!(store.is_empty());
    }

    #[test]
    fn create_resolving_after_local_removal_is_discarded() {
        let mut store = AnnotationStore::new();
        let mut reconciler = Reconciler::new();

        let a = annotation(0.0);
        let local_id = a.id();
        store.upsert(a.clone());
        reconciler.begin_create(&a);

        // User deleted the annotation before the create resolved.
        store.remove(local_id);

        let canonical = Annotation::with_id(
            AnnotationId::new_v4(),
            a.page_number(),
            a.geometry().clone(),
            a.style().clone(),
        );
        let resolution = reconciler.resolve_create(local_id, Ok(canonical), &mut store);

        assert!(resolution.failure.is_none());
        assert!(resolution.release.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_ops_for_different_ids_both_dispatch() {
        let mut reconciler = Reconciler::new();
        let a = annotation(0.0);
        let b = annotation(50.0);

        assert_eq!(reconciler.begin_create(&a), Dispatch::Now);
        assert_eq!(reconciler.begin_create(&b), Dispatch::Now);
        assert_eq!(reconciler.in_flight(), 2);
    }

    #[test]
    fn update_success_applies_canonical_record() {
        let mut store = AnnotationStore::new();
        let mut reconciler = Reconciler::new();

        let a = annotation(0.0);
        let id = a.id();
        store.upsert(a.clone());

        let edited = a.with_geometry(a.geometry().translated(5.0, 0.0));
        assert_eq!(reconciler.begin_update(&edited), Dispatch::Now);

        let resolution = reconciler.resolve_update(id, Ok(edited.clone()), &mut store);
        assert!(resolution.failure.is_none());
        assert_eq!(store.get(id).unwrap().geometry(), edited.geometry());
    }

    #[test]
    fn remove_failure_is_surfaced() {
        let mut reconciler = Reconciler::new();
        let id = AnnotationId::new_v4();

        assert_eq!(reconciler.begin_remove(id), Dispatch::Now);
        let resolution =
            reconciler.resolve_remove(id, Err(PersistError::NotFound(id)));
        let failure = resolution.failure.expect("failure must be surfaced");
        assert_eq!(failure.op, SyncOp::Remove);
    }
}
