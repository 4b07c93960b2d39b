//! Collaborator traits for the complaint core.
//!
//! The planner and lifecycle manager only talk to storage, observers and
//! distance computation through these seams. Concrete adapters live in
//! `store`, `bus` and `haversine`.

use crate::error::Result;
use crate::model::{Complaint, ComplaintEvent, ComplaintFilter, ComplaintId, Location};

/// Durable home of complaint records.
///
/// Each call is atomic for a single record; there are no cross-record
/// transactions.
pub trait ComplaintStore: Send + Sync {
    fn insert(&self, complaint: Complaint) -> Result<Complaint>;

    fn get(&self, id: &ComplaintId) -> Result<Option<Complaint>>;

    /// Records matching `filter`, priority rank descending then creation time ascending.
    fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>>;

    /// Read-modify-write a single record. Returns `None` for an unknown id.
    fn update(
        &self,
        id: &ComplaintId,
        apply: &mut dyn FnMut(&mut Complaint),
    ) -> Result<Option<Complaint>>;
}

/// Push channel to every currently connected observer.
///
/// Delivery is fire-and-forget: no acknowledgement, no retry, and observers
/// that connect later never see earlier events.
pub trait NotificationBus: Send + Sync {
    fn broadcast(&self, event: ComplaintEvent);
}

/// Point-to-point distance in kilometers.
pub trait DistanceMetric {
    fn distance_km(&self, from: Location, to: Location) -> f64;
}

impl<T: ComplaintStore + ?Sized> ComplaintStore for std::sync::Arc<T> {
    fn insert(&self, complaint: Complaint) -> Result<Complaint> {
        (**self).insert(complaint)
    }

    fn get(&self, id: &ComplaintId) -> Result<Option<Complaint>> {
        (**self).get(id)
    }

    fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        (**self).list(filter)
    }

    fn update(
        &self,
        id: &ComplaintId,
        apply: &mut dyn FnMut(&mut Complaint),
    ) -> Result<Option<Complaint>> {
        (**self).update(id, apply)
    }
}

impl<T: NotificationBus + ?Sized> NotificationBus for std::sync::Arc<T> {
    fn broadcast(&self, event: ComplaintEvent) {
        (**self).broadcast(event);
    }
}
