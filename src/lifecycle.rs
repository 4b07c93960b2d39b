//! Complaint lifecycle: creation, status transitions, and their notifications.
//!
//! Every successful mutation is written to the store first and broadcast
//! second. Mutations of the same complaint are serialized so observers see
//! them in commit order; different complaints never wait on each other.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model::{
    Complaint, ComplaintEvent, ComplaintFilter, ComplaintId, NewComplaint, Status, StatusUpdate,
};
use crate::traits::{ComplaintStore, NotificationBus};

/// How status changes are validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any known status may follow any other.
    #[default]
    Permissive,
    /// Only edges of the canonical workflow are accepted
    /// (`new -> assigned -> in_progress -> resolved`, `rejected` from any open state).
    Strict,
}

impl FromStr for TransitionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(Error::invalid(format!(
                "unknown transition policy {other:?}, expected permissive or strict"
            ))),
        }
    }
}

pub struct ComplaintLifecycle<S, B> {
    store: S,
    bus: B,
    policy: TransitionPolicy,
    commit_locks: Mutex<HashMap<ComplaintId, Arc<Mutex<()>>>>,
}

fn lock_poisoned<T>(_: PoisonError<T>) -> Error {
    Error::store("complaint commit lock poisoned")
}

impl<S, B> ComplaintLifecycle<S, B>
where
    S: ComplaintStore,
    B: NotificationBus,
{
    pub fn new(store: S, bus: B) -> Self {
        Self::with_policy(store, bus, TransitionPolicy::default())
    }

    pub fn with_policy(store: S, bus: B, policy: TransitionPolicy) -> Self {
        Self {
            store,
            bus,
            policy,
            commit_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Run `commit` while holding the lock for `id`.
    ///
    /// Entries only live while someone holds or waits on them, so the map is
    /// bounded by in-flight updates rather than by every id ever seen.
    fn with_commit_lock<T>(
        &self,
        id: ComplaintId,
        commit: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let lock = {
            let mut locks = self.commit_locks.lock().map_err(lock_poisoned)?;
            locks.entry(id).or_default().clone()
        };

        let outcome = match lock.lock() {
            Ok(_guard) => commit(),
            Err(err) => Err(lock_poisoned(err)),
        };

        // Clones are only handed out under the map lock, so a count of two
        // (the map's and ours) means nobody else is waiting.
        let mut locks = self
            .commit_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&id);
        }

        outcome
    }

    /// Store a new complaint in state `new` and announce it as `new_complaint`.
    pub fn create(&self, input: NewComplaint) -> Result<Complaint> {
        input.location.validate()?;

        // A fresh id has no concurrent writer, so no commit lock is needed.
        let id = ComplaintId::new();
        let complaint = self.store.insert(input.into_complaint(id, Utc::now()))?;
        info!(
            id = %complaint.id,
            priority = %complaint.priority,
            lat = complaint.location.lat,
            lng = complaint.location.lng,
            "complaint created"
        );

        self.bus.broadcast(ComplaintEvent::Created(complaint.clone()));
        Ok(complaint)
    }

    pub fn get(&self, id: &ComplaintId) -> Result<Complaint> {
        self.store
            .get(id)?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    pub fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        self.store.list(filter)
    }

    /// Apply `update` to an existing complaint and announce it as `status_update`.
    ///
    /// An update carrying neither field still refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id (nothing is broadcast), `InvalidInput`
    /// when a strict policy rejects the transition.
    pub fn update_status(&self, id: &ComplaintId, update: StatusUpdate) -> Result<Complaint> {
        self.with_commit_lock(*id, || self.commit_update(id, &update))
    }

    fn commit_update(&self, id: &ComplaintId, update: &StatusUpdate) -> Result<Complaint> {
        let now = Utc::now();
        let mut rejected: Option<(Status, Status)> = None;
        let updated = self.store.update(id, &mut |complaint: &mut Complaint| {
            if let Some(next) = update.status {
                if self.policy == TransitionPolicy::Strict
                    && !complaint.status.can_transition_to(next)
                {
                    rejected = Some((complaint.status, next));
                    return;
                }
                complaint.status = next;
            }
            if let Some(handler) = &update.assigned_to {
                complaint.assigned_to = Some(handler.clone());
            }
            complaint.updated_at = Some(now);
        })?;

        let Some(updated) = updated else {
            warn!(%id, "status update for unknown complaint");
            return Err(Error::NotFound(id.to_string()));
        };

        if let Some((from, to)) = rejected {
            warn!(%id, %from, %to, "transition rejected");
            return Err(Error::invalid(format!(
                "cannot move complaint {id} from {from} to {to}"
            )));
        }

        info!(
            %id,
            status = %updated.status,
            assigned_to = updated.assigned_to.as_deref().unwrap_or("-"),
            "complaint updated"
        );

        self.bus.broadcast(ComplaintEvent::StatusUpdated(updated.clone()));
        Ok(updated)
    }
}
