//! In-memory [`ComplaintStore`].

use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Complaint, ComplaintFilter, ComplaintId};
use crate::traits::ComplaintStore;

/// Listing order: priority rank descending, then oldest first, then id.
pub fn listing_order(a: &Complaint, b: &Complaint) -> Ordering {
    Reverse(a.priority.rank())
        .cmp(&Reverse(b.priority.rank()))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<ComplaintId, Complaint>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.records.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::store("complaint store lock poisoned")
}

impl ComplaintStore for MemoryStore {
    fn insert(&self, complaint: Complaint) -> Result<Complaint> {
        let mut records = self.records.write().map_err(poisoned)?;
        if records.contains_key(&complaint.id) {
            return Err(Error::invalid(format!("duplicate complaint id {}", complaint.id)));
        }
        records.insert(complaint.id, complaint.clone());
        debug!(id = %complaint.id, total = records.len(), "stored complaint");
        Ok(complaint)
    }

    fn get(&self, id: &ComplaintId) -> Result<Option<Complaint>> {
        Ok(self.records.read().map_err(poisoned)?.get(id).cloned())
    }

    fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        let records = self.records.read().map_err(poisoned)?;
        let mut matching: Vec<Complaint> = records
            .values()
            .filter(|complaint| filter.matches(complaint))
            .cloned()
            .collect();
        drop(records);

        matching.sort_by(listing_order);
        Ok(matching)
    }

    fn update(
        &self,
        id: &ComplaintId,
        apply: &mut dyn FnMut(&mut Complaint),
    ) -> Result<Option<Complaint>> {
        let mut records = self.records.write().map_err(poisoned)?;
        let Some(record) = records.get_mut(id) else {
            return Ok(None);
        };

        let original_id = record.id;
        let original_created_at = record.created_at;
        apply(record);
        // Identity and creation time are immutable once stored.
        record.id = original_id;
        record.created_at = original_created_at;

        Ok(Some(record.clone()))
    }
}
