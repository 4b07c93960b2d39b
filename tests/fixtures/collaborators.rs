//! In-memory collaborators for driving the core in tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use complaint_router::model::{
    Complaint, ComplaintEvent, ComplaintFilter, ComplaintId, NewComplaint, Priority,
};
use complaint_router::store::MemoryStore;
use complaint_router::traits::{ComplaintStore, NotificationBus};
use complaint_router::{Error, Result};

use super::bengaluru_locations::Site;

/// Builds a stored-shape complaint at `site`, `age_minutes` old.
pub fn complaint_at(site: Site, priority: Priority, age_minutes: i64) -> Complaint {
    NewComplaint {
        title: site.name.to_string(),
        priority,
        location: site.location(),
        ..NewComplaint::default()
    }
    .into_complaint(ComplaintId::new(), Utc::now() - Duration::minutes(age_minutes))
}

/// Records every broadcast in order.
#[derive(Debug, Default)]
pub struct RecordingBus {
    events: Mutex<Vec<ComplaintEvent>>,
}

impl RecordingBus {
    pub fn events(&self) -> Vec<ComplaintEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(|event| event.name()).collect()
    }
}

impl NotificationBus for RecordingBus {
    fn broadcast(&self, event: ComplaintEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Bus that checks, at broadcast time, that the store already holds exactly
/// the record being announced.
pub struct StoreCheckingBus {
    pub store: Arc<MemoryStore>,
    pub checked: AtomicUsize,
}

impl StoreCheckingBus {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            checked: AtomicUsize::new(0),
        }
    }
}

impl NotificationBus for StoreCheckingBus {
    fn broadcast(&self, event: ComplaintEvent) {
        let announced = event.complaint();
        let stored = self.store.get(&announced.id).unwrap();
        assert_eq!(stored.as_ref(), Some(announced), "broadcast before store write");
        self.checked.fetch_add(1, Ordering::SeqCst);
    }
}

/// Memory store that counts calls, to prove read-only paths stay read-only.
#[derive(Debug, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl CountingStore {
    pub fn seeded(complaints: &[Complaint]) -> Self {
        let store = Self::default();
        for complaint in complaints {
            store.inner.insert(complaint.clone()).unwrap();
        }
        store
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ComplaintStore for CountingStore {
    fn insert(&self, complaint: Complaint) -> Result<Complaint> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(complaint)
    }

    fn get(&self, id: &ComplaintId) -> Result<Option<Complaint>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id)
    }

    fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.list(filter)
    }

    fn update(
        &self,
        id: &ComplaintId,
        apply: &mut dyn FnMut(&mut Complaint),
    ) -> Result<Option<Complaint>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update(id, apply)
    }
}

/// Store whose backend is down.
#[derive(Debug, Default)]
pub struct UnavailableStore;

impl ComplaintStore for UnavailableStore {
    fn insert(&self, _complaint: Complaint) -> Result<Complaint> {
        Err(Error::store("connection refused"))
    }

    fn get(&self, _id: &ComplaintId) -> Result<Option<Complaint>> {
        Err(Error::store("connection refused"))
    }

    fn list(&self, _filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        Err(Error::store("connection refused"))
    }

    fn update(
        &self,
        _id: &ComplaintId,
        _apply: &mut dyn FnMut(&mut Complaint),
    ) -> Result<Option<Complaint>> {
        Err(Error::store("connection refused"))
    }
}

/// Memory store whose writes take `delay` before they commit.
#[derive(Debug, Default)]
pub struct SlowStore {
    pub inner: MemoryStore,
    pub delay: StdDuration,
}

impl SlowStore {
    pub fn new(delay: StdDuration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
        }
    }
}

impl ComplaintStore for SlowStore {
    fn insert(&self, complaint: Complaint) -> Result<Complaint> {
        thread::sleep(self.delay);
        self.inner.insert(complaint)
    }

    fn get(&self, id: &ComplaintId) -> Result<Option<Complaint>> {
        self.inner.get(id)
    }

    fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        self.inner.list(filter)
    }

    fn update(
        &self,
        id: &ComplaintId,
        apply: &mut dyn FnMut(&mut Complaint),
    ) -> Result<Option<Complaint>> {
        thread::sleep(self.delay);
        self.inner.update(id, apply)
    }
}
