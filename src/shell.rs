//! Locally held collections plus the bookkeeping around them.

use std::collections::HashSet;
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::category::Category;
use crate::domain::listing::Listing;
use crate::snapshot::{Keyed, Snapshot};

/// Owner of one collection snapshot.
///
/// The mutex is never held across an `.await`; remote calls happen between
/// two short critical sections.
pub struct Shell<T> {
    snapshot: Mutex<Snapshot<T>>,
    uploads: UploadSlots,
}

pub type ListingShell = Shell<Listing>;
pub type CategoryShell = Shell<Category>;

impl<T> Default for Shell<T> {
    fn default() -> Self {
        Self {
            snapshot: Mutex::new(Snapshot::default()),
            uploads: UploadSlots::default(),
        }
    }
}

impl<T: Keyed> Shell<T> {
    /// Locks the snapshot. Every mutation is a single call on the snapshot, so
    /// a poisoned lock still guards consistent data.
    pub fn lock(&self) -> MutexGuard<'_, Snapshot<T>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches the collection once. A failed fetch is logged and mounts an
    /// empty list; it is not retried until [`Shell::refresh`].
    pub fn ensure_mounted<F, E>(&self, fetch: F) -> MutexGuard<'_, Snapshot<T>>
    where
        F: FnOnce() -> Result<Vec<T>, E>,
        E: Display,
    {
        let mut snapshot = self.lock();
        if !snapshot.is_mounted() {
            snapshot.mount(fetch_or_empty(fetch));
        }
        snapshot
    }

    /// Replaces the snapshot with a fresh fetch.
    pub fn refresh<F, E>(&self, fetch: F)
    where
        F: FnOnce() -> Result<Vec<T>, E>,
        E: Display,
    {
        let records = fetch_or_empty(fetch);
        self.lock().mount(records);
    }

    pub fn teardown(&self) {
        self.lock().teardown();
    }

    pub fn uploads(&self) -> &UploadSlots {
        &self.uploads
    }
}

fn fetch_or_empty<T, F, E>(fetch: F) -> Vec<T>
where
    F: FnOnce() -> Result<Vec<T>, E>,
    E: Display,
{
    match fetch() {
        Ok(records) => records,
        Err(e) => {
            log::error!("Failed to fetch collection: {e}");
            Vec::new()
        }
    }
}

/// Keys of forms with an image upload in flight.
#[derive(Default)]
pub struct UploadSlots {
    in_flight: Mutex<HashSet<String>>,
}

impl UploadSlots {
    /// Claims the slot for `key`, or `None` if an upload already holds it.
    pub fn try_begin(&self, key: &str) -> Option<UploadGuard<'_>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight.insert(key.to_string()) {
            Some(UploadGuard {
                slots: self,
                key: key.to_string(),
            })
        } else {
            None
        }
    }

    pub fn is_busy(&self, key: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Releases its upload slot when dropped.
pub struct UploadGuard<'a> {
    slots: &'a UploadSlots,
    key: String,
}

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        self.slots
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
