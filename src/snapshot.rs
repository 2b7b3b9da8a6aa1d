//! In-memory copy of a record store collection.
//!
//! Mutations are mirrored locally only after the record store has confirmed
//! them, so there is never anything to roll back. Once torn down, a snapshot
//! ignores late confirmations until it is mounted again.

use crate::domain::category::Category;
use crate::domain::listing::Listing;
use crate::domain::types::{CategoryId, ListingId};

/// Records that carry a stable record store key.
pub trait Keyed {
    type Key: PartialEq;

    fn key(&self) -> &Self::Key;
}

impl Keyed for Listing {
    type Key = ListingId;

    fn key(&self) -> &ListingId {
        &self.id
    }
}

impl Keyed for Category {
    type Key = CategoryId;

    fn key(&self) -> &CategoryId {
        &self.id
    }
}

/// Locally held collection snapshot.
#[derive(Debug)]
pub struct Snapshot<T> {
    records: Option<Vec<T>>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self { records: None }
    }
}

impl<T: Keyed> Snapshot<T> {
    /// Whether the collection has been fetched since the last teardown.
    pub fn is_mounted(&self) -> bool {
        self.records.is_some()
    }

    /// Replaces the local copy wholesale with a fresh fetch result.
    pub fn mount(&mut self, records: Vec<T>) {
        self.records = Some(records);
    }

    /// Drops the local copy. Later confirmations become no-ops.
    pub fn teardown(&mut self) {
        self.records = None;
    }

    /// Records in snapshot order; empty when not mounted.
    pub fn records(&self) -> &[T] {
        self.records.as_deref().unwrap_or(&[])
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.records().iter().find(|record| record.key() == key)
    }

    /// Appends a record the store has just created.
    pub fn confirm_insert(&mut self, record: T) -> bool {
        match self.records.as_mut() {
            Some(records) => {
                records.push(record);
                true
            }
            None => false,
        }
    }

    /// Applies a confirmed change to the record with `key`.
    ///
    /// Returns `false` if the snapshot is torn down or the record is unknown.
    pub fn confirm_update<F>(&mut self, key: &T::Key, change: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self
            .records
            .as_mut()
            .and_then(|records| records.iter_mut().find(|record| record.key() == key))
        {
            Some(record) => {
                change(record);
                true
            }
            None => false,
        }
    }

    /// Removes a record the store has just deleted.
    pub fn confirm_remove(&mut self, key: &T::Key) -> bool {
        match self.records.as_mut() {
            Some(records) => {
                let before = records.len();
                records.retain(|record| record.key() != key);
                records.len() != before
            }
            None => false,
        }
    }
}
