use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use namefind_common::record::NameRecord;

/// In-memory record set served to the matcher.
///
/// Readers take an `Arc` snapshot and release the lock immediately; writers
/// publish a new snapshot. A search therefore always scans one consistent
/// record list, even while records are being added or reloaded.
#[derive(Default)]
pub struct RecordStore {
    snapshot: RwLock<Arc<Vec<NameRecord>>>,
}

impl RecordStore {
    pub fn new(records: Vec<NameRecord>) -> Self {
        Self { snapshot: RwLock::new(Arc::new(records)) }
    }

    pub fn snapshot(&self) -> Arc<Vec<NameRecord>> {
        Arc::clone(&self.read())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swap in a freshly loaded record set.
    pub fn replace(&self, records: Vec<NameRecord>) {
        *self.write() = Arc::new(records);
    }

    /// Append one record (copy-on-write).
    pub fn push(&self, record: NameRecord) {
        let mut guard = self.write();
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(record);
        *guard = Arc::new(next);
    }

    // A panicking writer leaves either the old or the new Arc in place, both
    // valid, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Arc<Vec<NameRecord>>> {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arc<Vec<NameRecord>>> {
        self.snapshot.write().unwrap_or_else(|e| e.into_inner())
    }
}
