use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of booking identifiers. Ids must never repeat for the lifetime of
/// the store.
pub trait BookingIdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdSource;

impl BookingIdSource for UuidIdSource {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... Only unique within one process, so it
/// suits fixtures and single-node in-memory setups.
#[derive(Debug)]
pub struct SequenceIdSource {
    prefix: String,
    next: AtomicU64,
}

impl SequenceIdSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl BookingIdSource for SequenceIdSource {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}
