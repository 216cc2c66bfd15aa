//! Identity tracker: source reference to its clone, for one top-level call

use rustc_hash::FxHashMap;

use crate::value::{ObjectId, ObjectRef, Value, WeakObjectRef};

struct Entry {
    source: WeakObjectRef,
    clone: Value,
}

/// Map from already-visited source objects to their clones.
///
/// Keyed by allocation address. Each entry keeps a weak handle to its source
/// so a reused address is never mistaken for a tracked object, and tracking
/// never extends a source's lifetime.
#[derive(Default)]
pub struct IdentityTracker {
    memory: FxHashMap<ObjectId, Entry>,
}

impl IdentityTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `clone` as the clone of `source`
    pub fn register(&mut self, source: &ObjectRef, clone: Value) {
        self.memory.insert(
            source.id(),
            Entry {
                source: source.downgrade(),
                clone,
            },
        );
    }

    /// The clone already produced for `source`, if any
    pub fn lookup(&self, source: &ObjectRef) -> Option<Value> {
        let entry = self.memory.get(&source.id())?;
        match entry.source.upgrade() {
            Some(tracked) if tracked.ptr_eq(source) => Some(entry.clone.clone()),
            _ => None,
        }
    }

    /// Number of tracked sources
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Check if nothing has been tracked yet
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }
}
