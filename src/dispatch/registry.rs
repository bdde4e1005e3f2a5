//! Per-batch dedup registry
//!
//! The registry decides, once per canonical key, whether an input URL starts
//! a fetch. The presence check and the insert happen under one lock so the
//! check-then-act sequence is a single atomic step. Admission also pre-marks
//! the opposite-scheme key, making `http://x` and `https://x` one visitation
//! unit even though only one is fetched.

use crate::url::CanonicalKey;
use std::collections::HashSet;
use std::sync::Mutex;

/// A canonical key together with the original inputs that collided on it
pub type DuplicateGroup = (CanonicalKey, Vec<String>);

#[derive(Debug, Default)]
struct RegistryInner {
    seen: HashSet<CanonicalKey>,
    // Keyed vec rather than a map so group order is first-collision order.
    groups: Vec<DuplicateGroup>,
}

/// Mutex-guarded registry of visited canonical keys, scoped to one batch
#[derive(Debug, Default)]
pub struct DedupRegistry {
    inner: Mutex<RegistryInner>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a key if it has not been seen, marking it and its mirror
    ///
    /// Returns true and records both the key and its opposite-scheme mirror
    /// as present when the key was new; returns false when the key (or its
    /// pre-marked mirror) was already present. Check and insert are one
    /// critical section.
    pub fn try_admit(&self, key: &CanonicalKey) -> bool {
        let mut inner = self.inner.lock().expect("dedup registry lock poisoned");
        if inner.seen.contains(key) {
            return false;
        }
        inner.seen.insert(key.clone());
        // Mirror inserted without an admission check of its own.
        inner.seen.insert(key.toggled());
        true
    }

    /// Records an input that collided on an already-present key
    ///
    /// Inputs are kept in arrival order within their group; groups are kept
    /// in first-collision order.
    pub fn record_duplicate(&self, key: CanonicalKey, input: &str) {
        let mut inner = self.inner.lock().expect("dedup registry lock poisoned");
        if let Some((_, inputs)) = inner.groups.iter_mut().find(|(k, _)| *k == key) {
            inputs.push(input.to_string());
        } else {
            inner.groups.push((key, vec![input.to_string()]));
        }
    }

    /// Returns all duplicate groups recorded so far
    pub fn duplicate_groups(&self) -> Vec<DuplicateGroup> {
        self.inner
            .lock()
            .expect("dedup registry lock poisoned")
            .groups
            .clone()
    }

    /// Returns whether a key is already marked present
    pub fn is_present(&self, key: &CanonicalKey) -> bool {
        self.inner
            .lock()
            .expect("dedup registry lock poisoned")
            .seen
            .contains(key)
    }
}
