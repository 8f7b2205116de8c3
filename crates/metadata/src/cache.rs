//! Keyed in-memory response cache.
//!
//! Last write wins: two concurrent fetches of the same key may both reach the
//! upstream, and the later `put` simply overwrites the earlier one. There is
//! no eviction; the key space is the set of filenames in one archive.

use std::collections::HashMap;
use std::sync::Mutex;

pub struct ResponseCache<T> {
    inner: Mutex<HashMap<String, T>>,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.lock().get(key).cloned()
    }

    pub fn put(&self, key: &str, value: T) {
        self.lock().insert(key.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> Default for ResponseCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
