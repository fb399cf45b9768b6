//! Compiled-path cache
//!
//! Keyed by raw path text. Entries are never evicted; the set of distinct
//! paths an application uses is expected to be small and stable.

use super::CompiledPath;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Single-threaded cache of compiled paths
#[derive(Debug, Default)]
pub struct PathCache {
    entries: RefCell<HashMap<String, Arc<CompiledPath>>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Arc<CompiledPath>> {
        self.entries.borrow().get(path).cloned()
    }

    pub fn insert(&self, path: &str, compiled: Arc<CompiledPath>) {
        tracing::trace!("Caching compiled path '{}'", path);
        self.entries.borrow_mut().insert(path.to_string(), compiled);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
