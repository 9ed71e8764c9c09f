//! Scoped off-screen mount containers.
//!
//! Engine output is mounted into a temporary container before the `<svg>`
//! element is extracted from it. A [`MountGuard`] owns one container and
//! removes it when dropped, so release happens on success, on `?` early
//! returns, and on panics alike.
//!
//! Container ids are unique per arena, which keeps concurrent exports that
//! share an arena from touching each other's containers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct MountArena {
    next_id: AtomicU64,
    nodes: Mutex<HashMap<u64, String>>,
}

impl MountArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn nodes(&self) -> MutexGuard<'_, HashMap<u64, String>> {
        // A panic while holding the lock leaves the map itself consistent.
        self.nodes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Creates an empty container and returns its guard.
    pub fn acquire(&self) -> MountGuard<'_> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.nodes().insert(id, String::new());
        log::debug!("acquired mount container {id}");
        MountGuard { arena: self, id }
    }

    /// Number of containers currently alive.
    pub fn live_count(&self) -> usize {
        self.nodes().len()
    }

    fn release(&self, id: u64) {
        self.nodes().remove(&id);
        log::debug!("released mount container {id}");
    }
}

/// Owns one container in a [`MountArena`].
#[derive(Debug)]
pub struct MountGuard<'a> {
    arena: &'a MountArena,
    id: u64,
}

impl MountGuard<'_> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Replaces the container's content.
    pub fn mount(&self, markup: impl Into<String>) {
        self.arena.nodes().insert(self.id, markup.into());
    }

    /// Returns the outermost `<svg>...</svg>` element in the container.
    pub fn extract_svg(&self) -> Result<String> {
        let nodes = self.arena.nodes();
        let content = nodes.get(&self.id).map(String::as_str).unwrap_or("");
        let not_found = || Error::SvgNotFound { container: self.id };

        let start = content.find("<svg").ok_or_else(not_found)?;
        let end = content
            .rfind("</svg>")
            .filter(|&end| end > start)
            .ok_or_else(not_found)?;
        Ok(content[start..end + "</svg>".len()].to_string())
    }
}

impl Drop for MountGuard<'_> {
    fn drop(&mut self) {
        self.arena.release(self.id);
    }
}
