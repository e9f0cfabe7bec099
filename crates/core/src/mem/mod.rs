//! Two-level memory hierarchy.
//!
//! This module models the memory system the load/store buffers access:
//! 1. **Backing store:** A flat array of scalar cells.
//! 2. **Cache:** A bounded block cache with a global least-recently-used
//!    eviction order (see [`cache`] for the exact policy shape).
//!
//! The memory system is write-through with allocate-on-write: stores
//! always update the backing store and install the block in the cache,
//! evicting the globally least-recently-used block when full. Reads
//! install on miss only while the cache has free capacity.

/// Block cache with global LRU eviction.
pub mod cache;

use crate::config::MemoryConfig;
use cache::LruCache;

/// The two-level memory system: backing store plus block cache.
#[derive(Debug, Clone)]
pub struct MemorySystem {
    cache: LruCache,
    cells: Vec<f64>,
}

impl MemorySystem {
    /// Creates a memory system from configuration, zero-filled.
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            cache: LruCache::new(
                config.cache_size,
                config.block_size,
                config.hit_latency,
                config.miss_penalty,
            ),
            cells: vec![0.0; config.memory_size],
        }
    }

    /// Number of backing-store cells.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Seeds one backing-store cell without touching the cache. Used at
    /// construction and reset; addresses are validated by configuration.
    pub fn seed(&mut self, address: usize, value: f64) {
        if let Some(cell) = self.cells.get_mut(address) {
            *cell = value;
        }
    }

    /// Access latency for `address` without mutating any state. Used by
    /// the execute stage to size a memory unit's execution window.
    pub fn latency(&self, address: usize) -> u64 {
        self.cache.peek_latency(address)
    }

    /// Reads the cell at `address` through the cache.
    ///
    /// A hit returns the cached datum and refreshes its recency. A miss
    /// reads the backing store and installs the block only if the cache
    /// still has free capacity.
    pub fn read(&mut self, address: usize) -> f64 {
        if let Some(value) = self.cache.lookup(address) {
            return value;
        }
        let value = self.cells.get(address).copied().unwrap_or_default();
        if !self.cache.is_full() {
            self.cache.install(address, value);
        }
        value
    }

    /// Writes `value` to the cell at `address`.
    ///
    /// Write-through: the backing store is always updated. If the block
    /// is not cached it is installed, evicting the globally
    /// least-recently-used block first when the cache is full.
    pub fn write(&mut self, address: usize, value: f64) {
        if let Some(cell) = self.cells.get_mut(address) {
            *cell = value;
        }
        if !self.cache.contains(address) {
            self.cache.install(address, value);
        }
    }

    /// The backing-store cells, for snapshot capture.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// The cache, for snapshot capture.
    pub fn cache(&self) -> &LruCache {
        &self.cache
    }
}
