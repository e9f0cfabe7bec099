//! Block cache with a global least-recently-used eviction order.
//!
//! Blocks are addressed by `(address / block_size) % capacity`, which is a
//! direct-mapped index, while eviction follows a single LRU order across
//! every occupied index. The two schemes are inconsistent on purpose: an
//! eviction may remove a block whose index differs from the one an
//! incoming block maps to. The behavior is kept as the hardware model
//! under simulation defines it rather than silently normalized.

use std::collections::BTreeMap;
use std::collections::VecDeque;

/// One cached block: the block tag it holds and its datum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheLine {
    /// Block tag (`address / block_size`).
    pub tag: usize,
    /// Cached datum.
    pub value: f64,
}

/// Bounded block cache with global LRU replacement.
#[derive(Debug, Clone)]
pub struct LruCache {
    block_size: usize,
    capacity: usize,
    hit_latency: u64,
    miss_penalty: u64,
    /// Occupied blocks, keyed by block index.
    lines: BTreeMap<usize, CacheLine>,
    /// Recency order over occupied block indices: front = LRU, back = MRU.
    usage: VecDeque<usize>,
}

impl LruCache {
    /// Creates an empty cache. Capacity is `cache_size / block_size`
    /// blocks; configuration guarantees a non-zero block size.
    pub fn new(cache_size: usize, block_size: usize, hit_latency: u64, miss_penalty: u64) -> Self {
        let block_size = block_size.max(1);
        Self {
            block_size,
            capacity: (cache_size / block_size).max(1),
            hit_latency,
            miss_penalty,
            lines: BTreeMap::new(),
            usage: VecDeque::new(),
        }
    }

    /// Hit latency in cycles.
    pub const fn hit_latency(&self) -> u64 {
        self.hit_latency
    }

    /// Miss penalty in cycles.
    pub const fn miss_penalty(&self) -> u64 {
        self.miss_penalty
    }

    /// Maximum number of cached blocks.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of currently cached blocks.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no blocks are cached.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the cache has reached capacity.
    pub fn is_full(&self) -> bool {
        self.lines.len() >= self.capacity
    }

    fn block_index(&self, address: usize) -> usize {
        (address / self.block_size) % self.capacity
    }

    fn block_tag(&self, address: usize) -> usize {
        address / self.block_size
    }

    /// Whether `address` currently hits, without touching recency.
    pub fn contains(&self, address: usize) -> bool {
        let index = self.block_index(address);
        self.lines
            .get(&index)
            .is_some_and(|line| line.tag == self.block_tag(address))
    }

    /// Access latency for `address` without mutating any state.
    pub fn peek_latency(&self, address: usize) -> u64 {
        if self.contains(address) {
            self.hit_latency
        } else {
            self.miss_penalty
        }
    }

    /// Looks up `address`; on a hit returns the datum and marks the block
    /// most recently used.
    pub fn lookup(&mut self, address: usize) -> Option<f64> {
        if !self.contains(address) {
            return None;
        }
        let index = self.block_index(address);
        self.touch(index);
        self.lines.get(&index).map(|line| line.value)
    }

    /// Installs the block for `address`, evicting the globally
    /// least-recently-used block first if the cache is full. The victim's
    /// index may differ from the index the incoming block maps to; see
    /// the module docs for why this mismatch is preserved.
    pub fn install(&mut self, address: usize, value: f64) {
        let index = self.block_index(address);
        if self.is_full() {
            if let Some(victim) = self.usage.pop_front() {
                let _ = self.lines.remove(&victim);
            }
        }
        let _ = self.lines.insert(
            index,
            CacheLine {
                tag: self.block_tag(address),
                value,
            },
        );
        self.touch(index);
    }

    /// Moves `index` to the most-recently-used position.
    fn touch(&mut self, index: usize) {
        if let Some(pos) = self.usage.iter().position(|&i| i == index) {
            let _ = self.usage.remove(pos);
        }
        self.usage.push_back(index);
    }

    /// Occupied lines in index order, for snapshot capture.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &CacheLine)> {
        self.lines.iter().map(|(&index, line)| (index, line))
    }

    /// The block index that would be evicted next, if any.
    pub fn lru_index(&self) -> Option<usize> {
        self.usage.front().copied()
    }
}
