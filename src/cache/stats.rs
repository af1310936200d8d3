use std::sync::atomic::{AtomicU64, Ordering};

/// Per-tier counters kept by a [`DescriptorCache`](super::DescriptorCache).
#[derive(Debug, Default)]
pub(crate) struct TierCounters {
    memory_hits: AtomicU64,
    disk_hits: AtomicU64,
    source_loads: AtomicU64,
    failures: AtomicU64,
}

impl TierCounters {
    pub(crate) fn memory_hit(&self) {
        self.memory_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn disk_hit(&self) {
        self.disk_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn source_load(&self) {
        self.source_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, cached_entries: usize) -> CacheStats {
        CacheStats {
            memory_hits: self.memory_hits.load(Ordering::Relaxed),
            disk_hits: self.disk_hits.load(Ordering::Relaxed),
            source_loads: self.source_loads.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            cached_entries,
        }
    }
}

/// Descriptor cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub memory_hits: u64,
    pub disk_hits: u64,
    pub source_loads: u64,
    pub failures: u64,
    pub cached_entries: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache Stats: {} entries, {} memory hits, {} disk hits, {} source loads, {} failures",
            self.cached_entries, self.memory_hits, self.disk_hits, self.source_loads, self.failures
        )
    }
}
