/// Statistics for the query cache
use serde::{Deserialize, Serialize};

/// Counters for one query-shape cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeStatistics {
    /// Query shape name ("exact", "radius", ...)
    pub name: String,
    /// Entries currently held
    pub entries: usize,
    /// Configured entry bound
    pub max_entries: usize,
    /// Reads answered from the cache
    pub hits: u64,
    /// Reads that had to be computed
    pub misses: u64,
    /// Entries dropped to respect the entry bound
    pub evictions: u64,
    /// Entries dropped because their TTL ran out
    pub expirations: u64,
}

/// Counters for every query-shape cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatistics {
    /// Number of bulk invalidations so far
    pub generation: u64,
    /// Per-shape counters
    pub shapes: Vec<ShapeStatistics>,
}

impl CacheStatistics {
    pub fn total_entries(&self) -> usize {
        self.shapes.iter().map(|shape| shape.entries).sum()
    }

    pub fn total_hits(&self) -> u64 {
        self.shapes.iter().map(|shape| shape.hits).sum()
    }

    pub fn total_misses(&self) -> u64 {
        self.shapes.iter().map(|shape| shape.misses).sum()
    }

    /// Fraction of reads served from the cache, 0.0 when nothing was read yet.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.total_hits();
        let total = hits + self.total_misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn shape(&self, name: &str) -> Option<&ShapeStatistics> {
        self.shapes.iter().find(|shape| shape.name == name)
    }
}
