use std::time::{Duration, Instant};

/// A cached value stamped with the moment it was computed.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub created_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    /// Expired once strictly more than `ttl` has passed since creation.
    #[inline]
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let fresh = CacheEntry::new(1u8);
        assert!(!fresh.is_expired(Duration::from_secs(300)));

        let old = CacheEntry {
            value: 2u8,
            created_at: Instant::now() - Duration::from_millis(50),
        };
        assert!(old.is_expired(Duration::from_millis(10)));
        assert!(!old.is_expired(Duration::from_secs(60)));
    }
}
