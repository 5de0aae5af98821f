use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default time-to-live for generated stylesheets.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry {
    css: String,
    stored_at: Instant,
}

/// Process-local cache of generated stylesheets, keyed by theme-set
/// fingerprint. Entries are pure derived data; a miss only costs a
/// regeneration, so no cross-process coordination is attempted.
pub struct CssCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl CssCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the cached stylesheet if present and younger than the TTL.
    /// A miss is not an error; the caller regenerates.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.css.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: impl Into<String>, css: impl Into<String>) {
        self.entries().insert(
            key.into(),
            CacheEntry {
                css: css.into(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Removes one entry, or clears everything when no key is given. Theme
    /// mutations clear everything: staleness past an explicit invalidation
    /// point is not tolerated.
    pub fn invalidate(&self, key: Option<&str>) {
        let mut entries = self.entries();
        match key {
            Some(key) => {
                entries.remove(key);
            }
            None => entries.clear(),
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries().len()
    }
}

impl Default for CssCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_within_ttl_and_misses_after() {
        let cache = CssCache::with_ttl(Duration::from_millis(80));
        cache.set("k", "body{}");

        assert_eq!(cache.get("k").as_deref(), Some("body{}"));

        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.get("k"), None);
        // Expired entry is dropped on read
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn invalidate_one_and_all() {
        let cache = CssCache::new();
        cache.set("a", "1");
        cache.set("b", "2");

        cache.invalidate(Some("a"));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b").as_deref(), Some("2"));

        cache.invalidate(None);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn set_overwrites_existing_key() {
        let cache = CssCache::new();
        cache.set("k", "old");
        cache.set("k", "new");
        assert_eq!(cache.get("k").as_deref(), Some("new"));
        assert_eq!(cache.entry_count(), 1);
    }
}
