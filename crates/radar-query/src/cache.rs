//! Time-bounded memoization for read-only queries.
//!
//! [`QueryCache`] maps a full argument tuple to the last successful result and
//! the instant it was produced. A lookup returns the stored value only while
//! its age is below the TTL; otherwise the query runs again and replaces the
//! entry. Failed queries are returned to the caller and leave the map alone.
//!
//! The query itself runs with no lock held, so two threads missing on the same
//! cold key may both hit the store. The later write wins, and both writers
//! hold a complete result, so the map never holds a partial value.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Source of "now" for freshness checks. Swappable so tests can move time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock [`Clock`] backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    produced_at: Instant,
}

/// Process-wide cache keyed by query identity plus arguments.
pub struct QueryCache<K, V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh cached value for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.value.clone())
    }

    /// Return the fresh value for `key`, or run `query`, store its result and
    /// return it.
    ///
    /// # Errors
    ///
    /// Whatever `query` returns. Nothing is stored on error.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        query: impl FnOnce(&K) -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(&key) {
            tracing::debug!(?key, "query cache hit");
            return Ok(value);
        }

        let expired = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&key);
        tracing::debug!(?key, expired, "query cache miss");
        let value = query(&key)?;
        let produced_at = self.clock.now();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key,
                Entry {
                    value: value.clone(),
                    produced_at,
                },
            );
        Ok(value)
    }

    /// Drop one entry; other keys are untouched.
    pub fn invalidate(&self, key: &K) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    /// Number of stored entries, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_fresh(&self, entry: &Entry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.produced_at) < self.ttl
    }
}

#[cfg(test)]
pub(crate) mod test_clock {
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use super::Clock;

    /// Clock that only moves when told to.
    pub struct ManualClock {
        base: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            }
        }

        pub fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + *self.offset.lock().unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::test_clock::ManualClock;
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    fn cache_with_clock() -> (QueryCache<(i32, i64), String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = QueryCache::with_clock(TTL, clock.clone());
        (cache, clock)
    }

    #[test]
    fn fresh_entry_skips_query() {
        let (cache, clock) = cache_with_clock();
        let calls = Cell::new(0);
        let query = |key: &(i32, i64)| {
            calls.set(calls.get() + 1);
            Ok::<_, String>(format!("{}:{}", key.0, key.1))
        };

        assert_eq!(cache.get_or_try_insert_with((2024, 15), query).unwrap(), "2024:15");
        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get_or_try_insert_with((2024, 15), query).unwrap(), "2024:15");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn expired_entry_reruns_query() {
        let (cache, clock) = cache_with_clock();
        let calls = Cell::new(0);
        let query = |_: &(i32, i64)| {
            calls.set(calls.get() + 1);
            Ok::<_, String>(format!("call {}", calls.get()))
        };

        assert_eq!(cache.get_or_try_insert_with((2024, 15), query).unwrap(), "call 1");
        clock.advance(TTL);
        assert!(cache.get(&(2024, 15)).is_none(), "entry at exactly TTL is stale");
        assert_eq!(cache.get_or_try_insert_with((2024, 15), query).unwrap(), "call 2");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn keys_are_independent() {
        let (cache, _clock) = cache_with_clock();
        let calls = Cell::new(0);
        let query = |key: &(i32, i64)| {
            calls.set(calls.get() + 1);
            Ok::<_, String>(key.0.to_string())
        };

        assert_eq!(cache.get_or_try_insert_with((2023, 15), query).unwrap(), "2023");
        assert_eq!(cache.get_or_try_insert_with((2024, 15), query).unwrap(), "2024");
        assert_eq!(cache.get_or_try_insert_with((2024, 10), query).unwrap(), "2024");
        assert_eq!(calls.get(), 3);

        assert!(cache.invalidate(&(2023, 15)));
        assert!(cache.get(&(2024, 15)).is_some());
        assert!(cache.get(&(2023, 15)).is_none());
    }

    #[test]
    fn errors_are_not_cached() {
        let (cache, _clock) = cache_with_clock();

        let err = cache
            .get_or_try_insert_with((2024, 15), |_| Err::<String, _>("store down"))
            .unwrap_err();
        assert_eq!(err, "store down");
        assert!(cache.is_empty());

        let value = cache
            .get_or_try_insert_with((2024, 15), |_| Ok::<_, &str>("recovered".to_string()))
            .unwrap();
        assert_eq!(value, "recovered");
    }
}
