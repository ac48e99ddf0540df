//! [`UpsetQueries`] wrapper that memoizes every query per argument tuple.

use std::time::Duration;

use crate::cache::QueryCache;
use crate::params::{Limit, Season};
use crate::queries::{QueryKey, UpsetQueries};
use crate::{QueryError, Table};

/// Default freshness window for dashboard queries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Drop-in replacement for the wrapped query set.
///
/// Calls return exactly what the inner set would, except that a result
/// younger than the TTL is served from memory. Parameters are validated before
/// the cache is consulted, so an invalid call never reaches the inner set.
pub struct CachedQueries<Q> {
    inner: Q,
    cache: QueryCache<QueryKey, Table>,
}

impl<Q: UpsetQueries> CachedQueries<Q> {
    #[must_use]
    pub fn new(inner: Q, ttl: Duration) -> Self {
        Self::with_cache(inner, QueryCache::new(ttl))
    }

    #[must_use]
    pub const fn with_cache(inner: Q, cache: QueryCache<QueryKey, Table>) -> Self {
        Self { inner, cache }
    }

    #[must_use]
    pub const fn cache(&self) -> &QueryCache<QueryKey, Table> {
        &self.cache
    }

    #[must_use]
    pub const fn inner(&self) -> &Q {
        &self.inner
    }

    fn fetch(&self, key: QueryKey) -> Result<Table, QueryError> {
        self.cache
            .get_or_try_insert_with(key, |key| key.run(&self.inner))
    }
}

impl<Q: UpsetQueries> UpsetQueries for CachedQueries<Q> {
    fn seasons(&self) -> Result<Table, QueryError> {
        self.fetch(QueryKey::Seasons)
    }

    fn upset_margins(&self, season: i32) -> Result<Table, QueryError> {
        self.fetch(QueryKey::UpsetMargins {
            season: Season::new(season)?,
        })
    }

    fn biggest_upsets(&self, season: i32, limit: i64) -> Result<Table, QueryError> {
        self.fetch(QueryKey::BiggestUpsets {
            season: Season::new(season)?,
            limit: Limit::new(limit)?,
        })
    }

    fn chaos_teams(&self, season: i32, limit: i64) -> Result<Table, QueryError> {
        self.fetch(QueryKey::ChaosTeams {
            season: Season::new(season)?,
            limit: Limit::new(limit)?,
        })
    }

    fn upset_rate_by_winner_seed(&self, season: i32) -> Result<Table, QueryError> {
        self.fetch(QueryKey::UpsetRateByWinnerSeed {
            season: Season::new(season)?,
        })
    }

    fn top_regular_season_teams(&self, season: i32, limit: i64) -> Result<Table, QueryError> {
        self.fetch(QueryKey::TopRegularSeasonTeams {
            season: Season::new(season)?,
            limit: Limit::new(limit)?,
        })
    }

    fn tourney_odds_by_win_range(&self) -> Result<Table, QueryError> {
        self.fetch(QueryKey::TourneyOddsByWinRange)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Cell;
    use crate::cache::test_clock::ManualClock;

    /// Counts calls per query and can be switched into failure mode.
    #[derive(Default)]
    struct CountingQueries {
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    impl CountingQueries {
        fn answer(&self, label: &str, season: i32, limit: i64) -> Result<Table, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(QueryError::DuckDb(duckdb::Error::QueryReturnedNoRows));
            }
            Ok(Table {
                columns: vec!["query".into(), "season".into(), "limit".into()],
                rows: vec![vec![
                    Cell::Text(label.to_string()),
                    Cell::Int(i64::from(season)),
                    Cell::Int(limit),
                ]],
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl UpsetQueries for CountingQueries {
        fn seasons(&self) -> Result<Table, QueryError> {
            self.answer("seasons", 0, 0)
        }
        fn upset_margins(&self, season: i32) -> Result<Table, QueryError> {
            self.answer("upset_margins", season, 0)
        }
        fn biggest_upsets(&self, season: i32, limit: i64) -> Result<Table, QueryError> {
            self.answer("biggest_upsets", season, limit)
        }
        fn chaos_teams(&self, season: i32, limit: i64) -> Result<Table, QueryError> {
            self.answer("chaos_teams", season, limit)
        }
        fn upset_rate_by_winner_seed(&self, season: i32) -> Result<Table, QueryError> {
            self.answer("upset_rate_by_winner_seed", season, 0)
        }
        fn top_regular_season_teams(&self, season: i32, limit: i64) -> Result<Table, QueryError> {
            self.answer("top_regular_season_teams", season, limit)
        }
        fn tourney_odds_by_win_range(&self) -> Result<Table, QueryError> {
            self.answer("tourney_odds_by_win_range", 0, 0)
        }
    }

    fn cached() -> (CachedQueries<CountingQueries>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = QueryCache::with_clock(DEFAULT_TTL, clock.clone());
        (
            CachedQueries::with_cache(CountingQueries::default(), cache),
            clock,
        )
    }

    #[test]
    fn identical_calls_within_ttl_query_once() {
        let (queries, _clock) = cached();
        let first = queries.biggest_upsets(2024, 15).unwrap();
        let second = queries.biggest_upsets(2024, 15).unwrap();
        assert_eq!(first, second);
        assert_eq!(queries.inner().calls(), 1);
    }

    #[test]
    fn calls_after_expiry_query_again() {
        let (queries, clock) = cached();
        queries.chaos_teams(2024, 15).unwrap();
        clock.advance(DEFAULT_TTL + Duration::from_secs(1));
        queries.chaos_teams(2024, 15).unwrap();
        assert_eq!(queries.inner().calls(), 2);
    }

    #[test]
    fn different_arguments_are_cached_separately() {
        let (queries, _clock) = cached();
        let a = queries.biggest_upsets(2023, 15).unwrap();
        let b = queries.biggest_upsets(2024, 15).unwrap();
        let c = queries.biggest_upsets(2024, 5).unwrap();
        let d = queries.chaos_teams(2024, 5).unwrap();

        assert_eq!(queries.inner().calls(), 4);
        assert_eq!(a.rows[0][1], Cell::Int(2023));
        assert_eq!(b.rows[0][1], Cell::Int(2024));
        assert_eq!(c.rows[0][2], Cell::Int(5));
        assert_eq!(d.rows[0][0], Cell::Text("chaos_teams".into()));
    }

    #[test]
    fn invalid_limit_never_reaches_inner() {
        let (queries, _clock) = cached();
        for limit in [0, -1] {
            let err = queries.top_regular_season_teams(2024, limit).unwrap_err();
            assert!(matches!(err, QueryError::InvalidParameter { name: "limit", .. }));
        }
        assert_eq!(queries.inner().calls(), 0);
        assert!(queries.cache().is_empty());
    }

    #[test]
    fn failures_pass_through_and_are_not_cached() {
        let (queries, _clock) = cached();
        queries.inner().failing.store(true, Ordering::SeqCst);
        assert!(queries.seasons().is_err());
        assert!(queries.cache().is_empty());

        queries.inner().failing.store(false, Ordering::SeqCst);
        assert_eq!(queries.seasons().unwrap().len(), 1);
        assert_eq!(queries.inner().calls(), 2);
    }

    #[test]
    fn concurrent_callers_share_one_consistent_entry() {
        let (queries, _clock) = cached();

        let results: Vec<Table> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| queries.upset_rate_by_winner_seed(2024).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
        let calls = queries.inner().calls();
        assert!((1..=8).contains(&calls), "unexpected call count {calls}");
        assert_eq!(queries.cache().len(), 1);

        queries.upset_rate_by_winner_seed(2024).unwrap();
        assert_eq!(queries.inner().calls(), calls, "warm key must not query again");
    }
}
