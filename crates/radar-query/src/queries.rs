//! The analytic query surface shared by the store-backed and cached sets.

use serde::Serialize;

use crate::params::{Limit, Season};
use crate::{QueryError, Table};

/// Fixed set of read-only aggregates over the mart views.
///
/// Every method validates its parameters before touching the store and
/// returns rows in the documented order.
pub trait UpsetQueries {
    /// Distinct seasons from 2019 on, ascending. Column: `season`.
    fn seasons(&self) -> Result<Table, QueryError>;

    /// Non-null margins of every upset in `season`. Column: `margin`.
    fn upset_margins(&self, season: i32) -> Result<Table, QueryError>;

    /// Upsets in `season` by seed differential, then margin, both descending.
    fn biggest_upsets(&self, season: i32, limit: i64) -> Result<Table, QueryError>;

    /// Winners with the most upset wins in `season`; ties broken by the
    /// average seed differential.
    fn chaos_teams(&self, season: i32, limit: i64) -> Result<Table, QueryError>;

    /// Wins, upset wins and upset-win percentage per winner seed, seed ascending.
    fn upset_rate_by_winner_seed(&self, season: i32) -> Result<Table, QueryError>;

    /// Best regular-season records by win percentage, then average margin.
    fn top_regular_season_teams(&self, season: i32, limit: i64) -> Result<Table, QueryError>;

    /// Share of teams reaching the tournament per win-percentage band, all seasons.
    fn tourney_odds_by_win_range(&self) -> Result<Table, QueryError>;
}

/// Identity of one query invocation: which query plus its validated arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum QueryKey {
    Seasons,
    UpsetMargins { season: Season },
    BiggestUpsets { season: Season, limit: Limit },
    ChaosTeams { season: Season, limit: Limit },
    UpsetRateByWinnerSeed { season: Season },
    TopRegularSeasonTeams { season: Season, limit: Limit },
    TourneyOddsByWinRange,
}

impl QueryKey {
    /// Run this query against `queries`.
    ///
    /// # Errors
    ///
    /// Whatever the underlying query returns.
    pub fn run<Q: UpsetQueries + ?Sized>(&self, queries: &Q) -> Result<Table, QueryError> {
        match *self {
            Self::Seasons => queries.seasons(),
            Self::UpsetMargins { season } => queries.upset_margins(season.get()),
            Self::BiggestUpsets { season, limit } => {
                queries.biggest_upsets(season.get(), limit.get())
            }
            Self::ChaosTeams { season, limit } => queries.chaos_teams(season.get(), limit.get()),
            Self::UpsetRateByWinnerSeed { season } => {
                queries.upset_rate_by_winner_seed(season.get())
            }
            Self::TopRegularSeasonTeams { season, limit } => {
                queries.top_regular_season_teams(season.get(), limit.get())
            }
            Self::TourneyOddsByWinRange => queries.tourney_odds_by_win_range(),
        }
    }
}

/// Season to show when the caller has not picked one: the latest available,
/// or `fallback` when there are none.
#[must_use]
pub fn default_season(seasons: &Table, fallback: i32) -> i32 {
    seasons
        .i64_column("season")
        .into_iter()
        .max()
        .and_then(|season| i32::try_from(season).ok())
        .unwrap_or(fallback)
}
