//! Store-backed [`UpsetQueries`] over the `mart` views.
//!
//! Views consumed (built upstream, never written here):
//! - `mart.tourney_upsets`: one row per tournament game with `season`,
//!   winner/loser names and seeds, `seed_diff`, `margin`, `is_upset`.
//! - `mart.team_season_stats`: per team and season `wins`, `losses`,
//!   `win_pct`, `avg_margin`.
//! - `mart.team_tourney_training_data`: per team and season `win_pct` and a
//!   0/1 `made_tournament` flag.

use std::sync::LazyLock;

use duckdb::params;
use radar_store::Warehouse;

use crate::bands::WinBand;
use crate::params::{Limit, Season};
use crate::queries::UpsetQueries;
use crate::{QueryError, Table};

/// First season the dashboard covers.
pub const FIRST_SEASON: i32 = 2019;

const SEASONS_SQL: &str = "
SELECT DISTINCT season
FROM mart.tourney_upsets
WHERE season >= ?
ORDER BY season";

const UPSET_MARGINS_SQL: &str = "
SELECT margin
FROM mart.tourney_upsets
WHERE is_upset = TRUE
  AND season = ?
  AND margin IS NOT NULL";

const BIGGEST_UPSETS_SQL: &str = "
SELECT
  season,
  winner_team_name,
  winner_seed,
  loser_team_name,
  loser_seed,
  seed_diff,
  margin
FROM mart.tourney_upsets
WHERE is_upset = TRUE
  AND season = ?
ORDER BY seed_diff DESC, margin DESC
LIMIT ?";

const CHAOS_TEAMS_SQL: &str = "
SELECT
  winner_team_name AS team,
  COUNT(*) AS upset_wins,
  ROUND(AVG(CAST(seed_diff AS DOUBLE)), 2) AS avg_seed_diff
FROM mart.tourney_upsets
WHERE is_upset = TRUE
  AND season = ?
GROUP BY winner_team_name
ORDER BY upset_wins DESC, avg_seed_diff DESC
LIMIT ?";

const UPSET_RATE_BY_WINNER_SEED_SQL: &str = "
SELECT
  winner_seed,
  COUNT(*) AS wins,
  CAST(SUM(CASE WHEN is_upset THEN 1 ELSE 0 END) AS BIGINT) AS upset_wins,
  ROUND(
    COALESCE(
      100.0 * CAST(SUM(CASE WHEN is_upset THEN 1 ELSE 0 END) AS DOUBLE)
        / NULLIF(COUNT(*), 0),
      0
    ),
    2
  ) AS upset_win_pct
FROM mart.tourney_upsets
WHERE winner_seed IS NOT NULL
  AND loser_seed IS NOT NULL
  AND season = ?
GROUP BY winner_seed
ORDER BY winner_seed";

const TOP_REGULAR_SEASON_TEAMS_SQL: &str = "
SELECT team_name, wins, losses, win_pct, avg_margin
FROM mart.team_season_stats
WHERE season = ?
ORDER BY win_pct DESC, avg_margin DESC
LIMIT ?";

/// Built from [`WinBand`] so the SQL buckets match `WinBand::from_win_pct`.
static TOURNEY_ODDS_SQL: LazyLock<String> = LazyLock::new(|| {
    format!(
        "
SELECT win_range, pct_made_tourney
FROM (
  SELECT
    {label} AS win_range,
    {ordinal} AS band,
    ROUND(
      100.0 * CAST(SUM(CAST(made_tournament AS INTEGER)) AS DOUBLE) / COUNT(*),
      1
    ) AS pct_made_tourney
  FROM mart.team_tourney_training_data
  WHERE win_pct IS NOT NULL
  GROUP BY win_range, band
)
ORDER BY band",
        label = WinBand::label_case_sql("win_pct"),
        ordinal = WinBand::ordinal_case_sql("win_pct"),
    )
});

/// Runs each query directly against the warehouse.
pub struct MartQueries<'a> {
    warehouse: &'a Warehouse,
}

impl<'a> MartQueries<'a> {
    #[must_use]
    pub const fn new(warehouse: &'a Warehouse) -> Self {
        Self { warehouse }
    }

    fn run<P: duckdb::Params>(
        &self,
        name: &str,
        sql: &str,
        params: P,
    ) -> Result<Table, QueryError> {
        let table = self.warehouse.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            Table::collect(&mut stmt, params)
        })?;
        tracing::debug!(query = name, rows = table.len(), "mart query finished");
        Ok(table)
    }
}

impl UpsetQueries for MartQueries<'_> {
    fn seasons(&self) -> Result<Table, QueryError> {
        self.run("seasons", SEASONS_SQL, params![FIRST_SEASON])
    }

    fn upset_margins(&self, season: i32) -> Result<Table, QueryError> {
        let season = Season::new(season)?;
        self.run("upset_margins", UPSET_MARGINS_SQL, params![season.get()])
    }

    fn biggest_upsets(&self, season: i32, limit: i64) -> Result<Table, QueryError> {
        let season = Season::new(season)?;
        let limit = Limit::new(limit)?;
        self.run(
            "biggest_upsets",
            BIGGEST_UPSETS_SQL,
            params![season.get(), limit.get()],
        )
    }

    fn chaos_teams(&self, season: i32, limit: i64) -> Result<Table, QueryError> {
        let season = Season::new(season)?;
        let limit = Limit::new(limit)?;
        self.run(
            "chaos_teams",
            CHAOS_TEAMS_SQL,
            params![season.get(), limit.get()],
        )
    }

    fn upset_rate_by_winner_seed(&self, season: i32) -> Result<Table, QueryError> {
        let season = Season::new(season)?;
        self.run(
            "upset_rate_by_winner_seed",
            UPSET_RATE_BY_WINNER_SEED_SQL,
            params![season.get()],
        )
    }

    fn top_regular_season_teams(&self, season: i32, limit: i64) -> Result<Table, QueryError> {
        let season = Season::new(season)?;
        let limit = Limit::new(limit)?;
        self.run(
            "top_regular_season_teams",
            TOP_REGULAR_SEASON_TEAMS_SQL,
            params![season.get(), limit.get()],
        )
    }

    fn tourney_odds_by_win_range(&self) -> Result<Table, QueryError> {
        self.run("tourney_odds_by_win_range", &TOURNEY_ODDS_SQL, [])
    }
}
