use radar_config::{GeneralConfig, RadarConfig};
use radar_query::{CachedQueries, MartQueries, Table, UpsetQueries, default_season};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::{QueryArgs, QueryKind};
use crate::output::render_query;

/// Handle `radar query`.
pub fn handle(args: &QueryArgs, config: &RadarConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let warehouse = bootstrap::open_warehouse(config)?;
    let queries = CachedQueries::new(MartQueries::new(&warehouse), config.cache.ttl());
    let result = run(&queries, args, &config.general)?;
    println!("{}", render_query(&result, flags.format)?);
    Ok(())
}

/// Resolve defaults the way the dashboard does, then run the query.
///
/// An omitted season means the latest available one; an omitted limit means
/// `general.default_limit`. Explicit limits were range-checked by the parser.
fn run<Q: UpsetQueries>(
    queries: &Q,
    args: &QueryArgs,
    general: &GeneralConfig,
) -> anyhow::Result<Table> {
    let limit = args.limit.unwrap_or(general.default_limit);
    let season = match args.season {
        Some(season) => season,
        None if args.kind.takes_season() => {
            default_season(&queries.seasons()?, general.fallback_season)
        }
        None => general.fallback_season,
    };
    tracing::debug!(kind = ?args.kind, season, limit, "running query");

    let table = match args.kind {
        QueryKind::Seasons => queries.seasons()?,
        QueryKind::UpsetMargins => queries.upset_margins(season)?,
        QueryKind::BiggestUpsets => queries.biggest_upsets(season, limit)?,
        QueryKind::ChaosTeams => queries.chaos_teams(season, limit)?,
        QueryKind::UpsetRate => queries.upset_rate_by_winner_seed(season)?,
        QueryKind::TopTeams => queries.top_regular_season_teams(season, limit)?,
        QueryKind::TourneyOdds => queries.tourney_odds_by_win_range()?,
    };
    Ok(table)
}
