use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Reload every raw table from the CSV exports, in manifest order.
    Load(LoadArgs),
    /// Run one dashboard query and print the rows.
    Query(QueryArgs),
    /// Print the resolved configuration.
    Config,
}

#[derive(Clone, Debug, Args)]
pub struct LoadArgs {
    /// Directory holding the exports (overrides `ingest.raw_dir`).
    #[arg(long)]
    pub raw_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct QueryArgs {
    /// Which aggregate to run.
    #[arg(value_enum)]
    pub kind: QueryKind,

    /// Season to report on (defaults to the latest available).
    #[arg(short, long)]
    pub season: Option<i32>,

    /// Rows for ranked queries, 5 to 50 (defaults to `general.default_limit`).
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(radar_config::LIMIT_RANGE))]
    pub limit: Option<i64>,
}

/// The dashboard queries, by CLI name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum QueryKind {
    Seasons,
    UpsetMargins,
    BiggestUpsets,
    ChaosTeams,
    UpsetRate,
    TopTeams,
    TourneyOdds,
}

impl QueryKind {
    /// Whether the query is scoped to one season.
    #[must_use]
    pub const fn takes_season(self) -> bool {
        !matches!(self, Self::Seasons | Self::TourneyOdds)
    }
}
