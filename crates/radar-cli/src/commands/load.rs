use std::path::Path;

use anyhow::Context;
use radar_config::RadarConfig;
use radar_ingest::{BulkLoader, LoadError, LoadReport, Manifest, TableLoader, run_manifest};
use radar_store::TableRef;

use crate::bootstrap;
use crate::cli::root_commands::LoadArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::{format_count, output};

/// Prints one line per committed table as the run progresses, so the operator
/// sees which tables were replaced even when a later file fails.
struct Announcing<L> {
    inner: L,
}

impl<L: TableLoader> TableLoader for Announcing<L> {
    fn load(&self, source: &Path, table: &TableRef) -> Result<LoadReport, LoadError> {
        let report = self.inner.load(source, table)?;
        println!("{}", loaded_line(&report));
        Ok(report)
    }
}

fn loaded_line(report: &LoadReport) -> String {
    format!(
        "Loaded {} rows into {}",
        format_count(report.rows),
        report.table
    )
}

/// Handle `radar load`.
pub fn handle(args: &LoadArgs, config: &RadarConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let warehouse = bootstrap::open_warehouse(config)?;
    let raw_dir = args
        .raw_dir
        .clone()
        .unwrap_or_else(|| config.ingest.raw_dir.clone());
    let manifest = Manifest::ncaa_mens();
    let loader = BulkLoader::new(&warehouse);

    tracing::info!(raw_dir = %raw_dir.display(), tables = manifest.len(), "starting load run");

    let context = || format!("load from '{}' aborted", raw_dir.display());
    match flags.format {
        OutputFormat::Table if !flags.quiet => {
            run_manifest(&Announcing { inner: loader }, &raw_dir, &manifest)
                .with_context(context)?;
        }
        OutputFormat::Table => {
            run_manifest(&loader, &raw_dir, &manifest).with_context(context)?;
        }
        OutputFormat::Json => {
            let reports = run_manifest(&loader, &raw_dir, &manifest).with_context(context)?;
            output(&reports, flags.format)?;
        }
        OutputFormat::Raw => {
            let reports = run_manifest(&loader, &raw_dir, &manifest).with_context(context)?;
            for report in &reports {
                println!("{}", serde_json::to_string(report)?);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn loaded_line_uses_thousands_separator() {
        let report = LoadReport {
            source: PathBuf::from("data/raw/MRegularSeasonCompactResults.csv"),
            table: TableRef::new("raw", "mregular_season_compact_results"),
            rows: 196_823,
            loaded_at: "2024-03-17T12:00:00Z".parse().unwrap(),
        };
        assert_eq!(
            loaded_line(&report),
            "Loaded 196,823 rows into raw.mregular_season_compact_results"
        );
    }
}
