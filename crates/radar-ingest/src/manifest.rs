//! The ordered list of exports to load, and the run that walks it.

use std::path::Path;

use radar_store::TableRef;
use serde::Serialize;

use crate::LoadError;
use crate::loader::{LoadReport, TableLoader};

/// One `(source file, destination table)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// File name relative to the raw data directory.
    pub file_name: String,
    pub table: TableRef,
}

impl ManifestEntry {
    #[must_use]
    pub fn new(file_name: impl Into<String>, table: TableRef) -> Self {
        Self {
            file_name: file_name.into(),
            table,
        }
    }
}

/// Ordered load plan. Order is preserved exactly when running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    #[must_use]
    pub const fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    /// The men's tournament exports: teams, regular season, tournament, seeds.
    #[must_use]
    pub fn ncaa_mens() -> Self {
        let raw = |table: &str| TableRef::new("raw", table);
        Self::new(vec![
            ManifestEntry::new("MTeams.csv", raw("mteams")),
            ManifestEntry::new(
                "MRegularSeasonCompactResults.csv",
                raw("mregular_season_compact_results"),
            ),
            ManifestEntry::new(
                "MNCAATourneyCompactResults.csv",
                raw("mncaa_tourney_compact_results"),
            ),
            ManifestEntry::new("MNCAATourneySeeds.csv", raw("mncaa_tourney_seeds")),
        ])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load every manifest entry in order, stopping at the first failure.
///
/// Tables committed before the failure keep their new contents; each entry is
/// its own transaction, so re-running the whole manifest is safe.
///
/// # Errors
///
/// The first [`LoadError`] returned by `loader`, unchanged.
pub fn run_manifest<L: TableLoader>(
    loader: &L,
    raw_dir: &Path,
    manifest: &Manifest,
) -> Result<Vec<LoadReport>, LoadError> {
    let mut reports = Vec::with_capacity(manifest.len());
    for (index, entry) in manifest.entries.iter().enumerate() {
        let source = raw_dir.join(&entry.file_name);
        match loader.load(&source, &entry.table) {
            Ok(report) => reports.push(report),
            Err(error) => {
                tracing::warn!(
                    step = index + 1,
                    of = manifest.len(),
                    table = %entry.table,
                    %error,
                    "load run aborted"
                );
                return Err(error);
            }
        }
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    /// Records every call and fails on the configured (1-based) call number.
    struct ScriptedLoader {
        fail_on: Option<usize>,
        calls: RefCell<Vec<(PathBuf, TableRef)>>,
    }

    impl ScriptedLoader {
        fn failing_on(call: usize) -> Self {
            Self {
                fail_on: Some(call),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn succeeding() -> Self {
            Self {
                fail_on: None,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl TableLoader for ScriptedLoader {
        fn load(&self, source: &Path, table: &TableRef) -> Result<LoadReport, LoadError> {
            self.calls
                .borrow_mut()
                .push((source.to_path_buf(), table.clone()));
            if self.fail_on == Some(self.calls.borrow().len()) {
                return Err(LoadError::MissingSource {
                    path: source.to_path_buf(),
                });
            }
            Ok(LoadReport {
                source: source.to_path_buf(),
                table: table.clone(),
                rows: 10,
                loaded_at: Utc::now(),
            })
        }
    }

    #[test]
    fn reference_manifest_has_four_entries_in_order() {
        let manifest = Manifest::ncaa_mens();
        let tables: Vec<String> = manifest
            .entries
            .iter()
            .map(|e| e.table.to_string())
            .collect();
        assert_eq!(
            tables,
            vec![
                "raw.mteams",
                "raw.mregular_season_compact_results",
                "raw.mncaa_tourney_compact_results",
                "raw.mncaa_tourney_seeds",
            ]
        );
    }

    #[test]
    fn runs_every_entry_in_order() {
        let loader = ScriptedLoader::succeeding();
        let reports = run_manifest(&loader, Path::new("data/raw"), &Manifest::ncaa_mens()).unwrap();

        assert_eq!(reports.len(), 4);
        let calls = loader.calls.borrow();
        assert_eq!(calls[0].0, PathBuf::from("data/raw/MTeams.csv"));
        assert_eq!(calls[3].1, TableRef::new("raw", "mncaa_tourney_seeds"));
    }

    #[test]
    fn stops_at_first_failure() {
        let loader = ScriptedLoader::failing_on(2);
        let err = run_manifest(&loader, Path::new("raw"), &Manifest::ncaa_mens()).unwrap_err();

        assert_eq!(loader.calls.borrow().len(), 2, "entries 3 and 4 must not run");
        match err {
            LoadError::MissingSource { path } => {
                assert_eq!(path, PathBuf::from("raw/MRegularSeasonCompactResults.csv"));
            }
            other => panic!("expected the second entry's error, got {other:?}"),
        }
    }

    #[test]
    fn empty_manifest_is_a_no_op() {
        let loader = ScriptedLoader::succeeding();
        let reports = run_manifest(&loader, Path::new("raw"), &Manifest::new(Vec::new())).unwrap();
        assert!(reports.is_empty());
        assert!(loader.calls.borrow().is_empty());
    }
}
