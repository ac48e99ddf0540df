//! In-memory raw record batches read from vendor CSV exports.

use std::path::Path;

use crate::LoadError;
use crate::normalize::normalize_header;

/// One source file held in memory: a header plus rows of text fields.
///
/// Empty fields become `None` so the store writes `NULL`; every other value is
/// passed through untouched and cast by the store to the column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBatch {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawBatch {
    /// Read a whole delimited file with a header row.
    ///
    /// # Errors
    ///
    /// - [`LoadError::MissingSource`] if `path` is not an existing file.
    /// - [`LoadError::Read`] if the file is not valid delimited text (including
    ///   rows whose field count differs from the header).
    pub fn read_csv(path: &Path) -> Result<Self, LoadError> {
        if !path.is_file() {
            return Err(LoadError::MissingSource {
                path: path.to_path_buf(),
            });
        }

        let read_err = |source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(read_err)?;

        let columns = reader
            .headers()
            .map_err(read_err)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_err)?;
            rows.push(
                record
                    .iter()
                    .map(|field| (!field.is_empty()).then(|| field.to_string()))
                    .collect(),
            );
        }

        Ok(Self { columns, rows })
    }

    /// Replace every header field with its canonical name.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.columns = normalize_header(&self.columns);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn reads_header_and_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MTeams.csv");
        fs::write(
            &path,
            "TeamID,TeamName,FirstD1Season\n1101,Abilene Chr,2014\n1102,Air Force,\n",
        )
        .unwrap();

        let batch = RawBatch::read_csv(&path).unwrap();
        assert_eq!(batch.columns, vec!["TeamID", "TeamName", "FirstD1Season"]);
        assert_eq!(
            batch.rows,
            vec![
                vec![
                    Some("1101".to_string()),
                    Some("Abilene Chr".to_string()),
                    Some("2014".to_string())
                ],
                vec![Some("1102".to_string()), Some("Air Force".to_string()), None],
            ]
        );

        let normalized = batch.normalized();
        assert_eq!(
            normalized.columns,
            vec!["team_id", "team_name", "first_d1_season"]
        );
        assert_eq!(normalized.len(), 2);
    }

    #[test]
    fn missing_file_is_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MTeams.csv");
        let err = RawBatch::read_csv(&path).unwrap_err();
        match err {
            LoadError::MissingSource { path: reported } => assert_eq!(reported, path),
            other => panic!("expected MissingSource, got {other:?}"),
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "A,B\n1,2\n3\n").unwrap();
        let err = RawBatch::read_csv(&path).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }), "{err:?}");
    }

    #[test]
    fn header_only_file_is_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "Season,DayNum\n").unwrap();
        let batch = RawBatch::read_csv(&path).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.columns.len(), 2);
    }
}
