//! Regular-season win-percentage bands for the tournament-odds query.

use std::fmt::Write;

/// Seven fixed bands. Each lower bound is inclusive, each upper bound exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WinBand {
    Below55,
    From55To60,
    From60To65,
    From65To70,
    From70To75,
    From75To80,
    From80,
}

impl WinBand {
    /// All bands in display order.
    pub const ALL: [Self; 7] = [
        Self::Below55,
        Self::From55To60,
        Self::From60To65,
        Self::From65To70,
        Self::From70To75,
        Self::From75To80,
        Self::From80,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Below55 => "<55%",
            Self::From55To60 => "55-60%",
            Self::From60To65 => "60-65%",
            Self::From65To70 => "65-70%",
            Self::From70To75 => "70-75%",
            Self::From75To80 => "75-80%",
            Self::From80 => "80%+",
        }
    }

    /// Exclusive upper bound as a win fraction; `None` for the open top band.
    #[must_use]
    pub const fn upper(self) -> Option<f64> {
        match self {
            Self::Below55 => Some(0.55),
            Self::From55To60 => Some(0.60),
            Self::From60To65 => Some(0.65),
            Self::From65To70 => Some(0.70),
            Self::From70To75 => Some(0.75),
            Self::From75To80 => Some(0.80),
            Self::From80 => None,
        }
    }

    /// Position in [`Self::ALL`], used as the SQL sort key.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Band for a win fraction in `[0, 1]`.
    #[must_use]
    pub fn from_win_pct(win_pct: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|band| band.upper().is_some_and(|upper| win_pct < upper))
            .unwrap_or(Self::From80)
    }

    /// `CASE` expression over `column` yielding the band label, mirroring
    /// [`Self::from_win_pct`].
    #[must_use]
    pub fn label_case_sql(column: &str) -> String {
        Self::case_sql(column, |band| format!("'{}'", band.label()))
    }

    /// `CASE` expression over `column` yielding the band ordinal.
    #[must_use]
    pub fn ordinal_case_sql(column: &str) -> String {
        Self::case_sql(column, |band| band.ordinal().to_string())
    }

    fn case_sql(column: &str, value: impl Fn(Self) -> String) -> String {
        let mut sql = String::from("CASE");
        for band in Self::ALL {
            match band.upper() {
                Some(upper) => {
                    let _ = write!(sql, " WHEN {column} < {upper:.2} THEN {}", value(band));
                }
                None => {
                    let _ = write!(sql, " ELSE {}", value(band));
                }
            }
        }
        sql.push_str(" END");
        sql
    }
}
