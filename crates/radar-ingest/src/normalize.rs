//! Vendor header → canonical column name.
//!
//! Vendor exports use PascalCase headers with embedded acronyms and digits
//! (`WRegularSeasonCompactResults`, `TeamID`, `WScore`). The canonical form is
//! `snake_case`, produced by two boundary-insertion scans followed by lowercasing:
//!
//! 1. Before every capitalized word (`[A-Z][a-z]+`) that has any character in
//!    front of it. A match swallows that preceding character and the whole
//!    lowercase run, and scanning resumes after the run, so matches never
//!    overlap.
//! 2. Between a lowercase letter or digit and the uppercase letter right after it,
//!    again resuming after each matched pair.
//!
//! Acronym runs stay glued to the letter before the next word:
//! `MNCAATourneySeeds` → `mncaa_tourney_seeds`.

const SEPARATOR: char = '_';

/// Normalize one vendor column name.
///
/// Total over all inputs and idempotent: once lowercased, neither scan finds an
/// uppercase letter to split on.
#[must_use]
pub fn normalize_column(name: &str) -> String {
    let chars: Vec<char> = name.trim().chars().collect();
    let words = split_capitalized_words(&chars);
    let split = split_lower_upper(&words);
    split.into_iter().collect::<String>().to_lowercase()
}

/// Normalize every header field, preserving order.
#[must_use]
pub fn normalize_header<S: AsRef<str>>(header: &[S]) -> Vec<String> {
    header
        .iter()
        .map(|name| normalize_column(name.as_ref()))
        .collect()
}

/// Pass 1: `(.)([A-Z][a-z]+)` → `$1_$2`.
fn split_capitalized_words(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        let starts_word = chars[i] != '\n'
            && chars.get(i + 1).is_some_and(char::is_ascii_uppercase)
            && chars.get(i + 2).is_some_and(char::is_ascii_lowercase);

        if starts_word {
            let mut end = i + 3;
            while chars.get(end).is_some_and(char::is_ascii_lowercase) {
                end += 1;
            }
            out.push(chars[i]);
            out.push(SEPARATOR);
            out.extend_from_slice(&chars[i + 1..end]);
            i = end;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Pass 2: `([a-z0-9])([A-Z])` → `$1_$2`.
fn split_lower_upper(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        let current = chars[i];
        let boundary = (current.is_ascii_lowercase() || current.is_ascii_digit())
            && chars.get(i + 1).is_some_and(char::is_ascii_uppercase);

        if boundary {
            out.push(current);
            out.push(SEPARATOR);
            out.push(chars[i + 1]);
            i += 2;
        } else {
            out.push(current);
            i += 1;
        }
    }
    out
}
