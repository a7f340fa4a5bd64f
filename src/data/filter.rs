use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use thiserror::Error;

use super::model::{Dataset, Sex};

// ---------------------------------------------------------------------------
// Match mode
// ---------------------------------------------------------------------------

/// How the search pattern is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// The pattern is taken as one exact name.
    #[default]
    Literal,
    /// The pattern is a regular expression matched from the start of each name.
    Regex,
}

impl MatchMode {
    /// Word used in headings: "Trend of name: …" / "Trend of regular expression: …".
    pub fn header_word(self) -> &'static str {
        match self {
            MatchMode::Literal => "name",
            MatchMode::Regex => "regular expression",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_word())
    }
}

#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// ---------------------------------------------------------------------------
// Name resolution
// ---------------------------------------------------------------------------

/// Turn the user's pattern into the set of names to keep.
///
/// Literal mode returns the pattern itself even if no such name exists, so an
/// unknown name produces an empty (not failed) query. Regex mode keeps every
/// known name that the pattern matches *from its first character*; the match
/// need not cover the whole name, so `Al` matches `Alison`. The syntax is the
/// `regex` crate's: no look-around and no backreferences.
pub fn resolve(
    pattern: &str,
    mode: MatchMode,
    names: &BTreeSet<String>,
) -> Result<BTreeSet<String>, QueryError> {
    match mode {
        MatchMode::Literal => Ok(BTreeSet::from([pattern.to_string()])),
        MatchMode::Regex => {
            let invalid = |source: regex::Error| QueryError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            };
            // Validate alone first: `a)|(b` would otherwise compile once wrapped.
            Regex::new(pattern).map_err(invalid)?;
            let anchored = Regex::new(&format!("^(?:{pattern})")).map_err(invalid)?;
            Ok(names
                .iter()
                .filter(|name| anchored.is_match(name))
                .cloned()
                .collect())
        }
    }
}

// ---------------------------------------------------------------------------
// Row filtering
// ---------------------------------------------------------------------------

/// Result of one search: matched names and the rows for them, split by sex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub matched_names: BTreeSet<String>,
    /// Indices into the dataset, in file order.
    pub female_rows: Vec<usize>,
    pub male_rows: Vec<usize>,
    pub total_female: u64,
    pub total_male: u64,
}

impl QueryResult {
    pub fn rows(&self, sex: Sex) -> &[usize] {
        match sex {
            Sex::Female => &self.female_rows,
            Sex::Male => &self.male_rows,
        }
    }

    pub fn total(&self, sex: Sex) -> u64 {
        match sex {
            Sex::Female => self.total_female,
            Sex::Male => self.total_male,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.female_rows.is_empty() && self.male_rows.is_empty()
    }
}

/// Select all rows whose name is in `matched_names`, across all years.
pub fn filter(dataset: &Dataset, matched_names: BTreeSet<String>) -> QueryResult {
    let mut result = QueryResult::default();

    for (i, rec) in dataset.records().iter().enumerate() {
        if !matched_names.contains(&rec.name) {
            continue;
        }
        match rec.sex {
            Sex::Female => {
                result.female_rows.push(i);
                result.total_female += rec.n;
            }
            Sex::Male => {
                result.male_rows.push(i);
                result.total_male += rec.n;
            }
        }
    }

    result.matched_names = matched_names;
    result
}

/// Resolve and filter in one step.
pub fn run_query(
    dataset: &Dataset,
    names: &BTreeSet<String>,
    pattern: &str,
    mode: MatchMode,
) -> Result<QueryResult, QueryError> {
    let matched = resolve(pattern, mode, names)?;
    let result = filter(dataset, matched);
    log::debug!(
        "Query '{pattern}' ({mode}): {} names, {} female rows, {} male rows",
        result.matched_names.len(),
        result.female_rows.len(),
        result.male_rows.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::index::build_index;
    use crate::data::model::tests::sample_dataset;

    #[test]
    fn test_literal_keeps_unknown_name() {
        let ds = sample_dataset();
        let index = build_index(&ds);
        let matched = resolve("Zzqx", MatchMode::Literal, &index.names).unwrap();
        assert_eq!(matched, BTreeSet::from(["Zzqx".to_string()]));

        let result = filter(&ds, matched);
        assert!(result.female_rows.is_empty());
        assert!(result.male_rows.is_empty());
        assert_eq!(result.total_female + result.total_male, 0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_regex_is_prefix_anchored() {
        let index = build_index(&sample_dataset());
        let matched = resolve("All?[iy]son", MatchMode::Regex, &index.names).unwrap();
        let expected: BTreeSet<String> = ["Alison", "Alisonne", "Allison", "Allyson"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // Alisonne matches because only a prefix has to match.
        assert_eq!(matched, expected);

        // Not a substring search: "ary" does not match "Mary".
        assert!(resolve("ary", MatchMode::Regex, &index.names).unwrap().is_empty());
        // Explicit end anchor still works for a full match.
        let full = resolve("All?[iy]son$", MatchMode::Regex, &index.names).unwrap();
        assert!(!full.contains("Alisonne"));
    }

    #[test]
    fn test_alternation_stays_anchored() {
        let index = build_index(&sample_dataset());
        let matched = resolve("Jo|ary", MatchMode::Regex, &index.names).unwrap();
        assert_eq!(matched, BTreeSet::from(["John".to_string()]));
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let index = build_index(&sample_dataset());
        let err = resolve("Al(", MatchMode::Regex, &index.names).unwrap_err();
        assert!(matches!(err, QueryError::InvalidPattern { ref pattern, .. } if pattern == "Al("));

        // Balanced once wrapped, but invalid on its own.
        assert!(resolve("a)|(b", MatchMode::Regex, &index.names).is_err());

        // Look-around and backreferences are outside the supported syntax.
        assert!(resolve("Al(?=i)", MatchMode::Regex, &index.names).is_err());
        assert!(resolve(r"(a)\1", MatchMode::Regex, &index.names).is_err());

        // The same text is fine as a literal.
        assert!(resolve("Al(", MatchMode::Literal, &index.names).is_ok());
    }

    #[test]
    fn test_filter_splits_by_sex_and_sums_counts() {
        let ds = sample_dataset();
        let result = run_query(&ds, &build_index(&ds).names, "Mary", MatchMode::Literal).unwrap();
        assert_eq!(result.female_rows, vec![0, 6]);
        assert_eq!(result.male_rows, vec![5]);
        assert_eq!(result.total(Sex::Female), 7065 + 6919);
        assert_eq!(result.total(Sex::Male), 27);
    }
}
