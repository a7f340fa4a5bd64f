use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Sex – the two partitions of the dataset
// ---------------------------------------------------------------------------

/// Sex column of the name table, stored as `F` / `M` in the source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum Sex {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];

    /// Single-letter code used in the data files.
    pub fn code(self) -> &'static str {
        match self {
            Sex::Female => "F",
            Sex::Male => "M",
        }
    }

    /// Plural label used for tabs and fact headings.
    pub fn plural(self) -> &'static str {
        match self {
            Sex::Female => "Females",
            Sex::Male => "Males",
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "F" => Ok(Sex::Female),
            "M" => Ok(Sex::Male),
            other => Err(format!("unknown sex '{other}', expected 'F' or 'M'")),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// NameRecord – one row of the source table
// ---------------------------------------------------------------------------

/// Count of babies given `name` in `year`, for one sex.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NameRecord {
    pub year: i32,
    pub sex: Sex,
    pub name: String,
    /// Raw count.
    pub n: u64,
    /// Share of all births of this sex in this year, in `[0, 1]`.
    pub proportion: f64,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full name table in file order. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<NameRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<NameRecord>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[NameRecord] {
        &self.records
    }

    /// Resolve row indices (as produced by the query engine) to records.
    pub fn rows<'a>(&'a self, indices: &'a [usize]) -> Vec<&'a NameRecord> {
        indices.iter().map(|&i| &self.records[i]).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Shorthand used by the tests of every data module.
    pub(crate) fn rec(year: i32, sex: Sex, name: &str, n: u64, proportion: f64) -> NameRecord {
        NameRecord {
            year,
            sex,
            name: name.to_string(),
            n,
            proportion,
        }
    }

    /// Small table with two years, both sexes, and a tie on counts in 1881/F.
    pub(crate) fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            rec(1880, Sex::Female, "Mary", 7065, 0.0724),
            rec(1880, Sex::Female, "Anna", 2604, 0.0267),
            rec(1880, Sex::Female, "Alison", 10, 0.0001),
            rec(1880, Sex::Male, "John", 9655, 0.0815),
            rec(1880, Sex::Male, "William", 9532, 0.0805),
            rec(1880, Sex::Male, "Mary", 27, 0.0002),
            rec(1881, Sex::Female, "Mary", 6919, 0.0700),
            rec(1881, Sex::Female, "Anna", 6919, 0.0700),
            rec(1881, Sex::Female, "Allison", 12, 0.0001),
            rec(1881, Sex::Female, "Alisonne", 5, 0.00005),
            rec(1881, Sex::Male, "John", 8769, 0.0810),
            rec(1881, Sex::Male, "William", 8524, 0.0787),
            rec(1881, Sex::Male, "Allyson", 6, 0.00006),
        ])
    }

    #[test]
    fn test_sex_parse_and_display() {
        assert_eq!("F".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!(" M ".parse::<Sex>().unwrap(), Sex::Male);
        assert!("X".parse::<Sex>().is_err());
        assert_eq!(Sex::Female.to_string(), "F");
        assert_eq!(Sex::Male.plural(), "Males");
    }

    #[test]
    fn test_rows_resolves_indices() {
        let ds = sample_dataset();
        let rows = ds.rows(&[0, 3]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Mary");
        assert_eq!(rows[1].name, "John");
    }
}
