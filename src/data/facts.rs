use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use super::index::{MostPopularIndex, NameIndex};
use super::model::{NameRecord, Sex};

/// Number of names shown in the fact panel.
pub const TOP_NAMES: usize = 5;

/// Summary of one name for one sex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFact {
    /// `None` when the name never occurs for this sex.
    pub first_year: Option<i32>,
    pub years_present: usize,
    /// Distinct years in the whole dataset, for "out of N".
    pub years_total: usize,
    pub total_count: u64,
    /// Ascending years in which this was the top name for the sex.
    pub most_popular_years: Vec<i32>,
}

/// Both sexes' facts for one of the top names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactEntry {
    pub name: String,
    pub female: NameFact,
    pub male: NameFact,
}

impl FactEntry {
    pub fn fact(&self, sex: Sex) -> &NameFact {
        match sex {
            Sex::Female => &self.female,
            Sex::Male => &self.male,
        }
    }
}

/// Names ranked by combined count over both sexes, highest first.
/// Equal totals are ordered by name.
pub fn top_names(female_rows: &[&NameRecord], male_rows: &[&NameRecord], limit: usize) -> Vec<String> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for rec in female_rows.iter().chain(male_rows) {
        *totals.entry(rec.name.as_str()).or_default() += rec.n;
    }

    let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
    // Stable sort over name-ordered input keeps ties alphabetical.
    ranked.sort_by_key(|&(_, total)| Reverse(total));
    ranked
        .into_iter()
        .take(limit)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Facts for `name` drawn from `sex_rows`, which hold only rows of `sex`.
pub fn build_fact(
    name: &str,
    sex: Sex,
    sex_rows: &[&NameRecord],
    most_popular: &MostPopularIndex,
    year_count: usize,
) -> NameFact {
    let mut years = BTreeSet::new();
    let mut total_count = 0;
    for rec in sex_rows.iter().filter(|r| r.name == name) {
        years.insert(rec.year);
        total_count += rec.n;
    }

    NameFact {
        first_year: years.first().copied(),
        years_present: years.len(),
        years_total: year_count,
        total_count,
        most_popular_years: most_popular.years_for(name, sex),
    }
}

/// Fact entries for the top names of a query. Empty when nothing matched.
pub fn build_fact_panel(
    female_rows: &[&NameRecord],
    male_rows: &[&NameRecord],
    index: &NameIndex,
) -> Vec<FactEntry> {
    top_names(female_rows, male_rows, TOP_NAMES)
        .into_iter()
        .map(|name| FactEntry {
            female: build_fact(&name, Sex::Female, female_rows, &index.most_popular, index.year_count),
            male: build_fact(&name, Sex::Male, male_rows, &index.most_popular, index.year_count),
            name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::index::build_index;
    use crate::data::model::tests::{rec, sample_dataset};
    use crate::data::model::Dataset;

    fn split<'a>(ds: &'a Dataset, keep: &[&str]) -> (Vec<&'a NameRecord>, Vec<&'a NameRecord>) {
        ds.records()
            .iter()
            .filter(|r| keep.contains(&r.name.as_str()))
            .partition(|r| r.sex == Sex::Female)
    }

    #[test]
    fn test_top_names_ranked_by_combined_total() {
        let ds = sample_dataset();
        let (f, m) = split(&ds, &["Mary", "John", "William", "Anna", "Alison", "Allison"]);
        let top = top_names(&f, &m, TOP_NAMES);
        // John 18424, William 18056, Mary 14011, Anna 9523, Allison 12, Alison 10
        assert_eq!(top, vec!["John", "William", "Mary", "Anna", "Allison"]);
    }

    #[test]
    fn test_top_names_ties_and_limits() {
        let records = vec![
            rec(1900, Sex::Female, "Zoe", 10, 0.1),
            rec(1900, Sex::Female, "Amy", 10, 0.1),
            rec(1900, Sex::Male, "Bob", 3, 0.1),
        ];
        let f: Vec<&NameRecord> = records.iter().filter(|r| r.sex == Sex::Female).collect();
        let m: Vec<&NameRecord> = records.iter().filter(|r| r.sex == Sex::Male).collect();
        assert_eq!(top_names(&f, &m, 5), vec!["Amy", "Zoe", "Bob"]);
        assert_eq!(top_names(&f, &m, 1), vec!["Amy"]);
        assert!(top_names(&[], &[], 5).is_empty());
    }

    #[test]
    fn test_build_fact_for_present_name() {
        let ds = sample_dataset();
        let index = build_index(&ds);
        let (_, m) = split(&ds, &["John"]);
        let fact = build_fact("John", Sex::Male, &m, &index.most_popular, index.year_count);
        assert_eq!(
            fact,
            NameFact {
                first_year: Some(1880),
                years_present: 2,
                years_total: 2,
                total_count: 9655 + 8769,
                most_popular_years: vec![1880, 1881],
            }
        );
    }

    #[test]
    fn test_build_fact_for_absent_name() {
        let ds = sample_dataset();
        let index = build_index(&ds);
        let (f, _) = split(&ds, &["John"]);
        let fact = build_fact("John", Sex::Female, &f, &index.most_popular, index.year_count);
        assert_eq!(fact.first_year, None);
        assert_eq!(fact.years_present, 0);
        assert_eq!(fact.total_count, 0);
        assert!(fact.most_popular_years.is_empty());
    }

    #[test]
    fn test_fact_panel() {
        let ds = sample_dataset();
        let index = build_index(&ds);
        let (f, m) = split(&ds, &["Mary"]);
        let panel = build_fact_panel(&f, &m, &index);
        assert_eq!(panel.len(), 1);
        let entry = &panel[0];
        assert_eq!(entry.name, "Mary");
        assert_eq!(entry.fact(Sex::Female).most_popular_years, vec![1880]);
        assert_eq!(entry.fact(Sex::Male).total_count, 27);
        assert!(entry.fact(Sex::Male).most_popular_years.is_empty());

        assert!(build_fact_panel(&[], &[], &index).is_empty());
    }
}
