use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dataset, NameRecord, Sex};

// ---------------------------------------------------------------------------
// MostPopularIndex – top name per (year, sex)
// ---------------------------------------------------------------------------

/// For every `(year, sex)` present in the dataset, the record with the
/// highest count. Ties go to the lexicographically smallest name so the
/// result does not depend on file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MostPopularIndex {
    entries: BTreeMap<(i32, Sex), NameRecord>,
}

impl MostPopularIndex {
    #[cfg(test)]
    pub fn get(&self, year: i32, sex: Sex) -> Option<&NameRecord> {
        self.entries.get(&(year, sex))
    }

    /// Ascending years in which `name` was the most popular name for `sex`.
    pub fn years_for(&self, name: &str, sex: Sex) -> Vec<i32> {
        self.entries
            .iter()
            .filter(|((_, s), rec)| *s == sex && rec.name == name)
            .map(|((year, _), _)| *year)
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// GlobalExtrema
// ---------------------------------------------------------------------------

/// Dataset-wide maxima used as fixed upper bounds for global y-axis scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlobalExtrema {
    pub max_count: u64,
    pub max_proportion: f64,
}

// ---------------------------------------------------------------------------
// NameIndex – everything derived once from the dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameIndex {
    pub most_popular: MostPopularIndex,
    pub extrema: GlobalExtrema,
    /// Number of distinct years in the dataset ("out of N years").
    pub year_count: usize,
    /// Every distinct name, sorted.
    pub names: BTreeSet<String>,
}

/// Build all derived structures in a single pass over the dataset.
pub fn build_index(dataset: &Dataset) -> NameIndex {
    let mut entries: BTreeMap<(i32, Sex), NameRecord> = BTreeMap::new();
    let mut extrema = GlobalExtrema::default();
    let mut years = BTreeSet::new();
    let mut names = BTreeSet::new();

    for rec in dataset.records() {
        extrema.max_count = extrema.max_count.max(rec.n);
        extrema.max_proportion = extrema.max_proportion.max(rec.proportion);
        years.insert(rec.year);
        if !names.contains(&rec.name) {
            names.insert(rec.name.clone());
        }

        entries
            .entry((rec.year, rec.sex))
            .and_modify(|best| {
                if rec.n > best.n || (rec.n == best.n && rec.name < best.name) {
                    *best = rec.clone();
                }
            })
            .or_insert_with(|| rec.clone());
    }

    let index = NameIndex {
        most_popular: MostPopularIndex { entries },
        extrema,
        year_count: years.len(),
        names,
    };
    log::info!(
        "Indexed {} distinct names over {} years, {} year/sex groups (max count {}, max proportion {:.4})",
        index.names.len(),
        index.year_count,
        index.most_popular.entries.len(),
        index.extrema.max_count,
        index.extrema.max_proportion
    );
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{rec, sample_dataset};

    #[test]
    fn test_most_popular_is_partition_maximum() {
        let ds = sample_dataset();
        let index = build_index(&ds);

        // One entry per (year, sex) pair.
        assert_eq!(index.most_popular.len(), 4);

        for ((year, sex), best) in &index.most_popular.entries {
            let max = ds
                .records()
                .iter()
                .filter(|r| r.year == *year && r.sex == *sex)
                .map(|r| r.n)
                .max()
                .unwrap();
            assert_eq!(best.n, max);
        }
        assert_eq!(index.most_popular.get(1880, Sex::Male).unwrap().name, "John");
        assert!(index.most_popular.get(1900, Sex::Male).is_none());
    }

    #[test]
    fn test_tie_break_is_lexicographic() {
        // Mary is listed first but Anna has the same count in 1881/F.
        let index = build_index(&sample_dataset());
        assert_eq!(index.most_popular.get(1881, Sex::Female).unwrap().name, "Anna");

        let reversed = Dataset::from_records(vec![
            rec(1881, Sex::Female, "Anna", 6919, 0.07),
            rec(1881, Sex::Female, "Mary", 6919, 0.07),
        ]);
        assert_eq!(
            build_index(&reversed).most_popular.get(1881, Sex::Female).unwrap().name,
            "Anna"
        );
    }

    #[test]
    fn test_global_extrema_and_counts() {
        let ds = sample_dataset();
        let index = build_index(&ds);
        assert_eq!(index.extrema.max_count, 9655);
        assert_eq!(index.extrema.max_proportion, 0.0815);
        assert_eq!(index.year_count, 2);
        assert!(index.names.contains("Alisonne"));
        assert_eq!(index.names.len(), 8);
    }

    #[test]
    fn test_years_for_name() {
        let index = build_index(&sample_dataset());
        assert_eq!(index.most_popular.years_for("John", Sex::Male), vec![1880, 1881]);
        assert_eq!(index.most_popular.years_for("Mary", Sex::Female), vec![1880]);
        assert!(index.most_popular.years_for("Mary", Sex::Male).is_empty());
    }

    #[test]
    fn test_empty_dataset() {
        let index = build_index(&Dataset::from_records(Vec::new()));
        assert!(index.most_popular.is_empty());
        assert_eq!(index.extrema, GlobalExtrema::default());
        assert_eq!(index.year_count, 0);
    }
}
