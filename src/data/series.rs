use std::collections::BTreeMap;
use std::fmt;

use super::index::GlobalExtrema;
use super::model::NameRecord;

// ---------------------------------------------------------------------------
// Plotting options
// ---------------------------------------------------------------------------

/// How multiple matched names are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlotMode {
    /// One line: all names summed per year.
    #[default]
    Aggregated,
    /// One line per name. Gets unreadable for large match sets.
    Separated,
}

/// Which column goes on the y-axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Variable {
    #[default]
    Count,
    Proportion,
}

/// Whether the y-axis fits the data shown or the whole dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AxisScope {
    #[default]
    Local,
    Global,
}

impl PlotMode {
    pub const ALL: [PlotMode; 2] = [PlotMode::Aggregated, PlotMode::Separated];
}

impl Variable {
    pub const ALL: [Variable; 2] = [Variable::Count, Variable::Proportion];

    pub fn value(self, rec: &NameRecord) -> f64 {
        match self {
            Variable::Count => rec.n as f64,
            Variable::Proportion => rec.proportion,
        }
    }
}

impl AxisScope {
    pub const ALL: [AxisScope; 2] = [AxisScope::Local, AxisScope::Global];
}

impl fmt::Display for PlotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlotMode::Aggregated => "Aggregated",
            PlotMode::Separated => "Separated",
        })
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variable::Count => "Count",
            Variable::Proportion => "Proportion",
        })
    }
}

impl fmt::Display for AxisScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AxisScope::Local => "Local",
            AxisScope::Global => "Global",
        })
    }
}

// ---------------------------------------------------------------------------
// Series construction
// ---------------------------------------------------------------------------

/// Label of the single line drawn in aggregated mode.
pub const AGGREGATED_LABEL: &str = "All matches";

/// One plot line: `(year, value)` points in ascending year order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(i32, f64)>,
}

/// Turn one sex's rows into plot lines.
///
/// Returns an empty vector when `rows` is empty; callers show a
/// "no results" message instead of an empty chart.
pub fn build_series(rows: &[&NameRecord], mode: PlotMode, variable: Variable) -> Vec<Series> {
    if rows.is_empty() {
        return Vec::new();
    }

    match mode {
        PlotMode::Aggregated => {
            let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
            for rec in rows {
                *by_year.entry(rec.year).or_default() += variable.value(rec);
            }
            vec![Series {
                label: AGGREGATED_LABEL.to_string(),
                points: by_year.into_iter().collect(),
            }]
        }
        PlotMode::Separated => {
            let mut by_name: BTreeMap<&str, BTreeMap<i32, f64>> = BTreeMap::new();
            for rec in rows {
                *by_name
                    .entry(rec.name.as_str())
                    .or_default()
                    .entry(rec.year)
                    .or_default() += variable.value(rec);
            }
            by_name
                .into_iter()
                .map(|(name, points)| Series {
                    label: name.to_string(),
                    points: points.into_iter().collect(),
                })
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// Axis scaling
// ---------------------------------------------------------------------------

/// Y-axis range for a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisRange {
    /// Let the plot fit its own data.
    Auto,
    Fixed { min: f64, max: f64 },
}

/// Global scope pins the range to `[0, dataset max]` for the plotted
/// variable, so female and male charts share the same scale.
pub fn scale_axis(scope: AxisScope, variable: Variable, extrema: &GlobalExtrema) -> AxisRange {
    match scope {
        AxisScope::Local => AxisRange::Auto,
        AxisScope::Global => AxisRange::Fixed {
            min: 0.0,
            max: match variable {
                Variable::Count => extrema.max_count as f64,
                Variable::Proportion => extrema.max_proportion,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::index::build_index;
    use crate::data::model::tests::{rec, sample_dataset};
    use crate::data::model::Sex;

    #[test]
    fn test_aggregated_sums_names_per_year() {
        let records = vec![
            rec(1881, Sex::Female, "Allison", 12, 0.0001),
            rec(1880, Sex::Female, "Alison", 10, 0.0001),
            rec(1881, Sex::Female, "Alisonne", 5, 0.00005),
        ];
        let rows: Vec<&NameRecord> = records.iter().collect();

        let series = build_series(&rows, PlotMode::Aggregated, Variable::Count);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].points, vec![(1880, 10.0), (1881, 17.0)]);

        let props = build_series(&rows, PlotMode::Aggregated, Variable::Proportion);
        assert!((props[0].points[1].1 - 0.00015).abs() < 1e-12);
    }

    #[test]
    fn test_separated_yields_one_series_per_name() {
        let records = vec![
            rec(1880, Sex::Male, "William", 9532, 0.0805),
            rec(1880, Sex::Male, "John", 9655, 0.0815),
            rec(1881, Sex::Male, "John", 8769, 0.0810),
        ];
        let rows: Vec<&NameRecord> = records.iter().collect();
        let series = build_series(&rows, PlotMode::Separated, Variable::Count);

        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["John", "William"]);
        assert_eq!(series[0].points, vec![(1880, 9655.0), (1881, 8769.0)]);
    }

    #[test]
    fn test_single_name_modes_agree() {
        let ds = sample_dataset();
        let rows: Vec<&NameRecord> = ds
            .records()
            .iter()
            .filter(|r| r.name == "John")
            .collect();
        for variable in Variable::ALL {
            let agg = build_series(&rows, PlotMode::Aggregated, variable);
            let sep = build_series(&rows, PlotMode::Separated, variable);
            assert_eq!(agg[0].points, sep[0].points);
        }
    }

    #[test]
    fn test_empty_rows_produce_no_series() {
        assert!(build_series(&[], PlotMode::Aggregated, Variable::Count).is_empty());
        assert!(build_series(&[], PlotMode::Separated, Variable::Proportion).is_empty());
    }

    #[test]
    fn test_scale_axis() {
        let index = build_index(&sample_dataset());
        assert_eq!(
            scale_axis(AxisScope::Local, Variable::Count, &index.extrema),
            AxisRange::Auto
        );
        assert_eq!(
            scale_axis(AxisScope::Global, Variable::Count, &index.extrema),
            AxisRange::Fixed { min: 0.0, max: 9655.0 }
        );
        assert_eq!(
            scale_axis(AxisScope::Global, Variable::Proportion, &index.extrema),
            AxisRange::Fixed { min: 0.0, max: 0.0815 }
        );
    }
}
