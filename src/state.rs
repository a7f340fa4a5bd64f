use std::collections::BTreeSet;

use crate::data::facts::{build_fact_panel, FactEntry};
use crate::data::filter::{run_query, MatchMode, QueryError, QueryResult};
use crate::data::index::NameIndex;
use crate::data::model::{Dataset, Sex};
use crate::data::series::{
    build_series, scale_axis, AxisRange, AxisScope, PlotMode, Series, Variable,
};

// ---------------------------------------------------------------------------
// User selections
// ---------------------------------------------------------------------------

/// Everything the user can change. Any change invalidates the cached view.
#[derive(Debug, Clone, PartialEq)]
pub struct Selections {
    pub pattern: String,
    pub mode: MatchMode,
    pub plot_mode: PlotMode,
    pub variable: Variable,
    pub axis_scope: AxisScope,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            pattern: "John".to_string(),
            mode: MatchMode::Literal,
            plot_mode: PlotMode::Aggregated,
            variable: Variable::Count,
            axis_scope: AxisScope::Local,
        }
    }
}

// ---------------------------------------------------------------------------
// Render-ready view of one interaction
// ---------------------------------------------------------------------------

/// Chart content for one sex.
#[derive(Debug, Clone, PartialEq)]
pub struct SexPanel {
    /// `None` when no rows matched for this sex.
    pub series: Option<Vec<Series>>,
    pub axis: AxisRange,
    pub total_count: u64,
}

/// Everything the UI draws for the current selections.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerView {
    pub header_word: &'static str,
    pub pattern: String,
    pub matched_names: BTreeSet<String>,
    pub female: SexPanel,
    pub male: SexPanel,
    pub facts: Vec<FactEntry>,
    pub year_count: usize,
}

impl ExplorerView {
    pub fn panel(&self, sex: Sex) -> &SexPanel {
        match sex {
            Sex::Female => &self.female,
            Sex::Male => &self.male,
        }
    }
}

/// Build the full view from a query result. Pure function of its inputs.
pub fn build_view(
    dataset: &Dataset,
    index: &NameIndex,
    selections: &Selections,
    result: &QueryResult,
) -> ExplorerView {
    let female_rows = dataset.rows(result.rows(Sex::Female));
    let male_rows = dataset.rows(result.rows(Sex::Male));
    let axis = scale_axis(selections.axis_scope, selections.variable, &index.extrema);

    let panel = |sex: Sex| {
        let rows = match sex {
            Sex::Female => &female_rows,
            Sex::Male => &male_rows,
        };
        SexPanel {
            series: (!rows.is_empty())
                .then(|| build_series(rows, selections.plot_mode, selections.variable)),
            axis,
            total_count: result.total(sex),
        }
    };

    ExplorerView {
        header_word: selections.mode.header_word(),
        pattern: selections.pattern.clone(),
        matched_names: result.matched_names.clone(),
        female: panel(Sex::Female),
        male: panel(Sex::Male),
        facts: build_fact_panel(&female_rows, &male_rows, index),
        year_count: index.year_count,
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

type QueryKey = (String, MatchMode);

fn compute_view(
    dataset: &Dataset,
    index: &NameIndex,
    selections: &Selections,
    query: &Result<QueryResult, QueryError>,
) -> Result<ExplorerView, QueryError> {
    match query {
        Ok(result) => Ok(build_view(dataset, index, selections, result)),
        Err(e) => Err(e.clone()),
    }
}

fn query_for(dataset: &Dataset, index: &NameIndex, key: &QueryKey) -> Result<QueryResult, QueryError> {
    let result = run_query(dataset, &index.names, &key.0, key.1);
    if let Err(e) = &result {
        log::warn!("{e}");
    }
    result
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, read-only afterwards.
    pub dataset: Dataset,
    pub index: NameIndex,

    /// Current control values.
    pub selections: Selections,

    /// Which sex tab is shown in the central panel.
    pub active_tab: Sex,

    /// Last query, keyed by pattern and match mode.
    query_cache: (QueryKey, Result<QueryResult, QueryError>),

    /// Last view, keyed by the full selections.
    view_cache: (Selections, Result<ExplorerView, QueryError>),
}

impl AppState {
    pub fn new(dataset: Dataset, index: NameIndex, selections: Selections) -> Self {
        let key = (selections.pattern.clone(), selections.mode);
        let query = query_for(&dataset, &index, &key);
        let view = compute_view(&dataset, &index, &selections, &query);
        Self {
            dataset,
            index,
            active_tab: Sex::Female,
            query_cache: (key, query),
            view_cache: (selections.clone(), view),
            selections,
        }
    }

    /// View for the current selections, or the pattern error to show instead.
    /// The query is only re-run when the pattern or match mode changed.
    pub fn view(&mut self) -> Result<&ExplorerView, &QueryError> {
        if self.view_cache.0 != self.selections {
            let key = (self.selections.pattern.clone(), self.selections.mode);
            if self.query_cache.0 != key {
                let query = query_for(&self.dataset, &self.index, &key);
                self.query_cache = (key, query);
            }
            let view = compute_view(&self.dataset, &self.index, &self.selections, &self.query_cache.1);
            self.view_cache = (self.selections.clone(), view);
        }
        self.view_cache.1.as_ref()
    }

    /// Pattern and mode of the cached query.
    #[cfg(test)]
    fn query_key(&self) -> &QueryKey {
        &self.query_cache.0
    }
}
