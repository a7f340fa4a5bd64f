use eframe::egui::{RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};

use crate::color::{sex_color, ColorMap};
use crate::data::series::{AxisRange, PlotMode, Series};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Trend plot (central panel)
// ---------------------------------------------------------------------------

/// Smallest and largest year over all series, widened by one year on each
/// side when there is only a single year to show.
pub fn year_span(series: &[Series]) -> Option<(f64, f64)> {
    let years = series.iter().flat_map(|s| s.points.iter().map(|&(y, _)| y));
    let (min, max) = years.fold(None, |acc: Option<(i32, i32)>, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    })?;
    if min == max {
        Some((min as f64 - 1.0, max as f64 + 1.0))
    } else {
        Some((min as f64, max as f64))
    }
}

/// Render the trend chart for the active sex tab.
pub fn trend_plot(ui: &mut Ui, state: &mut AppState) {
    let sex = state.active_tab;
    let plot_mode = state.selections.plot_mode;
    let variable = state.selections.variable;

    let Ok(view) = state.view() else {
        ui.label("Fix the search pattern to see trends.");
        return;
    };
    let panel = view.panel(sex);

    ui.heading(RichText::new(sex.plural()).color(sex_color(sex)));
    ui.label(
        RichText::new(format!("Trend of {}: {}", view.header_word, view.pattern))
            .color(sex_color(sex))
            .italics(),
    );

    let Some(series) = &panel.series else {
        ui.label("No names returned");
        return;
    };

    let colors = ColorMap::new(series.iter().map(|s| s.label.as_str()), sex);
    let mut plot = Plot::new(("trend_plot", sex))
        .x_axis_label("Year")
        .y_axis_label(variable.to_string())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if plot_mode == PlotMode::Separated {
        plot = plot.legend(Legend::default());
    }

    let bounds = match (panel.axis, year_span(series)) {
        (AxisRange::Fixed { min, max }, Some((x_min, x_max))) => {
            Some(PlotBounds::from_min_max([x_min, min], [x_max, max]))
        }
        _ => None,
    };

    plot.show(ui, |plot_ui| {
        for s in series {
            let color = match plot_mode {
                PlotMode::Aggregated => sex_color(sex),
                PlotMode::Separated => colors.color_for(&s.label),
            };
            let points: PlotPoints = s
                .points
                .iter()
                .map(|&(year, value)| [year as f64, value])
                .collect();

            plot_ui.line(Line::new(points).name(&s.label).color(color).width(1.5));
        }
        if let Some(bounds) = bounds {
            plot_ui.set_plot_bounds(bounds);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: Vec<(i32, f64)>) -> Series {
        Series {
            label: "x".to_string(),
            points,
        }
    }

    #[test]
    fn test_year_span() {
        assert_eq!(year_span(&[]), None);
        assert_eq!(
            year_span(&[series(vec![(1900, 1.0), (1950, 2.0)]), series(vec![(1880, 3.0)])]),
            Some((1880.0, 1950.0))
        );
        assert_eq!(year_span(&[series(vec![(2000, 1.0)])]), Some((1999.0, 2001.0)));
    }
}
