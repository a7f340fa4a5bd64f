use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::sex_color;
use crate::data::filter::MatchMode;
use crate::data::model::Sex;
use crate::data::series::{AxisScope, PlotMode, Variable};
use crate::state::AppState;
use crate::ui::facts::format_count;

const ABOUT: &str = "The purpose of this app is to help answer the question \
\"How does name popularity change over time?\" Enter a name to explore in the search below. \
Regular expressions can also be used to check for alternative spellings: for example \
\"All?[iy]son\" includes \"Alison\", \"Allison\", \"Allyson\" and \"Alyson\". \
A regular expression only has to match the beginning of a name, so it also matches \
longer names such as \"Alisonne\"; end it with $ to require a full match. \
Look-around such as (?=...) and backreferences such as \\1 are not supported.";

// ---------------------------------------------------------------------------
// Top bar – title and search
// ---------------------------------------------------------------------------

/// Render the title, the search field and the regex toggle.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Name Explorer");
    egui::CollapsingHeader::new("About")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(ABOUT);
            ui.label("• Aggregated or separate plotting lines when several names match");
            ui.label("• Plotting by proportion (within a year and sex) or raw count");
            ui.label("• Local or global y-axis scaling");
            ui.label("• Name facts and counts, with separate tabs for females and males");
        });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Enter a name to search");
        ui.text_edit_singleline(&mut state.selections.pattern);

        let mut is_regex = state.selections.mode == MatchMode::Regex;
        if ui
            .checkbox(&mut is_regex, "Search is a regular expression")
            .changed()
        {
            state.selections.mode = if is_regex {
                MatchMode::Regex
            } else {
                MatchMode::Literal
            };
        }
    });

    if let Err(e) = state.view() {
        ui.label(RichText::new(e.to_string()).color(Color32::RED));
    }
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Plotting options and search results
// ---------------------------------------------------------------------------

fn plot_mode_caption(mode: PlotMode) -> &'static str {
    match mode {
        PlotMode::Aggregated => "(One line)",
        PlotMode::Separated => "(Multiple lines)",
    }
}

/// Collapsible block with the plotting radios on the left and the matched
/// names and per-sex totals on the right.
pub fn options_panel(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new("Plotting options and search results")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols: &mut [Ui]| {
                plot_options(&mut cols[0], state);
                search_results(&mut cols[1], state);
            });
        });
}

fn plot_options(ui: &mut Ui, state: &mut AppState) {
    let sel = &mut state.selections;

    ui.strong("Plotting Options");
    ui.label("If multiple names matched the search, how should they be plotted?");
    ui.horizontal(|ui: &mut Ui| {
        for mode in PlotMode::ALL {
            ui.radio_value(&mut sel.plot_mode, mode, format!("{mode} {}", plot_mode_caption(mode)))
                .on_hover_text("\"Separated\" is not recommended if many names were returned in the search");
        }
    });

    ui.label("Variable to plot");
    ui.horizontal(|ui: &mut Ui| {
        for variable in Variable::ALL {
            ui.radio_value(&mut sel.variable, variable, variable.to_string());
        }
    });

    ui.label("How should the y-axis be scaled?");
    ui.horizontal(|ui: &mut Ui| {
        for scope in AxisScope::ALL {
            ui.radio_value(&mut sel.axis_scope, scope, scope.to_string())
                .on_hover_text(
                    "\"Global\" scaling uses the same scale for all plots, regardless of name or sex. \
                     \"Local\" scaling is specific to the name(s) and sex in the plot",
                );
        }
    });
}

fn search_results(ui: &mut Ui, state: &mut AppState) {
    let Ok(view) = state.view() else {
        return;
    };

    ui.strong("Names matching search");
    let names: Vec<&str> = view.matched_names.iter().map(String::as_str).collect();
    ui.label(names.join(", "));
    ui.separator();

    ui.strong("Total sample size of names matching search");
    for sex in Sex::ALL {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new(format!("{} counts:", sex.plural())).color(sex_color(sex)));
            ui.label(format_count(view.panel(sex).total_count));
        });
    }
}

// ---------------------------------------------------------------------------
// Sex tabs
// ---------------------------------------------------------------------------

pub fn sex_tabs(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for sex in Sex::ALL {
            ui.selectable_value(
                &mut state.active_tab,
                sex,
                RichText::new(sex.plural()).color(sex_color(sex)),
            );
        }
    });
}
