use eframe::egui::{RichText, ScrollArea, Ui};

use crate::color::sex_color;
use crate::data::facts::NameFact;
use crate::data::model::Sex;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `1234567` → `"1,234,567"`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// First year, or a dash when the name never occurs for this sex.
pub fn format_first_year(year: Option<i32>) -> String {
    year.map_or_else(|| "-".to_string(), |y| y.to_string())
}

/// Comma-separated years, or `None` when the list is empty.
pub fn format_years(years: &[i32]) -> String {
    if years.is_empty() {
        return "None".to_string();
    }
    years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The four fact lines shown under each sex.
pub fn fact_lines(fact: &NameFact) -> [String; 4] {
    [
        format!("First year in data: {}", format_first_year(fact.first_year)),
        format!(
            "Total years in data: {} (out of {})",
            fact.years_present, fact.years_total
        ),
        format!("Total count: {}", format_count(fact.total_count)),
        format!(
            "Year(s) most popular name: {}",
            format_years(&fact.most_popular_years)
        ),
    ]
}

// ---------------------------------------------------------------------------
// Right side panel – name facts
// ---------------------------------------------------------------------------

pub fn facts_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Name Facts");
    ui.label(
        "For multiple names, order is determined by overall popularity \
         and only the top five names are shown",
    );
    ui.separator();

    let Ok(view) = state.view() else {
        ui.label("No names returned");
        return;
    };
    if view.facts.is_empty() {
        ui.label("No names returned");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for entry in &view.facts {
                ui.label(RichText::new(format!("NAME: {}", entry.name.to_uppercase())).strong());
                for sex in Sex::ALL {
                    ui.label(RichText::new(format!("{}:", sex.plural())).color(sex_color(sex)));
                    ui.indent((entry.name.as_str(), sex), |ui: &mut Ui| {
                        for line in fact_lines(entry.fact(sex)) {
                            ui.label(format!("• {line}"));
                        }
                    });
                }
                ui.separator();
            }
        });
}
