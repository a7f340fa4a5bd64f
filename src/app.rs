use eframe::egui;

use crate::state::AppState;
use crate::ui::{facts, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct NameExplorerApp {
    pub state: AppState,
}

impl NameExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for NameExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and search ----
        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Right side panel: name facts ----
        egui::SidePanel::right("facts_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                facts::facts_panel(ui, &mut self.state);
            });

        // ---- Central panel: options, sex tabs and trend plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::options_panel(ui, &mut self.state);
            ui.separator();
            panels::sex_tabs(ui, &mut self.state);
            plot::trend_plot(ui, &mut self.state);
        });
    }
}
