use eframe::egui;

use crate::config::Config;
use crate::pipeline::Report;
use crate::state::{AppState, View};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ReportViewerApp {
    pub state: AppState,
}

impl ReportViewerApp {
    pub fn new(config: Config, report: Report) -> Self {
        Self {
            state: AppState::new(config, report),
        }
    }
}

impl eframe::App for ReportViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and chart tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: categories ----
        egui::SidePanel::left("category_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart or summary ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Chart(index) => plot::chart_plot(ui, &self.state, index),
            View::Summary => panels::summary_view(ui, &self.state),
        });
    }
}
