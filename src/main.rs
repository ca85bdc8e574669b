mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod pipeline;
mod report;
mod state;
mod stats;
mod ui;

use anyhow::{Result, anyhow};
use app::ReportViewerApp;
use clap::Parser;
use config::Config;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::parse();
    let report = pipeline::run(&config)?;
    print!("{}", report.render()?);

    if config.no_window {
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dataset Report",
        options,
        Box::new(move |_cc| Ok(Box::new(ReportViewerApp::new(config, report)))),
    )
    .map_err(|e| anyhow!("chart viewer failed: {e}"))
}
