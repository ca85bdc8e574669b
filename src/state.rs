use std::path::Path;

use anyhow::Result;

use crate::color::ColorMap;
use crate::config::Config;
use crate::data::filter::{FilterState, filtered_indices, init_filter_state};
use crate::data::loader::load_file;
use crate::data::model::{CellValue, DataSource};
use crate::pipeline::{Report, analyze};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chart(usize),
    Summary,
}

/// The full viewer state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// The report currently on screen.
    pub report: Report,

    pub view: View,

    /// Selected categories.
    pub filters: FilterState,

    /// Rows whose category passes the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Active colour map for the category column.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config, report: Report) -> Self {
        let mut state = AppState {
            config,
            filters: FilterState::new(),
            visible_indices: Vec::new(),
            color_map: ColorMap::new(std::iter::empty()),
            view: View::Chart(0),
            status_message: None,
            report,
        };
        state.reset_view();
        state
    }

    /// Ingest a new report, initialise filters and colours.
    pub fn set_report(&mut self, report: Report) {
        self.report = report;
        self.reset_view();
        self.status_message = None;
    }

    fn reset_view(&mut self) {
        let category = &self.config.category;
        self.filters = init_filter_state(&self.report.dataset, category);
        self.color_map = ColorMap::new(
            self.report
                .dataset
                .column(category)
                .map(|c| c.values.iter().filter(|v| !v.is_null()))
                .into_iter()
                .flatten(),
        );
        self.view = View::Chart(0);
        self.refilter();
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        self.visible_indices =
            filtered_indices(&self.report.dataset, &self.config.category, &self.filters);
    }

    /// Toggle a single category in the filter.
    pub fn toggle_filter_value(&mut self, value: &CellValue) {
        if !self.filters.remove(value) {
            self.filters.insert(value.clone());
        }
        self.refilter();
    }

    pub fn select_all(&mut self) {
        self.filters = init_filter_state(&self.report.dataset, &self.config.category);
        self.refilter();
    }

    pub fn select_none(&mut self) {
        self.filters.clear();
        self.refilter();
    }

    /// Run the whole pipeline on another file. On failure the current report
    /// stays and the error is kept for the status line.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let dataset = load_file(path)?;
        let report = analyze(dataset, DataSource::File(path.to_path_buf()), &self.config)?;
        match report.render() {
            Ok(text) => print!("{text}"),
            Err(e) => log::warn!("Could not render console report: {e:#}"),
        }
        self.set_report(report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::pipeline::run;

    fn reference_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.path = dir.path().join("absent.csv");
        let report = run(&config).unwrap();
        (dir, AppState::new(config, report))
    }

    #[test]
    fn starts_with_everything_visible() {
        let (_dir, state) = reference_state();
        assert_eq!(state.filters.len(), 3);
        assert_eq!(state.visible_indices.len(), 150);
        assert_eq!(state.view, View::Chart(0));
    }

    #[test]
    fn toggling_a_species_hides_its_rows() {
        let (_dir, mut state) = reference_state();
        let setosa = CellValue::Text("setosa".into());
        state.toggle_filter_value(&setosa);
        assert_eq!(state.visible_indices.len(), 100);
        state.toggle_filter_value(&setosa);
        assert_eq!(state.visible_indices.len(), 150);

        state.select_none();
        assert!(state.visible_indices.is_empty());
        state.select_all();
        assert_eq!(state.visible_indices.len(), 150);
    }

    #[test]
    fn failed_open_keeps_current_report() {
        let (dir, mut state) = reference_state();
        let path = dir.path().join("broken.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "a,b,c\n1,2,3,4\n").unwrap();

        assert!(state.open(&path).is_err());
        assert_eq!(state.report.dataset.n_rows(), 150);
    }

    #[test]
    fn open_replaces_report() {
        let (dir, mut state) = reference_state();
        let path = dir.path().join("plain.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "a,b,c\n1,2,3\n4,5,6\n").unwrap();

        state.open(&path).unwrap();
        assert_eq!(state.report.dataset.n_rows(), 2);
        assert_eq!(state.report.charts.len(), 2);
        assert_eq!(state.visible_indices, vec![0, 1]);
    }
}
