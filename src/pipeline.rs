use std::fmt::Write as _;

use anyhow::{Context, Result};

use crate::chart::{Chart, build_charts};
use crate::config::Config;
use crate::data::clean::{Imputation, fill_missing_with_mean, missing_counts};
use crate::data::loader::load_or_reference;
use crate::data::model::{DataSource, Dataset};
use crate::report;
use crate::stats::{Describe, GroupMeans};

/// Everything one pass of Load → Clean → Summarize → Visualize produces.
#[derive(Debug, Clone)]
pub struct Report {
    pub source: DataSource,
    /// The cleaned table.
    pub dataset: Dataset,
    /// Missing cells per column, counted before cleaning.
    pub missing: Vec<(String, usize)>,
    pub imputations: Vec<Imputation>,
    pub describe: Describe,
    /// Present only when the category column exists.
    pub groups: Option<GroupMeans>,
    pub charts: Vec<Chart>,
    pub category: String,
    preview_rows: usize,
    preview: String,
    info: String,
}

/// Load the configured table (or the bundled fallback) and run the pipeline.
pub fn run(config: &Config) -> Result<Report> {
    let (dataset, source) = load_or_reference(&config.path)?;
    analyze(dataset, source, config)
}

/// Clean, summarise and chart an already loaded table.
pub fn analyze(mut dataset: Dataset, source: DataSource, config: &Config) -> Result<Report> {
    // Preview and schema describe the table as loaded.
    let preview_rows = dataset.n_rows().min(config.head);
    let preview = report::format_head(&dataset, config.head)?;
    let info = report::format_info(&dataset, &source)?;
    let missing = missing_counts(&dataset);

    let imputations = fill_missing_with_mean(&mut dataset);

    let describe = Describe::compute(&dataset);
    let groups = GroupMeans::compute(&dataset, &config.category);
    if groups.is_none() {
        log::info!(
            "No '{}' column; skipping grouped means, bar and scatter charts",
            config.category
        );
    }

    let charts = build_charts(&dataset, &config.category, config.bins)
        .with_context(|| format!("building charts for {source}"))?;

    Ok(Report {
        source,
        dataset,
        missing,
        imputations,
        describe,
        groups,
        charts,
        category: config.category.clone(),
        preview_rows,
        preview,
        info,
    })
}

impl Report {
    /// The console report, section by section.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        match &self.source {
            DataSource::File(path) => {
                writeln!(out, "Successfully loaded dataset from {}", path.display())?
            }
            DataSource::Reference { missing } => writeln!(
                out,
                "File not found: {}. Loaded the bundled iris dataset instead.",
                missing.display()
            )?,
        }

        writeln!(out, "\nFirst {} rows of the dataset:", self.preview_rows)?;
        writeln!(out, "{}", self.preview)?;
        writeln!(out, "\nDataset Info:\n{}", self.info)?;
        writeln!(out, "\nMissing values per column:\n{}", report::format_missing(&self.missing)?)?;
        if self.imputations.is_empty() {
            writeln!(out, "\nNo missing numeric values to fill.")?;
        } else {
            writeln!(
                out,
                "\nFilled missing values with column means:\n{}",
                report::format_imputations(&self.imputations)?
            )?;
        }
        writeln!(out, "\nDescriptive statistics:\n{}", report::format_describe(&self.describe)?)?;
        if let Some(groups) = &self.groups {
            writeln!(
                out,
                "\nMean values grouped by {}:\n{}",
                self.category,
                report::format_group_means(groups)?
            )?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::chart::ChartKind;
    use crate::data::model::CellValue;

    fn config_for(path: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.path = path.to_path_buf();
        config
    }

    #[test]
    fn fallback_runs_full_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let report = run(&config_for(&dir.path().join("iris.csv"))).unwrap();

        assert!(matches!(report.source, DataSource::Reference { .. }));
        assert_eq!(report.charts.len(), 4);
        assert_eq!(report.groups.as_ref().unwrap().rows.len(), 3);
        assert!(report.imputations.is_empty());

        let text = report.render().unwrap();
        assert!(text.contains("File not found"));
        assert!(text.contains("No missing numeric values to fill."));
        assert!(text.contains("First 5 rows"));
        assert!(text.contains("Descriptive statistics"));
        assert!(text.contains("Mean values grouped by species"));
    }

    #[test]
    fn file_without_category_gets_two_charts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "a,b,c\n1,2,3\n2,,5\n3,4,\n").unwrap();

        let report = run(&config_for(&path)).unwrap();
        assert!(report.groups.is_none());
        let kinds: Vec<ChartKind> = report.charts.iter().map(Chart::kind).collect();
        assert_eq!(kinds, vec![ChartKind::Line, ChartKind::Histogram]);

        // b: mean of 2 and 4; c: mean of 3 and 5
        let b = report.dataset.column("b").unwrap();
        assert_eq!(b.values[1], CellValue::Float(3.0));
        let c = report.dataset.column("c").unwrap();
        assert_eq!(c.values[2], CellValue::Float(4.0));
        assert_eq!(report.missing[1], ("b".to_string(), 1));

        let text = report.render().unwrap();
        assert!(!text.contains("Mean values grouped by"));
        let filled = text
            .split("Filled missing values with column means:")
            .nth(1)
            .and_then(|rest| rest.split("Descriptive statistics").next())
            .unwrap();
        assert!(filled.contains("3.000000"));
        assert!(filled.contains("4.000000"));
    }

    #[test]
    fn short_row_is_padded_then_filled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "a,b,c\n1,2,3\n4,5\n7,8,9\n").unwrap();

        let report = run(&config_for(&path)).unwrap();
        assert_eq!(report.missing[2], ("c".to_string(), 1));
        assert_eq!(report.imputations.len(), 1);
        assert_eq!(report.imputations[0].filled, 1);
        let c = report.dataset.column("c").unwrap();
        assert_eq!(c.values[1], CellValue::Float(6.0));
    }

    #[test]
    fn two_numeric_columns_abort() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "a,label,c\n1,x,3\n2,y,4\n").unwrap();

        let err = run(&config_for(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("2 numeric column(s)"));
    }

    #[test]
    fn non_numeric_position_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "name,a,b,c\nx,1,2,3\ny,3,4,5\n").unwrap();

        let err = run(&config_for(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("column 0 ('name')"));
    }
}
