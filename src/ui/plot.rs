use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::chart::{Chart, ChartBody};
use crate::color::HISTOGRAM_FILL;
use crate::data::filter::is_visible;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart plot (central panel)
// ---------------------------------------------------------------------------

/// Render one report chart in the central panel.
pub fn chart_plot(ui: &mut Ui, state: &AppState, index: usize) {
    let Some(chart) = state.report.charts.get(index) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No chart to show");
        });
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(chart.title.as_str());
    });

    let plot = Plot::new(("chart_plot", index))
        .legend(Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    match &chart.body {
        ChartBody::Line { series, points } => {
            plot.show(ui, |plot_ui| {
                let points: PlotPoints = points.iter().copied().collect();
                plot_ui.line(Line::new(points).name(series).color(Color32::LIGHT_BLUE).width(1.5));
            });
        }
        ChartBody::Bar { bars } => {
            let labels: Vec<String> = bars.iter().map(|(k, _)| k.to_string()).collect();
            plot.x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
                .show(ui, |plot_ui| {
                    for (i, (key, mean)) in bars.iter().enumerate() {
                        if !is_visible(&state.filters, key) {
                            continue;
                        }
                        let color = state.color_map.color_for(key);
                        let bar = Bar::new(i as f64, *mean)
                            .width(0.6)
                            .name(key.to_string())
                            .fill(color);
                        plot_ui.bar_chart(BarChart::new(vec![bar]).name(key.to_string()).color(color));
                    }
                });
        }
        ChartBody::Histogram { bins } => {
            plot.show(ui, |plot_ui| {
                let bars = bins
                    .iter()
                    .map(|b| {
                        Bar::new(b.center(), b.count as f64)
                            .width(b.width())
                            .fill(HISTOGRAM_FILL)
                            .stroke(Stroke::new(1.0, Color32::BLACK))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&chart.x_label).color(HISTOGRAM_FILL));
            });
        }
        ChartBody::Scatter { groups } => {
            plot.show(ui, |plot_ui| {
                for group in groups {
                    if !is_visible(&state.filters, &group.label) {
                        continue;
                    }
                    let points: PlotPoints = group.points.iter().copied().collect();
                    plot_ui.points(
                        Points::new(points)
                            .name(group.label.to_string())
                            .color(state.color_map.color_for(&group.label))
                            .radius(3.0),
                    );
                }
            });
        }
    }
}

/// Category name under integer bar positions, nothing between them.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// Short description for the tab strip.
pub fn tab_label(chart: &Chart) -> &'static str {
    match chart.body {
        ChartBody::Line { .. } => "Line",
        ChartBody::Bar { .. } => "Bar",
        ChartBody::Histogram { .. } => "Histogram",
        ChartBody::Scatter { .. } => "Scatter",
    }
}
