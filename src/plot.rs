//! Interactive window for the comparison charts.
//!
//! Enabled with the `plot` feature.  All charts share one window because
//! the native event loop can only be started once per process.

use eframe::egui::{self, Align2, Color32};
use egui_plot::{Bar, BarChart as BarSeries, Plot, PlotPoint, Text};

use crate::chart::BarChart;

/// Offset of a value label above its bar, in y-axis units.
const LABEL_OFFSET: f64 = 0.1;

/// Opens a blocking egui window showing `charts` one above the other.
///
/// Blocks until the window is closed by the user.
///
/// # Errors
///
/// Returns an error if the native window cannot be created.
pub fn show(charts: &[BarChart]) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([800.0, 1000.0]),
        ..Default::default()
    };
    let charts = charts.to_vec();

    eframe::run_native(
        "Refrigerant comparison",
        options,
        Box::new(move |_cc| Ok(Box::new(ChartApp { charts }))),
    )
}

fn fill(chart: &BarChart) -> Color32 {
    let [r, g, b] = chart.color.rgb();
    Color32::from_rgba_unmultiplied(r, g, b, 178)
}

/// The egui [`eframe::App`] that renders the bar charts.
struct ChartApp {
    charts: Vec<BarChart>,
}

impl ChartApp {
    fn draw(ui: &mut egui::Ui, index: usize, chart: &BarChart, height: f32) {
        ui.heading(&chart.title);

        let labels: Vec<String> = chart.bars.iter().map(|(l, _)| l.clone()).collect();
        let color = fill(chart);
        let bars = chart
            .bars
            .iter()
            .enumerate()
            .map(|(i, (label, value))| Bar::new(i as f64, *value).name(label).fill(color))
            .collect();

        Plot::new(("bar_chart", index))
            .height(height)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .show_grid([false, true])
            .include_x(-0.5)
            .include_x(chart.bars.len() as f64 - 0.5)
            .include_y(0.0)
            .include_y(chart.y_max)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let i = mark.value.round();
                if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                    return String::new();
                }
                labels.get(i as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarSeries::new(bars).color(color));
                for (i, (_, value)) in chart.bars.iter().enumerate() {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(i as f64, value + LABEL_OFFSET),
                            BarChart::value_label(*value),
                        )
                        .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            });
    }
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let count = self.charts.len().max(1) as f32;
            let height = (ui.available_height() / count - 40.0).max(120.0);
            for (index, chart) in self.charts.iter().enumerate() {
                Self::draw(ui, index, chart, height);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::BarColor;

    #[test]
    fn fill_is_translucent_chart_color() {
        let chart = BarChart::new("t", "COP", vec![("R32".into(), 4.0)], BarColor::Green);
        assert_eq!(fill(&chart), Color32::from_rgba_unmultiplied(0, 128, 0, 178));
    }
}
