//! Bar-chart data for the fleet comparison.
//!
//! A [`BarChart`] is plain data: labels and values in fleet order, the
//! axis limit and a colour.  Its `Display` impl draws a horizontal text
//! chart; the `plot` feature opens the same charts in a window.

use std::fmt;

use crate::cycle::CycleResult;
use crate::fleet::FleetResults;
use crate::units;

/// Bar colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarColor {
    Blue,
    Green,
}

impl BarColor {
    /// sRGB components.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Blue => [0, 0, 255],
            Self::Green => [0, 128, 0],
        }
    }
}

/// One labelled value per refrigerant.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// `(label, value)` in fleet order
    pub bars: Vec<(String, f64)>,
    /// Upper y-axis limit: tallest bar + 1
    pub y_max: f64,
    pub color: BarColor,
}

impl BarChart {
    pub fn new(
        title: impl Into<String>,
        y_label: impl Into<String>,
        bars: Vec<(String, f64)>,
        color: BarColor,
    ) -> Self {
        let y_max = bars
            .iter()
            .map(|(_, v)| *v)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
            .map_or(1.0, |m| m + 1.0);
        Self {
            title: title.into(),
            x_label: "Refrigerants".into(),
            y_label: y_label.into(),
            bars,
            y_max,
            color,
        }
    }

    /// Value label drawn above a bar.
    pub fn value_label(value: f64) -> String {
        format!("{value:.2}")
    }

    fn from_fleet(
        fleet: &FleetResults,
        title: &str,
        y_label: &str,
        color: BarColor,
        value: impl Fn(&CycleResult) -> f64,
    ) -> Self {
        let bars = fleet
            .entries()
            .iter()
            .map(|(r, result)| (r.to_string(), value(result)))
            .collect();
        Self::new(title, y_label, bars, color)
    }
}

/// Actual COP per refrigerant.
pub fn cop_chart(fleet: &FleetResults) -> BarChart {
    BarChart::from_fleet(
        fleet,
        "COP Comparison for Refrigerants at Warm Temps.",
        "COP",
        BarColor::Blue,
        |r| r.cop_actual,
    )
}

/// Evaporator capacity (kW) per refrigerant.
///
/// Titled as heating capacity; the plotted value is the cooling capacity.
pub fn capacity_chart(fleet: &FleetResults) -> BarChart {
    BarChart::from_fleet(
        fleet,
        "Heating Capacity Comparison for Refrigerants at Warm Temps.",
        "Heating Capacity (kW)",
        BarColor::Green,
        |r| units::to_kilo(r.cooling_capacity),
    )
}

const TEXT_WIDTH: usize = 40;

impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        write!(f, "{} vs {} (0 to {:.2})", self.y_label, self.x_label, self.y_max)?;
        let label_width = self.bars.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (label, value) in &self.bars {
            let fraction = (value / self.y_max).clamp(0.0, 1.0);
            let len = (fraction * TEXT_WIDTH as f64).round() as usize;
            write!(
                f,
                "\n{label:<label_width$} |{} {}",
                "#".repeat(len),
                Self::value_label(*value)
            )?;
        }
        Ok(())
    }
}
