//! Text report for one refrigerant, and the qualitative checks it prints.
//!
//! Nothing here computes thermodynamics; values are only rescaled for
//! display (kJ/kg, bar, kW, miles).

use std::fmt;

use crate::cycle::CycleResult;
use crate::fleet::FleetFailure;
use crate::units;

/// Pressure ratios considered good for efficient operation.
pub const PRESSURE_RATIO_BAND: (f64, f64) = (2.5, 4.5);
/// Realistic and efficient COP band.
pub const COP_BAND: (f64, f64) = (3.5, 6.0);
/// Exchanger areas above this are flagged as large (m²).
pub const LARGE_AREA_M2: f64 = 1.5;
/// Average pure-EV range (miles).
pub const RANGE_BAND_MILES: (f64, f64) = (250.0, 500.0);

fn within((lo, hi): (f64, f64), x: f64) -> bool {
    lo <= x && x <= hi
}

// ── Classifications ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureRatioBand {
    Good,
    Outside,
}

impl PressureRatioBand {
    pub fn classify(ratio: f64) -> Self {
        if within(PRESSURE_RATIO_BAND, ratio) {
            Self::Good
        } else {
            Self::Outside
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Good => "Pressure ratio is within a good range for efficient operation.",
            Self::Outside => {
                "Pressure ratio is outside the ideal range. Consider adjusting condenser or evaporator temperatures."
            }
        }
    }
}

/// Which heat exchanger an [`AreaCheck`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchanger {
    Condenser,
    Evaporator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaCheck {
    Reasonable,
    Large,
}

impl AreaCheck {
    pub fn classify(area: f64) -> Self {
        if area > LARGE_AREA_M2 {
            Self::Large
        } else {
            Self::Reasonable
        }
    }

    pub fn message(self, exchanger: Exchanger) -> &'static str {
        match (self, exchanger) {
            (Self::Large, Exchanger::Condenser) => {
                "The condenser size is large. Ensure adequate space for installation."
            }
            (Self::Large, Exchanger::Evaporator) => {
                "The evaporator size is large. Consider optimizing the design."
            }
            (Self::Reasonable, Exchanger::Condenser) => {
                "The condenser size is reasonable for typical applications."
            }
            (Self::Reasonable, Exchanger::Evaporator) => {
                "The evaporator size is reasonable for typical applications."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopClass {
    /// Inside the efficient band and below the Carnot limit
    Efficient,
    /// At or above the Carnot limit
    ExceedsCarnot,
    OutsideBand,
}

impl CopClass {
    pub fn classify(cop: f64, carnot: f64) -> Self {
        if within(COP_BAND, cop) && cop < carnot {
            Self::Efficient
        } else if cop >= carnot {
            Self::ExceedsCarnot
        } else {
            Self::OutsideBand
        }
    }

    pub fn message(self, cop: f64, carnot: f64) -> String {
        let (lo, hi) = COP_BAND;
        match self {
            Self::Efficient => format!(
                "The actual COP ({cop:.2}) is within the realistic and efficient range ({lo} to {hi}) and is less than the maximum COP ({carnot:.2})."
            ),
            Self::ExceedsCarnot => format!(
                "The actual COP ({cop:.2}) exceeds the maximum COP ({carnot:.2}), which is unrealistic."
            ),
            Self::OutsideBand => format!(
                "The actual COP ({cop:.2}) is outside the realistic and efficient range ({lo} to {hi}) or invalid."
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityCheck {
    Sufficient,
    Insufficient,
}

impl CapacityCheck {
    pub fn classify(cooling_capacity: f64, required: f64) -> Self {
        if cooling_capacity >= required {
            Self::Sufficient
        } else {
            Self::Insufficient
        }
    }
}

impl fmt::Display for CapacityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sufficient => "Sufficient",
            Self::Insufficient => "Insufficient",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBand {
    Within,
    Outside,
}

impl RangeBand {
    pub fn classify(range_miles: f64) -> Self {
        if within(RANGE_BAND_MILES, range_miles) {
            Self::Within
        } else {
            Self::Outside
        }
    }

    pub fn message(self, range_miles: f64) -> String {
        let (lo, hi) = RANGE_BAND_MILES;
        let verdict = match self {
            Self::Within => "Within",
            Self::Outside => "Outside",
        };
        format!(
            "Hot Weather Range ({range_miles:.2} miles): {verdict} the average range of {lo} to {hi} miles for Pure EVs."
        )
    }
}

// ── Per-refrigerant section ─────────────────────────────────────────

/// Full printed report for one refrigerant.
pub struct ReportSection<'a>(pub &'a CycleResult);

impl fmt::Display for ReportSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        let kj = units::to_kilo;
        let st = &r.state;

        writeln!(f, "=== Results for {} ===", r.refrigerant)?;

        writeln!(f)?;
        writeln!(f, "=== Enthalpy and Entropy at Each State ===")?;
        writeln!(f, "Evaporator Outlet Enthalpy (h1): {:.2} kJ/kg", kj(st.evaporator_outlet.enthalpy))?;
        writeln!(f, "Compressor Outlet Enthalpy (h2): {:.2} kJ/kg", kj(st.compressor_outlet.enthalpy))?;
        writeln!(f, "Condenser Outlet Enthalpy (h3): {:.2} kJ/kg", kj(st.condenser_outlet.enthalpy))?;
        writeln!(f, "Expansion Valve Outlet Enthalpy (h4): {:.2} kJ/kg", kj(st.expansion_outlet.enthalpy))?;
        if let Some(s2) = st.compressor_outlet.entropy {
            writeln!(f, "Compressor Outlet Entropy (s2): {:.2} kJ/kg.K", kj(s2))?;
        }

        writeln!(f)?;
        writeln!(f, "=== Pressure of the Heat Exchangers ===")?;
        writeln!(f, "Evaporator Pressure: {:.2} bar", units::pa_to_bar(r.evaporator_pressure))?;
        writeln!(f, "Condenser Pressure: {:.2} bar", units::pa_to_bar(r.condenser_pressure))?;
        writeln!(f, "Pressure Ratio: {:.2}", r.pressure_ratio)?;
        writeln!(f, "{}", PressureRatioBand::classify(r.pressure_ratio).message())?;

        writeln!(f)?;
        writeln!(f, "=== Required Heat Exchanger Sizes ===")?;
        writeln!(f, "LMTD (Condenser): {:.2} K", r.lmtd_condenser)?;
        writeln!(f, "LMTD (Evaporator): {:.2} K", r.lmtd_evaporator)?;
        writeln!(f, "Condenser Area: {:.2} m²", r.area_condenser)?;
        writeln!(f, "Evaporator Area: {:.2} m²", r.area_evaporator)?;
        writeln!(f, "{}", AreaCheck::classify(r.area_condenser).message(Exchanger::Condenser))?;
        writeln!(f, "{}", AreaCheck::classify(r.area_evaporator).message(Exchanger::Evaporator))?;

        writeln!(f)?;
        writeln!(f, "=== Coefficient of Performance (COP) ===")?;
        writeln!(f, "Actual COP (Heating): {:.2}", r.cop_actual)?;
        writeln!(f, "Maximum COP (Carnot): {:.2}", r.cop_carnot_max)?;
        let cop_class = CopClass::classify(r.cop_actual, r.cop_carnot_max);
        writeln!(f, "{}", cop_class.message(r.cop_actual, r.cop_carnot_max))?;

        writeln!(f)?;
        writeln!(f, "=== Heating and Power Calculations ===")?;
        writeln!(f, "Heat Delivered (Q_H): {:.2} kJ/kg", kj(r.q_condenser))?;
        writeln!(f, "Cooling Capacity: {:.2} kW", kj(r.cooling_capacity))?;
        writeln!(f, "Required Heat Transfer: {:.2} kW", kj(r.required_cabin_heat))?;
        writeln!(
            f,
            "Capacity Check: {}",
            CapacityCheck::classify(r.cooling_capacity, r.required_cabin_heat)
        )?;

        writeln!(f)?;
        writeln!(f, "=== Required Compressor Power ===")?;
        writeln!(f, "Compressor Work: {:.2} kJ/kg", kj(r.w_compressor))?;
        writeln!(f, "Compressor Power: {:.2} kW", kj(r.compressor_power))?;
        writeln!(f, "Maximum Power Consumption: {:.2} kW", kj(r.min_power))?;
        writeln!(f, "Actual Power Consumption: {:.2} kW", kj(r.actual_power))?;

        writeln!(f)?;
        writeln!(f, "=== Travel Range Estimates ===")?;
        writeln!(f, "Energy Consumption (Hot, kWh/100 km): {:.2}", r.range.energy_consumption)?;
        writeln!(f, "Range (Hot, km): {:.2} km", r.range.range_km)?;
        writeln!(f, "Range (Hot, miles): {:.2} miles", r.range.range_miles)?;

        writeln!(f)?;
        writeln!(f, "=== Range Analysis ===")?;
        write!(
            f,
            "{}",
            RangeBand::classify(r.range.range_miles).message(r.range.range_miles)
        )
    }
}

// ── Failures ────────────────────────────────────────────────────────

/// Refrigerants that were skipped, with the reason.
pub struct FailureSummary<'a>(pub &'a [FleetFailure]);

impl fmt::Display for FailureSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "=== Skipped Refrigerants ({}) ===", self.0.len())?;
        for failure in self.0 {
            write!(f, "\n  {}", failure.error)?;
        }
        Ok(())
    }
}
