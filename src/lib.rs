//! # heatpump
//!
//! Vapor-compression cycle comparison for an EV cabin heat pump, with
//! real-fluid properties from
//! [NIST REFPROP](https://www.nist.gov/srd/refprop).
//!
//! ## Highlights
//!
//! * **Single-pass cycle**: saturation pressures, four state points,
//!   energy balance, COP against the Carnot limit
//! * **Exchanger sizing**: air-side balance, LMTD and required area
//! * **Range estimate**: cooling load added to the driving consumption
//! * **Per-refrigerant isolation**: one failing fluid never stops the rest
//! * **Pluggable properties**: any [`PropertyOracle`]; REFPROP is the default
//!
//! ## Quick example
//!
//! ```no_run
//! use heatpump::{CycleConfig, Refrigerant, RefpropOracle, evaluate};
//!
//! let oracle = RefpropOracle::from_env()?;
//! let config = CycleConfig::default();
//! let result = evaluate(&config.inputs_for(Refrigerant::R134a), &config, &oracle)?;
//!
//! println!("COP = {:.2} (Carnot {:.2})", result.cop_actual, result.cop_carnot_max);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Whole fleet
//!
//! ```no_run
//! use heatpump::{CycleConfig, RefpropOracle, ReportSection, evaluate_fleet};
//!
//! let oracle = RefpropOracle::from_env()?;
//! let fleet = evaluate_fleet(&CycleConfig::default(), &oracle, |outcome| {
//!     if let Ok(result) = outcome {
//!         println!("{}", ReportSection(result));
//!     }
//! });
//! println!("{}", heatpump::cop_chart(&fleet));
//! # Ok::<(), heatpump::OracleError>(())
//! ```

// ── Modules ──────────────────────────────────────────────────────────
pub mod chart;
pub mod config;
pub mod cycle;
pub mod error;
pub mod exchanger;
pub mod fleet;
pub mod oracle;
#[cfg(feature = "plot")]
pub mod plot;
pub mod range;
pub mod report;
pub mod sys;
pub mod units;

// ── Public re-exports ────────────────────────────────────────────────
pub use chart::{BarChart, BarColor, capacity_chart, cop_chart};
pub use config::CycleConfig;
pub use cycle::{
    CycleInputs, CycleResult, CycleState, SaturationBoundaries, StatePoint, evaluate,
};
pub use error::{ConfigFileError, CycleError, OracleError, Stage};
pub use exchanger::{AirSide, calculate_lmtd};
pub use fleet::{FleetFailure, FleetResults, evaluate_fleet};
pub use oracle::refprop::RefpropOracle;
pub use oracle::{Property, PropertyOracle, Refrigerant};
pub use report::{FailureSummary, ReportSection};
