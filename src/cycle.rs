//! Single-pass evaluation of an ideal-throttle vapor-compression cycle.
//!
//! State points:
//!
//! | # | Location            | Fixed by                                 |
//! |---|---------------------|------------------------------------------|
//! | 1 | evaporator outlet   | saturated vapor at `T_evap`              |
//! | 2 | compressor outlet   | `P_cond`, `h1 + (h2s - h1) / η`          |
//! | 3 | condenser outlet    | saturated liquid at `T_cond`             |
//! | 4 | expansion outlet    | `h4 = h3` (isenthalpic throttle)         |
//!
//! Every property comes from a [`PropertyOracle`]; nothing here iterates
//! or converges.

use crate::config::CycleConfig;
use crate::error::{CycleError, OracleError, Stage};
use crate::exchanger::{self, AirSide};
use crate::oracle::{Property, PropertyOracle, Query, Refrigerant};
use crate::range::{self, RangeEstimate};
use crate::units::{Celsius, Kelvin};

/// Per-refrigerant inputs to one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleInputs {
    pub refrigerant: Refrigerant,
    /// Outside air temperature (°C)
    pub ambient_temp_c: f64,
    /// Desired cabin temperature (°C)
    pub cabin_temp_c: f64,
    /// Refrigerant mass flow rate (kg/s)
    pub mass_flow_rate_kg_s: f64,
    /// Compressor isentropic efficiency, in (0, 1]
    pub compressor_efficiency: f64,
    /// Evaporator saturation temperature below cabin (K)
    pub evap_buffer_k: f64,
    /// Condenser saturation temperature above ambient (K)
    pub cond_buffer_k: f64,
}

impl CycleInputs {
    /// Evaporator saturation temperature: cabin minus the evaporator buffer.
    pub fn evaporator_temp(&self) -> Celsius {
        Celsius(self.cabin_temp_c - self.evap_buffer_k)
    }

    /// Condenser saturation temperature: ambient plus the condenser buffer.
    pub fn condenser_temp(&self) -> Celsius {
        Celsius(self.ambient_temp_c + self.cond_buffer_k)
    }
}

/// Refrigerant state at one point of the cycle (SI, mass basis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatePoint {
    /// Temperature (K)
    pub temperature: f64,
    /// Pressure (Pa)
    pub pressure: f64,
    /// Specific enthalpy (J/kg)
    pub enthalpy: f64,
    /// Specific entropy (J/(kg·K)), where it was looked up
    pub entropy: Option<f64>,
}

/// The four state points around the loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleState {
    pub evaporator_outlet: StatePoint,
    pub compressor_outlet: StatePoint,
    pub condenser_outlet: StatePoint,
    pub expansion_outlet: StatePoint,
}

/// Refrigerant saturation temperatures at each exchanger end (K).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationBoundaries {
    /// Saturated vapor entering the condenser
    pub condenser_vapor_in: f64,
    /// Saturated liquid leaving the condenser
    pub condenser_liquid_out: f64,
    /// Saturated liquid entering the evaporator
    pub evaporator_liquid_in: f64,
    /// Saturated vapor leaving the evaporator
    pub evaporator_vapor_out: f64,
}

/// Everything derived for one refrigerant.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleResult {
    pub refrigerant: Refrigerant,
    pub evaporator_temp: Celsius,
    pub condenser_temp: Celsius,
    pub state: CycleState,
    pub boundaries: SaturationBoundaries,
    pub air: AirSide,

    /// Evaporator saturation pressure (Pa)
    pub evaporator_pressure: f64,
    /// Condenser saturation pressure (Pa)
    pub condenser_pressure: f64,
    pub pressure_ratio: f64,

    /// Heat absorbed in the evaporator (J/kg)
    pub q_evaporator: f64,
    /// Heat released in the condenser (J/kg)
    pub q_condenser: f64,
    /// Compressor specific work (J/kg)
    pub w_compressor: f64,

    pub cop_actual: f64,
    pub cop_carnot_max: f64,

    /// Log-mean temperature differences (K)
    pub lmtd_condenser: f64,
    pub lmtd_evaporator: f64,
    /// Required transfer areas (m²)
    pub area_condenser: f64,
    pub area_evaporator: f64,

    /// Evaporator load (W)
    pub cooling_capacity: f64,
    /// Condenser load (W)
    pub heating_capacity: f64,
    /// Mass flow × compressor work (W)
    pub compressor_power: f64,
    /// Cooling capacity at the Carnot COP (W)
    pub min_power: f64,
    /// Cooling capacity at the actual COP (W)
    pub actual_power: f64,
    /// Heat needed to move the air from cabin to ambient temperature (W)
    pub required_cabin_heat: f64,

    pub range: RangeEstimate,
}

// ── Oracle access ───────────────────────────────────────────────────

/// Oracle queries bound to one refrigerant, tagging failures with a stage.
struct Lookup<'a, O: ?Sized> {
    oracle: &'a O,
    refrigerant: Refrigerant,
}

impl<O: PropertyOracle + ?Sized> Lookup<'_, O> {
    fn get(
        &self,
        stage: Stage,
        output: Property,
        input1: (Property, f64),
        input2: (Property, f64),
    ) -> Result<f64, CycleError> {
        let query = Query {
            output,
            input1,
            input2,
            fluid: self.refrigerant,
        };
        let fail = |source| CycleError::PropertyLookup {
            refrigerant: self.refrigerant,
            stage,
            query,
            source,
        };

        let value = self
            .oracle
            .query(output, input1, input2, self.refrigerant)
            .map_err(fail)?;
        if !value.is_finite() {
            return Err(fail(OracleError::CalculationFailed(format!(
                "non-finite result {value}"
            ))));
        }
        Ok(value)
    }

    fn domain(&self, stage: Stage, detail: impl ToString) -> CycleError {
        CycleError::Domain {
            refrigerant: self.refrigerant,
            stage,
            detail: detail.to_string(),
        }
    }
}

// ── Validation ──────────────────────────────────────────────────────

fn validate(inputs: &CycleInputs, config: &CycleConfig) -> Result<(), CycleError> {
    let fail = |detail: String| {
        Err(CycleError::Config {
            refrigerant: inputs.refrigerant,
            stage: Stage::Validation,
            detail,
        })
    };

    let eta = inputs.compressor_efficiency;
    if !(eta > 0.0 && eta <= 1.0) {
        return fail(format!("compressor efficiency {eta} is outside (0, 1]"));
    }

    let finite = [
        ("ambient temperature", inputs.ambient_temp_c),
        ("cabin temperature", inputs.cabin_temp_c),
        ("evaporator buffer", inputs.evap_buffer_k),
        ("condenser buffer", inputs.cond_buffer_k),
    ];
    for (name, value) in finite {
        if !value.is_finite() {
            return fail(format!("{name} {value} is not finite"));
        }
    }

    let positive = [
        ("refrigerant mass flow", inputs.mass_flow_rate_kg_s),
        ("air mass flow", config.air_mass_flow_kg_s),
        ("air specific heat", config.air_cp_j_kg_k),
        ("condenser U", config.u_condenser_w_m2_k),
        ("evaporator U", config.u_evaporator_w_m2_k),
        ("drive consumption", config.drive_consumption_kwh_per_100km),
        ("battery capacity", config.battery_capacity_kwh),
    ];
    for (name, value) in positive {
        if !(value > 0.0 && value.is_finite()) {
            return fail(format!("{name} {value} must be positive"));
        }
    }

    let t_evap = inputs.evaporator_temp();
    let t_cond = inputs.condenser_temp();
    if t_evap >= t_cond {
        return fail(format!(
            "evaporator temperature {t_evap} is not below condenser temperature {t_cond}"
        ));
    }
    Ok(())
}

// ── Evaluation ──────────────────────────────────────────────────────

/// Evaluate the cycle for `inputs.refrigerant`.
///
/// Deterministic for a deterministic oracle: the same inputs give a
/// bit-identical [`CycleResult`].
///
/// # Errors
///
/// * [`CycleError::Config`] for an impossible input set.
/// * [`CycleError::PropertyLookup`] when the oracle fails or returns a
///   non-finite value.
/// * [`CycleError::Domain`] for a zero compressor work, a non-positive
///   Carnot denominator or an unusable LMTD.
pub fn evaluate<O: PropertyOracle + ?Sized>(
    inputs: &CycleInputs,
    config: &CycleConfig,
    oracle: &O,
) -> Result<CycleResult, CycleError> {
    use Property::{H, P, Q, S, T};

    validate(inputs, config)?;

    let lookup = Lookup {
        oracle,
        refrigerant: inputs.refrigerant,
    };

    let t_ambient = Celsius(inputs.ambient_temp_c).to_kelvin();
    let t_cabin = Celsius(inputs.cabin_temp_c).to_kelvin();
    let t_evap = inputs.evaporator_temp().to_kelvin().0;
    let t_cond = inputs.condenser_temp().to_kelvin().0;

    // Saturation pressures
    let p_evap = lookup.get(Stage::SaturationPressures, P, (T, t_evap), (Q, 1.0))?;
    let p_cond = lookup.get(Stage::SaturationPressures, P, (T, t_cond), (Q, 1.0))?;

    let boundaries = SaturationBoundaries {
        condenser_vapor_in: lookup.get(Stage::SaturationBoundaries, T, (P, p_cond), (Q, 1.0))?,
        condenser_liquid_out: lookup.get(Stage::SaturationBoundaries, T, (P, p_cond), (Q, 0.0))?,
        evaporator_liquid_in: lookup.get(Stage::SaturationBoundaries, T, (P, p_evap), (Q, 0.0))?,
        evaporator_vapor_out: lookup.get(Stage::SaturationBoundaries, T, (P, p_evap), (Q, 1.0))?,
    };

    // 1: saturated vapor leaving the evaporator
    let h1 = lookup.get(Stage::EvaporatorOutlet, H, (T, t_evap), (Q, 1.0))?;
    let s1 = lookup.get(Stage::EvaporatorOutlet, S, (T, t_evap), (Q, 1.0))?;

    // 2: non-isentropic compression to the condenser pressure
    let h2s = lookup.get(Stage::CompressorOutlet, H, (P, p_cond), (S, s1))?;
    let h2 = h1 + (h2s - h1) / inputs.compressor_efficiency;
    let t2 = lookup.get(Stage::CompressorOutlet, T, (P, p_cond), (H, h2))?;
    let s2 = lookup.get(Stage::CompressorOutlet, S, (P, p_cond), (H, h2))?;

    // 3: saturated liquid leaving the condenser
    let h3 = lookup.get(Stage::CondenserOutlet, H, (T, t_cond), (Q, 0.0))?;

    // 4: throttle
    let h4 = h3;

    let state = CycleState {
        evaporator_outlet: StatePoint {
            temperature: t_evap,
            pressure: p_evap,
            enthalpy: h1,
            entropy: Some(s1),
        },
        compressor_outlet: StatePoint {
            temperature: t2,
            pressure: p_cond,
            enthalpy: h2,
            entropy: Some(s2),
        },
        condenser_outlet: StatePoint {
            temperature: t_cond,
            pressure: p_cond,
            enthalpy: h3,
            entropy: None,
        },
        expansion_outlet: StatePoint {
            temperature: t_evap,
            pressure: p_evap,
            enthalpy: h4,
            entropy: None,
        },
    };

    // Energy balance
    let q_condenser = h2 - h3;
    let q_evaporator = h1 - h4;
    let w_compressor = h2 - h1;
    if w_compressor == 0.0 || !w_compressor.is_finite() {
        return Err(lookup.domain(
            Stage::EnergyBalance,
            format!("compressor work {w_compressor} J/kg"),
        ));
    }

    let m = inputs.mass_flow_rate_kg_s;
    let compressor_power = m * w_compressor;
    let heating_capacity = m * q_condenser;
    let cooling_capacity = m * q_evaporator;

    let cop_actual = q_evaporator / w_compressor;
    let cop_carnot_max = carnot_cop(t_ambient, t_cabin).ok_or_else(|| {
        lookup.domain(
            Stage::CarnotLimit,
            format!("ambient {t_ambient} is not above cabin {t_cabin}"),
        )
    })?;
    let pressure_ratio = p_cond / p_evap;

    let min_power = cooling_capacity / cop_carnot_max;
    let actual_power = cooling_capacity / cop_actual;

    let air_cp = config.air_cp_j_kg_k;
    let air_flow = config.air_mass_flow_kg_s;
    let required_cabin_heat = air_flow * air_cp * (inputs.ambient_temp_c - inputs.cabin_temp_c);

    // Exchanger sizing
    let air = AirSide::balance(t_ambient.0, t_cabin.0, air_flow, air_cp)
        .map_err(|e| lookup.domain(Stage::AirSide, e))?;

    let lmtd_condenser = exchanger::calculate_lmtd(
        boundaries.condenser_vapor_in - air.cabin_outlet_temp,
        boundaries.condenser_liquid_out - t_cabin.0,
    )
    .map_err(|e| lookup.domain(Stage::CondenserLmtd, e))?;
    let lmtd_evaporator = exchanger::calculate_lmtd(
        t_ambient.0 - boundaries.evaporator_vapor_out,
        air.ambient_outlet_temp - boundaries.evaporator_liquid_in,
    )
    .map_err(|e| lookup.domain(Stage::EvaporatorLmtd, e))?;

    let area_condenser =
        exchanger::required_area(heating_capacity, config.u_condenser_w_m2_k, lmtd_condenser)
            .map_err(|e| lookup.domain(Stage::CondenserArea, e))?;
    let area_evaporator =
        exchanger::required_area(cooling_capacity, config.u_evaporator_w_m2_k, lmtd_evaporator)
            .map_err(|e| lookup.domain(Stage::EvaporatorArea, e))?;

    let range = range::estimate(
        cooling_capacity,
        config.drive_consumption_kwh_per_100km,
        config.battery_capacity_kwh,
    )
    .ok_or_else(|| {
        lookup.domain(
            Stage::Range,
            format!("no positive energy consumption for cooling load {cooling_capacity} W"),
        )
    })?;

    Ok(CycleResult {
        refrigerant: inputs.refrigerant,
        evaporator_temp: inputs.evaporator_temp(),
        condenser_temp: inputs.condenser_temp(),
        state,
        boundaries,
        air,
        evaporator_pressure: p_evap,
        condenser_pressure: p_cond,
        pressure_ratio,
        q_evaporator,
        q_condenser,
        w_compressor,
        cop_actual,
        cop_carnot_max,
        lmtd_condenser,
        lmtd_evaporator,
        area_condenser,
        area_evaporator,
        cooling_capacity,
        heating_capacity,
        compressor_power,
        min_power,
        actual_power,
        required_cabin_heat,
        range,
    })
}

/// Carnot COP between ambient (source) and cabin (sink), computed on the
/// Rankine scale.  `None` unless ambient is above cabin.
pub fn carnot_cop(ambient: Kelvin, cabin: Kelvin) -> Option<f64> {
    let hot = ambient.to_rankine().0;
    let cold = cabin.to_rankine().0;
    let lift = hot - cold;
    (lift > 0.0).then(|| hot / lift)
}
