//! Heat-exchanger sizing: air-side balance, LMTD and required area.

use thiserror::Error;

/// Reason an exchanger quantity cannot be formed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangerError {
    #[error("temperature differences {dt1} K and {dt2} K have opposite signs")]
    MixedSign { dt1: f64, dt2: f64 },

    #[error("temperature difference is zero on one side only ({dt1} K, {dt2} K)")]
    ZeroSide { dt1: f64, dt2: f64 },

    #[error("U·LMTD = {conductance} W/(m²·K·K) is not positive")]
    NonPositiveConductance { conductance: f64 },

    #[error("air mass flow × cp = {0} W/K is not positive")]
    NonPositiveCapacityRate(f64),
}

// ── Air side ────────────────────────────────────────────────────────

/// Linear air-side energy balance around both exchangers.
///
/// The condenser heats cabin air by the ambient–cabin difference, so the
/// cabin-air outlet lands on the ambient temperature and the evaporator
/// then absorbs nothing.  These are the boundary temperatures the LMTD
/// pairs are taken against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirSide {
    /// Heat released by the condenser into cabin air (W)
    pub heat_released: f64,
    /// Heat absorbed by the evaporator from ambient air (W)
    pub heat_absorbed: f64,
    /// Cabin-air temperature leaving the condenser (K)
    pub cabin_outlet_temp: f64,
    /// Ambient-air temperature leaving the evaporator (K)
    pub ambient_outlet_temp: f64,
}

impl AirSide {
    /// Balance for air at `air_mass_flow` (kg/s) and `cp` (J/(kg·K)),
    /// temperatures in K.
    pub fn balance(
        ambient_temp: f64,
        cabin_temp: f64,
        air_mass_flow: f64,
        cp: f64,
    ) -> Result<Self, ExchangerError> {
        let rate = air_mass_flow * cp;
        if !(rate > 0.0) {
            return Err(ExchangerError::NonPositiveCapacityRate(rate));
        }

        let heat_released = rate * (ambient_temp - cabin_temp);
        let cabin_outlet_temp = cabin_temp + heat_released / rate;

        let heat_absorbed = rate * (cabin_outlet_temp - ambient_temp);
        let ambient_outlet_temp = ambient_temp - heat_absorbed / rate;

        Ok(Self {
            heat_released,
            heat_absorbed,
            cabin_outlet_temp,
            ambient_outlet_temp,
        })
    }
}

// ── LMTD and area ───────────────────────────────────────────────────

/// Log-mean temperature difference of two end differences.
///
/// Equal differences return `dt1` unchanged.  Both differences must have
/// the same sign; a zero on just one side has no log mean.
pub fn calculate_lmtd(dt1: f64, dt2: f64) -> Result<f64, ExchangerError> {
    if dt1 == dt2 {
        return Ok(dt1);
    }
    if dt1 == 0.0 || dt2 == 0.0 {
        return Err(ExchangerError::ZeroSide { dt1, dt2 });
    }
    if dt1.signum() != dt2.signum() {
        return Err(ExchangerError::MixedSign { dt1, dt2 });
    }
    // ln(dt1/dt2) via ln_1p for nearly equal ends
    let diff = dt1 - dt2;
    Ok(diff / (diff / dt2).ln_1p())
}

/// Area (m²) that transfers `duty` (W) at overall coefficient `u`
/// (W/(m²·K)) and log-mean difference `lmtd` (K).
pub fn required_area(duty: f64, u: f64, lmtd: f64) -> Result<f64, ExchangerError> {
    let conductance = u * lmtd;
    if !(conductance > 0.0) {
        return Err(ExchangerError::NonPositiveConductance { conductance });
    }
    Ok(duty / conductance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn equal_differences_return_input_exactly() {
        assert_eq!(calculate_lmtd(10.0, 10.0).unwrap(), 10.0);
        assert_eq!(calculate_lmtd(0.0, 0.0).unwrap(), 0.0);
        assert_eq!(calculate_lmtd(-3.5, -3.5).unwrap(), -3.5);
    }

    #[test]
    fn log_mean_of_five_and_ten() {
        let lmtd = calculate_lmtd(5.0, 10.0).unwrap();
        assert_relative_eq!(lmtd, 5.0 / 2.0_f64.ln(), max_relative = 1e-12);
        assert_relative_eq!(lmtd, 7.213_475, epsilon = 1e-6);
        assert_relative_eq!(lmtd, calculate_lmtd(10.0, 5.0).unwrap(), max_relative = 1e-12);
    }

    #[test]
    fn log_mean_lies_between_ends() {
        let lmtd = calculate_lmtd(2.0, 30.0).unwrap();
        assert!(lmtd > 2.0 && lmtd < 30.0);
        assert!(lmtd < 16.0);
    }

    #[test]
    fn nearly_equal_ends_stay_accurate() {
        let lmtd = calculate_lmtd(10.0, 10.0 - 1e-12).unwrap();
        assert_relative_eq!(lmtd, 10.0, max_relative = 1e-12);
    }

    #[test]
    fn mixed_signs_are_rejected() {
        assert!(matches!(
            calculate_lmtd(5.0, -5.0),
            Err(ExchangerError::MixedSign { .. })
        ));
    }

    #[test]
    fn zero_on_one_side_is_rejected() {
        assert!(matches!(
            calculate_lmtd(0.0, 4.0),
            Err(ExchangerError::ZeroSide { .. })
        ));
        assert!(matches!(
            calculate_lmtd(4.0, 0.0),
            Err(ExchangerError::ZeroSide { .. })
        ));
    }

    #[test]
    fn area_from_duty() {
        let a = required_area(3000.0, 300.0, 5.0 / 2.0_f64.ln()).unwrap();
        assert_relative_eq!(a, 3000.0 / (300.0 * 7.213_475_204), max_relative = 1e-9);
    }

    #[test]
    fn area_needs_positive_conductance() {
        assert!(required_area(1000.0, 500.0, 0.0).is_err());
        assert!(required_area(1000.0, 0.0, 10.0).is_err());
        assert!(required_area(1000.0, 500.0, -2.0).is_err());
    }

    #[test]
    fn air_side_reaches_ambient() {
        let air = AirSide::balance(298.15, 293.15, 0.1, 1005.0).unwrap();
        assert_relative_eq!(air.heat_released, 502.5, max_relative = 1e-9);
        assert_relative_eq!(air.cabin_outlet_temp, 298.15, max_relative = 1e-12);
        assert_relative_eq!(air.heat_absorbed, 0.0, epsilon = 1e-9);
        assert_relative_eq!(air.ambient_outlet_temp, 298.15, max_relative = 1e-12);
    }

    #[test]
    fn air_side_needs_flow() {
        assert!(AirSide::balance(298.15, 293.15, 0.0, 1005.0).is_err());
    }
}
