//! Driving-range estimate with the air-conditioning load on the battery.

use crate::units;

/// Energy use and range for one cooling load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeEstimate {
    /// Total consumption including cooling (kWh/100 km)
    pub energy_consumption: f64,
    pub range_km: f64,
    pub range_miles: f64,
}

/// Range for a cooling load of `cooling_capacity` (W) added to a baseline
/// `drive_consumption` (kWh/100 km), from `battery_capacity` (kWh).
///
/// The cooling load enters as `kW / 100` on top of the baseline.  Returns
/// `None` if the total consumption is not a positive, finite number.
pub fn estimate(
    cooling_capacity: f64,
    drive_consumption: f64,
    battery_capacity: f64,
) -> Option<RangeEstimate> {
    let energy_consumption = drive_consumption + units::to_kilo(cooling_capacity) / 100.0;
    if !(energy_consumption > 0.0) || !energy_consumption.is_finite() {
        return None;
    }

    let range_km = battery_capacity / energy_consumption * 100.0;
    Some(RangeEstimate {
        energy_consumption,
        range_km,
        range_miles: units::km_to_miles(range_km),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn baseline_without_cooling() {
        let r = estimate(0.0, 15.0, 100.0).unwrap();
        assert_relative_eq!(r.energy_consumption, 15.0);
        assert_relative_eq!(r.range_km, 666.666_666_7, epsilon = 1e-6);
        assert_relative_eq!(r.range_miles, 666.666_666_7 * 0.621_371, epsilon = 1e-6);
    }

    #[test]
    fn cooling_load_shortens_range() {
        let r = estimate(8_000.0, 15.0, 100.0).unwrap();
        assert_relative_eq!(r.energy_consumption, 15.08, epsilon = 1e-12);
        assert_relative_eq!(r.range_km, 100.0 / 15.08 * 100.0, max_relative = 1e-12);
        assert!(r.range_km < estimate(0.0, 15.0, 100.0).unwrap().range_km);
    }

    #[test]
    fn non_positive_consumption_has_no_range() {
        assert!(estimate(0.0, 0.0, 100.0).is_none());
        assert!(estimate(-2_000_000.0, 15.0, 100.0).is_none());
        assert!(estimate(f64::NAN, 15.0, 100.0).is_none());
    }
}
