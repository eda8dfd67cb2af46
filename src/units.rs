//! Unit constants and temperature scales.
//!
//! Everything inside the cycle evaluation is SI on a mass basis:
//! **K, Pa, J/kg, J/(kg·K), W, m²**.  Display code scales to kJ/kg, bar
//! and kW through the constants here so no conversion factor is written
//! inline anywhere else.
//!
//! REFPROP works on a molar basis (**K, kPa, J/mol, J/(mol·K)**); the
//! `*_from_refprop` / `*_to_refprop` helpers convert using the fluid's
//! molar mass in g/mol.
//!
//! | Scale    | Offset / factor from Kelvin |
//! |----------|-----------------------------|
//! | Celsius  | K − 273.15                  |
//! | Rankine  | K × 1.8                     |

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────
//  Constants
// ────────────────────────────────────────────────────────────────────

/// 0 °C expressed in kelvin.
pub const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;

/// Rankine degrees per kelvin.
pub const RANKINE_PER_KELVIN: f64 = 1.8;

/// Pascals per bar.
pub const PA_PER_BAR: f64 = 1.0e5;

/// Pascals per kilopascal (REFPROP pressure unit).
pub const PA_PER_KPA: f64 = 1.0e3;

/// Joules per kilojoule (also W per kW).
pub const J_PER_KJ: f64 = 1.0e3;

/// Miles per kilometre.
pub const MILES_PER_KM: f64 = 0.621_371;

// ────────────────────────────────────────────────────────────────────
//  Temperature scales
// ────────────────────────────────────────────────────────────────────

/// Temperature in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Celsius(pub f64);

/// Absolute temperature in kelvin.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kelvin(pub f64);

/// Absolute temperature in degrees Rankine.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rankine(pub f64);

impl Celsius {
    pub fn to_kelvin(self) -> Kelvin {
        Kelvin(self.0 + ZERO_CELSIUS_IN_KELVIN)
    }
}

impl Kelvin {
    pub fn to_celsius(self) -> Celsius {
        Celsius(self.0 - ZERO_CELSIUS_IN_KELVIN)
    }

    pub fn to_rankine(self) -> Rankine {
        Rankine(self.0 * RANKINE_PER_KELVIN)
    }
}

impl From<Celsius> for Kelvin {
    fn from(t: Celsius) -> Self {
        t.to_kelvin()
    }
}

impl From<Kelvin> for Celsius {
    fn from(t: Kelvin) -> Self {
        t.to_celsius()
    }
}

impl From<Kelvin> for Rankine {
    fn from(t: Kelvin) -> Self {
        t.to_rankine()
    }
}

impl std::fmt::Display for Celsius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} °C", self.0)
    }
}

impl std::fmt::Display for Kelvin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} K", self.0)
    }
}

// ────────────────────────────────────────────────────────────────────
//  Display scaling
// ────────────────────────────────────────────────────────────────────

/// Pa → bar
pub fn pa_to_bar(p: f64) -> f64 {
    p / PA_PER_BAR
}

/// J (or J/kg, W) → kJ (kJ/kg, kW)
pub fn to_kilo(x: f64) -> f64 {
    x / J_PER_KJ
}

/// km → miles
pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

// ────────────────────────────────────────────────────────────────────
//  REFPROP molar basis ↔ SI mass basis
// ────────────────────────────────────────────────────────────────────

/// Pa → kPa
pub fn pressure_to_refprop(p: f64) -> f64 {
    p / PA_PER_KPA
}

/// kPa → Pa
pub fn pressure_from_refprop(p: f64) -> f64 {
    p * PA_PER_KPA
}

/// J/kg → J/mol.  Also valid for entropy (J/(kg·K) → J/(mol·K)).
pub fn specific_to_refprop(x: f64, molar_mass: f64) -> f64 {
    x * molar_mass / 1000.0
}

/// J/mol → J/kg.  Also valid for entropy (J/(mol·K) → J/(kg·K)).
pub fn specific_from_refprop(x: f64, molar_mass: f64) -> f64 {
    x * 1000.0 / molar_mass
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn celsius_kelvin_round_trip() {
        let t = Celsius(15.0).to_kelvin();
        assert_relative_eq!(t.0, 288.15);
        assert_relative_eq!(t.to_celsius().0, 15.0, epsilon = 1e-12);
    }

    #[test]
    fn rankine_ratio_matches_kelvin_ratio() {
        let hot = Celsius(25.0).to_kelvin();
        let cold = Celsius(20.0).to_kelvin();
        let by_kelvin = hot.0 / (hot.0 - cold.0);
        let by_rankine = hot.to_rankine().0 / (hot.to_rankine().0 - cold.to_rankine().0);
        assert_relative_eq!(by_kelvin, by_rankine, max_relative = 1e-12);
    }

    #[test]
    fn molar_conversion_inverts() {
        // R134a: M ≈ 102.03 g/mol
        let h = 409_700.0;
        let molar = specific_to_refprop(h, 102.03);
        assert_relative_eq!(specific_from_refprop(molar, 102.03), h, max_relative = 1e-12);
    }

    #[test]
    fn display_scaling() {
        assert_relative_eq!(pa_to_bar(488_000.0), 4.88);
        assert_relative_eq!(to_kilo(8_400.0), 8.4);
        assert_relative_eq!(km_to_miles(100.0), 62.1371);
        assert_relative_eq!(pressure_from_refprop(pressure_to_refprop(770_000.0)), 770_000.0);
    }
}
