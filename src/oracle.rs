//! Property-oracle contract.
//!
//! The cycle evaluation never computes fluid properties itself.  Every
//! state point comes from a [`PropertyOracle`] answering a CoolProp-style
//! query: one output property given two input properties and a fluid.
//!
//! ```text
//! oracle.query(Property::P, (Property::T, 288.15), (Property::Q, 1.0), Refrigerant::R134a)
//! oracle.query(Property::H, (Property::P, 7.7e5), (Property::S, 1717.0), Refrigerant::R134a)
//! ```
//!
//! All values are SI on a mass basis: Pa, K, J/kg, J/(kg·K).  Quality is
//! the vapor fraction (0 = saturated liquid, 1 = saturated vapor).
//!
//! Implementations must be deterministic: two identical queries return
//! identical values.

pub mod refprop;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, Result};

// ── Property identifiers ────────────────────────────────────────────

/// Thermodynamic property names understood by an oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Pressure (Pa)
    P,
    /// Temperature (K)
    T,
    /// Specific enthalpy (J/kg)
    H,
    /// Specific entropy (J/(kg·K))
    S,
    /// Vapor quality (0–1)
    Q,
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            Self::P => "P",
            Self::T => "T",
            Self::H => "H",
            Self::S => "S",
            Self::Q => "Q",
        };
        f.write_str(key)
    }
}

impl FromStr for Property {
    type Err = OracleError;

    /// Keys are **case-insensitive**.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "P" => Ok(Self::P),
            "T" => Ok(Self::T),
            "H" => Ok(Self::H),
            "S" => Ok(Self::S),
            "Q" => Ok(Self::Q),
            _ => Err(OracleError::InvalidInput(format!(
                "Unknown property \"{s}\". Supported: P T H S Q"
            ))),
        }
    }
}

// ── Refrigerants ────────────────────────────────────────────────────

/// Refrigerants compared by the heat-pump analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Refrigerant {
    R134a,
    R32,
    R744,
}

impl Refrigerant {
    pub const ALL: [Refrigerant; 3] = [Self::R134a, Self::R32, Self::R744];

    /// ASHRAE designation, e.g. `"R134a"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::R134a => "R134a",
            Self::R32 => "R32",
            Self::R744 => "R744",
        }
    }

    /// Fluid file stem in REFPROP's `fluids/` directory.
    pub fn refprop_fluid(self) -> &'static str {
        match self {
            Self::R134a => "R134A",
            Self::R32 => "R32",
            Self::R744 => "CO2",
        }
    }
}

impl std::fmt::Display for Refrigerant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Refrigerant {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "R134A" => Ok(Self::R134a),
            "R32" => Ok(Self::R32),
            "R744" | "CO2" => Ok(Self::R744),
            _ => Err(OracleError::FluidNotFound(s.to_string())),
        }
    }
}

// ── Query description ───────────────────────────────────────────────

/// A single oracle request, kept for error messages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub output: Property,
    pub input1: (Property, f64),
    pub input2: (Property, f64),
    pub fluid: Refrigerant,
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}={}, {}={}) for {}",
            self.output, self.input1.0, self.input1.1, self.input2.0, self.input2.1, self.fluid
        )
    }
}

// ── Oracle trait ────────────────────────────────────────────────────

/// Source of real-fluid thermodynamic properties.
pub trait PropertyOracle {
    /// Retrieve `output` at the state fixed by two input properties.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] if the fluid is unknown, the input pair
    /// is unsupported or the state cannot be resolved.
    fn query(
        &self,
        output: Property,
        input1: (Property, f64),
        input2: (Property, f64),
        fluid: Refrigerant,
    ) -> Result<f64>;
}

impl<O: PropertyOracle + ?Sized> PropertyOracle for &O {
    fn query(
        &self,
        output: Property,
        input1: (Property, f64),
        input2: (Property, f64),
        fluid: Refrigerant,
    ) -> Result<f64> {
        (**self).query(output, input1, input2, fluid)
    }
}

impl<O: PropertyOracle + ?Sized> PropertyOracle for Box<O> {
    fn query(
        &self,
        output: Property,
        input1: (Property, f64),
        input2: (Property, f64),
        fluid: Refrigerant,
    ) -> Result<f64> {
        (**self).query(output, input1, input2, fluid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_keys_are_case_insensitive() {
        assert_eq!("p".parse::<Property>().unwrap(), Property::P);
        assert_eq!("Q".parse::<Property>().unwrap(), Property::Q);
        assert!("D".parse::<Property>().is_err());
    }

    #[test]
    fn refrigerant_names_round_trip() {
        for r in Refrigerant::ALL {
            assert_eq!(r.name().parse::<Refrigerant>().unwrap(), r);
        }
        assert_eq!("co2".parse::<Refrigerant>().unwrap(), Refrigerant::R744);
        assert!(matches!(
            "R1234yf".parse::<Refrigerant>(),
            Err(OracleError::FluidNotFound(_))
        ));
    }

    #[test]
    fn r744_maps_to_co2_fluid_file() {
        assert_eq!(Refrigerant::R744.refprop_fluid(), "CO2");
        assert_eq!(Refrigerant::R134a.refprop_fluid(), "R134A");
    }

    #[test]
    fn query_display_names_inputs() {
        let q = Query {
            output: Property::P,
            input1: (Property::T, 288.15),
            input2: (Property::Q, 1.0),
            fluid: Refrigerant::R32,
        };
        assert_eq!(q.to_string(), "P(T=288.15, Q=1) for R32");
    }
}
