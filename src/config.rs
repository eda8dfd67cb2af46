//! Constant configuration for a comparison run.
//!
//! The defaults reproduce the warm-weather scenario: 25 °C outside,
//! 20 °C cabin, three refrigerants.  A TOML file named by
//! `HEATPUMP_CONFIG` can replace any of them; absent keys keep their
//! default.
//!
//! ```toml
//! ambient_temp_c = 35.0
//! compressor_efficiency = 0.65
//! refrigerants = ["R134a", "R744"]
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cycle::CycleInputs;
use crate::error::ConfigFileError;
use crate::oracle::Refrigerant;

/// Environment variable naming an optional TOML override file.
pub const CONFIG_ENV: &str = "HEATPUMP_CONFIG";

/// Every constant the cycle evaluation and range estimate depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Refrigerants to compare, in chart order.
    pub refrigerants: Vec<Refrigerant>,
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
    /// Air mass flow across each exchanger (kg/s)
    pub air_mass_flow_kg_s: f64,
    /// Specific heat of air (J/(kg·K))
    pub air_cp_j_kg_k: f64,
    /// Condenser overall heat-transfer coefficient (W/(m²·K))
    pub u_condenser_w_m2_k: f64,
    /// Evaporator overall heat-transfer coefficient (W/(m²·K))
    pub u_evaporator_w_m2_k: f64,
    /// Baseline driving consumption in hot weather (kWh/100 km)
    pub drive_consumption_kwh_per_100km: f64,
    /// Usable battery capacity (kWh)
    pub battery_capacity_kwh: f64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            refrigerants: Refrigerant::ALL.to_vec(),
            ambient_temp_c: 25.0,
            cabin_temp_c: 20.0,
            mass_flow_rate_kg_s: 0.05,
            compressor_efficiency: 0.70,
            evap_buffer_k: 5.0,
            cond_buffer_k: 5.0,
            air_mass_flow_kg_s: 0.1,
            air_cp_j_kg_k: 1005.0,
            u_condenser_w_m2_k: 300.0,
            u_evaporator_w_m2_k: 500.0,
            drive_consumption_kwh_per_100km: 15.0,
            battery_capacity_kwh: 100.0,
        }
    }
}

impl CycleConfig {
    /// Cycle inputs for one refrigerant.
    pub fn inputs_for(&self, refrigerant: Refrigerant) -> CycleInputs {
        CycleInputs {
            refrigerant,
            ambient_temp_c: self.ambient_temp_c,
            cabin_temp_c: self.cabin_temp_c,
            mass_flow_rate_kg_s: self.mass_flow_rate_kg_s,
            compressor_efficiency: self.compressor_efficiency,
            evap_buffer_k: self.evap_buffer_k,
            cond_buffer_k: self.cond_buffer_k,
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str, origin: &str) -> Result<Self, ConfigFileError> {
        toml::from_str(text).map_err(|source| ConfigFileError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Read a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigFileError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text, &path.display().to_string())
    }
}

/// Defaults, or the file named by `HEATPUMP_CONFIG` when set.
///
/// Nothing is ever written back to disk.
pub fn load() -> Result<CycleConfig, ConfigFileError> {
    match env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => CycleConfig::from_path(Path::new(path.trim())),
        _ => Ok(CycleConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_warm_weather_scenario() {
        let cfg = CycleConfig::default();
        assert_eq!(cfg.refrigerants, vec![Refrigerant::R134a, Refrigerant::R32, Refrigerant::R744]);
        assert_eq!(cfg.ambient_temp_c, 25.0);
        assert_eq!(cfg.cabin_temp_c, 20.0);
        assert_eq!(cfg.compressor_efficiency, 0.70);
        assert_eq!(cfg.u_condenser_w_m2_k, 300.0);
        assert_eq!(cfg.u_evaporator_w_m2_k, 500.0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = CycleConfig::from_toml(
            "ambient_temp_c = 35.0\nrefrigerants = [\"R744\", \"R134a\"]\n",
            "inline",
        )
        .unwrap();
        assert_eq!(cfg.ambient_temp_c, 35.0);
        assert_eq!(cfg.refrigerants, vec![Refrigerant::R744, Refrigerant::R134a]);
        assert_eq!(cfg.cabin_temp_c, 20.0);
        assert_eq!(cfg.battery_capacity_kwh, 100.0);
    }

    #[test]
    fn malformed_toml_names_origin() {
        let err = CycleConfig::from_toml("ambient_temp_c = \"hot\"", "bad.toml").unwrap_err();
        assert!(err.to_string().starts_with("cannot parse bad.toml"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CycleConfig::from_path(Path::new("/no/such/heatpump.toml")).unwrap_err();
        assert!(matches!(err, ConfigFileError::Io { .. }));
    }

    #[test]
    fn inputs_carry_shared_constants() {
        let cfg = CycleConfig::default();
        let inputs = cfg.inputs_for(Refrigerant::R32);
        assert_eq!(inputs.refrigerant, Refrigerant::R32);
        assert_eq!(inputs.mass_flow_rate_kg_s, 0.05);
        assert_eq!(inputs.evap_buffer_k, 5.0);
        assert_eq!(inputs.cond_buffer_k, 5.0);
    }
}
