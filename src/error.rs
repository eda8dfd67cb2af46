use thiserror::Error;

use crate::oracle::{Query, Refrigerant};

/// Failure reported by a property oracle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// Error returned by a REFPROP routine (ierr > 0).
    #[error("REFPROP error {code}: {message}")]
    Refprop { code: i32, message: String },

    /// The REFPROP DLL/so could not be loaded.
    #[error("REFPROP library not found: {0}")]
    LibraryNotFound(String),

    /// A fluid `.FLD` file was not found in the fluids directory.
    #[error("Fluid file not found: {0}")]
    FluidNotFound(String),

    /// The oracle cannot resolve this combination of properties.
    #[error("Unsupported query {0}")]
    UnsupportedQuery(Query),

    /// Invalid or out‑of‑range input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Catch‑all for calculation failures.
    #[error("Calculation failed: {0}")]
    CalculationFailed(String),
}

pub type Result<T> = std::result::Result<T, OracleError>;

/// Step of the cycle evaluation at which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    SaturationPressures,
    SaturationBoundaries,
    EvaporatorOutlet,
    CompressorOutlet,
    CondenserOutlet,
    EnergyBalance,
    CarnotLimit,
    AirSide,
    CondenserLmtd,
    EvaporatorLmtd,
    CondenserArea,
    EvaporatorArea,
    Range,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Validation => "input validation",
            Self::SaturationPressures => "saturation pressures",
            Self::SaturationBoundaries => "saturation boundary temperatures",
            Self::EvaporatorOutlet => "evaporator outlet state",
            Self::CompressorOutlet => "compressor outlet state",
            Self::CondenserOutlet => "condenser outlet state",
            Self::EnergyBalance => "energy balance",
            Self::CarnotLimit => "Carnot COP",
            Self::AirSide => "air-side balance",
            Self::CondenserLmtd => "condenser LMTD",
            Self::EvaporatorLmtd => "evaporator LMTD",
            Self::CondenserArea => "condenser area",
            Self::EvaporatorArea => "evaporator area",
            Self::Range => "range estimate",
        };
        f.write_str(name)
    }
}

/// Failure of one refrigerant's cycle evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CycleError {
    /// The oracle could not resolve a requested state.
    #[error("{refrigerant}: property lookup {query} failed at {stage}: {source}")]
    PropertyLookup {
        refrigerant: Refrigerant,
        stage: Stage,
        query: Query,
        #[source]
        source: OracleError,
    },

    /// A zero or negative denominator, or an infeasible temperature pair.
    #[error("{refrigerant}: domain error at {stage}: {detail}")]
    Domain {
        refrigerant: Refrigerant,
        stage: Stage,
        detail: String,
    },

    /// The inputs describe an impossible cycle.
    #[error("{refrigerant}: invalid configuration at {stage}: {detail}")]
    Config {
        refrigerant: Refrigerant,
        stage: Stage,
        detail: String,
    },
}

impl CycleError {
    pub fn refrigerant(&self) -> Refrigerant {
        match self {
            Self::PropertyLookup { refrigerant, .. }
            | Self::Domain { refrigerant, .. }
            | Self::Config { refrigerant, .. } => *refrigerant,
        }
    }
}

/// Failure loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
