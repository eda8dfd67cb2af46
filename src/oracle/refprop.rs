use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, Once};

use crate::error::*;
use crate::oracle::{Property, PropertyOracle, Query, Refrigerant};
use crate::sys::*;
use crate::units;

// ── Global lock (REFPROP is NOT thread-safe) ────────────────────────
// Tracks which oracle and fluid REFPROP currently has loaded so
// SETUPdll only re-runs when either changes.
static REFPROP_LOCK: Mutex<Loaded> = Mutex::new(Loaded {
    oracle: 0,
    fluid: None,
    molar_mass: 0.0,
});
static NEXT_ORACLE_ID: AtomicUsize = AtomicUsize::new(1);

struct Loaded {
    oracle: usize,
    fluid: Option<Refrigerant>,
    /// g/mol of `fluid`
    molar_mass: f64,
}

/// Input pairs REFPROP can resolve, normalised to a fixed order.
#[derive(Debug, Clone, Copy)]
enum InputPair {
    /// (T [K], Q)
    TemperatureQuality(f64, f64),
    /// (P [Pa], Q)
    PressureQuality(f64, f64),
    /// (P [Pa], H [J/kg])
    PressureEnthalpy(f64, f64),
    /// (P [Pa], S [J/(kg·K)])
    PressureEntropy(f64, f64),
    /// (T [K], P [Pa])
    TemperaturePressure(f64, f64),
}

impl InputPair {
    fn from_inputs(a: (Property, f64), b: (Property, f64)) -> Option<Self> {
        use Property::*;
        let pair = match (a.0, b.0) {
            (T, Q) => Self::TemperatureQuality(a.1, b.1),
            (Q, T) => Self::TemperatureQuality(b.1, a.1),
            (P, Q) => Self::PressureQuality(a.1, b.1),
            (Q, P) => Self::PressureQuality(b.1, a.1),
            (P, H) => Self::PressureEnthalpy(a.1, b.1),
            (H, P) => Self::PressureEnthalpy(b.1, a.1),
            (P, S) => Self::PressureEntropy(a.1, b.1),
            (S, P) => Self::PressureEntropy(b.1, a.1),
            (T, P) => Self::TemperaturePressure(a.1, b.1),
            (P, T) => Self::TemperaturePressure(b.1, a.1),
            _ => return None,
        };
        Some(pair)
    }
}

/// A resolved state on REFPROP's molar basis.
struct MolarState {
    temperature: f64,
    pressure: f64,
    enthalpy: f64,
    entropy: f64,
    quality: f64,
}

// ── Oracle ──────────────────────────────────────────────────────────

/// [`PropertyOracle`] backed by a local NIST REFPROP installation.
///
/// Accepts and returns SI mass-basis values (K, Pa, J/kg, J/(kg·K));
/// conversion to REFPROP's molar units uses the loaded fluid's molar
/// mass.
///
/// ```no_run
/// use heatpump::oracle::refprop::RefpropOracle;
/// use heatpump::{Property, PropertyOracle, Refrigerant};
///
/// let oracle = RefpropOracle::from_env()?;
/// let p = oracle.query(Property::P, (Property::T, 288.15), (Property::Q, 1.0), Refrigerant::R134a)?;
/// println!("Psat(15 °C) = {:.0} Pa", p);
/// # Ok::<(), heatpump::OracleError>(())
/// ```
pub struct RefpropOracle {
    id: usize,
    lib: RefpropLibrary,
    refprop_path: PathBuf,
}

impl RefpropOracle {
    // ================================================================
    //  Constructors
    // ================================================================

    /// Open REFPROP from the directory holding the shared library and
    /// the `fluids/` folder.
    pub fn new(refprop_path: &str) -> Result<Self> {
        let path = PathBuf::from(refprop_path);
        if !path.exists() {
            return Err(OracleError::LibraryNotFound(refprop_path.to_string()));
        }

        let lib = RefpropLibrary::load_from_dir(&path)
            .map_err(|e| OracleError::LibraryNotFound(e.to_string()))?;

        Ok(Self {
            id: NEXT_ORACLE_ID.fetch_add(1, Ordering::Relaxed),
            lib,
            refprop_path: path,
        })
    }

    /// Open REFPROP from `REFPROP_PATH` (process environment or `.env`),
    /// falling back to the standard install locations.
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        let refprop_path = find_refprop_path()?;
        Self::new(&refprop_path)
    }

    /// The REFPROP directory in use.
    pub fn path(&self) -> &Path {
        &self.refprop_path
    }

    // ================================================================
    //  Lock and setup helpers
    // ================================================================

    /// Acquire the global REFPROP lock, recovering gracefully from
    /// poisoning instead of panicking.
    fn lock_refprop() -> Result<MutexGuard<'static, Loaded>> {
        REFPROP_LOCK.lock().map_err(|_| {
            OracleError::CalculationFailed(
                "REFPROP global lock is poisoned (a previous call panicked)".into(),
            )
        })
    }

    fn fluid_file_exists(&self, fluid: Refrigerant) -> bool {
        let fld = format!("{}.FLD", fluid.refprop_fluid());
        let base = &self.refprop_path;
        base.join("fluids").join(&fld).exists() || base.join("FLUIDS").join(&fld).exists()
    }

    /// Load `fluid` into REFPROP unless it is already active.
    /// **Caller must hold REFPROP_LOCK.**
    fn ensure_setup(&self, loaded: &mut Loaded, fluid: Refrigerant) -> Result<()> {
        if loaded.oracle == self.id && loaded.fluid == Some(fluid) {
            return Ok(());
        }
        if !self.fluid_file_exists(fluid) {
            return Err(OracleError::FluidNotFound(format!(
                "{fluid} ({}.FLD not in {}/fluids)",
                fluid.refprop_fluid(),
                self.refprop_path.display()
            )));
        }

        self.lib.set_path(&self.refprop_path.to_string_lossy());
        let call = self.lib.setup_pure(&format!("{}.FLD", fluid.refprop_fluid()));
        // A failed setup leaves REFPROP in an unknown state.
        loaded.fluid = None;
        check_err(call.ierr, &call.herr)?;

        loaded.oracle = self.id;
        loaded.fluid = Some(fluid);
        loaded.molar_mass = self.lib.molar_mass(1);
        Ok(())
    }

    // ================================================================
    //  Inner flashes (caller MUST hold REFPROP_LOCK and have called
    //  ensure_setup; all values molar)
    // ================================================================

    fn flash(&self, pair: InputPair, molar_mass: f64) -> Result<MolarState> {
        let z = pure_composition();
        let to_molar = |x| units::specific_to_refprop(x, molar_mass);

        let state = match pair {
            InputPair::TemperatureQuality(t, q) => {
                let phase = saturation_side(q)?;
                let sat = self.lib.sat_t(t, &z, phase);
                check_err(sat.ierr, &sat.herr)?;
                self.interpolate_quality(sat.value, q, &z)
            }
            InputPair::PressureQuality(p, q) => {
                let phase = saturation_side(q)?;
                let sat = self.lib.sat_p(units::pressure_to_refprop(p), &z, phase);
                check_err(sat.ierr, &sat.herr)?;
                self.interpolate_quality(sat.value, q, &z)
            }
            InputPair::PressureEnthalpy(p, h) => {
                let call = self.lib.ph_flash(units::pressure_to_refprop(p), to_molar(h), &z);
                check_err(call.ierr, &call.herr)?;
                from_flash(call.value)
            }
            InputPair::PressureEntropy(p, s) => {
                let call = self.lib.ps_flash(units::pressure_to_refprop(p), to_molar(s), &z);
                check_err(call.ierr, &call.herr)?;
                from_flash(call.value)
            }
            InputPair::TemperaturePressure(t, p) => {
                let call = self.lib.tp_flash(t, units::pressure_to_refprop(p), &z);
                check_err(call.ierr, &call.herr)?;
                from_flash(call.value)
            }
        };
        Ok(state)
    }

    /// Interpolate between saturated liquid and vapor using quality.
    ///
    /// The saturation pressure from SATTdll/SATPdll is kept as-is rather
    /// than the one THERMdll recomputes.
    fn interpolate_quality(
        &self,
        sat: SaturationState,
        q: f64,
        z: &[f64; REFPROP_NC_MAX],
    ) -> MolarState {
        let (h_liq, s_liq) = self.lib.therm(sat.temperature, sat.density_liquid, z);
        let (h_vap, s_vap) = self.lib.therm(sat.temperature, sat.density_vapor, z);
        let lerp = |a: f64, b: f64| a * (1.0 - q) + b * q;

        MolarState {
            temperature: sat.temperature,
            pressure: sat.pressure,
            enthalpy: lerp(h_liq, h_vap),
            entropy: lerp(s_liq, s_vap),
            quality: q,
        }
    }
}

impl PropertyOracle for RefpropOracle {
    /// Supported input pairs: **(T,Q) (P,Q) (P,H) (P,S) (T,P)**, either order.
    fn query(
        &self,
        output: Property,
        input1: (Property, f64),
        input2: (Property, f64),
        fluid: Refrigerant,
    ) -> Result<f64> {
        validate_finite(input1)?;
        validate_finite(input2)?;

        let pair = InputPair::from_inputs(input1, input2).ok_or(OracleError::UnsupportedQuery(
            Query {
                output,
                input1,
                input2,
                fluid,
            },
        ))?;

        let mut loaded = Self::lock_refprop()?;
        self.ensure_setup(&mut loaded, fluid)?;
        let molar_mass = loaded.molar_mass;
        let state = self.flash(pair, molar_mass)?;

        let value = match output {
            Property::T => state.temperature,
            Property::P => units::pressure_from_refprop(state.pressure),
            Property::H => units::specific_from_refprop(state.enthalpy, molar_mass),
            Property::S => units::specific_from_refprop(state.entropy, molar_mass),
            Property::Q => state.quality,
        };
        Ok(value)
    }
}

// ================================================================
//  Helpers
// ================================================================

fn from_flash(f: FlashState) -> MolarState {
    MolarState {
        temperature: f.temperature,
        pressure: f.pressure,
        enthalpy: f.enthalpy,
        entropy: f.entropy,
        quality: f.quality,
    }
}

/// Bubble side for Q < 0.5, dew side otherwise.
fn saturation_side(q: f64) -> Result<SatPhase> {
    if !(0.0..=1.0).contains(&q) {
        return Err(OracleError::InvalidInput(format!(
            "quality must be within [0, 1], got {q}"
        )));
    }
    Ok(if q >= 0.5 { SatPhase::Dew } else { SatPhase::Bubble })
}

/// Ensure a value is a finite number (not NaN, not ±Infinity).
fn validate_finite(input: (Property, f64)) -> Result<()> {
    if !input.1.is_finite() {
        return Err(OracleError::InvalidInput(format!(
            "{} must be a finite number, got {}",
            input.0, input.1
        )));
    }
    Ok(())
}

/// Check the REFPROP error code.
///
/// - `ierr > 0`: hard error → returns `Err(OracleError::Refprop)`
/// - `ierr < 0`: warning → logs to stderr, returns `Ok(())`
/// - `ierr == 0`: success → returns `Ok(())`
fn check_err(ierr: i32, herr: &str) -> Result<()> {
    if ierr > 0 {
        return Err(OracleError::Refprop {
            code: ierr,
            message: herr.to_string(),
        });
    }
    if ierr < 0 {
        eprintln!("[refprop] warning {ierr}: {herr}");
    }
    Ok(())
}

// ── .env loading (once) ──────────────────────────────────────────

fn load_dotenv() {
    static DOTENV_INIT: Once = Once::new();
    DOTENV_INIT.call_once(|| {
        if dotenvy::dotenv().is_ok() {
            return;
        }
        if let Ok(exe) = env::current_exe() {
            if let Some(dir) = exe.parent() {
                let p = dir.join(".env");
                if p.exists() {
                    let _ = dotenvy::from_path(&p);
                }
            }
        }
    });
}

// ── Path discovery ───────────────────────────────────────────────

fn find_refprop_path() -> Result<String> {
    let mut tried = Vec::<String>::new();

    if let Ok(path) = env::var("REFPROP_PATH") {
        if Path::new(&path).exists() {
            return Ok(path);
        }
        tried.push(format!("REFPROP_PATH={path} (directory does not exist)"));
    }

    #[cfg(target_os = "windows")]
    let standard_paths = [r"C:\Program Files (x86)\REFPROP", r"C:\Program Files\REFPROP"];
    #[cfg(target_os = "macos")]
    let standard_paths = ["/Applications/REFPROP", "/opt/refprop"];
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let standard_paths = ["/opt/refprop", "/usr/local/lib/refprop"];

    for path in standard_paths {
        if Path::new(path).exists() {
            return Ok(path.to_string());
        }
        tried.push(format!("{path} (not found)"));
    }

    Err(OracleError::LibraryNotFound(format!(
        "REFPROP directory not found. Tried:\n  - {}\n\
         Set REFPROP_PATH to the directory containing the REFPROP library and the fluids/ folder.",
        tried.join("\n  - ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_pairs_accept_either_order() {
        let a = InputPair::from_inputs((Property::Q, 1.0), (Property::T, 288.15));
        assert!(matches!(a, Some(InputPair::TemperatureQuality(t, q)) if t == 288.15 && q == 1.0));

        let b = InputPair::from_inputs((Property::S, 1717.0), (Property::P, 7.7e5));
        assert!(matches!(b, Some(InputPair::PressureEntropy(p, s)) if p == 7.7e5 && s == 1717.0));
    }

    #[test]
    fn unsupported_pairs_are_rejected() {
        assert!(InputPair::from_inputs((Property::H, 4.0e5), (Property::S, 1700.0)).is_none());
        assert!(InputPair::from_inputs((Property::T, 300.0), (Property::T, 300.0)).is_none());
    }

    #[test]
    fn quality_selects_saturation_side() {
        assert_eq!(saturation_side(0.0).unwrap(), SatPhase::Bubble);
        assert_eq!(saturation_side(1.0).unwrap(), SatPhase::Dew);
        assert!(saturation_side(1.5).is_err());
    }

    #[test]
    fn non_finite_inputs_are_invalid() {
        assert!(matches!(
            validate_finite((Property::T, f64::NAN)),
            Err(OracleError::InvalidInput(_))
        ));
        assert!(validate_finite((Property::P, 1.0e5)).is_ok());
    }

    #[test]
    fn refprop_error_codes() {
        assert!(check_err(0, "").is_ok());
        assert!(check_err(-1, "near critical point").is_ok());
        assert_eq!(
            check_err(1, "temperature below triple point"),
            Err(OracleError::Refprop {
                code: 1,
                message: "temperature below triple point".into()
            })
        );
    }

    #[test]
    fn missing_directory_is_reported() {
        let err = RefpropOracle::new("/definitely/not/a/refprop/dir")
            .err()
            .unwrap();
        assert!(matches!(err, OracleError::LibraryNotFound(_)));
    }
}
