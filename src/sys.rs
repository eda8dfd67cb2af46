//! Low-level FFI bindings for NIST REFPROP.
//!
//! The REFPROP shared library (DLL/so) is loaded at runtime via
//! [`libloading`] and only the routines the cycle evaluation needs are
//! resolved: path and fluid setup, saturation by temperature or
//! pressure, the TP/PH/PS flashes, `THERMdll` and `INFOdll`.
//!
//! Unlike a raw binding, every routine is wrapped in a method that owns
//! its scratch buffers and hands back a [`Call`] holding the outputs
//! together with REFPROP's `ierr`/`herr` pair.  All `unsafe` is confined
//! to this module.

use std::os::raw::{c_char, c_double, c_int, c_long};
use std::path::Path;

use libloading::Library;

// ── REFPROP constants ───────────────────────────────────────────────
pub const REFPROP_STRLEN: usize = 255;
pub const REFPROP_FILESTR: usize = 10000;
pub const REFPROP_NC_MAX: usize = 20;

/// Molar composition of a pure fluid.
pub fn pure_composition() -> [f64; REFPROP_NC_MAX] {
    let mut z = [0.0; REFPROP_NC_MAX];
    z[0] = 1.0;
    z
}

// ── Error type ──────────────────────────────────────────────────────
#[derive(Debug)]
pub enum RefpropSysError {
    /// The DLL/so could not be found or loaded.
    LibraryLoadFailed(String),
    /// A required symbol was not found in the library.
    SymbolNotFound(String),
}

impl std::fmt::Display for RefpropSysError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LibraryLoadFailed(msg) => write!(f, "REFPROP library load failed: {msg}"),
            Self::SymbolNotFound(sym) => {
                write!(f, "Symbol not found in REFPROP library: {sym}")
            }
        }
    }
}

impl std::error::Error for RefpropSysError {}

// ── Function pointer type aliases ───────────────────────────────────
// Fortran calling convention: every scalar by pointer, hidden string
// lengths appended as trailing `c_long`s.

/// SETPATHdll(hpath, length)
type FnSetpath = unsafe extern "C" fn(*const c_char, c_long);

/// SETUPdll(nc, hfld, hfmix, hrf, ierr, herr, len...)
type FnSetup = unsafe extern "C" fn(
    *const c_int,
    *const c_char,
    *const c_char,
    *const c_char,
    *mut c_int,
    *mut c_char,
    c_long,
    c_long,
    c_long,
    c_long,
);

/// TPFLSHdll / PHFLSHdll / PSFLSHdll:
/// (in1, in2, z, twelve outputs, ierr, herr, herr_length)
type FnFlash = unsafe extern "C" fn(
    *const c_double,
    *const c_double,
    *const c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_int,
    *mut c_char,
    c_long,
);

/// SATTdll / SATPdll: (in, z, kph, out, dl, dv, x, y, ierr, herr, herr_length)
type FnSat = unsafe extern "C" fn(
    *const c_double,
    *const c_double,
    *const c_int,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_int,
    *mut c_char,
    c_long,
);

/// THERMdll(t, d, z, p, e, h, s, cv, cp, w, hjt)
type FnTherm = unsafe extern "C" fn(
    *const c_double,
    *const c_double,
    *const c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
);

/// INFOdll(icomp, wmm, ttrp, tnbpt, tc, pc, dc, zc, acf, dip, rgas)
type FnInfo = unsafe extern "C" fn(
    *const c_int,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
    *mut c_double,
);

// ── Call outcomes ───────────────────────────────────────────────────

/// Outputs of one REFPROP routine plus its status pair.
///
/// `ierr > 0` is a hard error, `ierr < 0` a warning (outputs usable).
#[derive(Debug, Clone)]
pub struct Call<T> {
    pub value: T,
    pub ierr: i32,
    pub herr: String,
}

/// Flash outputs on REFPROP's molar basis (K, kPa, mol/L, J/mol, J/(mol·K)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashState {
    pub temperature: f64,
    pub pressure: f64,
    pub density: f64,
    pub enthalpy: f64,
    pub entropy: f64,
    pub quality: f64,
}

/// Saturation outputs: the unknown of T or P plus both phase densities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationState {
    pub temperature: f64,
    pub pressure: f64,
    pub density_liquid: f64,
    pub density_vapor: f64,
}

/// Bubble (liquid) or dew (vapor) side of the saturation dome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatPhase {
    Bubble = 1,
    Dew = 2,
}

// ── Dynamic library wrapper ─────────────────────────────────────────

/// A loaded REFPROP library with pre-resolved function pointers.
///
/// If any required symbol is missing the constructor fails instead of
/// the first call panicking.
pub struct RefpropLibrary {
    /// Keeps the DLL mapped so the function pointers stay valid.
    _lib: Library,

    fn_setpath: FnSetpath,
    fn_setup: FnSetup,
    fn_tpflsh: FnFlash,
    fn_phflsh: FnFlash,
    fn_psflsh: FnFlash,
    fn_satt: FnSat,
    fn_satp: FnSat,
    fn_therm: FnTherm,
    fn_info: FnInfo,
}

/// Which of the three flash routines to run.
#[derive(Debug, Clone, Copy)]
enum FlashKind {
    Tp,
    Ph,
    Ps,
}

impl RefpropLibrary {
    // ── Symbol resolution ───────────────────────────────────────────

    fn resolve<T: Copy>(lib: &Library, name: &[u8]) -> Result<T, RefpropSysError> {
        // SAFETY: each type alias above matches the Fortran signature of
        // the symbol it is resolved for.
        let sym: libloading::Symbol<T> = unsafe { lib.get(name) }.map_err(|_| {
            let display =
                String::from_utf8_lossy(&name[..name.len().saturating_sub(1)]).to_string();
            RefpropSysError::SymbolNotFound(display)
        })?;
        Ok(*sym)
    }

    fn resolve_all(lib: Library) -> Result<Self, RefpropSysError> {
        Ok(Self {
            fn_setpath: Self::resolve(&lib, b"SETPATHdll\0")?,
            fn_setup: Self::resolve(&lib, b"SETUPdll\0")?,
            fn_tpflsh: Self::resolve(&lib, b"TPFLSHdll\0")?,
            fn_phflsh: Self::resolve(&lib, b"PHFLSHdll\0")?,
            fn_psflsh: Self::resolve(&lib, b"PSFLSHdll\0")?,
            fn_satt: Self::resolve(&lib, b"SATTdll\0")?,
            fn_satp: Self::resolve(&lib, b"SATPdll\0")?,
            fn_therm: Self::resolve(&lib, b"THERMdll\0")?,
            fn_info: Self::resolve(&lib, b"INFOdll\0")?,
            _lib: lib,
        })
    }

    // ── Constructors ────────────────────────────────────────────────

    /// Load the shared library from a REFPROP install directory, falling
    /// back to the system search path.
    ///
    /// On 64-bit Windows `REFPRP64.DLL` is tried first.  A candidate that
    /// exists but fails to load (e.g. architecture mismatch) is skipped.
    pub fn load_from_dir(dir: &Path) -> Result<Self, RefpropSysError> {
        let candidates: &[&str] = if cfg!(target_os = "windows") {
            if cfg!(target_pointer_width = "64") {
                &["REFPRP64.DLL", "REFPROP.DLL", "refprop.dll"]
            } else {
                &["REFPROP.DLL", "refprop.dll", "REFPRP64.DLL"]
            }
        } else if cfg!(target_os = "macos") {
            &["librefprop.dylib", "libREFPROP.dylib"]
        } else {
            &["librefprop.so", "libREFPROP.so"]
        };

        let mut errors = Vec::new();

        for name in candidates {
            let full = dir.join(name);
            if full.exists() {
                match unsafe { Library::new(&full) } {
                    Ok(lib) => return Self::resolve_all(lib),
                    Err(e) => errors.push(format!("{}: {e}", full.display())),
                }
            }
        }

        for name in candidates {
            if let Ok(lib) = unsafe { Library::new(*name) } {
                return Self::resolve_all(lib);
            }
        }

        let detail = if errors.is_empty() {
            format!(
                "No REFPROP library found in {} (tried: {candidates:?})",
                dir.display()
            )
        } else {
            format!(
                "REFPROP library found but could not be loaded:\n  - {}",
                errors.join("\n  - ")
            )
        };
        Err(RefpropSysError::LibraryLoadFailed(detail))
    }

    // ── Setup ───────────────────────────────────────────────────────

    /// Point REFPROP at the directory holding `fluids/` and `HMX.BNC`.
    pub fn set_path(&self, dir: &str) {
        let hpath = to_c_string(dir, REFPROP_STRLEN);
        unsafe { (self.fn_setpath)(hpath.as_ptr(), dir.len() as c_long) };
    }

    /// Load a single pure fluid, e.g. `"R134A.FLD"`.
    pub fn setup_pure(&self, fluid_file: &str) -> Call<()> {
        let nc: c_int = 1;
        let hfld = to_c_string(fluid_file, REFPROP_FILESTR);
        let hfmix = to_c_string("HMX.BNC", REFPROP_STRLEN);
        let hrf = to_c_string("DEF", REFPROP_STRLEN);
        let mut ierr: c_int = 0;
        let mut herr = [0 as c_char; REFPROP_STRLEN];

        unsafe {
            (self.fn_setup)(
                &nc,
                hfld.as_ptr(),
                hfmix.as_ptr(),
                hrf.as_ptr(),
                &mut ierr,
                herr.as_mut_ptr(),
                REFPROP_FILESTR as c_long,
                REFPROP_STRLEN as c_long,
                REFPROP_STRLEN as c_long,
                REFPROP_STRLEN as c_long,
            );
        }
        Call {
            value: (),
            ierr,
            herr: from_c_string(&herr),
        }
    }

    /// Molar mass (g/mol) of component `icomp` (1-based).
    pub fn molar_mass(&self, icomp: i32) -> f64 {
        let mut wmm = 0.0;
        let mut unused = [0.0f64; 9];
        let [ttrp, tnbpt, tc, pc, dc, zc, acf, dip, rgas] = &mut unused;
        unsafe {
            (self.fn_info)(&icomp, &mut wmm, ttrp, tnbpt, tc, pc, dc, zc, acf, dip, rgas);
        }
        wmm
    }

    // ── Flashes ─────────────────────────────────────────────────────

    /// Temperature (K) – pressure (kPa) flash.
    pub fn tp_flash(&self, t: f64, p: f64, z: &[f64; REFPROP_NC_MAX]) -> Call<FlashState> {
        self.flash(FlashKind::Tp, t, p, z)
    }

    /// Pressure (kPa) – enthalpy (J/mol) flash.
    pub fn ph_flash(&self, p: f64, h: f64, z: &[f64; REFPROP_NC_MAX]) -> Call<FlashState> {
        self.flash(FlashKind::Ph, p, h, z)
    }

    /// Pressure (kPa) – entropy (J/(mol·K)) flash.
    pub fn ps_flash(&self, p: f64, s: f64, z: &[f64; REFPROP_NC_MAX]) -> Call<FlashState> {
        self.flash(FlashKind::Ps, p, s, z)
    }

    fn flash(&self, kind: FlashKind, a: f64, b: f64, z: &[f64; REFPROP_NC_MAX]) -> Call<FlashState> {
        let (mut t, mut d, mut dl, mut dv) = (0.0, 0.0, 0.0, 0.0);
        let (mut q, mut e, mut h, mut s, mut cv, mut cp, mut w) =
            (0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let mut x = [0.0f64; REFPROP_NC_MAX];
        let mut y = [0.0f64; REFPROP_NC_MAX];
        let mut ierr: c_int = 0;
        let mut herr = [0 as c_char; REFPROP_STRLEN];
        let herr_len = REFPROP_STRLEN as c_long;

        unsafe {
            match kind {
                // (t, p, z, d, dl, dv, x, y, q, e, h, s, cv, cp, w)
                FlashKind::Tp => (self.fn_tpflsh)(
                    &a, &b, z.as_ptr(), &mut d, &mut dl, &mut dv, x.as_mut_ptr(),
                    y.as_mut_ptr(), &mut q, &mut e, &mut h, &mut s, &mut cv, &mut cp,
                    &mut w, &mut ierr, herr.as_mut_ptr(), herr_len,
                ),
                // (p, h, z, t, d, dl, dv, x, y, q, e, s, cv, cp, w)
                FlashKind::Ph => (self.fn_phflsh)(
                    &a, &b, z.as_ptr(), &mut t, &mut d, &mut dl, &mut dv, x.as_mut_ptr(),
                    y.as_mut_ptr(), &mut q, &mut e, &mut s, &mut cv, &mut cp, &mut w,
                    &mut ierr, herr.as_mut_ptr(), herr_len,
                ),
                // (p, s, z, t, d, dl, dv, x, y, q, e, h, cv, cp, w)
                FlashKind::Ps => (self.fn_psflsh)(
                    &a, &b, z.as_ptr(), &mut t, &mut d, &mut dl, &mut dv, x.as_mut_ptr(),
                    y.as_mut_ptr(), &mut q, &mut e, &mut h, &mut cv, &mut cp, &mut w,
                    &mut ierr, herr.as_mut_ptr(), herr_len,
                ),
            }
        }

        let value = match kind {
            FlashKind::Tp => FlashState {
                temperature: a,
                pressure: b,
                density: d,
                enthalpy: h,
                entropy: s,
                quality: q,
            },
            FlashKind::Ph => FlashState {
                temperature: t,
                pressure: a,
                density: d,
                enthalpy: b,
                entropy: s,
                quality: q,
            },
            FlashKind::Ps => FlashState {
                temperature: t,
                pressure: a,
                density: d,
                enthalpy: h,
                entropy: b,
                quality: q,
            },
        };

        Call {
            value,
            ierr,
            herr: from_c_string(&herr),
        }
    }

    // ── Saturation ──────────────────────────────────────────────────

    /// SATTdll: saturation state at temperature `t` (K).
    pub fn sat_t(&self, t: f64, z: &[f64; REFPROP_NC_MAX], phase: SatPhase) -> Call<SaturationState> {
        let (value, ierr, herr) = self.sat(self.fn_satt, t, z, phase);
        Call {
            value: SaturationState {
                temperature: t,
                pressure: value.0,
                density_liquid: value.1,
                density_vapor: value.2,
            },
            ierr,
            herr,
        }
    }

    /// SATPdll: saturation state at pressure `p` (kPa).
    pub fn sat_p(&self, p: f64, z: &[f64; REFPROP_NC_MAX], phase: SatPhase) -> Call<SaturationState> {
        let (value, ierr, herr) = self.sat(self.fn_satp, p, z, phase);
        Call {
            value: SaturationState {
                temperature: value.0,
                pressure: p,
                density_liquid: value.1,
                density_vapor: value.2,
            },
            ierr,
            herr,
        }
    }

    fn sat(
        &self,
        f: FnSat,
        input: f64,
        z: &[f64; REFPROP_NC_MAX],
        phase: SatPhase,
    ) -> ((f64, f64, f64), i32, String) {
        let kph = phase as c_int;
        let (mut out, mut dl, mut dv) = (0.0, 0.0, 0.0);
        let mut x = [0.0f64; REFPROP_NC_MAX];
        let mut y = [0.0f64; REFPROP_NC_MAX];
        let mut ierr: c_int = 0;
        let mut herr = [0 as c_char; REFPROP_STRLEN];

        unsafe {
            f(
                &input,
                z.as_ptr(),
                &kph,
                &mut out,
                &mut dl,
                &mut dv,
                x.as_mut_ptr(),
                y.as_mut_ptr(),
                &mut ierr,
                herr.as_mut_ptr(),
                REFPROP_STRLEN as c_long,
            );
        }
        ((out, dl, dv), ierr, from_c_string(&herr))
    }

    /// THERMdll: (h, s) at temperature (K) and molar density (mol/L).
    ///
    /// No error return – REFPROP always produces a result.
    pub fn therm(&self, t: f64, d: f64, z: &[f64; REFPROP_NC_MAX]) -> (f64, f64) {
        let (mut p, mut e, mut h, mut s, mut cv, mut cp, mut w, mut hjt) =
            (0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        unsafe {
            (self.fn_therm)(
                &t,
                &d,
                z.as_ptr(),
                &mut p,
                &mut e,
                &mut h,
                &mut s,
                &mut cv,
                &mut cp,
                &mut w,
                &mut hjt,
            );
        }
        (h, s)
    }
}

// ── String helpers ──────────────────────────────────────────────────

/// Zero-padded `c_char` buffer of length `max_len` for a Fortran routine.
pub fn to_c_string(s: &str, max_len: usize) -> Vec<c_char> {
    let mut buffer = vec![0 as c_char; max_len];
    for (dst, src) in buffer.iter_mut().zip(s.bytes().take(max_len - 1)) {
        *dst = src as c_char;
    }
    buffer
}

/// Trimmed Rust `String` from a null-terminated (or full) Fortran buffer.
pub fn from_c_string(buffer: &[c_char]) -> String {
    let bytes: Vec<u8> = buffer
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).trim().to_string()
}
