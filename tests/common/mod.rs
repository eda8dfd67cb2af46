#![allow(dead_code)]

use std::cell::RefCell;

use heatpump::oracle::Query;
use heatpump::{OracleError, Property, PropertyOracle, Refrigerant};

// ═══════════════════════════════════════════════════════════════════
//  Two-phase fake fluid
// ═══════════════════════════════════════════════════════════════════
//
//  Psat(T) = P0 · exp(−(L/R)(1/T − 1/T0))
//  h_l = h0 + cl (T − Tref)       s_l = s0 + cl ln(T/Tref)
//  h_v = h_l + L                  s_v = s_l + L/T
//  superheated: h = h_v(Tsat) + cp (T − Tsat), s = s_v(Tsat) + cp ln(T/Tsat)

const T_REF: f64 = 233.15;
const H0: f64 = 150.0e3;
const S0: f64 = 800.0;

struct FakeFluid {
    /// Reference saturation point (Pa, K)
    p0: f64,
    t0: f64,
    /// Latent heat (J/kg)
    latent: f64,
    /// L / R_specific (K)
    l_over_r: f64,
    /// Liquid and vapor heat capacities (J/(kg·K))
    cl: f64,
    cp: f64,
}

fn fluid(r: Refrigerant) -> FakeFluid {
    match r {
        Refrigerant::R134a => FakeFluid {
            p0: 293.0e3,
            t0: 273.15,
            latent: 198.0e3,
            l_over_r: 2430.0,
            cl: 600.0,
            cp: 1000.0,
        },
        Refrigerant::R32 => FakeFluid {
            p0: 813.0e3,
            t0: 273.15,
            latent: 315.0e3,
            l_over_r: 1970.0,
            cl: 900.0,
            cp: 1200.0,
        },
        Refrigerant::R744 => FakeFluid {
            p0: 3.485e6,
            t0: 273.15,
            latent: 230.0e3,
            l_over_r: 1217.0,
            cl: 600.0,
            cp: 1100.0,
        },
    }
}

#[derive(Debug, Clone, Copy)]
struct State {
    t: f64,
    p: f64,
    h: f64,
    s: f64,
    q: f64,
}

impl FakeFluid {
    fn psat(&self, t: f64) -> f64 {
        self.p0 * (-self.l_over_r * (1.0 / t - 1.0 / self.t0)).exp()
    }

    fn tsat(&self, p: f64) -> f64 {
        1.0 / (1.0 / self.t0 - (p / self.p0).ln() / self.l_over_r)
    }

    fn h_liq(&self, t: f64) -> f64 {
        H0 + self.cl * (t - T_REF)
    }

    fn s_liq(&self, t: f64) -> f64 {
        S0 + self.cl * (t / T_REF).ln()
    }

    fn h_vap(&self, t: f64) -> f64 {
        self.h_liq(t) + self.latent
    }

    fn s_vap(&self, t: f64) -> f64 {
        self.s_liq(t) + self.latent / t
    }

    fn saturated(&self, t: f64, p: f64, q: f64) -> State {
        let lerp = |a: f64, b: f64| a + q * (b - a);
        State {
            t,
            p,
            h: lerp(self.h_liq(t), self.h_vap(t)),
            s: lerp(self.s_liq(t), self.s_vap(t)),
            q,
        }
    }

    fn superheated(&self, p: f64, t: f64) -> State {
        let ts = self.tsat(p);
        State {
            t,
            p,
            h: self.h_vap(ts) + self.cp * (t - ts),
            s: self.s_vap(ts) + self.cp * (t / ts).ln(),
            q: 1.0,
        }
    }

    fn ph(&self, p: f64, h: f64) -> Option<State> {
        let ts = self.tsat(p);
        let (hl, hv) = (self.h_liq(ts), self.h_vap(ts));
        if h >= hv {
            Some(self.superheated(p, ts + (h - hv) / self.cp))
        } else if h >= hl {
            Some(self.saturated(ts, p, (h - hl) / (hv - hl)))
        } else {
            None
        }
    }

    fn ps(&self, p: f64, s: f64) -> Option<State> {
        let ts = self.tsat(p);
        let (sl, sv) = (self.s_liq(ts), self.s_vap(ts));
        if s >= sv {
            Some(self.superheated(p, ts * ((s - sv) / self.cp).exp()))
        } else if s >= sl {
            Some(self.saturated(ts, p, (s - sl) / (sv - sl)))
        } else {
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Oracle
// ═══════════════════════════════════════════════════════════════════

/// Deterministic two-phase oracle that records every query.
#[derive(Default)]
pub struct FakeOracle {
    failing: Vec<Refrigerant>,
    queries: RefCell<Vec<Query>>,
}

impl FakeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query for `refrigerant` fails.
    pub fn failing_for(refrigerant: Refrigerant) -> Self {
        Self {
            failing: vec![refrigerant],
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<Query> {
        self.queries.borrow().clone()
    }

    pub fn saturation_pressure(&self, refrigerant: Refrigerant, t: f64) -> f64 {
        fluid(refrigerant).psat(t)
    }
}

impl PropertyOracle for FakeOracle {
    fn query(
        &self,
        output: Property,
        input1: (Property, f64),
        input2: (Property, f64),
        refrigerant: Refrigerant,
    ) -> Result<f64, OracleError> {
        let query = Query {
            output,
            input1,
            input2,
            fluid: refrigerant,
        };
        self.queries.borrow_mut().push(query);

        if self.failing.contains(&refrigerant) {
            return Err(OracleError::FluidNotFound(refrigerant.to_string()));
        }

        let f = fluid(refrigerant);
        let state = match (input1, input2) {
            ((Property::T, t), (Property::Q, q)) => Some(f.saturated(t, f.psat(t), q)),
            ((Property::P, p), (Property::Q, q)) => Some(f.saturated(f.tsat(p), p, q)),
            ((Property::P, p), (Property::H, h)) => f.ph(p, h),
            ((Property::P, p), (Property::S, s)) => f.ps(p, s),
            _ => return Err(OracleError::UnsupportedQuery(query)),
        }
        .ok_or_else(|| OracleError::CalculationFailed(format!("subcooled state for {query}")))?;

        Ok(match output {
            Property::T => state.t,
            Property::P => state.p,
            Property::H => state.h,
            Property::S => state.s,
            Property::Q => state.q,
        })
    }
}
