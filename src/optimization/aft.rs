//! Ash Fusion Temperature regression
//!
//! Piecewise linear model over the nine canonical oxides. The regime is picked
//! by silica + alumina content; each regime has its own intercept and weights.

use serde::Serialize;

use crate::types::{Oxide, OxideVector};

/// SiO2 + Al2O3 below this uses the low-silica fit.
pub const LOW_SILICA_LIMIT: f64 = 55.0;

/// SiO2 + Al2O3 at or above this uses the high-silica fit.
pub const HIGH_SILICA_LIMIT: f64 = 75.0;

/// Regression regime selected by SiO2 + Al2O3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AftRegime {
    /// SiO2 + Al2O3 < 55
    LowSilica,
    /// 55 <= SiO2 + Al2O3 < 75
    MidSilica,
    /// SiO2 + Al2O3 >= 75
    HighSilica,
}

/// Intercept and per-oxide weights of one regime.
struct Coefficients {
    intercept: f64,
    sio2: f64,
    al2o3: f64,
    fe2o3: f64,
    cao: f64,
    mgo: f64,
    alkalis: f64,
    so3: f64,
    tio2: f64,
}

const LOW_SILICA: Coefficients = Coefficients {
    intercept: 1245.0,
    sio2: 1.1,
    al2o3: 0.95,
    fe2o3: -2.5,
    cao: -2.98,
    mgo: -4.5,
    alkalis: -7.89,
    so3: -1.7,
    tio2: -0.63,
};

const MID_SILICA: Coefficients = Coefficients {
    intercept: 1323.0,
    sio2: 1.45,
    al2o3: 0.683,
    fe2o3: -2.39,
    cao: -3.1,
    mgo: -4.5,
    alkalis: -7.49,
    so3: -2.1,
    tio2: -0.63,
};

const HIGH_SILICA: Coefficients = Coefficients {
    intercept: 1395.0,
    sio2: 1.2,
    al2o3: 0.9,
    fe2o3: -2.5,
    cao: -3.1,
    mgo: -4.5,
    alkalis: -7.2,
    so3: -1.7,
    tio2: -0.63,
};

impl AftRegime {
    /// Regime for a given ash composition. The lower boundary of each band is inclusive.
    pub fn for_oxides(oxides: &OxideVector) -> Self {
        let sum_si_al = oxides.silica_alumina();
        if sum_si_al < LOW_SILICA_LIMIT {
            AftRegime::LowSilica
        } else if sum_si_al < HIGH_SILICA_LIMIT {
            AftRegime::MidSilica
        } else {
            AftRegime::HighSilica
        }
    }

    fn coefficients(self) -> &'static Coefficients {
        match self {
            AftRegime::LowSilica => &LOW_SILICA,
            AftRegime::MidSilica => &MID_SILICA,
            AftRegime::HighSilica => &HIGH_SILICA,
        }
    }
}

/// Predicted AFT for an ash composition.
///
/// Inputs are expected to be finite; the normalizer zero-fills anything else.
pub fn calculate_aft(oxides: &OxideVector) -> f64 {
    let c = AftRegime::for_oxides(oxides).coefficients();
    c.intercept
        + c.sio2 * oxides.get(Oxide::SiO2)
        + c.al2o3 * oxides.get(Oxide::Al2O3)
        + c.fe2o3 * oxides.get(Oxide::Fe2O3)
        + c.cao * oxides.get(Oxide::CaO)
        + c.mgo * oxides.get(Oxide::MgO)
        + c.alkalis * oxides.alkalis()
        + c.so3 * oxides.get(Oxide::SO3)
        + c.tio2 * oxides.get(Oxide::TiO2)
}
