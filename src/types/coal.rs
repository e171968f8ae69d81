//! Coal source types: canonical oxide vector, percentage bounds, optimizer input

use serde::{Serialize, Serializer};

/// Ash oxides in canonical order.
///
/// The order is load-bearing: `OxideVector` stores values positionally and the
/// AFT regression reads them by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, Serialize)]
pub enum Oxide {
    SiO2,
    Al2O3,
    Fe2O3,
    CaO,
    MgO,
    Na2O,
    K2O,
    SO3,
    TiO2,
}

impl Oxide {
    /// Number of oxides in the canonical vector.
    pub const COUNT: usize = 9;

    /// All oxides in canonical order.
    pub const ALL: [Oxide; Self::COUNT] = [
        Oxide::SiO2,
        Oxide::Al2O3,
        Oxide::Fe2O3,
        Oxide::CaO,
        Oxide::MgO,
        Oxide::Na2O,
        Oxide::K2O,
        Oxide::SO3,
        Oxide::TiO2,
    ];

    /// Position in the canonical vector.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical ASCII label (`"SiO2"`, `"Al2O3"`, ...).
    pub const fn label(self) -> &'static str {
        match self {
            Oxide::SiO2 => "SiO2",
            Oxide::Al2O3 => "Al2O3",
            Oxide::Fe2O3 => "Fe2O3",
            Oxide::CaO => "CaO",
            Oxide::MgO => "MgO",
            Oxide::Na2O => "Na2O",
            Oxide::K2O => "K2O",
            Oxide::SO3 => "SO3",
            Oxide::TiO2 => "TiO2",
        }
    }
}

impl std::fmt::Display for Oxide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ash composition (wt%) in canonical oxide order.
///
/// Serializes as a plain 9-element array, matching the `blended_oxides` wire field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OxideVector([f64; Oxide::COUNT]);

impl OxideVector {
    pub const fn new(values: [f64; Oxide::COUNT]) -> Self {
        Self(values)
    }

    pub const fn zero() -> Self {
        Self([0.0; Oxide::COUNT])
    }

    pub fn get(&self, oxide: Oxide) -> f64 {
        self.0[oxide.index()]
    }

    pub fn set(&mut self, oxide: Oxide, value: f64) {
        self.0[oxide.index()] = value;
    }

    pub const fn as_array(&self) -> &[f64; Oxide::COUNT] {
        &self.0
    }

    /// Accumulate `weight * other` into `self`.
    pub fn add_weighted(&mut self, other: &Self, weight: f64) {
        for (acc, v) in self.0.iter_mut().zip(other.0.iter()) {
            *acc += weight * v;
        }
    }

    /// SiO2 + Al2O3, the regime selector of the AFT regression.
    pub fn silica_alumina(&self) -> f64 {
        self.get(Oxide::SiO2) + self.get(Oxide::Al2O3)
    }

    /// Total alkali content (Na2O + K2O).
    pub fn alkalis(&self) -> f64 {
        self.get(Oxide::Na2O) + self.get(Oxide::K2O)
    }
}

impl From<[f64; Oxide::COUNT]> for OxideVector {
    fn from(values: [f64; Oxide::COUNT]) -> Self {
        Self(values)
    }
}

impl Serialize for OxideVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Inclusive integer percentage range a coal may take in a blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PercentBounds {
    pub min: u32,
    pub max: u32,
}

impl PercentBounds {
    /// Build bounds from raw request numbers.
    ///
    /// Values are clamped to [0, 100], swapped when inverted, then narrowed to
    /// the integers they contain (`ceil(min)`, `floor(max)`). A range holding no
    /// integer comes back with `min > max` and simply admits no value.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_raw(min: f64, max: f64) -> Self {
        let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 };
        let (lo, hi) = {
            let (a, b) = (clamp(min), clamp(max));
            if a <= b { (a, b) } else { (b, a) }
        };
        // lo/hi are finite and within [0, 100]
        Self {
            min: lo.ceil() as u32,
            max: hi.floor() as u32,
        }
    }

    pub const fn full() -> Self {
        Self { min: 0, max: 100 }
    }

    pub const fn fixed(value: u32) -> Self {
        Self { min: value, max: value }
    }

    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    pub const fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// A single coal source as seen by the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct CoalInput {
    /// Display label, echoed back in results
    pub name: String,
    /// Ash oxide composition in canonical order
    pub oxides: OxideVector,
    /// Cost per unit (non-negative, 0 when unknown)
    pub cost_per_unit: f64,
    /// Gross calorific value (0 when unknown)
    pub heat_value: f64,
    /// Allowed share of the blend
    pub bounds: PercentBounds,
    /// Share in the incumbent mix (not required to sum to 100 across coals)
    pub current_percent: f64,
}

impl CoalInput {
    pub fn new(name: impl Into<String>, oxides: OxideVector) -> Self {
        Self {
            name: name.into(),
            oxides,
            cost_per_unit: 0.0,
            heat_value: 0.0,
            bounds: PercentBounds::full(),
            current_percent: 0.0,
        }
    }

    pub fn with_cost(mut self, cost_per_unit: f64) -> Self {
        self.cost_per_unit = cost_per_unit;
        self
    }

    pub fn with_heat_value(mut self, heat_value: f64) -> Self {
        self.heat_value = heat_value;
        self
    }

    pub fn with_bounds(mut self, bounds: PercentBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_current(mut self, current_percent: f64) -> Self {
        self.current_percent = current_percent;
        self
    }
}
