//! Coal Record Normalizer
//!
//! Laboratory sheets name the same property many ways: `SiO₂`, `sio2`,
//! `SiO2 (%)`, `Silica`, `Gross Calorific Value (kcal/kg)`. This module folds
//! those headers onto a fixed canonical schema and coerces the loosely typed
//! JSON values (`number | string | null`) into `f64`.
//!
//! Coercion is lenient: anything that cannot be read as a finite number
//! becomes `0.0`, and each fallback is recorded as a human-readable warning
//! so silent zero-filling stays debuggable.

mod aliases;

pub use aliases::{canonical_key, fold_header, CoalProperty};

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::config::defaults::{
    DEFAULT_CURRENT_PERCENT, DEFAULT_MAX_PERCENT, DEFAULT_MIN_PERCENT, MAX_ROW_MAGNITUDE,
};
use crate::types::{BlendEntry, BlendRequest, CoalInput, Oxide, OxideVector, PercentBounds};

/// Structural problems that leniency cannot paper over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("blend list is empty")]
    EmptyBlendList,

    #[error("blend entry #{index} has no coal name")]
    MissingCoalName { index: usize },
}

// ============================================================================
// Numeric coercion
// ============================================================================

/// Outcome of reading one loosely typed JSON value as a number.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// A finite number
    Number(f64),
    /// `null`, an empty string, or an absent field
    Missing,
    /// Present but unreadable (non-numeric text, bool, array, NaN, ...)
    Invalid(String),
}

impl Coerced {
    /// Collapse to a number, substituting `fallback` for anything unusable.
    pub fn or(self, fallback: f64) -> f64 {
        match self {
            Coerced::Number(v) => v,
            Coerced::Missing | Coerced::Invalid(_) => fallback,
        }
    }
}

/// Read a JSON value as a finite `f64`.
///
/// Strings are trimmed and may carry a trailing `%`. A lone comma is taken as
/// a decimal separator (`"12,5"`); alongside a dot it is a thousands separator
/// (`"6,100.5"`).
pub fn coerce_number(value: &Value) -> Coerced {
    match value {
        Value::Null => Coerced::Missing,
        Value::Number(n) => match n.as_f64() {
            Some(v) if v.is_finite() => Coerced::Number(v),
            _ => Coerced::Invalid(n.to_string()),
        },
        Value::String(s) => coerce_str(s),
        other => Coerced::Invalid(other.to_string()),
    }
}

fn coerce_str(raw: &str) -> Coerced {
    let trimmed = raw.trim().trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return Coerced::Missing;
    }

    let cleaned = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.replace(',', "")
    };

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Coerced::Number(v),
        _ => Coerced::Invalid(raw.to_string()),
    }
}

// ============================================================================
// Property maps
// ============================================================================

/// A property map folded onto the canonical schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedProperties {
    /// Canonical property -> value (unreadable values already replaced by 0)
    pub values: BTreeMap<CoalProperty, f64>,
    /// Keys that matched no known alias, in input order
    pub unrecognized: Vec<String>,
    /// Coercion and duplicate-key notes
    pub warnings: Vec<String>,
}

impl NormalizedProperties {
    pub fn get(&self, property: CoalProperty) -> Option<f64> {
        self.values.get(&property).copied()
    }

    /// Canonical oxide vector; absent oxides read as 0.
    pub fn oxides(&self) -> OxideVector {
        let mut v = OxideVector::zero();
        for oxide in Oxide::ALL {
            v.set(oxide, self.get(CoalProperty::Oxide(oxide)).unwrap_or(0.0));
        }
        v
    }

    /// Oxides the source map did not provide at all.
    pub fn missing_oxides(&self) -> Vec<Oxide> {
        Oxide::ALL
            .into_iter()
            .filter(|o| !self.values.contains_key(&CoalProperty::Oxide(*o)))
            .collect()
    }

    /// Gross calorific value, 0 when absent.
    pub fn gcv(&self) -> f64 {
        self.get(CoalProperty::Gcv).unwrap_or(0.0)
    }

    /// Canonical-key view for JSON output.
    pub fn to_canonical_map(&self) -> BTreeMap<&'static str, f64> {
        self.values.iter().map(|(k, v)| (k.key(), *v)).collect()
    }
}

/// Fold a raw property map onto the canonical schema.
///
/// Keys are visited in input order. When two source keys resolve to the same
/// property the first readable value wins and a clash between two readable
/// values is reported. An unreadable entry only holds a zero placeholder
/// until a readable alias turns up.
pub fn normalize_properties(raw: &Map<String, Value>) -> NormalizedProperties {
    let mut out = NormalizedProperties::default();
    // property -> index of the warning that explains its zero placeholder
    let mut placeholders: BTreeMap<CoalProperty, usize> = BTreeMap::new();

    for (key, value) in raw {
        let Some(property) = canonical_key(key) else {
            debug!(key = %key, "Ignoring unrecognized coal property");
            out.unrecognized.push(key.clone());
            continue;
        };

        let reading = match coerce_number(value) {
            Coerced::Number(v) => Ok(v),
            Coerced::Missing => Err(format!("{} ('{key}') is empty", property.key())),
            Coerced::Invalid(text) => Err(format!(
                "{} ('{key}') value {text} is not numeric",
                property.key()
            )),
        };

        match reading {
            Ok(number) => {
                if let Some(slot) = placeholders.remove(&property) {
                    out.warnings[slot] = format!(
                        "{} taken from '{key}', an earlier alias was unreadable",
                        property.key()
                    );
                    out.values.insert(property, number);
                } else if let Some(existing) = out.values.get(&property) {
                    out.warnings.push(format!(
                        "{} given more than once ('{key}' ignored, keeping {existing})",
                        property.key()
                    ));
                } else {
                    out.values.insert(property, number);
                }
            }
            Err(note) if out.values.contains_key(&property) => {
                out.warnings.push(format!("{note}, ignored"));
            }
            Err(note) => {
                placeholders.insert(property, out.warnings.len());
                out.warnings.push(format!("{note}, using 0"));
                out.values.insert(property, 0.0);
            }
        }
    }

    out
}

// ============================================================================
// Request -> optimizer input
// ============================================================================

/// Optimizer-ready coal list plus everything that was quietly defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRequest {
    pub coals: Vec<CoalInput>,
    pub warnings: Vec<String>,
}

/// Convert a raw blend request into optimizer inputs.
///
/// Fails only on structural problems (no rows, nameless row). Everything
/// numeric is coerced leniently with a warning per substitution.
pub fn normalize_request(request: &BlendRequest) -> Result<NormalizedRequest, NormalizeError> {
    if request.blends.is_empty() {
        return Err(NormalizeError::EmptyBlendList);
    }

    let mut out = NormalizedRequest {
        coals: Vec::with_capacity(request.blends.len()),
        warnings: Vec::new(),
    };

    for (index, entry) in request.blends.iter().enumerate() {
        let coal = normalize_entry(index, entry, &mut out.warnings)?;
        out.coals.push(coal);
    }

    if !out.warnings.is_empty() {
        debug!(count = out.warnings.len(), "Blend request normalized with substitutions");
    }
    Ok(out)
}

fn normalize_entry(
    index: usize,
    entry: &BlendEntry,
    warnings: &mut Vec<String>,
) -> Result<CoalInput, NormalizeError> {
    let name = entry
        .coal
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(NormalizeError::MissingCoalName { index })?
        .to_string();

    let props = normalize_properties(&entry.properties);
    warnings.extend(props.warnings.iter().map(|w| format!("{name}: {w}")));

    let mut oxides = props.oxides();
    for oxide in Oxide::ALL {
        let raw = oxides.get(oxide);
        let kept = raw.clamp(0.0, 100.0);
        if kept != raw {
            warnings.push(format!(
                "{name}: {} {raw} outside 0..100 wt%, clamped to {kept}",
                oxide.label()
            ));
            oxides.set(oxide, kept);
        }
    }

    let missing = props.missing_oxides();
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|o| o.label()).collect();
        warnings.push(format!("{name}: missing {} (using 0)", labels.join(", ")));
    }
    if props.get(CoalProperty::Gcv).is_none() {
        warnings.push(format!("{name}: GCV missing (using 0)"));
    }

    let mut field = |label: &str, value: Option<&Value>, fallback: f64| -> f64 {
        match value.map_or(Coerced::Missing, coerce_number) {
            Coerced::Number(v) => v,
            Coerced::Missing => {
                warnings.push(format!("{name}: {label} missing (using {fallback})"));
                fallback
            }
            Coerced::Invalid(text) => {
                warnings.push(format!("{name}: {label} value {text} is not numeric (using {fallback})"));
                fallback
            }
        }
    };

    let min = field("min", entry.min.as_ref(), DEFAULT_MIN_PERCENT);
    let max = field("max", entry.max.as_ref(), DEFAULT_MAX_PERCENT);
    let current = field("current", entry.current.as_ref(), DEFAULT_CURRENT_PERCENT);
    let raw_cost = field("cost", entry.cost.as_ref(), 0.0);

    let cost = if raw_cost < 0.0 {
        warnings.push(format!("{name}: negative cost {raw_cost} (using 0)"));
        0.0
    } else if raw_cost > MAX_ROW_MAGNITUDE {
        warnings.push(format!("{name}: cost {raw_cost} clamped to {MAX_ROW_MAGNITUDE}"));
        MAX_ROW_MAGNITUDE
    } else {
        raw_cost
    };

    let mut heat_value = props.gcv();
    if !(0.0..=MAX_ROW_MAGNITUDE).contains(&heat_value) {
        let kept = heat_value.clamp(0.0, MAX_ROW_MAGNITUDE);
        warnings.push(format!("{name}: GCV {heat_value} clamped to {kept}"));
        heat_value = kept;
    }

    for (label, value) in [("min", min), ("max", max)] {
        let kept = value.clamp(0.0, 100.0);
        if kept != value {
            warnings.push(format!("{name}: {label} {value} clamped to {kept}"));
        }
    }
    let current_kept = current.clamp(0.0, 100.0);
    if current_kept != current {
        warnings.push(format!("{name}: current {current} clamped to {current_kept}"));
    }

    let bounds = PercentBounds::from_raw(min, max);
    if min > max {
        warnings.push(format!("{name}: min {min} exceeds max {max}, bounds swapped"));
    }
    if bounds.is_empty() {
        warnings.push(format!("{name}: range [{min}, {max}] contains no whole percentage"));
    }

    Ok(CoalInput::new(name, oxides)
        .with_cost(cost)
        .with_heat_value(heat_value)
        .with_bounds(bounds)
        .with_current(current_kept))
}
