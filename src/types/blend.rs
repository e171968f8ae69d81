//! Blend optimizer output types

use serde::{Serialize, Serializer};

use super::coal::OxideVector;

/// A single evaluated blend.
///
/// Enumerated candidates always carry integer percentages summing to 100; the
/// current-mix projection carries whatever shares the operator entered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendCandidate {
    /// Percentage share per coal, in input order
    #[serde(rename = "blend", serialize_with = "serialize_percentages")]
    pub percentages: Vec<f64>,
    /// AFT of the blended ash
    pub predicted_aft: f64,
    /// Weighted cost per unit
    #[serde(rename = "cost")]
    pub total_cost: f64,
    /// Weighted gross calorific value
    #[serde(rename = "gcv")]
    pub total_heat_value: f64,
    /// Weighted oxide composition in canonical order
    #[serde(rename = "blended_oxides")]
    pub oxide_blend: OxideVector,
}

impl BlendCandidate {
    /// Sum of all percentage shares.
    pub fn percent_sum(&self) -> f64 {
        self.percentages.iter().sum()
    }
}

/// Write whole-number shares as JSON integers (`[60, 40]` rather than `[60.0, 40.0]`).
#[allow(clippy::cast_possible_truncation)]
fn serialize_percentages<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for &v in values {
        if v.is_finite() && v.fract() == 0.0 && v.abs() <= 1e15 {
            seq.serialize_element(&(v as i64))?;
        } else {
            seq.serialize_element(&v)?;
        }
    }
    seq.end()
}

/// Standalone AFT of one coal used at 100%.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoalAft {
    pub coal: String,
    pub predicted_aft: f64,
}

/// Search bookkeeping reported alongside a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OptimizationStats {
    /// Number of feasible combinations scored
    pub combinations_evaluated: u64,
    /// Wall-clock time spent in the optimizer
    pub elapsed_ms: u64,
}

/// Full optimizer output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    #[serde(rename = "best_aft_blend")]
    pub best_aft: BlendCandidate,
    #[serde(rename = "cheapest_blend")]
    pub cheapest: BlendCandidate,
    #[serde(rename = "balanced_blend")]
    pub balanced: BlendCandidate,
    #[serde(rename = "current_blend")]
    pub current: BlendCandidate,
    #[serde(rename = "individual_coal_afts")]
    pub per_coal_aft: Vec<CoalAft>,
    /// Lenient-coercion notes collected while normalizing the request
    pub warnings: Vec<String>,
    pub stats: OptimizationStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(percentages: Vec<f64>) -> BlendCandidate {
        BlendCandidate {
            percentages,
            predicted_aft: 1300.0,
            total_cost: 12.5,
            total_heat_value: 5400.0,
            oxide_blend: OxideVector::zero(),
        }
    }

    #[test]
    fn whole_percentages_serialize_as_integers() {
        let json = serde_json::to_value(candidate(vec![60.0, 40.0])).unwrap();
        assert_eq!(json["blend"], serde_json::json!([60, 40]));
        assert_eq!(json["cost"], serde_json::json!(12.5));
        assert_eq!(json["gcv"], serde_json::json!(5400.0));
        assert_eq!(json["blended_oxides"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn fractional_current_shares_keep_decimals() {
        let json = serde_json::to_value(candidate(vec![33.5, 66.5])).unwrap();
        assert_eq!(json["blend"], serde_json::json!([33.5, 66.5]));
    }
}
