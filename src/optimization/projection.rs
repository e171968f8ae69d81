//! Baselines reported next to the optimized blends

use crate::types::{BlendCandidate, CoalAft, CoalInput};

use super::aft::calculate_aft;
use super::scoring::evaluate_blend;

/// Metrics of the incumbent mix, weighted by each coal's `current_percent`.
///
/// The shares are taken as entered; they are not rescaled to 100.
pub fn project_current(coals: &[CoalInput]) -> BlendCandidate {
    let shares = coals.iter().map(|c| c.current_percent).collect();
    evaluate_blend(coals, shares)
}

/// AFT of each coal on its own, in input order.
pub fn standalone_afts(coals: &[CoalInput]) -> Vec<CoalAft> {
    coals
        .iter()
        .map(|c| CoalAft {
            coal: c.name.clone(),
            predicted_aft: calculate_aft(&c.oxides),
        })
        .collect()
}
