//! Candidate scoring and selection
//!
//! Picks three blends from the evaluated set: highest AFT, lowest cost, and the
//! best balance of the two after min-max normalization. All ties go to the
//! candidate that appeared first.

use crate::types::{BlendCandidate, CoalInput, OxideVector};

use super::aft::calculate_aft;

/// Norm assigned to every candidate when an axis has no spread.
pub const NEUTRAL_NORM: f64 = 0.5;

/// Relative tolerance under which a min/max range counts as degenerate.
const DEGENERATE_RANGE_TOLERANCE: f64 = 1e-9;

/// Evaluate a blend with the given percentage shares (weights are `p / 100`).
///
/// Shares are not required to sum to 100; the current-mix projection relies on that.
pub fn evaluate_blend(coals: &[CoalInput], percentages: Vec<f64>) -> BlendCandidate {
    let mut oxide_blend = OxideVector::zero();
    let mut total_cost = 0.0;
    let mut total_heat_value = 0.0;

    for (coal, &pct) in coals.iter().zip(percentages.iter()) {
        let weight = pct / 100.0;
        oxide_blend.add_weighted(&coal.oxides, weight);
        total_cost += weight * coal.cost_per_unit;
        total_heat_value += weight * coal.heat_value;
    }

    BlendCandidate {
        predicted_aft: calculate_aft(&oxide_blend),
        percentages,
        total_cost,
        total_heat_value,
        oxide_blend,
    }
}

/// Observed range of one scoring axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc, v| match acc {
            None => Some(Span { min: v, max: v }),
            Some(s) => Some(Span {
                min: s.min.min(v),
                max: s.max.max(v),
            }),
        })
    }

    /// True when every value in the range is effectively equal.
    ///
    /// A spread within a relative 1e-9 of the larger endpoint counts as zero,
    /// so rounding noise between otherwise equal blends does not rank them.
    pub fn is_degenerate(&self) -> bool {
        let scale = self.max.abs().max(self.min.abs()).max(1.0);
        (self.max - self.min).abs() <= DEGENERATE_RANGE_TOLERANCE * scale
    }

    /// Position of `v` in the range, 0 at `min` and 1 at `max`.
    pub fn normalize(&self, v: f64) -> f64 {
        if self.is_degenerate() {
            NEUTRAL_NORM
        } else {
            (v - self.min) / (self.max - self.min)
        }
    }

    /// Position of `v` measured from `max`, 0 at `max` and 1 at `min`.
    pub fn normalize_inverted(&self, v: f64) -> f64 {
        if self.is_degenerate() {
            NEUTRAL_NORM
        } else {
            (self.max - v) / (self.max - self.min)
        }
    }
}

/// Normalized scores of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalancedScore {
    /// 1.0 for the highest AFT in the set
    pub aft_norm: f64,
    /// 1.0 for the lowest cost in the set
    pub cost_norm: f64,
}

impl BalancedScore {
    pub fn total(&self) -> f64 {
        self.aft_norm + self.cost_norm
    }
}

/// Indices of the three selected candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub best_aft: usize,
    pub cheapest: usize,
    pub balanced: usize,
}

/// Ranges and balanced scores for a candidate set.
#[derive(Debug, Clone)]
pub struct ScoreTable {
    pub aft: Span,
    pub cost: Span,
    pub scores: Vec<BalancedScore>,
}

impl ScoreTable {
    /// Score every candidate; `None` for an empty set.
    pub fn build(candidates: &[BlendCandidate]) -> Option<Self> {
        let aft = Span::of(candidates.iter().map(|c| c.predicted_aft))?;
        let cost = Span::of(candidates.iter().map(|c| c.total_cost))?;
        let scores = candidates
            .iter()
            .map(|c| BalancedScore {
                aft_norm: aft.normalize(c.predicted_aft),
                cost_norm: cost.normalize_inverted(c.total_cost),
            })
            .collect();
        Some(Self { aft, cost, scores })
    }
}

/// Index of the first maximum under `key`.
fn first_max_by(len: usize, key: impl Fn(usize) -> f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for i in 0..len {
        let k = key(i);
        match best {
            Some((_, b)) if k <= b => {}
            _ => best = Some((i, k)),
        }
    }
    best.map(|(i, _)| i)
}

/// Select best-AFT, cheapest and balanced candidates; `None` for an empty set.
pub fn select(candidates: &[BlendCandidate]) -> Option<(Selection, ScoreTable)> {
    let table = ScoreTable::build(candidates)?;
    let n = candidates.len();

    let best_aft = first_max_by(n, |i| candidates[i].predicted_aft)?;
    let cheapest = first_max_by(n, |i| -candidates[i].total_cost)?;
    let balanced = first_max_by(n, |i| table.scores[i].total())?;

    Some((
        Selection {
            best_aft,
            cheapest,
            balanced,
        },
        table,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(aft: f64, cost: f64) -> BlendCandidate {
        BlendCandidate {
            percentages: vec![100.0],
            predicted_aft: aft,
            total_cost: cost,
            total_heat_value: 0.0,
            oxide_blend: OxideVector::zero(),
        }
    }

    #[test]
    fn empty_set_selects_nothing() {
        assert!(select(&[]).is_none());
    }

    #[test]
    fn picks_extremes() {
        let set = [candidate(1300.0, 20.0), candidate(1400.0, 30.0), candidate(1250.0, 10.0)];
        let (sel, _) = select(&set).unwrap();
        assert_eq!(sel.best_aft, 1);
        assert_eq!(sel.cheapest, 2);
    }

    #[test]
    fn balanced_trades_off_both_axes() {
        // aft norms: 0, 1, 0.8 ; cost norms: 1, 0, 0.7
        let set = [candidate(1200.0, 10.0), candidate(1300.0, 20.0), candidate(1280.0, 13.0)];
        let (sel, table) = select(&set).unwrap();
        assert_eq!(sel.balanced, 2);
        assert!((table.scores[2].total() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn ties_go_to_first_occurrence() {
        let set = [candidate(1300.0, 10.0), candidate(1300.0, 10.0), candidate(1300.0, 10.0)];
        let (sel, _) = select(&set).unwrap();
        assert_eq!(sel, Selection { best_aft: 0, cheapest: 0, balanced: 0 });
    }

    #[test]
    fn degenerate_aft_range_is_neutral_not_nan() {
        let set = [candidate(1300.0, 10.0), candidate(1300.0, 20.0)];
        let (_, table) = select(&set).unwrap();
        for s in &table.scores {
            assert_eq!(s.aft_norm, NEUTRAL_NORM);
            assert!(!s.total().is_nan());
        }
        assert_eq!(table.scores[0].cost_norm, 1.0);
        assert_eq!(table.scores[1].cost_norm, 0.0);
    }

    #[test]
    fn rounding_noise_is_degenerate_but_real_spread_is_not() {
        let noise = Span { min: 1300.0, max: 1300.0 + 1e-10 };
        assert!(noise.is_degenerate());
        assert_eq!(noise.normalize(1300.0), NEUTRAL_NORM);

        let tenth = Span { min: 1300.0, max: 1300.1 };
        assert!(!tenth.is_degenerate());
        assert_eq!(tenth.normalize(1300.1), 1.0);
    }

    #[test]
    fn degenerate_cost_range_is_neutral() {
        let set = [candidate(1200.0, 15.0), candidate(1300.0, 15.0)];
        let (sel, table) = select(&set).unwrap();
        assert!(table.scores.iter().all(|s| s.cost_norm == NEUTRAL_NORM));
        assert_eq!(sel.cheapest, 0);
        assert_eq!(sel.balanced, 1);
    }

    #[test]
    fn evaluate_blend_weights_by_percentage() {
        use crate::types::Oxide;

        let a = CoalInput::new("A", OxideVector::new([50.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]))
            .with_cost(10.0)
            .with_heat_value(5000.0);
        let b = CoalInput::new("B", OxideVector::new([30.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]))
            .with_cost(20.0)
            .with_heat_value(6000.0);

        let c = evaluate_blend(&[a, b], vec![60.0, 40.0]);
        assert!((c.total_cost - 14.0).abs() < 1e-9);
        assert!((c.total_heat_value - 5400.0).abs() < 1e-9);
        assert!((c.oxide_blend.get(Oxide::SiO2) - 42.0).abs() < 1e-9);
        assert!((c.oxide_blend.get(Oxide::Al2O3) - 8.0).abs() < 1e-9);
        // 42 + 8 = 50 -> low-silica regime
        assert!((c.predicted_aft - (1245.0 + 1.1 * 42.0 + 0.95 * 8.0)).abs() < 1e-9);
    }
}
