//! Integer percentage combination search
//!
//! Walks every vector `p` with `p[i]` in `bounds[i]` and `sum(p) == 100`,
//! depth-first in coal input order, ascending at each position. The walk is
//! an explicit-stack iterator; branches that can no longer reach exactly 100
//! are cut as soon as they appear.

use crate::types::PercentBounds;

/// Target sum of every blend.
pub const TOTAL_PERCENT: u32 = 100;

/// Bounds of all coals in a blend, with suffix sums for pruning.
#[derive(Debug, Clone)]
pub struct CombinationSpace {
    bounds: Vec<PercentBounds>,
    /// `suffix_min[i]` = sum of `min` over coals `i..`
    suffix_min: Vec<u32>,
    /// `suffix_max[i]` = sum of `max` over coals `i..`
    suffix_max: Vec<u32>,
}

impl CombinationSpace {
    pub fn new(bounds: Vec<PercentBounds>) -> Self {
        let n = bounds.len();
        let mut suffix_min = vec![0u32; n + 1];
        let mut suffix_max = vec![0u32; n + 1];
        for i in (0..n).rev() {
            suffix_min[i] = suffix_min[i + 1].saturating_add(bounds[i].min);
            suffix_max[i] = suffix_max[i + 1].saturating_add(bounds[i].max);
        }
        Self {
            bounds,
            suffix_min,
            suffix_max,
        }
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn bounds(&self) -> &[PercentBounds] {
        &self.bounds
    }

    /// Cheap feasibility test: some combination exists iff the bound sums straddle 100
    /// and no single range is empty.
    pub fn is_feasible(&self) -> bool {
        !self.bounds.is_empty()
            && self.bounds.iter().all(|b| !b.is_empty())
            && self.suffix_min[0] <= TOTAL_PERCENT
            && self.suffix_max[0] >= TOTAL_PERCENT
    }

    /// Exact number of feasible combinations, without enumerating them.
    ///
    /// Dynamic program over partial sums 0..=100; saturates instead of overflowing.
    pub fn count(&self) -> u128 {
        if !self.is_feasible() {
            return 0;
        }

        let width = TOTAL_PERCENT as usize + 1;
        let mut ways = vec![0u128; width];
        ways[0] = 1;

        for b in &self.bounds {
            let mut next = vec![0u128; width];
            for (partial, &count) in ways.iter().enumerate() {
                if count == 0 {
                    continue;
                }
                for v in b.min..=b.max {
                    let s = partial + v as usize;
                    if s >= width {
                        break;
                    }
                    next[s] = next[s].saturating_add(count);
                }
            }
            ways = next;
        }

        ways[TOTAL_PERCENT as usize]
    }

    /// Lazy depth-first walk over every feasible combination.
    pub fn iter(&self) -> CombinationIter<'_> {
        CombinationIter::new(self)
    }
}

/// Depth-first iterator over feasible combinations.
///
/// Yields in lexicographic order: coal input order, ascending percentage at each
/// position. The last coal is never searched; it takes `100 - partial`.
#[derive(Debug)]
pub struct CombinationIter<'a> {
    space: &'a CombinationSpace,
    /// Chosen values for positions `0..stack.len()`
    stack: Vec<u32>,
    /// Next value to try at each position
    cursor: Vec<u32>,
    partial: u32,
    exhausted: bool,
}

impl<'a> CombinationIter<'a> {
    fn new(space: &'a CombinationSpace) -> Self {
        let n = space.len();
        let mut cursor = vec![0u32; n];
        if let Some(first) = space.bounds.first() {
            cursor[0] = first.min;
        }
        Self {
            space,
            stack: Vec::with_capacity(n),
            cursor,
            partial: 0,
            exhausted: !space.is_feasible(),
        }
    }

    /// Smallest admissible value at `depth` starting from `from`, or `None` once the
    /// remaining range cannot lead to a sum of exactly 100.
    fn next_admissible(&self, depth: usize, from: u32) -> Option<u32> {
        let b = self.space.bounds[depth];
        let rest_min = self.space.suffix_min[depth + 1];
        let rest_max = self.space.suffix_max[depth + 1];

        let mut v = from;
        while v <= b.max {
            let s = self.partial.saturating_add(v);
            // Values only grow from here, so overshoot ends the level.
            if s > TOTAL_PERCENT || s.saturating_add(rest_min) > TOTAL_PERCENT {
                return None;
            }
            if s.saturating_add(rest_max) >= TOTAL_PERCENT {
                return Some(v);
            }
            v += 1;
        }
        None
    }

    fn pop(&mut self) {
        if let Some(v) = self.stack.pop() {
            self.partial -= v;
        }
    }
}

impl Iterator for CombinationIter<'_> {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        let n = self.space.len();

        while !self.exhausted {
            let depth = self.stack.len();

            if depth + 1 == n {
                let forced = TOTAL_PERCENT - self.partial;
                let emitted = self.space.bounds[depth].contains(forced).then(|| {
                    let mut combo = self.stack.clone();
                    combo.push(forced);
                    combo
                });
                if depth == 0 {
                    self.exhausted = true;
                } else {
                    self.pop();
                }
                if emitted.is_some() {
                    return emitted;
                }
                continue;
            }

            match self.next_admissible(depth, self.cursor[depth]) {
                Some(v) => {
                    self.cursor[depth] = v + 1;
                    self.stack.push(v);
                    self.partial += v;
                    self.cursor[depth + 1] = self.space.bounds[depth + 1].min;
                }
                None if depth == 0 => self.exhausted = true,
                None => self.pop(),
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(bounds: &[(u32, u32)]) -> CombinationSpace {
        CombinationSpace::new(
            bounds
                .iter()
                .map(|&(min, max)| PercentBounds { min, max })
                .collect(),
        )
    }

    #[test]
    fn single_coal_must_take_everything() {
        assert_eq!(space(&[(0, 100)]).iter().collect::<Vec<_>>(), vec![vec![100]]);
        assert_eq!(space(&[(0, 99)]).iter().count(), 0);
    }

    #[test]
    fn two_unbounded_coals_yield_101_ascending() {
        let combos: Vec<_> = space(&[(0, 100), (0, 100)]).iter().collect();
        assert_eq!(combos.len(), 101);
        assert_eq!(combos[0], vec![0, 100]);
        assert_eq!(combos[100], vec![100, 0]);
        assert!(combos.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn every_combination_sums_to_100_within_bounds() {
        let s = space(&[(10, 40), (0, 50), (5, 60), (0, 30)]);
        let mut seen = 0;
        for combo in s.iter() {
            assert_eq!(combo.iter().sum::<u32>(), 100);
            for (v, b) in combo.iter().zip(s.bounds()) {
                assert!(b.contains(*v), "{v} outside {b:?}");
            }
            seen += 1;
        }
        assert!(seen > 0);
    }

    #[test]
    fn matches_brute_force_cross_product() {
        let s = space(&[(0, 30), (20, 70), (10, 50)]);
        let mut brute = Vec::new();
        for a in 0..=30u32 {
            for b in 20..=70u32 {
                for c in 10..=50u32 {
                    if a + b + c == 100 {
                        brute.push(vec![a, b, c]);
                    }
                }
            }
        }
        assert_eq!(s.iter().collect::<Vec<_>>(), brute);
    }

    #[test]
    fn count_matches_enumeration() {
        for bounds in [
            vec![(0, 100), (0, 100), (0, 100)],
            vec![(10, 40), (0, 50), (5, 60), (0, 30)],
            vec![(33, 33), (33, 33), (33, 34)],
            vec![(60, 60), (60, 60)],
        ] {
            let s = space(&bounds);
            assert_eq!(s.count(), s.iter().count() as u128, "bounds {bounds:?}");
        }
    }

    #[test]
    fn infeasible_fixed_bounds_yield_nothing() {
        let s = space(&[(60, 60), (60, 60)]);
        assert!(!s.is_feasible());
        assert_eq!(s.iter().next(), None);
        assert_eq!(s.count(), 0);
    }

    #[test]
    fn max_sum_below_100_yields_nothing() {
        assert_eq!(space(&[(0, 40), (0, 40)]).iter().count(), 0);
    }

    #[test]
    fn empty_range_yields_nothing() {
        let s = space(&[(50, 40), (0, 100)]);
        assert_eq!(s.iter().count(), 0);
        assert_eq!(s.count(), 0);
    }

    #[test]
    fn no_coals_yields_nothing() {
        assert_eq!(space(&[]).iter().count(), 0);
        assert_eq!(space(&[]).count(), 0);
    }

    #[test]
    fn single_feasible_point() {
        let combos: Vec<_> = space(&[(33, 33), (33, 33), (33, 34)]).iter().collect();
        assert_eq!(combos, vec![vec![33, 33, 34]]);
    }

    #[test]
    fn iteration_is_restartable() {
        let s = space(&[(0, 100), (20, 30), (0, 100)]);
        let first: Vec<_> = s.iter().collect();
        let second: Vec<_> = s.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn unbounded_count_is_stars_and_bars() {
        // C(100 + 4 - 1, 4 - 1) = C(103, 3) = 176_851
        assert_eq!(space(&[(0, 100); 4]).count(), 176_851);
    }
}
