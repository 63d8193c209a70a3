use crate::policy::LiftCurve;
use crate::types::{BudgetQuery, BudgetResult, MAX_PERCENTILE};

/// Marketing-budget simulator over a [`LiftCurve`].
#[derive(Debug, Clone, Default)]
pub struct BudgetSimulator {
    curve: LiftCurve,
}

impl BudgetSimulator {
    pub fn new(curve: LiftCurve) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &LiftCurve {
        &self.curve
    }

    /// Percentile must already be within `[1, 100]`.
    pub fn simulate(&self, query: &BudgetQuery) -> BudgetResult {
        let pct = query.target_percentile.min(MAX_PERCENTILE);
        BudgetResult {
            efficiency_multiplier: self.efficiency(pct),
            cost_saving_percent: MAX_PERCENTILE - pct,
        }
    }

    fn efficiency(&self, pct: u8) -> f64 {
        let c = &self.curve;
        if pct <= c.top_cutoff_percentile {
            return c.top_lift;
        }
        let remaining = f64::from(MAX_PERCENTILE - pct);
        let span = f64::from(MAX_PERCENTILE - c.top_cutoff_percentile);
        c.baseline_lift + (c.top_lift - c.baseline_lift) * remaining / span
    }
}

/// Simulates with the default top-decile lift curve.
pub fn simulate(query: &BudgetQuery) -> BudgetResult {
    BudgetSimulator::default().simulate(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(pct: u8) -> BudgetResult {
        simulate(&BudgetQuery {
            target_percentile: pct,
        })
    }

    #[test]
    fn top_decile_is_flat_ten_x() {
        assert_eq!(at(1).efficiency_multiplier, 10.0);
        assert_eq!(at(10).efficiency_multiplier, 10.0);
        assert_eq!(at(10).cost_saving_percent, 90);
    }

    #[test]
    fn full_coverage_has_no_lift() {
        let out = at(100);
        assert_eq!(out.efficiency_multiplier, 1.0);
        assert_eq!(out.cost_saving_percent, 0);
    }

    #[test]
    fn midpoint_interpolates_linearly() {
        let out = at(50);
        assert_eq!(out.efficiency_multiplier, 6.0);
        assert_eq!(out.cost_saving_percent, 50);
    }

    #[test]
    fn just_past_cutoff_drops_below_top_lift() {
        let out = at(11);
        assert!((out.efficiency_multiplier - 9.9).abs() < 1e-12);
    }

    #[test]
    fn custom_curve_respects_cutoff() {
        let sim = BudgetSimulator::new(LiftCurve {
            top_cutoff_percentile: 20,
            top_lift: 5.0,
            baseline_lift: 1.0,
        });
        let q = |p| BudgetQuery {
            target_percentile: p,
        };
        assert_eq!(sim.simulate(&q(20)).efficiency_multiplier, 5.0);
        assert_eq!(sim.simulate(&q(60)).efficiency_multiplier, 3.0);
        assert_eq!(sim.simulate(&q(100)).efficiency_multiplier, 1.0);
    }
}
