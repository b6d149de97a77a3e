//! Shared search parameters across all optimizers.

/// Bounds and knobs for one search invocation. Set once as defaults on an
/// optimizer, optionally overridden per call.
#[derive(Debug, Clone, Copy)]
pub struct OptimizerParams {
    /// Goal states collected before the search stops.
    pub max_results: usize,
    /// Total popped nodes before the search gives up.
    pub max_search_depth: usize,
    /// Multiplier on accumulated effort inside f = w·g + h.
    pub cost_weight: f64,
    /// Budget filter: prune nodes whose effort exceeds
    /// `baseline · explore_factor`.
    pub explore_factor: f64,
    /// Window (in columns around the goal) for same-line `f{c}` candidates.
    pub f_motion_threshold: usize,
    /// Explicit effort budget. When set it replaces the baseline-derived
    /// budget; sub-searches inherit the caller's global budget this way.
    pub effort_budget: Option<f64>,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            max_results: 5,
            max_search_depth: 100_000,
            cost_weight: 1.0,
            explore_factor: 2.0,
            f_motion_threshold: 2,
            effort_budget: None,
        }
    }
}

impl OptimizerParams {
    pub fn with_max_results(max_results: usize) -> Self {
        Self {
            max_results,
            ..Self::default()
        }
    }

    /// The effective budget given a baseline effort: the explicit budget if
    /// set, else `baseline · explore_factor`, else unbounded (a zero
    /// baseline means no user sequence to scale from).
    pub fn budget(&self, baseline: f64) -> f64 {
        if let Some(budget) = self.effort_budget {
            return budget;
        }
        if baseline > 0.0 {
            baseline * self.explore_factor
        } else {
            f64::INFINITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_prefers_explicit_over_derived() {
        let mut p = OptimizerParams::default();
        assert_eq!(p.budget(10.0), 20.0);
        assert_eq!(p.budget(0.0), f64::INFINITY);
        p.effort_budget = Some(7.5);
        assert_eq!(p.budget(10.0), 7.5);
    }
}
