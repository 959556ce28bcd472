//! Typed configuration surface.
//!
//! Mirrors the teacher's `CogOpsConfig`/`SwarmConfig` split: a nested,
//! serde-serializable struct with a `Default` that reproduces every numeric
//! literal named in the spec. Loading this from a file, env, or CLI flags is
//! a collaborator's job; this module only defines the shape.

use serde::{Deserialize, Serialize};

/// Every tunable named in the spec's "Numerical parameters" paragraph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumericalParams {
    /// Time step.
    pub h: f64,
    /// Number of time steps to advance.
    pub steps: usize,
    /// Emit a `step_metric` observation every this many steps.
    pub metric_period: usize,
    /// Neighbor radius for flocking.
    pub r_neighbor: f64,
    /// Separation radius (must be <= r_neighbor).
    pub r_sep: f64,
    pub cohesion_weight: f64,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    /// Velocity damping factor applied every step.
    pub damping: f64,
    /// EMA smoothing factor for confidence updates.
    pub confidence_alpha: f64,
    /// Soft cap on path history length.
    pub history_cap: usize,
    /// Length retained after truncation once the cap is exceeded.
    pub history_truncate_to: usize,
    /// O(h^4) surrogate term of the theorem bound's epsilon.
    pub epsilon_h: f64,
}

impl Default for NumericalParams {
    fn default() -> Self {
        NumericalParams {
            h: 1e-4,
            steps: 50,
            metric_period: 10,
            r_neighbor: 2.0,
            r_sep: 0.5,
            cohesion_weight: 0.10,
            separation_weight: 1.0,
            alignment_weight: 0.05,
            damping: 0.99,
            confidence_alpha: 0.1,
            history_cap: 100,
            history_truncate_to: 50,
            epsilon_h: 0.01,
        }
    }
}

/// Bundles the numerical parameters with run-level sizing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub num_agents: usize,
    pub numerical: NumericalParams,
    /// Number of independent runs collected for the ensemble theorem check (P7).
    pub ensemble_runs: usize,
    /// Tolerance slack in the ensemble bound check (P7).
    pub ensemble_tolerance: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            num_agents: 100,
            numerical: NumericalParams::default(),
            ensemble_runs: 30,
            ensemble_tolerance: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_literals() {
        let p = NumericalParams::default();
        assert_eq!(p.h, 1e-4);
        assert_eq!(p.r_neighbor, 2.0);
        assert_eq!(p.r_sep, 0.5);
        assert_eq!(p.damping, 0.99);
        assert_eq!(p.confidence_alpha, 0.1);
        assert_eq!(p.history_cap, 100);
        assert_eq!(p.history_truncate_to, 50);
        assert_eq!(p.epsilon_h, 0.01);

        let r = RunConfig::default();
        assert_eq!(r.ensemble_runs, 30);
        assert_eq!(r.ensemble_tolerance, 0.05);
    }
}
