//! C6: Oates Swarm-Koopman confidence theorem validation (§4.6, §9 P7).
//!
//! `aggregate_confidence` lives on the evolver (it needs no simulation
//! context, just the current per-agent confidences); this module adds the
//! ensemble harness: run the same initial conditions through K independent
//! noisy oracles and check the sample mean of `C(p)` against the theorem's
//! `1 - epsilon` bound within a tolerance slack.

use crate::config::NumericalParams;
use crate::primes::InitialDistribution;
use crate::swarm::axis::Axis;
use crate::swarm::evolver::{aggregate_confidence, SwarmConfidence, SwarmKoopmanEvolver};
use crate::swarm::oracle::Oracle;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub struct EnsembleReport {
    pub runs: usize,
    pub mean_c_p: f64,
    pub bound: f64,
    pub tolerance: f64,
    pub satisfies_bound: bool,
    pub per_run: Vec<SwarmConfidence>,
}

/// An oracle around a fixed reference trajectory perturbed by bounded
/// Gaussian noise, precomputed per step so `state` stays a pure function of
/// `step_index` as the `Oracle` contract requires.
struct NoisyFixedOracle {
    noisy_states: Vec<Axis>,
}

impl NoisyFixedOracle {
    fn new(reference: Axis, steps: usize, sigma: f64, rng: &mut impl rand::Rng) -> Self {
        let normal = Normal::new(0.0, sigma).expect("sigma must be finite and non-negative");
        let noisy_states = (0..=steps)
            .map(|_| Axis::new(reference.x + normal.sample(rng), reference.v))
            .collect();
        NoisyFixedOracle { noisy_states }
    }
}

impl Oracle for NoisyFixedOracle {
    fn state(&self, step_index: usize) -> Axis {
        self.noisy_states[step_index.min(self.noisy_states.len() - 1)]
    }
}

pub struct TheoremValidator;

impl TheoremValidator {
    /// Single-run aggregate confidence, re-exposed here so callers doing
    /// theorem work don't need to reach into the evolver module directly.
    pub fn validate_run(confidences: &[f64], epsilon_h: f64) -> SwarmConfidence {
        aggregate_confidence(confidences, epsilon_h)
    }

    /// Runs `runs` independent simulations from the same homogeneous
    /// initial condition, each against an oracle centered on that same
    /// fixed point but perturbed by noise of standard deviation `sigma`,
    /// then checks the ensemble mean of `C(p)` against the theorem bound
    /// (P7).
    pub fn validate_ensemble(
        dist: &InitialDistribution,
        params: &NumericalParams,
        steps: usize,
        runs: usize,
        tolerance: f64,
        sigma: f64,
        seed: u64,
    ) -> EnsembleReport {
        let reference = Axis::new(dist.x.first().copied().unwrap_or(0.0), dist.v.first().copied().unwrap_or(0.0));
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

        let mut per_run = Vec::with_capacity(runs);
        for _ in 0..runs {
            let mut evolver =
                SwarmKoopmanEvolver::initialize(dist, params.clone()).expect("ensemble initial distribution is non-empty");
            let oracle = NoisyFixedOracle::new(reference, steps, sigma, &mut rng);
            let mut sink = crate::observation::NullSink;
            evolver
                .run(steps, params.h, params.metric_period, &oracle, &mut sink)
                .expect("ensemble step size is positive");
            per_run.push(evolver.swarm_confidence());
        }

        let mean_c_p = per_run.iter().map(|c| c.c_p).sum::<f64>() / runs.max(1) as f64;
        let bound = per_run.first().map(|c| c.bound).unwrap_or(1.0);
        let satisfies_bound = mean_c_p >= bound - tolerance;

        info!(runs, mean_c_p, bound, satisfies_bound, "ensemble theorem validation");

        EnsembleReport {
            runs,
            mean_c_p,
            bound,
            tolerance,
            satisfies_bound,
            per_run,
        }
    }
}
