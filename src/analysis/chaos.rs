//! C5: local chaos diagnostics from an agent's retained path history (§4.7).
//!
//! Deliberately named for what it computes rather than what it's modeled
//! after: `mean_log_separation_rate` is a local estimate of exponential
//! trajectory divergence, not a rigorous Lyapunov exponent (no tangent-space
//! propagation, no renormalization); see the design notes on honest naming.

use crate::swarm::axis::Axis;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Stable,
    Chaotic,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChaosReport {
    pub mean_log_separation_rate: f64,
    pub classification: Classification,
    pub samples: usize,
}

/// History windows shorter than this produce no reliable divergence
/// estimate (B4): reported as stable with a rate of exactly zero.
const MIN_HISTORY_FOR_ESTIMATE: usize = 10;

/// Threshold above which the mean log-separation rate is read as chaotic.
const CHAOTIC_THRESHOLD: f64 = 0.1;

/// First-difference floor below which a step is too small to divide by
/// safely; such triples are skipped from the running mean.
const MIN_STEP_DELTA: f64 = 1e-10;

pub struct ChaosAnalyzer;

impl ChaosAnalyzer {
    /// Estimates divergence from the x-axis of a single agent's path
    /// history: for each interior point, compares the first difference
    /// before and after it and averages `ln(d2 / d1)` over triples where
    /// `d1` is above the floor.
    pub fn analyze(history: &[Axis]) -> ChaosReport {
        if history.len() < MIN_HISTORY_FOR_ESTIMATE {
            return ChaosReport {
                mean_log_separation_rate: 0.0,
                classification: Classification::Stable,
                samples: 0,
            };
        }

        let mut sum = 0.0;
        let mut count = 0usize;
        for window in history.windows(3) {
            let d1 = (window[1].x - window[0].x).abs();
            let d2 = (window[2].x - window[1].x).abs();
            if d1 > MIN_STEP_DELTA {
                sum += (d2 / d1).ln();
                count += 1;
            }
        }

        let mean_log_separation_rate = if count > 0 { sum / count as f64 } else { 0.0 };
        let classification = if mean_log_separation_rate > CHAOTIC_THRESHOLD {
            Classification::Chaotic
        } else {
            Classification::Stable
        };

        ChaosReport {
            mean_log_separation_rate,
            classification,
            samples: count,
        }
    }

    /// Path prediction accuracy (§4.7): a naive linear extrapolation
    /// `x_i + 0.001` is scored "correct" against the next recorded point if
    /// within 0.1 absolute error. Returns the fraction correct over all
    /// interior pairs, or `1.0` if there are fewer than two points to pair.
    pub fn prediction_accuracy(history: &[Axis]) -> f64 {
        if history.len() < 2 {
            return 1.0;
        }
        const STEP: f64 = 0.001;
        const TOLERANCE: f64 = 0.1;
        let mut correct = 0usize;
        let total = history.len() - 1;
        for pair in history.windows(2) {
            let predicted = pair[0].x + STEP;
            if (predicted - pair[1].x).abs() < TOLERANCE {
                correct += 1;
            }
        }
        correct as f64 / total as f64
    }
}
