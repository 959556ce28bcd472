//! C7: wires the prime normalizer, the swarm-Koopman evolver, the chaos
//! analyzer, and the theorem validator into a single demonstration run
//! (§2's control-flow diagram). Owns the normalizer; the evolver is built
//! fresh per `run` call since its lifetime is scoped to that run, not to the
//! orchestrator itself.

use crate::analysis::{ChaosAnalyzer, Classification};
use crate::config::NumericalParams;
use crate::error::CoreResult;
use crate::observation::{ObservationKind, ObservationRecord, ObservationSink};
use crate::primes::{PrimeNormalizer, StructuralAnalysis};
use crate::swarm::{Oracle, SwarmKoopmanEvolver};
use chrono::Utc;
use serde_json::{json, Map};
use tracing::info;

/// `{ swarm_confidence, avg_confidence, epsilon, bound, mean_lyapunov,
/// classification, prime_structural_analysis }` (§6, "Exposes - Run control").
#[derive(Clone, Debug, PartialEq)]
pub struct FinalReport {
    pub swarm_confidence: f64,
    pub avg_confidence: f64,
    pub epsilon: f64,
    pub bound: f64,
    pub mean_lyapunov: f64,
    pub classification: Classification,
    pub prime_structural_analysis: StructuralAnalysis,
}

pub struct Orchestrator {
    normalizer: PrimeNormalizer,
}

impl Orchestrator {
    pub fn new(normalizer: PrimeNormalizer) -> Self {
        Orchestrator { normalizer }
    }

    pub fn with_default_table() -> Self {
        Orchestrator::new(PrimeNormalizer::default_table())
    }

    /// `run(num_agents, num_steps, step_size, metric_period) -> FinalReport`.
    /// `oracle` and `sink` are the injected collaborators of §6: the oracle
    /// drives confidence updates, the sink receives the observation stream.
    pub fn run(
        &self,
        num_agents: usize,
        num_steps: usize,
        step_size: f64,
        metric_period: usize,
        params: NumericalParams,
        oracle: &dyn Oracle,
        sink: &mut dyn ObservationSink,
    ) -> CoreResult<FinalReport> {
        info!(num_agents, num_steps, step_size, "orchestrator run starting");

        let mut init_payload = Map::new();
        init_payload.insert("num_agents".into(), json!(num_agents));
        init_payload.insert("num_steps".into(), json!(num_steps));
        init_payload.insert("step_size".into(), json!(step_size));
        init_payload.insert("metric_period".into(), json!(metric_period));
        sink.emit(ObservationRecord::system(Utc::now(), 0, ObservationKind::Init, init_payload));

        let dist = self.normalizer.initial_conditions(num_agents);
        for i in 0..num_agents {
            let mut payload = Map::new();
            payload.insert("x".into(), json!(dist.x[i]));
            payload.insert("v".into(), json!(dist.v[i]));
            sink.emit(ObservationRecord::new(Utc::now(), 0, i as i64, ObservationKind::PrimePair, payload));
        }

        let mut evolver = SwarmKoopmanEvolver::initialize(&dist, params.clone())?;
        evolver.run(num_steps, step_size, metric_period, oracle, sink)?;

        for agent in &evolver.agents {
            let mut payload = Map::new();
            payload.insert("confidence".into(), json!(agent.confidence));
            sink.emit(ObservationRecord::new(
                Utc::now(),
                num_steps as u64,
                agent.id as i64,
                ObservationKind::Confidence,
                payload,
            ));
        }

        // C5: per-agent Lyapunov surrogate, averaged into an ensemble mean
        // (§4.7, "classification: CHAOTIC if ensemble mean lambda > 0.1").
        let lyapunov_estimates: Vec<f64> = evolver
            .agents
            .iter()
            .map(|agent| ChaosAnalyzer::analyze(agent.path_history.as_slice()).mean_log_separation_rate)
            .collect();
        let mean_lyapunov = if lyapunov_estimates.is_empty() {
            0.0
        } else {
            lyapunov_estimates.iter().sum::<f64>() / lyapunov_estimates.len() as f64
        };
        let classification = if mean_lyapunov > 0.1 {
            Classification::Chaotic
        } else {
            Classification::Stable
        };

        // C6: final swarm confidence and bound check.
        let confidence = evolver.swarm_confidence();
        let prime_structural_analysis = self.normalizer.structural_analysis();

        let mut final_payload = Map::new();
        final_payload.insert("swarm_confidence".into(), json!(confidence.c_p));
        final_payload.insert("avg_confidence".into(), json!(confidence.avg_confidence));
        final_payload.insert("epsilon".into(), json!(confidence.epsilon));
        final_payload.insert("bound".into(), json!(confidence.bound));
        final_payload.insert("mean_lyapunov".into(), json!(mean_lyapunov));
        final_payload.insert("classification".into(), json!(format!("{classification:?}")));
        sink.emit(ObservationRecord::system(
            Utc::now(),
            num_steps as u64,
            ObservationKind::FinalMetric,
            final_payload,
        ));

        info!(
            swarm_confidence = confidence.c_p,
            bound = confidence.bound,
            mean_lyapunov,
            classification = ?classification,
            "orchestrator run finished"
        );

        Ok(FinalReport {
            swarm_confidence: confidence.c_p,
            avg_confidence: confidence.avg_confidence,
            epsilon: confidence.epsilon,
            bound: confidence.bound,
            mean_lyapunov,
            classification,
            prime_structural_analysis,
        })
    }
}
