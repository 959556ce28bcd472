//! swarmkoop-core: chaos-prediction engine combining twin-prime-structured
//! initial conditions, Swarm-Koopman flocking evolution, and the Oates
//! Swarm-Koopman confidence bound `E[C(p)] >= 1 - epsilon`.
//!
//! This crate is the core only: persistence, visualization, config loading,
//! CLI parsing, and the true double-pendulum ODE are external collaborators
//! (see `oracle::Oracle` and `observation::ObservationSink`).

pub mod analysis;
pub mod config;
pub mod error;
pub mod observation;
pub mod orchestrator;
pub mod primes;
pub mod swarm;

pub use analysis::{ChaosAnalyzer, ChaosReport, Classification, EnsembleReport, TheoremValidator};
pub use config::{NumericalParams, RunConfig};
pub use error::{CoreError, CoreResult};
pub use observation::{ObservationKind, ObservationRecord, ObservationSink};
pub use orchestrator::{FinalReport, Orchestrator};
pub use primes::{InitialDistribution, PrimeNormalizer, StructuralAnalysis, TwinPrimePair};
pub use swarm::{Axis, Observable, Oracle, SwarmAgent, SwarmConfidence, SwarmKoopmanEvolver};

/// Initializes the crate's `tracing` subscriber. Mirrors the teacher's
/// `setup_logging`: same default level, same "best effort, never panic if a
/// subscriber is already installed" behavior.
pub fn init_tracing(level: Option<&str>) {
    let filter = level.unwrap_or("info").to_string();
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
