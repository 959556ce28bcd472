//! Demonstration entry point (§1, "Explicitly Out of Scope: CLI parsing").
//!
//! Fixed parameters, no flag parsing: a real CLI is a collaborator's job.
//! This just wires the default prime table through one orchestrated run and
//! prints the observation stream as newline-delimited JSON, then the final
//! report.

use anyhow::Context;
use swarmkoop_core::config::NumericalParams;
use swarmkoop_core::observation::{ObservationRecord, ObservationSink};
use swarmkoop_core::swarm::oracle::ZeroOracle;
use swarmkoop_core::Orchestrator;

/// Prints each record as one JSON line, matching the "no wire protocol
/// mandated by the core" stance of §6; this is one collaborator's choice.
struct StdoutSink;

impl ObservationSink for StdoutSink {
    fn emit(&mut self, record: ObservationRecord) {
        match serde_json::to_string(&record) {
            Ok(line) => println!("{line}"),
            Err(err) => eprintln!("failed to serialize observation record: {err}"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    swarmkoop_core::init_tracing(None);

    let orchestrator = Orchestrator::with_default_table();
    let oracle = ZeroOracle;
    let mut sink = StdoutSink;
    let params = NumericalParams::default();

    let report = orchestrator
        .run(100, params.steps, params.h, params.metric_period, params.clone(), &oracle, &mut sink)
        .context("orchestrated demonstration run failed")?;

    eprintln!("--- final report ---");
    eprintln!("swarm_confidence : {:.6}", report.swarm_confidence);
    eprintln!("avg_confidence   : {:.6}", report.avg_confidence);
    eprintln!("epsilon          : {:.6}", report.epsilon);
    eprintln!("bound (1-eps)    : {:.6}", report.bound);
    eprintln!("mean_lyapunov    : {:.6}", report.mean_lyapunov);
    eprintln!("classification   : {:?}", report.classification);
    eprintln!(
        "prime coverage   : mean={:.4} stddev={:.4} spread={:.4} chaos_coverage={:.4}",
        report.prime_structural_analysis.mean_position,
        report.prime_structural_analysis.stddev_position,
        report.prime_structural_analysis.spread,
        report.prime_structural_analysis.chaos_coverage
    );

    Ok(())
}
