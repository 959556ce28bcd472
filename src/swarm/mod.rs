//! Swarm-Koopman core: per-agent state (C3), flocking/confidence evolution
//! (C4, C5/C6 support), and the oracle hook (§6).

pub mod agent;
pub mod axis;
pub mod evolver;
pub mod observable;
pub mod oracle;

pub use agent::{PathHistory, SwarmAgent, HISTORY_CAP, HISTORY_TRUNCATE_TO};
pub use axis::Axis;
pub use evolver::{aggregate_confidence, KoopmanEigenvalues, SwarmConfidence, SwarmKoopmanEvolver};
pub use observable::{Observable, ObservableCache};
pub use oracle::{IdentityKoopmanOracle, Oracle, ZeroOracle};
