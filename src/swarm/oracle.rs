//! Oracle hook (§6, "Consumes - Oracle hook"): a pure function of
//! `step_index` returning the "true" next state used to drive confidence
//! updates. The spec explicitly permits a trivial all-zeros implementation;
//! anything richer (a cached RK4 benchmark, an injected analytic solution)
//! is a collaborator's concern, not this crate's.

use crate::swarm::axis::Axis;

pub trait Oracle {
    fn state(&self, step_index: usize) -> Axis;
}

/// "A trivial all-zeros implementation" (§6). Confidence will then reflect
/// only the predictor's self-consistency, which is the honest baseline.
#[derive(Default)]
pub struct ZeroOracle;

impl Oracle for ZeroOracle {
    fn state(&self, _step_index: usize) -> Axis {
        Axis::default()
    }
}

/// An oracle equal to the identity Koopman predictor, used by seed
/// scenario S4 to demonstrate confidence saturating toward 1.0 when the
/// predictor is perfectly self-consistent.
pub struct IdentityKoopmanOracle<'a> {
    agents_initial: &'a [Axis],
}

impl<'a> IdentityKoopmanOracle<'a> {
    pub fn new(agents_initial: &'a [Axis]) -> Self {
        IdentityKoopmanOracle { agents_initial }
    }
}

impl Oracle for IdentityKoopmanOracle<'_> {
    fn state(&self, step_index: usize) -> Axis {
        self.agents_initial.get(step_index % self.agents_initial.len().max(1)).copied().unwrap_or_default()
    }
}
