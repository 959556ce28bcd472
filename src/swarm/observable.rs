//! Closed set of named observables (§4.3), replacing the source's
//! string-to-string observable registry; see design notes on the observable
//! registry. The "real content" was always a fixed set of scalar functions of
//! agent state; this is that set as a tagged enum.

use crate::swarm::axis::Axis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Observable {
    Position,
    Velocity,
    Energy,
    Phase,
    SwarmCoherence,
}

impl Observable {
    pub const ALL: [Observable; 5] = [
        Observable::Position,
        Observable::Velocity,
        Observable::Energy,
        Observable::Phase,
        Observable::SwarmCoherence,
    ];

    fn index(&self) -> usize {
        match self {
            Observable::Position => 0,
            Observable::Velocity => 1,
            Observable::Energy => 2,
            Observable::Phase => 3,
            Observable::SwarmCoherence => 4,
        }
    }
}

/// A per-agent cache of the last computed value for each observable,
/// recomputed every step. Replacing the source's single scalar
/// `observable_value` field (last writer wins, a latent bug per the design
/// notes) with one slot per observable name.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObservableCache {
    values: [f64; Observable::ALL.len()],
}

impl ObservableCache {
    pub fn get(&self, kind: Observable) -> f64 {
        self.values[kind.index()]
    }

    pub fn set(&mut self, kind: Observable, value: f64) {
        self.values[kind.index()] = value;
    }
}

/// Computes one observable, given current state and up to the last 5 history
/// entries (oldest first) for `SwarmCoherence`'s windowed variance.
///
/// Per the phase-space coordinate pair adopted for open question 1,
/// `position.v` is the dynamical counterpart to `position.x` here, not the
/// agent's kinematic `velocity` field (which starts at zero and is moved
/// only by flocking); `velocity`/`energy`/`phase` all read `position.v`.
pub fn compute(kind: Observable, position: Axis, recent_history: &[Axis]) -> f64 {
    match kind {
        Observable::Position => position.x,
        Observable::Velocity => position.v,
        Observable::Energy => 0.5 * (position.v * position.v + position.x * position.x),
        Observable::Phase => position.v.atan2(position.x),
        Observable::SwarmCoherence => {
            if recent_history.len() < 2 {
                1.0
            } else {
                let window = &recent_history[recent_history.len().saturating_sub(5)..];
                let mean = window.iter().map(|a| a.x).sum::<f64>() / window.len() as f64;
                let var = window.iter().map(|a| (a.x - mean).powi(2)).sum::<f64>() / window.len() as f64;
                1.0 / (1.0 + var)
            }
        }
    }
}
