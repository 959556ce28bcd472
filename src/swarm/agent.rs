//! C3: per-agent state and per-agent operations (§4.3).

use crate::swarm::axis::Axis;
use crate::swarm::observable::{self, Observable, ObservableCache};

/// Soft cap on retained history length (§4.3, PathHistory).
pub const HISTORY_CAP: usize = 100;
/// Length retained after truncation once the cap is exceeded.
pub const HISTORY_TRUNCATE_TO: usize = 50;

/// Ordered sequence of position snapshots, oldest first. Never exceeds
/// `HISTORY_CAP`; truncation discards the oldest half so the retained
/// length becomes `HISTORY_TRUNCATE_TO`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathHistory {
    entries: Vec<Axis>,
}

impl PathHistory {
    pub fn push(&mut self, snapshot: Axis) {
        self.entries.push(snapshot);
        if self.entries.len() > HISTORY_CAP {
            let drop_count = self.entries.len() - HISTORY_TRUNCATE_TO;
            self.entries.drain(0..drop_count);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Axis] {
        &self.entries
    }

    /// The most recent up-to-`n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[Axis] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }
}

pub struct SwarmAgent {
    pub id: u64,
    pub position: Axis,
    pub velocity: Axis,
    pub confidence: f64,
    pub path_history: PathHistory,
    observable_cache: ObservableCache,
}

impl SwarmAgent {
    pub fn new(id: u64, position: Axis, velocity: Axis) -> Self {
        SwarmAgent {
            id,
            position,
            velocity,
            confidence: 1.0,
            path_history: PathHistory::default(),
            observable_cache: ObservableCache::default(),
        }
    }

    /// Computes and caches one observable. Pure on `position` and recent
    /// history; idempotent between `record_history` calls (L2).
    pub fn observe(&mut self, kind: Observable) -> f64 {
        let recent = self.path_history.recent(5);
        let value = observable::compute(kind, self.position, recent);
        self.observable_cache.set(kind, value);
        value
    }

    pub fn observable(&self, kind: Observable) -> f64 {
        self.observable_cache.get(kind)
    }

    /// Appends the current position to history, enforcing the bound policy.
    pub fn record_history(&mut self) {
        self.path_history.push(self.position);
    }

    /// EMA confidence update from a prediction/actual pair. `h` must be
    /// strictly positive; a caller passing `h <= 0` here is a programmer
    /// bug (§7), so this fails loudly rather than returning a sentinel.
    pub fn update_confidence(&mut self, predicted: Axis, actual: Axis, h: f64, alpha: f64) {
        assert!(h > 0.0, "update_confidence requires h > 0, got {h}");
        let err = predicted.mean_abs_error(&actual);
        let c_new = (-err / h).exp();
        let c_next = alpha * c_new + (1.0 - alpha) * self.confidence;
        self.confidence = c_next.clamp(0.0, 1.0);
    }

    pub fn distance_to(&self, other: &SwarmAgent) -> f64 {
        self.position.distance_to(&other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // P4: history bound
    #[test]
    fn history_never_exceeds_cap_and_truncates_to_fifty() {
        let mut history = PathHistory::default();
        for i in 0..250 {
            history.push(Axis::new(i as f64, 0.0));
            assert!(history.len() <= HISTORY_CAP);
        }
        assert!(history.len() >= HISTORY_TRUNCATE_TO);
    }

    // S6: after 250 steps, history length in [50, 100]
    #[test]
    fn history_settles_within_bounds_after_many_steps() {
        let mut agent = SwarmAgent::new(0, Axis::default(), Axis::default());
        for _ in 0..250 {
            agent.record_history();
        }
        assert!(agent.path_history.len() >= 50 && agent.path_history.len() <= 100);
    }

    // P3: confidence bound
    #[test]
    fn confidence_stays_in_unit_interval() {
        let mut agent = SwarmAgent::new(0, Axis::default(), Axis::default());
        agent.update_confidence(Axis::new(100.0, 100.0), Axis::new(0.0, 0.0), 1e-4, 0.1);
        assert!((0.0..=1.0).contains(&agent.confidence));
        for _ in 0..50 {
            agent.update_confidence(Axis::new(0.0, 0.0), Axis::new(0.0, 0.0), 1e-4, 0.1);
            assert!((0.0..=1.0).contains(&agent.confidence));
        }
    }

    #[test]
    #[should_panic]
    fn update_confidence_rejects_non_positive_h() {
        let mut agent = SwarmAgent::new(0, Axis::default(), Axis::default());
        agent.update_confidence(Axis::default(), Axis::default(), 0.0, 0.1);
    }

    // B3: oracle identical to predictor saturates confidence at 1.0
    #[test]
    fn confidence_saturates_when_prediction_matches_truth() {
        let mut agent = SwarmAgent::new(0, Axis::new(1.0, 1.0), Axis::default());
        for _ in 0..60 {
            agent.update_confidence(Axis::new(1.0, 1.0), Axis::new(1.0, 1.0), 1e-4, 0.1);
        }
        assert!((agent.confidence - 1.0).abs() < 1e-3);
    }

    // L2: observe is idempotent between history updates
    #[test]
    fn observe_is_idempotent_without_intervening_history_update() {
        let mut agent = SwarmAgent::new(0, Axis::new(2.0, 3.0), Axis::default());
        let a = agent.observe(Observable::Energy);
        let b = agent.observe(Observable::Energy);
        assert_eq!(a, b);
    }
}
