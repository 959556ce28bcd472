//! The observation stream: the one thing the core exposes to the outside
//! world besides the final report. Serialization to JSON/CSV/stdout is a
//! collaborator's job. `ObservationRecord` derives `Serialize` so any
//! `serde`-compatible writer can wrap it, but this crate never picks a wire
//! format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentinel agent id used for system-level (non-per-agent) records.
pub const SYSTEM_AGENT_ID: i64 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    Init,
    PrimePair,
    StepMetric,
    Confidence,
    FinalMetric,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub timestamp: DateTime<Utc>,
    pub step: u64,
    pub agent_id: i64,
    pub kind: ObservationKind,
    pub payload: Map<String, Value>,
}

impl ObservationRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        step: u64,
        agent_id: i64,
        kind: ObservationKind,
        payload: Map<String, Value>,
    ) -> Self {
        ObservationRecord {
            timestamp,
            step,
            agent_id,
            kind,
            payload,
        }
    }

    pub fn system(timestamp: DateTime<Utc>, step: u64, kind: ObservationKind, payload: Map<String, Value>) -> Self {
        Self::new(timestamp, step, SYSTEM_AGENT_ID, kind, payload)
    }
}

/// Receives the observation stream. The core calls `emit` synchronously on
/// the hot path (`run`'s per-step loop): a blocking sink blocks the whole
/// core, per the concurrency model's "suspension points: none internal".
pub trait ObservationSink {
    fn emit(&mut self, record: ObservationRecord);
}

/// Discards every record. Useful when only the final report matters.
#[derive(Default)]
pub struct NullSink;

impl ObservationSink for NullSink {
    fn emit(&mut self, _record: ObservationRecord) {}
}

/// Collects every record in memory, in emission order. Used by tests and by
/// the ensemble harness, which needs the full stream to check determinism (P6).
#[derive(Default)]
pub struct VecSink {
    pub records: Vec<ObservationRecord>,
}

impl VecSink {
    pub fn new() -> Self {
        VecSink::default()
    }
}

impl ObservationSink for VecSink {
    fn emit(&mut self, record: ObservationRecord) {
        self.records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_preserves_emission_order() {
        let mut sink = VecSink::new();
        for step in 0..5 {
            sink.emit(ObservationRecord::system(
                Utc::now(),
                step,
                ObservationKind::StepMetric,
                Map::new(),
            ));
        }
        let steps: Vec<u64> = sink.records.iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn system_records_use_sentinel_agent_id() {
        let rec = ObservationRecord::system(Utc::now(), 0, ObservationKind::Init, Map::new());
        assert_eq!(rec.agent_id, SYSTEM_AGENT_ID);
    }
}
