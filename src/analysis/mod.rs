//! Chaos diagnostics (C5) and theorem validation (C6), read-only over the
//! evolver's agents, never mutating them (§3, "borrow (read-only)").

pub mod chaos;
pub mod theorem;

pub use chaos::{ChaosAnalyzer, ChaosReport, Classification};
pub use theorem::{EnsembleReport, TheoremValidator};
