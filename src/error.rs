//! Programmer-error taxonomy for the crate's public constructors.
//!
//! Per the error handling design, only the "Programmer error" row of the
//! taxonomy gets a typed `Result`. Domain-edge degeneracies (empty key
//! intersections, short history) and numerical anomalies (clamp engaged) are
//! handled inline with documented sentinels and diagnostics, never here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed twin prime pair ({lo}, {hi}): hi must be lo + 2 (except the (3, 5) exception) and lo < hi")]
    MalformedTwinPrimePair { lo: u64, hi: u64 },

    #[error("prime table is empty: PrimeNormalizer needs at least one twin prime pair")]
    EmptyPrimeTable,

    #[error("invalid population size N = {n}: evolver requires N >= 1")]
    InvalidPopulationSize { n: usize },

    #[error("non-positive step size h = {h}: time step must be strictly positive")]
    NonPositiveStepSize { h: f64 },
}

pub type CoreResult<T> = Result<T, CoreError>;
