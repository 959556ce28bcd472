//! Prime-structured initial-condition generation (C1, C2).

pub mod normalizer;
pub mod table;
pub mod twin_pair;

pub use normalizer::{InitialDistribution, PrimeNormalizer, StructuralAnalysis};
pub use twin_pair::TwinPrimePair;
