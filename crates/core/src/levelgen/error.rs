//! Error values surfaced by the generation pipeline.

use std::fmt;

/// Precondition violations abort before any work; algorithm failures carry
/// enough context to reproduce with the same seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationError {
    InvalidArgument(String),
    AlgorithmFailure { algorithm: String, seed: u64, detail: String },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::InvalidArgument(detail) => {
                write!(f, "invalid argument: {detail}")
            }
            GenerationError::AlgorithmFailure { algorithm, seed, detail } => {
                write!(f, "generation failed in '{algorithm}' (seed {seed}): {detail}")
            }
        }
    }
}

impl std::error::Error for GenerationError {}
