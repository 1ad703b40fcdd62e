//! Unified error type for the facility arrangement crates.
//!
//! [`FasError`] covers the whole failure taxonomy: invalid input detected
//! before any sampling, per-sample failure markers consumed by the search
//! loop, and fatal solver/logging faults. Per-sample kinds
//! ([`FasError::AreaInfeasible`], [`FasError::RoutingInfeasible`]) are
//! values the worker loop counts and skips; everything else propagates.

use thiserror::Error;

/// Unified error type for all facility arrangement operations.
#[derive(Error, Debug)]
pub enum FasError {
    /// Malformed instance data: name collisions, negative capacities,
    /// flows referencing unknown types, weights out of range.
    #[error("invalid input: {0}")]
    InputInvalid(String),

    /// The placer could not fit every subject into the layout.
    /// Per-sample: counted and skipped, never fatal on its own.
    #[error("not every subject fits into the layout")]
    AreaInfeasible,

    /// No feasible routing exists for the current placement.
    /// Per-sample: counted and skipped, never fatal on its own.
    #[error("no feasible routing for the current placement")]
    RoutingInfeasible,

    /// The complete placement-and-routing problem has no solution.
    #[error("the arrangement problem is infeasible")]
    MilpInfeasible,

    /// External solver fault (setup, licence, numerical breakdown).
    #[error("solver error: {0}")]
    Solver(String),

    /// The log sink could not be opened.
    #[error("logger error: {0}")]
    Logger(String),

    /// I/O errors (solution export, file sinks).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results using [`FasError`].
pub type FasResult<T> = Result<T, FasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_kind() {
        let err = FasError::InputInvalid("duplicate point name `(0,0)`".into());
        assert!(err.to_string().contains("invalid input"));
        assert!(err.to_string().contains("(0,0)"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FasError = io.into();
        assert!(matches!(err, FasError::Io(_)));
    }

    #[test]
    fn question_mark_propagates() {
        fn inner() -> FasResult<()> {
            Err(FasError::MilpInfeasible)
        }
        fn outer() -> FasResult<()> {
            inner()?;
            Ok(())
        }
        assert!(matches!(outer(), Err(FasError::MilpInfeasible)));
    }
}
