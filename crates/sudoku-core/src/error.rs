//! Error taxonomy.
//!
//! Two of the variants a reveal operation can return are ordinary,
//! user-facing outcomes (`AlreadyComplete`, `NoSolution`); the other two
//! are integration defects that the front end should report as failures.
//! `is_fatal` draws that line.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// The solver's output did not match the expected matrix grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("solver produced no output")]
    Empty,
    #[error("solver output ended unexpectedly")]
    Truncated,
    #[error("unexpected {found:?} at byte {offset}, expected {expected}")]
    Unexpected {
        found: char,
        offset: usize,
        expected: &'static str,
    },
    #[error("unexpected trailing {found:?} after the solution matrix at byte {offset}")]
    Trailing { found: char, offset: usize },
}

/// Failure to run the external solver or to move data to/from it.
#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("failed to launch solver process `{program}`")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("solver process did not finish within {0:?}")]
    Timeout(Duration),
    #[error("solver process exited with {0}")]
    SolverExit(ExitStatus),
    #[error("I/O failure during the solver exchange")]
    Exchange(#[source] io::Error),
}

/// What a solver gateway can fail with.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

/// What a reveal operation can fail with.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The grid is already full; there is nothing to solve.
    #[error("the puzzle is already completely filled")]
    AlreadyComplete,
    /// The solver reported no solution for the current entries.
    #[error("no solution exists for the current entries")]
    NoSolution,
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

impl From<GatewayError> for SolveError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Format(e) => SolveError::Format(e),
            GatewayError::Integration(e) => SolveError::Integration(e),
        }
    }
}

impl SolveError {
    /// True for integration defects, false for ordinary puzzle outcomes.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SolveError::Format(_) | SolveError::Integration(_))
    }
}

pub type Result<T> = std::result::Result<T, SolveError>;
