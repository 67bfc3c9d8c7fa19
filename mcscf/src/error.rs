//! Error taxonomy for the SCF library.
//!
//! Configuration problems and malformed inputs are errors. Running out of
//! iterations is not: the driver reports it through `ConvergenceStatus`.

use basis::BasisError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScfError>;

#[derive(Debug, Error, PartialEq)]
pub enum ScfError {
    #[error("invalid shell counts (ncore={ncore}, nopen={nopen}, npair={npair}): {reason}")]
    InvalidShellCounts {
        ncore: usize,
        nopen: usize,
        npair: usize,
        reason: String,
    },

    #[error("closed-shell entry point cannot handle nopen={nopen}, npair={npair}")]
    OpenShellNotSupported { nopen: usize, npair: usize },

    #[error("expected {expected} GVB CI coefficients for {npair} pairs, got {found}")]
    CoefficientMismatch {
        npair: usize,
        expected: usize,
        found: usize,
    },

    #[error("GVB CI coefficient {index} is {value}, outside [0, 1]")]
    CoefficientOutOfRange { index: usize, value: f64 },

    #[error("charge {charge} and multiplicity {multiplicity} are inconsistent with {nelectrons} electrons")]
    InconsistentSpin {
        charge: i32,
        multiplicity: usize,
        nelectrons: i64,
    },

    #[error("{what}: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    DimensionMismatch {
        what: &'static str,
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("{0} is not symmetric")]
    NotSymmetric(&'static str),

    #[error("overlap matrix is singular or not positive definite")]
    SingularOverlap,

    #[error("{0} are linearly dependent")]
    LinearDependence(&'static str),

    #[error(transparent)]
    Basis(#[from] BasisError),
}
