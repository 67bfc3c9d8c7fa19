//! Generalized self-consistent field methods (RHF, ROHF and GVB) built on a
//! single energy expression with per-shell occupations and coupling
//! coefficients.

pub mod app;
pub mod config;
pub mod coupling;
pub mod dft;
pub mod error;
pub mod io;
pub mod linalg;
pub mod molecule;
pub mod scf_impl;
pub mod shells;

pub use coupling::{fab, CouplingCoefficients};
pub use error::{Result, ScfError};
pub use molecule::{Atom, Molecule};
pub use scf_impl::{gvb, rhf, rohf, ConvergenceStatus, McScf, ScfOptions, ScfOutcome, SCF};
pub use shells::{ShellCounts, ShellLayout};
