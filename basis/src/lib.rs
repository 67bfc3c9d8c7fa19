//! Gaussian basis functions and the integral services consumed by the SCF code.

pub mod basis;
pub mod cgto;
pub mod gto;
pub mod helper;
pub mod integrals;
pub mod library;

pub use basis::{AOBasis, Basis, BasisError};
pub use integrals::{BasisSet, OneElectronIntegrals, TwoElectronIntegrals};
