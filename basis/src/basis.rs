#![allow(non_snake_case)]

use nalgebra::Vector3;
use std::sync::Arc;
use thiserror::Error;

/// Primitive integral operations shared by Gaussian primitives and their contractions.
pub trait Basis {
    fn evaluate(&self, r: &Vector3<f64>) -> f64;
    /// Overlap <a|b>
    fn Sab(a: &Self, b: &Self) -> f64;
    /// Kinetic energy <a|-1/2 ∇²|b>
    fn Tab(a: &Self, b: &Self) -> f64;
    /// Nuclear attraction <a|-Z/|r-R||b>
    fn Vab(a: &Self, b: &Self, R: Vector3<f64>, Z: u32) -> f64;
    /// Electron repulsion (ab|cd) in chemists' notation
    fn JKabcd(a: &Self, b: &Self, c: &Self, d: &Self) -> f64;
}

/// An atom-centred collection of basis functions.
pub trait AOBasis {
    type BasisType: Basis;

    fn basis_size(&self) -> usize;
    fn get_basis(&self) -> Vec<Arc<Self::BasisType>>;
    fn set_center(&mut self, center: Vector3<f64>);
    fn get_center(&self) -> Option<Vector3<f64>>;
}

#[derive(Debug, Error, PartialEq)]
pub enum BasisError {
    #[error("unknown element symbol '{0}'")]
    UnknownElement(String),
    #[error("basis set '{name}' has no data for {element}")]
    MissingElement { name: String, element: String },
    #[error("unsupported basis set '{0}'")]
    UnsupportedBasis(String),
    #[error("unsupported shell type '{0}'")]
    UnsupportedShell(String),
    #[error("malformed basis line: '{0}'")]
    MalformedLine(String),
    #[error("expected {expected} values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}
