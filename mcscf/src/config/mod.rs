//! Configuration management for SCF calculations
//!
//! YAML input structures, their defaults, and the command-line overrides.

mod args;

pub use args::Args;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Main configuration structure for SCF calculations
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub geometry: Vec<Atom>,
    pub units: Option<Units>,
    pub basis: Option<String>,
    #[serde(default)]
    pub scf_params: ScfParams,
    pub charge: Option<i32>,
    pub multiplicity: Option<usize>,
}

/// Atomic position configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct Atom {
    pub element: String,
    pub coords: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Bohr,
    Angstrom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Rhf,
    Rohf,
    Gvb,
}

/// SCF-specific parameters
#[derive(Debug, Deserialize, Serialize)]
pub struct ScfParams {
    pub method: Option<Method>,
    pub max_cycle: Option<usize>,
    pub convergence_threshold: Option<f64>,
    pub npair: Option<usize>,
    pub gvb_coefficients: Option<Vec<f64>>,
    pub occupied_rotations: Option<bool>,
}

impl Default for ScfParams {
    fn default() -> Self {
        ScfParams {
            method: None,
            max_cycle: Some(25),
            convergence_threshold: Some(1e-8),
            npair: Some(0),
            gvb_coefficients: None,
            occupied_rotations: Some(false),
        }
    }
}

impl ScfParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.max_cycle.is_none() {
            self.max_cycle = defaults.max_cycle;
        }
        if self.convergence_threshold.is_none() {
            self.convergence_threshold = defaults.convergence_threshold;
        }
        if self.npair.is_none() {
            self.npair = defaults.npair;
        }
        if self.occupied_rotations.is_none() {
            self.occupied_rotations = defaults.occupied_rotations;
        }
        self
    }
}

impl Config {
    /// Apply defaults to all configuration sections
    pub fn with_defaults(mut self) -> Self {
        self.scf_params = self.scf_params.with_defaults();
        if self.units.is_none() {
            self.units = Some(Units::default());
        }
        if self.basis.is_none() {
            self.basis = Some("sto-3g".to_string());
        }
        if self.charge.is_none() {
            self.charge = Some(0);
        }
        if self.multiplicity.is_none() {
            self.multiplicity = Some(1);
        }
        self
    }

    pub fn basis_name(&self) -> &str {
        self.basis.as_deref().unwrap_or("sto-3g")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let yaml = "
geometry:
  - element: H
    coords: [0.0, 0.0, 0.0]
  - element: H
    coords: [0.0, 0.0, 1.4]
";
        let config: Config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        assert_eq!(config.geometry.len(), 2);
        assert_eq!(config.units, Some(Units::Bohr));
        assert_eq!(config.basis_name(), "sto-3g");
        assert_eq!(config.scf_params.max_cycle, Some(25));
        assert_eq!(config.scf_params.convergence_threshold, Some(1e-8));
        assert_eq!(config.scf_params.method, None);
        assert_eq!(config.multiplicity, Some(1));
    }

    #[test]
    fn test_gvb_section_parses() {
        let yaml = "
geometry:
  - element: Li
    coords: [0.0, 0.0, 0.0]
  - element: H
    coords: [0.0, 0.0, 1.6]
units: angstrom
basis: STO-3G
scf_params:
  method: gvb
  npair: 1
  gvb_coefficients: [0.95, 0.3]
  max_cycle: 50
";
        let config: Config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        assert_eq!(config.units, Some(Units::Angstrom));
        assert_eq!(config.scf_params.method, Some(Method::Gvb));
        assert_eq!(config.scf_params.npair, Some(1));
        assert_eq!(config.scf_params.gvb_coefficients, Some(vec![0.95, 0.3]));
        assert_eq!(config.scf_params.max_cycle, Some(50));
        assert_eq!(config.scf_params.occupied_rotations, Some(false));
    }
}
