//! Command-line argument parsing for SCF calculations

use super::Method;
use clap::Parser;

/// Generalized SCF (RHF, ROHF, GVB) calculation with YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config_file: String,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// SCF variant to run
    #[arg(long, value_enum)]
    pub method: Option<Method>,

    /// Override maximum SCF cycles
    #[arg(long)]
    pub max_cycle: Option<usize>,

    /// Override convergence threshold on the energy change
    #[arg(long)]
    pub convergence_threshold: Option<f64>,

    /// Number of GVB pairs
    #[arg(long)]
    pub npair: Option<usize>,

    /// Molecular charge (default: 0 for neutral)
    #[arg(long)]
    pub charge: Option<i32>,

    /// Spin multiplicity (2S+1, default: 1 for singlet)
    #[arg(long)]
    pub multiplicity: Option<usize>,

    /// Rotate orbitals between occupied shells after each update
    #[arg(long)]
    pub occupied_rotations: bool,
}
