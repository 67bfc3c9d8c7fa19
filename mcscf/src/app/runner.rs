use crate::config::{Args, Config, Method};
use crate::molecule::Molecule;
use crate::scf_impl::{gvb, rhf, rohf, ScfOptions, ScfOutcome};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

fn configure(args: &Args, config: &Config) -> ScfOptions {
    let defaults = ScfOptions::default();
    let params = &config.scf_params;
    ScfOptions {
        max_iter: args.max_cycle.or(params.max_cycle).unwrap_or(defaults.max_iter),
        convergence_threshold: args
            .convergence_threshold
            .or(params.convergence_threshold)
            .unwrap_or(defaults.convergence_threshold),
        occupied_rotations: args.occupied_rotations
            || params.occupied_rotations.unwrap_or(defaults.occupied_rotations),
    }
}

pub fn run_method(
    method: Method,
    molecule: &Molecule,
    args: &Args,
    config: &Config,
) -> Result<ScfOutcome> {
    let options = configure(args, config);
    let basis = config.basis_name();
    info!(
        "SCF options: max_cycle = {}, convergence_threshold = {:e}, occupied_rotations = {}",
        options.max_iter, options.convergence_threshold, options.occupied_rotations
    );

    let outcome = match method {
        Method::Rhf => rhf(molecule, basis, options),
        Method::Rohf => rohf(molecule, basis, options),
        Method::Gvb => {
            let npair = args.npair.or(config.scf_params.npair).unwrap_or(0);
            let coefficients = config.scf_params.gvb_coefficients.as_deref();
            gvb(molecule, basis, npair, coefficients, options)
        }
    };
    outcome.wrap_err_with(|| format!("{:?} calculation failed", method))
}
