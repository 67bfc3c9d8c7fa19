mod geometry;
mod report;
mod runner;

pub use geometry::build_molecule;
pub use runner::run_method;

use self::report::report_summary;
use crate::config::{Args, Config, Method};
use crate::io::setup_output;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use tracing::info;

pub struct ScfApplication {
    args: Args,
    config: Config,
}

impl ScfApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref());

        let molecule = build_molecule(&self.config, &self.args)?;
        let method = MethodSelection::determine(&self.args, &self.config);
        info!(
            "Running {:?} with charge={}, multiplicity={}",
            method.0, molecule.charge, molecule.multiplicity
        );

        let outcome = run_method(method.0, &molecule, &self.args, &self.config)?;
        report_summary(method.0, &molecule, &outcome)?;
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config_content = fs::read_to_string(&args.config_file)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", args.config_file))?;

    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults();

    Ok(config)
}

/// The SCF variant to run, from the command line, the YAML file, or the spin state.
struct MethodSelection(Method);

impl MethodSelection {
    fn determine(args: &Args, config: &Config) -> Self {
        if let Some(method) = args.method.or(config.scf_params.method) {
            return MethodSelection(method);
        }
        let multiplicity = args.multiplicity.or(config.multiplicity).unwrap_or(1);
        let npair = args.npair.or(config.scf_params.npair).unwrap_or(0);
        if npair > 0 {
            MethodSelection(Method::Gvb)
        } else if multiplicity > 1 {
            MethodSelection(Method::Rohf)
        } else {
            MethodSelection(Method::Rhf)
        }
    }
}
