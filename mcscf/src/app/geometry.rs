use crate::config::{Args, Config, Units};
use crate::molecule::{Atom, Molecule, ANGSTROM_TO_BOHR};
use color_eyre::eyre::{eyre, Result, WrapErr};
use nalgebra::Vector3;
use periodic_table_on_an_enum::Element;
use tracing::info;

/// Build the molecule defined in the YAML configuration, in bohr.
pub fn build_molecule(config: &Config, args: &Args) -> Result<Molecule> {
    info!("Preparing geometry...");

    let scale = match config.units.unwrap_or_default() {
        Units::Bohr => 1.0,
        Units::Angstrom => ANGSTROM_TO_BOHR,
    };

    let mut atoms = Vec::with_capacity(config.geometry.len());
    for atom in &config.geometry {
        let element = Element::from_symbol(&atom.element)
            .ok_or_else(|| eyre!("Invalid element symbol: {}", atom.element))?;
        let position = Vector3::new(atom.coords[0], atom.coords[1], atom.coords[2]) * scale;
        info!(
            "  {:>2} [{:+.6}, {:+.6}, {:+.6}]",
            atom.element, position.x, position.y, position.z
        );
        atoms.push(Atom::new(element, position));
    }

    let charge = args.charge.or(config.charge).unwrap_or(0);
    let multiplicity = args.multiplicity.or(config.multiplicity).unwrap_or(1);
    Molecule::new(atoms, charge, multiplicity).wrap_err("Invalid charge or multiplicity")
}
