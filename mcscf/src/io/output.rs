//! Output formatting and logging utilities

use crate::molecule::Molecule;
use crate::scf_impl::{ConvergenceStatus, ScfOutcome};
use color_eyre::eyre::Result;
use nalgebra::DMatrix;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let duration = StdSystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();

        let total_seconds = duration.as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Setup output logging to file or stdout
pub fn setup_output(output_path: Option<&String>) {
    match output_path {
        Some(path) => match File::create(path) {
            Ok(log) => {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false);
                Registry::default().with(file_layer).init();
                info!("Output will be written to: {}", path);
            }
            Err(err) => eprintln!("Could not create output file {}: {}", path, err),
        },
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true);
            Registry::default().with(stdout_layer).init();
            info!("Output will be printed to stdout");
        }
    }
}

fn write_matrix<W: Write>(writer: &mut W, name: &str, m: &DMatrix<f64>) -> Result<()> {
    writeln!(writer, "{}:", name)?;
    for row in m.row_iter() {
        let cells: Vec<String> = row.iter().map(|x| format!("{:>10.6}", x)).collect();
        writeln!(writer, "  {}", cells.join(" "))?;
    }
    Ok(())
}

/// Plain-text summary of a finished calculation.
pub fn write_report<W: Write>(
    writer: &mut W,
    method: &str,
    molecule: &Molecule,
    outcome: &ScfOutcome,
) -> Result<()> {
    writeln!(writer, "{} calculation", method.to_uppercase())?;
    writeln!(writer, "Geometry (bohr):")?;
    for (i, atom) in molecule.atoms.iter().enumerate() {
        let r = atom.position;
        writeln!(
            writer,
            "  Atom {}: {} at [{:.6}, {:.6}, {:.6}]",
            i + 1,
            atom.symbol(),
            r.x,
            r.y,
            r.z
        )?;
    }

    let counts = outcome.layout.counts;
    writeln!(
        writer,
        "Shells: ncore = {}, nopen = {}, npair = {}",
        counts.ncore, counts.nopen, counts.npair
    )?;
    for (shell, energies) in outcome.layout.shells.iter().zip(&outcome.orbital_energies) {
        let levels: Vec<String> = energies.iter().map(|e| format!("{:.8}", e)).collect();
        writeln!(
            writer,
            "  Shell {} ({:?}): f = {:.6}, orbitals {:?}, eigenvalues [{}]",
            shell.index,
            shell.kind,
            shell.occupation,
            shell.orbitals,
            levels.join(", ")
        )?;
    }
    write_matrix(writer, "Coulomb coupling a", &outcome.coupling.a)?;
    write_matrix(writer, "Exchange coupling b", &outcome.coupling.b)?;

    writeln!(writer, "Electronic energy: {:.10} au", outcome.electronic_energy)?;
    writeln!(writer, "Nuclear repulsion: {:.10} au", outcome.nuclear_repulsion)?;
    writeln!(writer, "Total energy: {:.10} au", outcome.energy)?;
    match outcome.status {
        ConvergenceStatus::Converged { iterations } => {
            writeln!(writer, "Converged in {} iterations", iterations)?
        }
        ConvergenceStatus::MaxIterations {
            iterations,
            last_delta,
        } => writeln!(
            writer,
            "NOT converged after {} iterations (last dE = {:.3e} au)",
            iterations, last_delta
        )?,
    }
    Ok(())
}
