use crate::config::Method;
use crate::io::write_report;
use crate::molecule::Molecule;
use crate::scf_impl::ScfOutcome;
use color_eyre::eyre::Result;
use tracing::info;

pub fn report_summary(method: Method, molecule: &Molecule, outcome: &ScfOutcome) -> Result<()> {
    info!("SCF calculation finished.");

    let mut buffer = Vec::new();
    write_report(&mut buffer, &format!("{:?}", method), molecule, outcome)?;
    for line in String::from_utf8_lossy(&buffer).lines() {
        info!("{}", line);
    }

    info!("Total energy: {:.10} au", outcome.energy);
    Ok(())
}
