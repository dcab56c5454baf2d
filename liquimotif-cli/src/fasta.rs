//! Scanning of FASTA records.

use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;

use liquimotif::ScoreMatrix;
use noodles_fasta as fasta;

use crate::error::RunError;
use crate::fimo::FimoStylePrinter;

/// Scan every record of a FASTA file with every matrix, forwarding the
/// scores to the printer.
pub fn process_fasta<W: Write>(
    matrices: &[ScoreMatrix],
    path: &Path,
    printer: &mut FimoStylePrinter<W>,
) -> Result<(), RunError> {
    let file = File::open(path).map_err(|source| RunError::Open {
        path: path.into(),
        source,
    })?;
    let mut reader = fasta::io::Reader::new(BufReader::new(file));
    for result in reader.records() {
        let record = result?;
        let name = String::from_utf8_lossy(record.name()).into_owned();
        log::debug!("scanning fasta record {}", name);
        for matrix in matrices {
            matrix.score(record.sequence().as_ref(), &name, printer)?;
        }
    }
    printer.flush()?;
    Ok(())
}
