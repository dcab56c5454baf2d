//! `motif_liquidator`: scan FASTA or BAM sequences for occurrences of
//! MEME-style position weight matrices.

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flate2::read::MultiGzDecoder;

use liquimotif::pwm;
use liquimotif::pwm::DEFAULT_PSEUDO_SITES;
use liquimotif::Background;
use liquimotif::Motif;
use liquimotif_io::meme;

mod bam;
mod bed;
mod error;
mod fasta;
mod fimo;

use crate::error::RunError;
use crate::fimo::FimoStylePrinter;

#[derive(Parser, Debug)]
#[command(
    name = "motif_liquidator",
    version,
    about = "Scans sequences for motifs given as MEME style position weight matrices"
)]
struct Parameters {
    /// MEME style position weight matrix file
    #[arg(value_name = "MOTIF")]
    motif: PathBuf,

    /// Sequence file to search for motifs, either .fasta or .bam
    #[arg(value_name = "FASTA_OR_BAM")]
    input: PathBuf,

    /// MEME style background frequency file
    #[arg(short, long, value_name = "PATH")]
    background: Option<PathBuf>,

    /// File to write matches to: FIMO style for fasta input, a .bam for
    /// bam input
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// BED region file for filtering bam input
    #[arg(short, long, value_name = "PATH")]
    region: Option<PathBuf>,

    /// Only score unmapped reads from a bam input
    #[arg(short, long)]
    unmapped_only: bool,

    /// Print matches to stdout while scoring a bam input
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputType {
    Bam,
    Fasta,
}

fn input_type(path: &Path) -> Result<InputType, RunError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("bam") => Ok(InputType::Bam),
        Some("fasta") => Ok(InputType::Fasta),
        _ => Err(RunError::usage(
            "only .bam and .fasta extensions are supported at this time",
        )),
    }
}

/// Open a text input, decompressing gzip data transparently.
fn open_text(path: &Path) -> Result<Box<dyn BufRead>, RunError> {
    let mut file = File::open(path)
        .map(BufReader::new)
        .map_err(|source| RunError::Open {
            path: path.into(),
            source,
        })?;
    match file.fill_buf()? {
        [0x1f, 0x8b, ..] => Ok(Box::new(BufReader::new(MultiGzDecoder::new(file)))),
        _ => Ok(Box::new(file)),
    }
}

fn run(params: &Parameters) -> Result<(), RunError> {
    let input_type = input_type(&params.input)?;
    if input_type != InputType::Bam {
        if params.region.is_some() {
            return Err(RunError::usage(
                "only .bam input files support region filtering",
            ));
        }
        if params.unmapped_only {
            return Err(RunError::usage(
                "only .bam input files support unmapped-only scoring",
            ));
        }
    }

    let motif_reader = meme::read(open_text(&params.motif)?);
    let file_background = motif_reader.background().cloned();
    let motifs: Vec<Motif> = motif_reader.collect::<Result<_, _>>()?;
    log::debug!("read {} motifs from {}", motifs.len(), params.motif.display());

    // a background file takes precedence over the motif file's own
    // background section
    let background = match &params.background {
        Some(path) => meme::read_background(open_text(path)?)?,
        None => file_background.unwrap_or_else(Background::uniform),
    };

    let matrices = pwm::build_matrices(&motifs, &background, true, DEFAULT_PSEUDO_SITES);

    match input_type {
        InputType::Fasta => {
            let out: Box<dyn Write> = match &params.output {
                Some(path) => Box::new(io::BufWriter::new(File::create(path).map_err(
                    |source| RunError::Open {
                        path: path.into(),
                        source,
                    },
                )?)),
                None => Box::new(io::stdout().lock()),
            };
            let mut printer = FimoStylePrinter::new(out)?;
            fasta::process_fasta(&matrices, &params.input, &mut printer)?;
        }
        InputType::Bam => {
            let options = bam::Options {
                output: params.output.clone(),
                regions: params.region.clone(),
                only_score_unmapped: params.unmapped_only,
                verbose: params.verbose,
            };
            bam::score_bam(&matrices, &params.input, &options, io::stdout().lock())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    simple_logger::init_with_env().unwrap();

    let params = match Parameters::try_parse() {
        Ok(params) => params,
        Err(e) => {
            eprint!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&params) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
