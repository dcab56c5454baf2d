//! Parser for motifs in the MEME minimal text format.
//!
//! The format is line oriented: a `Background letter frequencies` section,
//! any number of `MOTIF <name>` declarations each followed by a
//! `letter-probability matrix:` header and its probability rows, and
//! arbitrary other lines (version header, `ALPHABET=`, `strands:`, URLs)
//! which are ignored. See <http://meme-suite.org/doc/meme-format.html>.

use std::io::BufRead;

use liquimotif::abc::Background;
use liquimotif::abc::ALPHABET_SIZE;
use liquimotif::pwm::Motif;
use liquimotif::Nucleotide;

use crate::error::Error;

mod parse;

const MOTIF: &str = "MOTIF";
const BACKGROUND: &str = "Background letter frequencies";
const MATRIX: &str = "letter-probability matrix:";

/// The number of sites assumed when a matrix header omits `nsites=`.
const DEFAULT_NSITES: f64 = 20.0;

/// Read motifs from a MEME-format text stream.
pub fn read<B: BufRead>(reader: B) -> Reader<B> {
    Reader::new(reader)
}

/// Parse a MEME-style background frequency file.
pub fn read_background<B: BufRead>(mut reader: B) -> Result<Background, Error> {
    let mut buffer = String::new();
    loop {
        buffer.clear();
        if reader.read_line(&mut buffer)? == 0 {
            return Err(Error::invalid("no background frequency section found"));
        }
        if buffer.trim_start().starts_with(BACKGROUND) {
            return background_frequencies(&mut reader, &mut buffer);
        }
    }
}

/// Collect the letter/frequency pairs following a background header.
///
/// Pairs may span several lines; letters may come in any order but each
/// must appear exactly once with a positive frequency.
fn background_frequencies<B: BufRead>(
    reader: &mut B,
    buffer: &mut String,
) -> Result<Background, Error> {
    let mut pairs: Vec<(char, f64)> = Vec::new();
    while pairs.len() < ALPHABET_SIZE {
        buffer.clear();
        if reader.read_line(buffer)? == 0 {
            return Err(Error::invalid("truncated background frequencies"));
        }
        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }
        let (rest, parsed) = parse::background_pairs(line)?;
        if !rest.trim().is_empty() {
            return Err(Error::invalid(format!(
                "malformed background line {:?}",
                line
            )));
        }
        pairs.extend(parsed);
    }

    let mut frequencies = [0.0; ALPHABET_SIZE];
    let mut seen = [false; ALPHABET_SIZE];
    for (letter, frequency) in pairs {
        let n = Nucleotide::from_char(letter).map_err(|e| Error::invalid(e.to_string()))?;
        if seen[n.as_index()] {
            return Err(Error::invalid(format!(
                "duplicate background frequency for {}",
                letter
            )));
        }
        seen[n.as_index()] = true;
        frequencies[n.as_index()] = frequency;
    }
    if !seen.iter().all(|&s| s) {
        return Err(Error::invalid("incomplete background frequencies"));
    }
    Ok(Background::new(frequencies)?)
}

// --- Reader ------------------------------------------------------------------

/// An iterative reader for motifs in a MEME-format text stream.
///
/// The preamble is scanned eagerly up to the first `MOTIF` directive so
/// that the in-file background, if any, is available before iteration.
pub struct Reader<B: BufRead> {
    bufread: B,
    buffer: String,
    background: Option<Background>,
    error: Option<Error>,
    done: bool,
}

impl<B: BufRead> Reader<B> {
    pub fn new(mut bufread: B) -> Self {
        let mut buffer = String::new();
        let mut background = None;
        let mut error = None;

        loop {
            buffer.clear();
            match bufread.read_line(&mut buffer) {
                Err(e) => {
                    error = Some(Error::Io(e));
                    break;
                }
                Ok(0) => break,
                Ok(_) => (),
            }
            let line = buffer.trim_start();
            if line.starts_with(MOTIF) {
                break;
            }
            if line.starts_with(BACKGROUND) {
                match background_frequencies(&mut bufread, &mut buffer) {
                    Ok(bg) => background = Some(bg),
                    Err(e) => {
                        error = Some(e);
                        break;
                    }
                }
            }
        }

        Self {
            bufread,
            buffer,
            background,
            error,
            done: false,
        }
    }

    /// The background declared in the file preamble, if any.
    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Read the motif whose `MOTIF` line is in the buffer.
    fn read_motif(&mut self) -> Result<Motif, Error> {
        let (_, name) = parse::motif_name(self.buffer.trim_start())?;
        let name = name.to_string();

        // scan forward to the matrix header, ignoring URL and other lines
        loop {
            self.buffer.clear();
            if self.bufread.read_line(&mut self.buffer)? == 0 {
                return Err(Error::invalid(format!(
                    "motif {} has no letter-probability matrix",
                    name
                )));
            }
            let line = self.buffer.trim_start();
            if line.starts_with(MOTIF) {
                return Err(Error::invalid(format!(
                    "motif {} has no letter-probability matrix",
                    name
                )));
            }
            if line.starts_with(MATRIX) {
                break;
            }
        }

        let (_, fields) = parse::matrix_header(self.buffer.trim())?;
        let mut alength = None;
        let mut width = None;
        let mut nsites = None;
        for (key, value) in fields {
            match key {
                "alength" => alength = Some(value),
                "w" => width = Some(value),
                "nsites" => nsites = Some(value),
                _ => (),
            }
        }
        if let Some(alength) = alength {
            if alength != ALPHABET_SIZE as f64 {
                return Err(Error::UnsupportedAlphabet(alength as u64));
            }
        }

        let mut rows = Vec::new();
        loop {
            self.buffer.clear();
            if self.bufread.read_line(&mut self.buffer)? == 0 {
                break;
            }
            let line = self.buffer.trim();
            if line.is_empty() {
                if rows.is_empty() {
                    continue;
                }
                break;
            }
            match parse::matrix_row(line) {
                Ok((rest, row)) if rest.trim().is_empty() => rows.push(row),
                _ => break,
            }
        }

        if let Some(width) = width {
            if rows.len() != width as usize {
                return Err(Error::invalid(format!(
                    "motif {} has {} matrix rows, expected {}",
                    name,
                    rows.len(),
                    width
                )));
            }
        }

        Ok(Motif::new(name, nsites.unwrap_or(DEFAULT_NSITES), rows)?)
    }
}

impl<B: BufRead> Iterator for Reader<B> {
    type Item = Result<Motif, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.error.take() {
            self.done = true;
            return Some(Err(error));
        }
        if self.done {
            return None;
        }
        // find the next MOTIF directive; the buffer may already hold one
        while !self.buffer.trim_start().starts_with(MOTIF) {
            self.buffer.clear();
            match self.bufread.read_line(&mut self.buffer) {
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => (),
            }
        }
        let motif = self.read_motif();
        if motif.is_err() {
            self.done = true;
        }
        Some(motif)
    }
}
