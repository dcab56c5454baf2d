//! Storage types for the different stages of a scoring matrix construction.

use super::abc::Background;
use super::abc::Nucleotide;
use super::abc::ALPHABET_SIZE;
use super::err::InvalidData;
use super::err::InvalidSymbol;

pub mod dist;

/// The integer resolution of a scaled matrix, as in MEME.
pub const BINS: u32 = 100;

/// The default number of pseudo-sites used to smooth letter probabilities.
pub const DEFAULT_PSEUDO_SITES: f64 = 0.1;

// --- Motif -------------------------------------------------------------------

/// A parsed motif: letter probabilities for each position of the pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct Motif {
    name: String,
    nsites: f64,
    rows: Vec<[f64; ALPHABET_SIZE]>,
}

impl Motif {
    /// Create a new motif from the given letter probability rows.
    ///
    /// The motif must have at least one position, a positive number of
    /// training sites, and no negative probabilities.
    pub fn new<S: Into<String>>(
        name: S,
        nsites: f64,
        rows: Vec<[f64; ALPHABET_SIZE]>,
    ) -> Result<Self, InvalidData> {
        if rows.is_empty() {
            return Err(InvalidData::new("motif has no positions"));
        }
        if !(nsites >= 1.0) {
            return Err(InvalidData::new(format!("invalid nsites {}", nsites)));
        }
        if rows.iter().flatten().any(|&p| p < 0.0 || !p.is_finite()) {
            return Err(InvalidData::new("negative letter probability"));
        }
        Ok(Self {
            name: name.into(),
            nsites,
            rows,
        })
    }

    /// The name of the motif.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of sites the motif was trained on.
    pub fn nsites(&self) -> f64 {
        self.nsites
    }

    /// The letter probability rows, one per motif position.
    pub fn rows(&self) -> &[[f64; ALPHABET_SIZE]] {
        &self.rows
    }

    /// The width of the motif.
    pub fn width(&self) -> usize {
        self.rows.len()
    }
}

/// Get the reverse-complement of a set of letter probability rows.
///
/// Row order is reversed and columns are permuted so that `A` exchanges
/// with `T` and `C` with `G`.
pub fn reverse_complement(rows: &[[f64; ALPHABET_SIZE]]) -> Vec<[f64; ALPHABET_SIZE]> {
    rows.iter()
        .rev()
        .map(|row| {
            let mut out = [0.0; ALPHABET_SIZE];
            for n in Nucleotide::ALL {
                out[n.as_index()] = row[n.complement().as_index()];
            }
            out
        })
        .collect()
}

// --- ScoreMatrix -------------------------------------------------------------

/// An integer-scaled log-likelihood matrix with its p-value table.
///
/// Values are log2 likelihood ratios of the pseudocount-adjusted motif
/// frequencies over the background, shifted and scaled into `0..=BINS`
/// integers. The p-value table gives `P(score >= k)` under the background
/// for every reachable integer score `k`.
#[derive(Clone, Debug)]
pub struct ScoreMatrix {
    name: String,
    is_reverse_complement: bool,
    background: Background,
    matrix: Vec<[u32; ALPHABET_SIZE]>,
    scale: f64,
    min_before_scaling: f64,
    pvalues: Vec<f64>,
}

impl ScoreMatrix {
    /// Build a scoring matrix for the given letter probability rows.
    ///
    /// Pseudocount logic follows the MEME suite: the adjusted frequency of
    /// base `b` at position `c` is
    /// `(rows[c][b]*nsites + pseudo_sites*bg[b]) / (nsites + pseudo_sites)`.
    pub fn new<S: Into<String>>(
        name: S,
        background: Background,
        rows: &[[f64; ALPHABET_SIZE]],
        nsites: f64,
        is_reverse_complement: bool,
        pseudo_sites: f64,
    ) -> Self {
        let bg = background.frequencies();

        let mut log_odds = vec![[0.0; ALPHABET_SIZE]; rows.len()];
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (src, dst) in rows.iter().zip(log_odds.iter_mut()) {
            for (b, cell) in dst.iter_mut().enumerate() {
                let adjusted = (src[b] * nsites + pseudo_sites * bg[b]) / (nsites + pseudo_sites);
                *cell = (adjusted / bg[b]).log2();
                min = min.min(*cell);
                max = max.max(*cell);
            }
        }
        if rows.is_empty() {
            min = 0.0;
            max = 0.0;
        }
        // a flat matrix would give an infinite scale
        if min == max {
            min = max - 1.0;
        }

        let scale = f64::from(BINS) / (max - min);
        let matrix: Vec<[u32; ALPHABET_SIZE]> = log_odds
            .iter()
            .map(|row| {
                let mut out = [0; ALPHABET_SIZE];
                for (b, cell) in out.iter_mut().enumerate() {
                    *cell = ((row[b] - min) * scale).round() as u32;
                }
                out
            })
            .collect();

        let mut pvalues = dist::probability_distribution(&matrix, &background);
        dist::pdf_to_pvalues(&mut pvalues);

        Self {
            name: name.into(),
            is_reverse_complement,
            background,
            matrix,
            scale,
            min_before_scaling: min,
            pvalues,
        }
    }

    /// Build the forward matrix for a motif, and its reverse-complement
    /// when requested.
    ///
    /// The reverse-complement matrix is scaled and tabulated independently:
    /// its bounds only coincide with the forward ones when the background
    /// is symmetric.
    pub fn pair(
        motif: &Motif,
        background: &Background,
        include_reverse_complement: bool,
        pseudo_sites: f64,
    ) -> Vec<ScoreMatrix> {
        let mut matrices = vec![Self::new(
            motif.name(),
            background.clone(),
            motif.rows(),
            motif.nsites(),
            false,
            pseudo_sites,
        )];
        if include_reverse_complement {
            let rc = reverse_complement(motif.rows());
            matrices.push(Self::new(
                motif.name(),
                background.clone(),
                &rc,
                motif.nsites(),
                true,
                pseudo_sites,
            ));
        }
        matrices
    }

    /// The name of the motif this matrix scores.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The width of the motif.
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    /// Whether the matrix is empty.
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Whether this matrix scores the reverse-complement strand.
    pub fn is_reverse_complement(&self) -> bool {
        self.is_reverse_complement
    }

    /// The scaling factor applied to the shifted log-likelihood values.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The smallest log-likelihood value before shifting and scaling.
    pub fn min_before_scaling(&self) -> f64 {
        self.min_before_scaling
    }

    /// The background the matrix was built against.
    pub fn background(&self) -> &Background {
        &self.background
    }

    /// `P(score >= k)` under the background, indexed by integer score.
    pub fn pvalues(&self) -> &[f64] {
        &self.pvalues
    }

    /// The integer matrix rows.
    pub(crate) fn rows(&self) -> &[[u32; ALPHABET_SIZE]] {
        &self.matrix
    }

    /// Recover a log-likelihood score from a scaled integer score.
    pub fn unscale(&self, scaled: u32) -> f64 {
        f64::from(scaled) / self.scale + self.len() as f64 * self.min_before_scaling
    }

    /// Matrix value for the given motif position and base letter.
    ///
    /// The base must be in ACGT/acgt; the position must be within the
    /// motif width.
    pub fn value(&self, position: usize, base: char) -> Result<u32, InvalidSymbol> {
        let n = Nucleotide::from_char(base)?;
        Ok(self.matrix[position][n.as_index()])
    }
}

/// Build the scoring matrices for a list of parsed motifs.
///
/// Emits the forward matrix of each motif followed by its
/// reverse-complement when `include_reverse_complement` is set.
pub fn build_matrices(
    motifs: &[Motif],
    background: &Background,
    include_reverse_complement: bool,
    pseudo_sites: f64,
) -> Vec<ScoreMatrix> {
    motifs
        .iter()
        .flat_map(|m| ScoreMatrix::pair(m, background, include_reverse_complement, pseudo_sites))
        .collect()
}
