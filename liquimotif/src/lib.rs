//! Scoring of DNA sequences against position weight matrices.
//!
//! A motif is a set of letter probabilities for each position of a short
//! DNA pattern. This crate turns a parsed motif into a [`ScoreMatrix`]: an
//! integer-scaled log-likelihood matrix (adjusted with pseudocounts against
//! a background model) together with an exact p-value table obtained by
//! convolving the per-column score distributions. A [`ScoreMatrix`] can then
//! scan every window of a sequence and hand a [`scan::Score`] for each one
//! to a [`scan::ScoreConsumer`].
//!
//! Matrix construction follows the MEME suite conventions: pseudocount
//! logic from the MEME FAQ, p-values computed as in FIMO.

pub mod abc;
pub mod err;
pub mod pwm;
pub mod scan;

pub use abc::Background;
pub use abc::Nucleotide;
pub use pwm::Motif;
pub use pwm::ScoreMatrix;
pub use scan::Score;
pub use scan::ScoreConsumer;
