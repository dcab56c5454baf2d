//! Window scanning and score delivery.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::io;

use super::abc::alphabet_index;
use super::abc::UNSCORABLE;
use super::pwm::ScoreMatrix;

// --- Score -------------------------------------------------------------------

/// A scored window over a scanned sequence.
///
/// Scores borrow the scanned sequence and are only valid for the duration
/// of the [`ScoreConsumer::accept`] call; consumers that need to keep the
/// matched bases must copy them with [`Score::matched_sequence`].
#[derive(Clone, Debug)]
pub struct Score<'a> {
    sequence: &'a [u8],
    begin: usize,
    end: usize,
    pvalue: f64,
    score: f64,
}

impl<'a> Score<'a> {
    fn new(sequence: &'a [u8], begin: usize, end: usize, pvalue: f64, score: f64) -> Self {
        Self {
            sequence,
            begin,
            end,
            pvalue,
            score,
        }
    }

    /// The p-value, or NaN if the window was not scorable.
    ///
    /// NaN compares false against any threshold, so unscorable windows
    /// never pass a significance cutoff.
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// The log-likelihood score, or 0 if the window was not scorable.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// A copy of the matched bases, uppercased.
    pub fn matched_sequence(&self) -> String {
        self.to_string()
    }
}

impl Display for Score<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for &base in &self.sequence[self.begin..self.end] {
            write!(f, "{}", base.to_ascii_uppercase() as char)?;
        }
        Ok(())
    }
}

// --- ScoreConsumer -----------------------------------------------------------

/// A sink for the scores of every scanned window.
///
/// `start` and `stop` are 1-based inclusive coordinates on the scanned
/// sequence; the strand is the one encoded by the delivering matrix.
/// Consumers decide what to keep, typically by filtering on
/// [`Score::pvalue`].
pub trait ScoreConsumer {
    fn accept(
        &mut self,
        motif_name: &str,
        sequence_name: &str,
        is_reverse_complement: bool,
        start: usize,
        stop: usize,
        score: &Score<'_>,
    ) -> io::Result<()>;
}

// --- Scanning ----------------------------------------------------------------

impl ScoreMatrix {
    /// Score every window of `sequence`, delivering one [`Score`] per
    /// window to the consumer in increasing start order.
    ///
    /// Windows containing a base outside ACGT/acgt are delivered with a
    /// NaN p-value and a zero score. A sequence shorter than the motif
    /// produces no windows.
    pub fn score<C: ScoreConsumer>(
        &self,
        sequence: &[u8],
        sequence_name: &str,
        consumer: &mut C,
    ) -> io::Result<()> {
        let width = self.len();
        if width == 0 || sequence.len() < width {
            return Ok(());
        }
        for begin in 0..=sequence.len() - width {
            let end = begin + width;
            let score = self.score_window(sequence, begin, end);
            consumer.accept(
                self.name(),
                sequence_name,
                self.is_reverse_complement(),
                begin + 1,
                end,
                &score,
            )?;
        }
        Ok(())
    }

    fn score_window<'a>(&self, sequence: &'a [u8], begin: usize, end: usize) -> Score<'a> {
        let mut scaled: u32 = 0;
        for (row, &base) in self.rows().iter().zip(&sequence[begin..end]) {
            let column = alphabet_index(base);
            if column == UNSCORABLE {
                return Score::new(sequence, begin, end, f64::NAN, 0.0);
            }
            scaled += row[column];
        }
        let clamped = (scaled as usize).min(self.pvalues().len() - 1);
        Score::new(
            sequence,
            begin,
            end,
            self.pvalues()[clamped],
            self.unscale(scaled),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abc::Background;
    use crate::pwm::Motif;
    use crate::pwm::ScoreMatrix;

    macro_rules! assert_almost_eq {
        ($x:expr, $y:expr, places = $places:expr) => {{
            assert_eq!(
                ($x * 10.0_f64.powi($places)).round(),
                ($y * 10.0_f64.powi($places)).round(),
            )
        }};
    }

    #[derive(Default)]
    struct Collect {
        scores: Vec<(usize, usize, bool, f64, f64, String)>,
    }

    impl ScoreConsumer for Collect {
        fn accept(
            &mut self,
            _motif_name: &str,
            _sequence_name: &str,
            is_reverse_complement: bool,
            start: usize,
            stop: usize,
            score: &Score<'_>,
        ) -> io::Result<()> {
            self.scores.push((
                start,
                stop,
                is_reverse_complement,
                score.pvalue(),
                score.score(),
                score.matched_sequence(),
            ));
            Ok(())
        }
    }

    fn single_base_matrix() -> ScoreMatrix {
        ScoreMatrix::new(
            "A",
            Background::uniform(),
            &[[1.0, 0.0, 0.0, 0.0]],
            1.0,
            false,
            0.1,
        )
    }

    #[test]
    fn one_score_per_window() {
        let matrix = single_base_matrix();
        let mut consumer = Collect::default();
        matrix.score(b"ACGTA", "seq", &mut consumer).unwrap();
        assert_eq!(consumer.scores.len(), 5);
        let starts: Vec<usize> = consumer.scores.iter().map(|s| s.0).collect();
        assert_eq!(starts, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn wide_motif_produces_no_windows() {
        let motif = Motif::new("m", 1.0, vec![[0.25; 4]; 6]).unwrap();
        let matrix = ScoreMatrix::new("m", Background::uniform(), motif.rows(), 1.0, false, 0.1);
        let mut consumer = Collect::default();
        matrix.score(b"ACGTA", "seq", &mut consumer).unwrap();
        assert!(consumer.scores.is_empty());
    }

    #[test]
    fn single_base_motif_scores() {
        // A matches score the peak log-likelihood, everything else the floor
        let matrix = single_base_matrix();
        let mut consumer = Collect::default();
        matrix.score(b"ACGTA", "seq", &mut consumer).unwrap();

        let peak = ((1.0_f64 + 0.1 * 0.25) / 1.1 / 0.25).log2();
        let floor = (0.1_f64 * 0.25 / 1.1 / 0.25).log2();
        for (i, &(start, stop, rc, pvalue, score, _)) in consumer.scores.iter().enumerate() {
            assert_eq!((start, stop, rc), (i + 1, i + 1, false));
            if i == 0 || i == 4 {
                assert_almost_eq!(pvalue, 0.25, places = 6);
                assert_almost_eq!(score, peak, places = 4);
            } else {
                assert_almost_eq!(pvalue, 1.0, places = 6);
                assert_almost_eq!(score, floor, places = 4);
            }
        }
    }

    #[test]
    fn lowercase_scores_identically() {
        let matrix = single_base_matrix();
        let mut upper = Collect::default();
        let mut lower = Collect::default();
        matrix.score(b"ACGTA", "seq", &mut upper).unwrap();
        matrix.score(b"acgta", "seq", &mut lower).unwrap();
        for (u, l) in upper.scores.iter().zip(lower.scores.iter()) {
            assert_eq!(u.3.is_nan(), l.3.is_nan());
            assert_eq!(u.4, l.4);
            assert_eq!(u.5, l.5);
        }
    }

    #[test]
    fn unscorable_windows() {
        let motif = Motif::new("GT", 1.0, vec![[0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]])
            .unwrap();
        let matrix = ScoreMatrix::new("GT", Background::uniform(), motif.rows(), 1.0, false, 0.1);
        let mut consumer = Collect::default();
        matrix.score(b"ANGT", "seq", &mut consumer).unwrap();
        assert_eq!(consumer.scores.len(), 3);
        // AN and NG are unscorable, GT scores
        assert!(consumer.scores[0].3.is_nan());
        assert_eq!(consumer.scores[0].4, 0.0);
        assert!(consumer.scores[1].3.is_nan());
        assert_eq!(consumer.scores[1].4, 0.0);
        assert!(!consumer.scores[2].3.is_nan());
        assert_eq!(consumer.scores[2].5, "GT");
    }

    #[test]
    fn all_unscorable_sequence() {
        let motif = Motif::new("GT", 1.0, vec![[0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]])
            .unwrap();
        let matrix = ScoreMatrix::new("GT", Background::uniform(), motif.rows(), 1.0, false, 0.1);
        let mut consumer = Collect::default();
        matrix.score(b"NNNN", "seq", &mut consumer).unwrap();
        assert_eq!(consumer.scores.len(), 3);
        assert!(consumer.scores.iter().all(|s| s.3.is_nan() && s.4 == 0.0));
    }

    #[test]
    fn reverse_complement_matrix_finds_opposite_strand() {
        // the reverse-complement of GT is AC, which occurs twice in ACAC
        let motif = Motif::new("GT", 1.0, vec![[0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]])
            .unwrap();
        let matrices = ScoreMatrix::pair(&motif, &Background::uniform(), true, 0.1);

        let mut forward = Collect::default();
        matrices[0].score(b"ACAC", "seq", &mut forward).unwrap();
        assert!(forward.scores.iter().all(|s| s.3 > 0.5));

        let mut reverse = Collect::default();
        matrices[1].score(b"ACAC", "seq", &mut reverse).unwrap();
        let hits: Vec<usize> = reverse
            .scores
            .iter()
            .filter(|s| s.3 < 0.1)
            .map(|s| s.0)
            .collect();
        assert_eq!(hits, vec![1, 3]);
        assert!(reverse.scores.iter().all(|s| s.2));
    }

    #[test]
    fn reverse_complement_score_symmetry() {
        // scoring X with M equals scoring revcomp(X) with M' at the
        // mirrored window
        let motif = Motif::new(
            "m",
            10.0,
            vec![[0.5, 0.2, 0.2, 0.1], [0.1, 0.1, 0.7, 0.1], [0.3, 0.3, 0.2, 0.2]],
        )
        .unwrap();
        let matrices = ScoreMatrix::pair(&motif, &Background::uniform(), true, 0.1);

        let sequence = b"ACGTTGCA";
        let revcomp: Vec<u8> = sequence
            .iter()
            .rev()
            .map(|&b| match b {
                b'A' => b'T',
                b'C' => b'G',
                b'G' => b'C',
                _ => b'A',
            })
            .collect();

        let mut forward = Collect::default();
        matrices[0].score(sequence, "seq", &mut forward).unwrap();
        let mut mirrored = Collect::default();
        matrices[1].score(&revcomp, "seq", &mut mirrored).unwrap();

        let n = forward.scores.len();
        assert_eq!(n, mirrored.scores.len());
        for (i, score) in forward.scores.iter().enumerate() {
            let mirror = &mirrored.scores[n - 1 - i];
            assert_almost_eq!(score.4, mirror.4, places = 6);
        }
    }
}
