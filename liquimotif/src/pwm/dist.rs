//! Discretized score distributions for *p-value* computation.
//!
//! The distribution of integer window scores under a background model is
//! computed exactly by convolving the per-column score distributions, as
//! MEME does for its discretized matrices: starting from the trivial
//! distribution `{0: 1.0}`, each column spreads the accumulated mass over
//! its four possible scores weighted by the background frequencies. The
//! resulting mass function is then turned into a cumulative tail so that
//! entry `k` is `P(score >= k)`.

use crate::abc::Background;
use crate::abc::ALPHABET_SIZE;

/// Probability mass of every reachable integer score under the background.
///
/// The returned vector has length `1 + sum of the per-column maxima`, so
/// an empty matrix yields the single-entry distribution of score zero.
pub fn probability_distribution(
    matrix: &[[u32; ALPHABET_SIZE]],
    background: &Background,
) -> Vec<f64> {
    let mut pdf = vec![1.0];
    for row in matrix {
        let reach = *row.iter().max().unwrap() as usize;
        let mut next = vec![0.0; pdf.len() + reach];
        for (score, &mass) in pdf.iter().enumerate() {
            if mass > 0.0 {
                for (column, &frequency) in background.frequencies().iter().enumerate() {
                    next[score + row[column] as usize] += mass * frequency;
                }
            }
        }
        pdf = next;
    }
    pdf
}

/// Convert a probability mass function into cumulative tail p-values,
/// in place and right to left, clamping accumulated rounding error at 1.
pub fn pdf_to_pvalues(pdf: &mut [f64]) {
    for i in (0..pdf.len().saturating_sub(1)).rev() {
        pdf[i] = (pdf[i] + pdf[i + 1]).min(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($x:expr, $y:expr, places = $places:expr) => {{
            assert_eq!(
                ($x * 10.0_f64.powi($places)).round(),
                ($y * 10.0_f64.powi($places)).round(),
            )
        }};
    }

    #[test]
    fn empty_matrix() {
        let pdf = probability_distribution(&[], &Background::uniform());
        assert_eq!(pdf, vec![1.0]);
    }

    #[test]
    fn zero_matrix() {
        let pdf = probability_distribution(&[[0; 4], [0; 4]], &Background::uniform());
        assert_eq!(pdf.len(), 1);
        assert_almost_eq!(pdf[0], 1.0, places = 6);
    }

    #[test]
    fn single_column() {
        // 0 with 75% probability, 1 with 25%
        let pdf = probability_distribution(&[[0, 0, 1, 0]], &Background::uniform());
        assert_eq!(pdf.len(), 2);
        assert_almost_eq!(pdf[0], 0.75, places = 6);
        assert_almost_eq!(pdf[1], 0.25, places = 6);
    }

    #[test]
    fn two_columns() {
        // 16 equiprobable sequences: 4 score 0, 8 score 1, 4 score 2
        let pdf =
            probability_distribution(&[[0, 0, 1, 1], [1, 0, 1, 0]], &Background::uniform());
        assert_eq!(pdf.len(), 3);
        assert_almost_eq!(pdf[0], 0.25, places = 6);
        assert_almost_eq!(pdf[1], 0.50, places = 6);
        assert_almost_eq!(pdf[2], 0.25, places = 6);
    }

    #[test]
    fn pvalues() {
        let mut empty: Vec<f64> = Vec::new();
        pdf_to_pvalues(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![0.1];
        pdf_to_pvalues(&mut single);
        assert_eq!(single, vec![0.1]);

        let mut pair = vec![0.1, 0.2];
        pdf_to_pvalues(&mut pair);
        assert_almost_eq!(pair[1], 0.2, places = 6);
        assert_almost_eq!(pair[0], 0.3, places = 6);

        let mut triple = vec![0.1, 0.2, 0.3];
        pdf_to_pvalues(&mut triple);
        assert_almost_eq!(triple[2], 0.3, places = 6);
        assert_almost_eq!(triple[1], 0.5, places = 6);
        assert_almost_eq!(triple[0], 0.6, places = 6);

        // the head is clamped when rounding error pushes the sum past 1
        let mut overflowing = vec![0.9, 0.2, 0.3];
        pdf_to_pvalues(&mut overflowing);
        assert_almost_eq!(overflowing[2], 0.3, places = 6);
        assert_almost_eq!(overflowing[1], 0.5, places = 6);
        assert_almost_eq!(overflowing[0], 1.0, places = 6);
    }
}
