//! FIMO-style tabular reporting of significant scores.

use std::io;
use std::io::Write;

use liquimotif::scan::Score;
use liquimotif::scan::ScoreConsumer;

/// Scores with a p-value below this cutoff are reported as matches.
pub const SIGNIFICANCE_CUTOFF: f64 = 0.0001;

const HEADER: &str =
    "#pattern name\tsequence name\tstart\tstop\tstrand\tscore\tp-value\tq-value\tmatched sequence";

/// Write the column header line.
pub fn write_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", HEADER)
}

/// Write one match line with the given name and coordinates.
///
/// The score is printed with 6 significant figures and the p-value with 3;
/// the q-value column is left empty.
pub fn write_match<W: Write>(
    out: &mut W,
    motif_name: &str,
    sequence_name: &str,
    is_reverse_complement: bool,
    start: usize,
    stop: usize,
    score: &Score<'_>,
) -> io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t\t{}",
        motif_name,
        sequence_name,
        start,
        stop,
        if is_reverse_complement { '-' } else { '+' },
        format_sig(score.score(), 6),
        format_sig(score.pvalue(), 3),
        score,
    )
}

/// A [`ScoreConsumer`] writing FIMO-style lines for significant scores.
pub struct FimoStylePrinter<W: Write> {
    out: W,
}

impl<W: Write> FimoStylePrinter<W> {
    /// Create a printer and write the header line.
    pub fn new(mut out: W) -> io::Result<Self> {
        write_header(&mut out)?;
        Ok(Self { out })
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> ScoreConsumer for FimoStylePrinter<W> {
    fn accept(
        &mut self,
        motif_name: &str,
        sequence_name: &str,
        is_reverse_complement: bool,
        start: usize,
        stop: usize,
        score: &Score<'_>,
    ) -> io::Result<()> {
        if score.pvalue() < SIGNIFICANCE_CUTOFF {
            write_match(
                &mut self.out,
                motif_name,
                sequence_name,
                is_reverse_complement,
                start,
                stop,
                score,
            )?;
        }
        Ok(())
    }
}

/// Format a value with the given number of significant figures, choosing
/// fixed or scientific notation and trimming trailing zeros the way C
/// stream output does.
pub fn format_sig(value: f64, figures: i32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= figures {
        let formatted = format!("{:.*e}", (figures - 1).max(0) as usize, value);
        match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_zeros(mantissa), exp),
            None => formatted,
        }
    } else {
        let decimals = (figures - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(formatted: &str) -> &str {
    if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted
    }
}
