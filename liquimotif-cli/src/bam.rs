//! Scoring of BAM reads, with optional region filtering and passthrough
//! of matching reads to an output archive.

use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use liquimotif::scan::Score;
use liquimotif::scan::ScoreConsumer;
use liquimotif::ScoreMatrix;
use rust_htslib::bam;
use rust_htslib::bam::Read;

use crate::bed;
use crate::error::RunError;
use crate::fimo;
use crate::fimo::SIGNIFICANCE_CUTOFF;

/// ASCII bases for the 4-bit nucleotide codes of a packed BAM sequence.
const NT16_BASES: &[u8; 16] = b"=ACMGRSVTWYHKDBN";

/// Driver options for a BAM scoring run.
pub struct Options {
    pub output: Option<PathBuf>,
    pub regions: Option<PathBuf>,
    pub only_score_unmapped: bool,
    pub verbose: bool,
}

/// Scan the reads of a BAM file with every matrix.
///
/// Without regions every read in the file is scored; with regions only
/// reads fetched from the index for each interval are. Returns the stream
/// the summary was written to.
pub fn score_bam<W: Write>(
    matrices: &[ScoreMatrix],
    path: &Path,
    options: &Options,
    out: W,
) -> Result<W, RunError> {
    match &options.regions {
        None => {
            let mut reader = bam::Reader::from_path(path)?;
            let mut scorer = BamScorer::new(reader.header(), options, out)?;
            let mut record = bam::Record::new();
            while let Some(result) = reader.read(&mut record) {
                result?;
                scorer.score_read(&record, matrices, None)?;
            }
            scorer.finish()
        }
        Some(region_path) => {
            let regions = bed::parse_regions(region_path)?;
            let mut reader = bam::IndexedReader::from_path(path)?;
            let mut scorer = BamScorer::new(reader.header(), options, out)?;
            let mut record = bam::Record::new();
            for region in &regions {
                let tid = match reader.header().tid(region.chromosome.as_bytes()) {
                    Some(tid) => tid,
                    None => {
                        // this archive does not have this chromosome
                        log::debug!("skipping region {}", region.label());
                        continue;
                    }
                };
                reader.fetch((tid as i32, region.start as i64, region.stop as i64))?;
                let label = region.label();
                while let Some(result) = reader.read(&mut record) {
                    result?;
                    scorer.score_read(&record, matrices, Some(label.as_str()))?;
                }
            }
            scorer.finish()
        }
    }
}

/// Scores reads against a set of matrices, accumulating hit statistics.
///
/// The scorer is its own [`ScoreConsumer`]: every window of every scored
/// read comes back through [`ScoreConsumer::accept`], where significant
/// scores are counted and, in verbose mode, printed FIMO-style with the
/// read position folded into the coordinates.
pub struct BamScorer<W: Write> {
    out: W,
    output: Option<bam::Writer>,
    verbose: bool,
    only_score_unmapped: bool,
    read_count: u64,
    unmapped_count: u64,
    read_hit_count: u64,
    unmapped_hit_count: u64,
    total_hit_count: u64,
    sequence: Vec<u8>,
    read_pos: i64,
    read_name: String,
}

impl<W: Write> BamScorer<W> {
    pub fn new(
        header: &bam::HeaderView,
        options: &Options,
        mut out: W,
    ) -> Result<Self, RunError> {
        let output = match &options.output {
            Some(path) => Some(bam::Writer::from_path(
                path,
                &bam::Header::from_template(header),
                bam::Format::Bam,
            )?),
            None => None,
        };
        if options.verbose {
            fimo::write_header(&mut out)?;
        }
        Ok(Self {
            out,
            output,
            verbose: options.verbose,
            only_score_unmapped: options.only_score_unmapped,
            read_count: 0,
            unmapped_count: 0,
            read_hit_count: 0,
            unmapped_hit_count: 0,
            total_hit_count: 0,
            sequence: Vec::new(),
            read_pos: -1,
            read_name: String::new(),
        })
    }

    /// Score one read against every matrix, updating the counters and
    /// passing the read through to the output archive if it hit.
    ///
    /// `region_label` tags scores from index-fetched reads; without it the
    /// read name labels any verbose output.
    pub fn score_read(
        &mut self,
        record: &bam::Record,
        matrices: &[ScoreMatrix],
        region_label: Option<&str>,
    ) -> Result<(), RunError> {
        self.read_count += 1;
        if record.is_unmapped() {
            self.unmapped_count += 1;
        } else if self.only_score_unmapped {
            return Ok(());
        }

        // unpack the 4-bit packed bases; with uniform read lengths the
        // buffer is allocated once
        let seq = record.seq();
        self.sequence.resize(seq.len(), 0);
        for (i, base) in self.sequence.iter_mut().enumerate() {
            *base = NT16_BASES[seq.encoded_base(i) as usize];
        }

        self.read_pos = record.pos();
        self.read_name = String::from_utf8_lossy(record.qname()).into_owned();

        let hits_before = self.total_hit_count;
        let label = region_label.unwrap_or("");
        let sequence = std::mem::take(&mut self.sequence);
        for matrix in matrices {
            matrix.score(&sequence, label, self)?;
        }
        self.sequence = sequence;

        if self.total_hit_count > hits_before {
            self.read_hit_count += 1;
            if record.is_unmapped() {
                self.unmapped_hit_count += 1;
            }
            if let Some(writer) = self.output.as_mut() {
                writer.write(record)?;
            }
        }
        Ok(())
    }

    /// Close the passthrough archive and write the summary block.
    pub fn finish(mut self) -> Result<W, RunError> {
        // dropping the writer flushes it before the input closes
        self.output.take();

        if !self.only_score_unmapped {
            self.print_percent(
                "total hits",
                self.read_hit_count,
                "total reads",
                self.read_count,
            )?;
            self.print_percent(
                "mapped hits",
                self.read_hit_count - self.unmapped_hit_count,
                "mapped reads",
                self.read_count - self.unmapped_count,
            )?;
        }
        self.print_percent(
            "unmapped hits",
            self.unmapped_hit_count,
            "unmapped reads",
            self.unmapped_count,
        )?;
        if !self.only_score_unmapped {
            self.print_percent(
                "unmapped hits",
                self.unmapped_hit_count,
                "total hits",
                self.read_hit_count,
            )?;
        }
        self.print_percent(
            "unmapped reads",
            self.unmapped_count,
            "total reads",
            self.read_count,
        )?;
        writeln!(
            self.out,
            "# total hits: {} (average hits per hit read = {})",
            self.total_hit_count,
            fimo::format_sig(self.total_hit_count as f64 / self.read_hit_count as f64, 6),
        )?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn print_percent(
        &mut self,
        upper_label: &str,
        upper: u64,
        lower_label: &str,
        lower: u64,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "# ({}) / ({}) = {}/{} = {}%",
            upper_label,
            lower_label,
            upper,
            lower,
            fimo::format_sig(100.0 * (upper as f64 / lower as f64), 6),
        )
    }
}

impl<W: Write> ScoreConsumer for BamScorer<W> {
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
            self.total_hit_count += 1;
            if self.verbose {
                let name = if sequence_name.is_empty() {
                    self.read_name.as_str()
                } else {
                    sequence_name
                };
                // unmapped reads have no position; report from zero
                let pos = self.read_pos.max(0) as usize;
                fimo::write_match(
                    &mut self.out,
                    motif_name,
                    name,
                    is_reverse_complement,
                    pos + start,
                    pos + stop,
                    score,
                )?;
            }
        }
        Ok(())
    }
}
