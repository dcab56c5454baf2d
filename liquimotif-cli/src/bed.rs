//! Reading of BED interval files.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use crate::error::RunError;

/// A genomic interval from columns 1-3 of a BED line, 0-based half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub chromosome: String,
    pub start: u64,
    pub stop: u64,
}

impl Region {
    /// The `chrom:start-stop` label used to tag scores from this region.
    pub fn label(&self) -> String {
        format!("{}:{}-{}", self.chromosome, self.start, self.stop)
    }
}

/// Read the regions of a BED file.
///
/// Columns past the third are ignored, as are blank lines, comments and
/// `track`/`browser` header lines.
pub fn parse_regions(path: &Path) -> Result<Vec<Region>, RunError> {
    let file = File::open(path).map_err(|source| RunError::Open {
        path: path.into(),
        source,
    })?;
    let mut regions = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with("track")
            || trimmed.starts_with("browser")
        {
            continue;
        }
        match parse_line(trimmed) {
            Some(region) => regions.push(region),
            None => {
                return Err(RunError::Region {
                    path: path.into(),
                    reason: format!("malformed line {}", number + 1),
                })
            }
        }
    }
    Ok(regions)
}

fn parse_line(line: &str) -> Option<Region> {
    let mut fields = line.split_whitespace();
    let chromosome = fields.next()?.to_owned();
    let start = fields.next()?.parse().ok()?;
    let stop = fields.next()?.parse().ok()?;
    Some(Region {
        chromosome,
        start,
        stop,
    })
}
