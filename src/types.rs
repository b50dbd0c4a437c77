//src/types.rs

use ahash::AHashMap;
use std::fmt;
use thiserror::Error;

/// One end of a read pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mate {
    Read1,
    Read2,
}

impl Mate {
    pub const BOTH: [Mate; 2] = [Mate::Read1, Mate::Read2];

    /// Tag used in output file names (`pe1` / `pe2`).
    pub fn tag(self) -> &'static str {
        match self {
            Mate::Read1 => "pe1",
            Mate::Read2 => "pe2",
        }
    }
}

impl fmt::Display for Mate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A structured view of one data line of the alignment report.
///
/// Columns used:
/// ```text
/// 1: <seq1>,<seq2>   2: <qual1>,<qual2>   3: <descr1>   4: <descr2>
/// ```
/// Column 0 and anything after column 4 are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord<'a> {
    pub sequences: (&'a str, &'a str),
    pub qualities: (&'a str, &'a str),
    pub descriptions: (&'a str, &'a str),
}

impl<'a> AlignmentRecord<'a> {
    /// The FASTQ record for one mate of this pair.
    pub fn mate(&self, mate: Mate) -> FastqRecord<'a> {
        match mate {
            Mate::Read1 => FastqRecord {
                header: self.descriptions.0,
                seq: self.sequences.0,
                quals: self.qualities.0,
            },
            Mate::Read2 => FastqRecord {
                header: self.descriptions.1,
                seq: self.sequences.1,
                quals: self.qualities.1,
            },
        }
    }
}

/// A minimal FASTQ record; the header is stored without its leading `@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastqRecord<'a> {
    pub header: &'a str,
    pub seq: &'a str,
    pub quals: &'a str,
}

/// Why a data line could not be turned into a read pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RecordError {
    #[error("expected at least 5 tab-separated columns, found {found}")]
    MissingColumns { found: usize },
    #[error("sequence column is not a comma-separated pair")]
    SequencePair,
    #[error("quality column is not a comma-separated pair")]
    QualityPair,
}

impl RecordError {
    /// Short label used when reporting the error breakdown.
    pub fn label(&self) -> &'static str {
        match self {
            RecordError::MissingColumns { .. } => "missing columns",
            RecordError::SequencePair => "unpaired sequence",
            RecordError::QualityPair => "unpaired quality",
        }
    }
}

/// Counters accumulated while splitting the report.
#[derive(Debug, Clone, Default)]
pub struct SplitStats {
    /// Data lines consumed by the skip window.
    pub skipped: u64,
    /// Data lines past the skip window.
    pub all: u64,
    pub written: u64,
    pub errors: u64,
    /// Error lines by reason label.
    pub error_reasons: AHashMap<&'static str, u64>,
}

impl SplitStats {
    pub fn record_error(&mut self, err: &RecordError) {
        self.errors += 1;
        *self.error_reasons.entry(err.label()).or_insert(0) += 1;
    }

    /// `true` when every processed line was either written or counted as an error.
    pub fn is_consistent(&self) -> bool {
        self.written + self.errors == self.all
    }
}
