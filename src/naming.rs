//src/naming.rs

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Mate;

/// Suffix stripped from the input file name to obtain the output base name.
pub const REPORT_SUFFIX: &str = ".alignments.txt";

/// Every path the pipeline produces, derived from the input file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub base: String,
    pub full: [PathBuf; 2],
    pub downsampled: [PathBuf; 2],
}

impl OutputNames {
    /// Derives output names for `input`, placing them under `outdir`.
    ///
    /// The base name is the file name up to the first `.alignments.txt`
    /// (the whole file name when the suffix is absent).
    pub fn derive<P: AsRef<Path>, Q: AsRef<Path>>(
        input: P,
        outdir: Q,
        nreads: u64,
    ) -> Result<Self> {
        let input = input.as_ref();
        let file_name = input
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::InvalidInput(format!("{} has no usable file name", input.display()))
            })?;

        let base = match file_name.find(REPORT_SUFFIX) {
            Some(pos) => &file_name[..pos],
            None => file_name,
        }
        .to_string();

        let outdir = outdir.as_ref();
        let full = Mate::BOTH.map(|m| outdir.join(format!("{base}_{m}.all.fq")));
        let downsampled =
            Mate::BOTH.map(|m| outdir.join(format!("{base}.{nreads}_{m}.downsampled.fq")));

        Ok(Self {
            base,
            full,
            downsampled,
        })
    }

    pub fn full(&self, mate: Mate) -> &Path {
        &self.full[mate_index(mate)]
    }

    pub fn downsampled(&self, mate: Mate) -> &Path {
        &self.downsampled[mate_index(mate)]
    }

    /// The four produced files in compression order: full mates, then downsampled mates.
    pub fn all_outputs(&self) -> impl Iterator<Item = &Path> {
        self.full
            .iter()
            .chain(self.downsampled.iter())
            .map(PathBuf::as_path)
    }
}

/// `X` -> `X.gz`
pub fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

fn mate_index(mate: Mate) -> usize {
    match mate {
        Mate::Read1 => 0,
        Mate::Read2 => 1,
    }
}
