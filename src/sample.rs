//src/sample.rs

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::external::{display_command, run_tool};
use crate::fastq::count_fastq_records;
use crate::naming::OutputNames;
use crate::types::Mate;

/// Where the sampler lives when nothing else is configured.
pub const DEFAULT_SEQTK: &str = "/opt/seqtk/seqtk";

/// Wrapper around `seqtk sample`.
///
/// Running it on both mate files with the same seed and count draws the
/// same record positions from each, which keeps the pairs aligned.
#[derive(Debug, Clone)]
pub struct Sampler {
    pub program: PathBuf,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(DEFAULT_SEQTK)
    }
}

impl Sampler {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The command that samples `nreads` records of `input` with `seed`.
    pub fn command(&self, seed: i64, nreads: u64, input: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("sample")
            .arg(format!("-s{seed}"))
            .arg(input)
            .arg(nreads.to_string());
        cmd
    }

    /// Samples `input` into `output`, which receives the tool's stdout.
    pub fn sample(&self, seed: i64, nreads: u64, input: &Path, output: &Path) -> Result<()> {
        let mut cmd = self.command(seed, nreads, input);
        log::info!("{} > {}", display_command(&cmd), output.display());

        let out = File::create(output).map_err(|e| Error::io(output, e))?;
        cmd.stdout(Stdio::from(out));
        run_tool(&mut cmd)
    }
}

/// Downsamples both mates with a shared seed, then checks the two outputs
/// still hold the same number of records.
///
/// Returns the record count of each downsampled file.
pub fn downsample_pairs(
    sampler: &Sampler,
    seed: i64,
    nreads: u64,
    names: &OutputNames,
) -> Result<[usize; 2]> {
    for mate in Mate::BOTH {
        sampler.sample(seed, nreads, names.full(mate), names.downsampled(mate))?;
    }

    let c1 = count_fastq_records(names.downsampled(Mate::Read1))?;
    let c2 = count_fastq_records(names.downsampled(Mate::Read2))?;

    if c1 != c2 {
        log::warn!(
            "downsampled mates disagree ({c1} vs {c2} records); pairing is broken"
        );
    } else {
        log::info!("downsampled {c1} read pairs");
    }
    Ok([c1, c2])
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::fastq::read_fastq_records;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    /// Writes an executable stand-in for seqtk: `sample -sSEED FILE N`.
    fn fake_sampler(dir: &Path, script: &str) -> Sampler {
        let path = dir.join("fake-seqtk");
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        Sampler::new(path)
    }

    fn write_fastq(path: &Path, n: usize, mate: u8) {
        let body: String = (0..n)
            .map(|i| format!("@r{i}/{mate}\nACGT\n+\nIIII\n"))
            .collect();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_command_line() {
        let cmd = Sampler::default().command(-4, 250, Path::new("x_pe1.all.fq"));
        assert_eq!(
            display_command(&cmd),
            "/opt/seqtk/seqtk sample -s-4 x_pe1.all.fq 250"
        );
    }

    #[test]
    fn test_downsample_pairs_keeps_counts() {
        let dir = tempdir().unwrap();
        let names = OutputNames::derive("s.alignments.txt", dir.path(), 2).unwrap();
        write_fastq(names.full(Mate::Read1), 5, 1);
        write_fastq(names.full(Mate::Read2), 5, 2);

        // First 4*N lines of the input, and record the seed it was given.
        let sampler = fake_sampler(
            dir.path(),
            &format!(
                "printf '%s\\n' \"$2\" >> '{}/seeds'\nhead -n $(( $4 * 4 )) \"$3\"",
                dir.path().display()
            ),
        );

        let counts = downsample_pairs(&sampler, 11, 2, &names).unwrap();
        assert_eq!(counts, [2, 2]);

        let seeds = fs::read_to_string(dir.path().join("seeds")).unwrap();
        assert_eq!(seeds, "-s11\n-s11\n");

        let recs = read_fastq_records(names.downsampled(Mate::Read2)).unwrap();
        assert_eq!(recs[1].header_line, "r1/2");
    }

    #[test]
    fn test_sampler_failure_aborts() {
        let dir = tempdir().unwrap();
        let names = OutputNames::derive("s.alignments.txt", dir.path(), 2).unwrap();
        write_fastq(names.full(Mate::Read1), 1, 1);
        write_fastq(names.full(Mate::Read2), 1, 2);

        let sampler = fake_sampler(dir.path(), "exit 1");
        let err = downsample_pairs(&sampler, 1, 2, &names).unwrap_err();
        assert!(matches!(err, Error::ToolFailed { .. }));
        // Aborted before the second mate was attempted
        assert!(!names.downsampled(Mate::Read2).exists());
    }
}
