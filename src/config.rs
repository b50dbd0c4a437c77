//src/config.rs

use std::path::PathBuf;

use crate::compress::Compressor;
use crate::sample::Sampler;

/// Every knob of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The alignment report (`*.alignments.txt`, optionally gzipped).
    pub input: PathBuf,
    /// Directory receiving all outputs.
    pub outdir: PathBuf,
    /// Read pairs to draw when downsampling.
    pub nreads: u64,
    pub seed: i64,
    /// Data lines to pass over before records are exported.
    pub skip: u64,
    pub sampler: Sampler,
    /// `None` leaves the outputs uncompressed.
    pub compressor: Option<Compressor>,
    /// Stop after writing the full FASTQ pair.
    pub split_only: bool,
}

impl PipelineConfig {
    pub fn new<P: Into<PathBuf>>(input: P, nreads: u64, seed: i64) -> Self {
        Self {
            input: input.into(),
            outdir: PathBuf::from("."),
            nreads,
            seed,
            skip: 0,
            sampler: Sampler::default(),
            compressor: Some(Compressor::default()),
            split_only: false,
        }
    }

    pub fn outdir<P: Into<PathBuf>>(mut self, outdir: P) -> Self {
        self.outdir = outdir.into();
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn sampler(mut self, sampler: Sampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn compressor(mut self, compressor: Option<Compressor>) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn split_only(mut self, split_only: bool) -> Self {
        self.split_only = split_only;
        self
    }
}
