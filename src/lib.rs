// src/lib.rs
pub mod types;
pub mod error;
pub mod config;
pub mod naming;
pub mod fastq;
pub mod alignments;
pub mod external;
pub mod sample;
pub mod compress;

use std::path::PathBuf;

pub use crate::config::PipelineConfig;
pub use crate::error::{Error, Result};

use crate::alignments::split_alignments;
use crate::naming::OutputNames;
use crate::sample::downsample_pairs;
use crate::types::{Mate, SplitStats};

/// Pipeline stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Split,
    Downsample,
    Compress,
}

/// What a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub names: OutputNames,
    pub stats: SplitStats,
    /// Records in each downsampled mate file, when sampling ran.
    pub downsampled: Option<[usize; 2]>,
    /// Final paths of every produced file (`.gz` when compressed).
    pub outputs: Vec<PathBuf>,
}

/// Runs the whole pipeline: split, downsample, compress.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineSummary> {
    run_pipeline_with(config, |_| {})
}

/// Same as [`run_pipeline`], calling `on_stage` as each stage starts.
pub fn run_pipeline_with<F>(config: &PipelineConfig, mut on_stage: F) -> Result<PipelineSummary>
where
    F: FnMut(Stage),
{
    // 1. Split the report into mate files
    let names = OutputNames::derive(&config.input, &config.outdir, config.nreads)?;
    on_stage(Stage::Split);
    let stats = split_alignments(
        &config.input,
        config.skip,
        names.full(Mate::Read1),
        names.full(Mate::Read2),
    )?;

    if config.split_only {
        let outputs = names.full.to_vec();
        return Ok(PipelineSummary {
            names,
            stats,
            downsampled: None,
            outputs,
        });
    }

    // 2. Draw the same positions from both mates
    on_stage(Stage::Downsample);
    let downsampled = downsample_pairs(&config.sampler, config.seed, config.nreads, &names)?;

    // 3. Compress full and downsampled files
    let outputs = match &config.compressor {
        Some(compressor) => {
            on_stage(Stage::Compress);
            compressor.compress_all(names.all_outputs())?
        }
        None => names.all_outputs().map(PathBuf::from).collect(),
    };

    Ok(PipelineSummary {
        names,
        stats,
        downsampled: Some(downsampled),
        outputs,
    })
}
