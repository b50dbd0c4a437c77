use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;

use alnsplit_rs::compress::{Compressor, DEFAULT_GZIP};
use alnsplit_rs::sample::{Sampler, DEFAULT_SEQTK};
use alnsplit_rs::{run_pipeline_with, PipelineConfig, Stage};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompressionMode {
    /// Run the external gzip program
    External,
    /// Compress in-process
    Builtin,
}

#[derive(Parser)]
#[command(name = "alnsplit-rs")]
#[command(about = "Split a paired alignment report into FASTQ mates, downsample and compress them", long_about = None)]
#[command(version)]
struct Cli {
    /// The input alignments.txt file
    #[arg(long, value_name = "FILE")]
    input: PathBuf,

    /// Number of read pairs to downsample
    #[arg(long, value_name = "INT")]
    nreads: u64,

    /// Random seed shared by both mates
    #[arg(long, value_name = "INT", allow_hyphen_values = true)]
    seed: i64,

    /// Export records only after skipping the first INT data lines
    #[arg(long, value_name = "INT", default_value = "0")]
    skip: u64,

    /// Directory for all output files
    #[arg(long, value_name = "DIR", default_value = ".")]
    outdir: PathBuf,

    /// Path to the seqtk executable
    #[arg(long, value_name = "PATH", env = "SEQTK", default_value = DEFAULT_SEQTK)]
    seqtk: PathBuf,

    /// Path to the gzip executable
    #[arg(long, value_name = "PATH", env = "GZIP_BIN", default_value = DEFAULT_GZIP)]
    gzip: PathBuf,

    /// How to compress the outputs
    #[arg(long, value_enum, default_value_t = CompressionMode::External)]
    compression: CompressionMode,

    /// Leave outputs uncompressed
    #[arg(long)]
    no_compress: bool,

    /// Only write the full FASTQ pair
    #[arg(long)]
    split_only: bool,

    /// More logging (debug lists every malformed line)
    #[arg(short, long)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn compressor(&self) -> Option<Compressor> {
        match (self.no_compress, self.compression) {
            (true, _) => None,
            (false, CompressionMode::External) => Some(Compressor::External {
                program: self.gzip.clone(),
            }),
            (false, CompressionMode::Builtin) => Some(Compressor::Builtin),
        }
    }
}

fn spinner(color: &str, msg: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = format!("{{spinner:.{color}}} {{msg}}");
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template(&template)
    {
        spinner.set_style(style);
    }
    spinner.set_message(msg);
    spinner
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let compressor = cli.compressor();

    let config = PipelineConfig::new(cli.input, cli.nreads, cli.seed)
        .outdir(cli.outdir)
        .skip(cli.skip)
        .sampler(Sampler::new(cli.seqtk))
        .compressor(compressor)
        .split_only(cli.split_only);

    let mut current: Option<ProgressBar> = None;
    let result = run_pipeline_with(&config, |stage| {
        if let Some(prev) = current.take() {
            prev.finish_with_message("done");
        }
        current = Some(match stage {
            Stage::Split => spinner("blue", "Splitting alignments into FASTQ mates..."),
            Stage::Downsample => spinner("green", "Downsampling read pairs..."),
            Stage::Compress => spinner("yellow", "Compressing outputs..."),
        });
    });

    match result {
        Ok(summary) => {
            if let Some(last) = current.take() {
                last.finish_with_message("done");
            }
            for path in &summary.outputs {
                log::info!("wrote {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Some(last) = current.take() {
                last.abandon_with_message("failed");
            }
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec!["alnsplit-rs", "--input", "s.alignments.txt", "--nreads", "10", "--seed", "3"];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_seed() {
        let cli = Cli::try_parse_from([
            "alnsplit-rs", "--input", "s.alignments.txt", "--nreads", "10", "--seed", "-5",
        ])
        .unwrap();
        assert_eq!(cli.seed, -5);
        assert_eq!(cli.skip, 0);
        assert_eq!(cli.outdir, PathBuf::from("."));
    }

    #[test]
    fn test_compression_flags() {
        assert_eq!(
            parse(&["--gzip", "/usr/bin/pigz"]).compressor(),
            Some(Compressor::External { program: PathBuf::from("/usr/bin/pigz") })
        );
        assert_eq!(
            parse(&["--compression", "builtin"]).compressor(),
            Some(Compressor::Builtin)
        );
        assert_eq!(parse(&["--no-compress", "--compression", "builtin"]).compressor(), None);
        assert!(matches!(parse(&[]).compressor(), Some(Compressor::External { .. })));
    }

    #[test]
    fn test_missing_required_and_conflicts() {
        assert!(Cli::try_parse_from(["alnsplit-rs", "--input", "x", "--nreads", "1"]).is_err());
        assert!(Cli::try_parse_from([
            "alnsplit-rs", "--input", "x", "--nreads", "1", "--seed", "1", "-v", "-q",
        ])
        .is_err());
    }
}
