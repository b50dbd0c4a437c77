//src/compress.rs

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{Error, Result};
use crate::external::{display_command, run_tool};
use crate::naming::gz_path;

pub const DEFAULT_GZIP: &str = "gzip";

/// How produced files are compressed. Either way `X` becomes `X.gz`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compressor {
    /// Run an external `gzip`-compatible program on each file.
    External { program: PathBuf },
    /// Encode in-process with flate2 at the default level.
    Builtin,
}

impl Default for Compressor {
    fn default() -> Self {
        Compressor::External {
            program: PathBuf::from(DEFAULT_GZIP),
        }
    }
}

impl Compressor {
    /// Compresses `path` in place, returning the path of the `.gz` file.
    pub fn compress(&self, path: &Path) -> Result<PathBuf> {
        match self {
            Compressor::External { program } => {
                let mut cmd = Command::new(program);
                cmd.arg(path);
                log::info!("{}", display_command(&cmd));
                run_tool(&mut cmd)?;
            }
            Compressor::Builtin => {
                log::info!("compressing {}", path.display());
                gzip_file(path)?;
            }
        }
        Ok(gz_path(path))
    }

    /// Compresses every file in order, stopping at the first failure.
    pub fn compress_all<'a, I>(&self, paths: I) -> Result<Vec<PathBuf>>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        paths.into_iter().map(|p| self.compress(p)).collect()
    }
}

/// Writes `path.gz` and removes `path`, like `gzip path`.
fn gzip_file(path: &Path) -> Result<()> {
    let target = gz_path(path);

    let mut input = BufReader::new(File::open(path).map_err(|e| Error::io(path, e))?);
    let out = File::create(&target).map_err(|e| Error::io(&target, e))?;
    let mut encoder = GzEncoder::new(BufWriter::new(out), Compression::default());

    // Read failures belong to the source, write failures to the target
    loop {
        let chunk = input.fill_buf().map_err(|e| Error::io(path, e))?;
        if chunk.is_empty() {
            break;
        }
        let n = chunk.len();
        encoder.write_all(chunk).map_err(|e| Error::io(&target, e))?;
        input.consume(n);
    }
    encoder
        .finish()
        .and_then(|mut w| w.flush())
        .map_err(|e| Error::io(&target, e))?;

    fs::remove_file(path).map_err(|e| Error::io(path, e))
}
