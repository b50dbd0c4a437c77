//src/fastq.rs

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::error::{Error, Result};
use crate::types::FastqRecord;

/// Opens `path` for buffered line reading, decoding gzip when it ends in `.gz`.
pub fn open_text<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| Error::io(path, e))?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    Ok(if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    })
}

/// Buffered 4-line FASTQ writer for one mate stream.
pub struct FastqWriter {
    path: PathBuf,
    out: BufWriter<File>,
    records: u64,
}

impl FastqWriter {
    /// Creates (or truncates) the file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        Ok(Self {
            path,
            out: BufWriter::new(file),
            records: 0,
        })
    }

    pub fn write_record(&mut self, rec: &FastqRecord<'_>) -> Result<()> {
        write!(self.out, "@{}\n{}\n+\n{}\n", rec.header, rec.seq, rec.quals)
            .map_err(|e| Error::io(&self.path, e))?;
        self.records += 1;
        Ok(())
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    /// Flushes and closes the stream, returning the number of records written.
    pub fn finish(mut self) -> Result<u64> {
        self.out.flush().map_err(|e| Error::io(&self.path, e))?;
        Ok(self.records)
    }
}

/// An owned FASTQ record as read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqEntry {
    pub id: String,
    pub header_line: String,
    pub seq: String,
    pub quals: String,
}

/// Reads one line into `line`; `false` at EOF.
fn next_line(reader: &mut dyn BufRead, line: &mut String, path: &Path) -> Result<bool> {
    line.clear();
    let n = reader.read_line(line).map_err(|e| Error::io(path, e))?;
    Ok(n > 0)
}

/// Minimal FASTQ read function that also supports .gz
pub fn read_fastq_records<P: AsRef<Path>>(path: P) -> Result<Vec<FastqEntry>> {
    let path = path.as_ref();
    let mut reader = open_text(path)?;

    let mut entries = Vec::new();
    let mut line = String::new();
    loop {
        // 1) header
        if !next_line(reader.as_mut(), &mut line, path)? {
            break;
        }
        let header_line = line.trim_end().to_string();
        let Some(header_str) = header_line.strip_prefix('@') else {
            // Not a FASTQ header
            continue;
        };
        let header_str = header_str.to_string();

        // 2) sequence
        if !next_line(reader.as_mut(), &mut line, path)? {
            break;
        }
        let seq = line.trim_end().to_string();

        // 3) plus line
        if !next_line(reader.as_mut(), &mut line, path)? {
            break;
        }

        // 4) quality
        if !next_line(reader.as_mut(), &mut line, path)? {
            break;
        }
        let quals = line.trim_end().to_string();

        entries.push(FastqEntry {
            id: header_str.split(' ').next().unwrap_or_default().to_string(),
            header_line: header_str,
            seq,
            quals,
        });
    }

    Ok(entries)
}

/// Counts FASTQ records without keeping them, reusing one line buffer.
pub fn count_fastq_records<P: AsRef<Path>>(path: P) -> Result<usize> {
    let path = path.as_ref();
    let mut reader = open_text(path)?;

    let mut count = 0;
    let mut line = String::new();
    loop {
        if !next_line(reader.as_mut(), &mut line, path)? {
            break;
        }
        if !line.starts_with('@') {
            continue;
        }
        // sequence, plus line, quality
        let mut complete = true;
        for _ in 0..3 {
            if !next_line(reader.as_mut(), &mut line, path)? {
                complete = false;
                break;
            }
        }
        if !complete {
            break;
        }
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_writer_emits_four_line_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.fq");

        let mut w = FastqWriter::create(&path).unwrap();
        w.write_record(&FastqRecord { header: "r1 extra", seq: "ACGT", quals: "IIII" })
            .unwrap();
        w.write_record(&FastqRecord { header: "r2", seq: "GG", quals: "##" })
            .unwrap();
        assert_eq!(w.records(), 2);
        assert_eq!(w.finish().unwrap(), 2);

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "@r1 extra\nACGT\n+\nIIII\n@r2\nGG\n+\n##\n");
    }

    #[test]
    fn test_reader_reads_back_plain_and_gz() {
        let dir = tempdir().unwrap();
        let body = "@read1 lane=1\nACGT\n+\nIIII\n@read2\nTT\n+\nJJ\n";

        let plain = dir.path().join("r.fq");
        fs::write(&plain, body).unwrap();

        let gz = dir.path().join("r.fq.gz");
        let mut enc = GzEncoder::new(fs::File::create(&gz).unwrap(), Compression::default());
        enc.write_all(body.as_bytes()).unwrap();
        enc.finish().unwrap();

        for path in [plain, gz] {
            let recs = read_fastq_records(&path).unwrap();
            assert_eq!(recs.len(), 2);
            assert_eq!(recs[0].id, "read1");
            assert_eq!(recs[0].header_line, "read1 lane=1");
            assert_eq!(recs[0].seq, "ACGT");
            assert_eq!(recs[1].quals, "JJ");
        }
    }

    #[test]
    fn test_count_matches_reader_plain_and_gz() {
        let dir = tempdir().unwrap();
        // Trailing record is truncated and must not be counted
        let body = "@a\nAC\n+\nII\n@b\nGT\n+\nJJ\n@c\nTT\n+\nKK\n@d\nAA\n";

        let plain = dir.path().join("c.fq");
        fs::write(&plain, body).unwrap();

        let gz = dir.path().join("c.fq.gz");
        let mut enc = GzEncoder::new(fs::File::create(&gz).unwrap(), Compression::default());
        enc.write_all(body.as_bytes()).unwrap();
        enc.finish().unwrap();

        for path in [plain, gz] {
            assert_eq!(count_fastq_records(&path).unwrap(), 3);
            assert_eq!(read_fastq_records(&path).unwrap().len(), 3);
        }

        let empty = dir.path().join("empty.fq");
        fs::write(&empty, "").unwrap();
        assert_eq!(count_fastq_records(&empty).unwrap(), 0);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_fastq_records("/definitely/not/here.fq").unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path, PathBuf::from("/definitely/not/here.fq")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
