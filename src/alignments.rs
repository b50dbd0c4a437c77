//src/alignments.rs

use std::io::{self, BufRead};
use std::path::Path;

use crate::error::{Error, Result};
use crate::fastq::{open_text, FastqWriter};
use crate::types::{AlignmentRecord, Mate, RecordError, SplitStats};

/// Parses one data line of the alignment report:
/// ```text
/// <ignored>\t<seq1>,<seq2>\t<qual1>,<qual2>\t<descr1>\t<descr2>[\t...]
/// ```
/// Surrounding whitespace is trimmed before splitting on tabs.
pub fn parse_record(line: &str) -> std::result::Result<AlignmentRecord<'_>, RecordError> {
    let fields: Vec<&str> = line.trim().split('\t').collect();
    if fields.len() < 5 {
        return Err(RecordError::MissingColumns {
            found: fields.len(),
        });
    }

    let sequences = split_pair(fields[1]).ok_or(RecordError::SequencePair)?;
    let qualities = split_pair(fields[2]).ok_or(RecordError::QualityPair)?;

    Ok(AlignmentRecord {
        sequences,
        qualities,
        descriptions: (fields[3], fields[4]),
    })
}

/// Splits `a,b` into exactly two parts.
fn split_pair(field: &str) -> Option<(&str, &str)> {
    let (a, b) = field.split_once(',')?;
    if b.contains(',') {
        return None;
    }
    Some((a, b))
}

/// Reads one line into `buf`, ending at `\n`, `\r\n` or a lone `\r`.
/// The terminator is not kept. Returns `false` at EOF.
pub fn read_report_line(reader: &mut dyn BufRead, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    let mut any = false;
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(any);
        }
        any = true;

        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) => {
                let terminator = available[i];
                buf.extend_from_slice(&available[..i]);
                reader.consume(i + 1);
                if terminator == b'\r' && reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                return Ok(true);
            }
            None => {
                let n = available.len();
                buf.extend_from_slice(available);
                reader.consume(n);
            }
        }
    }
}

/// Next report line as UTF-8 text, `None` at EOF.
fn next_report_line<'b>(
    reader: &mut dyn BufRead,
    buf: &'b mut Vec<u8>,
    path: &Path,
) -> Result<Option<&'b str>> {
    if !read_report_line(reader, buf).map_err(|e| Error::io(path, e))? {
        return Ok(None);
    }
    std::str::from_utf8(buf)
        .map(Some)
        .map_err(|e| Error::io(path, io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Splits an alignment report into two FASTQ mate files.
///
/// The first line is a title and is discarded. The next `skip` data lines
/// are passed over; every later line is either written as one record to
/// each mate file or counted as an error. Both streams are flushed and
/// closed before returning.
pub fn split_alignments<P, Q, R>(
    input: P,
    skip: u64,
    read1_out: Q,
    read2_out: R,
) -> Result<SplitStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let input = input.as_ref();
    let mut reader = open_text(input)?;

    let mut fastq1 = FastqWriter::create(read1_out)?;
    let mut fastq2 = FastqWriter::create(read2_out)?;
    let mut stats = SplitStats::default();

    let mut buf = Vec::new();

    // Title line
    next_report_line(reader.as_mut(), &mut buf, input)?;

    let mut seen: u64 = 0;
    while let Some(line) = next_report_line(reader.as_mut(), &mut buf, input)? {
        seen += 1;
        if seen <= skip {
            stats.skipped += 1;
            continue;
        }

        stats.all += 1;
        match parse_record(line) {
            Ok(record) => {
                fastq1.write_record(&record.mate(Mate::Read1))?;
                fastq2.write_record(&record.mate(Mate::Read2))?;
                stats.written += 1;
            }
            Err(err) => {
                // +1 for the title line
                log::debug!("{}:{}: {}", input.display(), seen + 1, err);
                stats.record_error(&err);
            }
        }
    }

    let n1 = fastq1.finish()?;
    let n2 = fastq2.finish()?;
    debug_assert_eq!(n1, n2);

    log::info!("lines skipped: {}", stats.skipped);
    log::info!("lines skipped due to error: {}", stats.errors);
    log::info!("lines written: {}", stats.written);
    for (reason, count) in &stats.error_reasons {
        log::info!("  {reason}: {count}");
    }

    if !stats.is_consistent() {
        return Err(Error::CountMismatch {
            all: stats.all,
            written: stats.written,
            errors: stats.errors,
        });
    }

    Ok(stats)
}
