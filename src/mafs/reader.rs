use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use super::record::{parse_record, LocusRecord, MalformedRecord, SourceRole};
use crate::merge::RecordSource;

/// Error raised while pulling records from one `.mafs` input.
#[derive(Debug, Error)]
pub enum MafsError {
    /// A data line failed to parse; the conversion must halt here.
    #[error("{role} input, line {line}: {cause}")]
    Malformed {
        /// Role of the stream the line came from.
        role: SourceRole,
        /// 1-based line number within the input.
        line: u64,
        /// What was wrong with the line.
        #[source]
        cause: MalformedRecord,
    },
    /// The underlying reader failed.
    #[error("{role} input could not be read")]
    Io {
        /// Role of the stream that failed.
        role: SourceRole,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Pull-based reader over one `.mafs` input stream.
///
/// The first line is always treated as the column header and skipped.
/// Blank lines and stray repeated headers (first column literally
/// `chromo`, as left behind by concatenating files) are skipped as well;
/// every other line must parse as a record.
#[derive(Debug)]
pub struct MafsReader<R> {
    reader: R,
    role: SourceRole,
    line_no: u64,
    buf: String,
}

impl MafsReader<BufReader<File>> {
    /// Open a `.mafs` file for the given role.
    pub fn open(path: &Path, role: SourceRole) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), role))
    }
}

impl<R: BufRead> MafsReader<R> {
    /// Wrap an already-open reader.
    pub fn new(reader: R, role: SourceRole) -> Self {
        Self {
            reader,
            role,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// Role this reader was opened with.
    pub fn role(&self) -> SourceRole {
        self.role
    }

    /// Next record in input order, or `None` once the stream is exhausted.
    pub fn next_record(&mut self) -> Result<Option<LocusRecord>, MafsError> {
        loop {
            self.buf.clear();
            let read = self
                .reader
                .read_line(&mut self.buf)
                .map_err(|source| MafsError::Io {
                    role: self.role,
                    source,
                })?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if self.line_no == 1 {
                // column header, skipped unconditionally
                continue;
            }
            let line = self.buf.trim_end_matches(['\r', '\n']);
            if line.is_empty() || line.split('\t').next() == Some("chromo") {
                continue;
            }
            return match parse_record(line, self.role) {
                Ok(record) => Ok(Some(record)),
                Err(cause) => Err(MafsError::Malformed {
                    role: self.role,
                    line: self.line_no,
                    cause,
                }),
            };
        }
    }
}

impl<R: BufRead> RecordSource for MafsReader<R> {
    fn role(&self) -> SourceRole {
        self.role
    }

    fn next_record(&mut self) -> Result<Option<LocusRecord>, MafsError> {
        MafsReader::next_record(self)
    }
}
