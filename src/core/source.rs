//! Log sources feeding the ingestor.

use crate::errors::{AppError, AppResult};
use crate::models::EventOrigin;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::PathBuf;

/// Anything the ingestor can pull raw log lines from.
pub trait LogSource {
    /// Name used in reports and the internal log.
    fn name(&self) -> String;

    /// Lines available since the previous call. A source that cannot be read
    /// returns [`AppError::SourceUnavailable`].
    fn read_lines(&mut self) -> AppResult<Vec<String>>;

    fn origin(&self) -> EventOrigin {
        EventOrigin::Log
    }
}

/// Append-only text file read incrementally.
///
/// The offset only moves past newline-terminated lines, so a line still being
/// written is read again (and deduplicated) on the next cycle. A file shorter
/// than the saved offset was rotated or truncated and is read from the start.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    offset: u64,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn unavailable(&self, err: std::io::Error) -> AppError {
        AppError::SourceUnavailable {
            source_name: self.name(),
            reason: err.to_string(),
        }
    }
}

impl LogSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_lines(&mut self) -> AppResult<Vec<String>> {
        let file = File::open(&self.path).map_err(|e| self.unavailable(e))?;
        let len = file.metadata().map_err(|e| self.unavailable(e))?.len();
        if len < self.offset {
            self.offset = 0;
        }

        let mut reader = BufReader::new(file);
        reader
            .seek(SeekFrom::Start(self.offset))
            .map_err(|e| self.unavailable(e))?;

        let mut lines = Vec::new();
        let mut consumed: u64 = 0;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| self.unavailable(e))?;
            if n == 0 {
                break;
            }
            if buf.last() == Some(&b'\n') {
                consumed += n as u64;
            }
            let line = String::from_utf8_lossy(&buf);
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
        }

        self.offset += consumed;
        Ok(lines)
    }
}
