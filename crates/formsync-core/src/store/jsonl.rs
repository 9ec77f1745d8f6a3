//! Append-only JSON-Lines record storage.
//!
//! One JSON object per `\n`-terminated line, UTF-8, no enclosing array.
//! Records are only ever appended; the file is truncated solely by an
//! explicit [`reset`] from the caller at the start of a fresh batch run.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Write mode for [`append_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Truncate the file before writing.
    Truncate,
    /// Keep existing records and write after them.
    Append,
}

/// Truncate the records file at `path` to zero length.
///
/// Destroys all prior records in the file. No backup is taken.
pub fn reset(path: &Path) -> Result<(), StoreError> {
    File::create(path)?;
    Ok(())
}

/// Serialize `record` to a single JSON line and append it to `path`.
///
/// The file is created if it does not exist. Existing content is never
/// rewritten; a failure to open or write is fatal to the caller.
pub fn append<T: Serialize>(record: &T, path: &Path) -> Result<(), StoreError> {
    let line = serde_json::to_string(record).map_err(StoreError::Serialize)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Write a batch of records to `path`, one JSON line each.
///
/// `Mode::Truncate` replaces the file wholesale; `Mode::Append` keeps
/// existing records and writes after them.
pub fn append_all<T: Serialize>(records: &[T], path: &Path, mode: Mode) -> Result<(), StoreError> {
    let mut file = match mode {
        Mode::Truncate => File::create(path)?,
        Mode::Append => OpenOptions::new().create(true).append(true).open(path)?,
    };
    for record in records {
        let line = serde_json::to_string(record).map_err(StoreError::Serialize)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
    }
    Ok(())
}

/// Parse every line of `path` as one JSON object, in file order.
///
/// A single malformed line fails the whole read; there is no per-line
/// recovery.
pub fn load_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let record = serde_json::from_str(&line).map_err(|e| StoreError::MalformedLine {
            path: path.to_path_buf(),
            line: idx + 1,
            source: e,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Open `path` as a lazy, forward-only sequence of records.
///
/// Each line is read and parsed on demand, so files larger than memory can
/// be consumed. The sequence can only be restarted by calling `load_lazy`
/// again.
pub fn load_lazy<T: DeserializeOwned>(path: &Path) -> Result<JsonlReader<T>, StoreError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(JsonlReader {
        reader,
        path: path.to_path_buf(),
        line: 0,
        _marker: PhantomData,
    })
}

/// Streaming reader returned by [`load_lazy`].
pub struct JsonlReader<T> {
    reader: BufReader<File>,
    path: PathBuf,
    line: usize,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> Iterator for JsonlReader<T> {
    type Item = Result<T, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line += 1;
                let trimmed = buf.strip_suffix('\n').unwrap_or(&buf);
                Some(
                    serde_json::from_str(trimmed).map_err(|e| StoreError::MalformedLine {
                        path: self.path.clone(),
                        line: self.line,
                        source: e,
                    }),
                )
            }
            Err(e) => Some(Err(StoreError::Io(e))),
        }
    }
}
