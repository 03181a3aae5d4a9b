// Writes serialized results to stdout or a fresh file

use crate::error::{EsqError, Result};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Output destination writer
pub struct Sink;

impl Sink {
    /// Write to `destination`, or stdout when `None`
    pub fn write(bytes: &[u8], destination: Option<&Path>) -> Result<()> {
        match destination {
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                Self::write_to(&mut handle, bytes).map_err(|e| EsqError::OutputWriteError {
                    path: PathBuf::from("<stdout>"),
                    source: e,
                })
            }
            Some(path) => Self::write_file(bytes, path),
        }
    }

    /// Write `bytes` followed by a newline and flush
    pub fn write_to<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
        writer.write_all(bytes)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    /// Create `path` exclusively and write `bytes` into it.
    ///
    /// Never truncates or appends to an existing entry.
    pub fn write_file(bytes: &[u8], path: &Path) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    EsqError::OutputFileExists {
                        path: path.to_path_buf(),
                    }
                } else {
                    EsqError::OutputWriteError {
                        path: path.to_path_buf(),
                        source: e,
                    }
                }
            })?;

        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|e| EsqError::OutputWriteError {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!("Output written to {}", path.display());
        Ok(())
    }
}
