//! Log destinations.
//!
//! # Responsibilities
//! - Pair a destination with an encoder and a minimum level
//! - Serialize concurrent writes so each record lands as one contiguous line
//! - Create the log directory and file for file sinks

use std::fmt;
use std::fs::{DirBuilder, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::error::LogError;
use crate::logging::encoder::Encoder;
use crate::logging::level::Level;
use crate::logging::record::Record;

enum Destination {
    Stdout(io::Stdout),
    File(File),
    Writer(Box<dyn Write + Send>),
}

impl Destination {
    fn label(&self) -> &'static str {
        match self {
            Destination::Stdout(_) => "stdout",
            Destination::File(_) => "file",
            Destination::Writer(_) => "writer",
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Destination::Stdout(out) => out,
            Destination::File(file) => file,
            Destination::Writer(w) => w.as_mut(),
        }
    }

    fn sync(&mut self) -> io::Result<()> {
        match self {
            Destination::File(file) => {
                file.flush()?;
                // Character devices such as /dev/null reject fsync.
                match file.sync_data() {
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::InvalidInput | io::ErrorKind::Unsupported
                        ) =>
                    {
                        Ok(())
                    }
                    other => other,
                }
            }
            other => other.writer().flush(),
        }
    }
}

/// A destination plus an encoding plus a minimum-level filter.
pub struct Sink {
    encoder: Encoder,
    level: Level,
    label: &'static str,
    destination: Mutex<Destination>,
}

impl Sink {
    /// Sink writing to an arbitrary writer.
    pub fn new(encoder: Encoder, level: Level, writer: impl Write + Send + 'static) -> Self {
        Self::with_destination(encoder, level, Destination::Writer(Box::new(writer)))
    }

    /// Sink writing to the process's standard output.
    pub fn stdout(encoder: Encoder, level: Level) -> Self {
        Self::with_destination(encoder, level, Destination::Stdout(io::stdout()))
    }

    /// JSON sink appending to `path`. Missing parent directories are
    /// created (0755) and the file is created (0666) if absent.
    pub fn file(path: &Path, level: Level) -> Result<Self, LogError> {
        let file_open = |source| LogError::FileOpen {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            let mut builder = DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                builder.mode(0o755);
            }
            builder.create(dir).map_err(file_open)?;
        }

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o666);
        }
        let file = options.open(path).map_err(file_open)?;

        tracing::debug!(path = %path.display(), %level, "Opened log file");

        Ok(Self::with_destination(
            Encoder::Json,
            level,
            Destination::File(file),
        ))
    }

    fn with_destination(encoder: Encoder, level: Level, destination: Destination) -> Self {
        Self {
            encoder,
            level,
            label: destination.label(),
            destination: Mutex::new(destination),
        }
    }

    pub fn encoder(&self) -> Encoder {
        self.encoder
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Whether records at `level` pass this sink's filter.
    pub fn accepts(&self, level: Level) -> bool {
        level >= self.level
    }

    /// Encode and write one record. The caller checks [`Sink::accepts`].
    pub fn write(&self, record: &Record) -> io::Result<()> {
        let mut buf = Vec::with_capacity(256);
        self.encoder.encode(record, &mut buf)?;

        let mut destination = self
            .destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        destination.writer().write_all(&buf)
    }

    /// Flush buffered output down to the destination.
    pub fn sync(&self) -> io::Result<()> {
        self.destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sync()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("destination", &self.label)
            .field("encoder", &self.encoder)
            .field("level", &self.level)
            .finish()
    }
}
