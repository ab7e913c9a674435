//! Filling buffers from files.
//!
//! This is the boundary collaborator of the core: it hands over sealed
//! buffers and reports failures with the path and a readable size. Locating
//! files is left to the caller.

use alloc::format;
use core::fmt;
use std::{
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
};

use crate::{
    buffer::TextBuffer,
    content::{SplitContent, estimate_required_buffer_space},
    error::{Error, ErrorKind, Result},
    options::ParseOptions,
};

/// Smallest step by which [`FileReader::read_all`] grows a full buffer.
const READ_CHUNK: usize = 64 * 1024;

/// A byte count rendered for people: `"512.0B"`, `"1.5KB (1536)"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HumanBytes(pub u64);

impl fmt::Display for HumanBytes {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: &[u8] = b"BKMGTPE";
        let mut mantissa = self.0 as f64;
        let mut unit = 0;
        while mantissa >= 1024.0 && unit + 1 < UNITS.len() {
            mantissa /= 1024.0;
            unit += 1;
        }
        write!(f, "{mantissa:.1}{}", char::from(UNITS[unit]))?;
        if unit > 0 {
            write!(f, "B ({})", self.0)?;
        }
        Ok(())
    }
}

impl From<usize> for HumanBytes {
    fn from(n: usize) -> Self {
        Self(u64::try_from(n).unwrap_or(u64::MAX))
    }
}

/// An open file and the buffer it is read into.
#[derive(Debug)]
pub struct FileReader {
    file: File,
    path: PathBuf,
    buffer: TextBuffer,
}

impl FileReader {
    /// Opens `path` for reading.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::NotFound`] when the file does not exist and
    /// [`ErrorKind::Io`] for any other failure to open it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::from(e).context(format!("cannot open file {}", path.display())))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            buffer: TextBuffer::new(),
        })
    }

    /// The path this reader was opened with.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The buffer filled so far.
    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Makes room for at least `n` bytes before reading, e.g. the amount
    /// [`estimate_required_buffer_space`] suggests. Existing content is kept.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::OutOfMemory`] when the allocation fails.
    pub fn reserve(&mut self, n: usize) -> Result<()> {
        self.buffer.grow(n).map_err(|e| {
            e.context(format!(
                "preparing buffer space ({}) for file {}",
                HumanBytes::from(n),
                self.path.display()
            ))
        })
    }

    /// Reads the file to its end, replacing the buffer's content, and seals
    /// the buffer. Returns the number of bytes read.
    ///
    /// `size_hint` is the expected file size; reading continues past it when
    /// the file turns out larger and stops early when it is shorter.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::OutOfMemory`] when the buffer cannot grow and
    /// [`ErrorKind::Io`] when reading fails. The buffer keeps what was read
    /// before the failure.
    pub fn read_all(&mut self, size_hint: usize) -> Result<usize> {
        if self.buffer.is_allocated() {
            self.buffer.set_length(0);
        }
        self.reserve(size_hint)?;

        let mut filled: usize = 0;
        loop {
            if self.buffer.spare_mut().is_empty() {
                let grown = filled.saturating_add((filled / 2).max(READ_CHUNK));
                self.reserve(grown)?;
            }
            match self.file.read(self.buffer.spare_mut()) {
                Ok(0) => break,
                Ok(n) => {
                    filled += n;
                    self.buffer.set_length(filled);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.buffer.seal();
                    return Err(Error::new(
                        ErrorKind::Io,
                        format!("cannot read file {}: {e}", self.path.display()),
                    ));
                }
            }
        }
        self.buffer.seal();
        tracing::debug!(
            path = %self.path.display(),
            size = %HumanBytes::from(filled),
            "file read"
        );
        Ok(filled)
    }

    /// Gives up the file handle and returns the buffer.
    #[must_use]
    pub fn into_buffer(self) -> TextBuffer {
        self.buffer
    }
}

fn file_size(path: &Path) -> Result<usize> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::new(
            ErrorKind::NotFound,
            format!("file {} does not exist", path.display()),
        ),
        _ => Error::io(format!(
            "file size for file {} cannot be determined: {e}",
            path.display()
        )),
    })?;
    usize::try_from(metadata.len()).map_err(|_| {
        Error::out_of_memory(usize::MAX).context(format!(
            "file {} of {} does not fit in memory",
            path.display(),
            HumanBytes(metadata.len())
        ))
    })
}

/// Reads a whole file into a sealed buffer.
///
/// # Errors
///
/// [`ErrorKind::NotFound`], [`ErrorKind::Io`] or
/// [`ErrorKind::OutOfMemory`], each with the path in the message.
pub fn read_file(path: impl AsRef<Path>) -> Result<TextBuffer> {
    let path = path.as_ref();
    let size = file_size(path)?;
    let mut reader = FileReader::open(path)?;
    reader.read_all(size)?;
    Ok(reader.into_buffer())
}

/// Reads a file, optionally normalizes it, and splits it per `options`.
///
/// Buffer space is reserved once, up front, per
/// [`estimate_required_buffer_space`].
///
/// # Errors
///
/// [`ErrorKind::InvalidArgument`] for options that do not validate, plus
/// every error [`read_file`] reports.
pub fn process_file(
    path: impl AsRef<Path>,
    options: &ParseOptions,
    normalize: bool,
) -> Result<SplitContent> {
    let path = path.as_ref();
    options.validate()?;
    let size = file_size(path)?;
    let mut reader = FileReader::open(path)?;
    reader.reserve(estimate_required_buffer_space(size, options))?;
    reader.read_all(size)?;

    let mut content = SplitContent::new(reader.into_buffer());
    if normalize {
        content.normalize();
    }
    content.process(options)?;
    Ok(content)
}
