use alloc::{collections::TryReserveError, format, string::String};

use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An allocation or reallocation could not be satisfied.
    #[error("out of memory")]
    OutOfMemory,
    /// A caller handed in an option set or value that cannot be honored.
    #[error("invalid argument")]
    InvalidArgument,
    /// Input bytes could not be interpreted in any supported encoding.
    ///
    /// The normalizer recovers from these locally; the kind exists so that
    /// collaborators can report what was substituted.
    #[error("malformed encoding")]
    MalformedEncoding,
    /// A file could not be opened or read.
    #[error("i/o error")]
    Io,
    /// A file does not exist.
    #[error("not found")]
    NotFound,
}

/// An error surfaced by this crate: a [`ErrorKind`] plus a human readable
/// message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Allocation of `requested` bytes failed.
    #[must_use]
    pub fn out_of_memory(requested: usize) -> Self {
        Self::new(
            ErrorKind::OutOfMemory,
            format!("cannot allocate {requested} bytes of buffer space"),
        )
    }

    /// Shorthand for [`ErrorKind::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Shorthand for [`ErrorKind::Io`].
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub(crate) fn from_reserve(requested: usize, err: &TryReserveError) -> Self {
        tracing::warn!(requested, %err, "buffer allocation failed");
        Self::new(
            ErrorKind::OutOfMemory,
            format!("cannot allocate {requested} bytes of buffer space: {err}"),
        )
    }

    /// The error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The message, without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Prefixes the message with additional context, keeping the kind.
    #[must_use]
    pub fn context(self, context: impl core::fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{context}: {}", self.message),
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        use alloc::string::ToString;

        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::OutOfMemory => ErrorKind::OutOfMemory,
            _ => ErrorKind::Io,
        };
        Self::new(kind, err.to_string())
    }
}
