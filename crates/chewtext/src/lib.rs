//! Clean, addressable text from large or mixed-encoding byte streams.
//!
//! Three pieces work on one owned allocation:
//!
//! - [`TextBuffer`] keeps [`SENTINEL_SIZE`] zero bytes past its content, so
//!   readers can look ahead without bounds checks.
//! - [`normalize`] rewrites the content in place into UTF-8 with LF-only line
//!   endings, repairing embedded UTF-16LE runs and replacing control bytes and
//!   malformed sequences with `\n`.
//! - [`Scanner`] splits the content into trimmed, non-empty lines or
//!   paragraphs with a 256-entry [`ActionTable`] built from [`ParseOptions`].
//!
//! ```rust
//! use chewtext::{ParseOptions, TextBuffer, normalize, split_lines};
//!
//! let mut buffer = TextBuffer::from_bytes(b"src/a.rs\r\n# skip me\r\n  b\0.\0r\0s\0\0\0").unwrap();
//! normalize(&mut buffer);
//! let lines = split_lines(&buffer, &ParseOptions::response_file());
//! assert_eq!(lines, [&b"src/a.rs"[..], &b"b.rs"[..]]);
//! ```
//!
//! [`SplitContent`] keeps a buffer together with its results, and with the
//! `std` feature [`process_file`] does read, normalize and split in one call.

#![no_std]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

mod buffer;
pub mod codec;
mod content;
mod error;
mod normalize;
mod options;
#[cfg(feature = "std")]
mod reader;
pub mod scanner;

#[cfg(test)]
mod tests;

pub use buffer::{MIN_CAPACITY, SENTINEL_SIZE, TextBuffer};
pub use content::{SplitContent, estimate_required_buffer_space};
pub use error::{Error, ErrorKind, Result};
pub use normalize::{NormalizeStats, normalize, normalize_bytes};
pub use options::{ParseMode, ParseOptions};
#[cfg(feature = "std")]
pub use reader::{FileReader, HumanBytes, process_file, read_file};
pub use scanner::{Action, ActionTable, Scanner, Span, split_lines, split_paragraphs};
