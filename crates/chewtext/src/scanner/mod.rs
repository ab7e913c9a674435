//! Scanner: one forward pass over sealed content that splits it into
//! lines or paragraphs.
//!
//! How it works
//! - Every byte is classified with one [`ActionTable`] lookup. The table is
//!   rebuilt from [`ParseOptions`] per scan (it is 256 bytes of plain data).
//! - Scans read past `length` freely: the zeroed sentinel of a sealed
//!   [`TextBuffer`] classifies as [`Action::EndOfLine`], so every inner loop
//!   stops inside the sentinel at the latest.
//! - Output slices borrow the buffer. The borrow checker enforces the
//!   "issue slices, then never mutate again" contract: a buffer cannot be
//!   normalized or refilled while any slice from it is alive.
//!   [`Span`]s are the owned alternative for results that must outlive the
//!   borrow; resolve them against the unchanged buffer.
//!
//! Rules, in the order they are applied at each line start
//! 1. Leading blanks are skipped: space and tab always, plus every byte the
//!    table marks [`Action::SkipWhitespace`].
//! 2. An [`Action::EndOfLine`] byte here is an empty line; it is ignored.
//! 3. An [`Action::SkipComment`] byte consumes everything up to the next
//!    end-of-line byte; nothing is emitted.
//! 4. Anything else starts a line that runs to the next end-of-line byte.
//!    Trailing [`Action::SkipWhitespace`] bytes are trimmed and the rest is
//!    emitted. It is never empty.
//!
//! Line mode additionally skips one more end-of-line byte right after an
//! emitted line (the LF of a CRLF pair) before going back to rule 1.
//! Paragraph mode classifies every terminator on its own.

mod table;

use alloc::vec::Vec;
use core::ops::Range;

pub use table::{Action, ActionTable};

use crate::{
    buffer::{SENTINEL_SIZE, TextBuffer},
    options::ParseOptions,
};

/// Average line length assumed when reserving output space.
const LINE_SIZE_ESTIMATE: usize = 10;

/// An owned `(start, len)` reference into a buffer's content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Number of bytes.
    pub len: usize,
}

impl Span {
    /// Creates a span covering `[start, end)`.
    #[must_use]
    pub fn from_bounds(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            len: end - start,
        }
    }

    /// One past the last byte.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The span as a range.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// The bytes this span covers in `content`.
    ///
    /// # Panics
    ///
    /// Panics when the span lies outside `content`, i.e. when it is resolved
    /// against a different or rewritten buffer.
    #[must_use]
    pub fn resolve<'a>(&self, content: &'a [u8]) -> &'a [u8] {
        &content[self.range()]
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Terminators {
    /// Skip one extra end-of-line byte after an emitted line.
    CoalesceCrlf,
    Independent,
}

/// A table-driven splitter over one sealed window of bytes.
#[derive(Debug, Clone)]
pub struct Scanner<'buf> {
    window: &'buf [u8],
    len: usize,
    table: ActionTable,
}

impl<'buf> Scanner<'buf> {
    /// Scans `buffer` with the table built from `options`.
    #[must_use]
    pub fn new(buffer: &'buf TextBuffer, options: &ParseOptions) -> Self {
        Self::with_table(buffer, ActionTable::new(options))
    }

    /// Scans `buffer` with a caller-supplied (possibly patched) table.
    #[must_use]
    pub fn with_table(buffer: &'buf TextBuffer, table: ActionTable) -> Self {
        debug_assert!(buffer.is_sealed(), "scanning an unsealed buffer");
        Self {
            window: buffer.capacity_view(),
            len: buffer.len(),
            table,
        }
    }

    /// Scans the first `len` bytes of `window`, which must be followed by at
    /// least [`SENTINEL_SIZE`] zero bytes.
    ///
    /// # Panics
    ///
    /// Panics when `window` is shorter than `len + SENTINEL_SIZE`.
    #[must_use]
    pub fn from_window(window: &'buf [u8], len: usize, table: ActionTable) -> Self {
        assert!(
            window.len() >= len + SENTINEL_SIZE,
            "window of {} bytes cannot hold {len} content bytes plus the sentinel",
            window.len()
        );
        debug_assert!(window[len..len + SENTINEL_SIZE].iter().all(|&b| b == 0));
        Self { window, len, table }
    }

    /// The table this scanner classifies with.
    #[must_use]
    pub fn table(&self) -> &ActionTable {
        &self.table
    }

    /// Splits into lines, coalescing CRLF pairs.
    #[must_use]
    pub fn lines(&self) -> Vec<&'buf [u8]> {
        self.collect_slices(Terminators::CoalesceCrlf)
    }

    /// Splits into paragraphs.
    #[must_use]
    pub fn paragraphs(&self) -> Vec<&'buf [u8]> {
        self.collect_slices(Terminators::Independent)
    }

    /// Like [`Scanner::lines`], returning owned spans.
    #[must_use]
    pub fn line_spans(&self) -> Vec<Span> {
        self.collect_spans(Terminators::CoalesceCrlf)
    }

    /// Like [`Scanner::paragraphs`], returning owned spans.
    #[must_use]
    pub fn paragraph_spans(&self) -> Vec<Span> {
        self.collect_spans(Terminators::Independent)
    }

    fn collect_slices(&self, terminators: Terminators) -> Vec<&'buf [u8]> {
        let window = self.window;
        let mut out = Vec::with_capacity(self.len / LINE_SIZE_ESTIMATE);
        self.scan(terminators, |start, end| out.push(&window[start..end]));
        out
    }

    fn collect_spans(&self, terminators: Terminators) -> Vec<Span> {
        let mut out = Vec::with_capacity(self.len / LINE_SIZE_ESTIMATE);
        self.scan(terminators, |start, end| out.push(Span::from_bounds(start, end)));
        out
    }

    #[inline]
    fn is_leading_blank(&self, b: u8) -> bool {
        match self.table[b] {
            Action::SkipWhitespace => true,
            Action::NoAction => b == b' ' || b == b'\t',
            Action::EndOfLine | Action::SkipComment => false,
        }
    }

    fn scan(&self, terminators: Terminators, mut emit: impl FnMut(usize, usize)) {
        let w = self.window;
        let t = &self.table;
        let mut emitted = 0usize;
        let mut i = 0;
        while i < self.len {
            while self.is_leading_blank(w[i]) {
                i += 1;
            }
            match t[w[i]] {
                Action::EndOfLine => {
                    i += 1;
                }
                Action::SkipComment => {
                    i += 1;
                    while t[w[i]] != Action::EndOfLine {
                        i += 1;
                    }
                }
                Action::NoAction | Action::SkipWhitespace => {
                    let start = i;
                    while t[w[i]] != Action::EndOfLine {
                        i += 1;
                    }
                    let mut end = i;
                    while end > start && t[w[end - 1]] == Action::SkipWhitespace {
                        end -= 1;
                    }
                    debug_assert!(end > start, "empty line emitted at {start}");
                    emit(start, end);
                    emitted += 1;

                    if terminators == Terminators::CoalesceCrlf {
                        i += 1;
                        if t[w[i]] == Action::EndOfLine {
                            i += 1;
                        }
                    }
                }
            }
        }
        tracing::trace!(
            scanned = self.len,
            emitted,
            coalesce_crlf = (terminators == Terminators::CoalesceCrlf),
            "content split"
        );
    }
}

/// Splits `buffer` into trimmed, non-empty lines.
///
/// # Examples
///
/// ```rust
/// use chewtext::{ParseOptions, TextBuffer, split_lines};
///
/// let buffer = TextBuffer::from_bytes(b"  first \r\n\r\n# note\nsecond").unwrap();
/// let options = ParseOptions::response_file();
/// let lines = split_lines(&buffer, &options);
/// assert_eq!(lines, [&b"first"[..], &b"second"[..]]);
/// ```
#[must_use]
pub fn split_lines<'buf>(buffer: &'buf TextBuffer, options: &ParseOptions) -> Vec<&'buf [u8]> {
    Scanner::new(buffer, options).lines()
}

/// Splits `buffer` into paragraphs.
#[must_use]
pub fn split_paragraphs<'buf>(
    buffer: &'buf TextBuffer,
    options: &ParseOptions,
) -> Vec<&'buf [u8]> {
    Scanner::new(buffer, options).paragraphs()
}

#[cfg(test)]
mod tests;
