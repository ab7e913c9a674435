#![allow(clippy::struct_excessive_bools)]

use alloc::format;

use bitflags::bitflags;

use crate::error::{Error, Result};

bitflags! {
    /// Which splits to produce. Several modes may be requested at once; each
    /// is produced independently from the same content.
    ///
    /// Only [`ParseMode::LINES`] and [`ParseMode::PARAGRAPHS`] produce output.
    /// [`ParseMode::WORDS`] and [`ParseMode::NGRAMS`] are accepted and yield
    /// nothing, see [`ParseMode::is_supported`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ParseMode: u8 {
        /// One slice per non-empty text line.
        const LINES = 0x01;
        /// One slice per paragraph.
        const PARAGRAPHS = 0x02;
        /// Word splitting. Not supported; produces no output.
        const WORDS = 0x04;
        /// N-gram splitting. Not supported; produces no output.
        const NGRAMS = 0x08;
    }
}

impl ParseMode {
    /// Modes that produce output.
    pub const SUPPORTED: Self = Self::LINES.union(Self::PARAGRAPHS);

    /// Whether every mode in `self` produces output.
    #[must_use]
    pub fn is_supported(self) -> bool {
        !self.is_empty() && Self::SUPPORTED.contains(self)
    }
}

impl Default for ParseMode {
    fn default() -> Self {
        Self::LINES
    }
}

/// Configuration for splitting content.
///
/// Only `mode`, `trim_outer_whitespace` and `accept_comment_lines` change what
/// the scanner emits. The remaining switches are part of the option surface
/// and are carried through unchanged; they select transformations that are
/// not implemented and are ignored.
///
/// # Examples
///
/// ```rust
/// use chewtext::{ParseMode, ParseOptions};
///
/// let options = ParseOptions {
///     mode: ParseMode::LINES,
///     trim_outer_whitespace: true,
///     accept_comment_lines: true,
///     ..Default::default()
/// };
/// assert_eq!(options, ParseOptions::response_file());
/// ```
///
/// # Default
///
/// `mode` is [`ParseMode::LINES`]; every switch is `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseOptions {
    /// Which splits to produce.
    pub mode: ParseMode,

    /// Trim space, tab and vertical tab from both ends of every line.
    ///
    /// Leading blanks (space, tab) are skipped at a line start either way;
    /// this switch adds vertical tab to that set and enables trimming of
    /// trailing blanks.
    pub trim_outer_whitespace: bool,

    /// Remove the common leading indentation of a paragraph. Ignored.
    pub dedent_lines: bool,

    /// Join `hyphen-` `ated` words broken across a line end. Ignored.
    pub contract_hyphenated_words_at_eol: bool,

    /// Collapse each paragraph onto a single line. Ignored.
    pub contract_lines_in_paragraph: bool,

    /// Reduce words to their stems. Ignored.
    pub stemming: bool,

    /// Normalize punctuation. Ignored.
    pub cleanup_punctuation: bool,

    /// Strip diacritics. Ignored.
    pub cleanup_diacritics: bool,

    /// Apply Unicode normalization. Ignored.
    pub unicode_normalization: bool,

    /// Treat lines whose first non-blank byte is `#` as comments and drop
    /// them.
    ///
    /// When `false`, `#` is an ordinary content byte.
    pub accept_comment_lines: bool,
}

impl ParseOptions {
    /// Options for a response file: one path per line, trimmed, with `#`
    /// comment lines.
    #[must_use]
    pub fn response_file() -> Self {
        Self {
            mode: ParseMode::LINES,
            trim_outer_whitespace: true,
            accept_comment_lines: true,
            ..Self::default()
        }
    }

    /// Returns `self` with `mode` replaced.
    #[must_use]
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns `self` with `trim_outer_whitespace` replaced.
    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim_outer_whitespace = trim;
        self
    }

    /// Returns `self` with `accept_comment_lines` replaced.
    #[must_use]
    pub fn with_comments(mut self, accept: bool) -> Self {
        self.accept_comment_lines = accept;
        self
    }

    /// Checks the option combination.
    ///
    /// # Errors
    ///
    /// [`crate::ErrorKind::InvalidArgument`] when no mode is selected or the
    /// mode carries bits outside [`ParseMode::all`].
    pub fn validate(&self) -> Result<()> {
        if self.mode.is_empty() {
            return Err(Error::invalid_argument("no parse mode selected"));
        }
        let unknown = self.mode.bits() & !ParseMode::all().bits();
        if unknown != 0 {
            return Err(Error::invalid_argument(format!(
                "unknown parse mode bits {unknown:#04x}"
            )));
        }
        Ok(())
    }
}
