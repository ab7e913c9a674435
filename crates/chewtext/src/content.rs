use alloc::vec::Vec;

use crate::{
    buffer::{SENTINEL_SIZE, TextBuffer},
    error::Result,
    normalize::{NormalizeStats, normalize},
    options::{ParseMode, ParseOptions},
    scanner::{Scanner, Span},
};

/// A buffer together with the results of splitting it.
///
/// Results are kept as [`Span`]s and resolved on access, so a
/// `SplitContent` can be stored and moved freely. Anything that rewrites the
/// buffer drops the results first.
///
/// # Examples
///
/// ```rust
/// use chewtext::{ParseMode, ParseOptions, SplitContent, TextBuffer};
///
/// let buffer = TextBuffer::from_bytes(b"one\r\n  two\n# skipped\n").unwrap();
/// let mut content = SplitContent::new(buffer);
/// content.process(&ParseOptions::response_file()).unwrap();
/// let lines: Vec<&[u8]> = content.lines().collect();
/// assert_eq!(lines, [&b"one"[..], &b"two"[..]]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SplitContent {
    buffer: TextBuffer,
    lines: Vec<Span>,
    paragraphs: Vec<Span>,
}

impl SplitContent {
    /// Wraps `buffer`, which must be sealed. No splitting happens yet.
    #[must_use]
    pub fn new(buffer: TextBuffer) -> Self {
        Self {
            buffer,
            lines: Vec::new(),
            paragraphs: Vec::new(),
        }
    }

    /// Runs every mode in `options.mode`, in the order lines, paragraphs,
    /// words, n-grams. Earlier results are replaced.
    ///
    /// Words and n-grams are accepted and produce nothing.
    ///
    /// # Errors
    ///
    /// [`crate::ErrorKind::InvalidArgument`] when the options do not
    /// validate; the previous results are kept in that case.
    pub fn process(&mut self, options: &ParseOptions) -> Result<()> {
        options.validate()?;
        self.lines.clear();
        self.paragraphs.clear();

        let scanner = Scanner::new(&self.buffer, options);
        if options.mode.contains(ParseMode::LINES) {
            self.lines = scanner.line_spans();
        }
        if options.mode.contains(ParseMode::PARAGRAPHS) {
            self.paragraphs = scanner.paragraph_spans();
        }
        for (mode, name) in [(ParseMode::WORDS, "words"), (ParseMode::NGRAMS, "ngrams")] {
            if options.mode.contains(mode) {
                tracing::debug!(mode = name, "split mode not supported, skipped");
            }
        }
        Ok(())
    }

    /// Normalizes the buffer in place. Earlier results are dropped.
    pub fn normalize(&mut self) -> NormalizeStats {
        self.lines.clear();
        self.paragraphs.clear();
        normalize(&mut self.buffer)
    }

    /// The lines found by the last [`SplitContent::process`].
    pub fn lines(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.resolve(&self.lines)
    }

    /// The paragraphs found by the last [`SplitContent::process`].
    pub fn paragraphs(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.resolve(&self.paragraphs)
    }

    /// Word splitting is not supported; always empty.
    #[allow(clippy::unused_self)]
    pub fn words(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        core::iter::empty()
    }

    /// Line results as spans into [`SplitContent::buffer`].
    #[must_use]
    pub fn line_spans(&self) -> &[Span] {
        &self.lines
    }

    /// Paragraph results as spans into [`SplitContent::buffer`].
    #[must_use]
    pub fn paragraph_spans(&self) -> &[Span] {
        &self.paragraphs
    }

    /// The underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Gives up the results and returns the buffer.
    #[must_use]
    pub fn into_buffer(self) -> TextBuffer {
        self.buffer
    }

    fn resolve<'a>(&'a self, spans: &'a [Span]) -> impl ExactSizeIterator<Item = &'a [u8]> + 'a {
        let content = self.buffer.content();
        spans.iter().map(move |span| span.resolve(content))
    }
}

impl From<TextBuffer> for SplitContent {
    fn from(buffer: TextBuffer) -> Self {
        Self::new(buffer)
    }
}

/// Buffer space worth reserving up front for a file of `file_size` bytes
/// processed with `options`.
///
/// The base is the file plus its sentinel. Paragraphs add another base for
/// rewritten paragraph text and words add a third more than a base again.
/// Lines and n-grams only add result entries, which live outside the buffer.
#[must_use]
pub fn estimate_required_buffer_space(file_size: usize, options: &ParseOptions) -> usize {
    let base = file_size.saturating_add(SENTINEL_SIZE);
    let mut amount = base;
    if options.mode.contains(ParseMode::PARAGRAPHS) {
        amount = amount.saturating_add(base);
    }
    if options.mode.contains(ParseMode::WORDS) {
        let extra = (base / 3).saturating_mul(4).saturating_add(base % 3 * 4 / 3);
        amount = amount.saturating_add(extra);
    }
    amount
}
